//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from cleaned CSV/container inputs
//! - mapped through rating curves
//! - exported again to CSV/JSON or handed to the container writer

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Missing-value marker used by the time-series container.
///
/// The container stores `-3.4028235e38` as `f32::MIN`; widened to `f64` that is
/// slightly above the `f64` parse of the same literal, so the threshold is the
/// widened value and both forms compare at or below it.
pub const NODATA: f64 = f32::MIN as f64;

/// Returns `true` when `value` is the container's missing-data sentinel
/// (or anything more negative).
pub fn is_nodata(value: f64) -> bool {
    value <= NODATA
}

/// One row of a rating curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Column labels for the two axes of a curve (used as CSV headers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveAxes {
    pub x: String,
    pub y: String,
}

impl CurveAxes {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl Default for CurveAxes {
    fn default() -> Self {
        Self::new("independent_variable", "dependent_variable")
    }
}

/// Diagnostic ordering flags for a curve.
///
/// Non-monotonic curves are reported, never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monotonicity {
    /// `x` is non-decreasing.
    pub x: bool,
    /// `y` is non-decreasing.
    pub y: bool,
}

impl Monotonicity {
    pub fn is_well_ordered(self) -> bool {
        self.x && self.y
    }
}

/// A timestamped scalar measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Missing samples are NODATA or NaN.
    pub fn is_missing(&self) -> bool {
        self.value.is_nan() || is_nodata(self.value)
    }
}

/// Spacing of a series' timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesInterval {
    /// Every gap equals the given duration.
    Regular(Duration),
    /// Gaps differ (the normal case once NODATA samples are removed).
    Irregular,
}

/// Time-ascending sequence of samples.
///
/// Timestamps strictly increase; no fixed interval is required.
///
/// Deserialization goes through [`TimeSeries::new`], so the ordering holds for
/// series read back from JSON too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeries {
    id: String,
    samples: Vec<Sample>,
}

#[derive(Deserialize)]
struct RawTimeSeries {
    id: String,
    samples: Vec<Sample>,
}

impl TryFrom<RawTimeSeries> for TimeSeries {
    type Error = CurveError;

    fn try_from(raw: RawTimeSeries) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.samples)
    }
}

impl TimeSeries {
    /// Build a series from already-clean samples.
    pub fn new(id: impl Into<String>, samples: Vec<Sample>) -> Result<Self, CurveError> {
        if let Some(index) = samples
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(CurveError::UnorderedTimestamps { index: index + 1 });
        }
        Ok(Self {
            id: id.into(),
            samples,
        })
    }

    /// Drop NODATA/NaN samples, then build the series.
    pub fn from_raw(id: impl Into<String>, samples: Vec<Sample>) -> Result<Self, CurveError> {
        let raw = samples.len();
        let samples: Vec<Sample> = samples.into_iter().filter(|s| !s.is_missing()).collect();
        let id: String = id.into();
        tracing::debug!(series = %id, raw, kept = samples.len(), "dropped missing samples");
        Self::new(id, samples)
    }

    /// Build from container-style `(seconds since epoch, value)` columns.
    pub fn from_epoch_seconds(
        id: impl Into<String>,
        times: &[i64],
        values: &[f64],
    ) -> Result<Self, CurveError> {
        if times.len() != values.len() {
            return Err(CurveError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        let samples = times
            .iter()
            .zip(values)
            .map(|(&secs, &value)| {
                DateTime::from_timestamp(secs, 0)
                    .map(|timestamp| Sample { timestamp, value })
                    .ok_or_else(|| CurveError::InvalidTimestamp {
                        value: secs.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_raw(id, samples)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.timestamp)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Regular only when there are at least two samples and every gap is equal.
    pub fn interval(&self) -> SeriesInterval {
        let mut gaps = self.samples.windows(2).map(|w| w[1].timestamp - w[0].timestamp);
        let Some(first) = gaps.next() else {
            return SeriesInterval::Irregular;
        };
        if gaps.all(|g| g == first) {
            SeriesInterval::Regular(first)
        } else {
            SeriesInterval::Irregular
        }
    }
}

/// Where a derived series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Id of the source series.
    pub source: String,
    /// Name of the curve it was mapped through.
    pub curve: String,
}

/// A series whose values were looked up in a rating curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub series: TimeSeries,
    pub provenance: Provenance,
}
