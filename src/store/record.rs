//! Series records handed to the container writer.
//!
//! A record is the series plus the metadata the container needs: pathname,
//! start time, units, value type, and interval. Gap-cleaned data is always
//! written as irregular.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DerivedSeries, TimeSeries};
use crate::error::CurveError;
use crate::store::Pathname;

/// How values relate to their timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Point-in-time readings.
    Instantaneous,
}

impl ValueType {
    pub fn code(self) -> &'static str {
        match self {
            ValueType::Instantaneous => "INST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordInterval {
    /// Explicit timestamp per value.
    Irregular,
    /// Fixed spacing from the start time.
    Regular(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub pathname: Pathname,
    pub start: DateTime<Utc>,
    pub units: String,
    pub value_type: ValueType,
    pub interval: RecordInterval,
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl SeriesRecord {
    /// Irregular record with one explicit timestamp per sample.
    pub fn irregular(
        pathname: Pathname,
        series: &TimeSeries,
        units: impl Into<String>,
    ) -> Result<Self, CurveError> {
        let start = series.start().ok_or(CurveError::EmptyInput)?;
        Ok(Self {
            pathname,
            start,
            units: units.into(),
            value_type: ValueType::Instantaneous,
            interval: RecordInterval::Irregular,
            times: series.samples().iter().map(|s| s.timestamp).collect(),
            values: series.values().collect(),
        })
    }

    /// Irregular record for a looked-up series (e.g. outflow from stage).
    pub fn from_derived(
        pathname: Pathname,
        derived: &DerivedSeries,
        units: impl Into<String>,
    ) -> Result<Self, CurveError> {
        Self::irregular(pathname, &derived.series, units)
    }

    /// Regular record: `values[i]` sits at `start + i * step`.
    pub fn regular(
        pathname: Pathname,
        start: DateTime<Utc>,
        step: Duration,
        values: Vec<f64>,
        units: impl Into<String>,
    ) -> Result<Self, CurveError> {
        if step <= Duration::zero() {
            return Err(CurveError::InvalidStep {
                step: step.num_milliseconds() as f64 / 1000.0,
            });
        }
        if values.is_empty() {
            return Err(CurveError::EmptyInput);
        }
        let times = (0..values.len())
            .map(|i| {
                i32::try_from(i)
                    .ok()
                    .and_then(|i| step.checked_mul(i))
                    .and_then(|offset| start.checked_add_signed(offset))
                    .ok_or_else(|| CurveError::InvalidTimestamp {
                        value: format!("{start} + {i} * {step}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pathname,
            start,
            units: units.into(),
            value_type: ValueType::Instantaneous,
            interval: RecordInterval::Regular(step),
            times,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Start time in the container's `ddMMMyyyy HH:MM:SS` form.
    pub fn start_label(&self) -> String {
        self.start.format("%d%b%Y %H:%M:%S").to_string()
    }

    /// `-1` for irregular records, otherwise the interval in seconds.
    pub fn interval_code(&self) -> i64 {
        match self.interval {
            RecordInterval::Irregular => -1,
            RecordInterval::Regular(step) => step.num_seconds(),
        }
    }
}

/// Pad `values` with `fill` up to `len`. Longer inputs are returned unchanged.
///
/// Unit hydrographs are padded with zeros so every event spans the same window.
pub fn pad_values(values: &[f64], len: usize, fill: f64) -> Vec<f64> {
    let mut out = values.to_vec();
    if out.len() < len {
        out.resize(len, fill);
    }
    out
}
