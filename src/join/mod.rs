//! Mapping series and point sets through a rating curve.
//!
//! The joiner borrows the curve read-only, so any number of joins can share
//! one curve, including from several threads at once (`map_series_batch`).

use rayon::prelude::*;

use crate::curve::RatingCurve;
use crate::domain::{CurvePoint, DerivedSeries, Provenance, Sample, TimeSeries};
use crate::error::CurveError;

/// Looks up samples in a shared, immutable rating curve.
#[derive(Debug, Clone, Copy)]
pub struct CurveJoiner<'a> {
    curve: &'a RatingCurve,
}

impl<'a> CurveJoiner<'a> {
    pub fn new(curve: &'a RatingCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &'a RatingCurve {
        self.curve
    }

    /// Map every sample through the curve, one output per input.
    ///
    /// Timestamps and their order are preserved exactly.
    pub fn map_series(&self, series: &TimeSeries) -> Result<DerivedSeries, CurveError> {
        if series.is_empty() {
            return Err(CurveError::EmptyInput);
        }

        let samples: Vec<Sample> = series
            .samples()
            .iter()
            .map(|s| Sample::new(s.timestamp, self.curve.lookup_nearest(s.value)))
            .collect();

        tracing::debug!(
            series = series.id(),
            curve = self.curve.name(),
            samples = samples.len(),
            "mapped series through curve"
        );

        // Source timestamps already strictly increase.
        let derived = TimeSeries::new(series.id(), samples)?;
        Ok(DerivedSeries {
            series: derived,
            provenance: Provenance {
                source: series.id().to_string(),
                curve: self.curve.name().to_string(),
            },
        })
    }

    /// Compose curves: each `(x, y_source)` becomes `(y_source, curve(x))`.
    ///
    /// With an elevation-storage input and an elevation-discharge joiner this
    /// yields storage-discharge pairs. Deduplication and rounding are left to
    /// the caller.
    pub fn map_points(&self, points: &[CurvePoint]) -> Vec<CurvePoint> {
        points
            .iter()
            .map(|p| CurvePoint::new(p.y, self.curve.lookup_nearest(p.x)))
            .collect()
    }

    /// Map several independent series in parallel.
    ///
    /// Results come back in input order; one failure does not affect the others.
    pub fn map_series_batch(&self, series: &[TimeSeries]) -> Vec<Result<DerivedSeries, CurveError>> {
        series.par_iter().map(|s| self.map_series(s)).collect()
    }
}
