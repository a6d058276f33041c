//! Reservoir workflows built from the curve primitives.
//!
//! - elevation series -> outflow series via an elevation-discharge rating
//! - elevation-storage + elevation-discharge -> storage-discharge curve
//!
//! Ordering problems in the published tables are logged as warnings and the
//! run continues; only the curve/join errors abort.

use std::collections::HashSet;

use crate::config::WorkflowConfig;
use crate::curve::RatingCurve;
use crate::domain::{CurveAxes, CurvePoint, DerivedSeries, Monotonicity, TimeSeries};
use crate::error::CurveError;
use crate::join::CurveJoiner;

/// Which coordinate to deduplicate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Outputs of [`storage_discharge_curve`].
#[derive(Debug, Clone)]
pub struct StorageDischarge {
    /// Elevation-storage curve after tail extension.
    pub elevation_storage: RatingCurve,
    /// Storage (x) to discharge (y).
    pub storage_discharge: RatingCurve,
    /// Ordering of the storage-discharge pairs in elevation order, before
    /// they were sorted by storage.
    pub pair_order: Monotonicity,
}

/// Map an elevation (stage) series to outflow through an elevation-discharge rating.
pub fn outflow_from_stage(series: &TimeSeries, rating: &RatingCurve) -> Result<DerivedSeries, CurveError> {
    warn_if_unordered(rating);
    CurveJoiner::new(rating).map_series(series)
}

/// Derive a storage-discharge curve.
///
/// The elevation-storage table is extended to the top of the discharge table,
/// every storage row is paired with the discharge at its nearest elevation,
/// then rows are deduplicated keep-first on storage and on discharge, and
/// discharge is rounded to `config.discharge_decimals`.
///
/// Deduplicating on discharge drops distinct storages that share a discharge
/// (e.g. the flat zero-outflow band below the spillway crest).
pub fn storage_discharge_curve(
    elevation_storage: &RatingCurve,
    elevation_discharge: &RatingCurve,
    config: &WorkflowConfig,
) -> Result<StorageDischarge, CurveError> {
    config.validate()?;
    warn_if_unordered(elevation_storage);
    warn_if_unordered(elevation_discharge);

    let extended =
        elevation_storage.extrapolate_tail(elevation_discharge.max_x(), config.extrapolation_step)?;

    let pairs = CurveJoiner::new(elevation_discharge).map_points(extended.points());
    let pairs = dedup_keep_first_by(&pairs, Axis::X);
    let pairs: Vec<CurvePoint> = dedup_keep_first_by(&pairs, Axis::Y)
        .into_iter()
        .map(|p| CurvePoint::new(p.x, round_to(p.y, config.discharge_decimals)))
        .collect();

    let pair_order = Monotonicity {
        x: pairs.windows(2).all(|w| w[0].x <= w[1].x),
        y: pairs.windows(2).all(|w| w[0].y <= w[1].y),
    };
    if !pair_order.x {
        tracing::warn!(
            curve = elevation_storage.name(),
            axis = %config.storage_label,
            "storage is not ascending with elevation"
        );
    }
    if !pair_order.y {
        tracing::warn!(
            curve = elevation_discharge.name(),
            axis = %config.discharge_label,
            "discharge is not ascending with elevation"
        );
    }

    let storage_discharge = RatingCurve::build(pairs)?
        .with_name(format!("{} storage-discharge", elevation_storage.name()))
        .with_axes(CurveAxes::new(
            config.storage_label.clone(),
            config.discharge_label.clone(),
        ));

    tracing::info!(
        elevation_storage_points = extended.len(),
        storage_discharge_points = storage_discharge.len(),
        "built storage-discharge curve"
    );

    Ok(StorageDischarge {
        elevation_storage: extended,
        storage_discharge,
        pair_order,
    })
}

/// Keep the first point for each distinct value on `axis`, in input order.
pub fn dedup_keep_first_by(points: &[CurvePoint], axis: Axis) -> Vec<CurvePoint> {
    let mut seen: HashSet<u64> = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| {
            let key = match axis {
                Axis::X => p.x,
                Axis::Y => p.y,
            };
            // -0.0 and 0.0 are the same key.
            let key = if key == 0.0 { 0.0f64 } else { key };
            seen.insert(key.to_bits())
        })
        .copied()
        .collect()
}

/// Round half away from zero to `decimals` places.
///
/// Returns `value` unchanged when scaling it would overflow.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let Ok(exp) = i32::try_from(decimals) else {
        return value;
    };
    let scaled = value * 10f64.powi(exp);
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10f64.powi(exp)
}

fn warn_if_unordered(curve: &RatingCurve) {
    let m = curve.monotonicity();
    if !m.x {
        tracing::warn!(curve = curve.name(), axis = %curve.axes().x, "curve x is not ascending");
    }
    if !m.y {
        tracing::warn!(curve = curve.name(), axis = %curve.axes().y, "curve y is not ascending");
    }
}
