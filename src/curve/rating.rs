//! Rating curve construction, nearest-neighbour lookup, and ordering checks.
//!
//! Lookups are nearest-match, never interpolated: only tabulated `y` values
//! are ever returned.

use std::cmp::Ordering;

use crate::domain::{CurveAxes, CurvePoint, Monotonicity};
use crate::error::CurveError;

/// An immutable table of `(x, y)` pairs sorted ascending by unique `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingCurve {
    name: String,
    axes: CurveAxes,
    pub(crate) points: Vec<CurvePoint>,
}

impl RatingCurve {
    /// Build a curve from raw rows.
    ///
    /// Rows with a non-finite `x` are dropped. For duplicate `x` values the
    /// first row in input order wins. The rest are sorted ascending by `x`.
    pub fn build<I, P>(points: I) -> Result<Self, CurveError>
    where
        I: IntoIterator<Item = P>,
        P: Into<CurvePoint>,
    {
        let mut points: Vec<CurvePoint> = points
            .into_iter()
            .map(Into::into)
            .filter(|p| p.x.is_finite())
            .collect();
        let cleaned = points.len();

        // Stable sort keeps input order among equal `x`, so dedup keeps the first.
        points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        points.dedup_by(|later, earlier| later.x == earlier.x);

        if points.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        tracing::debug!(
            points = points.len(),
            duplicates = cleaned - points.len(),
            "built rating curve"
        );

        Ok(Self {
            name: "curve".to_string(),
            axes: CurveAxes::default(),
            points,
        })
    }

    /// Rebuild from points already known to be sorted and unique.
    pub(crate) fn from_sorted(name: String, axes: CurveAxes, points: Vec<CurvePoint>) -> Self {
        Self { name, axes, points }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_axes(mut self, axes: CurveAxes) -> Self {
        self.axes = axes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &CurveAxes {
        &self.axes
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: construction rejects empty curves.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> CurvePoint {
        self.points[0]
    }

    pub fn last(&self) -> CurvePoint {
        self.points[self.points.len() - 1]
    }

    pub fn max_x(&self) -> f64 {
        self.last().x
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.first().x, self.last().x)
    }

    /// `(min, max)` of `y`, ignoring NaN.
    pub fn y_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .map(|p| p.y)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            })
    }

    /// The point whose `x` is closest to `x_query`.
    ///
    /// Ties go to the smaller `x`. Queries outside the domain get the nearest
    /// endpoint. A NaN query matches the first point.
    pub fn nearest_point(&self, x_query: f64) -> CurvePoint {
        let idx = self.points.partition_point(|p| p.x < x_query);
        if idx == 0 {
            return self.first();
        }
        if idx == self.points.len() {
            return self.last();
        }

        let below = self.points[idx - 1];
        let above = self.points[idx];
        if x_query - below.x <= above.x - x_query {
            below
        } else {
            above
        }
    }

    /// `y` of the nearest point (see [`RatingCurve::nearest_point`]).
    pub fn lookup_nearest(&self, x_query: f64) -> f64 {
        self.nearest_point(x_query).y
    }

    pub fn is_monotonic_x(&self) -> bool {
        self.points.windows(2).all(|w| w[0].x <= w[1].x)
    }

    pub fn is_monotonic_y(&self) -> bool {
        self.points.windows(2).all(|w| w[0].y <= w[1].y)
    }

    pub fn monotonicity(&self) -> Monotonicity {
        Monotonicity {
            x: self.is_monotonic_x(),
            y: self.is_monotonic_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> RatingCurve {
        RatingCurve::build(points.iter().copied()).unwrap()
    }

    #[test]
    fn build_keeps_first_duplicate_and_sorts() {
        let c = curve(&[(30.0, 3.0), (10.0, 1.0), (20.0, 2.0), (10.0, 99.0), (30.0, 77.0)]);
        let xs: Vec<f64> = c.points().iter().map(|p| p.x).collect();
        let ys: Vec<f64> = c.points().iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![10.0, 20.0, 30.0]);
        assert_eq!(ys, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn build_drops_nan_x() {
        let c = curve(&[(f64::NAN, 5.0), (1.0, 1.0), (f64::INFINITY, 2.0)]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.first(), CurvePoint::new(1.0, 1.0));
    }

    #[test]
    fn build_rejects_empty() {
        let err = RatingCurve::build(Vec::<CurvePoint>::new()).unwrap_err();
        assert!(matches!(err, CurveError::EmptyCurve));

        let err = RatingCurve::build([(f64::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, CurveError::EmptyCurve));
    }

    #[test]
    fn build_treats_signed_zero_as_duplicate() {
        let c = curve(&[(-0.0, 1.0), (0.0, 2.0)]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.first().y, 1.0);
    }

    #[test]
    fn lookup_nearest_closer_point() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0), (30.0, 300.0)]);
        assert_eq!(c.lookup_nearest(24.0), 200.0);
        assert_eq!(c.lookup_nearest(26.0), 300.0);
        assert_eq!(c.lookup_nearest(20.0), 200.0);
    }

    #[test]
    fn lookup_nearest_tie_prefers_smaller_x() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0), (30.0, 300.0)]);
        assert_eq!(c.lookup_nearest(25.0), 200.0);
        assert_eq!(c.lookup_nearest(15.0), 100.0);
    }

    #[test]
    fn lookup_nearest_outside_domain_uses_endpoints() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0)]);
        assert_eq!(c.lookup_nearest(-1e6), 100.0);
        assert_eq!(c.lookup_nearest(1e6), 200.0);
    }

    #[test]
    fn single_point_curve_matches_everything() {
        let c = curve(&[(5.0, 50.0)]);
        assert_eq!(c.lookup_nearest(-3.0), 50.0);
        assert_eq!(c.lookup_nearest(5.0), 50.0);
        assert_eq!(c.lookup_nearest(9.0), 50.0);
    }

    #[test]
    fn monotonicity_reports_but_keeps_y() {
        let c = curve(&[(1.0, 10.0), (2.0, 5.0), (3.0, 20.0)]);
        assert!(c.is_monotonic_x());
        assert!(!c.is_monotonic_y());
        assert!(!c.monotonicity().is_well_ordered());
        assert_eq!(c.lookup_nearest(2.1), 5.0);
    }

    #[test]
    fn ranges() {
        let c = curve(&[(3.0, 1.0), (1.0, 7.0), (2.0, -2.0)]);
        assert_eq!(c.x_range(), (1.0, 3.0));
        assert_eq!(c.y_range(), (-2.0, 7.0));
        assert_eq!(c.max_x(), 3.0);
    }
}
