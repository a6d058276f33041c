//! Linear tail extrapolation.
//!
//! Elevation-storage tables often stop below the top of the discharge table.
//! The tail is extended with the slope of the last segment on a fixed-step
//! grid.

use crate::curve::RatingCurve;
use crate::domain::CurvePoint;
use crate::error::CurveError;

/// Most points a single tail extension may append.
pub const MAX_TAIL_POINTS: usize = 1_000_000;

impl RatingCurve {
    /// Extend the curve until its last `x` reaches `target_x_max`.
    ///
    /// Returns an unchanged copy when `target_x_max` is already covered.
    /// Appended points continue the slope of the last two points on the grid
    /// `x_max + i * step`, up to the first `x >= target_x_max`.
    ///
    /// A step too small to advance `x` at this magnitude is an `InvalidStep`.
    /// More than [`MAX_TAIL_POINTS`] appended points is a `TailTooLong`.
    pub fn extrapolate_tail(&self, target_x_max: f64, step: f64) -> Result<RatingCurve, CurveError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(CurveError::InvalidStep { step });
        }
        if !target_x_max.is_finite() {
            return Err(CurveError::NonFiniteTarget {
                target: target_x_max,
            });
        }
        if target_x_max <= self.max_x() {
            return Ok(self.clone());
        }

        let slope = self.tail_slope()?;
        let base = self.last();
        let steps = ((target_x_max - base.x) / step).ceil();
        if !(steps <= MAX_TAIL_POINTS as f64) {
            return Err(CurveError::TailTooLong {
                steps,
                limit: MAX_TAIL_POINTS,
            });
        }
        let mut count = steps as usize;
        // `base.x + count * step` can round to just below the target.
        if base.x + count as f64 * step < target_x_max {
            count += 1;
        }

        let mut points = Vec::with_capacity(self.len() + count);
        points.extend_from_slice(&self.points);
        let mut prev_x = base.x;
        for i in 1..=count {
            let offset = i as f64 * step;
            let x = base.x + offset;
            if x <= prev_x {
                return Err(CurveError::InvalidStep { step });
            }
            points.push(CurvePoint::new(x, base.y + slope * offset));
            prev_x = x;
        }

        tracing::debug!(
            curve = self.name(),
            appended = count,
            slope,
            "extrapolated curve tail"
        );
        Ok(RatingCurve::from_sorted(
            self.name().to_string(),
            self.axes().clone(),
            points,
        ))
    }

    /// Slope of the last segment.
    pub fn tail_slope(&self) -> Result<f64, CurveError> {
        let n = self.len();
        if n < 2 {
            return Err(CurveError::DegenerateCurve { len: n });
        }
        let a = self.points[n - 2];
        let b = self.points[n - 1];
        let run = b.x - a.x;
        if run == 0.0 {
            return Err(CurveError::DegenerateCurve { len: n });
        }
        Ok((b.y - a.y) / run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> RatingCurve {
        RatingCurve::build(points.iter().copied()).unwrap()
    }

    #[test]
    fn appends_single_step() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0)]);
        assert_eq!(c.tail_slope().unwrap(), 10.0);

        let out = c.extrapolate_tail(25.0, 5.0).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.last(), CurvePoint::new(25.0, 300.0));
    }

    #[test]
    fn overshoots_to_cover_target() {
        let c = curve(&[(0.0, 0.0), (1.0, 2.0)]);
        let out = c.extrapolate_tail(2.5, 1.0).unwrap();
        let xs: Vec<f64> = out.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(out.last().y, 6.0);
        assert!(out.is_monotonic_x());
    }

    #[test]
    fn idempotent_for_same_target() {
        let c = curve(&[(1000.0, 50.0), (1000.5, 55.0)]);
        let once = c.extrapolate_tail(1002.0, 0.1).unwrap();
        let twice = once.extrapolate_tail(1002.0, 0.1).unwrap();
        assert_eq!(once, twice);
        assert!(once.max_x() >= 1002.0);
    }

    #[test]
    fn no_op_when_target_covered() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0)]);
        assert_eq!(c.extrapolate_tail(20.0, 5.0).unwrap(), c);
        assert_eq!(c.extrapolate_tail(5.0, 5.0).unwrap(), c);
    }

    #[test]
    fn no_op_on_single_point_when_target_covered() {
        let c = curve(&[(10.0, 100.0)]);
        assert_eq!(c.extrapolate_tail(9.0, 1.0).unwrap(), c);
    }

    #[test]
    fn rejects_degenerate_curve() {
        let c = curve(&[(10.0, 100.0)]);
        let err = c.extrapolate_tail(20.0, 1.0).unwrap_err();
        assert!(matches!(err, CurveError::DegenerateCurve { len: 1 }));
    }

    #[test]
    fn rejects_bad_step() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0)]);
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = c.extrapolate_tail(30.0, step).unwrap_err();
            assert!(matches!(err, CurveError::InvalidStep { .. }));
        }
    }

    #[test]
    fn rejects_non_finite_target() {
        let c = curve(&[(10.0, 100.0), (20.0, 200.0)]);
        let err = c.extrapolate_tail(f64::INFINITY, 1.0).unwrap_err();
        assert!(matches!(err, CurveError::NonFiniteTarget { .. }));
    }

    #[test]
    fn rejects_step_below_resolution() {
        // Spacing between f64 values near 1e16 is 2.0, so a 0.5 step cannot advance x.
        let c = curve(&[(1e16, 0.0), (1e16 + 2.0, 1.0)]);
        let err = c.extrapolate_tail(1e16 + 10.0, 0.5).unwrap_err();
        assert!(matches!(err, CurveError::InvalidStep { .. }));
    }

    #[test]
    fn rejects_too_many_tail_points() {
        let c = curve(&[(0.0, 0.0), (1.0, 1.0)]);
        let err = c.extrapolate_tail(101.0, 1e-9).unwrap_err();
        assert!(matches!(
            err,
            CurveError::TailTooLong {
                limit: MAX_TAIL_POINTS,
                ..
            }
        ));
    }

    #[test]
    fn reaches_target_on_fractional_grid() {
        let c = curve(&[(1000.0, 50.0), (1000.5, 55.0)]);
        let out = c.extrapolate_tail(1002.0, 0.1).unwrap();
        assert!(out.max_x() >= 1002.0);
        assert!(out.max_x() < 1002.0 + 0.1 + 1e-9);
        assert!(out.points().windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn keeps_name_and_axes() {
        let c = curve(&[(1.0, 1.0), (2.0, 2.0)])
            .with_name("lawtonka elev-stor")
            .with_axes(crate::domain::CurveAxes::new("Elevation (ft)", "Storage (ac-ft)"));
        let out = c.extrapolate_tail(4.0, 1.0).unwrap();
        assert_eq!(out.name(), "lawtonka elev-stor");
        assert_eq!(out.axes().y, "Storage (ac-ft)");
    }
}
