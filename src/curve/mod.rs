//! Rating curves.
//!
//! - construction, lookup, ordering diagnostics (`rating`)
//! - linear tail extension (`extrapolate`)

pub mod extrapolate;
pub mod rating;

pub use extrapolate::MAX_TAIL_POINTS;
pub use rating::RatingCurve;
