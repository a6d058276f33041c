//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - curve rows and axis labels (`CurvePoint`, `CurveAxes`, `Monotonicity`)
//! - time series with NODATA cleanup (`Sample`, `TimeSeries`)
//! - mapped outputs with provenance (`DerivedSeries`)

pub mod types;

pub use types::*;
