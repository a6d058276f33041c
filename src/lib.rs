//! `rating-curves` library crate.
//!
//! Reservoir rating-curve tooling:
//!
//! - `curve`: sorted `(x, y)` tables with nearest-neighbour lookup and tail
//!   extrapolation
//! - `join`: maps time series and point sets through a curve
//! - `workflow`: outflow from stage, storage-discharge from two tables
//! - `store`: pathnames and series records for the time-series container
//! - `io`: CSV ingest/export and curve JSON

pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod io;
pub mod join;
pub mod store;
pub mod workflow;

pub use config::WorkflowConfig;
pub use curve::RatingCurve;
pub use domain::{CurveAxes, CurvePoint, DerivedSeries, NODATA, Sample, TimeSeries};
pub use error::CurveError;
pub use join::CurveJoiner;
