//! Boundary types for the time-series container.
//!
//! The container itself is external; these types describe what it supplies
//! (pathnames, epoch-second/value columns with NODATA markers) and what it
//! accepts for writing (`SeriesRecord`).

pub mod pathname;
pub mod record;

pub use pathname::*;
pub use record::*;
