//! Input/output helpers.
//!
//! - CSV ingest of rating tables and gage series (`ingest`)
//! - curve/series CSV exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
