//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a rating curve:
//! - name and axis labels
//! - the ordering diagnostics at the time of writing
//! - the points themselves
//!
//! Reading goes back through `RatingCurve::build`, so a hand-edited file is
//! cleaned the same way as any other input.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::RatingCurve;
use crate::domain::{CurveAxes, CurvePoint, Monotonicity};
use crate::error::CurveError;

/// On-disk schema for a curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub name: String,
    pub axes: CurveAxes,
    pub monotonicity: Monotonicity,
    pub points: Vec<CurvePoint>,
}

impl From<&RatingCurve> for CurveFile {
    fn from(curve: &RatingCurve) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            name: curve.name().to_string(),
            axes: curve.axes().clone(),
            monotonicity: curve.monotonicity(),
            points: curve.points().to_vec(),
        }
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &RatingCurve) -> Result<(), CurveError> {
    let file = File::create(path).map_err(|e| CurveError::io(path, e))?;
    write_curve_json_to(file, curve)
}

pub fn write_curve_json_to<W: Write>(writer: W, curve: &RatingCurve) -> Result<(), CurveError> {
    serde_json::to_writer_pretty(writer, &CurveFile::from(curve))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<RatingCurve, CurveError> {
    let file = File::open(path).map_err(|e| CurveError::io(path, e))?;
    read_curve_json_from(file)
}

pub fn read_curve_json_from<R: Read>(reader: R) -> Result<RatingCurve, CurveError> {
    let file: CurveFile = serde_json::from_reader(reader)?;
    Ok(RatingCurve::build(file.points)?
        .with_name(file.name)
        .with_axes(file.axes))
}
