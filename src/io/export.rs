//! Export curves and series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or to import as
//! paired data in the modeling tool.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::SecondsFormat;

use crate::curve::RatingCurve;
use crate::domain::TimeSeries;
use crate::error::CurveError;

/// Write a curve as two-column CSV with the curve's axis labels as header.
pub fn write_curve_csv(path: &Path, curve: &RatingCurve) -> Result<(), CurveError> {
    let file = File::create(path).map_err(|e| CurveError::io(path, e))?;
    write_curve_csv_to(file, curve)
}

pub fn write_curve_csv_to<W: Write>(writer: W, curve: &RatingCurve) -> Result<(), CurveError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let axes = curve.axes();
    wtr.write_record([axes.x.as_str(), axes.y.as_str()])?;
    for p in curve.points() {
        wtr.write_record([p.x.to_string(), p.y.to_string()])?;
    }
    wtr.flush().map_err(|e| CurveError::io("<csv output>", e))?;
    Ok(())
}

/// Write a series as `timestamp,value` CSV (RFC 3339 UTC timestamps).
pub fn write_series_csv(path: &Path, series: &TimeSeries) -> Result<(), CurveError> {
    let file = File::create(path).map_err(|e| CurveError::io(path, e))?;
    write_series_csv_to(file, series)
}

pub fn write_series_csv_to<W: Write>(writer: W, series: &TimeSeries) -> Result<(), CurveError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "value"])?;
    for s in series.samples() {
        wtr.write_record([
            s.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.value.to_string(),
        ])?;
    }
    wtr.flush().map_err(|e| CurveError::io("<csv output>", e))?;
    Ok(())
}
