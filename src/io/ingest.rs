//! CSV ingest for rating tables and gage series.
//!
//! This module turns exported spreadsheet tables into clean inputs:
//!
//! - **Named columns** located through a normalized header map (case and BOM
//!   insensitive), after skipping a fixed number of leading rows
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No curve logic here**: cleaning of duplicates/NaN `x` is left to
//!   `RatingCurve::build`

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;

use crate::curve::RatingCurve;
use crate::domain::{CurveAxes, CurvePoint, Sample, TimeSeries};
use crate::error::CurveError;

/// Which columns hold the curve, and how many junk rows precede the header.
#[derive(Debug, Clone)]
pub struct CurveCsvSpec {
    pub x_column: String,
    pub y_column: String,
    pub skip_rows: usize,
}

impl CurveCsvSpec {
    pub fn new(x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        Self {
            x_column: x_column.into(),
            y_column: y_column.into(),
            skip_rows: 0,
        }
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}

/// Which columns hold the gage timestamp and reading.
#[derive(Debug, Clone)]
pub struct GageCsvSpec {
    pub series_id: String,
    pub time_column: String,
    pub value_column: String,
}

impl GageCsvSpec {
    pub fn new(
        series_id: impl Into<String>,
        time_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            time_column: time_column.into(),
            value_column: value_column.into(),
        }
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the file.
    pub line: usize,
    pub message: String,
}

/// Curve ingest output: the built curve plus row accounting.
#[derive(Debug, Clone)]
pub struct CurveIngest {
    pub curve: RatingCurve,
    pub rows_read: usize,
    /// Rows with a parsed `(x, y)` handed to `RatingCurve::build`.
    pub rows_used: usize,
    pub row_errors: Vec<RowError>,
}

/// Gage ingest output: the NODATA-cleaned series plus row accounting.
#[derive(Debug, Clone)]
pub struct SeriesIngest {
    pub series: TimeSeries,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

pub fn read_curve_csv(path: &Path, spec: &CurveCsvSpec) -> Result<CurveIngest, CurveError> {
    let file = File::open(path).map_err(|e| CurveError::io(path, e))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "curve".to_string());
    let ingest = parse_curve_csv(file, spec)?;
    Ok(CurveIngest {
        curve: ingest.curve.with_name(name),
        ..ingest
    })
}

/// Parse a two-column curve table from any reader.
pub fn parse_curve_csv<R: Read>(reader: R, spec: &CurveCsvSpec) -> Result<CurveIngest, CurveError> {
    let mut reader = BufReader::new(reader);
    skip_lines(&mut reader, spec.skip_rows)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let header_map = build_header_map(&headers);
    let x_idx = column_index(&header_map, &spec.x_column)?;
    let y_idx = column_index(&header_map, &spec.y_column)?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        let line = spec.skip_rows + record_line(&result, idx);
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        // A blank x is a missing row, not an error.
        let Some(x_raw) = get_cell(&record, x_idx) else {
            continue;
        };
        match (parse_f64(x_raw, &spec.x_column), parse_required(&record, y_idx, &spec.y_column)) {
            (Ok(x), Ok(y)) => points.push(CurvePoint::new(x, y)),
            (Err(message), _) | (_, Err(message)) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        tracing::warn!(line = err.line, message = %err.message, "skipped curve row");
    }

    let rows_used = points.len();
    let curve = RatingCurve::build(points)?.with_axes(CurveAxes::new(
        spec.x_column.clone(),
        spec.y_column.clone(),
    ));

    Ok(CurveIngest {
        curve,
        rows_read,
        rows_used,
        row_errors,
    })
}

pub fn read_gage_csv(path: &Path, spec: &GageCsvSpec) -> Result<SeriesIngest, CurveError> {
    let file = File::open(path).map_err(|e| CurveError::io(path, e))?;
    parse_gage_csv(file, spec)
}

/// Parse a gage export (timestamp + reading columns) from any reader.
///
/// NODATA and blank readings are dropped; rows must already be in time order.
pub fn parse_gage_csv<R: Read>(reader: R, spec: &GageCsvSpec) -> Result<SeriesIngest, CurveError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let header_map = build_header_map(&headers);
    let t_idx = column_index(&header_map, &spec.time_column)?;
    let v_idx = column_index(&header_map, &spec.value_column)?;

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        let line = record_line(&result, idx);
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(value_raw) = get_cell(&record, v_idx) else {
            continue;
        };
        let parsed = get_cell(&record, t_idx)
            .ok_or_else(|| format!("Missing required value: `{}`", spec.time_column))
            .and_then(parse_timestamp)
            .and_then(|t| parse_f64(value_raw, &spec.value_column).map(|v| Sample::new(t, v)));

        match parsed {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        tracing::warn!(line = err.line, message = %err.message, "skipped gage row");
    }

    let series = TimeSeries::from_raw(spec.series_id.clone(), samples)?;
    Ok(SeriesIngest {
        series,
        rows_read,
        row_errors,
    })
}

/// Parse a gage timestamp as UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS+HH:MM`, and offset-less
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (taken as UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(t.with_timezone(&Utc));
    }
    const NAIVE_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in NAIVE_FMTS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t.and_utc());
        }
    }
    Err(format!(
        "Invalid timestamp '{s}'. Expected RFC 3339 or YYYY-MM-DD HH:MM:SS[+HH:MM]."
    ))
}

fn skip_lines<R: BufRead>(reader: &mut R, n: usize) -> Result<(), CurveError> {
    let mut buf = String::new();
    for _ in 0..n {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| CurveError::io("<csv input>", e))?;
        if read == 0 {
            break;
        }
    }
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel CSV exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, column: &str) -> Result<usize, CurveError> {
    header_map
        .get(&normalize_header_name(column))
        .copied()
        .ok_or_else(|| CurveError::MissingColumn {
            column: column.to_string(),
        })
}

/// 1-based line where a record starts, counted from the reader's first line.
///
/// Quoted fields may span lines, so the reader's own position is preferred
/// over the record index.
fn record_line(result: &Result<StringRecord, csv::Error>, idx: usize) -> usize {
    let position = match result {
        Ok(record) => record.position(),
        Err(e) => e.position(),
    };
    // Fallback: header line, then 1-based numbering.
    position.map_or(idx + 2, |p| p.line() as usize)
}

fn get_cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_required(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = get_cell(record, idx).ok_or_else(|| format!("Missing required value: `{name}`"))?;
    parse_f64(raw, name)
}

fn parse_f64(raw: &str, name: &str) -> Result<f64, String> {
    // Spreadsheet exports keep thousands separators on volumes.
    let cleaned = raw.replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{raw}' in `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DISCHARGE_SHEET: &str = "\
LAKE DISCHARGE CALCULATOR,,
prepared for city,,
Elevation (ft NAVD88),Gates,Q (CFS)
1340.0,0,0
1341.0,0,12.5
1341.0,1,99
,0,5
1342.0,0,\"1,250.75\"
oops,0,3
";

    #[test]
    fn curve_csv_skips_rows_and_dedups() {
        let spec = CurveCsvSpec::new("elevation (ft navd88)", "Q (CFS)").with_skip_rows(2);
        let ingest = parse_curve_csv(DISCHARGE_SHEET.as_bytes(), &spec).unwrap();

        assert_eq!(ingest.rows_read, 6);
        assert_eq!(ingest.rows_used, 4);
        assert_eq!(ingest.curve.len(), 3);
        assert_eq!(ingest.curve.lookup_nearest(1341.2), 12.5);
        assert_eq!(ingest.curve.last(), CurvePoint::new(1342.0, 1250.75));
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 9);
        assert_eq!(ingest.curve.axes().y, "Q (CFS)");
    }

    #[test]
    fn curve_csv_strips_bom_from_header() {
        let spec = CurveCsvSpec::new("Elevation (ft)", "Storage (ac-ft)");
        let csv = "\u{feff}Elevation (ft),Storage (ac-ft)\n1340.0,100\n1341.0,150\n";
        let ingest = parse_curve_csv(csv.as_bytes(), &spec).unwrap();
        assert_eq!(ingest.curve.len(), 2);
    }

    #[test]
    fn curve_csv_missing_column() {
        let spec = CurveCsvSpec::new("Elevation (ft)", "Storage (ac-ft)");
        let err = parse_curve_csv("Elevation (ft),Volume\n1,2\n".as_bytes(), &spec).unwrap_err();
        assert!(matches!(err, CurveError::MissingColumn { ref column } if column == "Storage (ac-ft)"));
    }

    #[test]
    fn curve_csv_all_rows_bad_is_empty_curve() {
        let spec = CurveCsvSpec::new("x", "y");
        let err = parse_curve_csv("x,y\n,1\n,2\n".as_bytes(), &spec).unwrap_err();
        assert!(matches!(err, CurveError::EmptyCurve));
    }

    #[test]
    fn gage_csv_parses_offsets_and_drops_nodata() {
        let csv = "\
agency_cd,datetime,\"Gage height, feet\"
USGS,2024-01-01 00:00:00+00:00,1341.20
USGS,2024-01-01 00:15:00+00:00,-3.4028235e38
USGS,2024-01-01 00:30:00+00:00,
USGS,2024-01-01 00:45:00+00:00,1341.25
";
        let spec = GageCsvSpec::new("lawtonka", "datetime", "Gage height, feet");
        let ingest = parse_gage_csv(csv.as_bytes(), &spec).unwrap();
        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.series.len(), 2);
        assert_eq!(
            ingest.series.start(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(ingest.row_errors.is_empty());
    }

    #[test]
    fn gage_csv_reports_bad_timestamp() {
        let csv = "datetime,value\nyesterday,1.0\n2024-01-01T00:00:00Z,2.0\n";
        let spec = GageCsvSpec::new("g", "datetime", "value");
        let ingest = parse_gage_csv(csv.as_bytes(), &spec).unwrap();
        assert_eq!(ingest.series.len(), 1);
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 2);
    }

    #[test]
    fn row_lines_follow_multiline_quoted_fields() {
        let csv = "x,note,y\n1,\"first\nsecond\",10\noops,c,3\n";
        let ingest = parse_curve_csv(csv.as_bytes(), &CurveCsvSpec::new("x", "y")).unwrap();
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 4);

        let ingest =
            parse_curve_csv(format!("junk\n{csv}").as_bytes(), &CurveCsvSpec::new("x", "y").with_skip_rows(1))
                .unwrap();
        assert_eq!(ingest.row_errors[0].line, 5);

        let gage = "datetime,note,value\n2024-01-01T00:00:00Z,\"a\nb\nc\",1.0\nyesterday,x,2.0\n";
        let ingest = parse_gage_csv(gage.as_bytes(), &GageCsvSpec::new("g", "datetime", "value")).unwrap();
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 5);
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 18, 6, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-06-18T06:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-18 01:30:00-05:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-06-18 06:30:00").unwrap(), expected);
        assert!(parse_timestamp("18/06/2025").is_err());
    }
}
