//! Error type shared by every fallible operation in the crate.
//!
//! Errors are raised where they are detected and propagated with `?`. There
//! are no partial results.

use std::path::PathBuf;

/// Error type for all fallible operations in the `rating-curves` crate.
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// Curve construction left zero usable points after cleaning.
    #[error("curve has no usable points after cleaning")]
    EmptyCurve,

    /// Tail extrapolation needs two points with distinct `x`.
    #[error("cannot extrapolate a degenerate curve ({len} points or zero-width last segment)")]
    DegenerateCurve {
        /// Number of points in the curve.
        len: usize,
    },

    /// Extrapolation step must be finite and strictly positive.
    #[error("extrapolation step must be finite and > 0, got {step}")]
    InvalidStep {
        /// The rejected step.
        step: f64,
    },

    /// Tail extension would append more points than allowed.
    #[error("extrapolation needs {steps} steps, more than the limit of {limit}")]
    TailTooLong {
        /// Steps required to reach the target.
        steps: f64,
        /// Maximum appended points.
        limit: usize,
    },

    /// Extrapolation target must be finite.
    #[error("extrapolation target must be finite, got {target}")]
    NonFiniteTarget {
        /// The rejected target.
        target: f64,
    },

    /// A join was attempted on an empty series.
    #[error("input series is empty")]
    EmptyInput,

    /// Series timestamps must strictly increase.
    #[error("timestamp at index {index} does not strictly increase")]
    UnorderedTimestamps {
        /// Index of the first offending sample.
        index: usize,
    },

    /// Paired time/value slices differ in length.
    #[error("times length {times} does not match values length {values}")]
    LengthMismatch {
        /// Number of timestamps.
        times: usize,
        /// Number of values.
        values: usize,
    },

    /// Epoch seconds outside the representable range.
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp {
        /// The raw timestamp that failed to convert.
        value: String,
    },

    /// A container pathname that is not `/A/B/C/D/E/F/`.
    #[error("invalid pathname '{pathname}': {reason}")]
    InvalidPathname {
        /// The rejected pathname.
        pathname: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A CSV header does not contain a required column.
    #[error("missing required column: `{column}`")]
    MissingColumn {
        /// Column name as requested.
        column: String,
    },

    /// File open/create failure.
    #[error("failed to access '{}': {}", .path.display(), .source)]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// CSV read/write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read/write failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid workflow configuration.
    #[error("invalid configuration: {message}")]
    Config {
        /// What was wrong with it.
        message: String,
    },
}

impl CurveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
