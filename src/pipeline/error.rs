//! Error types for the feature analysis pipeline.
//!
//! Every failure is terminal for the call that raised it. Nothing in the
//! pipeline retries or returns partial results.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while pruning, fitting or scoring features.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Row count mismatch between features and target, or an empty matrix.
    #[error("dimension error: {0}")]
    DimensionError(String),

    /// Target has zero variance, so R² is undefined.
    #[error("target '{target}' has zero variance; R² is undefined")]
    DegenerateTarget {
        /// Name of the target, or `"<anonymous>"` when fitting raw vectors
        target: String,
    },

    /// Requested target or feature is not a column of the dataset.
    #[error("column '{column}' not found. Available columns: {available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// The regression design matrix is rank deficient.
    #[error("singular design matrix when fitting columns {columns:?}")]
    SingularMatrix {
        /// Feature columns being fit when the solver failed (empty if unnamed)
        columns: Vec<String>,
    },

    /// Column cannot be used as numeric input.
    #[error("column '{column}' is not usable: {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Correlation threshold outside [0, 1].
    #[error("correlation threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),

    /// A leave-one-out fit failed; `column` is the feature that was withheld.
    #[error("isolation fit without '{column}' failed: {source}")]
    IsolationFailed {
        column: String,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl AnalysisError {
    /// Fill in the column subset on a `SingularMatrix` error raised by an
    /// unnamed fit. Other variants pass through untouched.
    pub fn with_columns(self, names: &[String]) -> Self {
        match self {
            AnalysisError::SingularMatrix { columns } if columns.is_empty() => {
                AnalysisError::SingularMatrix {
                    columns: names.to_vec(),
                }
            }
            other => other,
        }
    }

    /// Tag an error with the name of the target column.
    pub fn with_target(self, name: &str) -> Self {
        match self {
            AnalysisError::DegenerateTarget { .. } => AnalysisError::DegenerateTarget {
                target: name.to_string(),
            },
            other => other,
        }
    }

    /// Unwrap `IsolationFailed` layers down to the underlying cause.
    pub fn root_cause(&self) -> &AnalysisError {
        match self {
            AnalysisError::IsolationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
