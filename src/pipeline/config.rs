//! Configuration for isolation scoring and the end-to-end analysis

use serde::Serialize;

use super::error::{AnalysisError, Result};

/// How the leave-one-out fits are executed
///
/// Each fit is independent, so the parallel mode only has to collect results
/// back in column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One fit after another on the calling thread
    #[default]
    Sequential,
    /// Fits distributed over the rayon thread pool
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Parallel => write!(f, "parallel"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecutionMode::Sequential),
            "parallel" | "par" => Ok(ExecutionMode::Parallel),
            _ => Err(format!(
                "Unknown execution mode: '{}'. Use 'sequential' or 'parallel'.",
                s
            )),
        }
    }
}

/// Settings for leave-one-feature-out scoring
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringConfig {
    pub execution: ExecutionMode,
    /// Draw an indicatif progress bar while fitting
    pub show_progress: bool,
}

impl ScoringConfig {
    pub fn parallel() -> Self {
        Self {
            execution: ExecutionMode::Parallel,
            ..Default::default()
        }
    }
}

/// Settings for [`analyze`](super::analyze)
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Prune redundant columns above this absolute correlation first.
    /// `None` skips pruning.
    pub correlation_threshold: Option<f64>,
    pub scoring: ScoringConfig,
    /// Fit an intercept term in the linear model
    pub fit_intercept: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: None,
            scoring: ScoringConfig::default(),
            fit_intercept: true,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.correlation_threshold {
            validate_threshold(threshold)?;
        }
        Ok(())
    }
}

/// Reject thresholds outside [0, 1] (NaN included)
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidThreshold(threshold))
    }
}
