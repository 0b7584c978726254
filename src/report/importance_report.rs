//! JSON importance report
//!
//! Serializes a feature analysis together with the settings that produced it.
//! Writing the document anywhere is left to the caller.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AnalysisConfig, ExecutionMode, FeatureAnalysis};

/// Settings used in the analysis
#[derive(Debug, Clone, Serialize)]
pub struct ReportSettings {
    pub target_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_threshold: Option<f64>,
    pub fit_intercept: bool,
    pub execution: ExecutionMode,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub rsquared_version: String,
    pub settings: ReportSettings,
}

/// Single feature entry in the report
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReportEntry {
    pub name: String,
    pub rank: usize,
    pub isolated_r_squared: f64,
    pub importance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_correlation: Option<f64>,
}

/// Complete importance report
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceReport {
    pub metadata: ReportMetadata,
    pub full_r_squared: f64,
    pub features: Vec<FeatureReportEntry>,
    pub dropped_redundant: Vec<String>,
}

impl ImportanceReport {
    /// Build a report; features keep column order and carry their rank
    pub fn new(analysis: &FeatureAnalysis, config: &AnalysisConfig) -> Self {
        let ranked = analysis.importance.ranked();

        let features = analysis
            .importance
            .iter()
            .map(|entry| {
                let rank = ranked
                    .iter()
                    .position(|r| r.feature == entry.feature)
                    .map_or(0, |p| p + 1);
                let target_correlation = analysis
                    .target_correlations
                    .iter()
                    .find(|(name, _)| name == &entry.feature)
                    .map(|(_, c)| *c);

                FeatureReportEntry {
                    name: entry.feature.clone(),
                    rank,
                    isolated_r_squared: entry.isolated_r_squared,
                    importance: entry.importance,
                    target_correlation,
                }
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                rsquared_version: env!("CARGO_PKG_VERSION").to_string(),
                settings: ReportSettings {
                    target_column: analysis.target.clone(),
                    correlation_threshold: config.correlation_threshold,
                    fit_intercept: config.fit_intercept,
                    execution: config.scoring.execution,
                },
            },
            full_r_squared: analysis.importance.full_r_squared,
            features,
            dropped_redundant: analysis.dropped.clone(),
        }
    }

    /// Pretty-printed JSON document
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize importance report to JSON")
    }
}
