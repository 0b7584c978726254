//! Feature importance from the drop in R² when a feature is withheld

use polars::prelude::*;
use serde::Serialize;

use super::config::{AnalysisConfig, ScoringConfig};
use super::correlation::{pearson_correlation, reduce_excluding};
use super::dataset::{column_values, feature_columns, feature_matrix};
use super::error::{AnalysisError, Result};
use super::fit::r_squared_with;
use super::isolation::isolated_scores_with;
use super::regression::{OrdinaryLeastSquares, Regressor};

/// Importance of a single feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// R² of the model fit without this feature
    pub isolated_r_squared: f64,
    /// full R² - isolated R². Large positive values mean the fit depends on
    /// this feature; values near zero or below mean it is redundant given the
    /// others.
    pub importance: f64,
}

/// Per-feature importance scores in feature column order
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceVector {
    pub full_r_squared: f64,
    pub features: Vec<FeatureImportance>,
}

impl ImportanceVector {
    /// Combine the full R² with the isolated scores of `names`
    pub fn new(full_r_squared: f64, names: Vec<String>, isolated: Vec<f64>) -> Self {
        let features = names
            .into_iter()
            .zip(isolated)
            .map(|(feature, isolated_r_squared)| FeatureImportance {
                feature,
                isolated_r_squared,
                importance: full_r_squared - isolated_r_squared,
            })
            .collect();

        Self {
            full_r_squared,
            features,
        }
    }

    /// Importance score of a feature by name
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.feature == feature)
            .map(|f| f.importance)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureImportance> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features ordered by importance, highest first. Ties keep column order.
    pub fn ranked(&self) -> Vec<&FeatureImportance> {
        let mut ranked: Vec<&FeatureImportance> = self.features.iter().collect();
        ranked.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Importance of every non-target feature for predicting `target`
pub fn importance(df: &DataFrame, target: &str) -> Result<ImportanceVector> {
    importance_with(
        df,
        target,
        &OrdinaryLeastSquares::default(),
        &ScoringConfig::default(),
    )
}

/// [`importance`] with an explicit regressor and execution settings
pub fn importance_with<R: Regressor>(
    df: &DataFrame,
    target: &str,
    regressor: &R,
    config: &ScoringConfig,
) -> Result<ImportanceVector> {
    let features = feature_columns(df, target)?;
    let y = column_values(df, target)?;
    let x = feature_matrix(df, &features)?;

    let full_r_squared = r_squared_with(regressor, &x, &y)
        .map_err(|e| e.with_columns(&features).with_target(target))?;
    let isolated = isolated_scores_with(df, target, regressor, config)?;

    Ok(ImportanceVector::new(full_r_squared, features, isolated))
}

/// Signed Pearson correlation of every other column with the target, in
/// frame order. Model free, so much cheaper than [`importance`].
///
/// A constant feature has no defined correlation and reports 0.
pub fn target_correlations(df: &DataFrame, target: &str) -> Result<Vec<(String, f64)>> {
    let features = feature_columns(df, target)?;
    let y = column_values(df, target)?;

    if pearson_correlation(&y, &y).is_none() {
        return Err(AnalysisError::DegenerateTarget {
            target: target.to_string(),
        });
    }

    features
        .into_iter()
        .map(|name| {
            let values = column_values(df, &name)?;
            let corr = pearson_correlation(&values, &y).unwrap_or(0.0);
            Ok((name, corr))
        })
        .collect()
}

/// Result of the end-to-end analysis
#[derive(Debug, Clone, Serialize)]
pub struct FeatureAnalysis {
    pub target: String,
    /// Columns removed by redundancy pruning, in original order
    pub dropped: Vec<String>,
    pub importance: ImportanceVector,
    pub target_correlations: Vec<(String, f64)>,
}

/// Optionally prune redundant features, then score importance and target
/// correlations on what remains. The target is never pruned.
pub fn analyze(df: &DataFrame, target: &str, config: &AnalysisConfig) -> Result<FeatureAnalysis> {
    config.validate()?;
    let original = feature_columns(df, target)?;

    let reduced = match config.correlation_threshold {
        Some(threshold) => reduce_excluding(df, threshold, target)?,
        None => df.clone(),
    };

    let kept = feature_columns(&reduced, target)?;
    let dropped = original
        .into_iter()
        .filter(|name| !kept.contains(name))
        .collect();

    let regressor = OrdinaryLeastSquares::new(config.fit_intercept);
    let importance = importance_with(&reduced, target, &regressor, &config.scoring)?;
    let target_correlations = target_correlations(&reduced, target)?;

    Ok(FeatureAnalysis {
        target: target.to_string(),
        dropped,
        importance,
        target_correlations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_is_full_minus_isolated() {
        let v = ImportanceVector::new(
            0.9,
            vec!["a".to_string(), "b".to_string()],
            vec![0.5, 0.85],
        );

        assert!((v.get("a").unwrap() - 0.4).abs() < 1e-12);
        assert!((v.get("b").unwrap() - 0.05).abs() < 1e-12);
        assert!(v.get("c").is_none());
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_ranked_is_stable_on_ties() {
        let v = ImportanceVector::new(
            1.0,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![0.5, 0.0, 0.5],
        );
        let order: Vec<&str> = v.ranked().iter().map(|f| f.feature.as_str()).collect();

        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_target_correlations_constant_feature() {
        let df = df! {
            "flat" => [2.0f64, 2.0, 2.0, 2.0],
            "x" => [1.0f64, 2.0, 3.0, 4.0],
            "y" => [2.0f64, 4.0, 6.0, 8.0],
        }
        .unwrap();

        let corr = target_correlations(&df, "y").unwrap();
        assert_eq!(corr[0], ("flat".to_string(), 0.0));
        assert_eq!(corr[1].0, "x");
        assert!((corr[1].1 - 1.0).abs() < 1e-12);
    }
}
