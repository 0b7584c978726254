//! Leave-one-feature-out R² scoring
//!
//! For K features this performs K full model fits, which dominates the cost
//! of the whole analysis. The fits share no state, so [`ExecutionMode::Parallel`]
//! spreads them over the rayon pool and collects results back in column order.

use polars::prelude::*;
use rayon::prelude::*;

use super::config::{ExecutionMode, ScoringConfig};
use super::dataset::{column_values, columns_values, feature_columns, matrix_from_columns};
use super::error::{AnalysisError, Result};
use super::fit::{intercept_only_r_squared, r_squared_with, score_fit};
use super::regression::{OrdinaryLeastSquares, Regressor};
use crate::utils::{create_fit_progress, finish_with_failure, finish_with_success};

/// R² of the model fit without each feature, aligned with the feature columns
/// (every column except `target`, in frame order).
pub fn isolated_scores(df: &DataFrame, target: &str) -> Result<Vec<f64>> {
    isolated_scores_with(
        df,
        target,
        &OrdinaryLeastSquares::default(),
        &ScoringConfig::default(),
    )
}

/// [`isolated_scores`] with an explicit regressor and execution settings.
///
/// Either every score is returned or the call fails as a whole. Failures are
/// wrapped in `IsolationFailed` naming the withheld column; when several fits
/// fail, the earliest column is reported regardless of execution mode.
pub fn isolated_scores_with<R: Regressor>(
    df: &DataFrame,
    target: &str,
    regressor: &R,
    config: &ScoringConfig,
) -> Result<Vec<f64>> {
    let features = feature_columns(df, target)?;
    let y = column_values(df, target)?;
    let columns = columns_values(df, &features)?;

    // Constant or empty targets fail every fit the same way; report once.
    intercept_only_r_squared(&y).map_err(|e| e.with_target(target))?;

    let job = IsolationJob {
        target,
        features: &features,
        columns: &columns,
        y: &y,
        n_rows: df.height(),
        regressor,
    };

    let pb = create_fit_progress(
        features.len() as u64,
        "Fitting without each feature",
        config.show_progress,
    );

    let results: Vec<Result<f64>> = match config.execution {
        ExecutionMode::Sequential => {
            let mut results = Vec::with_capacity(features.len());
            for skip in 0..features.len() {
                let result = job.fit_without(skip);
                pb.inc(1);
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        }
        ExecutionMode::Parallel => (0..features.len())
            .into_par_iter()
            .map(|skip| {
                let result = job.fit_without(skip);
                pb.inc(1);
                result
            })
            .collect(),
    };

    let scores: Result<Vec<f64>> = results.into_iter().collect();
    match &scores {
        Ok(s) => finish_with_success(&pb, &format!("Scored {} features", s.len())),
        Err(e) => finish_with_failure(&pb, &e.to_string()),
    }
    scores
}

/// Shared, read-only inputs for the individual fits
struct IsolationJob<'a, R> {
    target: &'a str,
    features: &'a [String],
    columns: &'a [Vec<f64>],
    y: &'a [f64],
    n_rows: usize,
    regressor: &'a R,
}

impl<R: Regressor> IsolationJob<'_, R> {
    fn fit_without(&self, skip: usize) -> Result<f64> {
        let (names, slices): (Vec<String>, Vec<&[f64]>) = self
            .features
            .iter()
            .zip(self.columns.iter())
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, (name, values))| (name.clone(), values.as_slice()))
            .unzip();

        let score = matrix_from_columns(&slices, self.n_rows).and_then(|x| {
            if slices.is_empty() {
                score_fit(self.regressor, &x, self.y)
            } else {
                r_squared_with(self.regressor, &x, self.y)
            }
        });

        score.map_err(|e| AnalysisError::IsolationFailed {
            column: self.features[skip].clone(),
            source: Box::new(e.with_columns(&names).with_target(self.target)),
        })
    }
}
