//! Coefficient of determination for a linear fit

use faer::Mat;

use super::error::{AnalysisError, Result};
use super::regression::{OrdinaryLeastSquares, Predictor, Regressor};

/// Placeholder target name for errors raised on raw vectors
const ANONYMOUS_TARGET: &str = "<anonymous>";

/// R² of an ordinary least squares fit of `y` on `x`.
///
/// # Errors
/// * `DimensionError` - zero rows, zero columns, or row count mismatch
/// * `DegenerateTarget` - `y` is constant
/// * `SingularMatrix` - the columns of `x` are linearly dependent
pub fn r_squared(x: &Mat<f64>, y: &[f64]) -> Result<f64> {
    r_squared_with(&OrdinaryLeastSquares::default(), x, y)
}

/// R² using any regression collaborator
pub fn r_squared_with<R: Regressor>(regressor: &R, x: &Mat<f64>, y: &[f64]) -> Result<f64> {
    check_dimensions(x, y)?;
    // guard before fitting so a constant target never reaches the solver
    total_sum_of_squares(y)?;

    score_fit(regressor, x, y)
}

/// Fit, predict in-sample and score, without the feature-count check.
///
/// Leave-one-out scoring uses this for the empty design left after
/// withholding the only feature, where the collaborator's zero-feature model
/// (the mean, for OLS with an intercept) is the right baseline.
pub(crate) fn score_fit<R: Regressor>(regressor: &R, x: &Mat<f64>, y: &[f64]) -> Result<f64> {
    let model = regressor.fit(x, y)?;
    let y_hat = model.predict(x)?;
    r_squared_from_predictions(y, &y_hat)
}

/// 1 - RSS / TSS for a set of predictions
pub fn r_squared_from_predictions(y: &[f64], y_hat: &[f64]) -> Result<f64> {
    if y.len() != y_hat.len() {
        return Err(AnalysisError::DimensionError(format!(
            "{} targets but {} predictions",
            y.len(),
            y_hat.len()
        )));
    }

    let tss = total_sum_of_squares(y)?;
    let rss: f64 = y
        .iter()
        .zip(y_hat.iter())
        .map(|(actual, predicted)| (actual - predicted).powi(2))
        .sum();

    Ok(1.0 - rss / tss)
}

/// R² of the model with no features. It always predicts the mean, so this is 0
/// whenever R² is defined at all.
pub fn intercept_only_r_squared(y: &[f64]) -> Result<f64> {
    if y.is_empty() {
        return Err(AnalysisError::DimensionError(
            "target has zero rows".to_string(),
        ));
    }
    total_sum_of_squares(y)?;
    Ok(0.0)
}

fn check_dimensions(x: &Mat<f64>, y: &[f64]) -> Result<()> {
    if x.nrows() == 0 || y.is_empty() {
        return Err(AnalysisError::DimensionError(
            "feature matrix and target must have at least one row".to_string(),
        ));
    }
    if x.ncols() == 0 {
        return Err(AnalysisError::DimensionError(
            "feature matrix has no columns".to_string(),
        ));
    }
    if x.nrows() != y.len() {
        return Err(AnalysisError::DimensionError(format!(
            "feature matrix has {} rows but target has {}",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}

/// TSS = sum((y - mean)^2), failing when it is zero
fn total_sum_of_squares(y: &[f64]) -> Result<f64> {
    if y.is_empty() {
        return Err(AnalysisError::DimensionError(
            "target has zero rows".to_string(),
        ));
    }

    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let tss: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();

    // rounding in the mean leaves a constant series with a tiny nonzero TSS,
    // on the scale of the values themselves
    let max_abs = y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let noise = 4.0 * f64::EPSILON * max_abs;
    if tss <= y.len() as f64 * noise * noise || !tss.is_finite() {
        return Err(AnalysisError::DegenerateTarget {
            target: ANONYMOUS_TARGET.to_string(),
        });
    }
    Ok(tss)
}
