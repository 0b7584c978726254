//! Linear regression collaborator
//!
//! Fitting is behind the [`Regressor`] / [`Predictor`] pair so any linear
//! least squares implementation can be swapped in. The default
//! [`OrdinaryLeastSquares`] solves the centered least squares problem with a
//! faer SVD and refuses rank-deficient designs instead of returning an
//! arbitrary solution.

use faer::Mat;

use super::error::{AnalysisError, Result};

/// Singular values below this fraction of the largest one mark the design as
/// rank deficient. Columns are scaled to unit norm first, so the test does not
/// depend on the units of the features.
const RANK_TOLERANCE: f64 = 1e-10;

/// A fitted model that maps a feature matrix to predictions
pub trait Predictor: Send + Sync {
    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>>;
}

/// Fits a [`Predictor`] to a feature matrix and target vector
pub trait Regressor: Send + Sync {
    type Model: Predictor;

    fn fit(&self, x: &Mat<f64>, y: &[f64]) -> Result<Self::Model>;
}

/// Ordinary least squares, optionally with an intercept term
#[derive(Debug, Clone, Copy)]
pub struct OrdinaryLeastSquares {
    pub fit_intercept: bool,
}

impl Default for OrdinaryLeastSquares {
    fn default() -> Self {
        Self {
            fit_intercept: true,
        }
    }
}

impl OrdinaryLeastSquares {
    pub fn new(fit_intercept: bool) -> Self {
        Self { fit_intercept }
    }
}

/// y_hat = intercept + x * coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Predictor for LinearModel {
    fn predict(&self, x: &Mat<f64>) -> Result<Vec<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(AnalysisError::DimensionError(format!(
                "model has {} coefficients but matrix has {} columns",
                self.coefficients.len(),
                x.ncols()
            )));
        }

        Ok((0..x.nrows())
            .map(|i| {
                self.coefficients
                    .iter()
                    .enumerate()
                    .fold(self.intercept, |acc, (j, beta)| acc + x[(i, j)] * beta)
            })
            .collect())
    }
}

impl Regressor for OrdinaryLeastSquares {
    type Model = LinearModel;

    /// Minimize |Xc beta - yc|, where Xc and yc are centered when an
    /// intercept is fit. The intercept is then mean(y) - mean(X) . beta.
    ///
    /// A design with zero columns is allowed and yields the mean model.
    fn fit(&self, x: &Mat<f64>, y: &[f64]) -> Result<LinearModel> {
        let n = x.nrows();
        let k = x.ncols();

        if n == 0 {
            return Err(AnalysisError::DimensionError(
                "cannot fit a model with zero rows".to_string(),
            ));
        }
        if y.len() != n {
            return Err(AnalysisError::DimensionError(format!(
                "feature matrix has {} rows but target has {}",
                n,
                y.len()
            )));
        }

        let (x_means, y_mean) = if self.fit_intercept {
            let x_means: Vec<f64> = (0..k)
                .map(|j| (0..n).map(|i| x[(i, j)]).sum::<f64>() / n as f64)
                .collect();
            (x_means, y.iter().sum::<f64>() / n as f64)
        } else {
            (vec![0.0; k], 0.0)
        };

        if k == 0 {
            return Ok(LinearModel {
                intercept: y_mean,
                coefficients: Vec::new(),
            });
        }

        let xc = Mat::from_fn(n, k, |i, j| x[(i, j)] - x_means[j]);
        let yc: Vec<f64> = y.iter().map(|v| v - y_mean).collect();
        let magnitudes: Vec<f64> = (0..k)
            .map(|j| (0..n).map(|i| x[(i, j)].abs()).fold(0.0, f64::max))
            .collect();

        let coefficients = solve_least_squares(&xc, &yc, &magnitudes)?;
        let intercept = y_mean
            - x_means
                .iter()
                .zip(coefficients.iter())
                .map(|(m, b)| m * b)
                .sum::<f64>();

        Ok(LinearModel {
            intercept,
            coefficients,
        })
    }
}

/// Least squares solve of `x beta = y` through a thin SVD.
///
/// Each column is scaled to unit norm before decomposing and the coefficients
/// are mapped back afterwards. `magnitudes` holds the largest absolute raw
/// value per column; a column whose norm is within rounding noise of that scale
/// is treated as empty (a constant column after centering).
///
/// Fails with an untagged `SingularMatrix` on an empty column, fewer rows than
/// columns, or a negligible singular value; callers attach the column names.
fn solve_least_squares(x: &Mat<f64>, y: &[f64], magnitudes: &[f64]) -> Result<Vec<f64>> {
    let n = x.nrows();
    let k = x.ncols();
    let singular = || AnalysisError::SingularMatrix {
        columns: Vec::new(),
    };

    if n < k {
        return Err(singular());
    }

    let norms: Vec<f64> = (0..k)
        .map(|j| (0..n).map(|i| x[(i, j)] * x[(i, j)]).sum::<f64>().sqrt())
        .collect();
    let noise = 4.0 * f64::EPSILON * (n as f64).sqrt();
    let empty = norms
        .iter()
        .zip(magnitudes.iter())
        .any(|(&norm, &scale)| norm == 0.0 || !norm.is_finite() || norm <= noise * scale);
    if empty {
        return Err(singular());
    }

    let scaled = Mat::from_fn(n, k, |i, j| x[(i, j)] / norms[j]);
    let svd = scaled.thin_svd();
    let u = svd.u();
    let v = svd.v();
    let s = svd.s_diagonal();

    let s_max = (0..k).map(|i| s[i]).fold(0.0_f64, f64::max);
    if s_max == 0.0 || (0..k).any(|i| s[i] <= s_max * RANK_TOLERANCE) {
        return Err(singular());
    }

    // beta_scaled = V * diag(1 / s) * U^T * y
    let projected: Vec<f64> = (0..k)
        .map(|c| (0..n).map(|i| u[(i, c)] * y[i]).sum::<f64>() / s[c])
        .collect();

    Ok((0..k)
        .map(|j| {
            let beta_scaled: f64 = (0..k).map(|c| v[(j, c)] * projected[c]).sum();
            beta_scaled / norms[j]
        })
        .collect())
}
