//! Correlation matrix and redundancy pruning

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::config::validate_threshold;
use super::dataset::{column_names, columns_values, ensure_column};
use super::error::{AnalysisError, Result};

/// Represents a correlated pair of columns
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Square, symmetric matrix of Pearson correlations keyed by column name.
///
/// The diagonal is exactly 1. Pairs involving a zero-variance column are
/// undefined and stored as 0.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    /// Correlation matrix over every column of the frame
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let names = column_names(df);
        Self::for_columns(df, &names)
    }

    /// Correlation matrix over the named columns, in the given order
    pub fn for_columns(df: &DataFrame, names: &[String]) -> Result<Self> {
        for name in names {
            ensure_column(df, name)?;
        }
        let values = columns_values(df, names)?;
        Self::from_columns(names.to_vec(), &values)
    }

    /// Compute the matrix from raw column data.
    ///
    /// Algorithm:
    /// 1. Standardize each column: z = (x - mean) / (std * sqrt(n))
    /// 2. R = Z^T * Z
    ///
    /// Population moments are used throughout, so R matches the pairwise
    /// Pearson coefficient.
    pub fn from_columns(names: Vec<String>, columns: &[Vec<f64>]) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(AnalysisError::DimensionError(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }

        let n_cols = columns.len();
        let n_rows = columns.first().map_or(0, |c| c.len());
        if let Some((i, _)) = columns.iter().enumerate().find(|(_, c)| c.len() != n_rows) {
            return Err(AnalysisError::DimensionError(format!(
                "column '{}' has {} rows, expected {}",
                names[i],
                columns[i].len(),
                n_rows
            )));
        }

        let standardized: Vec<Vec<f64>> = columns.iter().map(|c| standardize(c)).collect();
        let z = Mat::from_fn(n_rows, n_cols, |i, j| standardized[j][i]);

        let mut values = z.transpose() * &z;
        for i in 0..n_cols {
            for j in 0..n_cols {
                values[(i, j)] = if i == j {
                    1.0
                } else {
                    values[(i, j)].clamp(-1.0, 1.0)
                };
            }
        }

        Ok(Self {
            columns: names,
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Correlation by position; indices come from this matrix's own columns
    pub(crate) fn value(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Correlation by column name
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.value(i, j))
    }

    /// Matrix of absolute correlations
    pub fn abs(&self) -> Self {
        let n = self.len();
        Self {
            columns: self.columns.clone(),
            values: Mat::from_fn(n, n, |i, j| self.values[(i, j)].abs()),
        }
    }

    /// Upper-triangle pairs with |corr| above the threshold, strongest first
    pub fn correlated_pairs(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.len();
        let mut pairs = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                let corr = self.value(i, j);
                if corr.abs() > threshold {
                    pairs.push(CorrelatedPair {
                        feature1: self.columns[i].clone(),
                        feature2: self.columns[j].clone(),
                        correlation: corr,
                    });
                }
            }
        }

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        pairs
    }
}

/// Scale a column so that dot products of two scaled columns give Pearson r.
/// Constant columns become all zeros. Constancy is judged against the rounding
/// noise of the column's own magnitude, so tiny-valued columns still count.
fn standardize(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
    let std = var.sqrt();
    let max_abs = values.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

    if std <= rounding_noise(max_abs) {
        return vec![0.0; n];
    }

    let scale = std * (n as f64).sqrt();
    values.iter().map(|x| (x - mean) / scale).collect()
}

/// Pearson correlation of two equal-length series.
///
/// Single-pass Welford update for numerical stability. Returns `None` when
/// either series has zero variance or the lengths differ.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;
    let mut max_abs_x = 0.0_f64;
    let mut max_abs_y = 0.0_f64;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        count += 1.0;
        max_abs_x = max_abs_x.max(xi.abs());
        max_abs_y = max_abs_y.max(yi.abs());
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (xi - mean_x);
        var_y += dy * (yi - mean_y);
        cov_xy += dx * (yi - mean_y);
    }

    let std_x = (var_x / count).sqrt();
    let std_y = (var_y / count).sqrt();
    if std_x <= rounding_noise(max_abs_x) || std_y <= rounding_noise(max_abs_y) {
        return None;
    }

    Some((cov_xy / (count * std_x * std_y)).clamp(-1.0, 1.0))
}

/// Spread left behind in a constant series of magnitude `max_abs` by rounding
fn rounding_noise(max_abs: f64) -> f64 {
    4.0 * f64::EPSILON * max_abs
}

/// Columns to drop: every column j with |corr(i, j)| > threshold for some
/// earlier column i, judged against the full matrix in a single pass.
pub fn columns_to_drop(matrix: &CorrelationMatrix, threshold: f64) -> Vec<String> {
    (0..matrix.len())
        .filter(|&j| (0..j).any(|i| matrix.value(i, j).abs() > threshold))
        .map(|j| matrix.columns()[j].clone())
        .collect()
}

/// Remove columns that are highly correlated with an earlier column.
///
/// Returns a new frame with the surviving columns in their original order;
/// the input is not modified.
pub fn reduce(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    validate_threshold(threshold)?;
    let matrix = CorrelationMatrix::compute(df)?;
    let to_drop = columns_to_drop(&matrix, threshold);
    select_without(df, &to_drop)
}

/// Like [`reduce`], but `protected` takes no part in the analysis.
///
/// The protected column (normally the regression target) is never dropped and
/// never causes another column to be dropped. It keeps its position.
pub fn reduce_excluding(df: &DataFrame, threshold: f64, protected: &str) -> Result<DataFrame> {
    validate_threshold(threshold)?;
    ensure_column(df, protected)?;

    let candidates: Vec<String> = column_names(df)
        .into_iter()
        .filter(|name| name != protected)
        .collect();
    let matrix = CorrelationMatrix::for_columns(df, &candidates)?;
    let to_drop = columns_to_drop(&matrix, threshold);
    select_without(df, &to_drop)
}

fn select_without(df: &DataFrame, to_drop: &[String]) -> Result<DataFrame> {
    let keep: Vec<String> = column_names(df)
        .into_iter()
        .filter(|name| !to_drop.contains(name))
        .collect();
    Ok(df.select(keep.iter().map(|s| s.as_str()))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![5.0, 3.0, 4.0, 1.0, 2.0],
            vec![2.0, 2.0, 2.0, 2.0, 2.0],
        ];
        let m = CorrelationMatrix::from_columns(names(&["a", "b", "c"]), &cols).unwrap();

        for i in 0..3 {
            assert_eq!(m.value(i, i), 1.0);
            for j in 0..3 {
                assert!((m.value(i, j) - m.value(j, i)).abs() < 1e-12);
                assert!(m.value(i, j).abs() <= 1.0);
            }
        }
        // constant column has no defined correlation
        assert_eq!(m.get("a", "c"), Some(0.0));
    }

    #[test]
    fn test_matrix_matches_pairwise() {
        let a = vec![1.0, 5.0, 2.0, 8.0, 3.0, 7.0];
        let b = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0];
        let m = CorrelationMatrix::from_columns(names(&["a", "b"]), &[a.clone(), b.clone()])
            .unwrap();
        let pairwise = pearson_correlation(&a, &b).unwrap();

        assert!((m.value(0, 1) - pairwise).abs() < 1e-10);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_none() {
        assert!(pearson_correlation(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).is_none());
        assert!(pearson_correlation(&[], &[]).is_none());
    }

    #[test]
    fn test_columns_to_drop_uses_full_matrix() {
        // |r(a,b)| ~ 0.745, |r(b,c)| ~ 0.667, r(a,c) = 0. Dropping b must not
        // rescue c: the decision for c still sees b.
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 1.0, 2.0, 5.0],
            vec![1.0, -1.0, -1.0, 1.0],
        ];
        let m = CorrelationMatrix::from_columns(names(&["a", "b", "c"]), &cols).unwrap();
        assert!(m.value(0, 2).abs() < 1e-12);
        assert_eq!(columns_to_drop(&m, 0.6), vec!["b", "c"]);
    }

    #[test]
    fn test_correlated_pairs_sorted() {
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0],
            vec![1.0, 3.0, 2.0, 5.0, 4.0],
        ];
        let m = CorrelationMatrix::from_columns(names(&["a", "b", "c"]), &cols).unwrap();
        let pairs = m.correlated_pairs(0.5);

        assert_eq!(pairs[0].feature1, "a");
        assert_eq!(pairs[0].feature2, "b");
        for w in pairs.windows(2) {
            assert!(w[0].correlation.abs() >= w[1].correlation.abs());
        }
    }

    #[test]
    fn test_abs_matrix() {
        let cols = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        let m = CorrelationMatrix::from_columns(names(&["a", "b"]), &cols)
            .unwrap()
            .abs();
        assert!((m.value(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_scale_columns_are_not_constant() {
        let a = [1e-17, 2e-17, 3e-17, 4e-17];
        let b: Vec<f64> = a.iter().map(|v| 2.0 * v).collect();

        let r = pearson_correlation(&a, &b).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let m = CorrelationMatrix::from_columns(names(&["a", "b"]), &[a.to_vec(), b]).unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rounded_constant_is_none() {
        let x = [0.1; 7];
        assert!(pearson_correlation(&x, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).is_none());
    }

    #[test]
    fn test_reduce_drops_tiny_scale_duplicate() {
        let df = df! {
            "a" => [1e-17f64, 2e-17, 3e-17, 4e-17],
            "b" => [2e-17f64, 4e-17, 6e-17, 8e-17],
            "y" => [1.0f64, 2.0, 3.0, 4.0],
        }
        .unwrap();

        let reduced = reduce_excluding(&df, 0.99, "y").unwrap();
        assert_eq!(column_names(&reduced), vec!["a", "y"]);
    }
}
