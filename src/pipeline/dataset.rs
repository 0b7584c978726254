//! Named-column access to the input DataFrame
//!
//! The pipeline never mutates the frame it is given. Columns are read by name,
//! cast to Float64 and validated once, then handed to the numeric code as
//! plain slices or faer matrices.

use faer::Mat;
use polars::prelude::*;

use super::error::{AnalysisError, Result};

/// Column names of the frame, in order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fail with `UnknownColumn` unless `name` is a column of the frame
pub fn ensure_column(df: &DataFrame, name: &str) -> Result<()> {
    let names = column_names(df);
    if names.iter().any(|n| n == name) {
        Ok(())
    } else {
        Err(AnalysisError::UnknownColumn {
            column: name.to_string(),
            available: names,
        })
    }
}

/// Every column except the target, in frame order
pub fn feature_columns(df: &DataFrame, target: &str) -> Result<Vec<String>> {
    ensure_column(df, target)?;
    Ok(column_names(df)
        .into_iter()
        .filter(|name| name != target)
        .collect())
}

/// Read a column as `f64` values.
///
/// Non-numeric columns, nulls and non-finite values are rejected rather than
/// skipped so that rows stay aligned across columns.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    ensure_column(df, name)?;
    let column = df.column(name)?;

    if !column.dtype().is_primitive_numeric() {
        return Err(AnalysisError::InvalidColumn {
            column: name.to_string(),
            reason: format!("expected a numeric column, found {}", column.dtype()),
        });
    }

    let float_col = column.cast(&DataType::Float64)?;
    let ca = float_col.f64()?;

    let mut values = Vec::with_capacity(ca.len());
    for (row, value) in ca.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => values.push(v),
            Some(v) => {
                return Err(AnalysisError::InvalidColumn {
                    column: name.to_string(),
                    reason: format!("non-finite value {} at row {}", v, row),
                })
            }
            None => {
                return Err(AnalysisError::InvalidColumn {
                    column: name.to_string(),
                    reason: format!("missing value at row {}", row),
                })
            }
        }
    }

    Ok(values)
}

/// Read several columns at once, preserving the requested order
pub fn columns_values(df: &DataFrame, names: &[String]) -> Result<Vec<Vec<f64>>> {
    names.iter().map(|name| column_values(df, name)).collect()
}

/// Build an N x K matrix whose j-th column is `columns[j]`
///
/// All columns must share the same length; `n_rows` is passed explicitly so an
/// empty column list still yields a matrix with the right row count.
pub fn matrix_from_columns(columns: &[&[f64]], n_rows: usize) -> Result<Mat<f64>> {
    if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
        return Err(AnalysisError::DimensionError(format!(
            "column has {} rows, expected {}",
            bad.len(),
            n_rows
        )));
    }
    Ok(Mat::from_fn(n_rows, columns.len(), |i, j| columns[j][i]))
}

/// Feature matrix for the named columns of the frame
pub fn feature_matrix(df: &DataFrame, names: &[String]) -> Result<Mat<f64>> {
    let values = columns_values(df, names)?;
    let slices: Vec<&[f64]> = values.iter().map(|v| v.as_slice()).collect();
    matrix_from_columns(&slices, df.height())
}
