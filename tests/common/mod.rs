//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The worked example: x2 = 2 * x1 and y = x1
pub fn create_duplicate_feature_dataframe() -> DataFrame {
    df! {
        "x1" => [1.0f64, 2.0, 3.0, 4.0],
        "x2" => [2.0f64, 4.0, 6.0, 8.0],
        "y" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap()
}

/// Create a DataFrame with known correlation patterns
pub fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // Perfectly correlated with a (b = 2*a)
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // Negatively correlated with a
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0], // Weakly correlated noise
    }
    .unwrap()
}

/// Target driven by two informative features plus a weak third one.
///
/// y = 3*strong + 1*medium + 0.1*weak + small noise
pub fn create_regression_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let strong: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 10.0).collect();
    let medium: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 10.0).collect();
    let weak: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 10.0).collect();
    let y: Vec<f64> = (0..rows)
        .map(|i| 3.0 * strong[i] + medium[i] + 0.1 * weak[i] + rng.gen::<f64>() * 0.5)
        .collect();

    DataFrame::new(vec![
        Column::new("strong".into(), strong),
        Column::new("medium".into(), medium),
        Column::new("weak".into(), weak),
        Column::new("target".into(), y),
    ])
    .unwrap()
}

/// Independent uniform noise features and an independent noise target
pub fn create_noise_dataframe(rows: usize, features: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(features + 1);
    for i in 0..features {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("noise_{}", i).into(), values));
    }
    let target: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
    columns.push(Column::new("target".into(), target));

    DataFrame::new(columns).unwrap()
}

/// Column names of a frame as owned strings
pub fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Assert that two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} within {}, got {}",
        expected,
        tol,
        actual
    );
}
