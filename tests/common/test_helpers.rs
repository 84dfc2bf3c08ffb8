//! Helper functions for integration tests

#![allow(dead_code)]

use nalgebra::DVector;
use numeric_rs::solver::linspace;

/// Assert that two state vectors are close (within tolerance)
pub fn assert_vectors_close(actual: &DVector<f64>, expected: &DVector<f64>, tolerance: f64, message: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: Dimension mismatch", message);

    for (i, (&v1, &v2)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Root-mean-square difference between two series
pub fn compute_l2_error(actual: &[f64], expected: &[f64]) -> f64 {
    let count = actual.len().min(expected.len());
    if count == 0 {
        return 0.0;
    }

    let sum_squared_diff: f64 = actual.iter().zip(expected).map(|(a, b)| (a - b).powi(2)).sum();
    (sum_squared_diff / count as f64).sqrt()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// `steps + 1` evenly spaced times on `[0, total_time]`
pub fn uniform_times(total_time: f64, steps: usize) -> Vec<f64> {
    linspace(0.0, total_time, steps + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_error() {
        assert!((relative_error(1.0, 1.0) - 0.0).abs() < 1e-10);
        assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-10);
        assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_l2_error() {
        assert_eq!(compute_l2_error(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert!((compute_l2_error(&[1.0, 1.0], &[0.0, 0.0]) - 1.0).abs() < 1e-12);
    }
}
