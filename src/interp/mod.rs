//! Interpolation of tabulated functions
//!
//! Where [`crate::solver::Interpolation`] projects a single marching step,
//! the types here interpolate a whole table `(x_k, y_k)` of a scalar
//! function:
//!
//! - **[`LagrangePolynomial`]**: the single polynomial of degree `n - 1`
//!   through all nodes, defined everywhere
//! - **[`LinearSpline`]**: straight segments between neighbouring nodes
//! - **[`CubicHermiteSpline`]**: cubic Hermite segments with slopes
//!   estimated from the table
//!
//! Splines are only defined on `[x_0, x_{n-1}]`; a query outside that range
//! yields `None` from [`Interpolant::value`] and NaN from
//! [`Interpolant::sample`].
//!
//! # Example
//!
//! ```rust
//! use numeric_rs::interp::{Interpolant, LinearSpline};
//!
//! let spline = LinearSpline::new(vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 0.0]).unwrap();
//!
//! assert_eq!(spline.value(2.0), Some(1.0));
//! assert_eq!(spline.value(4.0), None);
//! ```

mod polynomial;
mod splines;

pub use polynomial::LagrangePolynomial;
pub use splines::{CubicHermiteSpline, LinearSpline};

use crate::error::{NumericError, NumericResult};
use crate::solver::sample;

/// Scalar function known through a table of nodes and values
pub trait Interpolant: Send + Sync {
    /// Interpolated value at `x`, `None` where the interpolant is undefined
    fn value(&self, x: f64) -> Option<f64>;

    /// Interpolation nodes
    fn nodes(&self) -> &[f64];

    /// Tabulated values
    fn values(&self) -> &[f64];

    /// Values at every point of `points`, NaN where undefined
    fn sample(&self, points: &[f64]) -> Vec<f64> {
        sample(&|x: f64| self.value(x).unwrap_or(f64::NAN), points)
    }
}

/// Check a table before building an interpolant on it
///
/// Nodes must be finite and strictly increasing, values finite, and both
/// of the same length with at least `min_len` entries.
fn validate_table(nodes: &[f64], values: &[f64], min_len: usize) -> NumericResult<()> {
    if nodes.len() != values.len() {
        return Err(NumericError::config(format!(
            "interpolation table has {} nodes but {} values",
            nodes.len(),
            values.len()
        )));
    }

    if nodes.len() < min_len {
        return Err(NumericError::config(format!(
            "interpolation needs at least {} nodes, got {}",
            min_len,
            nodes.len()
        )));
    }

    if nodes.iter().chain(values).any(|v| !v.is_finite()) {
        return Err(NumericError::config("interpolation nodes and values must be finite"));
    }

    if let Some(index) = nodes.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(NumericError::config(format!(
            "interpolation nodes must be strictly increasing: node {} ({}) is followed by {}",
            index,
            nodes[index],
            nodes[index + 1]
        )));
    }

    Ok(())
}

/// Index `i` of the segment `[x_i, x_{i+1}]` holding `x`, if any
fn segment_of(nodes: &[f64], x: f64) -> Option<usize> {
    let last = nodes.len() - 1;
    if !(nodes[0] <= x && x <= nodes[last]) {
        return None;
    }

    let upper = nodes.partition_point(|node| *node <= x);
    Some(upper.clamp(1, last) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_length_mismatch() {
        let error = validate_table(&[0.0, 1.0], &[1.0], 1).unwrap_err();
        assert!(error.to_string().contains("2 nodes but 1 values"));
    }

    #[test]
    fn test_table_needs_increasing_nodes() {
        assert!(validate_table(&[0.0, 1.0, 1.0], &[0.0; 3], 2).unwrap_err().is_configuration());
        assert!(validate_table(&[0.0, f64::NAN], &[0.0; 2], 2).is_err());
        assert!(validate_table(&[0.0], &[0.0], 2).is_err());
    }

    #[test]
    fn test_segment_lookup() {
        let nodes = [0.0, 1.0, 2.5, 4.0];

        assert_eq!(segment_of(&nodes, 0.0), Some(0));
        assert_eq!(segment_of(&nodes, 1.0), Some(1));
        assert_eq!(segment_of(&nodes, 3.0), Some(2));
        assert_eq!(segment_of(&nodes, 4.0), Some(2));
        assert_eq!(segment_of(&nodes, -0.1), None);
        assert_eq!(segment_of(&nodes, f64::NAN), None);
    }
}
