//! Piecewise interpolation on a table
//!
//! Both splines locate the segment `[x_i, x_{i+1}]` holding the query and
//! interpolate on it alone. The segment formulas are the ones the ODE engine
//! uses to project a marching step.
//!
//! # Slope Estimate
//!
//! [`CubicHermiteSpline`] needs a slope at every node. Interior slopes are
//! central differences over the two neighbours,
//!
//! ```text
//! mᵢ = (y_{i+1} - y_{i-1}) / (x_{i+1} - x_{i-1})
//! ```
//!
//! and both end slopes are zero, so the curve leaves the table flat.

use crate::error::NumericResult;
use crate::interp::{segment_of, validate_table, Interpolant};
use crate::solver::{hermite_weights, unit_position};

// =================================================================================================
// Linear Spline
// =================================================================================================

/// Broken line through the table
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSpline {
    nodes: Vec<f64>,
    values: Vec<f64>,
}

impl LinearSpline {
    /// Build the spline on at least two strictly increasing nodes
    pub fn new(nodes: Vec<f64>, values: Vec<f64>) -> NumericResult<Self> {
        validate_table(&nodes, &values, 2)?;
        Ok(Self { nodes, values })
    }
}

impl Interpolant for LinearSpline {
    fn value(&self, x: f64) -> Option<f64> {
        let i = segment_of(&self.nodes, x)?;
        let s = unit_position(self.nodes[i], self.nodes[i + 1], x);
        Some(self.values[i] + s * (self.values[i + 1] - self.values[i]))
    }

    fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

// =================================================================================================
// Cubic Hermite Spline
// =================================================================================================

/// C¹ cubic spline with slopes estimated from the table
#[derive(Debug, Clone, PartialEq)]
pub struct CubicHermiteSpline {
    nodes: Vec<f64>,
    values: Vec<f64>,
    slopes: Vec<f64>,
}

impl CubicHermiteSpline {
    /// Build the spline on at least two strictly increasing nodes
    ///
    /// # Example
    ///
    /// ```rust
    /// use numeric_rs::interp::{CubicHermiteSpline, Interpolant};
    ///
    /// let spline = CubicHermiteSpline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
    ///
    /// assert_eq!(spline.slopes(), &[0.0, 2.0, 0.0]);
    /// assert_eq!(spline.value(1.0), Some(1.0));
    /// ```
    pub fn new(nodes: Vec<f64>, values: Vec<f64>) -> NumericResult<Self> {
        validate_table(&nodes, &values, 2)?;

        let n = nodes.len();
        let mut slopes = vec![0.0; n];
        for i in 1..n - 1 {
            slopes[i] = (values[i + 1] - values[i - 1]) / (nodes[i + 1] - nodes[i - 1]);
        }

        Ok(Self { nodes, values, slopes })
    }

    /// Slope used at every node
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
}

impl Interpolant for CubicHermiteSpline {
    fn value(&self, x: f64) -> Option<f64> {
        let i = segment_of(&self.nodes, x)?;
        let (x0, x1) = (self.nodes[i], self.nodes[i + 1]);
        let dx = x1 - x0;
        let [h00, h10, h01, h11] = hermite_weights(unit_position(x0, x1, x));

        Some(
            h00 * self.values[i]
                + h10 * dx * self.slopes[i]
                + h01 * self.values[i + 1]
                + h11 * dx * self.slopes[i + 1],
        )
    }

    fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}

// =================================================================================================
// Tests
// =================================================================================================
