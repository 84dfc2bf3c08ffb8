//! Lagrange interpolating polynomial
//!
//! # Mathematical Background
//!
//! Through `n` distinct nodes passes exactly one polynomial of degree at most
//! `n - 1`. In Lagrange form
//!
//! ```text
//! P(x) = Σₖ yₖ · Lₖ(x),    Lₖ(x) = Π_{i≠k} (x - xᵢ) / (xₖ - xᵢ)
//! ```
//!
//! where each basis polynomial `Lₖ` is 1 at `xₖ` and 0 at every other node.
//! Evaluation costs O(n²). High degrees on uniform nodes oscillate near the
//! ends of the table (Runge's phenomenon); prefer a spline there.

use crate::error::NumericResult;
use crate::interp::{validate_table, Interpolant};

/// Polynomial through every node of a table
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangePolynomial {
    nodes: Vec<f64>,
    values: Vec<f64>,
}

impl LagrangePolynomial {
    /// Build the polynomial through `(nodes[k], values[k])`
    ///
    /// # Errors
    ///
    /// [`NumericError::Configuration`](crate::error::NumericError::Configuration)
    /// for an empty table, mismatched lengths, non-finite entries or nodes
    /// that are not strictly increasing.
    pub fn new(nodes: Vec<f64>, values: Vec<f64>) -> NumericResult<Self> {
        validate_table(&nodes, &values, 1)?;
        Ok(Self { nodes, values })
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Basis polynomial `Lₖ` at `x`
    pub fn basis(&self, k: usize, x: f64) -> f64 {
        let xk = self.nodes[k];
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != k)
            .map(|(_, xi)| (x - xi) / (xk - xi))
            .product()
    }

    /// Polynomial value at any `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.values.iter().enumerate().map(|(k, yk)| yk * self.basis(k, x)).sum()
    }
}

impl Interpolant for LagrangePolynomial {
    fn value(&self, x: f64) -> Option<f64> {
        Some(self.evaluate(x))
    }

    fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    fn values(&self) -> &[f64] {
        &self.values
    }
}
