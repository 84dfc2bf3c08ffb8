//! Diffusion (heat) equation scheme
//!
//! # Mathematical Background
//!
//! For `u_t = u_xx` the two-level weighted scheme reads
//!
//! ```text
//! (u_j^{i} - u_j^{i-1}) / Δt = σ·Λu_j^{i} + (1 - σ)·Λu_j^{i-1}
//!
//! Λu_j = (u_{j+1} - 2u_j + u_{j-1}) / Δx²
//! ```
//!
//! With `lam = Δt/Δx²` every interior node `j` gives one equation
//!
//! ```text
//! -σ·lam·u_{j-1}^{i} + (1 + 2σ·lam)·u_j^{i} - σ·lam·u_{j+1}^{i}
//!     = (1-σ)·lam·u_{j-1}^{i-1} + (1 - 2(1-σ)·lam)·u_j^{i-1} + (1-σ)·lam·u_{j+1}^{i-1}
//! ```
//!
//! The boundary values of row `i` are known, so their implicit terms move to
//! the right-hand side. `σ = 1/2` is Crank–Nicolson, `σ = 1` is backward Euler.
//!
//! # Stability
//!
//! For `σ < 1` the scheme is only conditionally stable:
//!
//! ```text
//! Δt ≤ Δx² / (2(1 - σ))
//! ```

use nalgebra::DVector;
use ndarray::ArrayView2;

use crate::error::{NumericError, NumericResult};
use crate::solver::{Assembler, LinearSystem, SchemeParameters};

/// Two-level weighted scheme for `u_t = u_xx`
#[derive(Debug, Clone, Copy, Default)]
pub struct Diffusion;

impl Diffusion {
    /// Create a new diffusion scheme
    pub fn new() -> Self {
        Self
    }

    /// Largest stable time step for a space step `h` and weight `sigma`
    ///
    /// `None` when the scheme is unconditionally stable (`sigma == 1`).
    pub fn max_stable_time_step(h: f64, sigma: f64) -> Option<f64> {
        (sigma < 1.0).then(|| h * h / 2.0 / (1.0 - sigma))
    }
}

impl Assembler for Diffusion {
    fn name(&self) -> &str {
        "Diffusion"
    }

    fn time_levels(&self) -> usize {
        2
    }

    fn mesh_ratio(&self, tau: f64, h: f64) -> f64 {
        tau / h / h
    }

    fn check_stability(&self, params: &SchemeParameters) -> NumericResult<()> {
        match Self::max_stable_time_step(params.h, params.sigma) {
            Some(limit) if params.tau > limit => Err(NumericError::stability(
                self.name(),
                format!(
                    "time step {} exceeds Δx²/(2(1-σ)) = {} for Δx = {} and σ = {}; choose other grid steps",
                    params.tau, limit, params.h, params.sigma
                ),
            )),
            _ => Ok(()),
        }
    }

    fn assemble(&self, step: usize, params: &SchemeParameters, solution: ArrayView2<'_, f64>) -> LinearSystem {
        let SchemeParameters { sigma, lam, .. } = *params;
        let columns = solution.ncols();
        let n = columns - 2;

        let previous = solution.row(step - 1);
        let current = solution.row(step);

        let implicit = sigma * lam;
        let explicit = (1.0 - sigma) * lam;

        let matrix = LinearSystem::tridiagonal(n, -implicit, 1.0 + 2.0 * implicit, -implicit);

        let mut rhs = DVector::from_fn(n, |k, _| {
            let j = k + 1;
            explicit * previous[j - 1] + (1.0 - 2.0 * explicit) * previous[j] + explicit * previous[j + 1]
        });

        // Known boundary values of the new row
        rhs[0] += implicit * current[0];
        rhs[n - 1] += implicit * current[columns - 1];

        LinearSystem::new(matrix, rhs)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
