//! Wave (string oscillation) equation scheme
//!
//! # Mathematical Background
//!
//! For `u_tt = u_xx` the three-level weighted scheme reads
//!
//! ```text
//! (u^{i} - 2u^{i-1} + u^{i-2}) / Δt² = Λ(σ·u^{i} + (1 - 2σ)·u^{i-1} + σ·u^{i-2})
//! ```
//!
//! With `lam = (Δt/Δx)²` every interior node `j` gives
//!
//! ```text
//! -σ·lam·u_{j-1}^{i} + (1 + 2σ·lam)·u_j^{i} - σ·lam·u_{j+1}^{i}
//!     = (1-2σ)·lam·(u_{j-1}^{i-1} + u_{j+1}^{i-1}) + 2(1 - lam(1-2σ))·u_j^{i-1}
//!     + σ·lam·(u_{j-1}^{i-2} + u_{j+1}^{i-2}) - (1 + 2σ·lam)·u_j^{i-2}
//! ```
//!
//! `σ = 0` is the explicit leapfrog scheme. Rows 0 and 1 are seeded from
//! `u0(x)` and `u0(x) + Δt·ut0(x)` before marching.
//!
//! # Stability
//!
//! Unconditionally stable for `σ ≥ 1/4`; otherwise
//!
//! ```text
//! lam ≤ 1 / (1 - 4σ)
//! ```

use nalgebra::DVector;
use ndarray::ArrayView2;

use crate::error::{NumericError, NumericResult};
use crate::solver::{Assembler, LinearSystem, SchemeParameters};

/// Three-level weighted scheme for `u_tt = u_xx`
#[derive(Debug, Clone, Copy, Default)]
pub struct Wave;

impl Wave {
    /// Create a new wave scheme
    pub fn new() -> Self {
        Self
    }
}

impl Assembler for Wave {
    fn name(&self) -> &str {
        "Wave"
    }

    fn time_levels(&self) -> usize {
        3
    }

    fn mesh_ratio(&self, tau: f64, h: f64) -> f64 {
        tau * tau / h / h
    }

    fn check_stability(&self, params: &SchemeParameters) -> NumericResult<()> {
        let SchemeParameters { sigma, lam, .. } = *params;

        if sigma < 0.25 {
            let limit = 1.0 / (1.0 - 4.0 * sigma);
            if lam > limit {
                return Err(NumericError::stability(
                    self.name(),
                    format!(
                        "mesh ratio (Δt/Δx)² = {} exceeds 1/(1-4σ) = {} for σ = {}; use σ ≥ 1/4 or a smaller time step",
                        lam, limit, sigma
                    ),
                ));
            }
        }

        Ok(())
    }

    fn assemble(&self, step: usize, params: &SchemeParameters, solution: ArrayView2<'_, f64>) -> LinearSystem {
        let SchemeParameters { sigma, lam, .. } = *params;
        let columns = solution.ncols();
        let n = columns - 2;

        let older = solution.row(step - 2);
        let previous = solution.row(step - 1);
        let current = solution.row(step);

        let implicit = sigma * lam;
        let neighbours = (1.0 - 2.0 * sigma) * lam;
        let centre = 2.0 * (1.0 - lam * (1.0 - 2.0 * sigma));

        let matrix = LinearSystem::tridiagonal(n, -implicit, 1.0 + 2.0 * implicit, -implicit);

        let mut rhs = DVector::from_fn(n, |k, _| {
            let j = k + 1;
            neighbours * (previous[j - 1] + previous[j + 1]) + centre * previous[j]
                + implicit * (older[j - 1] + older[j + 1])
                - (1.0 + 2.0 * implicit) * older[j]
        });

        rhs[0] += implicit * current[0];
        rhs[n - 1] += implicit * current[columns - 1];

        LinearSystem::new(matrix, rhs)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
