//! Convection-diffusion equation scheme
//!
//! # Mathematical Background
//!
//! For `u_t + v·u_x = D·u_xx` with `v ≥ 0` the flow enters through the left
//! end, so only the inflow value `ua(t)` is prescribed. The spatial operator
//! uses first-order upwind convection and central diffusion:
//!
//! ```text
//! L u_j = -c·(u_j - u_{j-1}) + r·(u_{j+1} - 2u_j + u_{j-1})
//!
//! lam = Δt/Δx,   c = v·lam   (Courant number),   r = D·lam/Δx
//! ```
//!
//! and is blended in time with the weight `σ`:
//!
//! ```text
//! u^{i} - σ·L u^{i} = u^{i-1} + (1 - σ)·L u^{i-1}
//! ```
//!
//! The last column is an outflow node: the ghost value beyond it is taken
//! equal to the node itself (zero gradient), so it is solved for together
//! with the interior nodes. Only column 0 is excluded from the system.
//!
//! # Stability
//!
//! For `σ < 1` the explicit part must keep its coefficients non-negative:
//!
//! ```text
//! (1 - σ)·(c + 2r) ≤ 1
//! ```
//!
//! With `D = 0`, `σ = 0` and `c = 1` the scheme transports the profile by
//! exactly one cell per step.

use nalgebra::DVector;
use ndarray::ArrayView2;

use crate::error::{NumericError, NumericResult};
use crate::solver::{Assembler, BoundaryLayout, LinearSystem, SchemeParameters};

/// Two-level upwind scheme for `u_t + v·u_x = D·u_xx`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvectionDiffusion {
    velocity: f64,
    diffusivity: f64,
}

impl ConvectionDiffusion {
    /// Create a scheme for velocity `v` and diffusivity `D`
    ///
    /// Both must be finite and non-negative.
    pub fn new(velocity: f64, diffusivity: f64) -> NumericResult<Self> {
        if !velocity.is_finite() || velocity < 0.0 {
            return Err(NumericError::config(format!(
                "convection velocity must be finite and non-negative (inflow on the left), got {}",
                velocity
            )));
        }
        if !diffusivity.is_finite() || diffusivity < 0.0 {
            return Err(NumericError::config(format!(
                "diffusivity must be finite and non-negative, got {}",
                diffusivity
            )));
        }

        Ok(Self { velocity, diffusivity })
    }

    /// Convection velocity `v`
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Diffusivity `D`
    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    /// Courant number `c` and diffusion number `r` for the given parameters
    pub fn numbers(&self, params: &SchemeParameters) -> (f64, f64) {
        (self.velocity * params.lam, self.diffusivity * params.lam / params.h)
    }
}

impl Assembler for ConvectionDiffusion {
    fn name(&self) -> &str {
        "Convection-Diffusion"
    }

    fn time_levels(&self) -> usize {
        2
    }

    fn boundary_layout(&self) -> BoundaryLayout {
        BoundaryLayout::LeftOnly
    }

    fn mesh_ratio(&self, tau: f64, h: f64) -> f64 {
        tau / h
    }

    fn check_stability(&self, params: &SchemeParameters) -> NumericResult<()> {
        let (c, r) = self.numbers(params);
        let weight = (1.0 - params.sigma) * (c + 2.0 * r);

        if params.sigma < 1.0 && weight > 1.0 {
            return Err(NumericError::stability(
                self.name(),
                format!(
                    "(1-σ)(c + 2r) = {} exceeds 1 (Courant number c = {}, diffusion number r = {}, σ = {})",
                    weight, c, r, params.sigma
                ),
            ));
        }

        Ok(())
    }

    fn assemble(&self, step: usize, params: &SchemeParameters, solution: ArrayView2<'_, f64>) -> LinearSystem {
        let sigma = params.sigma;
        let (c, r) = self.numbers(params);
        let columns = solution.ncols();
        let n = columns - 1;

        let previous = solution.row(step - 1);
        let current = solution.row(step);

        let mut matrix = LinearSystem::tridiagonal(n, -sigma * (c + r), 1.0 + sigma * (c + 2.0 * r), -sigma * r);
        // Zero-gradient outflow folds the ghost neighbour into the diagonal
        matrix[(n - 1, n - 1)] = 1.0 + sigma * (c + r);

        let mut rhs = DVector::from_fn(n, |k, _| {
            let j = k + 1;
            let left = previous[j - 1];
            let centre = previous[j];
            let right = if j + 1 < columns { previous[j + 1] } else { centre };

            let operator = -c * (centre - left) + r * (right - 2.0 * centre + left);
            centre + (1.0 - sigma) * operator
        });

        rhs[0] += sigma * (c + r) * current[0];

        LinearSystem::new(matrix, rhs)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn params(sigma: f64, tau: f64, h: f64) -> SchemeParameters {
        SchemeParameters { sigma, tau, h, lam: tau / h }
    }

    #[test]
    fn test_rejects_negative_velocity() {
        assert!(ConvectionDiffusion::new(-1.0, 0.0).unwrap_err().is_configuration());
        assert!(ConvectionDiffusion::new(1.0, f64::NAN).is_err());
        assert!(ConvectionDiffusion::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_only_left_boundary() {
        let scheme = ConvectionDiffusion::new(1.0, 0.1).unwrap();
        assert_eq!(scheme.boundary_layout(), BoundaryLayout::LeftOnly);
        assert_relative_eq!(scheme.mesh_ratio(0.05, 0.1), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_courant_number_shifts_profile() {
        let scheme = ConvectionDiffusion::new(1.0, 0.0).unwrap();
        let mut solution = array![[0.0, 1.0, 2.0, 3.0, 4.0], [0.0, 0.0, 0.0, 0.0, 0.0]];
        solution[[1, 0]] = 7.0;

        let system = scheme.assemble(1, &params(0.0, 0.1, 0.1), solution.view());

        assert_eq!(system.size(), 4);
        assert_eq!(system.matrix, nalgebra::DMatrix::identity(4, 4));
        for (k, expected) in [0.0, 1.0, 2.0, 3.0].into_iter().enumerate() {
            assert_relative_eq!(system.rhs[k], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_outflow_row_and_inflow_coupling() {
        let scheme = ConvectionDiffusion::new(2.0, 0.1).unwrap();
        let mut solution = ndarray::Array2::<f64>::zeros((2, 4));
        solution[[1, 0]] = 1.0;

        // lam = 1, c = 2, r = 1
        let system = scheme.assemble(1, &params(1.0, 0.1, 0.1), solution.view());

        assert_relative_eq!(system.matrix[(0, 0)], 5.0, epsilon = 1e-12);
        assert_relative_eq!(system.matrix[(1, 0)], -3.0, epsilon = 1e-12);
        assert_relative_eq!(system.matrix[(0, 1)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(system.matrix[(2, 2)], 4.0, epsilon = 1e-12);
        assert_relative_eq!(system.rhs[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(system.rhs[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_stability_guard() {
        let scheme = ConvectionDiffusion::new(1.0, 0.0).unwrap();

        assert!(scheme.check_stability(&params(0.0, 0.1, 0.1)).is_ok());
        assert!(matches!(
            scheme.check_stability(&params(0.0, 0.2, 0.1)),
            Err(NumericError::StabilityViolation { .. })
        ));
        assert!(scheme.check_stability(&params(1.0, 10.0, 0.1)).is_ok());
    }
}
