//! One-dimensional time-dependent PDE problems
//!
//! A problem bundles the caller-supplied functions that seed the solution
//! buffer before marching begins:
//!
//! - `u0(x)`: initial profile, written into row 0
//! - `ut0(x)`: initial velocity (three-time-level schemes only), used to seed row 1
//! - `ua(t)`: value at the left end of the space interval, written into column 0
//! - `ub(t)`: value at the right end, written into the last column (two-sided schemes only)
//!
//! The same problem can be solved with different schemes and grids; this is
//! the "WHAT to solve", the scheme is the "HOW".

use std::fmt;
use std::sync::Arc;

use crate::error::{NumericError, NumericResult};
use crate::solver::{Assembler, BoundaryLayout};

/// Shared scalar function of one coordinate
pub type ScalarFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

// =================================================================================================
// PDE Problem
// =================================================================================================

/// Initial and boundary data of a 1D PDE
///
/// # Examples
///
/// ```rust
/// use numeric_rs::problem::PdeProblem;
///
/// // Heat conduction in a rod with both ends held at zero
/// let problem = PdeProblem::diffusion(f64::sin, |_t| 0.0, |_t| 0.0);
/// assert!(problem.has_right_boundary());
/// assert!(!problem.has_initial_velocity());
/// ```
#[derive(Clone)]
pub struct PdeProblem {
    initial: ScalarFn,
    initial_velocity: Option<ScalarFn>,
    left: ScalarFn,
    right: Option<ScalarFn>,
}

impl PdeProblem {
    /// Generic constructor
    pub fn new(
        initial: ScalarFn,
        initial_velocity: Option<ScalarFn>,
        left: ScalarFn,
        right: Option<ScalarFn>,
    ) -> Self {
        Self { initial, initial_velocity, left, right }
    }

    // ====================================== Factory methods ======================================

    /// Parabolic problem: `u0(x)`, `ua(t)`, `ub(t)`
    pub fn diffusion<U, A, B>(u0: U, ua: A, ub: B) -> Self
    where
        U: Fn(f64) -> f64 + Send + Sync + 'static,
        A: Fn(f64) -> f64 + Send + Sync + 'static,
        B: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(Arc::new(u0), None, Arc::new(ua), Some(Arc::new(ub)))
    }

    /// Hyperbolic problem: `u0(x)`, `ut0(x)`, `ua(t)`, `ub(t)`
    pub fn wave<U, V, A, B>(u0: U, ut0: V, ua: A, ub: B) -> Self
    where
        U: Fn(f64) -> f64 + Send + Sync + 'static,
        V: Fn(f64) -> f64 + Send + Sync + 'static,
        A: Fn(f64) -> f64 + Send + Sync + 'static,
        B: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(Arc::new(u0), Some(Arc::new(ut0)), Arc::new(ua), Some(Arc::new(ub)))
    }

    /// Advection-dominated problem with an inflow boundary only: `u0(x)`, `ua(t)`
    pub fn convection<U, A>(u0: U, ua: A) -> Self
    where
        U: Fn(f64) -> f64 + Send + Sync + 'static,
        A: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(Arc::new(u0), None, Arc::new(ua), None)
    }

    // ===================================== Query methods =========================================

    /// Initial profile `u0`
    pub fn initial(&self) -> &ScalarFn {
        &self.initial
    }

    /// Initial velocity `ut0`, if any
    pub fn initial_velocity(&self) -> Option<&ScalarFn> {
        self.initial_velocity.as_ref()
    }

    /// Left boundary `ua`
    pub fn left(&self) -> &ScalarFn {
        &self.left
    }

    /// Right boundary `ub`, if any
    pub fn right(&self) -> Option<&ScalarFn> {
        self.right.as_ref()
    }

    /// Check a right boundary function is available
    pub fn has_right_boundary(&self) -> bool {
        self.right.is_some()
    }

    /// Check an initial velocity function is available
    pub fn has_initial_velocity(&self) -> bool {
        self.initial_velocity.is_some()
    }

    /// Verify the problem provides every function `scheme` consumes
    pub fn validate_for<S: Assembler + ?Sized>(&self, scheme: &S) -> NumericResult<()> {
        if scheme.time_levels() > 2 && self.initial_velocity.is_none() {
            return Err(NumericError::config(format!(
                "the {} scheme uses {} time levels and needs an initial velocity function ut0",
                scheme.name(),
                scheme.time_levels()
            )));
        }

        if scheme.boundary_layout() == BoundaryLayout::TwoSided && self.right.is_none() {
            return Err(NumericError::config(format!(
                "the {} scheme needs a right boundary function ub",
                scheme.name()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for PdeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdeProblem")
            .field("initial velocity", &self.has_initial_velocity())
            .field("right boundary", &self.has_right_boundary())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{ConvectionDiffusion, Diffusion, Wave};

    #[test]
    fn test_diffusion_problem_validates_for_diffusion() {
        let problem = PdeProblem::diffusion(f64::sin, |_| 0.0, |_| 0.0);
        assert!(problem.validate_for(&Diffusion::new()).is_ok());
        assert_eq!((problem.initial())(0.0), 0.0);
    }

    #[test]
    fn test_wave_scheme_requires_initial_velocity() {
        let problem = PdeProblem::diffusion(f64::sin, |_| 0.0, |_| 0.0);
        let error = problem.validate_for(&Wave::new()).unwrap_err();

        assert!(error.is_configuration());
        assert!(error.to_string().contains("ut0"));
    }

    #[test]
    fn test_two_sided_scheme_requires_right_boundary() {
        let problem = PdeProblem::convection(f64::sin, |_| 0.0);
        let error = problem.validate_for(&Diffusion::new()).unwrap_err();

        assert!(error.to_string().contains("ub"));
    }

    #[test]
    fn test_convection_problem_validates_for_convection() {
        let problem = PdeProblem::convection(|x| (-x * x).exp(), |t| t);
        let scheme = ConvectionDiffusion::new(1.0, 0.0).unwrap();

        assert!(problem.validate_for(&scheme).is_ok());
        assert!(!problem.has_right_boundary());
        assert_eq!((problem.left())(2.5), 2.5);
    }
}
