//! Time-stepping engines
//!
//! This module holds everything that turns a problem definition into
//! numbers. The problem itself (right-hand side, initial and boundary data)
//! lives in [`crate::problem`]; the solver only decides HOW it is marched.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Problem** ([`crate::problem`]) - WHAT to solve
//!    - ODE right-hand side `f(t, y)`
//!    - PDE initial and boundary functions
//!
//! 2. **Configuration** ([`OdeConfiguration`], [`PdeConfiguration`]) - HOW to solve
//!    - Grid policy (fixed step, custom rule or identity)
//!    - Interpolation mode (ODE)
//!    - Linear solver (PDE)
//!
//! 3. **Engine** ([`OdeSolver`], [`PdeSolver`]) - The marching loop
//!    - ODE: parameterized by a [`Stepper`] (Euler, Simpson, RK4)
//!    - PDE: parameterized by an [`Assembler`] (Diffusion, Wave, ConvectionDiffusion)
//!
//! # Module Organization
//!
//! - **`grid`**: [`Grid`], [`GridPolicy`], `linspace`, requested-point validation
//! - **`interpolation`**: projection of a marching step onto output times
//! - **`traits`**: [`Stepper`] and [`Assembler`] seams, [`LinearSystem`]
//! - **`methods`**: single-step ODE formulas
//! - **`schemes`**: implicit-explicit PDE stencils
//! - **`linalg`**: dense LU and Thomas solves of one time row
//! - **`ode`** / **`pde`**: the engines
//! - **`result`**: [`Trajectory`] and [`SpaceTimeSolution`]
//!
//! # Quick Start Example
//!
//! ```rust
//! use nalgebra::DVector;
//! use numeric_rs::solver::{OdeConfiguration, RK4Solver};
//!
//! // dy/dt = -y on a 0.01 step, reported at 0, 0.5 and 1
//! let config = OdeConfiguration::fixed_step(0.01).unwrap();
//! let solver = RK4Solver::with_config(config);
//!
//! let decay = |_t: f64, y: &DVector<f64>| -y;
//! let y0 = DVector::from_vec(vec![1.0]);
//! let trajectory = solver.solve(&decay, &y0, &[0.0, 0.5, 1.0]).unwrap();
//!
//! assert!((trajectory.states[2][0] - (-1.0f64).exp()).abs() < 1e-8);
//! ```
//!
//! # Error Handling
//!
//! Every engine returns [`NumericResult`]. Configuration problems are
//! reported before any step is taken; a non-finite state or a singular
//! row stops the march and is reported with the offending step index.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod grid;
mod interpolation;
mod linalg;
mod methods;
mod ode;
mod pde;
mod result;
mod schemes;
mod traits;

// =================================================================================================
// Parallel Sampling Cutoff
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::NumericResult;

/// Grids longer than this are sampled with Rayon (feature `parallel`)
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Grid length above which [`sample()`] fans out over Rayon
///
/// Without the `parallel` feature the value is kept but never consulted.
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Change the cutoff used by [`sample()`]
///
/// The value only affects scheduling; sampled values are identical on
/// either side of it.
///
/// # Panics
///
/// A cutoff of zero is rejected with a panic.
///
/// ```rust
/// use numeric_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let saved = parallel_threshold();
/// set_parallel_threshold(64);
/// assert_eq!(parallel_threshold(), 64);
/// set_parallel_threshold(saved);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Lowers the cutoff for one test and puts the old value back when dropped
#[cfg(test)]
pub(crate) struct ThresholdGuard(usize);

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(cutoff: usize) -> Self {
        let saved = parallel_threshold();
        set_parallel_threshold(cutoff);
        Self(saved)
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.0, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use crate::error::Axis;

pub use grid::{
    fixed_step_count,
    linspace,
    validate_requested,
    AxisGridPolicy,
    Grid,
    GridPolicy,
    GridRule,
    OdeGridPolicy,
    OdeGridRule,
};

pub use interpolation::{resolve as resolve_interpolation, Interpolation, InterpolationRule, INTERPOLATION_TAGS};
pub(crate) use interpolation::{hermite_weights, unit_position};

pub use traits::{Assembler, BoundaryLayout, LinearSystem, SchemeParameters, Stepper};

pub use linalg::LinearSolver;

pub use methods::{ForwardEuler, RungeKutta4, Simpson};

pub use schemes::{ConvectionDiffusion, Diffusion, Wave};

pub use ode::{EulerSolver, OdeConfiguration, OdeSolver, RK4Solver, SimpsonSolver};

pub use pde::{ConvectionDiffusionSolver, DiffusionSolver, PdeConfiguration, PdeSolver, WaveSolver};

pub use result::{SpaceTimeSolution, Trajectory};

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Evaluate `f` on every point of `grid`
///
/// Uses Rayon when the crate is built with the `parallel` feature and the
/// grid is larger than [`parallel_threshold()`].
///
/// # Example
///
/// ```rust
/// use numeric_rs::solver::sample;
///
/// let values = sample(&|x: f64| 2.0 * x, &[0.0, 0.5, 1.0]);
/// assert_eq!(values, vec![0.0, 1.0, 2.0]);
/// ```
pub fn sample<F>(f: &F, grid: &[f64]) -> Vec<f64>
where
    F: Fn(f64) -> f64 + Sync + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        if grid.len() > parallel_threshold() {
            return grid.par_iter().map(|&x| f(x)).collect();
        }
    }

    grid.iter().map(|&x| f(x)).collect()
}

/// Check a freshly computed state for NaN or Inf values
///
/// `step` and `time` locate the offending state in the march.
///
/// ```rust,ignore
/// validate_state(y_next.iter().copied(), 42, t1)?;
/// ```
pub(crate) fn validate_state<I>(values: I, step: usize, time: f64) -> NumericResult<()>
where
    I: IntoIterator<Item = f64>,
{
    if values.into_iter().any(|x| !x.is_finite()) {
        log::error!("non-finite state at step {} (t = {})", step, time);
        return Err(crate::error::NumericError::NonFiniteState { step, time });
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
