//! numeric-rs: Time-Stepping Solvers for ODEs and 1-D PDEs
//!
//! Single-step integrators for initial-value problems and implicit-explicit
//! finite-difference schemes for one-dimensional evolution equations.
//!
//! # Architecture
//!
//! numeric-rs is built on two core principles:
//!
//! 1. **Separation of Problem and Numerics**
//!    - Problems define equations and data (what to solve)
//!    - Engines, steppers and schemes provide methods (how to solve)
//!
//! 2. **Pluggable Grids and Projections**
//!    - Requested output points are decoupled from the marching grid
//!    - Grids come from a fixed step, a custom rule or the requested points
//!    - ODE output is projected with linear, cubic Hermite or custom interpolation
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::DVector;
//! use numeric_rs::prelude::*;
//!
//! # fn main() -> NumericResult<()> {
//! // 1. ODE: harmonic oscillator y'' = -y on a 0.01 step
//! let oscillator = |_t: f64, y: &DVector<f64>| DVector::from_vec(vec![y[1], -y[0]]);
//! let solver = RK4Solver::from_options(Some(0.01), None, Interpolation::CubicHermite)?;
//! let trajectory = solver.solve(&oscillator, &DVector::from_vec(vec![1.0, 0.0]), &[0.0, 1.0])?;
//! assert!((trajectory.states[1][0] - 1.0f64.cos()).abs() < 1e-8);
//!
//! // 2. PDE: heat equation with homogeneous Dirichlet boundaries
//! let problem = PdeProblem::diffusion(|x: f64| x.sin(), |_t: f64| 0.0, |_t: f64| 0.0);
//! let solver = DiffusionSolver::with_config(problem, PdeConfiguration::fixed_steps(0.01, 0.05)?)?;
//! let solution = solver.solve(&[0.0, 1.0], &[0.0, std::f64::consts::PI], 1.0)?;
//! assert!(solution.max_amplitude(solution.shape().0 - 1) < 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`problem`]: ODE systems and PDE initial/boundary data
//! - [`solver`]: Engines, steppers, schemes, grids and interpolation
//! - [`interp`]: Lagrange polynomial and splines on a table of values
//! - [`calculus`]: Finite-difference derivatives, Chebyshev polynomials
//! - [`error`]: Error taxonomy shared by every engine
//!
//! # Logging
//!
//! Engines log through the [`log`] facade: grid construction at `debug`,
//! per-row progress at `trace`, completion at `info`. Install any logger
//! implementation to see them.

pub mod calculus;
pub mod error;
pub mod interp;
pub mod problem;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use numeric_rs::prelude::*;
    //! ```
    pub use crate::error::{NumericError, NumericResult};

    pub use crate::interp::{CubicHermiteSpline, Interpolant, LagrangePolynomial, LinearSpline};

    pub use crate::problem::{OdeSystem, PdeProblem};

    pub use crate::solver::{
        ConvectionDiffusionSolver,
        DiffusionSolver,
        EulerSolver,
        Interpolation,
        LinearSolver,
        OdeConfiguration,
        PdeConfiguration,
        RK4Solver,
        SimpsonSolver,
        SpaceTimeSolution,
        Trajectory,
        WaveSolver,
    };
}
