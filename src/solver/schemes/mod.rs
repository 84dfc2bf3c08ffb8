//! Implicit finite-difference schemes
//!
//! Concrete implementations of the [`Assembler`](crate::solver::Assembler) trait,
//! one per equation, each blending explicit and implicit contributions with
//! the weight `sigma ∈ [0, 1]` (0 = fully explicit, 1 = fully implicit).
//!
//! | Scheme                  | Equation                 | Levels | `lam`       | Boundaries |
//! |-------------------------|--------------------------|--------|-------------|------------|
//! | [`Diffusion`]           | `u_t = u_xx`             | 2      | `Δt/Δx²`    | `ua`, `ub` |
//! | [`Wave`]                | `u_tt = u_xx`            | 3      | `(Δt/Δx)²`  | `ua`, `ub` |
//! | [`ConvectionDiffusion`] | `u_t + v·u_x = D·u_xx`   | 2      | `Δt/Δx`     | `ua`       |
//!
//! Every scheme assembles a tridiagonal system, so both
//! [`LinearSolver`](crate::solver::LinearSolver) strategies apply.

mod convection_diffusion;
mod diffusion;
mod wave;

pub use convection_diffusion::ConvectionDiffusion;
pub use diffusion::Diffusion;
pub use wave::Wave;
