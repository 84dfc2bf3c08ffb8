//! Problem definitions (WHAT to solve)
//!
//! This module provides the equations handed to the engines:
//! - [`OdeSystem`]: right-hand side `f(t, y)` of an initial-value problem
//! - [`PdeProblem`]: initial profile and boundary functions of a 1D PDE
//!
//! The numerics (HOW to solve) live in [`crate::solver`].

mod ode;
mod pde;

pub use ode::OdeSystem;
pub use pde::{PdeProblem, ScalarFn};
