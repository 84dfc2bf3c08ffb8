//! Forward Euler step
//!
//! # Mathematical Background
//!
//! The solution over one interval is the integral of the derivative:
//!
//! ```text
//! y₁ = y₀ + ∫[t₀, t₁] f(t, y) dt
//! ```
//!
//! Forward Euler approximates the integral with the left rectangle rule:
//!
//! ```text
//! ∫[t₀, t₀ + dt] f(t, y) dt ≈ dt · f(t₀, y₀)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (global error ~ O(dt))
//! - **Local truncation error**: O(dt²) per step
//! - **Complexity**: 1 function evaluation per step
//!
//! # When to Use
//!
//! - Prototyping and testing
//! - Reference solutions for convergence studies
//!
//! # When NOT to Use
//!
//! - High-accuracy requirements → Use [`RungeKutta4`](super::RungeKutta4)

use nalgebra::DVector;

use crate::problem::OdeSystem;
use crate::solver::Stepper;

/// Forward Euler step rule: `Δy = dt · f(t₀, y₀)`
///
/// # Example
///
/// ```rust
/// use numeric_rs::solver::{ForwardEuler, Stepper};
///
/// let stepper = ForwardEuler::new();
/// assert_eq!(stepper.name(), "Forward Euler");
/// assert_eq!(stepper.stages(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl ForwardEuler {
    /// Create a new Forward Euler step rule
    pub fn new() -> Self {
        Self
    }
}

impl Stepper for ForwardEuler {
    fn step(&self, system: &dyn OdeSystem, t0: f64, dt: f64, _t1: f64, y0: &DVector<f64>) -> DVector<f64> {
        system.derivative(t0, y0) * dt
    }

    fn stages(&self) -> usize {
        1
    }

    fn order(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
