//! Simpson three-stage step
//!
//! # Mathematical Background
//!
//! The interval integral is approximated with Simpson's rule, the midpoint
//! and end values being predicted by Euler-type stages:
//!
//! ```text
//! q₁ = f(t₀, y₀)
//! q₂ = f(t₀ + dt/2, y₀ + ½·q₁·dt)
//! q₃ = f(t₀ + dt,   y₀ + ½·q₁·dt + ½·q₂·dt)
//!
//! Δy = dt · (q₁ + 4q₂ + q₃) / 6
//! ```
//!
//! # Characteristics
//!
//! - **Complexity**: 3 function evaluations per step
//! - **Accuracy**: exact for derivatives depending on `t` only up to degree 3;
//!   for state-dependent derivatives the end stage limits it to second order
//!
//! # Comparison
//!
//! | Method  | Evals/Step |
//! |---------|------------|
//! | Euler   | 1          |
//! | Simpson | 3          |
//! | RK4     | 4          |

use nalgebra::DVector;

use crate::problem::OdeSystem;
use crate::solver::Stepper;

/// Simpson-like three-stage step rule
#[derive(Debug, Clone, Copy, Default)]
pub struct Simpson;

impl Simpson {
    /// Create a new Simpson step rule
    pub fn new() -> Self {
        Self
    }
}

impl Stepper for Simpson {
    fn step(&self, system: &dyn OdeSystem, t0: f64, dt: f64, _t1: f64, y0: &DVector<f64>) -> DVector<f64> {
        let half = 0.5 * dt;

        let q1 = system.derivative(t0, y0);
        if q1.len() != y0.len() {
            return q1;
        }

        let q2 = system.derivative(t0 + half, &(y0 + &q1 * half));
        if q2.len() != y0.len() {
            return q2;
        }

        let q3 = system.derivative(t0 + dt, &(y0 + &q1 * half + &q2 * half));
        if q3.len() != y0.len() {
            return q3;
        }

        (q1 + q2 * 4.0 + q3) * (dt / 6.0)
    }

    fn stages(&self) -> usize {
        3
    }

    fn order(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "Simpson"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
