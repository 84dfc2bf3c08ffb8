//! Runge-Kutta 4 (RK4) step
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method uses a weighted average of
//! four slope estimates:
//!
//! ```text
//! q₁ = f(t₀, y₀)
//! q₂ = f(t₀ + dt/2, y₀ + dt/2 · q₁)
//! q₃ = f(t₀ + dt/2, y₀ + dt/2 · q₂)
//! q₄ = f(t₀ + dt,   y₀ + dt · q₃)
//!
//! Δy = dt/6 · (q₁ + 2q₂ + 2q₃ + q₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (global error ~ O(dt⁴))
//! - **Local truncation error**: O(dt⁵) per step
//! - **Complexity**: 4 function evaluations per step
//!
//! **Practical implication**: halving dt reduces the global error by a factor of 16.
//!
//! # Comparison with Euler
//!
//! | Method | Order | Evals/Step | Error  |
//! |--------|-------|------------|--------|
//! | Euler  | 1     | 1          | O(dt)  |
//! | RK4    | 4     | 4          | O(dt⁴) |

use nalgebra::DVector;

use crate::problem::OdeSystem;
use crate::solver::Stepper;

/// Classical fourth-order Runge-Kutta step rule
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use numeric_rs::solver::{RungeKutta4, Stepper};
///
/// let decay = |_t: f64, y: &DVector<f64>| -y;
/// let y0 = DVector::from_vec(vec![1.0]);
/// let y1 = &y0 + RungeKutta4::new().step(&decay, 0.0, 0.1, 0.1, &y0);
///
/// assert!((y1[0] - (-0.1f64).exp()).abs() < 1e-7);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKutta4;

impl RungeKutta4 {
    /// Create a new RK4 step rule
    pub fn new() -> Self {
        Self
    }
}

impl Stepper for RungeKutta4 {
    fn step(&self, system: &dyn OdeSystem, t0: f64, dt: f64, _t1: f64, y0: &DVector<f64>) -> DVector<f64> {
        let half = 0.5 * dt;

        // Slope at the beginning of the interval
        let q1 = system.derivative(t0, y0);
        if q1.len() != y0.len() {
            return q1;
        }

        // Two midpoint slopes, each predicted from the previous one
        let q2 = system.derivative(t0 + half, &(y0 + &q1 * half));
        if q2.len() != y0.len() {
            return q2;
        }
        let q3 = system.derivative(t0 + half, &(y0 + &q2 * half));
        if q3.len() != y0.len() {
            return q3;
        }

        // Slope at the end of the interval
        let q4 = system.derivative(t0 + dt, &(y0 + &q3 * dt));
        if q4.len() != y0.len() {
            return q4;
        }

        (q1 + q2 * 2.0 + q3 * 2.0 + q4) * (dt / 6.0)
    }

    fn stages(&self) -> usize {
        4
    }

    fn order(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rk4_creation() {
        let stepper = RungeKutta4::new();
        assert_eq!(stepper.name(), "Runge Kutta (RK4)");
        assert_eq!(stepper.stages(), 4);
        assert_eq!(stepper.order(), 4);
    }

    #[test]
    fn test_rk4_constant_derivative_is_exact() {
        let growth = |_t: f64, y: &DVector<f64>| DVector::from_element(y.len(), 2.0);
        let dy = RungeKutta4.step(&growth, 0.0, 0.1, 0.1, &DVector::zeros(3));

        assert_relative_eq!(dy, DVector::from_element(3, 0.2), epsilon = 1e-15);
    }

    #[test]
    fn test_rk4_local_error_is_fifth_order() {
        // dy/dt = -0.5·y from y = 1
        let decay = |_t: f64, y: &DVector<f64>| y * -0.5;
        let one = DVector::from_vec(vec![1.0]);

        let error = |dt: f64| {
            let y1 = &one + RungeKutta4.step(&decay, 0.0, dt, dt, &one);
            (y1[0] - (-0.5 * dt).exp()).abs()
        };

        // Halving dt should divide the local error by 2⁵ = 32
        let ratio = error(0.4) / error(0.2);
        assert!(ratio > 28.0 && ratio < 36.0, "ratio {} is not fifth order", ratio);
    }

    #[test]
    fn test_rk4_harmonic_oscillator_step() {
        // y'' = -y as a first-order system, one small step from (1, 0)
        let oscillator = |_t: f64, y: &DVector<f64>| DVector::from_vec(vec![y[1], -y[0]]);
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let dt = 0.05;

        let y1 = &y0 + RungeKutta4.step(&oscillator, 0.0, dt, dt, &y0);

        assert_relative_eq!(y1[0], dt.cos(), epsilon = 1e-8);
        assert_relative_eq!(y1[1], -dt.sin(), epsilon = 1e-8);
    }

    #[test]
    fn test_rk4_stops_at_first_misshaped_stage() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        // Correct shape at t0, wrong shape from the first midpoint on
        let calls = AtomicUsize::new(0);
        let drifting = |t: f64, y: &DVector<f64>| {
            calls.fetch_add(1, Ordering::Relaxed);
            if t == 0.0 { y.clone() } else { DVector::zeros(y.len() + 1) }
        };

        let dy = RungeKutta4.step(&drifting, 0.0, 0.2, 0.2, &DVector::from_vec(vec![1.0, 1.0]));

        assert_eq!(dy.len(), 3);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }
}
