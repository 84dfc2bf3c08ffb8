//! Mock ODE systems for testing
//!
//! These systems have known analytical solutions, making them
//! ideal for validating numerical solver accuracy.

#![allow(dead_code)]

use nalgebra::DVector;
use numeric_rs::problem::OdeSystem;

// =================================================================================================
// Exponential Decay: dy/dt = -k*y
// =================================================================================================

/// Exponential decay: dy/dt = -k*y
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub decay_rate: f64,
}

impl ExponentialDecay {
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 * (-self.decay_rate * t).exp()
    }
}

impl OdeSystem for ExponentialDecay {
    fn derivative(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
        y * -self.decay_rate
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}

// =================================================================================================
// Constant Growth: dy/dt = c
// =================================================================================================

/// Constant growth: dy/dt = c
///
/// Analytical solution: y(t) = y₀ + c*t
///
/// Every stepper is exact for this problem.
pub struct ConstantGrowth {
    pub dimension: usize,
    pub growth_rate: f64,
}

impl ConstantGrowth {
    pub fn new(dimension: usize, growth_rate: f64) -> Self {
        Self { dimension, growth_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 + self.growth_rate * t
    }
}

impl OdeSystem for ConstantGrowth {
    fn derivative(&self, _t: f64, _y: &DVector<f64>) -> DVector<f64> {
        DVector::from_element(self.dimension, self.growth_rate)
    }

    fn name(&self) -> &str {
        "Constant Growth"
    }
}

// =================================================================================================
// Harmonic Oscillator: y'' = -ω²y
// =================================================================================================

/// Harmonic oscillator as a first-order system `(y, v)`
///
/// Analytical solution with `y(0) = 1, v(0) = 0`: y(t) = cos(ωt)
pub struct HarmonicOscillator {
    pub omega: f64,
}

impl HarmonicOscillator {
    pub fn new(omega: f64) -> Self {
        Self { omega }
    }

    /// Position at time t for `y(0) = 1, v(0) = 0`
    pub fn analytical_solution(&self, t: f64) -> f64 {
        (self.omega * t).cos()
    }

    /// Total energy `(v² + ω²y²) / 2`
    pub fn energy(&self, state: &DVector<f64>) -> f64 {
        0.5 * (state[1] * state[1] + self.omega * self.omega * state[0] * state[0])
    }
}

impl OdeSystem for HarmonicOscillator {
    fn derivative(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
        DVector::from_vec(vec![y[1], -self.omega * self.omega * y[0]])
    }

    fn name(&self) -> &str {
        "Harmonic Oscillator"
    }
}
