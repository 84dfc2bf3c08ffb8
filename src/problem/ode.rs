//! Ordinary differential equation systems

use nalgebra::DVector;

// =================================================================================================
// ODE System Trait
// =================================================================================================

/// Right-hand side of an initial-value problem `dy/dt = f(t, y)`
///
/// # Responsibility
///
/// Evaluates the derivative at a given time and state. Does NOT integrate
/// (that's the stepper's job).
///
/// The state shape is fixed by the initial condition: every call must return
/// a vector of the same length as `y`.
///
/// # Closures
///
/// Any `Fn(f64, &DVector<f64>) -> DVector<f64>` is an `OdeSystem`:
///
/// ```rust
/// use nalgebra::DVector;
/// use numeric_rs::problem::OdeSystem;
///
/// let decay = |_t: f64, y: &DVector<f64>| -0.5 * y;
/// let dy = decay.derivative(0.0, &DVector::from_vec(vec![2.0]));
/// assert_eq!(dy[0], -1.0);
/// ```
pub trait OdeSystem: Send + Sync {
    /// Evaluate `f(t, y)`
    fn derivative(&self, t: f64, y: &DVector<f64>) -> DVector<f64>;

    /// Name of the system (used in result metadata and logging)
    fn name(&self) -> &str {
        "ODE system"
    }
}

impl<F> OdeSystem for F
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64> + Send + Sync,
{
    fn derivative(&self, t: f64, y: &DVector<f64>) -> DVector<f64> {
        self(t, y)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Oscillator {
        omega: f64,
    }

    impl OdeSystem for Oscillator {
        fn derivative(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> {
            DVector::from_vec(vec![y[1], -self.omega * self.omega * y[0]])
        }

        fn name(&self) -> &str {
            "Harmonic Oscillator"
        }
    }

    #[test]
    fn test_struct_system() {
        let system = Oscillator { omega: 2.0 };
        let dy = system.derivative(0.0, &DVector::from_vec(vec![1.0, 0.0]));

        assert_eq!(dy, DVector::from_vec(vec![0.0, -4.0]));
        assert_eq!(system.name(), "Harmonic Oscillator");
    }

    #[test]
    fn test_closure_system_uses_time() {
        let forcing = |t: f64, y: &DVector<f64>| y.map(|_| t.cos());
        let dy = forcing.derivative(0.0, &DVector::from_element(3, 5.0));

        assert_eq!(dy, DVector::from_element(3, 1.0));
        assert_eq!(forcing.name(), "ODE system");
    }
}
