//! ODE engine
//!
//! [`OdeSolver`] marches an [`OdeSystem`] across its grid with a [`Stepper`]
//! and projects the march onto the requested output times.
//!
//! # Algorithm
//!
//! ```text
//! requested ──► grid policy ──► marching grid (endpoints checked)
//!
//! y ← y0
//! for each interval [t0, t1] of the grid:
//!     y1 ← y + stepper.step(f, t0, t1 - t0, t1, y)
//!     while the next requested time t ≤ t1:
//!         output ← interpolation.project(t0, y, f0, t1, y1, f1, t)
//!     y ← y1
//! ```
//!
//! The requested times are sorted, so a single cursor walks them while the
//! grid is marched once.

use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{Axis, NumericError, NumericResult};
use crate::problem::OdeSystem;
use crate::solver::{
    validate_requested, validate_state, ForwardEuler, Interpolation, OdeGridPolicy, OdeGridRule,
    RungeKutta4, Simpson, Stepper, Trajectory,
};

// =================================================================================================
// Configuration
// =================================================================================================

/// Grid and interpolation settings of an [`OdeSolver`]
#[derive(Debug, Clone, Default)]
pub struct OdeConfiguration {
    /// How the marching grid is derived from the requested times
    pub grid: OdeGridPolicy,

    /// How a marching step is projected onto a requested time
    pub interpolation: Interpolation,
}

impl OdeConfiguration {
    /// Create a configuration
    pub fn new(grid: OdeGridPolicy, interpolation: Interpolation) -> Self {
        Self { grid, interpolation }
    }

    /// Fixed-step marching with linear interpolation
    pub fn fixed_step(step: f64) -> NumericResult<Self> {
        Ok(Self::new(OdeGridPolicy::fixed_step(step)?, Interpolation::Linear))
    }

    /// Configuration from the optional construction arguments
    ///
    /// `step_size` and `grid_rule` are mutually exclusive; supplying both is
    /// a [`NumericError::Configuration`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use numeric_rs::solver::{Interpolation, OdeConfiguration};
    ///
    /// let config = OdeConfiguration::from_options(Some(0.1), None, Interpolation::CubicHermite).unwrap();
    /// assert_eq!(config.grid.step_size(), Some(0.1));
    /// ```
    pub fn from_options(
        step_size: Option<f64>,
        grid_rule: Option<Arc<dyn OdeGridRule>>,
        interpolation: Interpolation,
    ) -> NumericResult<Self> {
        Ok(Self::new(OdeGridPolicy::from_options(step_size, grid_rule)?, interpolation))
    }

    /// Replace the interpolation mode
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumericResult<()> {
        self.grid.validate()
    }
}

// =================================================================================================
// Engine
// =================================================================================================

/// Single-step ODE engine
///
/// One instance is immutable after construction and may serve any number of
/// `solve` calls, including concurrent ones.
#[derive(Debug, Clone)]
pub struct OdeSolver<S: Stepper> {
    stepper: S,
    config: OdeConfiguration,
}

/// Forward Euler engine
pub type EulerSolver = OdeSolver<ForwardEuler>;

/// Simpson engine
pub type SimpsonSolver = OdeSolver<Simpson>;

/// Classical Runge-Kutta engine
pub type RK4Solver = OdeSolver<RungeKutta4>;

impl<S: Stepper> OdeSolver<S> {
    /// Create an engine from a stepper and a configuration
    pub fn new(stepper: S, config: OdeConfiguration) -> Self {
        Self { stepper, config }
    }

    /// Stepper used for every interval
    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    /// Engine configuration
    pub fn config(&self) -> &OdeConfiguration {
        &self.config
    }

    /// Name of the underlying method
    pub fn name(&self) -> &str {
        self.stepper.name()
    }

    /// Solve `dy/dt = f(t, y)`, `y(times[0]) = y0`
    ///
    /// `times` must be non-empty, finite and strictly increasing. The
    /// returned trajectory holds one state per requested time; index 0 is
    /// `y0` itself.
    ///
    /// # Errors
    ///
    /// - [`NumericError::Configuration`]: invalid `times`, non-finite `y0`,
    ///   or a derivative or projected state whose length differs from `y0`
    /// - [`NumericError::GridConsistency`]: the marching grid misses the
    ///   requested endpoints
    /// - [`NumericError::NonFiniteState`]: a marched state, a derivative
    ///   sample or a projected output holds NaN or Inf
    pub fn solve(&self, system: &dyn OdeSystem, y0: &DVector<f64>, times: &[f64]) -> NumericResult<Trajectory> {
        self.config.validate()?;
        validate_requested(times, Axis::Time)?;

        if y0.iter().any(|x| !x.is_finite()) {
            return Err(NumericError::config("initial state must be finite"));
        }

        let grid = self.config.grid.build(system, y0, times)?;
        grid.ensure_spans(times, Axis::Time)?;

        log::debug!(
            "{}: solving '{}' (dim {}) on {} grid points, {} output times, {} interpolation",
            self.stepper.name(),
            system.name(),
            y0.len(),
            grid.len(),
            times.len(),
            self.config.interpolation.name()
        );

        let dimension = y0.len();
        let interpolation = &self.config.interpolation;
        let needs_derivatives = interpolation.needs_derivatives();
        let empty = DVector::zeros(0);

        let mut states = vec![DVector::from_element(dimension, f64::NAN); times.len()];
        states[0] = y0.clone();

        let mut cursor = 1;
        let mut evaluations = 0;
        let mut current = y0.clone();

        for (step, interval) in grid.windows(2).enumerate() {
            let (t0, t1) = (interval[0], interval[1]);

            let increment = self.stepper.step(system, t0, t1 - t0, t1, &current);
            evaluations += self.stepper.stages();

            check_length(system, "derivative", increment.len(), dimension)?;

            let next = &current + increment;
            validate_state(next.iter().copied(), step + 1, t1)?;

            if cursor < times.len() && t1 >= times[cursor] {
                let (f0, f1) = if needs_derivatives {
                    evaluations += 2;
                    let f0 = system.derivative(t0, &current);
                    let f1 = system.derivative(t1, &next);
                    check_length(system, "derivative", f0.len(), dimension)?;
                    check_length(system, "derivative", f1.len(), dimension)?;
                    validate_state(f0.iter().chain(f1.iter()).copied(), step + 1, t1)?;
                    (f0, f1)
                } else {
                    (empty.clone(), empty.clone())
                };

                while cursor < times.len() && t1 >= times[cursor] {
                    let projected = interpolation.project(t0, &current, &f0, t1, &next, &f1, times[cursor]);
                    check_length(system, "projected state", projected.len(), dimension)?;
                    validate_state(projected.iter().copied(), step + 1, times[cursor])?;
                    states[cursor] = projected;
                    cursor += 1;
                }
            }

            current = next;
        }

        if cursor < times.len() {
            log::warn!(
                "{}: {} requested times lie outside the marching grid and are left undefined",
                self.stepper.name(),
                times.len() - cursor
            );
        }

        let marching_steps = grid.intervals();
        let mut trajectory = Trajectory::new(times.to_vec(), states, grid);
        trajectory.add_metadata("solver", self.stepper.name());
        trajectory.add_metadata("system", system.name());
        trajectory.add_metadata("grid policy", self.config.grid.name());
        trajectory.add_metadata("interpolation", interpolation.name());
        trajectory.add_metadata("marching steps", &marching_steps.to_string());
        trajectory.add_metadata("function evaluations", &evaluations.to_string());

        log::info!(
            "{}: completed {} steps ({} function evaluations)",
            self.stepper.name(),
            marching_steps,
            evaluations
        );

        Ok(trajectory)
    }
}

fn check_length(system: &dyn OdeSystem, what: &str, length: usize, dimension: usize) -> NumericResult<()> {
    if length != dimension {
        return Err(NumericError::config(format!(
            "{} of '{}' has length {} but the state has length {}",
            what,
            system.name(),
            length,
            dimension
        )));
    }
    Ok(())
}

impl<S: Stepper + Default> OdeSolver<S> {
    /// Engine with the default stepper instance
    pub fn with_config(config: OdeConfiguration) -> Self {
        Self::new(S::default(), config)
    }

    /// Engine from the optional construction arguments
    ///
    /// See [`OdeConfiguration::from_options`].
    pub fn from_options(
        step_size: Option<f64>,
        grid_rule: Option<Arc<dyn OdeGridRule>>,
        interpolation: Interpolation,
    ) -> NumericResult<Self> {
        Ok(Self::with_config(OdeConfiguration::from_options(step_size, grid_rule, interpolation)?))
    }
}

impl<S: Stepper + Default> Default for OdeSolver<S> {
    fn default() -> Self {
        Self::with_config(OdeConfiguration::default())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decay() -> impl Fn(f64, &DVector<f64>) -> DVector<f64> + Send + Sync {
        |_t: f64, y: &DVector<f64>| -y
    }

    fn one() -> DVector<f64> {
        DVector::from_vec(vec![1.0])
    }

    #[test]
    fn test_identity_grid_matches_raw_stepper() {
        let solver = EulerSolver::default();
        let system = decay();
        let times = [0.0, 0.1, 0.3];

        let trajectory = solver.solve(&system, &one(), &times).unwrap();

        let mut expected = one();
        for pair in times.windows(2) {
            expected = &expected + ForwardEuler.step(&system, pair[0], pair[1] - pair[0], pair[1], &expected);
        }
        assert_eq!(trajectory.states[2], expected);
        assert_eq!(trajectory.states[0], one());
    }

    #[test]
    fn test_fixed_step_realises_smaller_step() {
        let solver = RK4Solver::from_options(Some(0.3), None, Interpolation::Linear).unwrap();

        let trajectory = solver.solve(&decay(), &one(), &[0.0, 1.0]).unwrap();

        // ceil(1 / 0.3 + 1) = 5 points, step 0.25
        assert_eq!(trajectory.grid.len(), 5);
        assert_relative_eq!(trajectory.grid.spacing(0), 0.25);
        assert_eq!(trajectory.metadata.get("marching steps"), Some(&"4".to_string()));
        assert_eq!(trajectory.metadata.get("function evaluations"), Some(&"16".to_string()));
    }

    #[test]
    fn test_output_between_grid_points_is_interpolated() {
        let config = OdeConfiguration::fixed_step(0.5).unwrap();
        let solver = EulerSolver::with_config(config);
        let growth = |_t: f64, _y: &DVector<f64>| DVector::from_vec(vec![2.0]);

        let trajectory = solver.solve(&growth, &DVector::from_vec(vec![0.0]), &[0.0, 0.25, 0.5, 1.0]).unwrap();

        assert_relative_eq!(trajectory.states[1][0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(trajectory.states[2][0], 1.0, epsilon = 1e-14);
        assert_relative_eq!(trajectory.states[3][0], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_cubic_interpolation_evaluates_derivatives() {
        let config = OdeConfiguration::fixed_step(0.5).unwrap().with_interpolation(Interpolation::CubicHermite);
        let solver = SimpsonSolver::with_config(config);

        let ramp = |t: f64, _y: &DVector<f64>| DVector::from_vec(vec![2.0 * t]);

        let trajectory = solver.solve(&ramp, &DVector::from_vec(vec![0.0]), &[0.0, 0.25, 1.0]).unwrap();

        // 2 steps x 3 stages + 2 derivative pairs
        assert_eq!(trajectory.metadata.get("function evaluations"), Some(&"10".to_string()));
        // y = t^2 is reproduced exactly by Simpson and by the cubic projection
        assert_relative_eq!(trajectory.states[1][0], 0.0625, epsilon = 1e-12);
        assert_relative_eq!(trajectory.states[2][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_time_point_returns_initial_state() {
        let trajectory = RK4Solver::default().solve(&decay(), &one(), &[2.0]).unwrap();

        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.states[0], one());
    }

    #[test]
    fn test_both_grid_options_rejected() {
        let rule: Arc<dyn OdeGridRule> =
            Arc::new(|_s: &dyn OdeSystem, _y: &DVector<f64>, t: &[f64]| t.to_vec());

        let result = RK4Solver::from_options(Some(0.1), Some(rule), Interpolation::Linear);

        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_custom_rule_missing_endpoint_is_grid_error() {
        let rule = |_s: &dyn OdeSystem, _y: &DVector<f64>, t: &[f64]| vec![t[0], 0.5];
        let config = OdeConfiguration::new(OdeGridPolicy::from_rule(rule), Interpolation::Linear);
        let solver = EulerSolver::with_config(config);

        let error = solver.solve(&decay(), &one(), &[0.0, 1.0]).unwrap_err();

        assert!(matches!(error, NumericError::GridConsistency { axis: Axis::Time, .. }));
    }

    #[test]
    fn test_unsorted_times_rejected() {
        let error = EulerSolver::default().solve(&decay(), &one(), &[0.0, 1.0, 0.5]).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_derivative_length_mismatch_rejected() {
        let wrong = |_t: f64, _y: &DVector<f64>| DVector::from_vec(vec![1.0, 2.0]);
        let times = [0.0, 1.0];

        let errors = [
            EulerSolver::default().solve(&wrong, &one(), &times).unwrap_err(),
            SimpsonSolver::default().solve(&wrong, &one(), &times).unwrap_err(),
            RK4Solver::default().solve(&wrong, &one(), &times).unwrap_err(),
        ];

        for error in errors {
            assert!(error.is_configuration());
            assert!(error.to_string().contains("length 2"), "{}", error);
        }
    }

    #[test]
    fn test_shape_change_mid_march_rejected() {
        // Correct shape on the first interval only
        let late = |t: f64, y: &DVector<f64>| if t < 0.5 { -y } else { DVector::zeros(3) };
        let config = OdeConfiguration::fixed_step(0.25).unwrap();

        let error = RK4Solver::with_config(config).solve(&late, &one(), &[0.0, 1.0]).unwrap_err();

        assert!(error.is_configuration());
    }

    #[test]
    fn test_non_finite_projection_rejected() {
        let broken = Interpolation::custom(
            |_: f64, y0: &DVector<f64>, _: &DVector<f64>, _: f64, _: &DVector<f64>, _: &DVector<f64>, _: f64| {
                y0.map(|_| f64::NAN)
            },
        );
        let config = OdeConfiguration::fixed_step(0.5).unwrap().with_interpolation(broken);

        let error = EulerSolver::with_config(config).solve(&decay(), &one(), &[0.0, 0.25, 1.0]).unwrap_err();

        assert_eq!(error, NumericError::NonFiniteState { step: 1, time: 0.25 });
    }

    #[test]
    fn test_non_finite_derivative_sample_rejected() {
        // Finite everywhere the stepper looks, NaN at the step end sampled for the cubic projection
        let spiky = |t: f64, y: &DVector<f64>| if t == 1.0 { y.map(|_| f64::NAN) } else { -y };
        let config = OdeConfiguration::fixed_step(1.0).unwrap().with_interpolation(Interpolation::CubicHermite);

        let error = EulerSolver::with_config(config).solve(&spiky, &one(), &[0.0, 0.5, 1.0]).unwrap_err();

        assert!(matches!(error, NumericError::NonFiniteState { step: 1, .. }));
    }

    #[test]
    fn test_misshaped_projection_rejected() {
        let widening = Interpolation::custom(
            |_: f64, y0: &DVector<f64>, _: &DVector<f64>, _: f64, _: &DVector<f64>, _: &DVector<f64>, _: f64| {
                DVector::zeros(y0.len() + 1)
            },
        );
        let config = OdeConfiguration::fixed_step(1.0).unwrap().with_interpolation(widening);

        let error = EulerSolver::with_config(config).solve(&decay(), &one(), &[0.0, 1.0]).unwrap_err();

        assert!(error.is_configuration());
    }

    #[test]
    fn test_blow_up_reports_non_finite_state() {
        let blow_up = |_t: f64, y: &DVector<f64>| y.map(|v| v * v * 1e200);
        let error = EulerSolver::default()
            .solve(&blow_up, &DVector::from_vec(vec![1e100]), &[0.0, 1.0, 2.0])
            .unwrap_err();

        assert!(matches!(error, NumericError::NonFiniteState { step: 1, .. }));
    }
}
