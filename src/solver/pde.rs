//! PDE engine
//!
//! [`PdeSolver`] marches a one-dimensional problem row by row on a
//! (time, space) grid. Each new row is implicit: the [`Assembler`] builds the
//! linear system of the row and a [`LinearSolver`] solves it.
//!
//! # Algorithm
//!
//! ```text
//! 1. build and check the time and space grids
//! 2. tau, h  ← explicit steps, else the first grid spacing
//!    lam     ← scheme.mesh_ratio(tau, h)
//!    check_stability(sigma, tau, h, lam)
//! 3. seed   column 0 ← ua(t)              (and last column ← ub(t))
//!           row 0    ← u0(x)              (and row 1 ← u0 + Δt·ut0 for 3 levels)
//! 4. for i in time_levels-1 .. nt:
//!        A x = b  ← scheme.assemble(i, ...)
//!        row i unknown columns ← x
//! ```
//!
//! Seeding writes the boundary columns first and then only the unknown
//! columns of the initial rows, so every cell of the buffer is written once.

use std::sync::Arc;

use ndarray::{Array1, Array2, s};

use crate::error::{Axis, NumericError, NumericResult};
use crate::problem::PdeProblem;
use crate::solver::{
    sample, validate_requested, validate_state, Assembler, AxisGridPolicy, BoundaryLayout,
    ConvectionDiffusion, Diffusion, Grid, GridRule, LinearSolver, SchemeParameters, SpaceTimeSolution,
    Wave,
};

// =================================================================================================
// Configuration
// =================================================================================================

/// Grid and linear-solver settings of a [`PdeSolver`]
///
/// `time_step` and `space_step` are used as the scheme's `tau` and `h`
/// when present; otherwise the first spacing of the built grid is used.
#[derive(Debug, Clone, Default)]
pub struct PdeConfiguration {
    /// How the time grid is derived from the requested times
    pub time_grid: AxisGridPolicy,

    /// How the space grid is derived from the requested points
    pub space_grid: AxisGridPolicy,

    /// Explicit time step
    pub time_step: Option<f64>,

    /// Explicit space step
    pub space_step: Option<f64>,

    /// Solver of the per-row linear systems
    pub linear_solver: LinearSolver,
}

impl PdeConfiguration {
    /// Configuration with identity grids and a dense LU solver
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-step grids on both axes
    pub fn fixed_steps(time_step: f64, space_step: f64) -> NumericResult<Self> {
        Ok(Self {
            time_grid: AxisGridPolicy::fixed_step(time_step)?,
            space_grid: AxisGridPolicy::fixed_step(space_step)?,
            time_step: Some(time_step),
            space_step: Some(space_step),
            linear_solver: LinearSolver::default(),
        })
    }

    /// Configuration from the optional construction arguments
    ///
    /// - both steps → fixed-step grids
    /// - rule only → the rule builds both axes
    /// - nothing → identity grids
    ///
    /// Any other combination is a [`NumericError::Configuration`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use numeric_rs::solver::PdeConfiguration;
    ///
    /// assert!(PdeConfiguration::from_options(Some(0.01), Some(0.1), None).is_ok());
    /// assert!(PdeConfiguration::from_options(Some(0.01), None, None).is_err());
    /// ```
    pub fn from_options(
        time_step: Option<f64>,
        space_step: Option<f64>,
        grid_rule: Option<Arc<dyn GridRule>>,
    ) -> NumericResult<Self> {
        match (time_step, space_step, grid_rule) {
            (Some(tau), Some(h), None) => Self::fixed_steps(tau, h),
            (None, None, Some(rule)) => Ok(Self {
                time_grid: AxisGridPolicy::Custom(Arc::clone(&rule)),
                space_grid: AxisGridPolicy::Custom(rule),
                ..Self::default()
            }),
            (None, None, None) => Ok(Self::default()),
            (_, _, Some(_)) => Err(NumericError::config(
                "time_step/space_step and grid_rule are mutually exclusive arguments",
            )),
            _ => Err(NumericError::config("time_step and space_step must be given together")),
        }
    }

    /// Independent policies for the two axes
    pub fn with_grids(time_grid: AxisGridPolicy, space_grid: AxisGridPolicy) -> Self {
        Self { time_grid, space_grid, ..Self::default() }
    }

    /// Replace the linear solver
    pub fn with_linear_solver(mut self, linear_solver: LinearSolver) -> Self {
        self.linear_solver = linear_solver;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumericResult<()> {
        self.time_grid.validate()?;
        self.space_grid.validate()?;

        for (name, step) in [("time_step", self.time_step), ("space_step", self.space_step)] {
            if let Some(step) = step
                && (!step.is_finite() || step <= 0.0)
            {
                return Err(NumericError::config(format!(
                    "{} must be a positive finite number, got {}",
                    name, step
                )));
            }
        }

        Ok(())
    }

    /// `(tau, h)` for the built grids
    fn mesh_steps(&self, time_grid: &Grid, space_grid: &Grid) -> (f64, f64) {
        let tau = self.time_step.or(time_grid.first_spacing()).unwrap_or(0.0);
        let h = self.space_step.or(space_grid.first_spacing()).unwrap_or(0.0);
        (tau, h)
    }
}

// =================================================================================================
// Engine
// =================================================================================================

/// Implicit-explicit finite-difference engine
///
/// The scheme and problem are checked against each other at construction,
/// so a missing `ut0` or `ub` is reported before anything is computed.
///
/// # Example
///
/// ```rust
/// use numeric_rs::problem::PdeProblem;
/// use numeric_rs::solver::{linspace, DiffusionSolver, PdeConfiguration};
///
/// let problem = PdeProblem::diffusion(|x: f64| x.sin(), |_t: f64| 0.0, |_t: f64| 0.0);
/// let solver = DiffusionSolver::with_config(problem, PdeConfiguration::new()).unwrap();
///
/// let t = linspace(0.0, 0.1, 11);
/// let x = linspace(0.0, std::f64::consts::PI, 21);
/// let solution = solver.solve(&t, &x, 0.5).unwrap();
///
/// assert_eq!(solution.shape(), (11, 21));
/// assert!(solution.max_amplitude(10) < solution.max_amplitude(0));
/// ```
#[derive(Debug, Clone)]
pub struct PdeSolver<A: Assembler> {
    scheme: A,
    problem: PdeProblem,
    config: PdeConfiguration,
}

/// Heat equation engine
pub type DiffusionSolver = PdeSolver<Diffusion>;

/// Wave equation engine
pub type WaveSolver = PdeSolver<Wave>;

/// Convection-diffusion engine
pub type ConvectionDiffusionSolver = PdeSolver<ConvectionDiffusion>;

impl<A: Assembler> PdeSolver<A> {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// [`NumericError::Configuration`] when the configuration is invalid or
    /// the problem lacks a function the scheme needs.
    pub fn new(scheme: A, problem: PdeProblem, config: PdeConfiguration) -> NumericResult<Self> {
        config.validate()?;
        problem.validate_for(&scheme)?;
        Ok(Self { scheme, problem, config })
    }

    /// Difference scheme
    pub fn scheme(&self) -> &A {
        &self.scheme
    }

    /// Problem definition
    pub fn problem(&self) -> &PdeProblem {
        &self.problem
    }

    /// Engine configuration
    pub fn config(&self) -> &PdeConfiguration {
        &self.config
    }

    /// Solve on the requested time and space points with weight `sigma`
    ///
    /// `sigma` weights the new time level: 0 is explicit, 1 fully implicit.
    /// The returned values are indexed by the BUILT grids, which equal the
    /// requested points only for identity policies.
    ///
    /// # Errors
    ///
    /// - [`NumericError::Configuration`]: `sigma` outside `[0, 1]`, invalid
    ///   requested points, or too few space points for the scheme
    /// - [`NumericError::GridConsistency`]: a built grid misses its endpoints
    /// - [`NumericError::StabilityViolation`]: raised before any row is solved
    /// - [`NumericError::SingularSystem`]: a row could not be solved
    /// - [`NumericError::NonFiniteState`]: a row contains NaN or Inf
    pub fn solve(&self, times: &[f64], space: &[f64], sigma: f64) -> NumericResult<SpaceTimeSolution> {
        if !(0.0..=1.0).contains(&sigma) {
            return Err(NumericError::config(format!("sigma must lie in [0, 1], got {}", sigma)));
        }

        validate_requested(times, Axis::Time)?;
        validate_requested(space, Axis::Space)?;

        let time_grid = self.config.time_grid.build(times, Axis::Time)?;
        time_grid.ensure_spans(times, Axis::Time)?;
        let space_grid = self.config.space_grid.build(space, Axis::Space)?;
        space_grid.ensure_spans(space, Axis::Space)?;

        let layout = self.scheme.boundary_layout();
        let (rows, columns) = (time_grid.len(), space_grid.len());
        if layout.unknowns(columns) == 0 {
            return Err(NumericError::config(format!(
                "the {} scheme needs at least {} space points, got {}",
                self.scheme.name(),
                layout.fixed_columns() + 1,
                columns
            )));
        }

        let (tau, h) = self.config.mesh_steps(&time_grid, &space_grid);
        let parameters = SchemeParameters { sigma, tau, h, lam: self.scheme.mesh_ratio(tau, h) };
        self.scheme.check_stability(&parameters)?;

        log::debug!(
            "{}: {} x {} grid, sigma = {}, tau = {}, h = {}, lam = {}",
            self.scheme.name(),
            rows,
            columns,
            sigma,
            tau,
            h,
            parameters.lam
        );

        let mut values = Array2::from_elem((rows, columns), f64::NAN);
        let seeded_rows = self.seed(&mut values, &time_grid, &space_grid)?;

        for i in 0..seeded_rows {
            validate_state(values.row(i).iter().copied(), i, time_grid[i])?;
        }

        let expected = layout.unknowns(columns);
        for i in seeded_rows..rows {
            let system = self.scheme.assemble(i, &parameters, values.view());
            let unknowns = self.config.linear_solver.solve(&system, i)?;

            if unknowns.len() != expected {
                return Err(NumericError::config(format!(
                    "the {} scheme assembled {} unknowns for {} space points, expected {}",
                    self.scheme.name(),
                    unknowns.len(),
                    columns,
                    expected
                )));
            }

            for (k, value) in unknowns.iter().enumerate() {
                values[[i, k + 1]] = *value;
            }

            validate_state(values.row(i).iter().copied(), i, time_grid[i])?;
            log::trace!("{}: row {} (t = {}) solved", self.scheme.name(), i, time_grid[i]);
        }

        let linear_solves = rows.saturating_sub(seeded_rows);
        let mut solution = SpaceTimeSolution::new(values, time_grid, space_grid, parameters);
        solution.add_metadata("solver", self.scheme.name());
        solution.add_metadata("linear solver", self.config.linear_solver.name());
        solution.add_metadata("sigma", &sigma.to_string());
        solution.add_metadata("tau", &tau.to_string());
        solution.add_metadata("h", &h.to_string());
        solution.add_metadata("lam", &parameters.lam.to_string());
        solution.add_metadata("time rows", &rows.to_string());
        solution.add_metadata("space points", &columns.to_string());
        solution.add_metadata("linear solves", &linear_solves.to_string());

        log::info!("{}: completed {} rows ({} linear solves)", self.scheme.name(), rows, linear_solves);

        Ok(solution)
    }

    /// Write boundary columns and initial rows, return the number of seeded rows
    fn seed(&self, values: &mut Array2<f64>, time_grid: &Grid, space_grid: &Grid) -> NumericResult<usize> {
        let (rows, columns) = values.dim();
        let layout = self.scheme.boundary_layout();

        let left = sample(&**self.problem.left(), time_grid);
        values.column_mut(0).assign(&Array1::from(left));

        let interior_end = match layout {
            BoundaryLayout::TwoSided => {
                let right = self.problem.right().ok_or_else(|| {
                    NumericError::config(format!("the {} scheme needs a right boundary function ub", self.scheme.name()))
                })?;
                let right = sample(&**right, time_grid);
                values.column_mut(columns - 1).assign(&Array1::from(right));
                columns - 1
            }
            BoundaryLayout::LeftOnly => columns,
        };

        let interior = &space_grid[1..interior_end];
        let initial = sample(&**self.problem.initial(), interior);
        values.slice_mut(s![0, 1..interior_end]).assign(&Array1::from(initial.clone()));

        let levels = self.scheme.time_levels().max(2);
        if levels > 2 && rows > 1 {
            let velocity = self.problem.initial_velocity().ok_or_else(|| {
                NumericError::config(format!("the {} scheme needs an initial velocity function ut0", self.scheme.name()))
            })?;
            let dt = time_grid.spacing(0);
            let velocity = sample(&**velocity, interior);

            for (k, (u, v)) in initial.iter().zip(&velocity).enumerate() {
                values[[1, k + 1]] = u + dt * v;
            }
        }

        Ok((levels - 1).min(rows))
    }
}

impl<A: Assembler + Default> PdeSolver<A> {
    /// Engine with the default scheme instance
    pub fn with_config(problem: PdeProblem, config: PdeConfiguration) -> NumericResult<Self> {
        Self::new(A::default(), problem, config)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{linspace, ThresholdGuard};
    use approx::assert_relative_eq;

    fn sine_diffusion() -> PdeProblem {
        PdeProblem::diffusion(|x: f64| x.sin(), |_t: f64| 0.0, |_t: f64| 0.0)
    }

    #[test]
    fn test_from_options_combinations() {
        let rule: Arc<dyn GridRule> = Arc::new(|points: &[f64]| points.to_vec());

        assert!(PdeConfiguration::from_options(None, None, None).is_ok());
        assert!(PdeConfiguration::from_options(None, None, Some(Arc::clone(&rule))).is_ok());
        assert!(PdeConfiguration::from_options(Some(0.1), Some(0.1), Some(rule)).unwrap_err().is_configuration());
        assert!(PdeConfiguration::from_options(None, Some(0.1), None).unwrap_err().is_configuration());
    }

    #[test]
    fn test_invalid_explicit_step_rejected() {
        let config = PdeConfiguration { time_step: Some(-1.0), ..PdeConfiguration::default() };
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_missing_right_boundary_rejected_at_construction() {
        let problem = PdeProblem::convection(|x: f64| x, |_t: f64| 0.0);
        let result = DiffusionSolver::with_config(problem, PdeConfiguration::new());
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_sigma_out_of_range() {
        let solver = DiffusionSolver::with_config(sine_diffusion(), PdeConfiguration::new()).unwrap();
        let x = linspace(0.0, 1.0, 5);

        assert!(solver.solve(&[0.0, 0.1], &x, 1.5).unwrap_err().is_configuration());
        assert!(solver.solve(&[0.0, 0.1], &x, f64::NAN).unwrap_err().is_configuration());
    }

    #[test]
    fn test_too_few_space_points() {
        let solver = DiffusionSolver::with_config(sine_diffusion(), PdeConfiguration::new()).unwrap();
        let error = solver.solve(&[0.0, 0.1], &[0.0, 1.0], 1.0).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn test_seeding_corners_take_boundary_values() {
        let problem = PdeProblem::diffusion(|_x: f64| 5.0, |t: f64| 1.0 + t, |t: f64| 2.0 + t);
        let solver = DiffusionSolver::with_config(problem, PdeConfiguration::new()).unwrap();

        let solution = solver.solve(&[0.0], &linspace(0.0, 1.0, 4), 1.0).unwrap();

        assert_eq!(solution.shape(), (1, 4));
        assert_eq!(solution.row(0).to_vec(), vec![1.0, 5.0, 5.0, 2.0]);
        assert_eq!(solution.metadata.get("linear solves"), Some(&"0".to_string()));
    }

    #[test]
    fn test_wave_second_row_seeded_from_velocity() {
        let problem = PdeProblem::wave(|_x: f64| 1.0, |x: f64| x, |_t: f64| 0.0, |_t: f64| 0.0);
        let solver = WaveSolver::with_config(problem, PdeConfiguration::new()).unwrap();

        let solution = solver.solve(&[0.0, 0.1], &[0.0, 0.5, 1.0], 0.5).unwrap();

        assert_eq!(solution.shape(), (2, 3));
        assert_relative_eq!(solution.at(1, 1), 1.05, epsilon = 1e-14);
        assert_eq!(solution.at(1, 0), 0.0);
    }

    #[test]
    fn test_explicit_steps_used_for_mesh_ratio() {
        let config = PdeConfiguration::fixed_steps(0.004, 0.1).unwrap();
        let solver = DiffusionSolver::with_config(sine_diffusion(), config).unwrap();

        let solution = solver.solve(&[0.0, 0.01], &[0.0, 1.0], 0.0).unwrap();

        // ceil(0.01/0.004 + 1) = 4 rows, ceil(1/0.1 + 1) = 11 columns
        assert_eq!(solution.shape(), (4, 11));
        assert_relative_eq!(solution.parameters.lam, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_stability_checked_before_solving() {
        let solver = DiffusionSolver::with_config(sine_diffusion(), PdeConfiguration::new()).unwrap();

        // tau = 0.1, h = 0.25: tau > h²/2
        let error = solver.solve(&[0.0, 0.1, 0.2], &linspace(0.0, 1.0, 5), 0.0).unwrap_err();

        assert!(matches!(error, NumericError::StabilityViolation { .. }));
    }

    #[test]
    fn test_seed_identical_across_parallel_cutoff() {
        let problem = PdeProblem::wave(|x: f64| x.sin(), |x: f64| x.cos(), |t: f64| t, |t: f64| -t);
        let solver = WaveSolver::with_config(problem, PdeConfiguration::new()).unwrap();
        let t = linspace(0.0, 0.2, 21);
        let x = linspace(0.0, std::f64::consts::PI, 41);

        let default_cutoff = solver.solve(&t, &x, 0.5).unwrap();
        let low_cutoff = {
            // Both axes now exceed the cutoff, so boundary and initial samples take the fan-out path
            let _guard = ThresholdGuard::save(2);
            solver.solve(&t, &x, 0.5).unwrap()
        };

        assert_eq!(default_cutoff.values, low_cutoff.values);
        assert_eq!(low_cutoff.at(20, 0), t[20]);
        assert_eq!(low_cutoff.at(20, 40), -t[20]);
    }

    #[test]
    fn test_tridiagonal_solver_matches_dense() {
        let t = linspace(0.0, 0.5, 51);
        let x = linspace(0.0, std::f64::consts::PI, 31);

        let dense = DiffusionSolver::with_config(sine_diffusion(), PdeConfiguration::new())
            .unwrap()
            .solve(&t, &x, 0.5)
            .unwrap();
        let thomas = DiffusionSolver::with_config(
            sine_diffusion(),
            PdeConfiguration::new().with_linear_solver(LinearSolver::Tridiagonal),
        )
        .unwrap()
        .solve(&t, &x, 0.5)
        .unwrap();

        for (a, b) in dense.values.iter().zip(thomas.values.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }
}
