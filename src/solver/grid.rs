//! Grid construction
//!
//! A [`Grid`] is the strictly increasing sequence of coordinates an engine
//! marches over. It is built once per `solve` call from the caller's
//! requested points according to a [`GridPolicy`]:
//!
//! | Policy        | Result                                                        |
//! |---------------|---------------------------------------------------------------|
//! | `FixedStep`   | `ceil(|end - start| / h + 1)` evenly spaced points            |
//! | `Custom`      | whatever the caller's rule returns (validated afterwards)     |
//! | `Identity`    | the requested points, unmodified                              |
//!
//! # Fixed-step rounding
//!
//! The point count is rounded **up** and the interval is then evenly
//! re-spaced, so the realised step is never larger than the requested one
//! and generally not equal to it:
//!
//! ```rust
//! use numeric_rs::solver::{AxisGridPolicy, Axis};
//!
//! let policy = AxisGridPolicy::fixed_step(0.3).unwrap();
//! let grid = policy.build(&[0.0, 1.0], Axis::Space).unwrap();
//!
//! assert_eq!(grid.len(), 5);                 // ceil(1/0.3 + 1) = ceil(4.33) = 5
//! assert_eq!(grid.first(), 0.0);
//! assert_eq!(grid.last(), 1.0);
//! assert!((grid.spacing(0) - 0.25).abs() < 1e-15);
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{Axis, NumericError, NumericResult};
use crate::problem::OdeSystem;

// =================================================================================================
// Grid
// =================================================================================================

/// Strictly increasing sequence of finite coordinates
///
/// Immutable once built. Dereferences to `[f64]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<f64>,
}

impl Grid {
    /// Validate and wrap a sequence of coordinates
    ///
    /// Fails with [`NumericError::GridConsistency`] when the sequence is
    /// empty, contains non-finite values or is not strictly increasing.
    pub fn new(points: Vec<f64>, axis: Axis) -> NumericResult<Self> {
        if points.is_empty() {
            return Err(NumericError::grid(axis, "grid rule returned no points"));
        }

        if let Some(index) = points.iter().position(|x| !x.is_finite()) {
            return Err(NumericError::grid(
                axis,
                format!("grid point {} is not finite ({})", index, points[index]),
            ));
        }

        if let Some(index) = points.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(NumericError::grid(
                axis,
                format!(
                    "grid is not strictly increasing: point {} ({}) is followed by {}",
                    index,
                    points[index],
                    points[index + 1]
                ),
            ));
        }

        Ok(Self { points })
    }

    /// Coordinates of the grid
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// First coordinate
    pub fn first(&self) -> f64 {
        self.points[0]
    }

    /// Last coordinate
    pub fn last(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Width of interval `i` (`points[i + 1] - points[i]`)
    ///
    /// # Panics
    ///
    /// Panics when `i + 1` is out of bounds.
    pub fn spacing(&self, i: usize) -> f64 {
        self.points[i + 1] - self.points[i]
    }

    /// Width of the first interval, `None` for a single-point grid
    pub fn first_spacing(&self) -> Option<f64> {
        (self.points.len() > 1).then(|| self.spacing(0))
    }

    /// Number of intervals
    pub fn intervals(&self) -> usize {
        self.points.len() - 1
    }

    /// Check the grid starts and ends exactly on the requested endpoints
    ///
    /// Exact floating-point equality is required: a mismatch always points at
    /// a faulty grid rule and is never recovered.
    pub fn ensure_spans(&self, requested: &[f64], axis: Axis) -> NumericResult<()> {
        let (Some(&start), Some(&end)) = (requested.first(), requested.last()) else {
            return Err(NumericError::config(format!("no requested {} points", axis)));
        };

        if self.first() != start || self.last() != end {
            return Err(NumericError::grid(
                axis,
                format!(
                    "grid and requested edge points must be equal: grid spans [{}, {}], requested [{}, {}]",
                    self.first(),
                    self.last(),
                    start,
                    end
                ),
            ));
        }

        Ok(())
    }

    /// Consume the grid and return its coordinates
    pub fn into_vec(self) -> Vec<f64> {
        self.points
    }
}

impl Deref for Grid {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// `n` evenly spaced points from `start` to `end`, both included
///
/// The last point is set to `end` exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            points[n - 1] = end;
            points
        }
    }
}

/// Number of points a fixed-step grid over `[start, end]` receives
pub fn fixed_step_count(start: f64, end: f64, step: f64) -> usize {
    ((end - start).abs() / step + 1.0).ceil() as usize
}

/// Check caller-requested points are usable as grid endpoints
///
/// They must be non-empty, finite and strictly increasing.
pub fn validate_requested(points: &[f64], axis: Axis) -> NumericResult<()> {
    if points.is_empty() {
        return Err(NumericError::config(format!("at least one {} point must be requested", axis)));
    }

    if points.iter().any(|x| !x.is_finite()) {
        return Err(NumericError::config(format!("requested {} points must be finite", axis)));
    }

    if let Some(index) = points.windows(2).position(|pair| pair[1] <= pair[0]) {
        return Err(NumericError::config(format!(
            "requested {} points must be sorted in strictly increasing order (index {}: {} then {})",
            axis,
            index,
            points[index],
            points[index + 1]
        )));
    }

    Ok(())
}

// =================================================================================================
// Custom Grid Rules
// =================================================================================================

/// Caller-supplied construction rule for a PDE axis
///
/// Any `Fn(&[f64]) -> Vec<f64>` is a `GridRule`.
pub trait GridRule: Send + Sync {
    /// Build a grid from the requested points
    fn build(&self, requested: &[f64]) -> Vec<f64>;
}

impl<F> GridRule for F
where
    F: Fn(&[f64]) -> Vec<f64> + Send + Sync,
{
    fn build(&self, requested: &[f64]) -> Vec<f64> {
        self(requested)
    }
}

/// Caller-supplied construction rule for an ODE marching grid
///
/// The rule sees the derivative function and initial state, so it can place
/// points where the solution varies fastest.
pub trait OdeGridRule: Send + Sync {
    /// Build a grid from the requested output times
    fn build(&self, system: &dyn OdeSystem, y0: &DVector<f64>, requested: &[f64]) -> Vec<f64>;
}

impl<F> OdeGridRule for F
where
    F: Fn(&dyn OdeSystem, &DVector<f64>, &[f64]) -> Vec<f64> + Send + Sync,
{
    fn build(&self, system: &dyn OdeSystem, y0: &DVector<f64>, requested: &[f64]) -> Vec<f64> {
        self(system, y0, requested)
    }
}

// =================================================================================================
// Grid Policy
// =================================================================================================

/// How a grid is derived from the requested points
///
/// `R` is the custom rule type: [`GridRule`] for PDE axes,
/// [`OdeGridRule`] for ODE marching grids.
pub enum GridPolicy<R: ?Sized> {
    /// Evenly spaced grid whose step does not exceed `step`
    FixedStep {
        /// Requested (maximal) step size
        step: f64,
    },

    /// Caller-supplied rule
    Custom(Arc<R>),

    /// Requested points used as-is
    Identity,
}

/// Grid policy of a PDE axis
pub type AxisGridPolicy = GridPolicy<dyn GridRule>;

/// Grid policy of an ODE marching grid
pub type OdeGridPolicy = GridPolicy<dyn OdeGridRule>;

impl<R: ?Sized> GridPolicy<R> {
    /// Fixed-step policy
    ///
    /// Fails when `step` is not a positive finite number.
    pub fn fixed_step(step: f64) -> NumericResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(NumericError::config(format!(
                "step size must be a positive finite number, got {}",
                step
            )));
        }
        Ok(Self::FixedStep { step })
    }

    /// Policy from the two mutually exclusive optional arguments
    ///
    /// - step only → `FixedStep`
    /// - rule only → `Custom`
    /// - neither → `Identity`
    /// - both → [`NumericError::Configuration`]
    pub fn from_options(step_size: Option<f64>, rule: Option<Arc<R>>) -> NumericResult<Self> {
        match (step_size, rule) {
            (Some(_), Some(_)) => Err(NumericError::config(
                "step_size and grid_rule are mutually exclusive arguments",
            )),
            (Some(step), None) => Self::fixed_step(step),
            (None, Some(rule)) => Ok(Self::Custom(rule)),
            (None, None) => Ok(Self::Identity),
        }
    }

    /// Requested step of a fixed-step policy
    pub fn step_size(&self) -> Option<f64> {
        match self {
            Self::FixedStep { step } => Some(*step),
            _ => None,
        }
    }

    /// Policy name (for metadata and logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::FixedStep { .. } => "fixed-step",
            Self::Custom(_) => "custom",
            Self::Identity => "identity",
        }
    }

    /// Re-check the parameters of the policy
    pub fn validate(&self) -> NumericResult<()> {
        match self {
            Self::FixedStep { step } if !step.is_finite() || *step <= 0.0 => Err(
                NumericError::config(format!("step size must be a positive finite number, got {}", step)),
            ),
            _ => Ok(()),
        }
    }

    /// Build the grid, delegating the custom case to `custom`
    pub(crate) fn build_with<F>(&self, requested: &[f64], axis: Axis, custom: F) -> NumericResult<Grid>
    where
        F: FnOnce(&R, &[f64]) -> Vec<f64>,
    {
        self.validate()?;

        let (Some(&start), Some(&end)) = (requested.first(), requested.last()) else {
            return Err(NumericError::config(format!("at least one {} point must be requested", axis)));
        };

        let points = match self {
            Self::FixedStep { step } => {
                let count = fixed_step_count(start, end, *step);
                let points = linspace(start, end, count);
                log::debug!(
                    "{} grid: fixed step {} realised as {} points (step {})",
                    axis,
                    step,
                    count,
                    if count > 1 { (end - start) / (count - 1) as f64 } else { 0.0 }
                );
                points
            }
            Self::Custom(rule) => {
                let points = custom(rule, requested);
                log::debug!("{} grid: custom rule produced {} points", axis, points.len());
                points
            }
            Self::Identity => requested.to_vec(),
        };

        Grid::new(points, axis)
    }
}

impl GridPolicy<dyn GridRule> {
    /// Custom policy from any [`GridRule`]
    pub fn from_rule<G: GridRule + 'static>(rule: G) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Build the grid of one PDE axis
    pub fn build(&self, requested: &[f64], axis: Axis) -> NumericResult<Grid> {
        self.build_with(requested, axis, |rule, points| rule.build(points))
    }
}

impl GridPolicy<dyn OdeGridRule> {
    /// Custom policy from any [`OdeGridRule`]
    pub fn from_rule<G: OdeGridRule + 'static>(rule: G) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Build the marching grid of an ODE solve
    pub fn build(&self, system: &dyn OdeSystem, y0: &DVector<f64>, requested: &[f64]) -> NumericResult<Grid> {
        self.build_with(requested, Axis::Time, |rule, points| rule.build(system, y0, points))
    }
}

impl<R: ?Sized> Clone for GridPolicy<R> {
    fn clone(&self) -> Self {
        match self {
            Self::FixedStep { step } => Self::FixedStep { step: *step },
            Self::Custom(rule) => Self::Custom(Arc::clone(rule)),
            Self::Identity => Self::Identity,
        }
    }
}

impl<R: ?Sized> Default for GridPolicy<R> {
    fn default() -> Self {
        Self::Identity
    }
}

impl<R: ?Sized> fmt::Debug for GridPolicy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedStep { step } => f.debug_struct("FixedStep").field("step", step).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
            Self::Identity => write!(f, "Identity"),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
