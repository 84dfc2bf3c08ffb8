//! Step and assembly traits
//!
//! # Design Philosophy
//!
//! The engines own the marching loop; the schemes only describe one step:
//!
//! - [`Stepper`]: advances an ODE state across one grid interval
//! - [`Assembler`]: builds the linear system of one implicit PDE time row
//!
//! New schemes are added by implementing one of these traits. Implementations
//! carry no mutable state, so a single instance can serve any number of
//! independent `solve` calls.

use nalgebra::{DMatrix, DVector};
use ndarray::ArrayView2;

use crate::error::NumericResult;
use crate::problem::OdeSystem;

// =================================================================================================
// ODE Stepper
// =================================================================================================

/// Single-step advance rule for `dy/dt = f(t, y)`
///
/// Given the step `[t0, t1]` of width `dt` and the state `y0` at `t0`,
/// returns the increment `Δy` such that `y1 = y0 + Δy`.
///
/// A stage whose length differs from `y0` is never combined with it: the
/// step returns that stage unchanged and the engine reports the mismatch.
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use numeric_rs::solver::{ForwardEuler, Stepper};
///
/// let growth = |_t: f64, _y: &DVector<f64>| DVector::from_vec(vec![2.0]);
/// let dy = ForwardEuler.step(&growth, 0.0, 0.5, 0.5, &DVector::from_vec(vec![1.0]));
/// assert_eq!(dy[0], 1.0);
/// ```
pub trait Stepper: Send + Sync {
    /// Increment `Δy` over `[t0, t1]`
    fn step(&self, system: &dyn OdeSystem, t0: f64, dt: f64, t1: f64, y0: &DVector<f64>) -> DVector<f64>;

    /// Number of derivative evaluations per step
    fn stages(&self) -> usize;

    /// Order of the local truncation error is `order() + 1`
    fn order(&self) -> usize;

    /// Name of the method
    fn name(&self) -> &str;
}

// =================================================================================================
// PDE Assembler
// =================================================================================================

/// Which ends of the space interval carry a boundary function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryLayout {
    /// `ua` on the first column and `ub` on the last one
    TwoSided,

    /// `ua` on the first column only; the last column is solved for
    LeftOnly,
}

impl BoundaryLayout {
    /// Number of columns excluded from the linear system
    pub fn fixed_columns(&self) -> usize {
        match self {
            BoundaryLayout::TwoSided => 2,
            BoundaryLayout::LeftOnly => 1,
        }
    }

    /// Number of unknowns for a space grid of `columns` points
    pub fn unknowns(&self, columns: usize) -> usize {
        columns.saturating_sub(self.fixed_columns())
    }
}

/// Parameters shared by every row of one PDE solve
///
/// Computed once per `solve` from the explicit step sizes, or from the first
/// spacing of each grid when no step sizes were configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemeParameters {
    /// Implicit/explicit blending weight in `[0, 1]`
    pub sigma: f64,

    /// Time step `Δt`
    pub tau: f64,

    /// Space step `Δx`
    pub h: f64,

    /// Scheme-specific mesh ratio
    pub lam: f64,
}

/// Linear system `A x = b` of one implicit time row
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    /// Coefficient matrix `A`
    pub matrix: DMatrix<f64>,

    /// Right-hand side `b`
    pub rhs: DVector<f64>,
}

impl LinearSystem {
    /// Wrap a matrix and a right-hand side
    pub fn new(matrix: DMatrix<f64>, rhs: DVector<f64>) -> Self {
        Self { matrix, rhs }
    }

    /// Number of unknowns
    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Fill `A` as a tridiagonal matrix with constant `lower`, `diagonal`, `upper` bands
    pub fn tridiagonal(n: usize, lower: f64, diagonal: f64, upper: f64) -> DMatrix<f64> {
        DMatrix::from_fn(n, n, |row, column| {
            if row == column {
                diagonal
            } else if row == column + 1 {
                lower
            } else if column == row + 1 {
                upper
            } else {
                0.0
            }
        })
    }
}

/// Per-equation builder of the implicit step system
///
/// The engine seeds the first `time_levels() - 1` rows and the boundary
/// columns before marching. For every later row `i` it calls
/// [`assemble`](Assembler::assemble) with the buffer filled up to row `i - 1`
/// (and the boundary cells of row `i`), solves the system and writes the
/// result into the unknown columns of row `i`.
pub trait Assembler: Send + Sync {
    /// Name of the scheme
    fn name(&self) -> &str;

    /// Number of time levels in the stencil (2 for parabolic, 3 for leapfrog)
    fn time_levels(&self) -> usize;

    /// Boundary functions the scheme consumes
    fn boundary_layout(&self) -> BoundaryLayout {
        BoundaryLayout::TwoSided
    }

    /// Mesh ratio `lam` from the time and space steps
    fn mesh_ratio(&self, tau: f64, h: f64) -> f64;

    /// Check the stability precondition of the scheme
    fn check_stability(&self, _params: &SchemeParameters) -> NumericResult<()> {
        Ok(())
    }

    /// Build `A x = b` for time row `step`
    fn assemble(&self, step: usize, params: &SchemeParameters, solution: ArrayView2<'_, f64>) -> LinearSystem;
}

// =================================================================================================
// Tests
// =================================================================================================
