//! Linear solves of the implicit PDE rows
//!
//! Two strategies are available:
//!
//! - [`LinearSolver::DenseLu`]: LU decomposition with partial pivoting
//!   (nalgebra). Works for any square system.
//! - [`LinearSolver::Tridiagonal`]: Thomas algorithm, O(n) instead of O(n³).
//!   Only valid for tridiagonal matrices, which every built-in scheme produces.
//!
//! Both refuse to return garbage: a singular or numerically singular matrix
//! is reported as [`NumericError::SingularSystem`] with the failing row index.

use nalgebra::DVector;

use crate::error::{NumericError, NumericResult};
use crate::solver::LinearSystem;

/// Smallest accepted ratio between the smallest and the largest LU pivot
const PIVOT_RATIO_THRESHOLD: f64 = f64::EPSILON;

/// Strategy used to solve `A x = b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinearSolver {
    /// Dense LU decomposition
    #[default]
    DenseLu,

    /// Thomas algorithm for tridiagonal matrices
    Tridiagonal,
}

impl LinearSolver {
    /// Strategy name (for metadata and logging)
    pub fn name(&self) -> &'static str {
        match self {
            LinearSolver::DenseLu => "dense LU",
            LinearSolver::Tridiagonal => "tridiagonal (Thomas)",
        }
    }

    /// Solve `system` for time row `step`
    pub fn solve(&self, system: &LinearSystem, step: usize) -> NumericResult<DVector<f64>> {
        let n = system.size();

        if system.matrix.nrows() != n || system.matrix.ncols() != n {
            return Err(NumericError::singular(
                step,
                format!(
                    "matrix is {}x{} but the right-hand side has {} entries",
                    system.matrix.nrows(),
                    system.matrix.ncols(),
                    n
                ),
            ));
        }

        if n == 0 {
            return Ok(DVector::zeros(0));
        }

        let solution = match self {
            LinearSolver::DenseLu => solve_dense(system, step)?,
            LinearSolver::Tridiagonal => solve_tridiagonal(system, step)?,
        };

        if solution.iter().any(|x| !x.is_finite()) {
            return Err(NumericError::singular(step, "solution contains non-finite values"));
        }

        Ok(solution)
    }
}

/// LU decomposition with a pivot-ratio check
fn solve_dense(system: &LinearSystem, step: usize) -> NumericResult<DVector<f64>> {
    let lu = system.matrix.clone().lu();

    let pivots = lu.u().diagonal().map(f64::abs);
    let largest = pivots.max();
    let smallest = pivots.min();

    if largest == 0.0 || smallest / largest < PIVOT_RATIO_THRESHOLD {
        return Err(NumericError::singular(
            step,
            format!(
                "matrix is singular to working precision (pivot ratio {:e})",
                if largest == 0.0 { 0.0 } else { smallest / largest }
            ),
        ));
    }

    lu.solve(&system.rhs)
        .ok_or_else(|| NumericError::singular(step, "LU decomposition failed to solve the system"))
}

/// Thomas algorithm on the three central bands of the matrix
fn solve_tridiagonal(system: &LinearSystem, step: usize) -> NumericResult<DVector<f64>> {
    let matrix = &system.matrix;
    let n = system.size();

    for row in 0..n {
        for column in 0..n {
            if row.abs_diff(column) > 1 && matrix[(row, column)] != 0.0 {
                return Err(NumericError::singular(
                    step,
                    format!("matrix is not tridiagonal: entry ({}, {}) is non-zero", row, column),
                ));
            }
        }
    }

    let scale = matrix.amax();
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    // Forward sweep
    for i in 0..n {
        let lower = if i > 0 { matrix[(i, i - 1)] } else { 0.0 };
        let previous_upper = if i > 0 { upper[i - 1] } else { 0.0 };
        let previous_rhs = if i > 0 { rhs[i - 1] } else { 0.0 };

        let pivot = matrix[(i, i)] - lower * previous_upper;
        if pivot.abs() <= PIVOT_RATIO_THRESHOLD * scale {
            return Err(NumericError::singular(step, format!("zero pivot in row {}", i)));
        }

        upper[i] = if i + 1 < n { matrix[(i, i + 1)] / pivot } else { 0.0 };
        rhs[i] = (system.rhs[i] - lower * previous_rhs) / pivot;
    }

    // Back substitution
    let mut solution = DVector::zeros(n);
    solution[n - 1] = rhs[n - 1];
    for i in (0..n - 1).rev() {
        solution[i] = rhs[i] - upper[i] * solution[i + 1];
    }

    Ok(solution)
}

// =================================================================================================
// Tests
// =================================================================================================
