//! Solve results
//!
//! - [`Trajectory`]: ODE states at the requested output times
//! - [`SpaceTimeSolution`]: PDE values on the solved (time, space) grids
//!
//! Both keep the grids they were computed on and free-form metadata
//! (solver name, step counts, mesh ratio, ...).

use std::collections::HashMap;

use nalgebra::DVector;
use ndarray::{Array2, ArrayView1};

use crate::solver::{Grid, SchemeParameters};

// =================================================================================================
// ODE Trajectory
// =================================================================================================

/// ODE solution projected onto the requested output times
///
/// `states[i]` is the state at `time_points[i]`; index 0 is always the
/// initial condition.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Requested output times
    pub time_points: Vec<f64>,

    /// State at each requested time
    pub states: Vec<DVector<f64>>,

    /// Grid the solution was marched on
    pub grid: Grid,

    /// Solve metadata
    pub metadata: HashMap<String, String>,
}

impl Trajectory {
    /// Create a trajectory without metadata
    pub fn new(time_points: Vec<f64>, states: Vec<DVector<f64>>, grid: Grid) -> Self {
        Self { time_points, states, grid, metadata: HashMap::new() }
    }

    /// Number of output points
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check there are no output points
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State at the last requested time
    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.states.last()
    }

    /// Time series of state component `k`
    ///
    /// # Panics
    ///
    /// Panics when `k` is out of bounds for the state dimension.
    pub fn component(&self, k: usize) -> Vec<f64> {
        self.states.iter().map(|state| state[k]).collect()
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }
}

// =================================================================================================
// PDE Space-Time Solution
// =================================================================================================

/// PDE solution indexed by (time row, space column) of the solved grids
#[derive(Debug, Clone)]
pub struct SpaceTimeSolution {
    /// Solution values, shape `(time_grid.len(), space_grid.len())`
    pub values: Array2<f64>,

    /// Time grid (rows)
    pub time_grid: Grid,

    /// Space grid (columns)
    pub space_grid: Grid,

    /// Scheme parameters used for every row
    pub parameters: SchemeParameters,

    /// Solve metadata
    pub metadata: HashMap<String, String>,
}

impl SpaceTimeSolution {
    /// Create a solution without metadata
    pub fn new(values: Array2<f64>, time_grid: Grid, space_grid: Grid, parameters: SchemeParameters) -> Self {
        Self { values, time_grid, space_grid, parameters, metadata: HashMap::new() }
    }

    /// `(time rows, space columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Values of time row `i`
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    /// Values of the last time row
    pub fn final_row(&self) -> ArrayView1<'_, f64> {
        self.values.row(self.values.nrows() - 1)
    }

    /// Value at time row `i`, space column `j`
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// Largest absolute value of row `i`, boundary columns included
    pub fn max_amplitude(&self, i: usize) -> f64 {
        self.values.row(i).iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }
}

// =================================================================================================
// Tests
// =================================================================================================
