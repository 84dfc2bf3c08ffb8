//! Error types
//!
//! Every fallible operation of the crate returns [`NumericResult`]. Errors
//! are reported synchronously to the caller of `solve`; nothing is retried
//! and no partial solution buffer is ever handed back.
//!
//! # Example
//!
//! ```rust
//! use numeric_rs::error::{NumericError, NumericResult};
//!
//! fn check_sigma(sigma: f64) -> NumericResult<()> {
//!     if !(0.0..=1.0).contains(&sigma) {
//!         return Err(NumericError::config(format!("sigma must lie in [0, 1], got {}", sigma)));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_sigma(0.5).is_ok());
//! assert!(check_sigma(2.0).is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type NumericResult<T> = Result<T, NumericError>;

/// Axis a grid was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Time axis (ODE marching grid or PDE rows)
    Time,
    /// Space axis (PDE columns)
    Space,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Time => write!(f, "time"),
            Axis::Space => write!(f, "space"),
        }
    }
}

/// Error taxonomy of the time-stepping engines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// Mutually exclusive, missing or out-of-range construction parameters
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// A built grid does not reproduce the requested endpoints or is not
    /// strictly increasing. Always indicates a defect in the grid rule.
    #[error("grid consistency error on {axis} axis: {message}")]
    GridConsistency {
        /// Axis of the faulty grid
        axis: Axis,
        /// Description of the inconsistency
        message: String,
    },

    /// Stability precondition of a difference scheme is violated
    #[error("stability violation in {scheme} scheme: {message}")]
    StabilityViolation {
        /// Name of the scheme
        scheme: String,
        /// Violated bound, with the offending values
        message: String,
    },

    /// The linear system of one implicit time step could not be solved
    #[error("singular linear system at time step {step}: {message}")]
    SingularSystem {
        /// Index of the time row being solved
        step: usize,
        /// Failure detail reported by the linear solver
        message: String,
    },

    /// A marched state contains NaN or infinite values
    #[error("non-finite value detected at step {step} (t = {time}); the configuration is numerically unstable")]
    NonFiniteState {
        /// Index of the offending grid row
        step: usize,
        /// Grid coordinate of the offending row
        time: f64,
    },
}

impl NumericError {
    /// Build a [`NumericError::Configuration`]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Build a [`NumericError::GridConsistency`]
    pub fn grid(axis: Axis, message: impl Into<String>) -> Self {
        Self::GridConsistency { axis, message: message.into() }
    }

    /// Build a [`NumericError::StabilityViolation`]
    pub fn stability(scheme: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StabilityViolation { scheme: scheme.into(), message: message.into() }
    }

    /// Build a [`NumericError::SingularSystem`]
    pub fn singular(step: usize, message: impl Into<String>) -> Self {
        Self::SingularSystem { step, message: message.into() }
    }

    /// Whether the error was raised before any computation took place
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
