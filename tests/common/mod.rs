//! Common utilities for integration tests

pub mod mock_systems;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_systems::{ConstantGrowth, ExponentialDecay, HarmonicOscillator};
pub use test_helpers::{assert_vectors_close, compute_l2_error, relative_error, uniform_times};
