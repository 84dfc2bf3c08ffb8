//! ODE step methods
//!
//! Concrete implementations of the [`Stepper`](crate::solver::Stepper) trait.
//!
//! # Available Methods
//!
//! - **[`ForwardEuler`]**: rectangle rule
//!   - Order: First-order O(dt)
//!   - Cost: 1 function evaluation per step
//!
//! - **[`Simpson`]**: Simpson's rule with Euler-predicted stages
//!   - Cost: 3 function evaluations per step
//!
//! - **[`RungeKutta4`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!
//! Every step rule is stateless and can be shared between solves.

mod euler;
mod rk4;
mod simpson;

pub use euler::ForwardEuler;
pub use rk4::RungeKutta4;
pub use simpson::Simpson;
