//! Finite differences and Chebyshev polynomials
//!
//! # Mathematical Background
//!
//! With a fixed step `h`, Taylor expansion of `f` around `x` gives three
//! first-derivative approximations:
//!
//! ```text
//! forward:   f'(x) ≈ (f(x + h) - f(x)) / h              error O(h)
//! backward:  f'(x) ≈ (f(x) - f(x - h)) / h              error O(h)
//! central:   f'(x) ≈ (f(x + h) - f(x - h)) / (2h)       error O(h²)
//! ```
//!
//! Adding the expansions at `x + h` and `x - h` cancels the odd terms:
//!
//! ```text
//! f''(x) ≈ (f(x + h) - 2f(x) + f(x - h)) / h²           error O(h²)
//! ```
//!
//! Chebyshev polynomials follow the three-term recurrence
//! `P_{n+1}(x) = 2x·P_n(x) - P_{n-1}(x)`, started from `T₀ = 1, T₁ = x`
//! (first kind) or `U₀ = 1, U₁ = 2x` (second kind).

use std::fmt;
use std::str::FromStr;

use crate::error::{NumericError, NumericResult};
use crate::solver::sample;

// =================================================================================================
// Finite Differences
// =================================================================================================

/// First-derivative difference formula
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difference {
    /// `(f(x + h) - f(x - h)) / 2h`
    #[default]
    Central,

    /// `(f(x + h) - f(x)) / h`
    Forward,

    /// `(f(x) - f(x - h)) / h`
    Backward,
}

impl Difference {
    /// Apply the formula to `f` at `x`
    pub fn apply<F>(self, f: &F, x: f64, h: f64) -> f64
    where
        F: Fn(f64) -> f64 + ?Sized,
    {
        match self {
            Self::Central => (f(x + h) - f(x - h)) / (2.0 * h),
            Self::Forward => (f(x + h) - f(x)) / h,
            Self::Backward => (f(x) - f(x - h)) / h,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Central => write!(f, "central"),
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// `"left"` and `"right"` name the side the differenced neighbour lies on:
/// `"left"` is the forward formula and `"right"` the backward one.
impl FromStr for Difference {
    type Err = NumericError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "central" => Ok(Self::Central),
            "forward" | "left" => Ok(Self::Forward),
            "backward" | "right" => Ok(Self::Backward),
            other => Err(NumericError::config(format!(
                "difference must be 'central', 'forward' or 'backward', not '{}'",
                other
            ))),
        }
    }
}

/// A function tabulated on a uniform grid
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated {
    /// Grid nodes `start, start + h, ...`
    pub nodes: Vec<f64>,

    /// Value at each node
    pub values: Vec<f64>,
}

/// Uniform nodes `start + i·h` up to `end`
///
/// `end` is included when it falls on the lattice (up to rounding).
fn lattice(start: f64, end: f64, h: f64) -> NumericResult<Vec<f64>> {
    if !(start.is_finite() && end.is_finite()) || end < start {
        return Err(NumericError::config(format!(
            "differentiation interval [{}, {}] must be finite and ordered",
            start, end
        )));
    }

    if !(h.is_finite() && h > 0.0) {
        return Err(NumericError::config(format!("differentiation step must be positive and finite, got {}", h)));
    }

    let count = ((end - start) / h + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| start + h * i as f64).collect())
}

/// First derivative of `f` on the nodes `start, start + h, ..., end`
///
/// # Example
///
/// ```rust
/// use numeric_rs::calculus::{derivative, Difference};
///
/// let slope = derivative(&|x: f64| x * x, 0.0, 1.0, 0.25, Difference::Central).unwrap();
///
/// assert_eq!(slope.nodes.len(), 5);
/// assert!((slope.values[4] - 2.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// [`NumericError::Configuration`] for a non-finite or reversed interval or
/// a step that is not positive.
pub fn derivative<F>(f: &F, start: f64, end: f64, h: f64, difference: Difference) -> NumericResult<Tabulated>
where
    F: Fn(f64) -> f64 + Sync + ?Sized,
{
    let nodes = lattice(start, end, h)?;
    log::debug!("{} difference on {} nodes (h = {})", difference, nodes.len(), h);

    let values = sample(&|x: f64| difference.apply(f, x, h), &nodes);
    Ok(Tabulated { nodes, values })
}

/// Second derivative of `f` on the nodes `start, start + h, ..., end`
///
/// Uses the symmetric three-point formula.
pub fn second_derivative<F>(f: &F, start: f64, end: f64, h: f64) -> NumericResult<Tabulated>
where
    F: Fn(f64) -> f64 + Sync + ?Sized,
{
    let nodes = lattice(start, end, h)?;
    log::debug!("second difference on {} nodes (h = {})", nodes.len(), h);

    let values = sample(&|x: f64| (f(x + h) - 2.0 * f(x) + f(x - h)) / (h * h), &nodes);
    Ok(Tabulated { nodes, values })
}

// =================================================================================================
// Chebyshev Polynomials
// =================================================================================================

fn chebyshev_recurrence(n: usize, x: f64, first: f64) -> f64 {
    let (mut previous, mut current) = (1.0, first);
    if n == 0 {
        return previous;
    }

    for _ in 1..n {
        let next = 2.0 * x * current - previous;
        previous = current;
        current = next;
    }
    current
}

/// Chebyshev polynomial of the first kind `T_n(x)`
///
/// ```rust
/// use numeric_rs::calculus::chebyshev_first;
///
/// // T₃(x) = 4x³ - 3x
/// assert_eq!(chebyshev_first(3, 0.5), -1.0);
/// ```
pub fn chebyshev_first(n: usize, x: f64) -> f64 {
    chebyshev_recurrence(n, x, x)
}

/// Chebyshev polynomial of the second kind `U_n(x)`
pub fn chebyshev_second(n: usize, x: f64) -> f64 {
    chebyshev_recurrence(n, x, 2.0 * x)
}

// =================================================================================================
// Tests
// =================================================================================================
