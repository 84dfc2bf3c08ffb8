//! Output projection
//!
//! The marching grid of an ODE solve rarely coincides with the times the
//! caller asked for. After each step `[t0, t1]` the engine projects the
//! solution onto every requested time the step crossed, using one of:
//!
//! - **Linear**: `y0 + (t - t0)/(t1 - t0) · (y1 - y0)`
//! - **Cubic Hermite**: on `s = (t - t0)/(t1 - t0)`, with `Δt = t1 - t0`,
//!
//!   ```text
//!   h00 = 2s³ - 3s² + 1     h10 = s³ - 2s² + s
//!   h01 = -2s³ + 3s²        h11 = s³ - s²
//!
//!   y(t) = h00·y0 + h10·Δt·f0 + h01·y1 + h11·Δt·f1
//!   ```
//! - **Custom**: any [`InterpolationRule`]
//!
//! Cubic and custom modes consume the derivative samples `f0 = f(t0, y0)`
//! and `f1 = f(t1, y1)`; linear mode never evaluates them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{NumericError, NumericResult};

// =================================================================================================
// Interpolation Rule
// =================================================================================================

/// Caller-supplied projection rule
///
/// Receives both ends of the step with their states and derivative samples,
/// plus the query time `t ∈ [t0, t1]`.
///
/// Any `Fn(f64, &DVector<f64>, &DVector<f64>, f64, &DVector<f64>, &DVector<f64>, f64) -> DVector<f64>`
/// is an `InterpolationRule`.
pub trait InterpolationRule: Send + Sync {
    /// Interpolated state at `t`
    #[allow(clippy::too_many_arguments)]
    fn interpolate(
        &self,
        t0: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
        t1: f64,
        y1: &DVector<f64>,
        f1: &DVector<f64>,
        t: f64,
    ) -> DVector<f64>;
}

impl<F> InterpolationRule for F
where
    F: Fn(f64, &DVector<f64>, &DVector<f64>, f64, &DVector<f64>, &DVector<f64>, f64) -> DVector<f64>
        + Send
        + Sync,
{
    fn interpolate(
        &self,
        t0: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
        t1: f64,
        y1: &DVector<f64>,
        f1: &DVector<f64>,
        t: f64,
    ) -> DVector<f64> {
        self(t0, y0, f0, t1, y1, f1, t)
    }
}

// =================================================================================================
// Interpolation Mode
// =================================================================================================

/// Projection mode of an ODE solve
#[derive(Clone, Default)]
pub enum Interpolation {
    /// Straight line between the two states
    #[default]
    Linear,

    /// Cubic Hermite spline through states and derivative samples
    CubicHermite,

    /// Caller-supplied rule
    Custom(Arc<dyn InterpolationRule>),
}

/// Tags accepted by [`Interpolation::from_str`]
pub const INTERPOLATION_TAGS: [&str; 2] = ["linear", "cubic"];

impl Interpolation {
    /// Custom mode from any [`InterpolationRule`]
    pub fn custom<R: InterpolationRule + 'static>(rule: R) -> Self {
        Self::Custom(Arc::new(rule))
    }

    /// Mode name (for metadata and logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::CubicHermite => "cubic",
            Self::Custom(_) => "custom",
        }
    }

    /// Whether the derivative samples `f0`, `f1` must be evaluated
    pub fn needs_derivatives(&self) -> bool {
        !matches!(self, Self::Linear)
    }

    /// Project the step `[t0, t1]` onto `t`
    ///
    /// In linear and cubic mode a query at `t == t0` or `t == t1` returns the
    /// stored state unchanged, so output on grid points reproduces the marched
    /// values exactly. A custom rule is called for every query, endpoints
    /// included. `f0` and `f1` are ignored in linear mode.
    #[allow(clippy::too_many_arguments)]
    pub fn project(
        &self,
        t0: f64,
        y0: &DVector<f64>,
        f0: &DVector<f64>,
        t1: f64,
        y1: &DVector<f64>,
        f1: &DVector<f64>,
        t: f64,
    ) -> DVector<f64> {
        match self {
            Self::Linear | Self::CubicHermite if t == t1 => y1.clone(),
            Self::Linear | Self::CubicHermite if t == t0 => y0.clone(),
            Self::Linear => linear(t0, y0, t1, y1, t),
            Self::CubicHermite => cubic_hermite(t0, y0, f0, t1, y1, f1, t),
            Self::Custom(rule) => rule.interpolate(t0, y0, f0, t1, y1, f1, t),
        }
    }
}

impl FromStr for Interpolation {
    type Err = NumericError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::CubicHermite),
            other => Err(NumericError::config(format!(
                "interpolation must be 'linear', 'cubic' or a custom rule, not '{}'",
                other
            ))),
        }
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => write!(f, "Custom(..)"),
            other => write!(f, "{}", other.name()),
        }
    }
}

// =================================================================================================
// Projection Formulas
// =================================================================================================

/// Normalised position `s = (t - t0)/(t1 - t0)` of `t` inside the step
pub(crate) fn unit_position(t0: f64, t1: f64, t: f64) -> f64 {
    (t - t0) / (t1 - t0)
}

/// Hermite basis `[h00, h10, h01, h11]` at `s`
pub(crate) fn hermite_weights(s: f64) -> [f64; 4] {
    let s2 = s * s;
    let s3 = s2 * s;

    [2.0 * s3 - 3.0 * s2 + 1.0, s3 - 2.0 * s2 + s, -2.0 * s3 + 3.0 * s2, s3 - s2]
}

/// Linear interpolation between `(t0, y0)` and `(t1, y1)`
pub fn linear(t0: f64, y0: &DVector<f64>, t1: f64, y1: &DVector<f64>, t: f64) -> DVector<f64> {
    y0 + (y1 - y0) * unit_position(t0, t1, t)
}

/// Cubic Hermite interpolation on the normalised coordinate `s`
#[allow(clippy::too_many_arguments)]
pub fn cubic_hermite(
    t0: f64,
    y0: &DVector<f64>,
    f0: &DVector<f64>,
    t1: f64,
    y1: &DVector<f64>,
    f1: &DVector<f64>,
    t: f64,
) -> DVector<f64> {
    let dt = t1 - t0;
    let [h00, h10, h01, h11] = hermite_weights(unit_position(t0, t1, t));

    y0 * h00 + f0 * (h10 * dt) + y1 * h01 + f1 * (h11 * dt)
}

/// Parse an interpolation tag, falling back to a custom rule when given
///
/// Mirrors the `"linear" | "cubic" | callable` argument of the solvers:
/// a rule always wins, otherwise the tag must be one of [`INTERPOLATION_TAGS`].
pub fn resolve(tag: Option<&str>, rule: Option<Arc<dyn InterpolationRule>>) -> NumericResult<Interpolation> {
    match (tag, rule) {
        (_, Some(rule)) => Ok(Interpolation::Custom(rule)),
        (Some(tag), None) => tag.parse(),
        (None, None) => Ok(Interpolation::Linear),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
