//! Error types for the engine and the squeeze model.

use thiserror::Error;

/// Failures of the log-gamma engine.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GammaError {
    /// Γ has a pole at every non-positive integer.
    #[error("log-gamma is undefined at the pole z = {z}")]
    Domain { z: f64 },
    #[error("log-gamma argument is not finite: {z}")]
    NonFiniteInput { z: f64 },
    /// The argument is valid but the result left the finite f64 range.
    #[error("log-gamma result is not representable at z = {z}")]
    Overflow { z: f64 },
}

impl GammaError {
    /// The argument that triggered the failure.
    #[must_use]
    pub const fn argument(&self) -> f64 {
        match *self {
            Self::Domain { z } | Self::NonFiniteInput { z } | Self::Overflow { z } => z,
        }
    }
}

/// Failures of [`crate::compute_squeeze`] and the helpers built on it.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SqueezeError {
    /// The trap only exists strictly between two consecutive pivots.
    #[error("offset {offset} is outside the open interval (0, 1)")]
    Range { offset: f64 },
    #[error("{name} is not finite: {value}")]
    NonFiniteInput { name: &'static str, value: f64 },
    #[error("curve window needs at least one segment")]
    EmptyWindow,
    #[error(transparent)]
    Gamma(#[from] GammaError),
}

impl SqueezeError {
    /// Short stable tag used by hosts and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::NonFiniteInput { .. } => "non_finite_input",
            Self::EmptyWindow => "empty_window",
            Self::Gamma(GammaError::Domain { .. }) => "domain",
            Self::Gamma(GammaError::NonFiniteInput { .. }) => "non_finite_input",
            Self::Gamma(GammaError::Overflow { .. }) => "overflow",
        }
    }
}
