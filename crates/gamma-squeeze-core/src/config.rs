//! Host-facing input policy.
//!
//! The input mode is read from the `GAMMA_SQUEEZE_MODE` environment variable:
//! - `strict` (default): invalid input is reported to the caller as an error.
//! - `hardened`: out-of-range interactive input is clamped into the valid
//!   region before evaluation (see [`crate::heal`]). Non-finite input is
//!   still rejected.
//!
//! Slider bounds come from `GAMMA_SQUEEZE_PIVOT_MIN`, `GAMMA_SQUEEZE_PIVOT_MAX`
//! and `GAMMA_SQUEEZE_PIVOT_STEP`. None of this is cached: hosts read it once
//! and pass it in.

use serde::{Deserialize, Serialize};

/// Offset used by the walkthrough when none is chosen explicitly.
pub const NARRATIVE_OFFSET: f64 = 0.5;

pub const ENV_MODE: &str = "GAMMA_SQUEEZE_MODE";
pub const ENV_PIVOT_MIN: &str = "GAMMA_SQUEEZE_PIVOT_MIN";
pub const ENV_PIVOT_MAX: &str = "GAMMA_SQUEEZE_PIVOT_MAX";
pub const ENV_PIVOT_STEP: &str = "GAMMA_SQUEEZE_PIVOT_STEP";

/// Upper bound on the grid size of a usable [`SliderPolicy`].
pub const MAX_POSITIONS: usize = 1_000_000;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// How invalid interactive input is handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Strict,
    Hardened,
}

impl InputMode {
    /// Parse from string (case-insensitive). Unknown values map to `Strict`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardened" | "repair" | "clamp" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(process_env)
    }

    /// Resolve through `lookup` instead of the process environment.
    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup(ENV_MODE)
            .map(|v| Self::from_str_loose(&v))
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn heals_enabled(self) -> bool {
        matches!(self, Self::Hardened)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

/// Range and granularity of the pivot control a host exposes.
///
/// This is presentation policy; the core accepts any pivot that avoids the
/// poles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderPolicy {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderPolicy {
    fn default() -> Self {
        Self {
            min: 2.0,
            max: 15.0,
            step: 0.1,
        }
    }
}

impl SliderPolicy {
    /// A policy is usable when its bounds are finite and ordered, its step is
    /// positive, and its grid has at most [`MAX_POSITIONS`] points.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.step_count().is_some()
    }

    /// Number of steps from `min` to `max`, or `None` for an unusable policy.
    #[must_use]
    pub fn step_count(&self) -> Option<usize> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return None;
        }
        if self.min > self.max || self.step <= 0.0 {
            return None;
        }
        let steps = ((self.max - self.min) / self.step).round();
        // The grid holds steps + 1 points.
        (steps < MAX_POSITIONS as f64).then_some(steps as usize)
    }

    /// Clamp into `[min, max]` and snap to the step grid anchored at `min`.
    /// Non-finite input maps to `min`.
    #[must_use]
    pub fn clamp(&self, pivot: f64) -> f64 {
        if !pivot.is_finite() {
            return self.min;
        }
        let clamped = pivot.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    /// Evenly spaced pivots from `min` to `max` inclusive. Empty when the
    /// policy is not [valid](Self::is_valid).
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        let Some(count) = self.step_count() else {
            return Vec::new();
        };
        (0..=count)
            .map(|i| (self.min + i as f64 * self.step).min(self.max))
            .collect()
    }

    /// Defaults overridden by any valid environment values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(process_env)
    }

    /// Like [`from_env`](Self::from_env), resolving keys through `lookup`.
    /// Unparsable values keep their default; a resulting policy that is not
    /// valid falls back to [`SliderPolicy::default`] as a whole.
    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(fallback)
        };
        let policy = Self {
            min: read(ENV_PIVOT_MIN, defaults.min),
            max: read(ENV_PIVOT_MAX, defaults.max),
            step: read(ENV_PIVOT_STEP, defaults.step),
        };
        if policy.is_valid() { policy } else { defaults }
    }
}

/// Bundle of host policy values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeConfig {
    pub mode: InputMode,
    pub slider: SliderPolicy,
    pub narrative_offset: f64,
}

impl Default for SqueezeConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::Strict,
            slider: SliderPolicy::default(),
            narrative_offset: NARRATIVE_OFFSET,
        }
    }
}

impl SqueezeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(process_env)
    }

    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            mode: InputMode::from_env_with(&lookup),
            slider: SliderPolicy::from_env_with(&lookup),
            narrative_offset: NARRATIVE_OFFSET,
        }
    }
}
