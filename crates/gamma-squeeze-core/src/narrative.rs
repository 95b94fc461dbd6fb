//! Walkthrough state machine for hosts presenting the argument step by step.
//!
//! The numeric core never consults this; a host keeps a [`Walkthrough`] and
//! asks it which layers to show and which pivot to evaluate.

use serde::{Deserialize, Serialize};

use crate::config::{NARRATIVE_OFFSET, SliderPolicy};
use crate::error::SqueezeError;
use crate::squeeze::{SqueezeResult, compute_squeeze};

/// The four stages of the argument, in order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofStep {
    /// ln Γ is convex.
    #[default]
    Setup,
    /// Chord slopes are ordered around the pivot.
    Slopes,
    /// The value at `n + x` is trapped between the extended chords.
    Trap,
    /// The trap closes as `n` grows.
    Limit,
}

/// Navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Next,
    Back,
}

impl Transition {
    /// Parse `next`/`back` (case-insensitive; `prev` and `previous` also accepted).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "n" => Some(Self::Next),
            "back" | "prev" | "previous" | "b" => Some(Self::Back),
            _ => None,
        }
    }
}

impl ProofStep {
    pub const ALL: [Self; 4] = [Self::Setup, Self::Slopes, Self::Trap, Self::Limit];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Setup => "The Convexity Condition",
            Self::Slopes => "The Slope Inequality",
            Self::Trap => "The Sandwich Trap",
            Self::Limit => "The Limit (Squeeze)",
        }
    }

    /// The inequality shown at this step.
    #[must_use]
    pub const fn claim(self) -> &'static str {
        match self {
            Self::Setup => "f''(x) > 0",
            Self::Slopes => "S(n-1, n) <= S(n, n+1)",
            Self::Trap => "lower <= log Gamma(n+x) <= upper",
            Self::Limit => "lim n->inf (upper - lower) = 0",
        }
    }

    /// Step after applying `transition`, clamped to the ends.
    #[must_use]
    pub const fn apply(self, transition: Transition) -> Self {
        match (self, transition) {
            (Self::Setup, Transition::Next) => Self::Slopes,
            (Self::Slopes, Transition::Next) => Self::Trap,
            (Self::Trap | Self::Limit, Transition::Next) => Self::Limit,
            (Self::Setup | Self::Slopes, Transition::Back) => Self::Setup,
            (Self::Trap, Transition::Back) => Self::Slopes,
            (Self::Limit, Transition::Back) => Self::Trap,
        }
    }
}

/// Host-side walkthrough state: active step plus the pivot under the slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Walkthrough {
    step: ProofStep,
    pivot: f64,
    offset: f64,
    slider: SliderPolicy,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Self::new(SliderPolicy::default())
    }
}

impl Walkthrough {
    /// Start at [`ProofStep::Setup`] with the pivot at the slider minimum.
    #[must_use]
    pub fn new(slider: SliderPolicy) -> Self {
        Self {
            step: ProofStep::Setup,
            pivot: slider.min,
            offset: NARRATIVE_OFFSET,
            slider,
        }
    }

    #[must_use]
    pub const fn step(&self) -> ProofStep {
        self.step
    }

    #[must_use]
    pub const fn pivot(&self) -> f64 {
        self.pivot
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Move one step. Leaving [`ProofStep::Limit`] backwards resets the
    /// pivot to the slider minimum.
    pub fn apply(&mut self, transition: Transition) -> ProofStep {
        let from = self.step;
        self.step = from.apply(transition);
        if from == ProofStep::Limit && self.step != ProofStep::Limit {
            self.pivot = self.slider.min;
        }
        self.step
    }

    /// Move the slider. Ignored unless the pivot is adjustable; returns the
    /// pivot in effect afterwards.
    pub fn set_pivot(&mut self, value: f64) -> f64 {
        if self.pivot_adjustable() {
            self.pivot = self.slider.clamp(value);
        }
        self.pivot
    }

    #[must_use]
    pub fn shows_slopes(&self) -> bool {
        self.step >= ProofStep::Slopes
    }

    #[must_use]
    pub fn shows_trap(&self) -> bool {
        self.step >= ProofStep::Trap
    }

    #[must_use]
    pub fn pivot_adjustable(&self) -> bool {
        self.step == ProofStep::Limit
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        matches!(self.step, ProofStep::Setup)
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        matches!(self.step, ProofStep::Limit)
    }

    /// Evaluate the squeeze for the current pivot.
    pub fn evaluate(&self) -> Result<SqueezeResult, SqueezeError> {
        compute_squeeze(self.pivot, self.offset)
    }
}
