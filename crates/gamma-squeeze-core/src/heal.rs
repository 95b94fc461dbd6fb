//! Input healing for hardened hosts.
//!
//! In hardened mode an interactive control that overshoots is pulled back into
//! the region where the squeeze is defined instead of surfacing an error.
//! Non-finite input is never healed.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::InputMode;
use crate::error::SqueezeError;
use crate::squeeze::{SqueezeResult, compute_squeeze};

/// Distance kept from the ends of the open unit interval when clamping.
pub const OFFSET_EPSILON: f64 = 1e-9;

/// Smallest pivot for which both chords stay on `[1, ∞)`.
pub const MIN_HEALED_PIVOT: f64 = 2.0;

/// An adjustment applied to caller input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HealingAction {
    ClampOffset { requested: f64, clamped: f64 },
    ClampPivot { requested: f64, clamped: f64 },
    None,
}

impl HealingAction {
    /// Returns true if this action represents an actual healing (not None).
    #[must_use]
    pub const fn is_heal(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Counts the heals applied by a host over its lifetime.
///
/// Owned by the host; the core keeps no instance of its own.
#[derive(Debug, Default)]
pub struct HealingPolicy {
    pub total_heals: AtomicU64,
    pub offset_clamps: AtomicU64,
    pub pivot_clamps: AtomicU64,
}

impl HealingPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_heals: AtomicU64::new(0),
            offset_clamps: AtomicU64::new(0),
            pivot_clamps: AtomicU64::new(0),
        }
    }

    pub fn record(&self, action: &HealingAction) {
        if action.is_heal() {
            self.total_heals.fetch_add(1, Ordering::Relaxed);
        }
        match action {
            HealingAction::ClampOffset { .. } => {
                self.offset_clamps.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::ClampPivot { .. } => {
                self.pivot_clamps.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::None => {}
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total_heals.load(Ordering::Relaxed)
    }

    /// Decide healing for an offset. Non-finite values are left alone.
    #[must_use]
    pub fn heal_offset(&self, offset: f64) -> HealingAction {
        if !offset.is_finite() || (offset > 0.0 && offset < 1.0) {
            return HealingAction::None;
        }
        HealingAction::ClampOffset {
            requested: offset,
            clamped: offset.clamp(OFFSET_EPSILON, 1.0 - OFFSET_EPSILON),
        }
    }

    /// Decide healing for a pivot. Non-finite values are left alone.
    #[must_use]
    pub fn heal_pivot(&self, pivot: f64) -> HealingAction {
        if !pivot.is_finite() || pivot >= MIN_HEALED_PIVOT {
            return HealingAction::None;
        }
        HealingAction::ClampPivot {
            requested: pivot,
            clamped: MIN_HEALED_PIVOT,
        }
    }
}

/// [`compute_squeeze`] behind the host's input mode.
///
/// Strict mode evaluates the input as given. Hardened mode clamps pivot and
/// offset first and records what it did in `policy`. The applied actions are
/// returned alongside the result.
pub fn guarded_squeeze(
    pivot: f64,
    offset: f64,
    mode: InputMode,
    policy: &HealingPolicy,
) -> Result<(SqueezeResult, Vec<HealingAction>), SqueezeError> {
    if !mode.heals_enabled() {
        return compute_squeeze(pivot, offset).map(|r| (r, Vec::new()));
    }

    let mut actions = Vec::new();
    let mut pivot = pivot;
    let mut offset = offset;

    let pivot_action = policy.heal_pivot(pivot);
    if let HealingAction::ClampPivot { clamped, .. } = pivot_action {
        policy.record(&pivot_action);
        actions.push(pivot_action);
        pivot = clamped;
    }
    let offset_action = policy.heal_offset(offset);
    if let HealingAction::ClampOffset { clamped, .. } = offset_action {
        policy.record(&offset_action);
        actions.push(offset_action);
        offset = clamped;
    }

    compute_squeeze(pivot, offset).map(|r| (r, actions))
}
