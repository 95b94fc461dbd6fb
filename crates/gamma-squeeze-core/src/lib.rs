//! # gamma-squeeze-core
//!
//! Numeric core behind the Bohr-Mollerup squeeze illustration.
//!
//! - [`math`]: the log-gamma engine (Lanczos, with a single reflection step
//!   for arguments below one half).
//! - [`squeeze`]: chord slopes around a pivot, the bound interval at
//!   `pivot + offset`, and the gap metric that shrinks as the pivot grows.
//! - [`curve`]: evenly spaced samples of the curve around a pivot.
//! - [`narrative`]: the four-step walkthrough state machine a host drives.
//! - [`config`] and [`heal`]: host-facing input policy (slider bounds,
//!   strict vs hardened handling of out-of-range interactive input).
//!
//! Every function here is pure. Nothing is cached and nothing is shared, so
//! callers may evaluate from any thread and drop stale results freely.

#![deny(unsafe_code)]

pub mod config;
pub mod curve;
pub mod error;
pub mod heal;
pub mod math;
pub mod narrative;
pub mod squeeze;

pub use config::{InputMode, MAX_POSITIONS, NARRATIVE_OFFSET, SliderPolicy, SqueezeConfig};
pub use curve::{CURVE_SEGMENTS, sample_window};
pub use error::{GammaError, SqueezeError};
pub use heal::{HealingAction, HealingPolicy, guarded_squeeze};
pub use math::{gamma, is_pole, log_gamma, sign_gamma};
pub use narrative::{ProofStep, Transition, Walkthrough};
pub use squeeze::{NumericInstability, Point, SqueezeResult, compute_squeeze};
