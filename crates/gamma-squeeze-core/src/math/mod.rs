//! Mathematical functions.
//!
//! The log-gamma engine and the small helpers derived from it.

pub mod special;

pub use special::{gamma, is_pole, log_gamma, sign_gamma};
