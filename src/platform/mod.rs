//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held keys sampled into a per-tick snapshot)
//! - The start screen's registration flow

pub mod input;
pub mod registration;

pub use input::{Action, HeldKeys};
pub use registration::{Registration, StartAction, is_submit_key};
