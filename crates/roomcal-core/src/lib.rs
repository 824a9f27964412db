//! Shared types for the room-booking calendar.
//!
//! ## Summary
//! Holds the event data model, the canonical recurrence rule, configuration
//! and the error types used by the scheduling crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;

pub use error::{CoreError, CoreResult, RuleError, RuleResult};
