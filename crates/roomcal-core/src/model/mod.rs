//! Event data model.
//!
//! ## Summary
//! `Event` is the stored record supplied by the surrounding application,
//! `RecurrenceSpec` is the rule exactly as it arrives on the wire and
//! `RecurrenceRule` is the validated form the expander works with.
//! `Occurrence` is the derived, per-render instance of an event.

mod event;
mod occurrence;
mod recurrence;

pub use event::Event;
pub use occurrence::{Occurrence, date_key, series_id_of};
pub use recurrence::{Frequency, RecurrenceEnd, RecurrenceRule, RecurrenceSpec, RuleSpec};
