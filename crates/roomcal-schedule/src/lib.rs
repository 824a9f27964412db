//! Occurrence expansion and grid layout for the room-booking calendar.
//!
//! ## Summary
//! Two pure computations feed the calendar views:
//! - [`recurrence`] turns one stored event and its rule into the concrete
//!   occurrences that fall inside a display window.
//! - [`layout`] assigns side-by-side columns to the overlapping occurrences
//!   of one day.
//!
//! [`view`] wires them together per view window and per displayed day.

pub mod clock;
pub mod layout;
pub mod recurrence;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use layout::{ColumnGeometry, EventLayout, LayoutInterval, LayoutItem, layout};
pub use recurrence::RecurrenceExpander;
pub use view::{ViewWindow, expand_all, group_by_day, layout_by_day};
