//! Column layout for overlapping occurrences of one day.
//!
//! ## Summary
//! [`layout`] groups intervals into connected overlap clusters and assigns
//! each member the lowest free column of its cluster. [`ColumnGeometry`]
//! turns the resulting column numbers into horizontal placement.

mod engine;
mod geometry;

use chrono::NaiveDateTime;
use roomcal_core::model::Occurrence;
use serde::Serialize;

pub use engine::layout;
pub use geometry::ColumnGeometry;

/// Anything with an id and a half-open `[start, end)` interval.
pub trait LayoutInterval {
    fn id(&self) -> &str;
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;

    /// Half-open intersection: touching intervals do not overlap.
    fn intersects<O: LayoutInterval + ?Sized>(&self, other: &O) -> bool {
        self.start() < other.end() && self.end() > other.start()
    }
}

impl LayoutInterval for Occurrence {
    fn id(&self) -> &str {
        &self.id
    }

    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl<T: LayoutInterval + ?Sized> LayoutInterval for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn start(&self) -> NaiveDateTime {
        (**self).start()
    }

    fn end(&self) -> NaiveDateTime {
        (**self).end()
    }
}

/// Plain interval, typically an occurrence clipped to a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl LayoutItem {
    #[must_use]
    pub fn new(id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    /// The part of `interval` inside `[from, to)`, or `None` if they do not overlap.
    #[must_use]
    pub fn clipped<T: LayoutInterval + ?Sized>(interval: &T, from: NaiveDateTime, to: NaiveDateTime) -> Option<Self> {
        let start = interval.start().max(from);
        let end = interval.end().min(to);
        (start < end).then(|| Self::new(interval.id(), start, end))
    }
}

impl LayoutInterval for LayoutItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Column placement of one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayout {
    /// Zero-based column inside the overlap cluster.
    pub column: u32,
    /// Column count of the whole cluster; 1 means full width.
    pub total_columns: u32,
}

impl EventLayout {
    pub const FULL_WIDTH: Self = Self {
        column: 0,
        total_columns: 1,
    };

    #[must_use]
    pub fn is_full_width(&self) -> bool {
        self.total_columns <= 1
    }
}
