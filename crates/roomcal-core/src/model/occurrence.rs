use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use super::event::Event;
use crate::constants::{DATE_KEY_FORMAT, OCCURRENCE_ID_SEPARATOR};

/// ## Summary
/// One concrete instance of an event inside a display window.
///
/// Recurring instances carry the composite id `<seriesId>_<sequence>`, where
/// `sequence` counts every generated candidate of the series, suppressed
/// exceptions included. Ids are therefore stable for a fixed rule
/// configuration only: adding or removing exceptions does not shift them, but
/// editing the rule itself does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: String,
    pub series_id: String,
    pub sequence: Option<u32>,
    pub title: String,
    pub room: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    /// The event itself, for events that do not repeat. The id is unchanged.
    #[must_use]
    pub fn single(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            series_id: event.id().to_string(),
            sequence: None,
            title: event.title().to_string(),
            room: event.room().map(str::to_string),
            start: event.start(),
            end: event.end(),
        }
    }

    /// The `sequence`-th generated instance of a recurring event.
    #[must_use]
    pub fn instance(event: &Event, sequence: u32, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: format!("{}{OCCURRENCE_ID_SEPARATOR}{sequence}", event.id()),
            series_id: event.id().to_string(),
            sequence: Some(sequence),
            title: event.title().to_string(),
            room: event.room().map(str::to_string),
            start,
            end,
        }
    }

    #[must_use]
    pub fn date_key(&self) -> String {
        date_key(self.start.date())
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn overlaps(&self, range_start: NaiveDateTime, range_end: NaiveDateTime) -> bool {
        self.start < range_end && self.end > range_start
    }
}

/// Renders a day as its `yyyy-MM-dd` key.
#[must_use]
pub fn date_key(day: NaiveDate) -> String {
    day.format(DATE_KEY_FORMAT).to_string()
}

/// ## Summary
/// Recovers the owning event id from an occurrence id by stripping a trailing
/// `_<n>` suffix.
///
/// Ids without a numeric suffix are returned unchanged. A non-repeating event
/// whose own id ends in `_<digits>` is indistinguishable from an instance, so
/// callers holding the [`Occurrence`] should prefer its `series_id` field.
#[must_use]
pub fn series_id_of(occurrence_id: &str) -> &str {
    match occurrence_id.rsplit_once(OCCURRENCE_ID_SEPARATOR) {
        Some((series, index))
            if !series.is_empty()
                && !index.is_empty()
                && index.bytes().all(|b| b.is_ascii_digit()) =>
        {
            series
        }
        _ => occurrence_id,
    }
}
