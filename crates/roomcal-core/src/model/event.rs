use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::recurrence::RecurrenceSpec;
use crate::error::{CoreError, CoreResult};

/// ## Summary
/// A stored booking as supplied by the surrounding application.
///
/// Times are wall-clock values in the event's own calendar. The interval is
/// validated on construction, including deserialization, so `start < end`
/// holds for every `Event` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", rename_all = "camelCase")]
pub struct Event {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<RecurrenceSpec>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    room: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(default)]
    recurrence: Option<RecurrenceSpec>,
}

impl TryFrom<EventRecord> for Event {
    type Error = CoreError;

    fn try_from(record: EventRecord) -> CoreResult<Self> {
        let mut event = Self::new(record.id, record.title, record.start, record.end)?;
        event.room = record.room;
        event.recurrence = record.recurrence;
        Ok(event)
    }
}

impl Event {
    /// ## Summary
    /// Creates a non-repeating event.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInterval` if `start` is not strictly before `end`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CoreResult<Self> {
        let id = id.into();
        if start >= end {
            return Err(CoreError::InvalidInterval { id, start, end });
        }

        Ok(Self {
            id,
            title: title.into(),
            room: None,
            start,
            end,
            recurrence: None,
        })
    }

    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Attaches a recurrence; accepts a bare `Frequency`, a `RecurrenceRule` or a wire `RecurrenceSpec`.
    #[must_use]
    pub fn with_recurrence(mut self, recurrence: impl Into<RecurrenceSpec>) -> Self {
        self.recurrence = Some(recurrence.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn recurrence(&self) -> Option<&RecurrenceSpec> {
        self.recurrence.as_ref()
    }

    /// Half-open overlap test against `[range_start, range_end)`.
    #[must_use]
    pub fn overlaps(&self, range_start: NaiveDateTime, range_end: NaiveDateTime) -> bool {
        self.start < range_end && self.end > range_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frequency, RecurrenceRule};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").expect("valid timestamp")
    }

    #[test]
    fn test_rejects_empty_interval() {
        let err = Event::new("ev", "Standup", at("2024-01-01T09:00"), at("2024-01-01T09:00"))
            .expect_err("zero duration must fail");
        assert!(matches!(err, CoreError::InvalidInterval { ref id, .. } if id == "ev"));
    }

    #[test]
    fn test_rejects_negative_interval() {
        assert!(Event::new("ev", "", at("2024-01-01T10:00"), at("2024-01-01T09:00")).is_err());
    }

    #[test]
    fn test_deserialize_validates_interval() {
        let json = r#"{"id":"ev","title":"x","start":"2024-01-01T10:00:00","end":"2024-01-01T09:00:00"}"#;
        assert!(serde_json::from_str::<Event>(json).is_err());
    }

    #[test]
    fn test_deserialize_with_recurrence() {
        let json = r#"{
            "id": "ev",
            "title": "Seminar",
            "room": "B-201",
            "start": "2024-01-01T09:00:00",
            "end": "2024-01-01T10:00:00",
            "recurrence": {"frequency": "daily", "interval": 2, "endType": "count", "occurrenceCount": 5}
        }"#;
        let event: Event = serde_json::from_str(json).expect("valid event");

        assert_eq!(event.room(), Some("B-201"));
        assert_eq!(event.duration(), TimeDelta::hours(1));
        let rule = event
            .recurrence()
            .expect("has recurrence")
            .resolve()
            .expect("valid rule")
            .expect("recurring");
        assert_eq!(rule, RecurrenceRule::new(Frequency::Daily).every(2).count(5));
    }

    #[test]
    fn test_serialize_round_trips() {
        let event = Event::new("ev", "Lab", at("2024-01-01T09:00"), at("2024-01-01T10:00"))
            .expect("valid")
            .with_room("Lab 3")
            .with_recurrence(Frequency::Monthly);

        let json = serde_json::to_string(&event).expect("serializes");
        let back: Event = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, event);
    }

    #[test]
    fn test_overlap_is_half_open() {
        let event = Event::new("ev", "", at("2024-01-01T09:00"), at("2024-01-01T10:00")).expect("valid");
        assert!(!event.overlaps(at("2024-01-01T10:00"), at("2024-01-01T11:00")));
        assert!(!event.overlaps(at("2024-01-01T08:00"), at("2024-01-01T09:00")));
        assert!(event.overlaps(at("2024-01-01T09:59"), at("2024-01-01T11:00")));
    }
}
