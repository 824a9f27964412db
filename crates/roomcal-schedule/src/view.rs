//! View-level glue: display windows, multi-event expansion and per-day layout.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use roomcal_core::model::{Event, Occurrence};
use roomcal_core::{CoreError, CoreResult};
use serde::Serialize;

use crate::clock::Clock;
use crate::layout::{EventLayout, LayoutItem, layout};
use crate::recurrence::{RecurrenceExpander, week_start};

/// Half-open visible range `[start, end)` of a calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ViewWindow {
    /// ## Summary
    /// Creates a window from explicit bounds.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if `start` is not before `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidInput(format!(
                "view window start {start} is not before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// ## Summary
    /// `days` whole days starting at midnight of `first`. Zero is treated as one.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the range leaves the supported calendar.
    pub fn span(first: NaiveDate, days: u32) -> CoreResult<Self> {
        let last = first
            .checked_add_signed(TimeDelta::days(i64::from(days.max(1))))
            .ok_or_else(|| out_of_range(first))?;
        Self::new(midnight(first), midnight(last))
    }

    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the range leaves the supported calendar.
    pub fn day(day: NaiveDate) -> CoreResult<Self> {
        Self::span(day, 1)
    }

    /// Sunday-to-Saturday week containing `day`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the range leaves the supported calendar.
    pub fn week(day: NaiveDate) -> CoreResult<Self> {
        Self::span(week_start(day), 7)
    }

    /// Calendar month containing `day`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the range leaves the supported calendar.
    pub fn month(day: NaiveDate) -> CoreResult<Self> {
        let first = day.with_day(1).ok_or_else(|| out_of_range(day))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| out_of_range(day))?;
        Self::new(midnight(first), midnight(next))
    }

    /// Calendar year containing `day`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the range leaves the supported calendar.
    pub fn year(day: NaiveDate) -> CoreResult<Self> {
        let first = NaiveDate::from_ymd_opt(day.year(), 1, 1).ok_or_else(|| out_of_range(day))?;
        let next = NaiveDate::from_ymd_opt(day.year() + 1, 1, 1).ok_or_else(|| out_of_range(day))?;
        Self::new(midnight(first), midnight(next))
    }

    /// Every calendar day the window touches, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start
            .date()
            .iter_days()
            .take_while(move |d| midnight(*d) < end)
    }
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn out_of_range(day: NaiveDate) -> CoreError {
    CoreError::InvalidInput(format!("view window around {day} is out of range"))
}

/// ## Summary
/// Expands every event into `window` and concatenates the results, ordered by
/// start and then id.
#[must_use]
pub fn expand_all<C: Clock>(
    expander: &RecurrenceExpander<C>,
    events: &[Event],
    window: &ViewWindow,
) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = events
        .iter()
        .flat_map(|event| expander.expand(event, window.start, window.end))
        .collect();
    occurrences.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

    tracing::debug!(
        events = events.len(),
        occurrences = occurrences.len(),
        start = %window.start,
        end = %window.end,
        "Expanded view window"
    );

    occurrences
}

/// ## Summary
/// Buckets occurrences by the days of `window` they touch, each clipped to its day.
///
/// Every day of the window has an entry, possibly empty. An occurrence that
/// crosses midnight appears on each day it covers.
#[must_use]
pub fn group_by_day(occurrences: &[Occurrence], window: &ViewWindow) -> BTreeMap<NaiveDate, Vec<LayoutItem>> {
    window
        .days()
        .map(|day| {
            let from = midnight(day).max(window.start);
            let to = day
                .succ_opt()
                .map_or(NaiveDateTime::MAX, midnight)
                .min(window.end);
            let items = occurrences
                .iter()
                .filter_map(|occ| LayoutItem::clipped(occ, from, to))
                .collect();
            (day, items)
        })
        .collect()
}

/// Runs [`layout`] once per day.
#[must_use]
pub fn layout_by_day(
    days: &BTreeMap<NaiveDate, Vec<LayoutItem>>,
) -> BTreeMap<NaiveDate, HashMap<String, EventLayout>> {
    days.iter()
        .map(|(day, items)| (*day, layout(items)))
        .collect()
}

#[cfg(test)]
mod tests {
    use roomcal_core::model::{Frequency, RecurrenceRule};

    use super::*;
    use crate::clock::FixedClock;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").expect("valid timestamp")
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn test_window_constructors() {
        let week = ViewWindow::week(day("2024-01-03")).expect("valid");
        assert_eq!(week.start, at("2023-12-31T00:00"));
        assert_eq!(week.end, at("2024-01-07T00:00"));
        assert_eq!(week.days().count(), 7);

        let month = ViewWindow::month(day("2024-02-14")).expect("valid");
        assert_eq!(month.start, at("2024-02-01T00:00"));
        assert_eq!(month.end, at("2024-03-01T00:00"));
        assert_eq!(month.days().count(), 29);

        assert_eq!(ViewWindow::year(day("2024-07-04")).expect("valid").days().count(), 366);
        assert_eq!(ViewWindow::span(day("2024-01-01"), 30).expect("valid").days().count(), 30);
        assert_eq!(ViewWindow::day(day("2024-01-01")).expect("valid").days().count(), 1);
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        assert!(ViewWindow::new(at("2024-01-02T00:00"), at("2024-01-01T00:00")).is_err());
    }

    #[test]
    fn test_expand_all_merges_and_sorts() {
        let standup = Event::new("standup", "", at("2024-01-01T09:00"), at("2024-01-01T09:15"))
            .expect("valid")
            .with_recurrence(RecurrenceRule::new(Frequency::Daily).count(3));
        let review = Event::new("review", "", at("2024-01-02T08:00"), at("2024-01-02T09:00")).expect("valid");

        let expander = RecurrenceExpander::new(FixedClock::new(day("2024-01-01")));
        let window = ViewWindow::span(day("2024-01-01"), 3).expect("valid");
        let ids: Vec<String> = expand_all(&expander, &[standup, review], &window)
            .into_iter()
            .map(|o| o.id)
            .collect();

        assert_eq!(ids, vec!["standup_0", "review", "standup_1", "standup_2"]);
    }

    #[test]
    fn test_group_by_day_clips_overnight() {
        let night = Event::new("night", "", at("2024-01-01T22:00"), at("2024-01-02T02:00")).expect("valid");
        let window = ViewWindow::span(day("2024-01-01"), 3).expect("valid");
        let grouped = group_by_day(&[Occurrence::single(&night)], &window);

        assert_eq!(grouped.len(), 3);
        assert_eq!(
            grouped[&day("2024-01-01")],
            vec![LayoutItem::new("night", at("2024-01-01T22:00"), at("2024-01-02T00:00"))]
        );
        assert_eq!(
            grouped[&day("2024-01-02")],
            vec![LayoutItem::new("night", at("2024-01-02T00:00"), at("2024-01-02T02:00"))]
        );
        assert!(grouped[&day("2024-01-03")].is_empty());
    }

    #[test]
    fn test_layout_by_day() {
        let a = Event::new("a", "", at("2024-01-01T09:00"), at("2024-01-01T11:00")).expect("valid");
        let b = Event::new("b", "", at("2024-01-01T10:00"), at("2024-01-01T12:00")).expect("valid");
        let window = ViewWindow::day(day("2024-01-01")).expect("valid");

        let grouped = group_by_day(&[Occurrence::single(&a), Occurrence::single(&b)], &window);
        let layouts = layout_by_day(&grouped);
        let first = &layouts[&day("2024-01-01")];

        assert_eq!(first["a"], EventLayout { column: 0, total_columns: 2 });
        assert_eq!(first["b"], EventLayout { column: 1, total_columns: 2 });
    }
}
