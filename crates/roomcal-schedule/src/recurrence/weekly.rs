//! Weeks-by-weekdays generator for weekly rules with selected weekdays.
//!
//! Several weekdays share one interval step, so this is a nested loop over
//! cursor weeks and the selected days inside each week rather than a fixed
//! step. Weeks start on Sunday.

use chrono::{Datelike, NaiveDate, TimeDelta};
use roomcal_core::model::{Event, RecurrenceRule};

use super::bounds::{Bounds, Sink, StopReason};

pub(super) fn generate(
    event: &Event,
    rule: &RecurrenceRule,
    bounds: &Bounds,
    sink: &mut Sink<'_>,
) -> Option<StopReason> {
    let series_start = event.start();
    let time_of_day = series_start.time();
    let Some(step) = TimeDelta::try_weeks(i64::from(rule.interval())) else {
        return Some(StopReason::CalendarOverflow);
    };

    let mut week = week_start(series_start.date());

    loop {
        for weekday in rule.weekdays() {
            let day = week.checked_add_signed(TimeDelta::days(i64::from(weekday.num_days_from_sunday())));
            let Some(candidate) = day.map(|d| d.and_time(time_of_day)) else {
                return Some(StopReason::CalendarOverflow);
            };
            if candidate < series_start {
                continue;
            }
            if let Some(stop) = bounds.check(candidate, sink.generated()) {
                return Some(stop);
            }
            if let Some(stop) = sink.offer(candidate) {
                return Some(stop);
            }
        }

        match week.checked_add_signed(step) {
            Some(next) => week = next,
            None => return Some(StopReason::CalendarOverflow),
        }
    }
}

/// Sunday on or before `day`.
pub(crate) fn week_start(day: NaiveDate) -> NaiveDate {
    day - TimeDelta::days(i64::from(day.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn test_week_start_is_sunday() {
        assert_eq!(week_start(day("2024-01-03")), day("2023-12-31"));
        assert_eq!(week_start(day("2023-12-31")), day("2023-12-31"));
        assert_eq!(week_start(day("2024-01-06")), day("2023-12-31"));
    }
}
