//! Fixed-step generator: daily, monthly, yearly, and weekly without weekdays.

use chrono::{Months, NaiveDateTime, TimeDelta};
use roomcal_core::model::{Event, Frequency, RecurrenceRule};

use super::bounds::{Bounds, Sink, StopReason};

/// Walks the series from the event's own start, one `interval` at a time.
pub(super) fn generate(
    event: &Event,
    rule: &RecurrenceRule,
    bounds: &Bounds,
    sink: &mut Sink<'_>,
) -> Option<StopReason> {
    let mut current = event.start();

    loop {
        if let Some(stop) = bounds.check(current, sink.generated()) {
            return Some(stop);
        }
        if let Some(stop) = sink.offer(current) {
            return Some(stop);
        }
        match advance(current, rule.frequency(), rule.interval()) {
            Some(next) => current = next,
            None => return Some(StopReason::CalendarOverflow),
        }
    }
}

/// ## Summary
/// Steps `from` forward by `interval` units of `frequency`.
///
/// Month and year steps clamp to the last valid day of the target month
/// (Jan 31 + 1 month = Feb 29 in a leap year). The next step starts from the
/// clamped value, so a month-end series drifts to the 29th from March on.
pub(crate) fn advance(from: NaiveDateTime, frequency: Frequency, interval: u32) -> Option<NaiveDateTime> {
    match frequency {
        Frequency::Daily => from.checked_add_signed(TimeDelta::try_days(i64::from(interval))?),
        Frequency::Weekly => from.checked_add_signed(TimeDelta::try_weeks(i64::from(interval))?),
        Frequency::Monthly => from.checked_add_months(Months::new(interval)),
        Frequency::Yearly => from.checked_add_months(Months::new(interval.checked_mul(12)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").expect("valid timestamp")
    }

    #[test]
    fn test_advance_units() {
        let from = at("2024-01-31T09:30");

        assert_eq!(advance(from, Frequency::Daily, 3), Some(at("2024-02-03T09:30")));
        assert_eq!(advance(from, Frequency::Weekly, 2), Some(at("2024-02-14T09:30")));
        assert_eq!(advance(from, Frequency::Monthly, 1), Some(at("2024-02-29T09:30")));
        assert_eq!(advance(from, Frequency::Monthly, 2), Some(at("2024-03-31T09:30")));
        assert_eq!(advance(from, Frequency::Yearly, 1), Some(at("2025-01-31T09:30")));
    }

    #[test]
    fn test_advance_leap_day_yearly() {
        assert_eq!(
            advance(at("2024-02-29T00:00"), Frequency::Yearly, 4),
            Some(at("2028-02-29T00:00"))
        );
        assert_eq!(
            advance(at("2024-02-29T00:00"), Frequency::Yearly, 1),
            Some(at("2025-02-28T00:00"))
        );
    }

    #[test]
    fn test_advance_overflow() {
        assert_eq!(advance(NaiveDateTime::MAX, Frequency::Daily, 1), None);
    }
}
