//! Termination checks and output collection shared by both generators.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use roomcal_core::constants::MAX_EXPANSION_ITERATIONS;
use roomcal_core::model::{Event, Occurrence, RecurrenceEnd, RecurrenceRule};

/// Why a generator stopped producing candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    IterationCap,
    YearEnd,
    EndDate,
    Count,
    PastWindow,
    CalendarOverflow,
}

/// Caps evaluated before each candidate is emitted.
#[derive(Debug)]
pub(crate) struct Bounds {
    /// Candidates starting after December 31 of this year are never produced.
    cap_year: i32,
    until: Option<NaiveDate>,
    count: Option<u32>,
    range_end: NaiveDateTime,
}

impl Bounds {
    pub(crate) fn new(event: &Event, rule: &RecurrenceRule, current_year: i32, range_end: NaiveDateTime) -> Self {
        let (until, count) = match rule.end() {
            RecurrenceEnd::Never => (None, None),
            RecurrenceEnd::Until(day) => (Some(day), None),
            RecurrenceEnd::Count(n) => (None, Some(n)),
        };

        Self {
            cap_year: event.start().year().max(current_year),
            until,
            count,
            range_end,
        }
    }

    /// ## Summary
    /// Checks, in order: iteration cap, year-end cap, end date (inclusive by
    /// day), occurrence count, then whether the candidate already starts at or
    /// past the window end.
    ///
    /// `generated` is the number of candidates produced so far, exceptions included.
    pub(crate) fn check(&self, start: NaiveDateTime, generated: u32) -> Option<StopReason> {
        if generated >= MAX_EXPANSION_ITERATIONS {
            return Some(StopReason::IterationCap);
        }
        if start.year() > self.cap_year {
            return Some(StopReason::YearEnd);
        }
        if self.until.is_some_and(|last| start.date() > last) {
            return Some(StopReason::EndDate);
        }
        if self.count.is_some_and(|total| generated >= total) {
            return Some(StopReason::Count);
        }
        if start >= self.range_end {
            return Some(StopReason::PastWindow);
        }
        None
    }
}

/// Collects emitted occurrences and owns the shared sequence counter.
pub(crate) struct Sink<'a> {
    event: &'a Event,
    rule: &'a RecurrenceRule,
    duration: TimeDelta,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    generated: u32,
    out: Vec<Occurrence>,
}

impl<'a> Sink<'a> {
    pub(crate) fn new(
        event: &'a Event,
        rule: &'a RecurrenceRule,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Self {
        Self {
            event,
            rule,
            duration: event.duration(),
            range_start,
            range_end,
            generated: 0,
            out: Vec::new(),
        }
    }

    pub(crate) fn generated(&self) -> u32 {
        self.generated
    }

    pub(crate) fn len(&self) -> usize {
        self.out.len()
    }

    /// ## Summary
    /// Consumes one sequence slot for the candidate starting at `start`.
    ///
    /// The slot is used even when the day is an exception or the occurrence
    /// falls outside the window.
    pub(crate) fn offer(&mut self, start: NaiveDateTime) -> Option<StopReason> {
        let sequence = self.generated;
        self.generated += 1;

        if self.rule.is_excepted(start.date()) {
            tracing::trace!(%start, sequence, "Occurrence suppressed by exception");
            return None;
        }

        let Some(end) = start.checked_add_signed(self.duration) else {
            return Some(StopReason::CalendarOverflow);
        };

        if start < self.range_end && end > self.range_start {
            self.out
                .push(Occurrence::instance(self.event, sequence, start, end));
        }
        None
    }

    pub(crate) fn finish(self) -> Vec<Occurrence> {
        self.out
    }
}
