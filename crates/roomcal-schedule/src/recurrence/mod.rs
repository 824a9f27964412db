//! Recurrence expansion for stored events.
//!
//! ## Summary
//! Expands one event plus its recurrence rule into the occurrences that
//! overlap a half-open display window `[range_start, range_end)`.
//!
//! Two generators exist: [`series`] steps by a whole frequency unit for
//! daily, weekly, monthly and yearly rules, while [`weekly`] walks weeks and
//! the selected weekdays inside each week. Both stop on the same caps, in the
//! same order (see [`bounds`]), and share one sequence counter per expansion.

mod bounds;
mod series;
mod weekly;

use chrono::NaiveDateTime;
use roomcal_core::model::{Event, Occurrence, RecurrenceRule};
use roomcal_core::{RuleError, RuleResult};

use crate::clock::{Clock, SystemClock};
use bounds::{Bounds, Sink};

pub(crate) use weekly::week_start;

/// ## Summary
/// Stateless expander; each call recomputes the full sequence.
///
/// The clock only decides the year-end cap, so tests pin it with a
/// [`FixedClock`](crate::clock::FixedClock).
#[derive(Debug, Clone, Default)]
pub struct RecurrenceExpander<C = SystemClock> {
    clock: C,
}

impl<C: Clock> RecurrenceExpander<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// ## Summary
    /// Occurrences of `event` overlapping `[range_start, range_end)`, ordered by start.
    ///
    /// Never fails: a malformed rule yields an empty list and a warning, so a
    /// broken record cannot take a whole view down. Use [`Self::try_expand`]
    /// to see the rule error.
    #[must_use]
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id()))]
    pub fn expand(
        &self,
        event: &Event,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Vec<Occurrence> {
        self.try_expand(event, range_start, range_end)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Skipping event with malformed recurrence rule");
                Vec::new()
            })
    }

    /// ## Summary
    /// Same as [`Self::expand`], reporting malformed rules instead of hiding them.
    ///
    /// ## Errors
    /// Returns the [`RuleError`] produced while resolving the event's recurrence.
    pub fn try_expand(
        &self,
        event: &Event,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> RuleResult<Vec<Occurrence>> {
        let rule = match event.recurrence() {
            Some(spec) => spec.resolve()?,
            None => None,
        };

        Ok(match rule {
            None => {
                if event.overlaps(range_start, range_end) {
                    vec![Occurrence::single(event)]
                } else {
                    Vec::new()
                }
            }
            Some(rule) => self.expand_rule(event, &rule, range_start, range_end),
        })
    }

    /// ## Summary
    /// Expands `event` with an already resolved rule, ignoring the event's own recurrence field.
    #[must_use]
    pub fn expand_rule(
        &self,
        event: &Event,
        rule: &RecurrenceRule,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Vec<Occurrence> {
        if range_start >= range_end {
            tracing::debug!(%range_start, %range_end, "Empty expansion window");
            return Vec::new();
        }

        let bounds = Bounds::new(event, rule, self.clock.current_year(), range_end);
        let mut sink = Sink::new(event, rule, range_start, range_end);

        let stop = if rule.uses_weekdays() {
            weekly::generate(event, rule, &bounds, &mut sink)
        } else {
            series::generate(event, rule, &bounds, &mut sink)
        };

        tracing::trace!(
            frequency = %rule.frequency(),
            generated = sink.generated(),
            emitted = sink.len(),
            ?stop,
            "Expanded recurring event"
        );

        sink.finish()
    }
}

/// Convenience for callers that only need to know whether a rule is usable.
///
/// ## Errors
/// Returns the resolution error for a malformed rule.
pub fn validate(event: &Event) -> Result<(), RuleError> {
    if let Some(spec) = event.recurrence() {
        spec.resolve()?;
    }
    Ok(())
}
