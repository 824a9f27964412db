//! Reference clock for the year-end expansion cap.

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use roomcal_core::CoreResult;
use roomcal_core::config::CalendarConfig;

/// Source of "today" in the calendar's own zone.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Wall clock, read in the configured zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// ## Summary
    /// Builds a clock for the zone named in the calendar configuration.
    ///
    /// ## Errors
    /// Returns a configuration error if the zone name is unknown.
    pub fn from_config(config: &CalendarConfig) -> CoreResult<Self> {
        Ok(Self::new(config.tz()?))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Clock pinned to a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
