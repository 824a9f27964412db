use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{DATE_KEY_FORMAT, NO_RECURRENCE_TAG};
use crate::error::{RuleError, RuleResult};

/// Step unit of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(RuleError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Termination mode of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurrenceEnd {
    #[default]
    Never,
    /// Last day on which an occurrence may start (inclusive).
    Until(NaiveDate),
    /// Total number of instances, the first one included.
    Count(u32),
}

/// ## Summary
/// Canonical recurrence rule.
///
/// Built either through the builder methods below or by resolving a
/// [`RecurrenceSpec`]. Weekdays are kept sorted from Sunday and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    frequency: Frequency,
    interval: u32,
    weekdays: Vec<Weekday>,
    end: RecurrenceEnd,
    exceptions: BTreeSet<NaiveDate>,
}

impl RecurrenceRule {
    /// Creates a rule repeating every unit of `frequency`, forever.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            weekdays: Vec::new(),
            end: RecurrenceEnd::Never,
            exceptions: BTreeSet::new(),
        }
    }

    /// Repeats every `interval` units. Zero is treated as one.
    #[must_use]
    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    #[must_use]
    pub fn on_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = weekdays.into_iter().collect();
        days.sort_by_key(Weekday::num_days_from_sunday);
        days.dedup();
        self.weekdays = days;
        self
    }

    #[must_use]
    pub fn until(mut self, last_day: NaiveDate) -> Self {
        self.end = RecurrenceEnd::Until(last_day);
        self
    }

    #[must_use]
    pub fn count(mut self, total: u32) -> Self {
        self.end = RecurrenceEnd::Count(total);
        self
    }

    #[must_use]
    pub fn except(mut self, day: NaiveDate) -> Self {
        self.exceptions.insert(day);
        self
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Selected weekdays, ascending from Sunday. Only consulted for weekly rules.
    #[must_use]
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    #[must_use]
    pub fn end(&self) -> RecurrenceEnd {
        self.end
    }

    #[must_use]
    pub fn exceptions(&self) -> &BTreeSet<NaiveDate> {
        &self.exceptions
    }

    #[must_use]
    pub fn is_excepted(&self, day: NaiveDate) -> bool {
        self.exceptions.contains(&day)
    }

    /// True when expansion runs the weeks-by-weekdays loop.
    #[must_use]
    pub fn uses_weekdays(&self) -> bool {
        self.frequency == Frequency::Weekly && !self.weekdays.is_empty()
    }
}

/// ## Summary
/// Structured rule object in its wire shape.
///
/// Field values are kept loosely typed so that malformed input can be
/// represented and rejected by [`RecurrenceSpec::resolve`] instead of failing
/// deserialization of the whole event list. Every field may be missing or
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<String>,
}

/// Recurrence field of a stored event: a bare tag or a structured rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecurrenceSpec {
    Tag(String),
    Rule(RuleSpec),
}

impl RecurrenceSpec {
    /// ## Summary
    /// Resolves the wire form into a canonical rule.
    ///
    /// Returns `Ok(None)` for the "none" tag (or an empty one), meaning the
    /// event does not repeat. A bare frequency tag becomes a rule with
    /// interval 1 that never ends.
    ///
    /// ## Errors
    /// Returns a [`RuleError`] describing the first malformed field.
    pub fn resolve(&self) -> RuleResult<Option<RecurrenceRule>> {
        match self {
            Self::Tag(tag) => {
                if is_no_recurrence(tag) {
                    return Ok(None);
                }
                Ok(Some(RecurrenceRule::new(tag.parse()?)))
            }
            Self::Rule(spec) => spec.resolve(),
        }
    }
}

impl From<Frequency> for RecurrenceSpec {
    fn from(frequency: Frequency) -> Self {
        Self::Tag(frequency.as_str().to_string())
    }
}

impl From<RecurrenceRule> for RecurrenceSpec {
    fn from(rule: RecurrenceRule) -> Self {
        Self::Rule(RuleSpec::from(rule))
    }
}

impl RuleSpec {
    fn resolve(&self) -> RuleResult<Option<RecurrenceRule>> {
        let Some(tag) = self.frequency.as_deref() else {
            return Err(RuleError::UnknownFrequency(String::new()));
        };
        if is_no_recurrence(tag) {
            return Ok(None);
        }

        let frequency: Frequency = tag.parse()?;

        let interval = match self.interval {
            None => 1,
            Some(n) => positive_u32(n).ok_or(RuleError::NonPositiveInterval(n))?,
        };

        let mut rule = RecurrenceRule::new(frequency).every(interval);

        if frequency == Frequency::Weekly
            && let Some(days) = &self.days_of_week
        {
            let weekdays = days
                .iter()
                .map(|&idx| weekday_from_index(idx))
                .collect::<RuleResult<Vec<_>>>()?;
            rule = rule.on_weekdays(weekdays);
        }

        rule.end = match self.end_type.as_deref().map(str::trim) {
            None | Some("" | "never") => RecurrenceEnd::Never,
            Some("date") => RecurrenceEnd::Until(
                self.end_date
                    .as_deref()
                    .and_then(parse_date_prefix)
                    .ok_or_else(|| RuleError::InvalidEndDate(self.end_date.clone()))?,
            ),
            Some("count") => RecurrenceEnd::Count(
                self.occurrence_count
                    .and_then(positive_u32)
                    .ok_or(RuleError::NonPositiveCount(self.occurrence_count))?,
            ),
            Some(other) => return Err(RuleError::UnknownEndType(other.to_string())),
        };

        for key in &self.exceptions {
            let day = parse_date_prefix(key).ok_or_else(|| RuleError::InvalidException(key.clone()))?;
            rule.exceptions.insert(day);
        }

        Ok(Some(rule))
    }
}

impl From<RecurrenceRule> for RuleSpec {
    fn from(rule: RecurrenceRule) -> Self {
        let (end_type, end_date, occurrence_count) = match rule.end {
            RecurrenceEnd::Never => ("never", None, None),
            RecurrenceEnd::Until(day) => ("date", Some(day.format(DATE_KEY_FORMAT).to_string()), None),
            RecurrenceEnd::Count(n) => ("count", None, Some(i64::from(n))),
        };

        Self {
            frequency: Some(rule.frequency.as_str().to_string()),
            interval: Some(i64::from(rule.interval)),
            days_of_week: (!rule.weekdays.is_empty()).then(|| {
                rule.weekdays
                    .iter()
                    .map(|d| i64::from(d.num_days_from_sunday()))
                    .collect()
            }),
            end_type: Some(end_type.to_string()),
            end_date,
            occurrence_count,
            exceptions: rule
                .exceptions
                .iter()
                .map(|d| d.format(DATE_KEY_FORMAT).to_string())
                .collect(),
        }
    }
}

fn is_no_recurrence(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || tag.eq_ignore_ascii_case(NO_RECURRENCE_TAG)
}

fn positive_u32(n: i64) -> Option<u32> {
    u32::try_from(n).ok().filter(|&n| n > 0)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Maps 0=Sunday..6=Saturday onto `chrono::Weekday`.
fn weekday_from_index(idx: i64) -> RuleResult<Weekday> {
    match idx {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(RuleError::InvalidWeekday(idx)),
    }
}

/// Accepts both `2024-03-01` and full timestamps such as `2024-03-01T00:00:00Z`.
/// Used for `endDate` and exception keys alike.
fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_KEY_FORMAT).ok())
}
