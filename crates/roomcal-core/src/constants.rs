/// Upper bound on candidates generated by a single recurrence expansion.
pub const MAX_EXPANSION_ITERATIONS: u32 = 365;

/// `chrono` format of the per-day key used for exception dates.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Separator between the series id and the sequence index of an occurrence id.
pub const OCCURRENCE_ID_SEPARATOR: char = '_';

/// Recurrence tag meaning "does not repeat".
pub const NO_RECURRENCE_TAG: &str = "none";
