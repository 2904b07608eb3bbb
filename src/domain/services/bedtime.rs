//! Bedtime Calculation
//!
//! bedtime = sunrise - SLEEP_DURATION

use chrono::{DateTime, Duration, FixedOffset};

/// Hours and minutes of sleep to fit before sunrise: 8h15m.
pub const SLEEP_DURATION_MINUTES: i64 = 8 * 60 + 15;

/// The sleep offset as a chrono duration.
pub fn sleep_duration() -> Duration {
    Duration::minutes(SLEEP_DURATION_MINUTES)
}

/// Compute when to go to bed to be asleep for the full offset before `sunrise`.
///
/// The result keeps the offset of the input timestamp.
pub fn compute_bedtime(sunrise: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    sunrise - sleep_duration()
}

/// Parse an upstream sunrise timestamp (RFC 3339 / ISO 8601 with offset).
pub fn parse_sunrise(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim())
}
