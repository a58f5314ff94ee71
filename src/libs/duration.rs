//! Clock-style duration arithmetic for service orders.
//!
//! Durations travel as `HH:MM` text both in storage and on the wire. This
//! module converts that text to whole minutes and back, and derives the total
//! worked time of an order from its start, end, discount and transfer fields.
//!
//! Parsing is permissive: a non-numeric field contributes `0` instead of
//! failing. Callers that need strict input run
//! [`crate::libs::validation::validate_time`] first.
//!
//! ```rust
//! use dexus::libs::duration::{compute_total_duration, minutes_to_time, time_to_minutes};
//!
//! assert_eq!(time_to_minutes("01:30"), 90);
//! assert_eq!(minutes_to_time(125), "02:05");
//! assert_eq!(compute_total_duration("22:00", "02:00", None, None), "04:00");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Minutes in one day; added once when an order crosses midnight.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A span of time stored as whole minutes and rendered as `HH:MM`.
///
/// Hours are not wrapped at 24, so summed durations such as `"137:45"`
/// render naturally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub fn from_minutes(minutes: i64) -> Self {
        Duration(minutes)
    }

    /// Parses `HH:MM` text, degrading malformed parts to zero.
    pub fn parse(text: &str) -> Self {
        Duration(time_to_minutes(text))
    }

    /// Parses an optional field; `None` and empty text count as zero.
    pub fn parse_opt(text: Option<&str>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Self::parse(t),
            _ => Self::ZERO,
        }
    }

    pub fn minutes(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time(self.0))
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Self {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Duration::parse(&text))
    }
}

/// Converts `HH:MM` into minutes.
///
/// Each field is read as a leading integer, so `"8:5"` is 485 minutes, `"abc"`
/// is 0, and a missing minute field counts as zero. Text after a second colon
/// (seconds) is ignored. No range checks are applied, but a value too large
/// for `i64` minutes counts as 0.
pub fn time_to_minutes(time: &str) -> i64 {
    let mut parts = time.split(':');
    let hours = parts.next().map(leading_int).unwrap_or(0);
    let minutes = parts.next().map(leading_int).unwrap_or(0);
    hours.checked_mul(60).and_then(|h| h.checked_add(minutes)).unwrap_or(0)
}

/// Formats minutes as `HH:MM`, padding hours to at least two digits.
///
/// Negative input floors toward negative infinity so the minute field stays
/// within `0..=59`.
pub fn minutes_to_time(minutes: i64) -> String {
    let hours = minutes.div_euclid(60);
    let mins = minutes.rem_euclid(60);
    format!("{:02}:{:02}", hours, mins)
}

/// Total worked time of one order: `end - start - discount + transfer`.
///
/// A negative result means the order ran past midnight and gets one day added.
/// Longer spans are not modelled.
pub fn compute_total_duration(start: &str, end: &str, discount: Option<&str>, transfer: Option<&str>) -> String {
    let mut total = Duration::parse(end) - Duration::parse(start) - Duration::parse_opt(discount)
        + Duration::parse_opt(transfer);

    if total.minutes() < 0 {
        total = total + Duration::from_minutes(MINUTES_PER_DAY);
    }

    minutes_to_time(total.minutes())
}

fn leading_int(field: &str) -> i64 {
    let field = field.trim_start();
    let (sign, digits) = match field.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, field.strip_prefix('+').unwrap_or(field)),
    };

    let value = digits
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0i64, |acc, c| acc.saturating_mul(10).saturating_add(i64::from(c as u8 - b'0')));

    sign * value
}
