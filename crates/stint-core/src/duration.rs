//! Colon-separated duration strings.
//!
//! The grammar is `[[[[[YY:]WW:]DD:]HH:]MM:]SS`, most significant first.
//! Units are fixed length: a week is seven days and a year is 365 days,
//! with no leap adjustment.

use std::fmt::Write as _;

use thiserror::Error;

/// Seconds per minute.
pub const MINUTE: i64 = 60;
/// Seconds per hour.
pub const HOUR: i64 = 60 * MINUTE;
/// Seconds per day.
pub const DAY: i64 = 24 * HOUR;
/// Seconds per week.
pub const WEEK: i64 = 7 * DAY;
/// Seconds per fixed-length year.
pub const YEAR: i64 = 365 * DAY;

/// Multipliers for components read right to left.
const UNIT_SECONDS: [i64; 6] = [1, MINUTE, HOUR, DAY, WEEK, YEAR];

/// Errors from parsing a duration string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A component between the colons was not a non-negative integer.
    #[error("invalid duration component {component:?}")]
    NonNumeric { component: String },

    /// More components than the grammar has units.
    #[error("too many duration components: {count} (at most 6)")]
    TooManyComponents { count: usize },
}

/// Parses a duration string into seconds.
///
/// Components are interpreted right to left as seconds, minutes, hours,
/// days, weeks, years.
pub fn parse(text: &str) -> Result<i64, FormatError> {
    let components: Vec<&str> = text.split(':').collect();
    if components.len() > UNIT_SECONDS.len() {
        return Err(FormatError::TooManyComponents {
            count: components.len(),
        });
    }

    let mut seconds = 0;
    for (unit, component) in UNIT_SECONDS.iter().zip(components.iter().rev()) {
        let value: i64 = component
            .trim()
            .parse()
            .map_err(|_| FormatError::NonNumeric {
                component: (*component).to_string(),
            })?;
        if value < 0 {
            return Err(FormatError::NonNumeric {
                component: (*component).to_string(),
            });
        }
        seconds += value * unit;
    }
    Ok(seconds)
}

/// Formats seconds as a duration string.
///
/// Leading all-zero units are omitted; the first emitted unit is printed
/// without padding and every later one is zero-padded to two digits, so
/// `parse(format(s)) == s` for every non-negative `s`. Non-positive input
/// formats as `"0"`.
pub fn format(seconds: i64) -> String {
    if seconds <= 0 {
        return "0".to_string();
    }

    let mut values = [0_i64; 6];
    let mut remaining = seconds;
    for (slot, unit) in values.iter_mut().zip([YEAR, WEEK, DAY, HOUR, MINUTE, 1]) {
        *slot = remaining / unit;
        remaining %= unit;
    }

    let first = values.iter().position(|&v| v != 0).unwrap_or(5);
    let mut out = String::new();
    for (i, value) in values.iter().enumerate().skip(first) {
        if i == first {
            write!(out, "{value}").unwrap();
        } else {
            write!(out, ":{value:02}").unwrap();
        }
    }
    out
}
