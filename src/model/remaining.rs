// File: ./src/model/remaining.rs
// Deadline countdown and local-time formatting
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::fmt;

pub const DEFAULT_DATE_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

const MINUTES_PER_DAY: i64 = 60 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Expired,
    Left { days: i64, hours: i64, minutes: i64 },
}

impl Remaining {
    /// Time left from `now` until `limit`, truncated to whole minutes.
    /// A deadline at or before `now` is expired.
    pub fn between(limit: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = limit - now;
        if diff <= TimeDelta::zero() {
            return Remaining::Expired;
        }
        // diff is positive here, so truncation is floor
        let total = diff.num_minutes();
        Remaining::Left {
            days: total / MINUTES_PER_DAY,
            hours: (total % MINUTES_PER_DAY) / 60,
            minutes: total % 60,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Remaining::Expired)
    }

    pub fn total_minutes(&self) -> Option<i64> {
        match *self {
            Remaining::Expired => None,
            Remaining::Left {
                days,
                hours,
                minutes,
            } => Some(days * MINUTES_PER_DAY + hours * 60 + minutes),
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Expired => write!(f, "Expired"),
            Remaining::Left {
                days,
                hours,
                minutes,
            } => write!(f, "{}d {}h {}m left", days, hours, minutes),
        }
    }
}

/// Prints `limit` in the viewer's timezone.
pub fn format_limit<Tz>(limit: DateTime<Utc>, tz: &Tz, date_format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    limit.with_timezone(tz).format(date_format).to_string()
}
