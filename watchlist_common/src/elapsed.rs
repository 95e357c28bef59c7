//! "Time since update" labels.
//!
//! A row label is a pure function of the row's `updated_at` and the current time
//! broadcast by the clock, so rows keep no timer state of their own.

use std::fmt;

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// Elapsed time reduced to its display band, floored to whole units.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ElapsedBand {
    /// Less than a minute.
    Seconds(i64),
    /// Less than an hour.
    Minutes(i64),
    /// Less than a day.
    Hours(i64),
    /// A day or more.
    Days(i64),
}

impl ElapsedBand {
    /// Classify `seconds` of elapsed time. Negative values count as zero.
    pub fn classify(seconds: i64) -> Self {
        let d = seconds.max(0);
        if d < MINUTE {
            ElapsedBand::Seconds(d)
        } else if d < HOUR {
            ElapsedBand::Minutes(d / MINUTE)
        } else if d < DAY {
            ElapsedBand::Hours(d / HOUR)
        } else {
            ElapsedBand::Days(d / DAY)
        }
    }

    /// Band of the time elapsed between `updated_at` and `now`.
    pub fn between(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::classify((now - updated_at).num_seconds())
    }
}

impl fmt::Display for ElapsedBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElapsedBand::Seconds(n) => write!(f, "{} sec ago", n),
            ElapsedBand::Minutes(n) => write!(f, "{} min ago", n),
            ElapsedBand::Hours(n) => write!(f, "{} hours ago", n),
            ElapsedBand::Days(n) => write!(f, "{} days ago", n),
        }
    }
}

/// Label for a row last updated at `updated_at`, as seen at `now`.
pub fn label_for(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    ElapsedBand::between(updated_at, now).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn label_after(seconds: i64) -> String {
        let now = Utc::now();
        label_for(now - Duration::seconds(seconds), now)
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(label_after(0), "0 sec ago");
        assert_eq!(label_after(59), "59 sec ago");
        assert_eq!(label_after(60), "1 min ago");
        assert_eq!(label_after(3_599), "59 min ago");
        assert_eq!(label_after(3_600), "1 hours ago");
        assert_eq!(label_after(86_399), "23 hours ago");
        assert_eq!(label_after(86_400), "1 days ago");
        assert_eq!(label_after(3 * 86_400 + 5), "3 days ago");
    }

    #[test]
    fn sub_second_remainders_are_floored() {
        let now = Utc::now();
        let updated_at = now - Duration::milliseconds(59_999);
        assert_eq!(ElapsedBand::between(updated_at, now), ElapsedBand::Seconds(59));
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let now = Utc::now();
        assert_eq!(label_for(now + Duration::seconds(30), now), "0 sec ago");
    }

    #[test]
    fn classify_uses_floor_division() {
        assert_eq!(ElapsedBand::classify(119), ElapsedBand::Minutes(1));
        assert_eq!(ElapsedBand::classify(7_199), ElapsedBand::Hours(1));
        assert_eq!(ElapsedBand::classify(172_799), ElapsedBand::Days(1));
    }
}
