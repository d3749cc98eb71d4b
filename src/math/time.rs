//! How long counting by ones would take, in words a five-year-old follows
//!
//! Assumes one number per second.

use serde::{Deserialize, Serialize};

const SECONDS_PER_MINUTE: f64 = 60.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Elapsed seconds plus a rounded human phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEstimate {
    pub seconds: i64,
    pub human_text: String,
}

/// Estimate the time needed to count to `n` one number per second
pub fn estimate(n: i64) -> TimeEstimate {
    TimeEstimate {
        seconds: n,
        human_text: describe_seconds(n),
    }
}

fn describe_seconds(seconds: i64) -> String {
    if seconds <= 120 {
        return format!("about {} seconds", seconds);
    }

    let minutes = seconds as f64 / SECONDS_PER_MINUTE;
    if minutes < 60.0 {
        return format!("about {} minutes", nearest(minutes));
    }

    let hours = minutes / MINUTES_PER_HOUR;
    if hours < 48.0 {
        return format!("about {} hours", nearest(hours));
    }

    let days = hours / HOURS_PER_DAY;
    if days < DAYS_PER_YEAR * 2.0 {
        return format!("about {} days", nearest(days));
    }

    let years = days / DAYS_PER_YEAR;
    if years < 1_000.0 {
        return format!("about {} years", nearest(years));
    }
    if years < 1_000_000.0 {
        return format!("about {} thousand years", nearest(years / 1_000.0));
    }
    if years < 1_000_000_000.0 {
        return format!("about {} million years", nearest(years / 1_000_000.0));
    }

    "longer than the age of the universe".to_string()
}

/// Round to the nearest integer, ties to even
fn nearest(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds() {
        assert_eq!(estimate(90).human_text, "about 90 seconds");
        assert_eq!(estimate(120).human_text, "about 120 seconds");
        assert_eq!(estimate(1).human_text, "about 1 seconds");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(estimate(600).human_text, "about 10 minutes");
        assert_eq!(estimate(121).human_text, "about 2 minutes");
        assert_eq!(estimate(3599).human_text, "about 60 minutes");
    }

    #[test]
    fn test_ties_round_to_even() {
        // 150 s is 2.5 minutes, 210 s is 3.5 minutes
        assert_eq!(estimate(150).human_text, "about 2 minutes");
        assert_eq!(estimate(210).human_text, "about 4 minutes");
    }

    #[test]
    fn test_hours_and_days() {
        assert_eq!(estimate(3600).human_text, "about 1 hours");
        assert_eq!(estimate(36_000).human_text, "about 10 hours");
        assert_eq!(estimate(172_800).human_text, "about 2 days");
        assert_eq!(estimate(1_000_000).human_text, "about 12 days");
    }

    #[test]
    fn test_years() {
        // 730 days
        assert_eq!(estimate(63_072_000).human_text, "about 2 years");
        assert_eq!(estimate(1_000_000_000).human_text, "about 32 years");
    }

    #[test]
    fn test_thousands_and_millions_of_years() {
        assert_eq!(estimate(1_000_000_000_000).human_text, "about 32 thousand years");
        assert_eq!(estimate(1_000_000_000_000_000).human_text, "about 32 million years");
    }

    #[test]
    fn test_age_of_the_universe() {
        assert_eq!(
            estimate(i64::MAX).human_text,
            "longer than the age of the universe"
        );
    }

    #[test]
    fn test_seconds_field_is_unchanged() {
        for n in [5, 600, 1_000_000, 987_654_321_000] {
            assert_eq!(estimate(n).seconds, n);
        }
    }
}
