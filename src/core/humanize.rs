//! Human-readable relative times ("3 months ago", "in a day")
//!
//! - **Version**: 1.0.1
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.1: A zero span reads as past ("a few seconds ago")
//! - 1.0.0: Initial release

use chrono::{DateTime, Utc};

/// Average month length in days (400-year Gregorian cycle)
const DAYS_PER_MONTH: f64 = 146_097.0 / 4800.0;

/// Describe `then` relative to `now`, e.g. `"in 6 months"` or `"28 days ago"`
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = then.signed_duration_since(now).num_milliseconds();
    let span = describe_span(millis.unsigned_abs() as f64 / 1000.0);

    if millis > 0 {
        format!("in {span}")
    } else {
        format!("{span} ago")
    }
}

/// Bucket an absolute span of seconds into a phrase
///
/// Each unit is rounded before comparison, so 89 seconds is "a minute" and
/// 26 days already reads as "a month".
fn describe_span(seconds: f64) -> String {
    let secs = seconds.round();
    let minutes = (seconds / 60.0).round();
    let hours = (seconds / 3600.0).round();
    let days = (seconds / 86_400.0).round();
    let months = (seconds / 86_400.0 / DAYS_PER_MONTH).round();
    let years = (seconds / 86_400.0 / DAYS_PER_MONTH / 12.0).round();

    if secs < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}
