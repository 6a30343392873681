//! Parsing of the human-readable daily open time published by each platform.

use chrono::NaiveTime;

use crate::error::{PlannerError, Result};

/// Parse an open time such as `"7:00 AM"`, `"7AM"`, `"07:00 a.m."` or `"19:00"`.
///
/// Anything after the meridiem (e.g. a zone label in `"10:00 AM ET"`) is
/// ignored; the zone for timed reminders is supplied separately. A word right
/// after the clock must be a meridiem, so `"7:00 p"` is rejected rather than
/// read as a 24-hour time.
///
/// # Errors
/// Returns `PlannerError::InvalidRule` naming `platform` if no time can be read.
pub fn parse_open_time(platform: &str, raw: &str) -> Result<NaiveTime> {
    let unrecognized = || {
        PlannerError::invalid_rule(platform, format!("unrecognized openTime '{}'", raw))
    };
    let cleaned = normalize(raw).ok_or_else(unrecognized)?;

    for format in ["%I:%M %p", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(&cleaned, format) {
            return Ok(time);
        }
    }

    Err(unrecognized())
}

/// Uppercase, drop periods ("P.M." -> "PM"), split a glued meridiem
/// ("7AM" -> "7 AM"), drop trailing words. `None` when the word after the
/// clock is not a meridiem.
fn normalize(raw: &str) -> Option<String> {
    let upper = raw.trim().to_ascii_uppercase().replace('.', "");
    let mut tokens: Vec<String> = Vec::new();

    for token in upper.split_whitespace() {
        match token.strip_suffix("AM").or_else(|| token.strip_suffix("PM")) {
            Some(clock) if !clock.is_empty() && clock.ends_with(|c: char| c.is_ascii_digit()) => {
                tokens.push(clock.to_string());
                tokens.push(token[clock.len()..].to_string());
            }
            _ => tokens.push(token.to_string()),
        }
    }

    // Keep the clock and an optional meridiem. chrono needs minutes.
    let with_minutes = |clock: &str| {
        if clock.contains(':') {
            clock.to_string()
        } else {
            format!("{}:00", clock)
        }
    };
    match tokens.as_slice() {
        [clock, meridiem, ..] if meridiem == "AM" || meridiem == "PM" => {
            Some(format!("{} {}", with_minutes(clock), meridiem))
        }
        [_, word, ..] if word.chars().any(|c| c.is_ascii_alphabetic()) => None,
        [clock, ..] => Some(with_minutes(clock)),
        [] => None,
    }
}
