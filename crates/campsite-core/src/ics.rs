//! iCalendar (RFC 5545) export of the two reminders.
//!
//! Each reminder becomes a single-event `VCALENDAR` with a display alarm. By
//! default the event is all-day on the computed date. Given an IANA timezone,
//! the event is instead timed at the platform's open time in that zone and
//! written in UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::CalculationResult;
use crate::error::{PlannerError, Result};
use crate::open_time::parse_open_time;
use crate::render::format_long_date;

const PRODID: &str = "-//Campsite Buffer//Reminder//EN";
const TIMED_EVENT_MINUTES: i64 = 15;
/// RFC 5545 §3.1: content lines SHOULD NOT exceed 75 octets.
const MAX_LINE_OCTETS: usize = 75;

/// Which of the two reminders to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// Book the buffer block on the booking-open date.
    Booking,
    /// Cancel the buffer nights on the cancel-open date.
    Cancel,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Booking => "booking",
            ReminderKind::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "booking" | "book" => Ok(ReminderKind::Booking),
            "cancel" | "modify" => Ok(ReminderKind::Cancel),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown reminder type '{}' (expected booking or cancel)",
                other
            ))),
        }
    }
}

/// The content of one reminder, independent of its serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    pub kind: ReminderKind,
    pub date: NaiveDate,
    pub summary: String,
    pub description: String,
    /// Platform name, used to report a bad open time.
    pub platform: String,
    pub open_time: String,
}

/// Build the reminder of the given kind from a calculated plan.
pub fn reminder_event(result: &CalculationResult, kind: ReminderKind) -> ReminderEvent {
    let rule = &result.rule;
    let opens = if rule.open_time.trim().is_empty() {
        String::new()
    } else {
        format!(" Platform opens at {}.", rule.open_time.trim())
    };

    let (date, summary, description) = match kind {
        ReminderKind::Booking => (
            result.booking_open_date,
            format!("BOOK CAMPSITE - {}", rule.name),
            format!(
                "Book a {}-night block starting {} through {} on {}.{}",
                result.booked_nights(),
                format_long_date(result.buffer_start_date),
                format_long_date(result.checkout_date),
                rule.url,
                opens
            ),
        ),
        ReminderKind::Cancel => {
            let trim = match result.buffer_nights() {
                Some((first, last)) => format!(
                    "Log into {} and cancel/modify dates {} through {} to keep only your {}-night stay.",
                    rule.url,
                    format_long_date(first),
                    format_long_date(last),
                    result.stay_length
                ),
                None => format!(
                    "Log into {} and confirm your {}-night stay.",
                    rule.url, result.stay_length
                ),
            };
            (
                result.cancel_open_date,
                format!("CANCEL BUFFER DATES - {}", rule.name),
                format!(
                    "Your real arrival ({}) is now bookable. {}{}",
                    format_long_date(result.arrival_date),
                    trim,
                    opens
                ),
            )
        }
    };

    ReminderEvent {
        kind,
        date,
        summary,
        description,
        platform: rule.name.clone(),
        open_time: rule.open_time.clone(),
    }
}

/// Serialization options for [`to_ics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsOptions {
    /// Creation time, written as `DTSTAMP` and folded into the `UID`.
    pub stamp: DateTime<Utc>,
    /// IANA zone for a timed reminder at the platform's open time. `None`
    /// produces an all-day event.
    pub timezone: Option<String>,
}

impl IcsOptions {
    pub fn all_day(stamp: DateTime<Utc>) -> Self {
        Self {
            stamp,
            timezone: None,
        }
    }

    pub fn timed(stamp: DateTime<Utc>, timezone: impl Into<String>) -> Self {
        Self {
            stamp,
            timezone: Some(timezone.into()),
        }
    }
}

/// Serialize a reminder as an RFC 5545 calendar with CRLF line endings.
///
/// # Errors
/// Timed output only: `PlannerError::InvalidTimezone` for an unknown zone,
/// `PlannerError::InvalidRule` for an unreadable open time, and
/// `PlannerError::InvalidInput` if the open time does not exist on that date
/// (inside a DST gap).
pub fn to_ics(event: &ReminderEvent, options: &IcsOptions) -> Result<String> {
    let (dtstart, dtend, trigger) = match options.timezone.as_deref() {
        None => {
            let next_day = event.date.succ_opt().ok_or_else(|| {
                PlannerError::InvalidInput(format!("{} is the last representable date", event.date))
            })?;
            (
                format!("DTSTART;VALUE=DATE:{}", ics_date(event.date)),
                format!("DTEND;VALUE=DATE:{}", ics_date(next_day)),
                "TRIGGER:-PT0S".to_string(),
            )
        }
        Some(zone) => {
            let start = timed_start(event, zone)?;
            let end = start + Duration::minutes(TIMED_EVENT_MINUTES);
            (
                format!("DTSTART:{}", ics_utc(start)),
                format!("DTEND:{}", ics_utc(end)),
                format!("TRIGGER:-PT{}M", TIMED_EVENT_MINUTES),
            )
        }
    };

    let uid = format!(
        "campsite-{}-{}@campsitereminder",
        event.kind,
        options.stamp.timestamp_millis()
    );

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", ics_utc(options.stamp)),
        dtstart,
        dtend,
        format!("SUMMARY:{}", escape_text(&event.summary)),
        format!("DESCRIPTION:{}", escape_text(&event.description)),
        "BEGIN:VALARM".to_string(),
        trigger,
        "ACTION:DISPLAY".to_string(),
        format!("DESCRIPTION:{}", escape_text(&event.summary)),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    Ok(out)
}

/// Suggested file name for an exported reminder.
pub fn default_file_name(kind: ReminderKind) -> String {
    format!("campsite-{}-reminder.ics", kind)
}

fn timed_start(event: &ReminderEvent, zone: &str) -> Result<DateTime<Utc>> {
    let tz: chrono_tz::Tz = zone
        .parse()
        .map_err(|_| PlannerError::InvalidTimezone(zone.to_string()))?;
    let time = parse_open_time(&event.platform, &event.open_time)?;
    let local = event.date.and_time(time);

    let start = tz.from_local_datetime(&local).earliest().ok_or_else(|| {
        PlannerError::InvalidInput(format!("{} does not exist in {}", local, zone))
    })?;
    Ok(start.with_timezone(&Utc))
}

fn ics_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn ics_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT property value (RFC 5545 §3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Fold a content line into chunks of at most 75 octets, never splitting a
/// UTF-8 character. Continuation lines start with a single space.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for c in line.chars() {
        // Continuation lines spend one octet on the leading space.
        if width + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += c.len_utf8();
    }
    out
}
