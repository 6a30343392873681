//! Platform rules -- the booking-window policy of each reservation platform.
//!
//! Rules come from a JSON object keyed by platform (the `platforms.json` shape):
//!
//! ```json
//! {
//!   "recreation_gov": {
//!     "name": "Recreation.gov",
//!     "maxStayDays": 14,
//!     "bookingWindowType": "months",
//!     "bookingWindowMonths": 6,
//!     "openTime": "10:00 AM ET",
//!     "url": "https://www.recreation.gov",
//!     "notes": "..."
//!   }
//! }
//! ```
//!
//! Loading only checks the overall shape. Each record is validated when it is
//! looked up, so one broken record does not take the other platforms with it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoadError, PlannerError, Result};

const BUILTIN_RULES: &str = include_str!("../data/platforms.json");

/// How far ahead of arrival a platform opens its reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingWindow {
    /// Opens a fixed number of calendar days before arrival.
    Days(u32),
    /// Opens a fixed number of calendar months before arrival.
    Months(u32),
}

impl std::fmt::Display for BookingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingWindow::Days(1) => write!(f, "1 day"),
            BookingWindow::Days(n) => write!(f, "{} days", n),
            BookingWindow::Months(1) => write!(f, "1 month"),
            BookingWindow::Months(n) => write!(f, "{} months", n),
        }
    }
}

/// A validated platform rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRule {
    pub name: String,
    /// Longest single reservation the platform accepts; the buffer block length.
    pub max_stay_days: u32,
    pub booking_window: BookingWindow,
    /// Daily time the window opens, as published by the platform (e.g. "7:00 AM").
    pub open_time: String,
    pub url: String,
    pub notes: String,
}

/// A rule record as it appears in the rules source, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlatformRule {
    pub name: Option<String>,
    pub max_stay_days: Option<i64>,
    pub booking_window_type: Option<String>,
    pub booking_window_days: Option<i64>,
    pub booking_window_months: Option<i64>,
    pub open_time: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowKind {
    Days,
    Months,
}

impl WindowKind {
    fn parse(platform: &str, raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            // Older rule files only carry bookingWindowDays.
            None => Ok(WindowKind::Days),
            Some("days" | "day-offset" | "DayOffset") => Ok(WindowKind::Days),
            Some("months" | "calendar-month-offset" | "CalendarMonthOffset") => {
                Ok(WindowKind::Months)
            }
            Some(other) => Err(PlannerError::invalid_rule(
                platform,
                format!("unknown bookingWindowType '{}'", other),
            )),
        }
    }
}

impl RawPlatformRule {
    /// Validate this record into a [`PlatformRule`].
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidRule` when `name` or `maxStayDays` is missing,
    /// `maxStayDays` is not positive, the window type is unrecognized, or the
    /// count for the selected window type is missing or negative.
    pub fn validate(&self, platform: &str) -> Result<PlatformRule> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| PlannerError::invalid_rule(platform, "missing name"))?
            .to_string();

        let max_stay = self
            .max_stay_days
            .ok_or_else(|| PlannerError::invalid_rule(platform, "missing maxStayDays"))?;
        let max_stay_days = u32::try_from(max_stay)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                PlannerError::invalid_rule(
                    platform,
                    format!("maxStayDays must be positive, got {}", max_stay),
                )
            })?;

        let booking_window = match WindowKind::parse(platform, self.booking_window_type.as_deref())? {
            WindowKind::Days => BookingWindow::Days(window_count(
                platform,
                "bookingWindowDays",
                self.booking_window_days,
            )?),
            WindowKind::Months => BookingWindow::Months(window_count(
                platform,
                "bookingWindowMonths",
                self.booking_window_months,
            )?),
        };

        Ok(PlatformRule {
            name,
            max_stay_days,
            booking_window,
            open_time: self.open_time.clone().unwrap_or_default(),
            url: self.url.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

fn window_count(platform: &str, field: &str, value: Option<i64>) -> Result<u32> {
    let count = value.ok_or_else(|| PlannerError::invalid_rule(platform, format!("missing {}", field)))?;
    u32::try_from(count).map_err(|_| {
        PlannerError::invalid_rule(
            platform,
            format!("{} must not be negative, got {}", field, count),
        )
    })
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    record: std::result::Result<RawPlatformRule, String>,
}

/// The platform rules loaded for a session, in source order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<Entry>,
}

impl RuleSet {
    /// An empty rule set; every lookup fails with an unknown-platform error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The platform rules bundled with the crate.
    pub fn builtin() -> std::result::Result<Self, LoadError> {
        Self::from_json_str(BUILTIN_RULES)
    }

    /// Parse a rules source.
    ///
    /// # Errors
    /// Returns `LoadError::Parse` for invalid JSON and `LoadError::NotAnObject`
    /// when the top level is not an object.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        let map = match value {
            Value::Object(map) => map,
            other => return Err(LoadError::NotAnObject(json_kind(&other))),
        };

        let entries: Vec<Entry> = map
            .into_iter()
            .map(|(key, value)| {
                let record = serde_json::from_value::<RawPlatformRule>(value)
                    .map_err(|e| e.to_string());
                if let Err(reason) = &record {
                    tracing::warn!(platform = %key, %reason, "malformed platform record");
                }
                Entry { key, record }
            })
            .collect();

        tracing::debug!(platforms = entries.len(), "loaded platform rules");
        Ok(Self { entries })
    }

    /// Read and parse a rules file.
    ///
    /// # Errors
    /// Returns `LoadError::Io` if the file cannot be read, otherwise as
    /// [`RuleSet::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> std::result::Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Platform keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// `(key, display name)` pairs in source order, for a platform picker.
    ///
    /// Records without a usable name are listed under their key.
    pub fn platforms(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|e| {
                let name = e
                    .record
                    .as_ref()
                    .ok()
                    .and_then(|r| r.name.as_deref())
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(e.key.as_str());
                (e.key.as_str(), name)
            })
            .collect()
    }

    /// Look up and validate the rule for `key`.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidInput` for an unknown key and
    /// `PlannerError::InvalidRule` if the record is malformed.
    pub fn get(&self, key: &str) -> Result<PlatformRule> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| PlannerError::InvalidInput(format!("unknown platform '{}'", key)))?;

        match &entry.record {
            Ok(raw) => raw.validate(key),
            Err(reason) => Err(PlannerError::invalid_rule(key, reason.clone())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
