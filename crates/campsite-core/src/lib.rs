//! # campsite-core
//!
//! Buffer-booking planner for campground reservation windows.
//!
//! Many reservation platforms only open a date a fixed time before arrival, so a
//! trip whose first night is not yet bookable cannot be reserved directly. The
//! workaround is to book a longer block that is already open (the buffer) and
//! cancel the extra nights once the real arrival date opens. This crate computes
//! those dates from each platform's booking-window rule and exports reminders.
//!
//! ## Quick start
//!
//! ```rust
//! use campsite_core::{calculate, BookingWindow, PlatformRule};
//! use chrono::NaiveDate;
//!
//! let rule = PlatformRule {
//!     name: "Example State Parks".into(),
//!     max_stay_days: 14,
//!     booking_window: BookingWindow::Days(180),
//!     open_time: "7:00 AM".into(),
//!     url: "https://example.org".into(),
//!     notes: String::new(),
//! };
//! let checkout = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
//! let plan = calculate(&rule, checkout, 3).unwrap();
//! assert_eq!(plan.arrival_date, NaiveDate::from_ymd_opt(2024, 7, 12).unwrap());
//! assert_eq!(plan.booking_open_date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`rules`] — platform rule records and the rule set loader
//! - [`calculator`] — arrival / buffer / booking / cancel date computation
//! - [`render`] — plain-text plan and reminder wording
//! - [`ics`] — iCalendar export of the two reminders
//! - [`open_time`] — parsing of platform open times for timed reminders
//! - [`session`] — loaded rules plus the last computed result
//! - [`error`] — Error types

pub mod calculator;
pub mod error;
pub mod ics;
pub mod open_time;
pub mod render;
pub mod rules;
pub mod session;

pub use calculator::{
    calculate, calculate_with, window_open_date, BufferStrategy, CalculationInput,
    CalculationResult,
};
pub use error::{LoadError, PlannerError};
pub use ics::{default_file_name, reminder_event, to_ics, IcsOptions, ReminderEvent, ReminderKind};
pub use render::render_plan;
pub use rules::{BookingWindow, PlatformRule, RawPlatformRule, RuleSet};
pub use session::{RulesSource, Session};
