//! Buffer-booking date calculation.
//!
//! Given a platform rule, the checkout date, and the number of nights, computes
//! the arrival date, the start of the block to book, and the two reminder dates:
//! when the buffer block becomes reservable and when the real arrival date opens
//! so the extra buffer nights can be cancelled.
//!
//! Everything here works on [`NaiveDate`]: there is no time-of-day or zone, so a
//! computed date can never drift across a UTC offset.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::rules::{BookingWindow, PlatformRule};

/// How the buffer block is laid out relative to the real stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferStrategy {
    /// The booked block starts on the arrival date. Booking and cancel
    /// reminders fall on the same day.
    #[default]
    Coincident,
    /// The booked block is the platform's maximum stay ending at checkout, so it
    /// opens earlier than the arrival date and the leading nights are cancelled
    /// once the arrival date becomes reservable.
    FullBuffer,
}

/// The three user inputs, checked for presence and shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub platform_key: String,
    pub checkout_date: NaiveDate,
    pub stay_length: u32,
}

impl CalculationInput {
    /// Build an input from already-typed values.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidInput` if the platform key is blank or the
    /// stay is not positive.
    pub fn new(platform_key: &str, checkout_date: NaiveDate, stay_length: i64) -> Result<Self> {
        let platform_key = platform_key.trim();
        if platform_key.is_empty() {
            return Err(PlannerError::InvalidInput("platform is required".to_string()));
        }
        Ok(Self {
            platform_key: platform_key.to_string(),
            checkout_date,
            stay_length: positive_stay(stay_length)?,
        })
    }

    /// Parse raw form values: a platform key, a `YYYY-MM-DD` date, and a night count.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidInput` for any blank or malformed field.
    pub fn parse(platform_key: &str, checkout_date: &str, stay_length: &str) -> Result<Self> {
        let checkout_date = checkout_date.trim();
        if checkout_date.is_empty() {
            return Err(PlannerError::InvalidInput("checkout date is required".to_string()));
        }
        let checkout_date = NaiveDate::parse_from_str(checkout_date, "%Y-%m-%d").map_err(|_| {
            PlannerError::InvalidInput(format!(
                "checkout date '{}' is not a valid YYYY-MM-DD date",
                checkout_date
            ))
        })?;

        let stay_length = stay_length.trim();
        if stay_length.is_empty() {
            return Err(PlannerError::InvalidInput("stay length is required".to_string()));
        }
        let nights: i64 = stay_length.parse().map_err(|_| {
            PlannerError::InvalidInput(format!(
                "stay length '{}' is not a whole number of nights",
                stay_length
            ))
        })?;

        Self::new(platform_key, checkout_date, nights)
    }
}

fn positive_stay(nights: i64) -> Result<u32> {
    u32::try_from(nights)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            PlannerError::InvalidInput(format!(
                "stay length must be a positive number of nights, got {}",
                nights
            ))
        })
}

/// The derived plan for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub arrival_date: NaiveDate,
    pub buffer_start_date: NaiveDate,
    pub booking_open_date: NaiveDate,
    pub cancel_open_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub stay_length: u32,
    pub strategy: BufferStrategy,
    pub rule: PlatformRule,
}

impl CalculationResult {
    /// Nights booked in the buffer block that must be cancelled, as an inclusive
    /// `(first, last)` range. `None` when the block starts on the arrival date.
    pub fn buffer_nights(&self) -> Option<(NaiveDate, NaiveDate)> {
        if self.buffer_start_date >= self.arrival_date {
            return None;
        }
        let last = self.arrival_date.pred_opt()?;
        Some((self.buffer_start_date, last))
    }

    /// Length in nights of the block booked on the booking-open date.
    pub fn booked_nights(&self) -> i64 {
        (self.checkout_date - self.buffer_start_date).num_days()
    }
}

/// Compute the plan with the default [`BufferStrategy::Coincident`] layout.
///
/// `arrival = checkout - stay_length`, the block starts on arrival, and both
/// reminder dates are the arrival date moved back by the platform's window.
///
/// # Errors
/// Returns `PlannerError::InvalidInput` if `stay_length` is zero or the dates
/// leave the representable range, and `PlannerError::InvalidRule` if the rule
/// has a zero `max_stay_days`.
pub fn calculate(
    rule: &PlatformRule,
    checkout_date: NaiveDate,
    stay_length: u32,
) -> Result<CalculationResult> {
    calculate_with(rule, checkout_date, stay_length, BufferStrategy::Coincident)
}

/// Compute the plan with an explicit buffer layout.
///
/// # Errors
/// As [`calculate`]. With [`BufferStrategy::FullBuffer`] a stay longer than
/// `max_stay_days` is also rejected as `PlannerError::InvalidInput`, since it
/// cannot be held by a single reservation.
pub fn calculate_with(
    rule: &PlatformRule,
    checkout_date: NaiveDate,
    stay_length: u32,
    strategy: BufferStrategy,
) -> Result<CalculationResult> {
    if stay_length == 0 {
        return Err(PlannerError::InvalidInput(
            "stay length must be a positive number of nights, got 0".to_string(),
        ));
    }
    if rule.max_stay_days == 0 {
        return Err(PlannerError::invalid_rule(
            &rule.name,
            "maxStayDays must be positive, got 0",
        ));
    }

    let arrival_date = sub_days(checkout_date, stay_length)?;

    let (buffer_start_date, booking_open_date, cancel_open_date) = match strategy {
        BufferStrategy::Coincident => {
            let open = window_open_date(arrival_date, &rule.booking_window)?;
            (arrival_date, open, open)
        }
        BufferStrategy::FullBuffer => {
            if stay_length > rule.max_stay_days {
                return Err(PlannerError::InvalidInput(format!(
                    "a {}-night stay exceeds the {}-night maximum on {}",
                    stay_length, rule.max_stay_days, rule.name
                )));
            }
            let buffer_start = sub_days(checkout_date, rule.max_stay_days)?;
            (
                buffer_start,
                window_open_date(buffer_start, &rule.booking_window)?,
                window_open_date(arrival_date, &rule.booking_window)?,
            )
        }
    };

    tracing::debug!(
        platform = %rule.name,
        ?strategy,
        %arrival_date,
        %booking_open_date,
        %cancel_open_date,
        "calculated buffer plan"
    );

    Ok(CalculationResult {
        arrival_date,
        buffer_start_date,
        booking_open_date,
        cancel_open_date,
        checkout_date,
        stay_length,
        strategy,
        rule: rule.clone(),
    })
}

/// The first date on which `date` can be reserved under `window`.
///
/// Month offsets use calendar-month arithmetic. When the day of month does not
/// exist in the target month, the result is clamped to that month's last day:
/// 2024-03-31 minus one month is 2024-02-29, 2023-03-31 minus one month is
/// 2023-02-28.
///
/// # Errors
/// Returns `PlannerError::InvalidInput` if the result is outside chrono's range.
pub fn window_open_date(date: NaiveDate, window: &BookingWindow) -> Result<NaiveDate> {
    match *window {
        BookingWindow::Days(days) => sub_days(date, days),
        BookingWindow::Months(months) => date
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| out_of_range(date, &format!("{} months", months))),
    }
}

fn sub_days(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| out_of_range(date, &format!("{} days", days)))
}

fn out_of_range(date: NaiveDate, offset: &str) -> PlannerError {
    PlannerError::InvalidInput(format!(
        "{} minus {} is outside the supported date range (year {})",
        date,
        offset,
        date.year()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_window_clamps_to_month_end() {
        let window = BookingWindow::Months(1);
        assert_eq!(window_open_date(ymd(2023, 3, 31), &window).unwrap(), ymd(2023, 2, 28));
        assert_eq!(window_open_date(ymd(2024, 3, 31), &window).unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn zero_day_window_is_identity() {
        let d = ymd(2025, 6, 1);
        assert_eq!(window_open_date(d, &BookingWindow::Days(0)).unwrap(), d);
    }

    #[test]
    fn out_of_range_is_invalid_input() {
        let err = window_open_date(NaiveDate::MIN, &BookingWindow::Days(1)).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidInput(_)));
    }
}
