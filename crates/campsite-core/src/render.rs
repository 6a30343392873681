//! Plain-text rendering of a calculated plan.

use chrono::NaiveDate;

use crate::calculator::CalculationResult;

/// Long US-style date, e.g. `Friday, July 12, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn at_open_time(result: &CalculationResult) -> String {
    let open_time = result.rule.open_time.trim();
    if open_time.is_empty() {
        String::new()
    } else {
        format!(" at {}", open_time)
    }
}

fn nights(n: impl std::fmt::Display) -> String {
    format!("{}-night", n)
}

/// Arrival, checkout and stay length.
pub fn stay_summary(result: &CalculationResult) -> String {
    format!(
        "Arrival:  {}\nCheckout: {}\nStay:     {} nights",
        format_long_date(result.arrival_date),
        format_long_date(result.checkout_date),
        result.stay_length
    )
}

/// Reminder 1: book the block that secures the checkout date.
pub fn booking_reminder(result: &CalculationResult) -> String {
    let mut text = format!(
        "Set a reminder for: {}{}\n\
         On this date, book a {} block starting {} through {}.",
        format_long_date(result.booking_open_date),
        at_open_time(result),
        nights(result.booked_nights()),
        format_long_date(result.buffer_start_date),
        format_long_date(result.checkout_date),
    );
    if result.buffer_nights().is_some() {
        text.push_str("\nThis secures your checkout date. You will cancel the early dates in Reminder 2.");
    }
    if result.stay_length > result.rule.max_stay_days {
        text.push_str(&format!(
            "\nNote: {} allows at most {} nights per reservation.",
            result.rule.name, result.rule.max_stay_days
        ));
    }
    text
}

/// Reminder 2: the arrival date opens; trim the buffer nights.
pub fn cancel_reminder(result: &CalculationResult) -> String {
    let mut text = format!(
        "Set a reminder for: {}{}\n\
         On this date, your actual arrival date ({}) opens for booking.",
        format_long_date(result.cancel_open_date),
        at_open_time(result),
        format_long_date(result.arrival_date),
    );
    match result.buffer_nights() {
        Some((first, last)) => text.push_str(&format!(
            "\nLog in and cancel or modify the buffer dates ({} through {}) - keeping only your {} stay.",
            format_long_date(first),
            format_long_date(last),
            nights(result.stay_length)
        )),
        None => text.push_str(&format!(
            "\nYour booking already starts on arrival; confirm it covers only your {} stay.",
            nights(result.stay_length)
        )),
    }
    text
}

/// The whole plan as shown to the user.
pub fn render_plan(result: &CalculationResult) -> String {
    let rule = &result.rule;
    let mut out = format!(
        "{}\n({} booking window)\n\n{}\n\nReminder 1 - Book\n{}\n\nReminder 2 - Cancel/modify\n{}\n",
        rule.name,
        rule.booking_window,
        stay_summary(result),
        booking_reminder(result),
        cancel_reminder(result),
    );
    if !rule.url.is_empty() {
        out.push_str(&format!("\nPlatform: {}\n", rule.url));
    }
    if !rule.notes.is_empty() {
        out.push_str(&format!("Notes: {}\n", rule.notes));
    }
    out
}
