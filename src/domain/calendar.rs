//! Calendar helpers over `chrono::NaiveDate`.
//!
//! Leap years are handled here and nowhere else: February has 29 days in a
//! leap year because the first of March minus one day is the 29th.

use chrono::{Datelike, NaiveDate};

/// First day of the month after the one containing `date`.
///
/// Returns `None` past the end of chrono's representable range.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_next_month(date)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Number of days in the month containing `date` (28..=31).
pub fn days_in_month(date: NaiveDate) -> u32 {
    last_of_month(date).day()
}

/// Inclusive day count of `[start, end]`; zero when `end < start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// "March 2025"-style label used in payment descriptions.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
