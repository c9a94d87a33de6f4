//! Calendar month stepping for payment dates

use chrono::{Datelike, NaiveDate};

/// Number of days in a calendar month, leap-year aware
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Add `n` whole months to `date`, clamping the day to the target month's last day.
///
/// `n` may be zero or negative. Jan 31 + 1 month lands on Feb 29 in a leap
/// year and Feb 28 otherwise.
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + n;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // Day is clamped into the month, so the date always exists
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}
