//! Calendar arithmetic for month-stepped simulation
//!
//! All engines step a monthly clock and count service in whole calendar
//! years/months, so the helpers here are deliberately calendrical (a year is
//! "same month and day next year"), not day-count approximations.

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `d`.
pub fn month_start(d: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1).expect("first of month is always valid")
}

/// `d` advanced by `n` calendar months (Feb 29 style overflow clamps to the
/// last valid day, matching chrono's `Months` semantics).
pub fn add_months(d: NaiveDate, n: u32) -> NaiveDate {
    d.checked_add_months(Months::new(n))
        .expect("date arithmetic within supported range")
}

/// `d` advanced by `n` calendar years.
pub fn add_years(d: NaiveDate, n: u32) -> NaiveDate {
    add_months(d, n * 12)
}

/// `d` moved back by `n` calendar years.
pub fn sub_years(d: NaiveDate, n: u32) -> NaiveDate {
    d.checked_sub_months(Months::new(n * 12))
        .expect("date arithmetic within supported range")
}

/// Whole calendar years elapsed from `from` to `to` (0 if `to < from`).
pub fn years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to < from {
        return 0;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Whole calendar months elapsed from `from` to `to` (0 if `to < from`).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to < from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// July 1 of the given year.
pub fn july_first(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 7, 1).expect("July 1 is always valid")
}

/// Number of July 1sts strictly after `start` and at or before `end`.
///
/// One increment falls due on each of these, so this is the rollback count
/// when reconstructing a historical basic from today's basic.
pub fn july_firsts_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut count = 0;
    for year in start.year()..=end.year() {
        let july = july_first(year);
        if start < july && july <= end {
            count += 1;
        }
    }
    count
}
