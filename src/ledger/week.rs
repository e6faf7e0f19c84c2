//! ISO-8601 week numbers
//!
//! Weeks start on Monday. Week 1 of a year is the week holding its first
//! Thursday, so a year whose January 1st falls on Monday to Thursday starts
//! in week 1, and the leading days of a year starting Friday to Sunday
//! belong to the last week of the previous year.

use chrono::{Datelike, NaiveDate};

/// A week, qualified by the year it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    /// Week-numbering year (may differ from the calendar year near Jan 1st)
    pub year: i32,
    /// Week number, 1..=53
    pub week: u32,
}

/// Weekday of January 1st, Monday = 0 .. Sunday = 6
fn jan1_offset(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.weekday().num_days_from_monday())
        .unwrap_or(0)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of weeks in the week-numbering year (52 or 53)
pub fn weeks_in_year(year: i32) -> u32 {
    match jan1_offset(year) {
        3 => 53,
        2 if is_leap(year) => 53,
        _ => 52,
    }
}

/// ISO week of a calendar date
pub fn iso_week(date: NaiveDate) -> IsoWeek {
    let year = date.year();
    let offset = jan1_offset(year);

    let mut week = (date.ordinal() + offset - 1) / 7;
    // Years starting Monday..Thursday count their first partial week as week 1
    if offset < 4 {
        week += 1;
    }

    if week == 0 {
        return IsoWeek {
            year: year - 1,
            week: weeks_in_year(year - 1),
        };
    }
    if week > weeks_in_year(year) {
        return IsoWeek { year: year + 1, week: 1 };
    }
    IsoWeek { year, week }
}

/// Week number only, as shown to the user
pub fn week_number(date: NaiveDate) -> u32 {
    iso_week(date).week
}
