//! Time filter
//!
//! Decides which entries count towards the current view. The period comes
//! from the overview select (`daily`, `weekly`, ...) and the reference date
//! from the date picker.

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entry::Entry;
use super::week::iso_week;

/// Overview period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    All,
}

impl Period {
    /// All periods in menu order
    pub fn all() -> &'static [Period] {
        &[
            Period::Daily,
            Period::Weekly,
            Period::Monthly,
            Period::Yearly,
            Period::All,
        ]
    }

    /// Value used in the select element
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
            Period::All => "all",
        }
    }

    /// Menu caption
    pub fn caption(self) -> &'static str {
        match self {
            Period::Daily => "Day",
            Period::Weekly => "Week",
            Period::Monthly => "Month",
            Period::Yearly => "Year",
            Period::All => "All",
        }
    }

    /// Parse a select value; empty or unknown values mean `Daily`
    pub fn from_select(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            "all" => Ok(Period::All),
            other => Err(format!("unknown period: {}", other)),
        }
    }
}

/// Entry predicate for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub period: Period,
    pub selected: NaiveDate,
}

impl Filter {
    /// Create a filter for a period around the selected date
    pub fn new(period: Period, selected: NaiveDate) -> Self {
        Self { period, selected }
    }

    /// Filter that lets everything through
    pub fn all(selected: NaiveDate) -> Self {
        Self::new(Period::All, selected)
    }

    /// Whether a calendar date falls in the filtered period
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        let selected = self.selected;
        match self.period {
            Period::All => true,
            Period::Daily => selected == date,
            Period::Weekly => iso_week(selected) == iso_week(date),
            Period::Monthly => selected.year() == date.year() && selected.month() == date.month(),
            Period::Yearly => selected.year() == date.year(),
        }
    }

    /// Whether an entry is shown, judging its timestamp in the given zone
    pub fn show<Tz: TimeZone>(&self, entry: &Entry, tz: &Tz) -> bool {
        if self.period == Period::All {
            return true;
        }
        match entry.timestamp.local_date(tz) {
            Some(date) => self.matches_date(date),
            None => {
                tracing::warn!(timestamp = %entry.timestamp, "Entry timestamp out of range");
                false
            }
        }
    }
}
