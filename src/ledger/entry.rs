//! Entry types
//!
//! - `Amount`: a money value with two fractional digits
//! - `Timestamp`: milliseconds since the Unix epoch
//! - `Entry`: one recorded expense
//! - `Tombstone`: a removal marker for an entry that is not in the cache
//! - `Record`: what the `dailyEntries` list holds, either of the two above
//!
//! The stored JSON predates this crate and is not uniform: labels and
//! timestamps may be strings, older records carry timestamps in seconds.
//! Deserialization accepts all of it; serialization always writes the
//! canonical form.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use super::error::LedgerError;

/// Default currency symbol for new entries
pub const DEFAULT_CURRENCY: &str = "€";

/// Timestamps below this are taken to be seconds, not milliseconds
const LEGACY_SECONDS_THRESHOLD: i64 = 100_000_000_000;

/// Raw JSON scalar as found in stored records
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A money value, held as integer cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Zero amount
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from cents
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Value in cents
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Value as floating point, for chart weights
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is zero
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    fn from_f64(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        if cents.is_finite() && cents.abs() < i64::MAX as f64 {
            Some(Self(cents as i64))
        } else {
            None
        }
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parse `12`, `12.5`, `12,50` or `-3.999` (rounded half up to cents)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidAmount(s.to_string());

        let raw = s.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };

        let normalized = digits.replace(',', ".");
        let (whole, frac) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map_or(false, |d| d >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(units) => Ok(Amount(units.saturating_mul(100))),
            Scalar::Float(value) => Amount::from_f64(value)
                .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", value))),
            Scalar::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create from milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Create from a stored value, upgrading legacy second-resolution values
    pub fn from_stored(raw: i64) -> Self {
        if raw.abs() < LEGACY_SECONDS_THRESHOLD {
            Self(raw.saturating_mul(1000))
        } else {
            Self(raw)
        }
    }

    /// Milliseconds since the epoch
    pub fn millis(self) -> i64 {
        self.0
    }

    /// Calendar date of this instant in the given time zone
    pub fn local_date<Tz: TimeZone>(self, tz: &Tz) -> Option<NaiveDate> {
        tz.timestamp_millis_opt(self.0)
            .single()
            .map(|dt| dt.date_naive())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Timestamp {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Timestamp::from_stored)
            .map_err(|_| LedgerError::InvalidTimestamp(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(raw) => Ok(Timestamp::from_stored(raw)),
            Scalar::Float(raw) => Ok(Timestamp::from_stored(raw as i64)),
            Scalar::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

fn deserialize_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let raw = match Scalar::deserialize(deserializer)? {
        Scalar::Int(raw) => raw,
        Scalar::Float(raw) => raw as i64,
        Scalar::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid label: {:?}", text)))?,
    };
    usize::try_from(raw).map_err(|_| serde::de::Error::custom(LedgerError::UnknownLabel(raw)))
}

/// One recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Amount spent
    pub value: Amount,
    /// Currency symbol as entered
    pub currency: String,
    /// Catalog label index
    #[serde(deserialize_with = "deserialize_label")]
    pub label: usize,
    /// When the expense happened; also the entry's identity
    pub timestamp: Timestamp,
}

impl Entry {
    /// Create a new entry
    pub fn new(value: Amount, currency: impl Into<String>, label: usize, timestamp: Timestamp) -> Self {
        Self {
            value,
            currency: currency.into(),
            label,
            timestamp,
        }
    }

    /// Rendered amount, e.g. `12.50€`
    pub fn amount_text(&self) -> String {
        format!("{}{}", self.value, self.currency)
    }
}

/// Kind of a stored event record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The entry with the same timestamp is removed
    Remove,
}

/// Removal marker for an entry that only exists in the exported page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    pub event: EventKind,
    pub timestamp: Timestamp,
}

impl Tombstone {
    /// Tombstone for the given entry timestamp
    pub fn remove(timestamp: Timestamp) -> Self {
        Self {
            event: EventKind::Remove,
            timestamp,
        }
    }
}

/// A stored record: an entry or a tombstone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Remove(Tombstone),
    Entry(Entry),
}

impl Record {
    /// Timestamp the record refers to
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Record::Remove(t) => t.timestamp,
            Record::Entry(e) => e.timestamp,
        }
    }

    /// The entry, if this record is one
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Record::Entry(e) => Some(e),
            Record::Remove(_) => None,
        }
    }

    /// Whether this record is a tombstone
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Record::Remove(_))
    }
}

impl From<Entry> for Record {
    fn from(entry: Entry) -> Self {
        Record::Entry(entry)
    }
}

impl From<Tombstone> for Record {
    fn from(tombstone: Tombstone) -> Self {
        Record::Remove(tombstone)
    }
}
