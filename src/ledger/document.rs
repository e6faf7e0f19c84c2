//! Document entries
//!
//! An exported page carries the entries that were rendered when it was
//! saved, as `<details id="{timestamp}" class="catN">` nodes whose summary
//! holds the amount text. On load these are read back and merged with the
//! entries cached in local storage.

use super::catalog;
use super::entry::{Amount, Entry, Record, Timestamp};
use super::error::{LedgerError, LedgerResult};

const VALUE_SYMBOLS: &str = "0123456789,.";

/// Split rendered amount text such as `12.50€` into value and currency
pub fn split_amount(text: &str) -> (&str, &str) {
    let cut = text
        .char_indices()
        .rev()
        .find(|(_, c)| VALUE_SYMBOLS.contains(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    (&text[..cut], text[cut..].trim())
}

/// Rebuild an entry from the parts of a rendered node
pub fn parse_rendered_entry<'a, I>(id: &str, classes: I, amount_text: &str) -> LedgerResult<Entry>
where
    I: IntoIterator<Item = &'a str>,
{
    let timestamp: Timestamp = id.parse()?;
    let label = classes
        .into_iter()
        .find_map(catalog::class_index)
        .ok_or_else(|| LedgerError::MalformedEntry(format!("entry {} has no label class", id)))?;
    let (value, currency) = split_amount(amount_text.trim());
    let value: Amount = value.parse()?;

    Ok(Entry::new(value, currency, label, timestamp))
}

/// Document entries missing from the cache, followed by the cached records
pub fn merge(document: &[Entry], cached: &[Record]) -> Vec<Record> {
    let mut merged: Vec<Record> = document
        .iter()
        .filter(|e| !cached.iter().any(|r| r.timestamp() == e.timestamp))
        .cloned()
        .map(Record::Entry)
        .collect();
    merged.extend(cached.iter().cloned());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::Tombstone;

    #[test]
    fn test_split_amount() {
        assert_eq!(split_amount("12.50€"), ("12.50", "€"));
        assert_eq!(split_amount("3,20 EUR"), ("3,20", "EUR"));
        assert_eq!(split_amount("7"), ("7", ""));
        assert_eq!(split_amount("€"), ("", "€"));
    }

    #[test]
    fn test_parse_rendered_entry() {
        let entry =
            parse_rendered_entry("1767225600000", ["hidden", "cat3"], "12.50€").unwrap();
        assert_eq!(entry.label, 2);
        assert_eq!(entry.value.to_string(), "12.50");
        assert_eq!(entry.currency, "€");
        assert_eq!(entry.timestamp.millis(), 1_767_225_600_000);
    }

    #[test]
    fn test_parse_rendered_entry_errors() {
        assert!(matches!(
            parse_rendered_entry("1767225600000", ["hidden"], "1.00€"),
            Err(LedgerError::MalformedEntry(_))
        ));
        assert!(matches!(
            parse_rendered_entry("abc", ["cat1"], "1.00€"),
            Err(LedgerError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            parse_rendered_entry("1767225600000", ["cat1"], "€"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_merge_prefers_cached_records() {
        let ts = |ms| Timestamp::from_millis(ms);
        let a = Entry::new(Amount::from_cents(100), "€", 0, ts(1_767_225_600_001));
        let b = Entry::new(Amount::from_cents(200), "€", 1, ts(1_767_225_600_002));
        let cached = vec![
            Record::Remove(Tombstone::remove(b.timestamp)),
            Record::Entry(Entry::new(Amount::from_cents(300), "€", 2, ts(1_767_225_600_003))),
        ];

        let merged = merge(&[a.clone(), b], &cached);

        // b is referenced by a cached tombstone, so only a is carried over
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], Record::Entry(a));
        assert_eq!(&merged[1..], &cached[..]);
    }
}
