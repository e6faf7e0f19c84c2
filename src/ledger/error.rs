//! Ledger error types
//!
//! Errors raised while parsing amounts, reading stored records or
//! recovering entries from an exported page.

use thiserror::Error;

/// Errors that can occur in the ledger core
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount text could not be parsed as a decimal value
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Label index does not reference a catalog label
    #[error("Unknown label index: {0}")]
    UnknownLabel(i64),

    /// Timestamp is missing or not a number
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A rendered entry node lacks the data needed to rebuild the entry
    #[error("Malformed rendered entry: {0}")]
    MalformedEntry(String),

    /// Entry store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by the entry store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key/value backend refused the operation
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored JSON did not match the record format
    #[error("Malformed stored data under {key:?}: {error}")]
    Malformed { key: String, error: String },

    /// Records could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnknownLabel(9);
        assert_eq!(err.to_string(), "Unknown label index: 9");

        let err = StoreError::Malformed {
            key: "dailyEntries".to_string(),
            error: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed stored data under \"dailyEntries\": expected value"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let store_err: StoreError = json_err.into();
        assert!(matches!(store_err, StoreError::Serialization(_)));

        let ledger_err: LedgerError = store_err.into();
        assert!(matches!(ledger_err, LedgerError::Store(_)));
    }
}
