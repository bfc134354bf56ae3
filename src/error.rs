//! Error types for loading, scanning and updating an FDB image.

use std::io;

use thiserror::Error;

use crate::metadata::schema::data_kind::DataKind;

pub type Result<T> = std::result::Result<T, FdbError>;

#[derive(Debug, Error)]
pub enum FdbError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// An offset resolved outside the image, or a read ran past its end.
    #[error("{what} at offset {offset:#x} needs {len} bytes but the image holds {image_len}")]
    OutOfBounds {
        what: &'static str,
        offset: u64,
        len: usize,
        image_len: usize,
    },

    /// A data-kind code above 8.
    #[error("unknown data kind {code} in {what}")]
    UnknownDataKind { what: &'static str, code: u32 },

    /// Structurally invalid content that is not a plain bounds violation.
    #[error("malformed {what}: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("image checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("{what} name at offset {offset:#x} is not valid UTF-8")]
    InvalidName { what: &'static str, offset: usize },

    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The predicate cannot narrow the scan; callers fall back to a full scan.
    #[error("unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("type mismatch: column holds {expected}, got {found}")]
    TypeMismatch {
        expected: DataKind,
        found: &'static str,
    },

    #[error("value {value} out of range for {kind}")]
    Range { kind: DataKind, value: String },

    /// The replacement string does not fit the buffer stored in the image.
    #[error("string of {needed} bytes does not fit stored capacity of {capacity}")]
    TooLarge { needed: usize, capacity: usize },

    #[error("no row for handle {handle}")]
    RowNotFound { handle: u64 },

    #[error("column index {index} out of range for {count} columns")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

impl FdbError {
    pub(crate) fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            what,
            reason: reason.into(),
        }
    }

    /// Returns true for errors that abort a load because the image itself is bad.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::UnknownDataKind { .. }
                | Self::Malformed { .. }
                | Self::ChecksumMismatch { .. }
                | Self::InvalidName { .. }
        )
    }

    /// Returns true if this is a "not found" error (table or row).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::RowNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_classification() {
        let err = FdbError::UnknownDataKind {
            what: "column",
            code: 9,
        };
        assert!(err.is_format_error());

        let err = FdbError::malformed("hash table", "bucket count 3 is not a power of two");
        assert!(err.is_format_error());
        assert_eq!(
            err.to_string(),
            "malformed hash table: bucket count 3 is not a power of two"
        );

        let err = FdbError::TooLarge {
            needed: 9,
            capacity: 4,
        };
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_not_found() {
        assert!(FdbError::RowNotFound { handle: 17 }.is_not_found());
        assert!(FdbError::TableNotFound("Objects".into()).is_not_found());
        assert!(!FdbError::Unsupported("process memory").is_not_found());
    }

    #[test]
    fn test_io_error_from_std() {
        let std_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: FdbError = std_err.into();
        assert!(matches!(err, FdbError::Io { .. }));
        assert!(!err.is_format_error());
    }
}
