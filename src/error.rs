//! Error types for section map decoding.

use thiserror::Error;

/// The error type for every fallible operation in this crate.
///
/// The structured variants carry the name of the reader that failed and the
/// byte offset it was looking at, so a malformed file can be diagnosed from the
/// message alone.
#[derive(Debug, Error)]
pub enum DwgError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored checksum does not match the one computed over the data.
    #[error(
        "{reader}: checksum mismatch at offset {offset:#x}: stored {expected:#x}, computed {actual:#x}"
    )]
    Integrity {
        reader: &'static str,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// Fewer bytes remain than the next record, header or page requires.
    #[error(
        "{reader}: truncated input at offset {offset:#x}: {needed} bytes needed, {available} available"
    )]
    TruncatedInput {
        reader: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// A size or count read from the file exceeds the configured limit, or the
    /// allocation for it failed.
    #[error("{reader}: cannot allocate {requested} (limit {limit})")]
    ResourceExhausted {
        reader: &'static str,
        requested: u64,
        limit: u64,
    },

    /// A field combination this crate does not decode.
    #[error("{reader}: unsupported layout at offset {offset:#x}: {message}")]
    UnsupportedLayout {
        reader: &'static str,
        offset: u64,
        message: String,
    },

    /// A compressed stream could not be expanded.
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// The file header is malformed.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The file carries a version magic this crate does not handle.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),
}

impl DwgError {
    pub(crate) fn truncated(reader: &'static str, offset: u64, needed: u64, available: u64) -> Self {
        DwgError::TruncatedInput {
            reader,
            offset,
            needed,
            available,
        }
    }

    pub(crate) fn unsupported(reader: &'static str, offset: u64, message: impl Into<String>) -> Self {
        DwgError::UnsupportedLayout {
            reader,
            offset,
            message: message.into(),
        }
    }

    /// Returns `true` for checksum mismatches.
    pub fn is_integrity(&self) -> bool {
        matches!(self, DwgError::Integrity { .. })
    }

    /// Returns `true` when the input ended before a complete record.
    pub fn is_truncated(&self) -> bool {
        matches!(self, DwgError::TruncatedInput { .. })
    }
}

/// A convenience `Result` type alias using [`DwgError`].
pub type Result<T> = std::result::Result<T, DwgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_message_names_reader_and_offset() {
        let err = DwgError::truncated("legacy section map", 0x15, 9, 4);
        let msg = err.to_string();
        assert!(msg.contains("legacy section map"));
        assert!(msg.contains("0x15"));
        assert!(err.is_truncated());
        assert!(!err.is_integrity());
    }

    #[test]
    fn test_integrity_message() {
        let err = DwgError::Integrity {
            reader: "compressed section map",
            offset: 0x40,
            expected: 0xBEEF,
            actual: 0xCAFE,
        };
        assert!(err.is_integrity());
        assert!(err.to_string().contains("0xbeef"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: DwgError = io.into();
        assert!(matches!(err, DwgError::Io(_)));
    }
}
