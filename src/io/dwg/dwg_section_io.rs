//! Shared state and helpers for the section map readers.

use log::warn;

use crate::error::{DwgError, Result};
use crate::notification::{Notification, NotificationType};
use crate::types::DwgVersion;

use super::dwg_reader_configuration::DwgReaderConfiguration;
use super::dwg_stream_readers::DwgByteCursor;

/// Parse context for one document.
///
/// Readers take it by `&mut` so they can consult the configuration and record
/// non-fatal findings. A context belongs to a single parse; decoding several
/// documents in parallel means one context each.
#[derive(Debug, Clone)]
pub struct DwgSectionContext {
    /// The AutoCAD version being processed.
    pub version: DwgVersion,
    /// Reader configuration.
    pub configuration: DwgReaderConfiguration,
    /// Collected notifications.
    pub notifications: Vec<Notification>,
}

impl DwgSectionContext {
    /// Create a new context for the given version.
    pub fn new(version: DwgVersion, configuration: DwgReaderConfiguration) -> Self {
        Self {
            version,
            configuration,
            notifications: Vec::new(),
        }
    }

    /// Record a notification.
    pub fn notify(&mut self, message: impl Into<String>, notification_type: NotificationType) {
        self.notifications.push(Notification::new(notification_type, message));
    }

    /// Compare a stored checksum with the computed one.
    ///
    /// A mismatch is an [`DwgError::Integrity`] when `crc_check` is enabled,
    /// otherwise a logged warning notification.
    pub fn check_checksum(
        &mut self,
        reader: &'static str,
        offset: u64,
        stored: u32,
        computed: u32,
    ) -> Result<()> {
        if stored == computed {
            return Ok(());
        }

        let error = DwgError::Integrity {
            reader,
            offset,
            expected: stored,
            actual: computed,
        };

        if self.configuration.crc_check {
            return Err(error);
        }

        warn!("{}", error);
        self.notify(error.to_string(), NotificationType::Warning);
        Ok(())
    }

    /// Reject a size read from the file that is above `max_decompressed_size`.
    pub fn check_buffer_size(&self, reader: &'static str, requested: u64) -> Result<()> {
        let limit = self.configuration.max_decompressed_size;
        if requested > limit {
            return Err(DwgError::ResourceExhausted {
                reader,
                requested,
                limit,
            });
        }
        Ok(())
    }

    /// Reject a record count above `max_section_count`.
    pub fn check_section_count(&self, reader: &'static str, requested: u64) -> Result<()> {
        let limit = self.configuration.max_section_count;
        if requested > limit {
            return Err(DwgError::ResourceExhausted {
                reader,
                requested,
                limit,
            });
        }
        Ok(())
    }
}

/// Check whether two sentinel byte arrays are identical.
pub fn check_sentinel(actual: &[u8], expected: &[u8]) -> bool {
    actual.len() == expected.len() && actual.iter().zip(expected.iter()).all(|(a, b)| a == b)
}

/// Scan forward from the cursor for `sentinel`.
///
/// On a hit the cursor is left just past the sentinel and that position is
/// returned. On a miss the cursor does not move.
pub fn search_sentinel(cursor: &mut DwgByteCursor<'_>, sentinel: &[u8]) -> Option<u64> {
    if sentinel.is_empty() {
        return None;
    }

    let start = cursor.position();
    let haystack = cursor.remaining_slice();
    let found = haystack
        .windows(sentinel.len())
        .position(|window| check_sentinel(window, sentinel))?;

    let end = start + (found + sentinel.len()) as u64;
    cursor.set_position(end).ok()?;
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_sentinel_match() {
        assert!(check_sentinel(&[1, 2, 3, 4], &[1, 2, 3, 4]));
    }

    #[test]
    fn test_check_sentinel_mismatch() {
        assert!(!check_sentinel(&[1, 2, 3, 4], &[1, 2, 3, 5]));
    }

    #[test]
    fn test_check_sentinel_length_mismatch() {
        assert!(!check_sentinel(&[1, 2, 3], &[1, 2, 3, 4]));
    }

    #[test]
    fn test_search_sentinel_found() {
        let data = [0u8, 9, 9, 0xAA, 0xBB, 0xCC, 7];
        let mut cursor = DwgByteCursor::new(&data);
        cursor.set_position(1).unwrap();
        let end = search_sentinel(&mut cursor, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(end, Some(6));
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_search_sentinel_missing_keeps_position() {
        let data = [0u8, 1, 2, 3];
        let mut cursor = DwgByteCursor::new(&data);
        cursor.set_position(2).unwrap();
        assert_eq!(search_sentinel(&mut cursor, &[0xAA, 0xBB]), None);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_search_sentinel_ignores_bytes_behind_cursor() {
        let data = [0xAA, 0xBB, 0, 0];
        let mut cursor = DwgByteCursor::new(&data);
        cursor.set_position(1).unwrap();
        assert_eq!(search_sentinel(&mut cursor, &[0xAA, 0xBB]), None);
    }

    #[test]
    fn test_checksum_strict_and_lenient() {
        let mut strict = DwgSectionContext::new(DwgVersion::AC1015, DwgReaderConfiguration::default());
        assert!(strict.check_checksum("test", 0, 1, 1).is_ok());
        let err = strict.check_checksum("test", 4, 1, 2).unwrap_err();
        assert!(err.is_integrity());
        assert!(strict.notifications.is_empty());

        let mut lenient = DwgSectionContext::new(DwgVersion::AC1015, DwgReaderConfiguration::lenient());
        assert!(lenient.check_checksum("test", 4, 1, 2).is_ok());
        assert_eq!(lenient.notifications.len(), 1);
        assert_eq!(lenient.notifications[0].notification_type, NotificationType::Warning);
    }

    #[test]
    fn test_limits() {
        let mut cfg = DwgReaderConfiguration::default();
        cfg.max_decompressed_size = 16;
        cfg.max_section_count = 2;
        let ctx = DwgSectionContext::new(DwgVersion::AC1018, cfg);
        assert!(ctx.check_buffer_size("test", 16).is_ok());
        assert!(matches!(
            ctx.check_buffer_size("test", 17),
            Err(DwgError::ResourceExhausted { requested: 17, limit: 16, .. })
        ));
        assert!(ctx.check_section_count("test", 2).is_ok());
        assert!(ctx.check_section_count("test", 3).is_err());
    }
}
