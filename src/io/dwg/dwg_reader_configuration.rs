//! Configuration for reading DWG section maps.

/// Default cap on a decompressed section map buffer (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: u64 = 64 * 1024 * 1024;

/// Default cap on the number of records or entries in one section map.
pub const DEFAULT_MAX_SECTION_COUNT: u64 = 1 << 20;

/// Configuration options for the section map readers.
#[derive(Debug, Clone)]
pub struct DwgReaderConfiguration {
    /// Treat a checksum mismatch in the legacy and compressed section maps as
    /// an error. Default: `true`.
    ///
    /// When `false` the decoded map is returned anyway; the mismatch is logged
    /// and recorded as a warning notification on the context.
    pub crc_check: bool,

    /// Largest decompressed buffer a reader will request. Sizes are read from
    /// the file, so anything above this is reported as
    /// [`DwgError::ResourceExhausted`](crate::DwgError::ResourceExhausted).
    /// Default: 64 MiB.
    pub max_decompressed_size: u64,

    /// Largest record or entry count a reader will accept for one map.
    /// Default: 1 048 576.
    pub max_section_count: u64,
}

impl Default for DwgReaderConfiguration {
    fn default() -> Self {
        Self {
            crc_check: true,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            max_section_count: DEFAULT_MAX_SECTION_COUNT,
        }
    }
}

impl DwgReaderConfiguration {
    /// Configuration that reports checksum mismatches as notifications only.
    pub fn lenient() -> Self {
        Self {
            crc_check: false,
            ..Default::default()
        }
    }
}
