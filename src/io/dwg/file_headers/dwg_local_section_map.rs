//! Page descriptor of a paged (R2007) section map entry.

/// Size of one page descriptor on disk: seven little-endian `u64`.
pub const SECTION_PAGE_SIZE: u64 = 56;

/// Describes one page of a section in an AC21 (2007) file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionPage {
    /// Offset of this page within the section data.
    pub offset: u64,
    /// Size of the page in the file.
    pub size: u64,
    /// Page id in the pages map.
    pub id: u64,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub checksum: u64,
    pub crc: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let page = SectionPage::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.id, 0);
        assert_eq!(page.crc, 0);
    }
}
