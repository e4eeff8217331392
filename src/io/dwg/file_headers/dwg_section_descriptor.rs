//! Entry of a paged (R2007) section map.

use super::dwg_local_section_map::SectionPage;
use super::dwg_section_hash::DwgSectionHash;

/// Size of one entry header on disk: eight little-endian `u64`.
pub const SECTION_ENTRY_HEADER_SIZE: u64 = 64;

/// A named section of an AC21 file with its page list.
///
/// The flag fields are kept as stored; nothing here interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionEntry {
    pub data_size: u64,
    pub max_size: u64,
    pub encrypted: u64,
    /// Identity key used by [`SectionCatalog::get_section`](super::SectionCatalog::get_section).
    pub hashcode: u64,
    /// Byte length of the UTF-16LE name that follows the header.
    pub name_length: u64,
    pub unknown: u64,
    pub encoding: u64,
    pub num_pages: u64,
    /// `None` when the header was the last thing in the map.
    pub name: Option<String>,
    pub pages: Vec<SectionPage>,
}

impl SectionEntry {
    /// The well-known section this hashcode belongs to, if any.
    pub fn known_hash(&self) -> Option<DwgSectionHash> {
        DwgSectionHash::from_hashcode(self.hashcode)
    }

    /// Sum of the uncompressed sizes of all pages.
    pub fn total_uncompressed_size(&self) -> u64 {
        self.pages
            .iter()
            .fold(0u64, |total, page| total.saturating_add(page.uncompressed_size))
    }
}
