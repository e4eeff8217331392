//! Catalog returned by the paged reader, with hashcode lookup.

use super::dwg_section_descriptor::SectionEntry;
use super::dwg_section_hash::DwgSectionHash;

/// Entries of a paged section map in the order they were encountered.
///
/// Hashcodes are not required to be unique; every lookup returns the
/// earliest match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionCatalog {
    entries: Vec<SectionEntry>,
}

impl SectionCatalog {
    pub(crate) fn from_entries(entries: Vec<SectionEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry in encounter order.
    pub fn head(&self) -> Option<&SectionEntry> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&SectionEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    /// Earliest entry whose hashcode equals `hashcode`.
    pub fn get_section(&self, hashcode: u64) -> Option<&SectionEntry> {
        self.entries.iter().find(|entry| entry.hashcode == hashcode)
    }

    pub fn get_section_by_hash(&self, hash: DwgSectionHash) -> Option<&SectionEntry> {
        self.get_section(hash.hashcode())
    }

    /// Earliest entry with the given decoded name.
    pub fn get_section_by_name(&self, name: &str) -> Option<&SectionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_deref() == Some(name))
    }
}

impl<'a> IntoIterator for &'a SectionCatalog {
    type Item = &'a SectionEntry;
    type IntoIter = std::slice::Iter<'a, SectionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hashcode: u64, data_size: u64, name: Option<&str>) -> SectionEntry {
        SectionEntry {
            hashcode,
            data_size,
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_section_earliest_wins() {
        let catalog = SectionCatalog::from_entries(vec![
            entry(5, 1, None),
            entry(7, 2, None),
            entry(5, 3, None),
        ]);
        assert_eq!(catalog.get_section(5).map(|e| e.data_size), Some(1));
        assert_eq!(catalog.get_section(7).map(|e| e.data_size), Some(2));
        assert!(catalog.get_section(9).is_none());
        assert_eq!(catalog.head().map(|e| e.data_size), Some(1));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = SectionCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.head().is_none());
        assert!(catalog.get_section(0).is_none());
    }

    #[test]
    fn test_lookup_by_hash_and_name() {
        let catalog = SectionCatalog::from_entries(vec![
            entry(0x3F54_045F, 1, Some("AcDb:Classes")),
            entry(0x32B8_03D9, 2, Some("AcDb:Header")),
        ]);
        assert_eq!(
            catalog
                .get_section_by_hash(DwgSectionHash::AcDbHeader)
                .map(|e| e.data_size),
            Some(2)
        );
        assert_eq!(
            catalog.get_section_by_name("AcDb:Classes").map(|e| e.data_size),
            Some(1)
        );
        assert!(catalog.get_section_by_name("AcDb:Preview").is_none());
        assert_eq!(catalog.iter().count(), 2);
    }
}
