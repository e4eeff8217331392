//! Flat section directory returned by the legacy and compressed readers.

use super::dwg_section_definition::DwgSectionDefinition;
use super::dwg_section_locator_record::SectionRecord;

/// Ordered records of a flat section map, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDirectory {
    records: Vec<SectionRecord>,
}

impl SectionDirectory {
    pub(crate) fn from_records(records: Vec<SectionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[SectionRecord] {
        &self.records
    }

    /// Earliest data record with the given number. Tree-linkage nodes are
    /// never returned.
    pub fn get_by_number(&self, number: i32) -> Option<&SectionRecord> {
        self.records
            .iter()
            .find(|record| record.is_data() && record.number == number)
    }

    /// Resolve a well-known section name such as
    /// [`DwgSectionDefinition::HEADER`] to its R13–R2000 locator record.
    pub fn get_by_name(&self, name: &str) -> Option<&SectionRecord> {
        DwgSectionDefinition::get_section_locator_by_name(name)
            .and_then(|number| self.get_by_number(number))
    }
}

impl<'a> IntoIterator for &'a SectionDirectory {
    type Item = &'a SectionRecord;
    type IntoIter = std::slice::Iter<'a, SectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
