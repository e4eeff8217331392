//! One record of a flat section directory.

use std::fmt;

/// Tree-linkage fields carried by a compressed-map record with a negative
/// number. They are passed through as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionTreeLink {
    pub parent: i32,
    pub left: i32,
    pub right: i32,
    pub reserved: i32,
}

/// A record describing the location and size of a section in the DWG file.
///
/// Produced by both the R13–R2000 locator table and the R2004 page map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    /// Record number. Negative numbers mark tree-linkage nodes.
    pub number: i32,
    /// Byte offset of the section. Always `0` for tree-linkage nodes.
    pub address: u64,
    /// Size in bytes, as stored.
    pub size: u64,
    /// Present exactly when `number` is negative and the record came from a
    /// compressed map.
    pub linkage: Option<SectionTreeLink>,
}

impl SectionRecord {
    /// A record that addresses data.
    pub fn new(number: i32, address: u64, size: u64) -> Self {
        Self {
            number,
            address,
            size,
            linkage: None,
        }
    }

    /// A tree-linkage node.
    pub fn tree_node(number: i32, size: u64, linkage: SectionTreeLink) -> Self {
        Self {
            number,
            address: 0,
            size,
            linkage: Some(linkage),
        }
    }

    /// `false` for tree-linkage nodes.
    pub fn is_data(&self) -> bool {
        self.linkage.is_none()
    }

    /// Check if a file position falls within this record.
    pub fn contains(&self, position: u64) -> bool {
        self.is_data()
            && position >= self.address
            && position - self.address < self.size
    }
}

impl fmt::Display for SectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.linkage {
            None => write!(
                f,
                "Number : {} | Address : {:#x} | Size : {}",
                self.number, self.address, self.size
            ),
            Some(link) => write!(
                f,
                "Number : {} | Size : {} | Parent : {} | Left : {} | Right : {}",
                self.number, self.size, link.parent, link.left, link.right
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_record() {
        let rec = SectionRecord::new(1, 0x100, 50);
        assert!(rec.is_data());
        assert!(!rec.contains(0xFF));
        assert!(rec.contains(0x100));
        assert!(rec.contains(0x131));
        assert!(!rec.contains(0x132));
    }

    #[test]
    fn test_tree_node() {
        let link = SectionTreeLink {
            parent: 7,
            left: 2,
            right: 3,
            reserved: 0,
        };
        let rec = SectionRecord::tree_node(-1, 0x40, link);
        assert!(!rec.is_data());
        assert_eq!(rec.address, 0);
        assert_eq!(rec.size, 0x40);
        assert!(!rec.contains(0));
        assert_eq!(rec.linkage, Some(link));
    }

    #[test]
    fn test_display() {
        let s = SectionRecord::new(2, 0x1F4, 100).to_string();
        assert!(s.contains("0x1f4"));
        assert!(s.contains("100"));

        let s = SectionRecord::tree_node(-3, 8, SectionTreeLink::default()).to_string();
        assert!(s.contains("Parent : 0"));
    }
}
