//! R2004 file header and system page header.
//!
//! The R2004 layout (also used by AC1024, AC1027 and AC1032) keeps an
//! encrypted 0x6C-byte block at offset 0x80 that points at the page map.
//! Every system page in the file starts with a 20-byte header.

use log::trace;

use crate::error::{DwgError, Result};
use crate::io::dwg::dwg_checksum_calculator::{apply_magic_sequence, calculate};
use crate::io::dwg::dwg_stream_readers::DwgByteCursor;

/// Offset of the encrypted header block.
pub const AC18_HEADER_OFFSET: u64 = 0x80;

/// Size of the encrypted header block.
pub const AC18_HEADER_SIZE: usize = 0x6C;

/// File id at the start of the decrypted header.
pub const AC18_FILE_ID: &[u8; 12] = b"AcFssFcAJMB\0";

/// Page type of the page map system page.
pub const SYSTEM_PAGE_MAP_TYPE: i32 = 0x4163_0E3B;

/// Page type of the section map system page.
pub const SYSTEM_SECTION_MAP_TYPE: i32 = 0x4163_003B;

/// Decrypted R2004 file header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DwgFileHeaderAC18 {
    /// Root tree node gap.
    pub root_tree_node_gap: i32,
    /// Lowermost left tree node gap.
    pub left_gap: i32,
    /// Lowermost right tree node gap.
    pub right_gap: i32,
    /// Last page id.
    pub last_page_id: i32,
    /// Last section address.
    pub last_section_addr: u64,
    /// Second header address.
    pub second_header_addr: u64,
    /// Number of gaps.
    pub gap_amount: u32,
    /// Number of sections.
    pub section_amount: u32,
    /// Section page map id.
    pub section_page_map_id: u32,
    /// Page map address, relative to 0x100.
    pub page_map_address: u64,
    /// Section map id.
    pub section_map_id: u32,
    /// Section array page size.
    pub section_array_page_size: u32,
    /// Gap array size.
    pub gap_array_size: u32,
    /// CRC32 of the decrypted block.
    pub crc32: u32,
}

impl DwgFileHeaderAC18 {
    /// Decrypt and parse the header block of a whole R2004 file.
    pub fn read(file: &[u8]) -> Result<Self> {
        let cursor = DwgByteCursor::new(file);
        let encrypted = cursor.slice(AC18_HEADER_OFFSET, AC18_HEADER_OFFSET + AC18_HEADER_SIZE as u64)?;

        let mut decrypted = encrypted.to_vec();
        apply_magic_sequence(&mut decrypted);
        Self::parse(&decrypted)
    }

    /// Parse an already decrypted header block.
    pub fn parse(decrypted: &[u8]) -> Result<Self> {
        let mut cursor = DwgByteCursor::new(decrypted);
        cursor.require(AC18_HEADER_SIZE as u64, "ac18 file header")?;

        let file_id = cursor.read_bytes(AC18_FILE_ID.len())?;
        if file_id != AC18_FILE_ID {
            return Err(DwgError::InvalidHeader(format!(
                "unexpected R2004 file id {:02X?}",
                file_id
            )));
        }

        cursor.set_position(0x18)?;
        let root_tree_node_gap = cursor.read_i32()?;
        let left_gap = cursor.read_i32()?;
        let right_gap = cursor.read_i32()?;
        let _unknown = cursor.read_i32()?;
        let last_page_id = cursor.read_i32()?;
        let last_section_addr = cursor.read_u64()?;
        let second_header_addr = cursor.read_u64()?;
        let gap_amount = cursor.read_u32()?;
        let section_amount = cursor.read_u32()?;

        cursor.set_position(0x50)?;
        let header = Self {
            root_tree_node_gap,
            left_gap,
            right_gap,
            last_page_id,
            last_section_addr,
            second_header_addr,
            gap_amount,
            section_amount,
            section_page_map_id: cursor.read_u32()?,
            page_map_address: cursor.read_u64()?,
            section_map_id: cursor.read_u32()?,
            section_array_page_size: cursor.read_u32()?,
            gap_array_size: cursor.read_u32()?,
            crc32: cursor.read_u32()?,
        };

        trace!(
            "ac18 header: page map id {} at {:#x}, section map id {}, {} sections",
            header.section_page_map_id,
            header.page_map_offset(),
            header.section_map_id,
            header.section_amount
        );

        Ok(header)
    }

    /// Absolute file offset of the page map system page.
    pub fn page_map_offset(&self) -> u64 {
        self.page_map_address.saturating_add(0x100)
    }

    /// Encode the header block, not yet encrypted.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(AC18_HEADER_SIZE);
        out.extend_from_slice(AC18_FILE_ID);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0x6Cu32.to_le_bytes());
        out.extend_from_slice(&0x04u32.to_le_bytes());
        out.extend_from_slice(&self.root_tree_node_gap.to_le_bytes());
        out.extend_from_slice(&self.left_gap.to_le_bytes());
        out.extend_from_slice(&self.right_gap.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&self.last_page_id.to_le_bytes());
        out.extend_from_slice(&self.last_section_addr.to_le_bytes());
        out.extend_from_slice(&self.second_header_addr.to_le_bytes());
        out.extend_from_slice(&self.gap_amount.to_le_bytes());
        out.extend_from_slice(&self.section_amount.to_le_bytes());
        out.extend_from_slice(&0x20u32.to_le_bytes());
        out.extend_from_slice(&0x80u32.to_le_bytes());
        out.extend_from_slice(&0x40u32.to_le_bytes());
        out.extend_from_slice(&self.section_page_map_id.to_le_bytes());
        out.extend_from_slice(&self.page_map_address.to_le_bytes());
        out.extend_from_slice(&self.section_map_id.to_le_bytes());
        out.extend_from_slice(&self.section_array_page_size.to_le_bytes());
        out.extend_from_slice(&self.gap_array_size.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out
    }
}

/// Header in front of every R2004 system page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DwgSystemPageHeader {
    pub page_type: i32,
    pub decompressed_size: i32,
    pub compressed_size: i32,
    /// 2 = LZ77, 1 = stored.
    pub compression_type: i32,
    pub checksum: i32,
}

impl DwgSystemPageHeader {
    /// Size on disk.
    pub const SIZE: u64 = 20;

    pub fn read(cursor: &mut DwgByteCursor<'_>) -> Result<Self> {
        cursor.require(Self::SIZE, "system page header")?;
        Ok(Self {
            page_type: cursor.read_i32()?,
            decompressed_size: cursor.read_i32()?,
            compressed_size: cursor.read_i32()?,
            compression_type: cursor.read_i32()?,
            checksum: cursor.read_i32()?,
        })
    }

    /// Encode the header with the given checksum field.
    pub fn to_bytes_with_checksum(&self, checksum: i32) -> [u8; 20] {
        let mut out = [0u8; 20];
        out[0..4].copy_from_slice(&self.page_type.to_le_bytes());
        out[4..8].copy_from_slice(&self.decompressed_size.to_le_bytes());
        out[8..12].copy_from_slice(&self.compressed_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.compression_type.to_le_bytes());
        out[16..20].copy_from_slice(&checksum.to_le_bytes());
        out
    }

    /// Checksum of a page: the header with a zero checksum field, continued
    /// over the compressed bytes.
    pub fn compute_checksum(&self, compressed: &[u8]) -> u32 {
        let header = self.to_bytes_with_checksum(0);
        let seed = calculate(0, &header, 0, header.len());
        calculate(seed, compressed, 0, compressed.len())
    }
}
