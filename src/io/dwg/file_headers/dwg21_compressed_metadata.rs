//! Compressed metadata for AC21 (2007) DWG file headers.

use crate::error::Result;
use crate::io::dwg::dwg_stream_readers::DwgByteCursor;

/// Decoded size of the metadata block.
pub const AC21_METADATA_SIZE: usize = 0x110;

/// Metadata block stored in the compressed portion of AC21 file headers.
///
/// All fields are 64-bit unsigned integers; they are declared in on-disk
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dwg21CompressedMetadata {
    pub header_size: u64,
    pub file_size: u64,
    pub pages_map_crc_compressed: u64,
    pub pages_map_correction_factor: u64,
    pub pages_map_crc_seed: u64,
    pub map2_offset: u64,
    pub map2_id: u64,
    pub pages_map_offset: u64,
    pub pages_map_id: u64,
    pub header2_offset: u64,
    pub pages_map_size_compressed: u64,
    pub pages_map_size_uncompressed: u64,
    pub pages_amount: u64,
    pub pages_max_id: u64,
    pub unknown_0x20: u64,
    pub unknown_0x40: u64,
    pub pages_map_crc_uncompressed: u64,
    pub unknown_0xf800: u64,
    pub unknown_4: u64,
    pub unknown_1: u64,
    pub sections_amount: u64,
    pub sections_map_crc_uncompressed: u64,
    pub sections_map_size_compressed: u64,
    pub sections_map2_id: u64,
    pub sections_map_id: u64,
    pub sections_map_size_uncompressed: u64,
    pub sections_map_crc_compressed: u64,
    pub sections_map_correction_factor: u64,
    pub sections_map_crc_seed: u64,
    pub stream_version: u64,
    pub crc_seed: u64,
    pub crc_seed_encoded: u64,
    pub random_seed: u64,
    pub header_crc64: u64,
}

impl Default for Dwg21CompressedMetadata {
    fn default() -> Self {
        Self {
            header_size: 0x70,
            file_size: 0,
            pages_map_crc_compressed: 0,
            pages_map_correction_factor: 0,
            pages_map_crc_seed: 0,
            map2_offset: 0,
            map2_id: 0,
            pages_map_offset: 0,
            pages_map_id: 0,
            header2_offset: 0,
            pages_map_size_compressed: 0,
            pages_map_size_uncompressed: 0,
            pages_amount: 0,
            pages_max_id: 0,
            unknown_0x20: 32,
            unknown_0x40: 64,
            pages_map_crc_uncompressed: 0,
            unknown_0xf800: 0xF800,
            unknown_4: 4,
            unknown_1: 1,
            sections_amount: 0,
            sections_map_crc_uncompressed: 0,
            sections_map_size_compressed: 0,
            sections_map2_id: 0,
            sections_map_id: 0,
            sections_map_size_uncompressed: 0,
            sections_map_crc_compressed: 0,
            sections_map_correction_factor: 0,
            sections_map_crc_seed: 0,
            stream_version: 393472,
            crc_seed: 0,
            crc_seed_encoded: 0,
            random_seed: 0,
            header_crc64: 0,
        }
    }
}

impl Dwg21CompressedMetadata {
    /// Create a new metadata block with default constant values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the 34 fields from the cursor.
    pub fn read(cursor: &mut DwgByteCursor<'_>) -> Result<Self> {
        cursor.require(AC21_METADATA_SIZE as u64, "ac21 file header")?;
        Ok(Self {
            header_size: cursor.read_u64()?,
            file_size: cursor.read_u64()?,
            pages_map_crc_compressed: cursor.read_u64()?,
            pages_map_correction_factor: cursor.read_u64()?,
            pages_map_crc_seed: cursor.read_u64()?,
            map2_offset: cursor.read_u64()?,
            map2_id: cursor.read_u64()?,
            pages_map_offset: cursor.read_u64()?,
            pages_map_id: cursor.read_u64()?,
            header2_offset: cursor.read_u64()?,
            pages_map_size_compressed: cursor.read_u64()?,
            pages_map_size_uncompressed: cursor.read_u64()?,
            pages_amount: cursor.read_u64()?,
            pages_max_id: cursor.read_u64()?,
            unknown_0x20: cursor.read_u64()?,
            unknown_0x40: cursor.read_u64()?,
            pages_map_crc_uncompressed: cursor.read_u64()?,
            unknown_0xf800: cursor.read_u64()?,
            unknown_4: cursor.read_u64()?,
            unknown_1: cursor.read_u64()?,
            sections_amount: cursor.read_u64()?,
            sections_map_crc_uncompressed: cursor.read_u64()?,
            sections_map_size_compressed: cursor.read_u64()?,
            sections_map2_id: cursor.read_u64()?,
            sections_map_id: cursor.read_u64()?,
            sections_map_size_uncompressed: cursor.read_u64()?,
            sections_map_crc_compressed: cursor.read_u64()?,
            sections_map_correction_factor: cursor.read_u64()?,
            sections_map_crc_seed: cursor.read_u64()?,
            stream_version: cursor.read_u64()?,
            crc_seed: cursor.read_u64()?,
            crc_seed_encoded: cursor.read_u64()?,
            random_seed: cursor.read_u64()?,
            header_crc64: cursor.read_u64()?,
        })
    }

    /// Encode the fields in on-disk order.
    pub fn to_bytes(&self) -> Vec<u8> {
        [
            self.header_size,
            self.file_size,
            self.pages_map_crc_compressed,
            self.pages_map_correction_factor,
            self.pages_map_crc_seed,
            self.map2_offset,
            self.map2_id,
            self.pages_map_offset,
            self.pages_map_id,
            self.header2_offset,
            self.pages_map_size_compressed,
            self.pages_map_size_uncompressed,
            self.pages_amount,
            self.pages_max_id,
            self.unknown_0x20,
            self.unknown_0x40,
            self.pages_map_crc_uncompressed,
            self.unknown_0xf800,
            self.unknown_4,
            self.unknown_1,
            self.sections_amount,
            self.sections_map_crc_uncompressed,
            self.sections_map_size_compressed,
            self.sections_map2_id,
            self.sections_map_id,
            self.sections_map_size_uncompressed,
            self.sections_map_crc_compressed,
            self.sections_map_correction_factor,
            self.sections_map_crc_seed,
            self.stream_version,
            self.crc_seed,
            self.crc_seed_encoded,
            self.random_seed,
            self.header_crc64,
        ]
        .iter()
        .flat_map(|field| field.to_le_bytes())
        .collect()
    }
}
