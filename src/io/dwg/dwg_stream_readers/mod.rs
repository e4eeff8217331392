//! Byte-level readers: the cursor, the decompressors and the three section
//! map decoders.

mod decompressor;
mod dwg_byte_cursor;
mod dwg_compressed_section_map_reader;
mod dwg_legacy_section_map_reader;
mod dwg_lz77_ac18_decompressor;
mod dwg_lz77_ac21_decompressor;
mod dwg_paged_section_map_reader;
mod dwg_system_page_reader;

pub use decompressor::{Decompressor, StoredDecompressor, SystemPageReader};
pub use dwg_byte_cursor::DwgByteCursor;
pub use dwg_compressed_section_map_reader::{DwgCompressedSectionMapReader, FIRST_PAGE_ADDRESS};
pub use dwg_legacy_section_map_reader::{DwgLegacySectionMapReader, AC15_CRC_SEED};
pub use dwg_lz77_ac18_decompressor::DwgLz77Ac18Decompressor;
pub use dwg_lz77_ac21_decompressor::DwgLz77Ac21Decompressor;
pub use dwg_paged_section_map_reader::DwgPagedSectionMapReader;
pub use dwg_system_page_reader::{
    reed_solomon_deinterleave, DwgSystemPageReader, SystemPageGeometry, RS_BLOCK_SIZE, RS_DATA_SIZE,
};
