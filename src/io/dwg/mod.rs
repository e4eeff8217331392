//! DWG section map support.

pub mod crc;
pub mod dwg_checksum_calculator;
pub mod dwg_reader_configuration;
pub mod dwg_section_io;
pub mod dwg_section_map_reader;
pub mod dwg_stream_readers;
pub mod file_headers;

pub use dwg_reader_configuration::DwgReaderConfiguration;
pub use dwg_section_io::DwgSectionContext;
pub use dwg_section_map_reader::{
    Ac21PageMapEntry, DwgSectionMapFile, DwgSectionMapReader, SectionMap, SectionMapLayout,
    SectionMapRequest,
};

pub use dwg_stream_readers::{
    Decompressor, DwgByteCursor, DwgCompressedSectionMapReader, DwgLegacySectionMapReader,
    DwgLz77Ac18Decompressor, DwgLz77Ac21Decompressor, DwgPagedSectionMapReader,
    DwgSystemPageReader, StoredDecompressor, SystemPageReader,
};

pub use file_headers::{
    Dwg21CompressedMetadata, DwgFileHeaderAC18, DwgSectionDefinition, DwgSectionHash,
    DwgSystemPageHeader, SectionCatalog, SectionDirectory, SectionEntry, SectionPage,
    SectionRecord, SectionTreeLink, AC15_END_SENTINEL,
};
