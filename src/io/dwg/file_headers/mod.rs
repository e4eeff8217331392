//! Section map structures and the file header blocks that point at them.
//!
//! - [`SectionRecord`] / [`SectionDirectory`]: flat maps (R13–R2000, R2004)
//! - [`SectionEntry`] / [`SectionPage`] / [`SectionCatalog`]: paged maps (R2007)
//! - [`DwgSectionDefinition`]: well-known section names and the header sentinel
//! - [`DwgSectionHash`]: R2007 section hash identifiers
//! - [`DwgFileHeaderAC18`] / [`DwgSystemPageHeader`]: R2004 header and page header
//! - [`Dwg21CompressedMetadata`]: R2007 compressed metadata block

mod dwg21_compressed_metadata;
mod dwg_file_header;
mod dwg_local_section_map;
mod dwg_section_catalog;
mod dwg_section_definition;
mod dwg_section_descriptor;
mod dwg_section_directory;
mod dwg_section_hash;
mod dwg_section_locator_record;

pub use dwg21_compressed_metadata::{Dwg21CompressedMetadata, AC21_METADATA_SIZE};
pub use dwg_file_header::{
    DwgFileHeaderAC18, DwgSystemPageHeader, AC18_FILE_ID, AC18_HEADER_OFFSET, AC18_HEADER_SIZE,
    SYSTEM_PAGE_MAP_TYPE, SYSTEM_SECTION_MAP_TYPE,
};
pub use dwg_local_section_map::{SectionPage, SECTION_PAGE_SIZE};
pub use dwg_section_catalog::SectionCatalog;
pub use dwg_section_definition::{DwgSectionDefinition, AC15_END_SENTINEL};
pub use dwg_section_descriptor::{SectionEntry, SECTION_ENTRY_HEADER_SIZE};
pub use dwg_section_directory::SectionDirectory;
pub use dwg_section_hash::DwgSectionHash;
pub use dwg_section_locator_record::{SectionRecord, SectionTreeLink};
