//! Section map decoding for DWG files.
//!
//! A DWG file stores its data in sections, and every format generation keeps a
//! different directory that says where those sections live:
//!
//! - **R13 – R2000** (`AC1012` – `AC1015`): a flat table of
//!   `(number, address, size)` triples protected by a 16-bit CRC.
//! - **R2004 family** (`AC1018`, `AC1024`, `AC1027`, `AC1032`): a compressed
//!   array of `(number, size)` pairs; negative numbers carry tree-linkage
//!   metadata instead of a section.
//! - **R2007** (`AC1021`): a paged directory of hashed, named section entries,
//!   each with its own list of page descriptors.
//!
//! [`DwgSectionMapReader`] picks the right decoder for a [`DwgVersion`] and
//! returns a [`SectionMap`]. Every read is bounds-checked; malformed input
//! surfaces as a [`DwgError`].
//!
//! ```rust,no_run
//! use dwg_section_map::{DwgReaderConfiguration, DwgSectionMapReader};
//!
//! let bytes = std::fs::read("drawing.dwg").unwrap();
//! let file = DwgSectionMapReader::new()
//!     .read_file(&bytes, DwgReaderConfiguration::default())
//!     .unwrap();
//! println!("{} sections", file.section_map.len());
//! ```

pub mod error;
pub mod io;
pub mod notification;
pub mod types;

pub use error::{DwgError, Result};
pub use io::dwg::{
    Decompressor, DwgByteCursor, DwgReaderConfiguration, DwgSectionContext, DwgSectionMapFile,
    DwgSectionMapReader, SectionCatalog, SectionDirectory, SectionEntry, SectionMap,
    SectionMapLayout, SectionMapRequest, SectionPage, SectionRecord, SectionTreeLink,
    SystemPageReader,
};
pub use notification::{Notification, NotificationType};
pub use types::DwgVersion;
