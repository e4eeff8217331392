//! Version dispatch and whole-file entry points.

use log::{debug, info, trace};

use crate::error::{DwgError, Result};
use crate::notification::Notification;
use crate::types::DwgVersion;

use super::dwg_reader_configuration::DwgReaderConfiguration;
use super::dwg_section_io::DwgSectionContext;
use super::dwg_stream_readers::{
    reed_solomon_deinterleave, Decompressor, DwgByteCursor, DwgCompressedSectionMapReader,
    DwgLegacySectionMapReader, DwgLz77Ac18Decompressor, DwgLz77Ac21Decompressor,
    DwgPagedSectionMapReader, DwgSystemPageReader, StoredDecompressor, SystemPageReader,
    RS_DATA_SIZE,
};
use super::file_headers::{
    Dwg21CompressedMetadata, DwgFileHeaderAC18, DwgSystemPageHeader, SectionCatalog,
    SectionDirectory, AC21_METADATA_SIZE, SYSTEM_PAGE_MAP_TYPE, SYSTEM_SECTION_MAP_TYPE,
};

const READER: &str = "section map reader";

/// File offset of the R13–R2000 section locator count.
pub const AC15_LOCATOR_OFFSET: u64 = 0x15;

/// File offset of the Reed-Solomon encoded R2007 file header.
pub const AC21_HEADER_OFFSET: u64 = 0x80;

/// Encoded size of the R2007 file header.
pub const AC21_HEADER_SIZE: u64 = 0x400;

/// R2007 page offsets are relative to this position.
pub const AC21_PAGES_BASE: u64 = 0x480;

/// On-disk layout of a section map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionMapLayout {
    /// R13–R2000 flat triple table.
    Legacy,
    /// R2004-family compressed page map.
    Compressed,
    /// R2007 paged sections map.
    Paged,
}

/// Size parameters for one section map read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMapRequest {
    Legacy,
    Compressed {
        compressed_size: u64,
        decompressed_size: u64,
    },
    Paged {
        compressed_size: u64,
        decompressed_size: u64,
        correction: u64,
    },
}

impl SectionMapRequest {
    pub fn layout(&self) -> SectionMapLayout {
        match self {
            SectionMapRequest::Legacy => SectionMapLayout::Legacy,
            SectionMapRequest::Compressed { .. } => SectionMapLayout::Compressed,
            SectionMapRequest::Paged { .. } => SectionMapLayout::Paged,
        }
    }

    /// Request for the sections map described by an R2007 file header.
    pub fn from_ac21_metadata(metadata: &Dwg21CompressedMetadata) -> Self {
        SectionMapRequest::Paged {
            compressed_size: metadata.sections_map_size_compressed,
            decompressed_size: metadata.sections_map_size_uncompressed,
            correction: metadata.sections_map_correction_factor,
        }
    }
}

/// A decoded section map in either shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionMap {
    /// Legacy and compressed maps.
    Flat(SectionDirectory),
    /// Paged maps.
    Paged(SectionCatalog),
}

impl SectionMap {
    /// Number of records or entries.
    pub fn len(&self) -> usize {
        match self {
            SectionMap::Flat(directory) => directory.len(),
            SectionMap::Paged(catalog) => catalog.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_directory(&self) -> Option<&SectionDirectory> {
        match self {
            SectionMap::Flat(directory) => Some(directory),
            SectionMap::Paged(_) => None,
        }
    }

    pub fn as_catalog(&self) -> Option<&SectionCatalog> {
        match self {
            SectionMap::Flat(_) => None,
            SectionMap::Paged(catalog) => Some(catalog),
        }
    }
}

/// Result of [`DwgSectionMapReader::read_file`].
#[derive(Debug, Clone)]
pub struct DwgSectionMapFile {
    pub version: DwgVersion,
    pub section_map: SectionMap,
    /// Non-fatal findings, such as checksum mismatches in lenient mode.
    pub notifications: Vec<Notification>,
}

/// One row of the R2007 pages map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ac21PageMapEntry {
    pub id: i64,
    pub size: i64,
    /// Absolute file offset.
    pub offset: u64,
}

/// Picks the section map decoder for a DWG version.
///
/// The LZ77 codec used for R2004 page maps and the R2007 system page reader
/// can be replaced.
pub struct DwgSectionMapReader {
    decompressor: Box<dyn Decompressor + Send + Sync>,
    page_reader: Box<dyn SystemPageReader + Send + Sync>,
}

impl Default for DwgSectionMapReader {
    fn default() -> Self {
        Self {
            decompressor: Box::new(DwgLz77Ac18Decompressor),
            page_reader: Box::new(DwgSystemPageReader),
        }
    }
}

impl std::fmt::Debug for DwgSectionMapReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DwgSectionMapReader").finish_non_exhaustive()
    }
}

impl DwgSectionMapReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the decompressor used for compressed maps.
    pub fn with_decompressor(mut self, decompressor: impl Decompressor + Send + Sync + 'static) -> Self {
        self.decompressor = Box::new(decompressor);
        self
    }

    /// Replace the reader used for R2007 system pages.
    pub fn with_system_page_reader(
        mut self,
        page_reader: impl SystemPageReader + Send + Sync + 'static,
    ) -> Self {
        self.page_reader = Box::new(page_reader);
        self
    }

    /// Decode the section map at the cursor with the reader for `version`.
    pub fn read(
        &self,
        version: DwgVersion,
        cursor: &mut DwgByteCursor<'_>,
        request: SectionMapRequest,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionMap> {
        let layout = version
            .section_map_layout()
            .ok_or_else(|| DwgError::UnsupportedVersion(version.to_string()))?;
        if layout != request.layout() {
            return Err(DwgError::unsupported(
                READER,
                cursor.position(),
                format!("{version} stores a {layout:?} map, {:?} requested", request.layout()),
            ));
        }

        debug!("{READER}: {version} {layout:?} map at {:#x}", cursor.position());
        match request {
            SectionMapRequest::Legacy => {
                DwgLegacySectionMapReader::read(cursor, ctx).map(SectionMap::Flat)
            }
            SectionMapRequest::Compressed {
                compressed_size,
                decompressed_size,
            } => DwgCompressedSectionMapReader::read(
                cursor,
                compressed_size,
                decompressed_size,
                self.decompressor.as_ref(),
                ctx,
            )
            .map(SectionMap::Flat),
            SectionMapRequest::Paged {
                compressed_size,
                decompressed_size,
                correction,
            } => DwgPagedSectionMapReader::read(
                cursor,
                compressed_size,
                decompressed_size,
                correction,
                self.page_reader.as_ref(),
                ctx,
            )
            .map(SectionMap::Paged),
        }
    }

    /// Version named by the six-byte magic at the start of a file.
    pub fn detect_version(bytes: &[u8]) -> Result<DwgVersion> {
        let magic = DwgByteCursor::new(bytes).slice(0, 6)?;
        if &magic[0..2] != b"AC" {
            return Err(DwgError::InvalidHeader(
                "Not a valid DWG file (missing AC magic)".into(),
            ));
        }

        DwgVersion::from_magic(magic)
            .ok_or_else(|| DwgError::UnsupportedVersion(String::from_utf8_lossy(magic).into_owned()))
    }

    /// Read the section locator table of a whole R13–R2000 file. The header
    /// CRC covers the file from its first byte.
    pub fn read_ac15_file(&self, bytes: &[u8], ctx: &mut DwgSectionContext) -> Result<SectionDirectory> {
        let version = Self::detect_version(bytes)?;
        if version.section_map_layout() != Some(SectionMapLayout::Legacy) {
            return Err(DwgError::unsupported(
                READER,
                0,
                format!("{version} has no section locator table"),
            ));
        }

        let mut cursor = DwgByteCursor::new(bytes);
        cursor.set_position(AC15_LOCATOR_OFFSET)?;
        DwgLegacySectionMapReader::read_with_checksum_origin(&mut cursor, 0, ctx)
    }

    /// Read the R2004 page map stored as a system page at the cursor.
    pub fn read_ac18_page_map(
        &self,
        cursor: &mut DwgByteCursor<'_>,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionDirectory> {
        let header_offset = cursor.position();
        let header = DwgSystemPageHeader::read(cursor)?;
        trace!(
            "{READER}: system page type {:#x} comp {} uncomp {} compression {}",
            header.page_type,
            header.compressed_size,
            header.decompressed_size,
            header.compression_type
        );

        if header.page_type == SYSTEM_SECTION_MAP_TYPE {
            return Err(DwgError::unsupported(
                READER,
                header_offset,
                "found the data section map where the page map was expected",
            ));
        }
        if header.page_type != SYSTEM_PAGE_MAP_TYPE {
            return Err(DwgError::unsupported(
                READER,
                header_offset,
                format!("page type {:#x} is not a page map", header.page_type),
            ));
        }

        let stored = StoredDecompressor;
        let decompressor: &dyn Decompressor = match header.compression_type {
            2 => self.decompressor.as_ref(),
            1 => &stored,
            other => {
                return Err(DwgError::unsupported(
                    READER,
                    header_offset,
                    format!("compression type {other}"),
                ))
            }
        };

        DwgCompressedSectionMapReader::read_system_page(cursor, &header, decompressor, ctx)
    }

    /// Read the R2007 file header: Reed-Solomon de-interleave, then the
    /// metadata block, LZ77 compressed when its stored length is positive.
    pub fn read_ac21_metadata(bytes: &[u8]) -> Result<Dwg21CompressedMetadata> {
        let cursor = DwgByteCursor::new(bytes);
        let encoded = cursor.slice(AC21_HEADER_OFFSET, AC21_HEADER_OFFSET + AC21_HEADER_SIZE)?;
        let decoded = reed_solomon_deinterleave(encoded, 3, RS_DATA_SIZE)?;

        let mut prefix = DwgByteCursor::new(&decoded);
        let _crc = prefix.read_u64()?;
        let _key = prefix.read_u64()?;
        let _compressed_crc = prefix.read_u64()?;
        let compressed_length = prefix.read_i32()?;
        let _length2 = prefix.read_i32()?;
        trace!("ac21 file header: compressed length {}", compressed_length);

        let metadata = if compressed_length > 0 {
            let compressed = prefix.read_bytes(compressed_length as usize)?;
            DwgLz77Ac21Decompressor.decompress(compressed, AC21_METADATA_SIZE)?
        } else {
            prefix.read_bytes(AC21_METADATA_SIZE)?.to_vec()
        };

        Dwg21CompressedMetadata::read(&mut DwgByteCursor::new(&metadata))
    }

    /// Read the R2007 pages map: `(size, id)` pairs of `i64`, with pages laid
    /// out back to back from 0x480.
    pub fn read_ac21_pages_map(
        &self,
        bytes: &[u8],
        metadata: &Dwg21CompressedMetadata,
        ctx: &mut DwgSectionContext,
    ) -> Result<Vec<Ac21PageMapEntry>> {
        const PAGES_MAP: &str = "ac21 pages map";

        let start = AC21_PAGES_BASE
            .checked_add(metadata.pages_map_offset)
            .ok_or_else(|| DwgError::unsupported(PAGES_MAP, 0, "pages map offset overflows"))?;
        let mut cursor = DwgByteCursor::new(bytes);
        cursor.set_position(start)?;

        ctx.check_buffer_size(PAGES_MAP, metadata.pages_map_size_uncompressed)?;
        let data = self.page_reader.read_system_page(
            &mut cursor,
            metadata.pages_map_size_compressed,
            metadata.pages_map_size_uncompressed,
            metadata.pages_map_correction_factor,
        )?;

        let mut map = DwgByteCursor::new(&data);
        let mut offset = AC21_PAGES_BASE;
        let mut pages = Vec::new();
        while map.remaining() >= 16 {
            let entry_offset = map.position();
            let size = map.read_i64()?;
            let id = map.read_i64()?;
            trace!("{PAGES_MAP}: page {} size {:#x} at {:#x}", id, size, offset);
            pages.push(Ac21PageMapEntry { id, size, offset });
            ctx.check_section_count(PAGES_MAP, pages.len() as u64)?;

            offset = u64::try_from(size)
                .ok()
                .and_then(|size| offset.checked_add(size))
                .ok_or_else(|| {
                    DwgError::unsupported(PAGES_MAP, entry_offset, format!("page size {size}"))
                })?;
        }

        Ok(pages)
    }

    /// Read the sections map of a whole R2007 file.
    pub fn read_ac21_sections_map(&self, bytes: &[u8], ctx: &mut DwgSectionContext) -> Result<SectionCatalog> {
        let metadata = Self::read_ac21_metadata(bytes)?;
        let pages = self.read_ac21_pages_map(bytes, &metadata, ctx)?;

        let sections_map_id = metadata.sections_map_id as i64;
        let page = pages
            .iter()
            .find(|page| page.id == sections_map_id)
            .ok_or_else(|| {
                DwgError::InvalidHeader(format!(
                    "sections map page {} is not in the pages map",
                    sections_map_id
                ))
            })?;

        let mut cursor = DwgByteCursor::new(bytes);
        cursor.set_position(page.offset)?;
        match self.read(
            DwgVersion::AC1021,
            &mut cursor,
            SectionMapRequest::from_ac21_metadata(&metadata),
            ctx,
        )? {
            SectionMap::Paged(catalog) => Ok(catalog),
            SectionMap::Flat(_) => Err(DwgError::unsupported(READER, page.offset, "flat map for AC1021")),
        }
    }

    /// Detect the version of a whole file and decode its section map.
    pub fn read_file(&self, bytes: &[u8], configuration: DwgReaderConfiguration) -> Result<DwgSectionMapFile> {
        let version = Self::detect_version(bytes)?;
        let mut ctx = DwgSectionContext::new(version, configuration);
        info!("reading {} section map", version);

        let section_map = match version.section_map_layout() {
            Some(SectionMapLayout::Legacy) => SectionMap::Flat(self.read_ac15_file(bytes, &mut ctx)?),
            Some(SectionMapLayout::Compressed) => {
                let header = DwgFileHeaderAC18::read(bytes)?;
                let mut cursor = DwgByteCursor::new(bytes);
                cursor.set_position(header.page_map_offset())?;
                SectionMap::Flat(self.read_ac18_page_map(&mut cursor, &mut ctx)?)
            }
            Some(SectionMapLayout::Paged) => {
                SectionMap::Paged(self.read_ac21_sections_map(bytes, &mut ctx)?)
            }
            None => return Err(DwgError::UnsupportedVersion(version.to_string())),
        };

        Ok(DwgSectionMapFile {
            version,
            section_map,
            notifications: ctx.notifications,
        })
    }
}
