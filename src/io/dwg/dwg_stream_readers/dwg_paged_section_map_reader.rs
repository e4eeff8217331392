//! Paged section map of R2007 files.

use encoding_rs::UTF_16LE;
use log::{debug, trace};

use crate::error::{DwgError, Result};
use crate::io::dwg::dwg_section_io::DwgSectionContext;
use crate::io::dwg::file_headers::{
    SectionCatalog, SectionEntry, SectionPage, SECTION_ENTRY_HEADER_SIZE, SECTION_PAGE_SIZE,
};

use super::decompressor::SystemPageReader;
use super::dwg_byte_cursor::DwgByteCursor;

const READER: &str = "paged section map";

/// Reads the R2007 sections map: a system page holding repeated
///
/// ```text
/// u64 data_size, max_size, encrypted, hashcode, name_length, unknown, encoding, num_pages
/// name_length bytes of UTF-16LE name
/// num_pages × { u64 offset, size, id, uncompressed_size, compressed_size, checksum, crc }
/// ```
///
/// The map carries no checksum of its own.
pub struct DwgPagedSectionMapReader;

impl DwgPagedSectionMapReader {
    pub fn read(
        cursor: &mut DwgByteCursor<'_>,
        compressed_size: u64,
        decompressed_size: u64,
        correction: u64,
        page_reader: &dyn SystemPageReader,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionCatalog> {
        ctx.check_buffer_size(READER, decompressed_size)?;

        let data = page_reader.read_system_page(cursor, compressed_size, decompressed_size, correction)?;
        if data.len() as u64 != decompressed_size {
            return Err(DwgError::Decompression(format!(
                "{READER}: system page holds {} bytes, expected {}",
                data.len(),
                decompressed_size
            )));
        }

        Self::parse(&data, ctx)
    }

    /// Parse an already extracted sections map.
    pub fn parse(data: &[u8], ctx: &DwgSectionContext) -> Result<SectionCatalog> {
        let mut cursor = DwgByteCursor::new(data);
        let mut entries = Vec::new();

        while !cursor.is_at_end() {
            let entry_start = cursor.position();
            cursor.require(SECTION_ENTRY_HEADER_SIZE, READER)?;

            let mut entry = SectionEntry {
                data_size: cursor.read_u64()?,
                max_size: cursor.read_u64()?,
                encrypted: cursor.read_u64()?,
                hashcode: cursor.read_u64()?,
                name_length: cursor.read_u64()?,
                unknown: cursor.read_u64()?,
                encoding: cursor.read_u64()?,
                num_pages: cursor.read_u64()?,
                name: None,
                pages: Vec::new(),
            };
            trace!(
                "{READER}: entry at {:#x}: data_size {:#x} max_size {:#x} encrypted {} hashcode {:#x} name_length {} unknown {} encoding {} num_pages {}",
                entry_start,
                entry.data_size,
                entry.max_size,
                entry.encrypted,
                entry.hashcode,
                entry.name_length,
                entry.unknown,
                entry.encoding,
                entry.num_pages
            );

            if cursor.is_at_end() {
                entries.push(entry);
                ctx.check_section_count(READER, entries.len() as u64)?;
                break;
            }

            if entry.name_length > i64::MAX as u64 {
                return Err(DwgError::unsupported(
                    READER,
                    entry_start,
                    format!("name length {:#x}", entry.name_length),
                ));
            }
            if entry.num_pages > i64::MAX as u64 {
                return Err(DwgError::unsupported(
                    READER,
                    entry_start,
                    format!("page count {:#x}", entry.num_pages),
                ));
            }

            cursor.require(entry.name_length, READER)?;
            let name_bytes = cursor.read_bytes(entry.name_length as usize)?;
            let name = decode_name(name_bytes);
            trace!("{READER}: name {:?}", name);
            entry.name = Some(name);

            cursor.require(entry.num_pages.saturating_mul(SECTION_PAGE_SIZE), READER)?;
            let mut pages = Vec::new();
            pages
                .try_reserve_exact(entry.num_pages as usize)
                .map_err(|_| DwgError::ResourceExhausted {
                    reader: READER,
                    requested: entry.num_pages,
                    limit: cursor.remaining() / SECTION_PAGE_SIZE,
                })?;
            for _ in 0..entry.num_pages {
                let page = SectionPage {
                    offset: cursor.read_u64()?,
                    size: cursor.read_u64()?,
                    id: cursor.read_u64()?,
                    uncompressed_size: cursor.read_u64()?,
                    compressed_size: cursor.read_u64()?,
                    checksum: cursor.read_u64()?,
                    crc: cursor.read_u64()?,
                };
                trace!(
                    "{READER}: page id {} offset {:#x} size {:#x} uncomp {:#x} comp {:#x}",
                    page.id,
                    page.offset,
                    page.size,
                    page.uncompressed_size,
                    page.compressed_size
                );
                pages.push(page);
            }
            entry.pages = pages;

            entries.push(entry);
            ctx.check_section_count(READER, entries.len() as u64)?;
        }

        debug!("{READER}: decoded {} entries for {}", entries.len(), ctx.version);
        Ok(SectionCatalog::from_entries(entries))
    }
}

/// Decode a UTF-16LE name, cut at the first NUL.
fn decode_name(bytes: &[u8]) -> String {
    let (text, _) = UTF_16LE.decode_without_bom_handling(bytes);
    match text.find('\0') {
        Some(end) => text[..end].to_string(),
        None => text.into_owned(),
    }
}
