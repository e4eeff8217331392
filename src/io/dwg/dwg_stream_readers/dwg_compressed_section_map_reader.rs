//! Compressed page map of R2004-family files.

use log::{debug, trace};

use crate::error::{DwgError, Result};
use crate::io::dwg::dwg_checksum_calculator::{calculate, SECTION_MAP_CHECKSUM_SEED};
use crate::io::dwg::dwg_section_io::DwgSectionContext;
use crate::io::dwg::file_headers::{
    DwgSystemPageHeader, SectionDirectory, SectionRecord, SectionTreeLink,
};

use super::decompressor::Decompressor;
use super::dwg_byte_cursor::DwgByteCursor;

const READER: &str = "compressed section map";

/// Address of the first page; everything before it is file header.
pub const FIRST_PAGE_ADDRESS: u64 = 0x100;

/// Reads the R2004 page map.
///
/// Decompressed, the map is a sequence of
///
/// ```text
/// i32 number, i32 size
/// number < 0: i32 parent, i32 left, i32 right, i32 reserved
/// ```
///
/// Data pages are laid out back to back from [`FIRST_PAGE_ADDRESS`]; tree
/// nodes describe gaps and take no address.
pub struct DwgCompressedSectionMapReader;

impl DwgCompressedSectionMapReader {
    /// Read `compressed_size` bytes at the cursor, expand them and parse the
    /// map. A u32 checksum of the compressed bytes (seed `0xC0C1`) follows
    /// them and is checked before anything is decompressed.
    pub fn read(
        cursor: &mut DwgByteCursor<'_>,
        compressed_size: u64,
        decompressed_size: u64,
        decompressor: &dyn Decompressor,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionDirectory> {
        let start = cursor.position();
        let compressed = Self::take_compressed(cursor, compressed_size, decompressed_size, ctx)?;

        let computed = calculate(SECTION_MAP_CHECKSUM_SEED, compressed, 0, compressed.len());
        cursor.require(4, READER)?;
        let stored = cursor.read_u32()?;
        trace!("{READER}: checksum stored {:#010x} computed {:#010x}", stored, computed);
        ctx.check_checksum(READER, start + compressed_size, stored, computed)?;

        Self::decode(compressed, decompressed_size, decompressor, ctx)
    }

    /// Read a map stored as an R2004 system page whose `header` was just read
    /// from the cursor. The header's own checksum is verified instead of a
    /// trailing one, again before decompression.
    pub fn read_system_page(
        cursor: &mut DwgByteCursor<'_>,
        header: &DwgSystemPageHeader,
        decompressor: &dyn Decompressor,
        ctx: &mut DwgSectionContext,
    ) -> Result<SectionDirectory> {
        let start = cursor.position();
        let compressed_size = non_negative(header.compressed_size, start, "compressed size")?;
        let decompressed_size = non_negative(header.decompressed_size, start, "decompressed size")?;

        let compressed = Self::take_compressed(cursor, compressed_size, decompressed_size, ctx)?;

        let computed = header.compute_checksum(compressed);
        trace!(
            "{READER}: page checksum stored {:#010x} computed {:#010x}",
            header.checksum as u32,
            computed
        );
        ctx.check_checksum(
            READER,
            start.saturating_sub(DwgSystemPageHeader::SIZE),
            header.checksum as u32,
            computed,
        )?;

        Self::decode(compressed, decompressed_size, decompressor, ctx)
    }

    fn take_compressed<'a>(
        cursor: &mut DwgByteCursor<'a>,
        compressed_size: u64,
        decompressed_size: u64,
        ctx: &DwgSectionContext,
    ) -> Result<&'a [u8]> {
        ctx.check_buffer_size(READER, decompressed_size)?;
        cursor.require(compressed_size, READER)?;
        cursor.read_bytes(compressed_size as usize)
    }

    fn decode(
        compressed: &[u8],
        decompressed_size: u64,
        decompressor: &dyn Decompressor,
        ctx: &DwgSectionContext,
    ) -> Result<SectionDirectory> {
        let data = decompressor.decompress(compressed, decompressed_size as usize)?;
        if data.len() as u64 != decompressed_size {
            return Err(DwgError::Decompression(format!(
                "{READER}: decompressor produced {} bytes, expected {}",
                data.len(),
                decompressed_size
            )));
        }

        Self::parse(&data, ctx)
    }

    /// Parse an already decompressed map.
    pub fn parse(data: &[u8], ctx: &DwgSectionContext) -> Result<SectionDirectory> {
        let mut cursor = DwgByteCursor::new(data);
        let mut records = Vec::new();
        let mut address = FIRST_PAGE_ADDRESS;

        while !cursor.is_at_end() {
            let record_start = cursor.position();
            cursor.require(8, READER)?;
            let number = cursor.read_i32()?;
            let size = cursor.read_i32()?;

            let record = if number < 0 {
                cursor.require(16, READER)?;
                let linkage = SectionTreeLink {
                    parent: cursor.read_i32()?,
                    left: cursor.read_i32()?,
                    right: cursor.read_i32()?,
                    reserved: cursor.read_i32()?,
                };
                trace!(
                    "{READER}: tree node {} size {:#x} parent {} left {} right {} reserved {}",
                    number,
                    size,
                    linkage.parent,
                    linkage.left,
                    linkage.right,
                    linkage.reserved
                );
                SectionRecord::tree_node(number, size as u32 as u64, linkage)
            } else {
                if size < 0 {
                    return Err(DwgError::unsupported(
                        READER,
                        record_start,
                        format!("data page {number} has negative size {size}"),
                    ));
                }
                let record = SectionRecord::new(number, address, size as u64);
                trace!("{READER}: page {} address {:#x} size {:#x}", number, address, size);
                address = address.checked_add(size as u64).ok_or_else(|| {
                    DwgError::unsupported(READER, record_start, "page addresses overflow")
                })?;
                record
            };

            records.push(record);
            ctx.check_section_count(READER, records.len() as u64)?;
        }

        debug!("{READER}: decoded {} records for {}", records.len(), ctx.version);
        Ok(SectionDirectory::from_records(records))
    }
}

fn non_negative(value: i32, offset: u64, what: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| DwgError::unsupported(READER, offset, format!("negative {what} {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dwg::dwg_stream_readers::{DwgLz77Ac18Decompressor, StoredDecompressor};
    use crate::io::dwg::file_headers::SYSTEM_PAGE_MAP_TYPE;
    use crate::io::dwg::DwgReaderConfiguration;
    use crate::types::DwgVersion;

    fn ctx() -> DwgSectionContext {
        DwgSectionContext::new(DwgVersion::AC1018, DwgReaderConfiguration::default())
    }

    fn map(entries: &[(i32, i32, Option<[i32; 4]>)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (number, size, link) in entries {
            out.extend_from_slice(&number.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            if let Some(link) = link {
                for field in link {
                    out.extend_from_slice(&field.to_le_bytes());
                }
            }
        }
        out
    }

    /// Stored (uncompressed) map followed by its checksum.
    fn with_checksum(data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        let checksum = calculate(SECTION_MAP_CHECKSUM_SEED, data, 0, data.len());
        out.extend_from_slice(&checksum.to_le_bytes());
        out
    }

    fn read_stored(data: &[u8], c: &mut DwgSectionContext) -> Result<SectionDirectory> {
        let file = with_checksum(data);
        let n = data.len() as u64;
        DwgCompressedSectionMapReader::read(&mut DwgByteCursor::new(&file), n, n, &StoredDecompressor, c)
    }

    #[test]
    fn test_addresses_accumulate() {
        let data = map(&[(1, 10, None), (2, 20, None), (3, 30, None)]);
        let dir = read_stored(&data, &mut ctx()).unwrap();
        let addresses: Vec<u64> = dir.iter().map(|r| r.address).collect();
        assert_eq!(addresses, vec![0x100, 0x10A, 0x11E]);
    }

    #[test]
    fn test_tree_node_does_not_advance() {
        let data = map(&[(1, 0x40, None), (-1, 0x80, Some([7, 2, 3, 0])), (2, 0x20, None)]);
        let dir = read_stored(&data, &mut ctx()).unwrap();
        assert_eq!(dir.len(), 3);

        let node = dir.get(1).unwrap();
        assert_eq!(node.number, -1);
        assert_eq!(node.address, 0);
        assert_eq!(node.size, 0x80);
        assert_eq!(
            node.linkage,
            Some(SectionTreeLink {
                parent: 7,
                left: 2,
                right: 3,
                reserved: 0
            })
        );
        assert_eq!(dir.get(2).map(|r| r.address), Some(0x140));
    }

    #[test]
    fn test_empty_map() {
        let dir = read_stored(&[], &mut ctx()).unwrap();
        assert!(dir.is_empty());
    }

    #[test]
    fn test_checksum_mismatch() {
        let data = map(&[(1, 10, None)]);
        let mut file = with_checksum(&data);
        let last = file.len() - 1;
        file[last] ^= 0x80;
        let err = DwgCompressedSectionMapReader::read(
            &mut DwgByteCursor::new(&file),
            8,
            8,
            &StoredDecompressor,
            &mut ctx(),
        )
        .unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_structural_bit_flips_report_checksum() {
        let data = map(&[(1, 10, None), (2, 20, None)]);
        // Sign bit of the first number, sign bit of the first size, low bit of
        // the second size.
        for (byte, bit) in [(3, 7), (7, 7), (12, 0)] {
            let mut file = with_checksum(&data);
            file[byte] ^= 1 << bit;
            let err = DwgCompressedSectionMapReader::read(
                &mut DwgByteCursor::new(&file),
                16,
                16,
                &StoredDecompressor,
                &mut ctx(),
            )
            .unwrap_err();
            assert!(err.is_integrity(), "byte {byte} bit {bit}: {err}");
        }
    }

    #[test]
    fn test_corrupt_lz77_stream_reports_checksum() {
        let data = map(&[(1, 10, None), (2, 20, None)]);
        let mut stream = vec![(data.len() - 3) as u8];
        stream.extend_from_slice(&data);
        stream.push(0x11);
        let mut file = with_checksum(&stream);
        file[0] ^= 0x01;

        let n = stream.len() as u64;
        let err = DwgCompressedSectionMapReader::read(
            &mut DwgByteCursor::new(&file),
            n,
            data.len() as u64,
            &DwgLz77Ac18Decompressor,
            &mut ctx(),
        )
        .unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_lenient_checksum_then_parse_error() {
        let data = map(&[(1, 10, None), (2, 20, None)]);
        let mut file = with_checksum(&data);
        file[7] ^= 0x80;
        let mut c = DwgSectionContext::new(DwgVersion::AC1018, DwgReaderConfiguration::lenient());
        let err = DwgCompressedSectionMapReader::read(
            &mut DwgByteCursor::new(&file),
            16,
            16,
            &StoredDecompressor,
            &mut c,
        )
        .unwrap_err();
        assert!(matches!(err, DwgError::UnsupportedLayout { .. }));
        assert_eq!(c.notifications.len(), 1);
    }

    #[test]
    fn test_partial_record() {
        let mut data = map(&[(1, 10, None)]);
        data.extend_from_slice(&[1, 2, 3, 4]);
        let err = read_stored(&data, &mut ctx()).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_partial_tree_extension() {
        let mut data = map(&[(-2, 10, None)]);
        data.extend_from_slice(&[0; 12]);
        let err = read_stored(&data, &mut ctx()).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_negative_data_size() {
        let data = map(&[(4, -5, None)]);
        let err = read_stored(&data, &mut ctx()).unwrap_err();
        assert!(matches!(err, DwgError::UnsupportedLayout { .. }));
    }

    #[test]
    fn test_decompressed_size_limit() {
        let mut cfg = DwgReaderConfiguration::default();
        cfg.max_decompressed_size = 8;
        let mut c = DwgSectionContext::new(DwgVersion::AC1018, cfg);
        let data = map(&[(1, 10, None), (2, 20, None)]);
        let err = read_stored(&data, &mut c).unwrap_err();
        assert!(matches!(err, DwgError::ResourceExhausted { requested: 16, limit: 8, .. }));
    }

    #[test]
    fn test_short_compressed_input() {
        let file = [0u8; 6];
        let err = DwgCompressedSectionMapReader::read(
            &mut DwgByteCursor::new(&file),
            8,
            8,
            &StoredDecompressor,
            &mut ctx(),
        )
        .unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_decompressor_output_length_checked() {
        let data = map(&[(1, 10, None)]);
        let file = with_checksum(&data);
        let short = |src: &[u8], _: usize| -> Result<Vec<u8>> { Ok(src[..4].to_vec()) };
        let err = DwgCompressedSectionMapReader::read(&mut DwgByteCursor::new(&file), 8, 8, &short, &mut ctx())
            .unwrap_err();
        assert!(matches!(err, DwgError::Decompression(_)));
    }

    #[test]
    fn test_section_count_limit() {
        let mut cfg = DwgReaderConfiguration::default();
        cfg.max_section_count = 2;
        let mut c = DwgSectionContext::new(DwgVersion::AC1018, cfg);
        let data = map(&[(1, 1, None), (2, 1, None), (3, 1, None)]);
        assert!(matches!(
            read_stored(&data, &mut c),
            Err(DwgError::ResourceExhausted { .. })
        ));
    }

    #[test]
    fn test_system_page() {
        let data = map(&[(1, 0x100, None), (2, 0x80, None)]);
        let mut header = DwgSystemPageHeader {
            page_type: SYSTEM_PAGE_MAP_TYPE,
            decompressed_size: data.len() as i32,
            compressed_size: data.len() as i32,
            compression_type: 1,
            checksum: 0,
        };
        header.checksum = header.compute_checksum(&data) as i32;

        let mut cursor = DwgByteCursor::new(&data);
        let dir = DwgCompressedSectionMapReader::read_system_page(
            &mut cursor,
            &header,
            &StoredDecompressor,
            &mut ctx(),
        )
        .unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get(1).map(|r| r.address), Some(0x200));

        let mut corrupt = data.clone();
        corrupt[3] ^= 0x80;
        let err = DwgCompressedSectionMapReader::read_system_page(
            &mut DwgByteCursor::new(&corrupt),
            &header,
            &StoredDecompressor,
            &mut ctx(),
        )
        .unwrap_err();
        assert!(err.is_integrity());

        header.checksum ^= 1;
        let mut cursor = DwgByteCursor::new(&data);
        let err = DwgCompressedSectionMapReader::read_system_page(
            &mut cursor,
            &header,
            &StoredDecompressor,
            &mut ctx(),
        )
        .unwrap_err();
        assert!(err.is_integrity());
    }
}
