//! Builders for small synthetic DWG files.

#![allow(dead_code)]

use dwg_section_map::io::dwg::crc::crc8_value;
use dwg_section_map::io::dwg::dwg_checksum_calculator::{
    apply_magic_sequence, calculate, SECTION_MAP_CHECKSUM_SEED,
};
use dwg_section_map::io::dwg::dwg_stream_readers::{SystemPageGeometry, RS_DATA_SIZE};
use dwg_section_map::io::dwg::file_headers::{
    Dwg21CompressedMetadata, DwgFileHeaderAC18, DwgSystemPageHeader, AC15_END_SENTINEL,
    SYSTEM_PAGE_MAP_TYPE,
};

/// Offset of the locator count in an R13–R2000 file.
pub const AC15_TABLE_OFFSET: usize = 0x15;

/// A whole AC1015 file: magic, header bytes, locator table, CRC and sentinel.
pub fn ac15_file(records: &[(i8, u32, u32)]) -> Vec<u8> {
    let mut out = vec![0u8; AC15_TABLE_OFFSET];
    out[..6].copy_from_slice(b"AC1015");
    out[0x0B] = 0x06;
    out[0x13] = 0x1E;

    out.extend_from_slice(&(records.len() as u32).to_le_bytes());
    for (number, address, size) in records {
        out.push(*number as u8);
        out.extend_from_slice(&address.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
    }
    let crc = crc8_value(0xC0C1, &out, 0, out.len());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&AC15_END_SENTINEL);
    out
}

/// Decompressed R2004 page map bytes. `None` linkage makes a data page,
/// `Some` a tree node.
pub fn ac18_map(entries: &[(i32, i32, Option<[i32; 4]>)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (number, size, linkage) in entries {
        out.extend_from_slice(&number.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        if let Some(link) = linkage {
            for value in link {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
    out
}

/// R2004 LZ77 stream holding `literals` as one literal run.
pub fn lz77_literals(literals: &[u8]) -> Vec<u8> {
    let n = literals.len();
    assert!(n >= 4);
    let mut out = Vec::new();
    if n <= 18 {
        out.push((n - 3) as u8);
    } else {
        let r = n - 18;
        let k = (r - 1) / 255;
        out.push(0);
        out.extend(std::iter::repeat(0u8).take(k));
        out.push((r - 255 * k) as u8);
    }
    out.extend_from_slice(literals);
    out.push(0x11);
    out
}

/// Compressed-map bytes for the bare compressed reader: LZ77 stream followed
/// by its u32 checksum.
pub fn compressed_map_with_trailer(map: &[u8]) -> (Vec<u8>, u64) {
    let mut out = lz77_literals(map);
    let compressed_size = out.len() as u64;
    let checksum = calculate(SECTION_MAP_CHECKSUM_SEED, &out, 0, out.len());
    out.extend_from_slice(&checksum.to_le_bytes());
    (out, compressed_size)
}

/// A whole AC1018 file whose page map is stored at 0x100 as a system page.
pub fn ac18_file(map: &[u8], lz77: bool) -> Vec<u8> {
    let mut out = vec![0u8; 0x100];
    out[..6].copy_from_slice(b"AC1018");

    let header = DwgFileHeaderAC18 {
        last_page_id: 3,
        section_amount: 3,
        section_page_map_id: 3,
        page_map_address: 0,
        section_map_id: 2,
        ..Default::default()
    };
    let mut encrypted = header.to_bytes();
    apply_magic_sequence(&mut encrypted);
    out[0x80..0x80 + encrypted.len()].copy_from_slice(&encrypted);

    let compressed = if lz77 { lz77_literals(map) } else { map.to_vec() };
    let page = DwgSystemPageHeader {
        page_type: SYSTEM_PAGE_MAP_TYPE,
        decompressed_size: map.len() as i32,
        compressed_size: compressed.len() as i32,
        compression_type: if lz77 { 2 } else { 1 },
        checksum: 0,
    };
    let checksum = page.compute_checksum(&compressed) as i32;
    out.extend_from_slice(&page.to_bytes_with_checksum(checksum));
    out.extend_from_slice(&compressed);
    out
}

/// Interleave `data` into `block_count` Reed-Solomon blocks of `page_size`
/// bytes, parity left zero.
pub fn interleave(data: &[u8], block_count: usize, page_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; page_size];
    for block in 0..block_count {
        for j in 0..RS_DATA_SIZE {
            if let Some(&byte) = data.get(block * RS_DATA_SIZE + j) {
                out[j * block_count + block] = byte;
            }
        }
    }
    out
}

/// An uncompressed R2007 system page (correction factor 1).
pub fn ac21_system_page(data: &[u8]) -> Vec<u8> {
    let geometry = SystemPageGeometry::new(data.len() as u64, 1).unwrap();
    interleave(data, geometry.block_count as usize, geometry.page_size as usize)
}

/// One R2007 sections map entry.
pub fn ac21_entry(hashcode: u64, name: &str, page_ids: &[u64]) -> Vec<u8> {
    let name: Vec<u8> = name
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect();

    let mut out = Vec::new();
    for value in [0x7400u64, 0x7400, 0, hashcode, name.len() as u64, 0, 1, page_ids.len() as u64] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&name);
    for (index, id) in page_ids.iter().enumerate() {
        for value in [index as u64 * 0x7400, 0x7400, *id, 0x7400, 0x100, 0, 0] {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    out
}

/// A whole AC1021 file: Reed-Solomon file header, pages map at 0x480 and the
/// sections map page right after it.
pub fn ac21_file(sections_map: &[u8]) -> Vec<u8> {
    const PAGES_MAP_ID: i64 = 1;
    const SECTIONS_MAP_ID: i64 = 2;

    let sections_page = ac21_system_page(sections_map);

    let mut pages_map = Vec::new();
    let pages_map_page_size = ac21_system_page(&[0u8; 32]).len() as i64;
    for (size, id) in [
        (pages_map_page_size, PAGES_MAP_ID),
        (sections_page.len() as i64, SECTIONS_MAP_ID),
    ] {
        pages_map.extend_from_slice(&size.to_le_bytes());
        pages_map.extend_from_slice(&id.to_le_bytes());
    }
    let pages_page = ac21_system_page(&pages_map);

    let mut metadata = Dwg21CompressedMetadata::new();
    metadata.pages_map_offset = 0;
    metadata.pages_map_id = PAGES_MAP_ID as u64;
    metadata.pages_map_correction_factor = 1;
    metadata.pages_map_size_compressed = pages_map.len() as u64;
    metadata.pages_map_size_uncompressed = pages_map.len() as u64;
    metadata.sections_map_id = SECTIONS_MAP_ID as u64;
    metadata.sections_map_correction_factor = 1;
    metadata.sections_map_size_compressed = sections_map.len() as u64;
    metadata.sections_map_size_uncompressed = sections_map.len() as u64;

    // 32-byte prefix with a zero compressed length: metadata stored as is.
    let mut header = vec![0u8; 32];
    header.extend_from_slice(&metadata.to_bytes());

    let mut out = vec![0u8; 0x80];
    out[..6].copy_from_slice(b"AC1021");
    out.extend_from_slice(&interleave(&header, 3, 0x400));
    out.extend_from_slice(&pages_page);
    out.extend_from_slice(&sections_page);
    out
}
