//! R2007 system pages: Reed-Solomon interleaved, optionally LZ77 compressed.

use log::trace;

use crate::error::{DwgError, Result};

use super::decompressor::{Decompressor, SystemPageReader};
use super::dwg_byte_cursor::DwgByteCursor;
use super::dwg_lz77_ac21_decompressor::DwgLz77Ac21Decompressor;

const READER: &str = "system page";

/// Data bytes carried by one 255-byte Reed-Solomon block.
pub const RS_DATA_SIZE: usize = 239;

/// Encoded size of one Reed-Solomon block.
pub const RS_BLOCK_SIZE: usize = 255;

/// Undo the byte interleaving of `block_count` Reed-Solomon blocks.
///
/// Byte `j` of block `i` is stored at `src[j * block_count + i]`; the parity
/// bytes that follow the data are dropped, not checked.
pub fn reed_solomon_deinterleave(src: &[u8], block_count: usize, data_size: usize) -> Result<Vec<u8>> {
    let needed = block_count * data_size;
    if src.len() < needed {
        return Err(DwgError::truncated(READER, 0, needed as u64, src.len() as u64));
    }

    let mut dst = vec![0u8; needed];
    for block in 0..block_count {
        for j in 0..data_size {
            dst[block * data_size + j] = src[j * block_count + block];
        }
    }
    Ok(dst)
}

/// Default [`SystemPageReader`] for AC1021 files.
#[derive(Debug, Default, Clone, Copy)]
pub struct DwgSystemPageReader;

/// Sizes derived from a system page's stored compressed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemPageGeometry {
    /// Interleaved payload size: the compressed size rounded up to 8 and
    /// multiplied by the correction factor.
    pub payload_size: u64,
    pub block_count: u64,
    /// Bytes the page occupies in the file.
    pub page_size: u64,
}

impl SystemPageGeometry {
    pub fn new(compressed_size: u64, correction: u64) -> Result<Self> {
        if correction == 0 {
            return Err(DwgError::unsupported(READER, 0, "correction factor 0"));
        }

        let payload_size = compressed_size
            .checked_add(7)
            .map(|size| size & !7)
            .and_then(|size| size.checked_mul(correction))
            .ok_or_else(|| DwgError::unsupported(READER, 0, "page size overflows"))?;
        let block_count = (payload_size + (RS_DATA_SIZE as u64 - 1)) / RS_DATA_SIZE as u64;
        let page_size = block_count
            .checked_mul(RS_BLOCK_SIZE as u64)
            .and_then(|size| size.checked_add(7))
            .map(|size| size & !7)
            .ok_or_else(|| DwgError::unsupported(READER, 0, "page size overflows"))?;

        Ok(Self {
            payload_size,
            block_count,
            page_size,
        })
    }
}

impl SystemPageReader for DwgSystemPageReader {
    fn read_system_page(
        &self,
        cursor: &mut DwgByteCursor<'_>,
        compressed_size: u64,
        decompressed_size: u64,
        correction: u64,
    ) -> Result<Vec<u8>> {
        let start = cursor.position();
        let geometry = SystemPageGeometry::new(compressed_size, correction)?;
        trace!(
            "system page at {:#x}: comp={} uncomp={} correction={} blocks={} size={}",
            start,
            compressed_size,
            decompressed_size,
            correction,
            geometry.block_count,
            geometry.page_size
        );

        cursor.require(geometry.page_size, READER)?;
        let encoded = cursor.read_bytes(geometry.page_size as usize)?;
        let data = reed_solomon_deinterleave(encoded, geometry.block_count as usize, RS_DATA_SIZE)?;

        if compressed_size < decompressed_size {
            let length = geometry.payload_size.min(compressed_size) as usize;
            DwgLz77Ac21Decompressor.decompress(&data[..length], decompressed_size as usize)
        } else {
            let length = decompressed_size as usize;
            if length > data.len() {
                return Err(DwgError::truncated(READER, start, length as u64, data.len() as u64));
            }
            Ok(data[..length].to_vec())
        }
    }
}
