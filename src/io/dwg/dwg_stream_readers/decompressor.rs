//! Collaborator seams for the section map readers.
//!
//! The map readers never decompress or de-interleave on their own. They are
//! handed one of these traits, so tests can substitute a stored copy and
//! callers can plug in a different codec.

use crate::error::{DwgError, Result};

use super::dwg_byte_cursor::DwgByteCursor;

/// Expands a compressed buffer to exactly `decompressed_size` bytes.
pub trait Decompressor {
    fn decompress(&self, compressed: &[u8], decompressed_size: usize) -> Result<Vec<u8>>;
}

/// Reads one R2007 system page at the cursor, returning its
/// `decompressed_size` payload bytes.
pub trait SystemPageReader {
    fn read_system_page(
        &self,
        cursor: &mut DwgByteCursor<'_>,
        compressed_size: u64,
        decompressed_size: u64,
        correction: u64,
    ) -> Result<Vec<u8>>;
}

impl<F> Decompressor for F
where
    F: Fn(&[u8], usize) -> Result<Vec<u8>>,
{
    fn decompress(&self, compressed: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
        self(compressed, decompressed_size)
    }
}

/// Pass-through for data stored without compression.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoredDecompressor;

impl Decompressor for StoredDecompressor {
    fn decompress(&self, compressed: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
        if compressed.len() != decompressed_size {
            return Err(DwgError::Decompression(format!(
                "stored data is {} bytes, expected {}",
                compressed.len(),
                decompressed_size
            )));
        }
        Ok(compressed.to_vec())
    }
}

/// Allocate an empty buffer with room for `size` bytes, reporting allocation
/// failure as an error instead of aborting.
pub(crate) fn allocate_buffer(reader: &'static str, size: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| DwgError::ResourceExhausted {
            reader,
            requested: size as u64,
            limit: isize::MAX as u64,
        })?;
    Ok(buffer)
}
