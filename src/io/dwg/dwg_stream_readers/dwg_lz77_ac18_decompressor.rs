use crate::error::{DwgError, Result};

use super::decompressor::{allocate_buffer, Decompressor};

const READER: &str = "lz77 ac18";

/// LZ77 variant used by AC1018 (DWG 2004) and the later versions that share
/// its page layout.
///
/// Output never grows past the requested size; back-references are copied
/// one byte at a time so overlapping runs repeat as the format expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct DwgLz77Ac18Decompressor;

struct Source<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Source<'a> {
    fn next(&mut self) -> Result<u8> {
        let byte = self.data.get(self.position).copied().ok_or_else(|| {
            DwgError::Decompression(format!(
                "{READER}: compressed stream ended at byte {}",
                self.position
            ))
        })?;
        self.position += 1;
        Ok(byte)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self.position.checked_add(count).filter(|end| *end <= self.data.len());
        let end = end.ok_or_else(|| {
            DwgError::Decompression(format!(
                "{READER}: {} literal bytes requested at byte {}, {} left",
                count,
                self.position,
                self.data.len() - self.position
            ))
        })?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }
}

impl Decompressor for DwgLz77Ac18Decompressor {
    fn decompress(&self, compressed: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
        let mut src = Source {
            data: compressed,
            position: 0,
        };
        let mut dst = allocate_buffer(READER, decompressed_size)?;

        let mut opcode1 = src.next()?;
        if (opcode1 & 0xF0) == 0 {
            let count = literal_count(opcode1, &mut src)? + 3;
            opcode1 = copy_literals(count, &mut src, &mut dst, decompressed_size)?;
        }

        while opcode1 != 0x11 {
            let mut comp_offset = 0usize;
            let compressed_bytes: usize;

            if !(0x10..0x40).contains(&opcode1) {
                compressed_bytes = (opcode1 as usize >> 4).saturating_sub(1);
                let opcode2 = src.next()?;
                comp_offset = (((opcode1 as usize >> 2) & 0x3) | ((opcode2 as usize) << 2)) + 1;
            } else if opcode1 < 0x20 {
                compressed_bytes = read_compressed_bytes(opcode1, 0b0111, &mut src)?;
                comp_offset = (opcode1 as usize & 0x8) << 11;
                opcode1 = two_byte_offset(&mut comp_offset, 0x4000, &mut src)?;
            } else {
                compressed_bytes = read_compressed_bytes(opcode1, 0b0001_1111, &mut src)?;
                opcode1 = two_byte_offset(&mut comp_offset, 1, &mut src)?;
            }

            let produced = dst.len();
            if comp_offset == 0 || comp_offset > produced {
                return Err(DwgError::Decompression(format!(
                    "{READER}: back-reference offset {comp_offset} with {produced} bytes produced"
                )));
            }
            if produced + compressed_bytes > decompressed_size {
                return Err(overrun(produced + compressed_bytes, decompressed_size));
            }
            for _ in 0..compressed_bytes {
                let byte = dst[dst.len() - comp_offset];
                dst.push(byte);
            }

            let mut lit_count = opcode1 as usize & 0x3;
            if lit_count == 0 {
                opcode1 = src.next()?;
                if (opcode1 & 0xF0) == 0 {
                    lit_count = literal_count(opcode1, &mut src)? + 3;
                }
            }

            if lit_count > 0 {
                opcode1 = copy_literals(lit_count, &mut src, &mut dst, decompressed_size)?;
            }
        }

        Ok(dst)
    }
}

fn overrun(wanted: usize, limit: usize) -> DwgError {
    DwgError::Decompression(format!(
        "{READER}: output would grow to {wanted} bytes, expected {limit}"
    ))
}

/// Copy `count` literal bytes and return the opcode that follows them.
fn copy_literals(count: usize, src: &mut Source<'_>, dst: &mut Vec<u8>, limit: usize) -> Result<u8> {
    if dst.len() + count > limit {
        return Err(overrun(dst.len() + count, limit));
    }
    dst.extend_from_slice(src.take(count)?);
    src.next()
}

fn literal_count(code: u8, src: &mut Source<'_>) -> Result<usize> {
    let mut lowbits = (code & 0x0F) as usize;
    if lowbits == 0 {
        loop {
            let b = src.next()?;
            if b == 0 {
                lowbits += 0xFF;
            } else {
                lowbits += 0x0F + b as usize;
                break;
            }
        }
    }
    Ok(lowbits)
}

fn read_compressed_bytes(opcode1: u8, valid_bits: u8, src: &mut Source<'_>) -> Result<usize> {
    let mut compressed_bytes = (opcode1 & valid_bits) as usize;

    if compressed_bytes == 0 {
        loop {
            let b = src.next()?;
            if b == 0 {
                compressed_bytes += 0xFF;
            } else {
                compressed_bytes += b as usize + valid_bits as usize;
                break;
            }
        }
    }

    Ok(compressed_bytes + 2)
}

fn two_byte_offset(offset: &mut usize, added_value: usize, src: &mut Source<'_>) -> Result<u8> {
    let first = src.next()?;
    let second = src.next()?;

    *offset |= (first as usize) >> 2;
    *offset |= (second as usize) << 6;
    *offset += added_value;

    Ok(first)
}
