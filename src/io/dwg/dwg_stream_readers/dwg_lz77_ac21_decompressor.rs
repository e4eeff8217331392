use crate::error::{DwgError, Result};

use super::decompressor::{allocate_buffer, Decompressor};

const READER: &str = "lz77 ac21";

/// LZ77 variant used by AC1021 (DWG 2007) system pages and file header.
///
/// Literal runs are stored byte-reordered: every 32-byte chunk has its 4-byte
/// groups rearranged, and the tail of a run uses a fixed per-length layout.
/// The output buffer is always `decompressed_size` bytes; anything the stream
/// does not fill stays zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct DwgLz77Ac21Decompressor;

impl Decompressor for DwgLz77Ac21Decompressor {
    fn decompress(&self, compressed: &[u8], decompressed_size: usize) -> Result<Vec<u8>> {
        let mut dst = allocate_buffer(READER, decompressed_size)?;
        dst.resize(decompressed_size, 0);

        let mut decoder = Decoder {
            src: compressed,
            src_index: 0,
            dst_index: 0,
            length: 0,
            source_offset: 0,
            op_code: 0,
        };
        decoder.run(&mut dst)?;
        Ok(dst)
    }
}

struct Decoder<'a> {
    src: &'a [u8],
    src_index: usize,
    dst_index: usize,
    length: usize,
    source_offset: usize,
    op_code: usize,
}

impl<'a> Decoder<'a> {
    fn next_byte(&mut self) -> Result<usize> {
        let byte = self.src.get(self.src_index).copied().ok_or_else(|| {
            DwgError::Decompression(format!(
                "{READER}: compressed stream ended at byte {}",
                self.src_index
            ))
        })?;
        self.src_index += 1;
        Ok(byte as usize)
    }

    fn at_end(&self) -> bool {
        self.src_index >= self.src.len()
    }

    fn run(&mut self, dst: &mut [u8]) -> Result<()> {
        if self.src.is_empty() {
            return Ok(());
        }

        self.op_code = self.next_byte()?;
        if self.at_end() {
            return Ok(());
        }

        if (self.op_code & 0xF0) == 0x20 {
            self.src_index += 3;
            self.length = self.src.get(self.src_index - 1).copied().ok_or_else(|| {
                DwgError::Decompression(format!("{READER}: header ended at byte {}", self.src_index))
            })? as usize
                & 7;
        }

        while !self.at_end() {
            self.copy_literal_run(dst)?;
            if self.at_end() {
                break;
            }
            self.copy_back_references(dst)?;
        }

        Ok(())
    }

    fn copy_literal_run(&mut self, dst: &mut [u8]) -> Result<()> {
        if self.length == 0 {
            self.read_literal_length()?;
        }

        copy_reordered(self.src, self.src_index, dst, self.dst_index, self.length)?;

        self.src_index += self.length;
        self.dst_index += self.length;
        Ok(())
    }

    fn copy_back_references(&mut self, dst: &mut [u8]) -> Result<()> {
        self.length = 0;
        self.op_code = self.next_byte()?;

        self.read_instructions()?;

        loop {
            copy_bytes(dst, self.dst_index, self.length, self.source_offset)?;
            self.dst_index += self.length;

            self.length = self.op_code & 0x07;

            if self.length != 0 || self.at_end() {
                break;
            }

            self.op_code = self.next_byte()?;

            if (self.op_code >> 4) == 0 {
                break;
            }

            if (self.op_code >> 4) == 15 {
                self.op_code &= 15;
            }

            self.read_instructions()?;
        }

        Ok(())
    }

    fn read_instructions(&mut self) -> Result<()> {
        match self.op_code >> 4 {
            0 => {
                self.length = (self.op_code & 0xF) + 0x13;
                self.source_offset = self.next_byte()?;
                self.op_code = self.next_byte()?;
                self.length += (self.op_code >> 3) & 0x10;
                self.source_offset += ((self.op_code & 0x78) << 5) + 1;
            }
            1 => {
                self.length = (self.op_code & 0xF) + 3;
                self.source_offset = self.next_byte()?;
                self.op_code = self.next_byte()?;
                self.source_offset += ((self.op_code & 0xF8) << 5) + 1;
            }
            2 => {
                self.source_offset = self.next_byte()?;
                self.source_offset |= self.next_byte()? << 8;

                self.length = self.op_code & 7;

                if (self.op_code & 8) == 0 {
                    self.op_code = self.next_byte()?;
                    self.length += self.op_code & 0xF8;
                } else {
                    self.source_offset += 1;
                    self.length += self.next_byte()? << 3;
                    self.op_code = self.next_byte()?;
                    self.length += ((self.op_code & 0xF8) << 8) + 0x100;
                }
            }
            _ => {
                self.length = self.op_code >> 4;
                self.source_offset = self.op_code & 0x0F;
                self.op_code = self.next_byte()?;
                self.source_offset += ((self.op_code & 0xF8) << 1) + 1;
            }
        }
        Ok(())
    }

    fn read_literal_length(&mut self) -> Result<()> {
        self.length = self.op_code + 8;

        if self.length == 0x17 {
            let mut n = self.next_byte()?;
            self.length += n;

            if n == 0xFF {
                loop {
                    n = self.next_byte()?;
                    n |= self.next_byte()? << 8;
                    self.length += n;

                    if n != 0xFFFF {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Copy `length` bytes that start `src_offset` bytes behind `dst_index`.
fn copy_bytes(dst: &mut [u8], dst_index: usize, length: usize, src_offset: usize) -> Result<()> {
    if src_offset == 0 || src_offset > dst_index {
        return Err(DwgError::Decompression(format!(
            "{READER}: back-reference offset {src_offset} at output byte {dst_index}"
        )));
    }
    if dst_index + length > dst.len() {
        return Err(DwgError::Decompression(format!(
            "{READER}: output would grow to {} bytes, expected {}",
            dst_index + length,
            dst.len()
        )));
    }

    let start = dst_index - src_offset;
    for i in 0..length {
        dst[dst_index + i] = dst[start + i];
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Piece {
    /// One byte.
    B1,
    /// Two bytes, reversed.
    B2,
    /// Three bytes, reversed.
    B3,
    /// Four bytes, in order.
    B4,
    /// Eight bytes, in order.
    B8,
    /// Sixteen bytes with the two halves swapped.
    B16,
}

use Piece::*;

/// Layout of a literal tail of length 1..=31 as `(piece, source, destination)`
/// offsets relative to the tail start.
static TAIL_LAYOUTS: [&[(Piece, usize, usize)]; 32] = [
    &[],
    &[(B1, 0, 0)],
    &[(B2, 0, 0)],
    &[(B3, 0, 0)],
    &[(B4, 0, 0)],
    &[(B1, 4, 0), (B4, 0, 1)],
    &[(B1, 5, 0), (B4, 1, 1), (B1, 0, 5)],
    &[(B2, 5, 0), (B4, 1, 2), (B1, 0, 6)],
    &[(B8, 0, 0)],
    &[(B1, 8, 0), (B8, 0, 1)],
    &[(B1, 9, 0), (B8, 1, 1), (B1, 0, 9)],
    &[(B2, 9, 0), (B8, 1, 2), (B1, 0, 10)],
    &[(B4, 8, 0), (B8, 0, 4)],
    &[(B1, 12, 0), (B4, 8, 1), (B8, 0, 5)],
    &[(B1, 13, 0), (B4, 9, 1), (B8, 1, 5), (B1, 0, 13)],
    &[(B2, 13, 0), (B4, 9, 2), (B8, 1, 6), (B1, 0, 14)],
    &[(B16, 0, 0)],
    &[(B8, 9, 0), (B1, 8, 8), (B8, 0, 9)],
    &[(B1, 17, 0), (B16, 1, 1), (B1, 0, 17)],
    &[(B3, 16, 0), (B16, 0, 3)],
    &[(B4, 16, 0), (B8, 8, 4), (B8, 0, 12)],
    &[(B1, 20, 0), (B4, 16, 1), (B8, 8, 5), (B8, 0, 13)],
    &[(B2, 20, 0), (B4, 16, 2), (B8, 8, 6), (B8, 0, 14)],
    &[(B3, 20, 0), (B4, 16, 3), (B8, 8, 7), (B8, 0, 15)],
    &[(B8, 16, 0), (B16, 0, 8)],
    &[(B8, 17, 0), (B1, 16, 8), (B16, 0, 9)],
    &[(B1, 25, 0), (B8, 17, 1), (B1, 16, 9), (B16, 0, 10)],
    &[(B2, 25, 0), (B8, 17, 2), (B1, 16, 10), (B16, 0, 11)],
    &[(B4, 24, 0), (B8, 16, 4), (B8, 8, 12), (B8, 0, 20)],
    &[(B1, 28, 0), (B4, 24, 1), (B8, 16, 5), (B8, 8, 13), (B8, 0, 21)],
    &[(B2, 28, 0), (B4, 24, 2), (B8, 16, 6), (B8, 8, 14), (B8, 0, 22)],
    &[
        (B1, 30, 0),
        (B4, 26, 1),
        (B8, 18, 5),
        (B8, 10, 13),
        (B8, 2, 21),
        (B2, 0, 29),
    ],
];

/// Source order of the eight 4-byte groups in a full 32-byte chunk.
const CHUNK_ORDER: [usize; 8] = [24, 28, 16, 20, 8, 12, 0, 4];

fn copy_reordered(src: &[u8], si: usize, dst: &mut [u8], di: usize, length: usize) -> Result<()> {
    if si + length > src.len() {
        return Err(DwgError::Decompression(format!(
            "{READER}: literal run of {length} bytes at byte {si} passes the end of the stream"
        )));
    }
    if di + length > dst.len() {
        return Err(DwgError::Decompression(format!(
            "{READER}: output would grow to {} bytes, expected {}",
            di + length,
            dst.len()
        )));
    }

    let mut si = si;
    let mut di = di;
    let mut length = length;

    while length >= 32 {
        for (group, &from) in CHUNK_ORDER.iter().enumerate() {
            copy_piece(B4, src, si + from, dst, di + group * 4);
        }
        si += 32;
        di += 32;
        length -= 32;
    }

    for &(piece, from, to) in TAIL_LAYOUTS[length] {
        copy_piece(piece, src, si + from, dst, di + to);
    }
    Ok(())
}

fn copy_piece(piece: Piece, src: &[u8], si: usize, dst: &mut [u8], di: usize) {
    match piece {
        B1 => dst[di] = src[si],
        B2 => {
            dst[di] = src[si + 1];
            dst[di + 1] = src[si];
        }
        B3 => {
            dst[di] = src[si + 2];
            dst[di + 1] = src[si + 1];
            dst[di + 2] = src[si];
        }
        B4 => dst[di..di + 4].copy_from_slice(&src[si..si + 4]),
        B8 => dst[di..di + 8].copy_from_slice(&src[si..si + 8]),
        B16 => {
            dst[di..di + 8].copy_from_slice(&src[si + 8..si + 16]);
            dst[di + 8..di + 16].copy_from_slice(&src[si..si + 8]);
        }
    }
}
