//! Bounds-checked little-endian reads over a byte slice.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{DwgError, Result};

const READER: &str = "byte cursor";

/// A position into a borrowed byte buffer.
///
/// Every read checks the remaining length first, so a short buffer is reported
/// as [`DwgError::TruncatedInput`] with the offset it happened at instead of a
/// bare end-of-file I/O error.
#[derive(Debug, Clone)]
pub struct DwgByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> DwgByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Current absolute position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Move to an absolute position. The end of the buffer is allowed, anything
    /// past it is not.
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        let len = self.len() as u64;
        if position > len {
            return Err(DwgError::truncated(READER, position, 0, 0));
        }
        self.inner.set_position(position);
        Ok(())
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the position and the end.
    pub fn remaining(&self) -> u64 {
        (self.len() as u64).saturating_sub(self.position())
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread part of the buffer.
    pub fn remaining_slice(&self) -> &'a [u8] {
        let data: &'a [u8] = *self.inner.get_ref();
        let start = (self.position() as usize).min(data.len());
        &data[start..]
    }

    /// The whole underlying buffer.
    pub fn get_ref(&self) -> &'a [u8] {
        *self.inner.get_ref()
    }

    /// Fail with a truncation error naming `reader` unless `needed` bytes
    /// remain.
    pub fn require(&self, needed: u64, reader: &'static str) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(DwgError::truncated(reader, self.position(), needed, available));
        }
        Ok(())
    }

    /// Borrow `count` bytes and advance past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.require(count as u64, READER)?;
        let data: &'a [u8] = *self.inner.get_ref();
        let start = self.position() as usize;
        let end = start + count;
        self.inner.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Borrow `data[start..end]` without moving.
    pub fn slice(&self, start: u64, end: u64) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.inner.get_ref();
        if start > end || end > data.len() as u64 {
            return Err(DwgError::truncated(
                READER,
                start,
                end.saturating_sub(start),
                (data.len() as u64).saturating_sub(start),
            ));
        }
        Ok(&data[start as usize..end as usize])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1, READER)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.require(1, READER)?;
        Ok(self.inner.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2, READER)?;
        Ok(self.inner.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.require(2, READER)?;
        Ok(self.inner.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4, READER)?;
        Ok(self.inner.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4, READER)?;
        Ok(self.inner.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.require(8, READER)?;
        Ok(self.inner.read_u64::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.require(8, READER)?;
        Ok(self.inner.read_i64::<LittleEndian>()?)
    }
}
