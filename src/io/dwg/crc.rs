//! The 16-bit CRC DWG files call "CRC8".
//!
//! It is the reflected CRC-16 with polynomial `0xA001`, driven one byte at a
//! time through a 256-entry table. R13–R2000 file headers seed it with
//! `0xC0C1`.

use once_cell::sync::Lazy;

/// Lookup table for [`crc8_decode`].
pub static CRC8_TABLE: Lazy<[u16; 256]> = Lazy::new(|| {
    let mut table = [0u16; 256];
    for (index, slot) in table.iter_mut().enumerate() {
        let mut crc = index as u16;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xA001 } else { crc >> 1 };
        }
        *slot = crc;
    }
    table
});

/// Advance the CRC by one byte.
#[inline]
pub fn crc8_decode(seed: u16, byte: u8) -> u16 {
    let index = (byte ^ (seed & 0xFF) as u8) as usize;
    (seed >> 8) ^ CRC8_TABLE[index]
}

/// CRC over `buffer[start..start + count]`.
///
/// # Panics
///
/// Panics if the range is outside `buffer`.
pub fn crc8_value(seed: u16, buffer: &[u8], start: usize, count: usize) -> u16 {
    buffer[start..start + count]
        .iter()
        .fold(seed, |crc, &byte| crc8_decode(crc, byte))
}
