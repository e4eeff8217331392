//! DWG 32-bit checksum and the R2004 header magic sequence.

use once_cell::sync::Lazy;

/// Seed shared by the section map checksums.
pub const SECTION_MAP_CHECKSUM_SEED: u32 = 0xC0C1;

/// Pre-computed 256-byte magic sequence.
///
/// Generated from a linear congruential generator with:
/// - multiplier: `0x343FD`
/// - increment:  `0x269EC3`
/// - initial seed: `1`
///
/// Each byte is `(seed >> 16) & 0xFF` after advancing the generator. The
/// R2004 file header is XOR-ed with it.
pub static MAGIC_SEQUENCE: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut seq = [0u8; 256];
    let mut rand_seed: i32 = 1;
    for byte in seq.iter_mut() {
        rand_seed = rand_seed.wrapping_mul(0x343FD);
        rand_seed = rand_seed.wrapping_add(0x269EC3);
        *byte = (rand_seed >> 0x10) as u8;
    }
    seq
});

/// XOR `data` with the magic sequence, in place. Applying it twice restores
/// the input.
pub fn apply_magic_sequence(data: &mut [u8]) {
    for (byte, mask) in data.iter_mut().zip(MAGIC_SEQUENCE.iter().cycle()) {
        *byte ^= mask;
    }
}

/// Adler-like checksum used in DWG section data.
///
/// Modulus `0xFFF1`, processed in chunks of `0x15B0` bytes. The lower 16 bits
/// of `seed` start the first sum, the upper 16 bits the second.
///
/// # Panics
///
/// Panics if `offset + size` is past the end of `buffer`.
pub fn calculate(seed: u32, buffer: &[u8], offset: usize, size: usize) -> u32 {
    let mut sum1 = seed & 0xFFFF;
    let mut sum2 = seed >> 16;

    for chunk in buffer[offset..offset + size].chunks(0x15B0) {
        for &byte in chunk {
            sum1 += byte as u32;
            sum2 += sum1;
        }
        sum1 %= 0xFFF1;
        sum2 %= 0xFFF1;
    }

    (sum2 << 16) | (sum1 & 0xFFFF)
}
