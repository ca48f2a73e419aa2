//! Table-driven 32-bit CRC used as the entropy source for shortcut ids
//!
//! Parameters: polynomial `0x04C11DB7`, initial remainder `0xFFFFFFFF`,
//! final XOR `0xFFFFFFFF`, with both the input bytes and the final remainder
//! bit-reflected. The table is computed MSB-first at compile time and the
//! reflection is applied per byte, so the engine walks the message exactly
//! the way the launcher's own implementation does.

const WIDTH: u32 = 32;
const TOPBIT: u32 = 1 << (WIDTH - 1);

pub const POLYNOMIAL: u32 = 0x04C1_1DB7;
pub const INITIAL_REMAINDER: u32 = 0xFFFF_FFFF;
pub const FINAL_XOR_VALUE: u32 = 0xFFFF_FFFF;

/// Lookup table, one remainder per possible dividend byte
static CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut dividend = 0usize;

    while dividend < 256 {
        let mut remainder = (dividend as u32) << (WIDTH - 8);
        let mut bit = 0;
        while bit < 8 {
            remainder = if remainder & TOPBIT != 0 {
                (remainder << 1) ^ POLYNOMIAL
            } else {
                remainder << 1
            };
            bit += 1;
        }
        table[dividend] = remainder;
        dividend += 1;
    }

    table
}

#[inline]
fn reflect_byte(data: u8) -> u8 {
    data.reverse_bits()
}

#[inline]
fn reflect_remainder(remainder: u32) -> u32 {
    remainder.reverse_bits()
}

/// Compute the checksum of `message`
///
/// Defined for every input, including the empty slice (which yields `0`).
///
/// # Examples
///
/// ```
/// use shortcut_store::checksum;
///
/// assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
/// assert_eq!(checksum(b""), 0);
/// ```
pub fn checksum(message: &[u8]) -> u32 {
    let mut remainder = INITIAL_REMAINDER;

    for &byte in message {
        let data = reflect_byte(byte) ^ (remainder >> (WIDTH - 8)) as u8;
        remainder = CRC_TABLE[data as usize] ^ (remainder << 8);
    }

    reflect_remainder(remainder) ^ FINAL_XOR_VALUE
}

/// Bit-at-a-time variant, kept to cross-check the table in tests
#[cfg(test)]
fn checksum_slow(message: &[u8]) -> u32 {
    let mut remainder = INITIAL_REMAINDER;

    for &byte in message {
        remainder ^= (reflect_byte(byte) as u32) << (WIDTH - 8);
        for _ in 0..8 {
            remainder = if remainder & TOPBIT != 0 {
                (remainder << 1) ^ POLYNOMIAL
            } else {
                remainder << 1
            };
        }
    }

    reflect_remainder(remainder) ^ FINAL_XOR_VALUE
}
