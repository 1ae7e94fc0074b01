//! Big-endian field encoding
//!
//! Values are masked, not range-checked: a 16-bit field fed a larger value
//! keeps only its low 16 bits.

use alloc::vec::Vec;

/// Bits [31:24]
pub const fn high_word_high_byte(value: u32) -> u8 {
    ((value >> 24) & 0xFF) as u8
}

/// Bits [23:16]
pub const fn high_word_low_byte(value: u32) -> u8 {
    ((value >> 16) & 0xFF) as u8
}

/// Bits [15:8]
pub const fn high_byte(value: u32) -> u8 {
    ((value >> 8) & 0xFF) as u8
}

/// Bits [7:0]
pub const fn low_byte(value: u32) -> u8 {
    (value & 0xFF) as u8
}

/// Append a 2-byte big-endian field
pub fn put_u16(buf: &mut Vec<u8>, value: u16) {
    let value = u32::from(value);
    buf.push(high_byte(value));
    buf.push(low_byte(value));
}

/// Append a 4-byte big-endian field
pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.push(high_word_high_byte(value));
    buf.push(high_word_low_byte(value));
    buf.push(high_byte(value));
    buf.push(low_byte(value));
}
