//! PackStream marker byte constants.
//!
//! Only the markers this core's value model can produce or consume are
//! listed here. Boolean, Float, Bytes, and the sized List/Dict/Struct
//! markers (for >15-element containers) are out of scope; the decoder
//! still reports `UnsupportedMarker` for them rather than panicking.

// Null
pub const NULL: u8 = 0xC0;

// Integer (beyond TINY_INT range)
pub const INT_8: u8 = 0xC8;
pub const INT_16: u8 = 0xC9;
pub const INT_32: u8 = 0xCA;
pub const INT_64: u8 = 0xCB;

// TINY_INT: single byte, range -16..=127
// Positive: 0x00..=0x7F (0..127)
// Negative: 0xF0..=0xFF (-16..-1)

// String
// TINY_STRING: 0x80..=0x8F (high nibble 0x8, low = byte length 0..15)
pub const STRING_8: u8 = 0xD0;
pub const STRING_16: u8 = 0xD1;
pub const STRING_32: u8 = 0xD2;

// List
// TINY_LIST: 0x90..=0x9F (high nibble 0x9, low = item count 0..15)

// Dictionary
// TINY_DICT: 0xA0..=0xAF (high nibble 0xA, low = entry count 0..15)

// Structure
// TINY_STRUCT: 0xB0..=0xBF (high nibble 0xB, low = field count 0..15)

// High-nibble masks for tiny types.
pub const TINY_STRING_NIBBLE: u8 = 0x80;
pub const TINY_LIST_NIBBLE: u8 = 0x90;
pub const TINY_DICT_NIBBLE: u8 = 0xA0;
pub const TINY_STRUCT_NIBBLE: u8 = 0xB0;

/// Containers (List/Dict/Structure) larger than this use a sized marker;
/// this core only implements the tiny form.
pub const TINY_MAX: usize = 15;
