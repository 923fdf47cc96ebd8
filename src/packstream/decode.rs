//! PackStream decoding: bytes → `Value` (the Unpacker).

use super::marker;
use crate::error::BoltLiteError;
use crate::types::{Dict, Structure, Value};

/// Decodes a single `Value` from the front of `data`.
///
/// Returns the decoded value and the number of bytes it consumed. Callers
/// driving a chunk payload that contains exactly one value can check
/// `consumed == data.len()`; the Unpacker itself never requires that.
pub fn unpack_value(data: &[u8]) -> Result<(Value, usize), BoltLiteError> {
    if data.is_empty() {
        return Err(BoltLiteError::EmptyInput);
    }

    let marker = data[0];
    match marker {
        marker::NULL => Ok((Value::Null, 1)),

        marker::INT_8 => {
            ensure_remaining(data, 1, 1)?;
            Ok((Value::Integer(i64::from(data[1] as i8)), 2))
        }
        marker::INT_16 => {
            ensure_remaining(data, 1, 2)?;
            let v = i16::from_be_bytes([data[1], data[2]]);
            Ok((Value::Integer(i64::from(v)), 3))
        }
        marker::INT_32 => {
            ensure_remaining(data, 1, 4)?;
            let v = i32::from_be_bytes([data[1], data[2], data[3], data[4]]);
            Ok((Value::Integer(i64::from(v)), 5))
        }
        marker::INT_64 => {
            ensure_remaining(data, 1, 8)?;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[1..9]);
            Ok((Value::Integer(i64::from_be_bytes(bytes)), 9))
        }

        marker::STRING_8 => {
            ensure_remaining(data, 1, 1)?;
            decode_string(data, data[1] as usize, 2)
        }
        marker::STRING_16 => {
            ensure_remaining(data, 1, 2)?;
            let len = u16::from_be_bytes([data[1], data[2]]) as usize;
            decode_string(data, len, 3)
        }
        marker::STRING_32 => {
            ensure_remaining(data, 1, 4)?;
            let len = u32::from_be_bytes([data[1], data[2], data[3], data[4]]) as usize;
            decode_string(data, len, 5)
        }

        _ => {
            let high = marker & 0xF0;
            let low = (marker & 0x0F) as usize;
            match high {
                marker::TINY_STRING_NIBBLE => decode_string(data, low, 1),
                marker::TINY_LIST_NIBBLE => decode_list(data, low),
                marker::TINY_DICT_NIBBLE => decode_dict(data, low),
                marker::TINY_STRUCT_NIBBLE => {
                    ensure_remaining(data, 1, 1)?;
                    decode_structure(data, data[1], low)
                }
                _ if marker <= 0x7F => Ok((Value::Integer(i64::from(marker)), 1)),
                _ if marker >= 0xF0 => Ok((Value::Integer(i64::from(marker as i8)), 1)),
                _ => Err(BoltLiteError::UnsupportedMarker(marker)),
            }
        }
    }
}

/// Checks that `data` has at least `needed` bytes remaining past `offset`.
fn ensure_remaining(data: &[u8], offset: usize, needed: usize) -> Result<(), BoltLiteError> {
    let available = data.len().saturating_sub(offset);
    if available < needed {
        Err(BoltLiteError::Truncated { needed, available })
    } else {
        Ok(())
    }
}

/// Decodes `len` bytes of string payload starting at `header_len` (the
/// number of marker/length-prefix bytes already consumed).
fn decode_string(data: &[u8], len: usize, header_len: usize) -> Result<(Value, usize), BoltLiteError> {
    ensure_remaining(data, header_len, len)?;
    let bytes = &data[header_len..header_len + len];
    let s = std::str::from_utf8(bytes)
        .map_err(|_| BoltLiteError::UnexpectedType {
            expected: "UTF-8 string",
            got: format!("{len} invalid bytes"),
        })?
        .to_string();
    Ok((Value::String(s), header_len + len))
}

fn decode_list(data: &[u8], count: usize) -> Result<(Value, usize), BoltLiteError> {
    let mut items = Vec::with_capacity(count);
    let mut offset = 1;
    for _ in 0..count {
        let (value, n) = unpack_value(&data[offset..])?;
        items.push(value);
        offset += n;
    }
    Ok((Value::List(items), offset))
}

/// Decodes `count` key/value entries into a `Dict`. Duplicate keys: the
/// last occurrence wins, matching the source's overwrite behavior.
fn decode_dict(data: &[u8], count: usize) -> Result<(Value, usize), BoltLiteError> {
    let mut dict = Dict::new();
    let mut offset = 1;
    for _ in 0..count {
        let (key, n) = unpack_value(&data[offset..])?;
        offset += n;
        let key = match key {
            Value::String(s) => s,
            other => {
                return Err(BoltLiteError::UnexpectedType {
                    expected: "string dictionary key",
                    got: other.to_string(),
                })
            }
        };
        let (value, n) = unpack_value(&data[offset..])?;
        offset += n;
        dict.insert(key, value);
    }
    Ok((Value::Dict(dict), offset))
}

/// Decodes exactly `field_count` fields — the documented count is
/// authoritative, even if the buffer holds trailing bytes after them.
fn decode_structure(
    data: &[u8],
    tag: u8,
    field_count: usize,
) -> Result<(Value, usize), BoltLiteError> {
    let mut fields = Vec::with_capacity(field_count);
    let mut offset = 2; // marker byte + tag byte
    for _ in 0..field_count {
        let (value, n) = unpack_value(&data[offset..])?;
        fields.push(value);
        offset += n;
    }
    Ok((Value::Structure(Structure::new(tag, fields)), offset))
}
