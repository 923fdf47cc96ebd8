//! PackStream encoding: `Value` → bytes (the Packer).

use bytes::{BufMut, Bytes, BytesMut};

use super::marker::{self, TINY_MAX};
use crate::error::BoltLiteError;
use crate::types::{Dict, Structure, Value};

/// Packs a single value into a freshly allocated buffer.
pub fn pack(value: &Value) -> Result<Bytes, BoltLiteError> {
    let mut buf = BytesMut::new();
    encode_value(&mut buf, value)?;
    Ok(buf.freeze())
}

/// Encodes a `Value` into the buffer using PackStream format.
pub fn encode_value(buf: &mut BytesMut, value: &Value) -> Result<(), BoltLiteError> {
    match value {
        Value::Null => {
            encode_null(buf);
            Ok(())
        }
        Value::Integer(i) => {
            encode_int(buf, *i);
            Ok(())
        }
        Value::String(s) => {
            encode_string(buf, s);
            Ok(())
        }
        Value::List(items) => encode_list(buf, items),
        Value::Dict(dict) => encode_dict(buf, dict),
        Value::Structure(s) => encode_structure(buf, s),
    }
}

pub fn encode_null(buf: &mut BytesMut) {
    buf.put_u8(marker::NULL);
}

/// Encodes an integer using the smallest PackStream representation whose
/// range contains the value: tiny, then Int8, Int16, Int32, Int64.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    if (-16..=127).contains(&value) {
        buf.put_u8(value as u8);
    } else if i64::from(i8::MIN) <= value && value <= i64::from(i8::MAX) {
        buf.put_u8(marker::INT_8);
        buf.put_i8(value as i8);
    } else if i64::from(i16::MIN) <= value && value <= i64::from(i16::MAX) {
        buf.put_u8(marker::INT_16);
        buf.put_i16(value as i16);
    } else if i64::from(i32::MIN) <= value && value <= i64::from(i32::MAX) {
        buf.put_u8(marker::INT_32);
        buf.put_i32(value as i32);
    } else {
        buf.put_u8(marker::INT_64);
        buf.put_i64(value);
    }
}

/// Encodes a string (size = byte length, not char count).
pub fn encode_string(buf: &mut BytesMut, value: &str) {
    let len = value.len();
    encode_string_header(buf, len);
    buf.put_slice(value.as_bytes());
}

fn encode_string_header(buf: &mut BytesMut, len: usize) {
    if len <= TINY_MAX {
        buf.put_u8(marker::TINY_STRING_NIBBLE | len as u8);
    } else if len <= u8::MAX as usize {
        buf.put_u8(marker::STRING_8);
        buf.put_u8(len as u8);
    } else if len <= u16::MAX as usize {
        buf.put_u8(marker::STRING_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::STRING_32);
        buf.put_u32(len as u32);
    }
}

/// Encodes a list. Only the tiny form (≤15 elements) is supported.
pub fn encode_list(buf: &mut BytesMut, items: &[Value]) -> Result<(), BoltLiteError> {
    if items.len() > TINY_MAX {
        return Err(BoltLiteError::UnsupportedSize {
            kind: "list",
            len: items.len(),
        });
    }
    buf.put_u8(marker::TINY_LIST_NIBBLE | items.len() as u8);
    for item in items {
        encode_value(buf, item)?;
    }
    Ok(())
}

/// Encodes a dictionary. Keys are emitted in lexicographic byte order
/// (guaranteed by `Dict`'s `BTreeMap` backing), making encoding deterministic.
/// Only the tiny form (≤15 entries) is supported.
pub fn encode_dict(buf: &mut BytesMut, dict: &Dict) -> Result<(), BoltLiteError> {
    if dict.len() > TINY_MAX {
        return Err(BoltLiteError::UnsupportedSize {
            kind: "dictionary",
            len: dict.len(),
        });
    }
    buf.put_u8(marker::TINY_DICT_NIBBLE | dict.len() as u8);
    for (key, value) in dict {
        encode_string(buf, key);
        encode_value(buf, value)?;
    }
    Ok(())
}

/// Encodes a structure header: marker byte (0xBn) + tag byte.
pub fn encode_struct_header(
    buf: &mut BytesMut,
    tag: u8,
    field_count: usize,
) -> Result<(), BoltLiteError> {
    if field_count > TINY_MAX {
        return Err(BoltLiteError::UnsupportedSize {
            kind: "structure",
            len: field_count,
        });
    }
    buf.put_u8(marker::TINY_STRUCT_NIBBLE | field_count as u8);
    buf.put_u8(tag);
    Ok(())
}

fn encode_structure(buf: &mut BytesMut, s: &Structure) -> Result<(), BoltLiteError> {
    encode_struct_header(buf, s.tag, s.fields.len())?;
    for field in &s.fields {
        encode_value(buf, field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_null_marker() {
        let mut buf = BytesMut::new();
        encode_null(&mut buf);
        assert_eq!(&buf[..], &[0xC0]);
    }

    #[test]
    fn encode_tiny_int() {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, 0);
        assert_eq!(&buf[..], &[0x00]);

        buf.clear();
        encode_int(&mut buf, 127);
        assert_eq!(&buf[..], &[0x7F]);

        buf.clear();
        encode_int(&mut buf, -1);
        assert_eq!(&buf[..], &[0xFF]);

        buf.clear();
        encode_int(&mut buf, -16);
        assert_eq!(&buf[..], &[0xF0]);
    }

    #[test]
    fn encode_int8_boundary() {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, -17);
        assert_eq!(&buf[..], &[marker::INT_8, 0xEF]);
    }

    #[test]
    fn encode_int16_boundaries() {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, 128);
        assert_eq!(&buf[..], &[marker::INT_16, 0x00, 0x80]);

        buf.clear();
        encode_int(&mut buf, i64::from(i16::MIN));
        assert_eq!(&buf[..], &[marker::INT_16, 0x80, 0x00]);
    }

    #[test]
    fn encode_int32_boundary() {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, i64::from(i32::MIN));
        assert_eq!(&buf[..], &[marker::INT_32, 0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn encode_int64_max() {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, i64::MAX);
        assert_eq!(
            &buf[..],
            &[marker::INT_64, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn encode_tiny_string() {
        let mut buf = BytesMut::new();
        encode_string(&mut buf, "A");
        assert_eq!(&buf[..], &[0x81, 0x41]);

        buf.clear();
        encode_string(&mut buf, "");
        assert_eq!(&buf[..], &[0x80]);
    }

    #[test]
    fn encode_string8_at_16_bytes() {
        let s = "0123456789abcdef";
        let mut buf = BytesMut::new();
        encode_string(&mut buf, s);
        assert_eq!(buf[0], marker::STRING_8);
        assert_eq!(buf[1], 16);
        assert_eq!(&buf[2..], s.as_bytes());
    }

    #[test]
    fn encode_empty_list() {
        let mut buf = BytesMut::new();
        encode_list(&mut buf, &[]).unwrap();
        assert_eq!(&buf[..], &[0x90]);
    }

    #[test]
    fn encode_tiny_list() {
        let mut buf = BytesMut::new();
        let items = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)];
        encode_list(&mut buf, &items).unwrap();
        assert_eq!(&buf[..], &[0x93, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn encode_list_over_tiny_limit_errors() {
        let items: Vec<Value> = (0..16).map(Value::Integer).collect();
        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_list(&mut buf, &items),
            Err(BoltLiteError::UnsupportedSize {
                kind: "list",
                len: 16
            })
        ));
    }

    #[test]
    fn encode_dict_example_from_spec() {
        // {"one": "eins"} -> A1 83 6F 6E 65 84 65 69 6E 73
        let mut dict = Dict::new();
        dict.insert("one".to_string(), Value::String("eins".to_string()));
        let mut buf = BytesMut::new();
        encode_dict(&mut buf, &dict).unwrap();
        assert_eq!(
            &buf[..],
            &[0xA1, 0x83, 0x6F, 0x6E, 0x65, 0x84, 0x65, 0x69, 0x6E, 0x73]
        );
    }

    #[test]
    fn encode_dict_is_deterministic_regardless_of_insertion_order() {
        let mut d1 = Dict::new();
        d1.insert("b".to_string(), Value::Integer(2));
        d1.insert("a".to_string(), Value::Integer(1));

        let mut d2 = Dict::new();
        d2.insert("a".to_string(), Value::Integer(1));
        d2.insert("b".to_string(), Value::Integer(2));

        let mut buf1 = BytesMut::new();
        let mut buf2 = BytesMut::new();
        encode_dict(&mut buf1, &d1).unwrap();
        encode_dict(&mut buf2, &d2).unwrap();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn encode_structure_hello() {
        let mut extra = Dict::new();
        extra.insert("K".to_string(), Value::String("V".to_string()));
        let s = Structure::new(0x01, vec![Value::Dict(extra)]);
        let mut buf = BytesMut::new();
        encode_structure(&mut buf, &s).unwrap();
        assert_eq!(&buf[..], &[0xB1, 0x01, 0xA1, 0x81, 0x4B, 0x81, 0x56]);
    }
}
