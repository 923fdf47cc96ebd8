//! The PackStream value model.

use std::collections::BTreeMap;
use std::fmt;

/// A PackStream dictionary: string keys mapped to values.
///
/// Backed by a `BTreeMap` rather than a hash map so that key iteration is
/// always in lexicographic byte order — required by the Packer to produce
/// a deterministic encoding (two dictionaries equal under set semantics
/// pack to identical bytes).
pub type Dict = BTreeMap<String, Value>;

/// A value in BoltLite's PackStream model.
///
/// This core implements the subset of PackStream needed to drive a single
/// autocommit query: Null, Integer, String, List, Dictionary, and the
/// generic tagged Structure used for every protocol message. Boolean,
/// Float, and the temporal/spatial/graph-entity structures are out of
/// scope (see the structure tag registry in [`crate::message::sig`] for
/// tags this core recognizes without decoding their payload shape).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    String(String),
    List(Vec<Value>),
    Dict(Dict),
    Structure(Structure),
}

/// A tagged, fixed-arity tuple of values — the shape of every Bolt message.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub tag: u8,
    pub fields: Vec<Value>,
}

impl Structure {
    pub fn new(tag: u8, fields: Vec<Value>) -> Self {
        Self { tag, fields }
    }

    /// The human-readable name for this structure's tag, if known.
    pub fn name(&self) -> &'static str {
        structure_name(self.tag)
    }
}

/// Looks up the display name for a structure tag (spec §6 tag registry).
pub fn structure_name(tag: u8) -> &'static str {
    match tag {
        0x01 => "HELLO",
        0x02 => "GOODBYE",
        0x0F => "RESET",
        0x10 => "RUN",
        0x2F => "DISCARD",
        0x3F => "PULL",
        0x11 => "BEGIN",
        0x12 => "COMMIT",
        0x13 => "ROLLBACK",
        0x70 => "SUCCESS",
        0x7E => "IGNORED",
        0x7F => "FAILURE",
        0x71 => "RECORD",
        0x4E => "NODE",
        0x52 => "RELATIONSHIP",
        0x72 => "UNBOUND_RELATIONSHIP",
        0x50 => "PATH",
        0x44 => "DATE",
        0x54 => "TIME",
        0x74 => "LOCALTIME",
        0x46 => "DATETIME",
        0x66 => "DATETIME_ZONE_ID",
        0x64 => "LOCAL_DATETIME",
        0x45 => "DURATION",
        0x58 => "POINT_2D",
        0x59 => "POINT_3D",
        _ => "UNKNOWN",
    }
}

impl Value {
    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Integer` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is a `Dict` variant.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the value as a list reference, if it is a `List` variant.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

// -- Convenience conversions --

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Self::Dict(d)
    }
}

impl From<Structure> for Value {
    fn from(s: Structure) -> Self {
        Self::Structure(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "<nil>"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Dict(dict) => {
                write!(f, "{{")?;
                for (i, (k, v)) in dict.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "}}")
            }
            Self::Structure(s) => {
                write!(f, "{}(\n", s.name())?;
                for field in &s.fields {
                    write!(f, "\t{field}\n")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_null() {
        assert_eq!(Value::Null.to_string(), "<nil>");
    }

    #[test]
    fn display_string_is_quoted() {
        assert_eq!(Value::String("hi".into()).to_string(), "\"hi\"");
    }

    #[test]
    fn display_list() {
        let v = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(v.to_string(), "[1,2]");
    }

    #[test]
    fn display_dict_is_sorted() {
        let mut d = Dict::new();
        d.insert("b".into(), Value::Integer(2));
        d.insert("a".into(), Value::Integer(1));
        assert_eq!(Value::Dict(d).to_string(), "{a:1,b:2}");
    }

    #[test]
    fn display_structure_uses_tag_name() {
        let s = Structure::new(0x70, vec![Value::Dict(Dict::new())]);
        assert_eq!(Value::Structure(s).to_string(), "SUCCESS(\n\t{}\n)");
    }

    #[test]
    fn unknown_structure_tag_name() {
        assert_eq!(structure_name(0xAB), "UNKNOWN");
    }
}
