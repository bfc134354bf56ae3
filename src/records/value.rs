use std::borrow::Cow;
use std::fmt;

use crate::metadata::schema::data_kind::DataKind;

/// A decoded column value. Strings borrow the bytes stored in the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    StringInline(&'a [u8]),
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    StringOther(&'a [u8]),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> DataKind {
        match self {
            Value::Null => DataKind::Null,
            Value::Int32(_) => DataKind::Int32,
            Value::UInt32(_) => DataKind::UInt32,
            Value::Float32(_) => DataKind::Float32,
            Value::StringInline(_) => DataKind::StringInline,
            Value::Bool(_) => DataKind::Bool,
            Value::Int64(_) => DataKind::Int64,
            Value::UInt64(_) => DataKind::UInt64,
            Value::StringOther(_) => DataKind::StringOther,
        }
    }

    /// Integer view, as a relational front-end would see it. `UInt64` is
    /// reinterpreted bit for bit.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int32(v) => Some(v as i64),
            Value::UInt32(v) => Some(v as i64),
            Value::Bool(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            Value::UInt64(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Value::StringInline(b) | Value::StringOther(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<Cow<'a, str>> {
        self.as_bytes().map(String::from_utf8_lossy)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{}", *v as u8),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::StringInline(b) | Value::StringOther(b) => {
                f.write_str(&String::from_utf8_lossy(b))
            }
        }
    }
}

/// A replacement value supplied by a caller, typed the way a relational
/// front-end hands values over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assignment<'a> {
    Null,
    Integer(i64),
    Real(f64),
    Text(&'a str),
}

impl Assignment<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Assignment::Null => "NULL",
            Assignment::Integer(_) => "INTEGER",
            Assignment::Real(_) => "REAL",
            Assignment::Text(_) => "TEXT",
        }
    }
}
