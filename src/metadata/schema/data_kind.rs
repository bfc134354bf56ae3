use std::fmt;

use crate::error::{FdbError, Result};

/// Storage kind of a column or value, as encoded in the image.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DataKind {
    Null = 0,
    Int32 = 1,
    UInt32 = 2,
    Float32 = 3,
    StringInline = 4,
    Bool = 5,
    Int64 = 6,
    UInt64 = 7,
    StringOther = 8,
}

impl DataKind {
    pub const ALL: [DataKind; 9] = [
        DataKind::Null,
        DataKind::Int32,
        DataKind::UInt32,
        DataKind::Float32,
        DataKind::StringInline,
        DataKind::Bool,
        DataKind::Int64,
        DataKind::UInt64,
        DataKind::StringOther,
    ];

    pub fn from_code(code: u32, what: &'static str) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(FdbError::UnknownDataKind { what, code })
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_string(self) -> bool {
        matches!(self, DataKind::StringInline | DataKind::StringOther)
    }

    /// 64-bit kinds store an offset to an 8-byte cell instead of an inline payload.
    pub fn is_indirect(self) -> bool {
        matches!(self, DataKind::Int64 | DataKind::UInt64)
    }

    /// Type name declared to an external query front-end.
    pub fn type_name(self) -> &'static str {
        match self {
            DataKind::Null => "none",
            DataKind::Int32 => "int32",
            DataKind::UInt32 => "uint32",
            DataKind::Float32 => "real",
            DataKind::StringInline => "text_4",
            DataKind::Bool => "int_bool",
            DataKind::Int64 => "int64",
            DataKind::UInt64 => "uint64",
            DataKind::StringOther => "text_8",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
