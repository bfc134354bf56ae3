use crate::metadata::schema::data_kind::DataKind;

/// Where a decoded value lives in the image.
///
/// `at` depends on the kind:
/// - inline kinds (`Int32`, `UInt32`, `Float32`, `Bool`): the payload field
/// - `Int64` / `UInt64`: the 8-byte cell the payload points to
/// - string kinds: the first byte of the NUL-terminated run
/// - `Null`: unused
///
/// `capacity` is the number of bytes a string may occupy including its
/// terminator, fixed at load time. Zero for non-string kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSlot {
    pub kind: DataKind,
    pub at: usize,
    pub capacity: usize,
}

impl ValueSlot {
    pub fn null() -> Self {
        Self {
            kind: DataKind::Null,
            at: 0,
            capacity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub values: Vec<ValueSlot>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
