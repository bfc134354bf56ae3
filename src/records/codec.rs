//! Typed reads and bounded in-place writes of column values.

use crate::error::{FdbError, Result};
use crate::helpers::helper::{read_f32, read_i32, read_i64, read_u32, read_u64, read_u8, write_u32, write_u64};
use crate::metadata::schema::data_kind::DataKind;
use crate::records::row::{Row, ValueSlot};
use crate::records::value::{Assignment, Value};
use crate::storage::image::Image;

pub fn decode<'a>(image: &'a Image, slot: &ValueSlot) -> Value<'a> {
    let buf = image.as_bytes();
    match slot.kind {
        DataKind::Null => Value::Null,
        DataKind::Int32 => Value::Int32(read_i32(buf, slot.at)),
        DataKind::UInt32 => Value::UInt32(read_u32(buf, slot.at)),
        DataKind::Float32 => Value::Float32(read_f32(buf, slot.at)),
        DataKind::Bool => Value::Bool(read_u8(buf, slot.at) != 0),
        DataKind::Int64 => Value::Int64(read_i64(buf, slot.at)),
        DataKind::UInt64 => Value::UInt64(read_u64(buf, slot.at)),
        DataKind::StringInline => Value::StringInline(text(buf, slot)),
        DataKind::StringOther => Value::StringOther(text(buf, slot)),
    }
}

// The stored run may have been shortened by an update, so look for the
// terminator again, but never past the slot's capacity.
fn text<'a>(buf: &'a [u8], slot: &ValueSlot) -> &'a [u8] {
    let run = &buf[slot.at..slot.at + slot.capacity];
    let len = run.iter().position(|&b| b == 0).unwrap_or(run.len());
    &run[..len]
}

/// A validated write, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoded<'a> {
    Nothing,
    Byte(u8),
    Word(u32),
    Cell(u64),
    Text(&'a [u8]),
}

/// Checks `new` against the slot's kind and bounds without touching the image.
pub fn prepare<'a>(slot: &ValueSlot, new: &Assignment<'a>) -> Result<Encoded<'a>> {
    let mismatch = || FdbError::TypeMismatch {
        expected: slot.kind,
        found: new.type_name(),
    };
    let out_of_range = |value: String| FdbError::Range {
        kind: slot.kind,
        value,
    };

    match (slot.kind, *new) {
        (DataKind::Null, Assignment::Null) => Ok(Encoded::Nothing),

        (DataKind::Int32, Assignment::Integer(v)) => i32::try_from(v)
            .map(|v| Encoded::Word(v as u32))
            .map_err(|_| out_of_range(v.to_string())),

        (DataKind::UInt32, Assignment::Integer(v)) => u32::try_from(v)
            .map(Encoded::Word)
            .map_err(|_| out_of_range(v.to_string())),

        (DataKind::Bool, Assignment::Integer(v)) => match v {
            0 | 1 => Ok(Encoded::Byte(v as u8)),
            _ => Err(out_of_range(v.to_string())),
        },

        // 64-bit kinds accept the full signed range; UInt64 stores the bit pattern.
        (DataKind::Int64 | DataKind::UInt64, Assignment::Integer(v)) => Ok(Encoded::Cell(v as u64)),

        (DataKind::Float32, Assignment::Real(v)) => Ok(Encoded::Word((v as f32).to_bits())),

        (DataKind::StringInline | DataKind::StringOther, Assignment::Text(s)) => {
            let bytes = s.as_bytes();
            if bytes.contains(&0) {
                return Err(out_of_range(format!("{s:?} (embedded NUL)")));
            }
            let needed = bytes.len() + 1;
            if needed > slot.capacity {
                return Err(FdbError::TooLarge {
                    needed,
                    capacity: slot.capacity,
                });
            }
            Ok(Encoded::Text(bytes))
        }

        _ => Err(mismatch()),
    }
}

/// Writes a prepared value. For 64-bit kinds the write lands in the shared
/// cell, not in the value record's pointer field.
pub fn apply(image: &mut Image, slot: &ValueSlot, encoded: Encoded<'_>) {
    let buf = image.bytes_mut();
    match encoded {
        Encoded::Nothing => {}
        Encoded::Byte(b) => buf[slot.at] = b,
        Encoded::Word(w) => write_u32(buf, slot.at, w),
        Encoded::Cell(c) => write_u64(buf, slot.at, c),
        Encoded::Text(bytes) => {
            let run = &mut buf[slot.at..slot.at + slot.capacity];
            run[..bytes.len()].copy_from_slice(bytes);
            run[bytes.len()..].fill(0);
        }
    }
}

pub fn update(image: &mut Image, slot: &ValueSlot, new: &Assignment<'_>) -> Result<()> {
    let encoded = prepare(slot, new)?;
    apply(image, slot, encoded);
    Ok(())
}

/// Read access to one row's values.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    image: &'a Image,
    row: &'a Row,
}

impl<'a> RowView<'a> {
    pub fn new(image: &'a Image, row: &'a Row) -> Self {
        Self { image, row }
    }

    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    pub fn get(&self, column: usize) -> Result<Value<'a>> {
        let slot = self.row.values.get(column).ok_or(FdbError::ColumnOutOfRange {
            index: column,
            count: self.row.len(),
        })?;
        Ok(decode(self.image, slot))
    }

    pub fn values(&self) -> impl Iterator<Item = Value<'a>> + 'a {
        let image = self.image;
        self.row.values.iter().map(move |slot| decode(image, slot))
    }

    pub fn row(&self) -> &'a Row {
        self.row
    }
}
