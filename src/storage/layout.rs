//! Fixed on-disk records of an FDB image.
//!
//! Every record is a pair of little-endian `u32` fields. Offsets are
//! relative to the image start; [`SENTINEL`](crate::storage::image::SENTINEL)
//! marks an absent pointer.
//!
//! ```text
//! Database     { table_count,  tables        }
//! Table        { desc,         hash_table    }
//! TableDesc    { column_count, name, columns }
//! Column       { data_type,    name          }
//! HashTable    { bucket_count, buckets       }   buckets -> [u32; bucket_count]
//! Bucket       { row,          next          }
//! Row          { value_count,  values        }
//! Value        { data_type,    payload       }
//! ```

use crate::helpers::helper::read_u32;

pub trait RawRecord: Sized {
    const SIZE: usize;
    const WHAT: &'static str;

    /// `buf` holds exactly `SIZE` bytes.
    fn read_from(buf: &[u8]) -> Self;
}

/// Byte offset of `Value::payload` inside a value record.
pub const VALUE_PAYLOAD: usize = 4;

/// Size of one entry in a hash table's bucket-head array.
pub const BUCKET_SLOT_SIZE: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct RawDatabase {
    pub table_count: u32,
    pub tables: u32,
}

impl RawRecord for RawDatabase {
    const SIZE: usize = 8;
    const WHAT: &'static str = "database header";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            table_count: read_u32(buf, 0),
            tables: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawTable {
    pub desc: u32,
    pub hash_table: u32,
}

impl RawRecord for RawTable {
    const SIZE: usize = 8;
    const WHAT: &'static str = "table";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            desc: read_u32(buf, 0),
            hash_table: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawTableDesc {
    pub column_count: u32,
    pub name: u32,
    pub columns: u32,
}

impl RawRecord for RawTableDesc {
    const SIZE: usize = 12;
    const WHAT: &'static str = "table description";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            column_count: read_u32(buf, 0),
            name: read_u32(buf, 4),
            columns: read_u32(buf, 8),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawColumn {
    pub data_type: u32,
    pub name: u32,
}

impl RawRecord for RawColumn {
    const SIZE: usize = 8;
    const WHAT: &'static str = "column";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            data_type: read_u32(buf, 0),
            name: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawHashTable {
    pub bucket_count: u32,
    pub buckets: u32,
}

impl RawRecord for RawHashTable {
    const SIZE: usize = 8;
    const WHAT: &'static str = "hash table";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            bucket_count: read_u32(buf, 0),
            buckets: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawBucket {
    pub row: u32,
    pub next: u32,
}

impl RawRecord for RawBucket {
    const SIZE: usize = 8;
    const WHAT: &'static str = "bucket";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            row: read_u32(buf, 0),
            next: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawRow {
    pub value_count: u32,
    pub values: u32,
}

impl RawRecord for RawRow {
    const SIZE: usize = 8;
    const WHAT: &'static str = "row";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            value_count: read_u32(buf, 0),
            values: read_u32(buf, 4),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawValue {
    pub data_type: u32,
    pub payload: u32,
}

impl RawRecord for RawValue {
    const SIZE: usize = 8;
    const WHAT: &'static str = "value";

    fn read_from(buf: &[u8]) -> Self {
        Self {
            data_type: read_u32(buf, 0),
            payload: read_u32(buf, VALUE_PAYLOAD),
        }
    }
}
