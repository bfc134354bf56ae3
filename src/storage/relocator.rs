//! Single-pass decode of an FDB image into an owned table graph.
//!
//! Every stored offset is resolved exactly once and checked against the
//! image extent. The first bad offset, unknown data kind or inconsistent
//! count aborts the whole load; nothing partially decoded escapes.

use std::collections::HashSet;

use tracing::debug;

use crate::engine::hash_table::HashTable;
use crate::engine::table::Table;
use crate::error::{FdbError, Result};
use crate::helpers::helper::read_u32;
use crate::helpers::load_flags::LoadFlags;
use crate::metadata::schema::data_kind::DataKind;
use crate::metadata::schema::table_column::TableColumn;
use crate::metadata::schema::table_description::TableDescription;
use crate::records::row::{Row, ValueSlot};
use crate::storage::image::Image;
use crate::storage::layout::{
    BUCKET_SLOT_SIZE, RawBucket, RawColumn, RawDatabase, RawHashTable, RawRecord, RawRow,
    RawTable, RawTableDesc, RawValue, VALUE_PAYLOAD,
};

pub struct Relocator<'a> {
    image: &'a Image,
    flags: LoadFlags,
}

impl<'a> Relocator<'a> {
    pub fn new(image: &'a Image, flags: LoadFlags) -> Self {
        Self { image, flags }
    }

    /// Decodes every table reachable from the database header at the image base.
    pub fn relocate(&self) -> Result<Vec<Table>> {
        let root: RawDatabase = self.image.record(self.image.base())?;
        let tables_at = self.image.require_array(
            root.tables,
            root.table_count,
            RawTable::SIZE,
            "table list",
        )?;

        let mut tables = Vec::with_capacity(root.table_count as usize);
        for i in 0..root.table_count as usize {
            let table = self.table(tables_at + i * RawTable::SIZE)?;
            debug!(
                table = %table.name(),
                columns = table.columns().len(),
                buckets = table.hash_table.bucket_count(),
                rows = table.row_count(),
                "relocated table"
            );
            tables.push(table);
        }
        Ok(tables)
    }

    fn table(&self, at: usize) -> Result<Table> {
        let raw: RawTable = self.image.record(at)?;

        let desc_at = self.image.require(raw.desc, RawTableDesc::SIZE, RawTableDesc::WHAT)?;
        let desc = self.description(desc_at)?;

        let hash_at = self.image.require(raw.hash_table, RawHashTable::SIZE, RawHashTable::WHAT)?;
        let (hash_table, rows) = self.hash_table(hash_at, desc.column_count())?;

        Ok(Table {
            desc,
            hash_table,
            rows,
        })
    }

    fn description(&self, at: usize) -> Result<TableDescription> {
        let raw: RawTableDesc = self.image.record(at)?;
        let name = self.name(raw.name, "table")?;

        let columns_at = self.image.require_array(
            raw.columns,
            raw.column_count,
            RawColumn::SIZE,
            "column list",
        )?;

        let mut columns = Vec::with_capacity(raw.column_count as usize);
        for i in 0..raw.column_count as usize {
            let column: RawColumn = self.image.record(columns_at + i * RawColumn::SIZE)?;
            columns.push(TableColumn {
                name: self.name(column.name, "column")?,
                kind: DataKind::from_code(column.data_type, "column")?,
            });
        }

        Ok(TableDescription { name, columns })
    }

    fn name(&self, raw: u32, what: &'static str) -> Result<String> {
        let at = self.image.require(raw, 1, what)?;
        let len = self.image.c_string(at, what)?;
        let bytes = &self.image.as_bytes()[at..at + len];

        if self.flags.contains(LoadFlags::STRICT_NAMES) {
            return std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| FdbError::InvalidName { what, offset: at });
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn hash_table(&self, at: usize, column_count: usize) -> Result<(HashTable, Vec<Row>)> {
        let raw: RawHashTable = self.image.record(at)?;
        let mut table = HashTable::new(raw.bucket_count)?;
        let slots_at = self.image.require_array(
            raw.buckets,
            raw.bucket_count,
            BUCKET_SLOT_SIZE,
            "bucket array",
        )?;

        let mut rows = Vec::new();
        // Each node offset may be relocated once; a repeat means a cycle or two
        // chains sharing a tail.
        let mut seen = HashSet::new();

        for bucket in 0..raw.bucket_count {
            let slot = read_u32(self.image.as_bytes(), slots_at + bucket as usize * BUCKET_SLOT_SIZE);
            let mut next = self.image.locate(slot, RawBucket::SIZE, RawBucket::WHAT)?;
            let mut prev = None;

            while let Some(node_at) = next {
                if !seen.insert(node_at) {
                    return Err(FdbError::malformed(
                        "bucket chain",
                        format!("node at {node_at:#x} reached twice (bucket {bucket})"),
                    ));
                }
                let node: RawBucket = self.image.record(node_at)?;

                let row_at = self.image.require(node.row, RawRow::SIZE, RawRow::WHAT)?;
                rows.push(self.row(row_at, column_count)?);
                prev = Some(table.push_node(bucket, prev, rows.len() - 1));

                next = self.image.locate(node.next, RawBucket::SIZE, RawBucket::WHAT)?;
            }
        }

        Ok((table, rows))
    }

    fn row(&self, at: usize, column_count: usize) -> Result<Row> {
        let raw: RawRow = self.image.record(at)?;
        if raw.value_count as usize != column_count {
            return Err(FdbError::malformed(
                "row",
                format!(
                    "row at {at:#x} has {} values for {column_count} columns",
                    raw.value_count
                ),
            ));
        }

        let values_at = self.image.require_array(
            raw.values,
            raw.value_count,
            RawValue::SIZE,
            "value list",
        )?;

        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(self.value(values_at + i * RawValue::SIZE)?);
        }
        Ok(Row { values })
    }

    fn value(&self, at: usize) -> Result<ValueSlot> {
        let raw: RawValue = self.image.record(at)?;
        let kind = DataKind::from_code(raw.data_type, "value")?;

        let slot = match kind {
            DataKind::Null => ValueSlot::null(),
            DataKind::Int32 | DataKind::UInt32 | DataKind::Float32 | DataKind::Bool => ValueSlot {
                kind,
                at: at + VALUE_PAYLOAD,
                capacity: 0,
            },
            DataKind::Int64 | DataKind::UInt64 => ValueSlot {
                kind,
                at: self.image.require(raw.payload, 8, "64-bit cell")?,
                capacity: 0,
            },
            DataKind::StringInline | DataKind::StringOther => {
                let text_at = self.image.require(raw.payload, 1, "string")?;
                let len = self.image.c_string(text_at, "string")?;
                ValueSlot {
                    kind,
                    at: text_at,
                    capacity: len + 1,
                }
            }
        };
        Ok(slot)
    }
}
