use crate::engine::hash_table::HashTable;
use crate::metadata::schema::table_column::TableColumn;
use crate::metadata::schema::table_description::TableDescription;
use crate::records::row::Row;

/// A table after relocation: schema, bucket index and the row arena.
#[derive(Debug, Clone)]
pub struct Table {
    pub desc: TableDescription,
    pub hash_table: HashTable,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.desc.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row held by chain node `node`.
    pub fn row_of(&self, node: usize) -> &Row {
        &self.rows[self.hash_table.node(node).row]
    }
}
