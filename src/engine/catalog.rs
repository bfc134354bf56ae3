use std::collections::HashMap;

use crate::engine::table::Table;
use crate::error::{FdbError, Result};
use crate::metadata::schema::table_column::TableColumn;

/// Index of a table inside its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableHandle(pub(crate) usize);

impl TableHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns the relocated tables, in image order, and looks them up by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: Vec<Table>,
    tables_by_name: HashMap<String, TableHandle>,
}

impl Catalog {
    pub fn new(tables: Vec<Table>) -> Self {
        let mut tables_by_name = HashMap::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            // first table wins when names repeat
            tables_by_name
                .entry(table.name().to_string())
                .or_insert(TableHandle(i));
        }
        Self {
            tables,
            tables_by_name,
        }
    }

    pub fn find_table(&self, name: &str) -> Result<TableHandle> {
        self.tables_by_name
            .get(name)
            .copied()
            .ok_or_else(|| FdbError::TableNotFound(name.to_string()))
    }

    /// Table names in image order.
    pub fn list_tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.iter().map(Table::name)
    }

    pub fn columns(&self, handle: TableHandle) -> &[TableColumn] {
        self.table(handle).columns()
    }

    pub fn table(&self, handle: TableHandle) -> &Table {
        &self.tables[handle.0]
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hash_table::HashTable;
    use crate::metadata::schema::data_kind::DataKind;
    use crate::metadata::schema::table_description::TableDescription;

    fn table(name: &str, kind: DataKind) -> Table {
        Table {
            desc: TableDescription {
                name: name.to_string(),
                columns: vec![TableColumn {
                    name: "id".into(),
                    kind,
                }],
            },
            hash_table: HashTable::new(1).unwrap(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_find_and_list() {
        let catalog = Catalog::new(vec![
            table("Objects", DataKind::Int32),
            table("Icons", DataKind::UInt32),
        ]);
        let names: Vec<&str> = catalog.list_tables().collect();
        assert_eq!(names, vec!["Objects", "Icons"]);

        let icons = catalog.find_table("Icons").unwrap();
        assert_eq!(icons.index(), 1);
        assert_eq!(catalog.columns(icons)[0].kind, DataKind::UInt32);

        assert!(catalog.find_table("icons").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let catalog = Catalog::new(vec![
            table("Dup", DataKind::Int32),
            table("Dup", DataKind::Float32),
        ]);
        assert_eq!(catalog.find_table("Dup").unwrap(), TableHandle(0));
        assert_eq!(catalog.list_tables().count(), 2);
    }
}
