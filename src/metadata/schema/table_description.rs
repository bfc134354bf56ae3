use crate::metadata::schema::table_column::TableColumn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<TableColumn>,
}

impl TableDescription {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the column called `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Renders the schema as the `CREATE TABLE` statement a relational
    /// front-end expects when declaring this table as virtual.
    ///
    /// # Format
    /// ```text
    /// CREATE TABLE x('id' int32,'name' text_4)
    /// ```
    /// The table itself is always called `x`; the front-end binds the real
    /// name when the module is registered.
    pub fn declaration(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("'{}' {}", c.name, c.kind.type_name()))
            .collect();
        format!("CREATE TABLE x({})", columns.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::schema::data_kind::DataKind;

    fn column(name: &str, kind: DataKind) -> TableColumn {
        TableColumn {
            name: name.to_string(),
            kind,
        }
    }

    #[test]
    fn test_declaration() {
        let desc = TableDescription {
            name: "Objects".into(),
            columns: vec![
                column("id", DataKind::Int32),
                column("name", DataKind::StringInline),
                column("_internalNotes", DataKind::StringOther),
            ],
        };
        assert_eq!(
            desc.declaration(),
            "CREATE TABLE x('id' int32,'name' text_4,'_internalNotes' text_8)"
        );
        assert_eq!(desc.column_index("name"), Some(1));
        assert_eq!(desc.column_index("missing"), None);
    }

    #[test]
    fn test_empty_declaration() {
        let desc = TableDescription {
            name: "Empty".into(),
            columns: Vec::new(),
        };
        assert_eq!(desc.declaration(), "CREATE TABLE x()");
    }
}
