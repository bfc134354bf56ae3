use crate::metadata::schema::data_kind::DataKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub kind: DataKind,
}
