pub mod data_kind;
pub mod table_column;
pub mod table_description;
