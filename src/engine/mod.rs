pub mod catalog;
pub mod cursor;
pub mod database;
pub mod hash_table;
pub mod table;
