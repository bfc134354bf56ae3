pub mod helper;
pub mod load_flags;
