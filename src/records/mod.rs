pub mod codec;
pub mod row;
pub mod value;
