pub mod buffer_source;
pub mod image;
pub mod layout;
pub mod relocator;
