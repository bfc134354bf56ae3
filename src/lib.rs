//! Indexed, mutable access to FDB database snapshots.
//!
//! An FDB file is a fixed-layout image of hash-indexed tables whose fields
//! link to each other through 32-bit offsets. [`Database`] relocates the
//! whole image once, then serves schema lookups, bucket-ranged scans and
//! bounded in-place updates directly against the loaded bytes.
//!
//! ```no_run
//! use fdb_engine::{Database, Op, Predicate};
//!
//! # fn main() -> fdb_engine::Result<()> {
//! let db = Database::open(std::path::Path::new("cdclient.fdb"))?;
//! let objects = db.find_table("Objects")?;
//! for (handle, row) in db.scan(objects, &[Predicate::key(Op::Eq, 1727)]) {
//!     println!("{handle}: {}", row.get(1)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod helpers;
pub mod metadata;
pub mod records;
pub mod storage;

pub use engine::catalog::{Catalog, TableHandle};
pub use engine::cursor::{Cursor, CursorState, Op, Predicate, ScanRange};
pub use engine::database::{Database, LoadOptions, Scan};
pub use engine::hash_table::RowHandle;
pub use error::{FdbError, Result};
pub use helpers::load_flags::LoadFlags;
pub use metadata::schema::data_kind::DataKind;
pub use metadata::schema::table_column::TableColumn;
pub use records::codec::RowView;
pub use records::value::{Assignment, Value};
pub use storage::buffer_source::{BufferSource, FileSource, ProcessMemorySource, SliceSource};
pub use storage::image::{Image, SENTINEL};
