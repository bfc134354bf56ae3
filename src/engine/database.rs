use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::engine::catalog::{Catalog, TableHandle};
use crate::engine::cursor::{Cursor, Predicate};
use crate::engine::hash_table::RowHandle;
use crate::engine::table::Table;
use crate::error::{FdbError, Result};
use crate::helpers::load_flags::LoadFlags;
use crate::metadata::schema::table_column::TableColumn;
use crate::records::codec::{self, Encoded, RowView};
use crate::records::value::Assignment;
use crate::storage::buffer_source::{BufferSource, FileSource};
use crate::storage::image::Image;
use crate::storage::relocator::Relocator;

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub flags: LoadFlags,
    /// CRC32 the image must have when [`LoadFlags::VERIFY_CHECKSUM`] is set.
    pub expected_checksum: Option<u32>,
    /// Position inside the buffer where the image starts.
    pub base: usize,
}

/// A loaded FDB image together with its relocated tables.
pub struct Database {
    image: Image,
    catalog: Catalog,
}

impl Database {
    /// Reads a snapshot file and loads it with default options.
    pub fn open(path: &Path) -> Result<Self> {
        Self::load_from_source(&FileSource::new(path), &LoadOptions::default())
    }

    pub fn load_from_source(source: &dyn BufferSource, options: &LoadOptions) -> Result<Self> {
        info!(source = %source.describe(), "loading FDB image");
        let bytes = source.read_buffer()?;
        let db = Self::load_with_options(bytes, options)?;
        info!(
            source = %source.describe(),
            tables = db.catalog.len(),
            bytes = db.image.len(),
            "loaded FDB image"
        );
        Ok(db)
    }

    pub fn load_from_buffer(bytes: Vec<u8>) -> Result<Self> {
        Self::load_with_options(bytes, &LoadOptions::default())
    }

    /// Relocates the whole image up front. Any format error discards the
    /// buffer; a `Database` only exists fully decoded.
    pub fn load_with_options(bytes: Vec<u8>, options: &LoadOptions) -> Result<Self> {
        let image = Image::with_base(bytes, options.base)?;

        if options.flags.contains(LoadFlags::VERIFY_CHECKSUM) {
            let actual = image.checksum();
            match options.expected_checksum {
                Some(expected) if expected != actual => {
                    return Err(FdbError::ChecksumMismatch { expected, actual });
                }
                Some(_) => debug!(checksum = actual, "image checksum verified"),
                None => warn!("checksum verification requested without an expected value"),
            }
        }

        let tables = Relocator::new(&image, options.flags).relocate()?;
        Ok(Self {
            image,
            catalog: Catalog::new(tables),
        })
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn checksum(&self) -> u32 {
        self.image.checksum()
    }

    pub fn find_table(&self, name: &str) -> Result<TableHandle> {
        self.catalog.find_table(name)
    }

    pub fn list_tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.catalog.list_tables()
    }

    pub fn columns(&self, table: TableHandle) -> &[TableColumn] {
        self.catalog.columns(table)
    }

    pub fn table(&self, table: TableHandle) -> &Table {
        self.catalog.table(table)
    }

    pub fn open_scan(&self, table: TableHandle) -> Cursor {
        Cursor::open(self, table)
    }

    /// Iterates the rows a ranged scan visits. Predicates that cannot narrow
    /// the scan are ignored and every bucket is visited.
    pub fn scan(&self, table: TableHandle, predicates: &[Predicate]) -> Scan<'_> {
        let mut cursor = self.open_scan(table);
        if let Err(err) = cursor.apply_range(self, predicates) {
            debug!(%err, "falling back to a full scan");
        }
        Scan { db: self, cursor }
    }

    pub fn resolve_handle(&self, table: TableHandle, handle: RowHandle) -> Result<RowView<'_>> {
        let t = self.table(table);
        let node = t.hash_table.resolve(handle)?;
        trace!(table = %t.name(), %handle, node, "resolved row handle");
        Ok(RowView::new(&self.image, t.row_of(node)))
    }

    /// Overwrites one column of the row behind `handle`, in place.
    pub fn update(
        &mut self,
        table: TableHandle,
        handle: RowHandle,
        column: usize,
        value: &Assignment<'_>,
    ) -> Result<()> {
        self.update_row(table, handle, &[(column, *value)])
    }

    /// Overwrites several columns of one row. Every assignment is checked
    /// before the first byte is written, so a failing call changes nothing.
    pub fn update_row(
        &mut self,
        table: TableHandle,
        handle: RowHandle,
        assignments: &[(usize, Assignment<'_>)],
    ) -> Result<()> {
        let t = self.catalog.table(table);
        let row = t.row_of(t.hash_table.resolve(handle)?);

        let mut writes: Vec<(usize, Encoded<'_>)> = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            if *column >= row.len() {
                return Err(FdbError::ColumnOutOfRange {
                    index: *column,
                    count: row.len(),
                });
            }
            writes.push((*column, codec::prepare(&row.values[*column], value)?));
        }

        for (column, encoded) in writes {
            codec::apply(&mut self.image, &row.values[column], encoded);
        }
        debug!(table = %t.name(), %handle, columns = assignments.len(), "updated row");
        Ok(())
    }

    /// Writes the image bytes, including any in-place updates, to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.image.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        info!(path = %path.display(), bytes = self.image.len(), "saved FDB image");
        Ok(())
    }
}

/// Iterator form of a [`Cursor`], yielding each visited row with its handle.
pub struct Scan<'a> {
    db: &'a Database,
    cursor: Cursor,
}

impl<'a> Scan<'a> {
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl<'a> Iterator for Scan<'a> {
    type Item = (RowHandle, RowView<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor.current_handle(self.db)?;
        let row = self.cursor.current_row(self.db)?;
        self.cursor.advance(self.db);
        Some((handle, row))
    }
}
