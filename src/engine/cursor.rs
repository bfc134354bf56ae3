//! Bucket-ranged scans over a table's hash index.
//!
//! A cursor walks positions `[start, stop)` of a [`ScanRange`]. Position `p`
//! reads bucket `p & (bucket_count - 1)`, and within a bucket the chain is
//! followed head first. Narrowing a range relies on the first column acting
//! as an identity hash of its key; that only decides which buckets are
//! visited. Rows inside a visited bucket are never filtered here, so
//! consumers must still check every row against their predicates.

use tracing::{debug, warn};

use crate::engine::catalog::TableHandle;
use crate::engine::database::Database;
use crate::engine::hash_table::RowHandle;
use crate::engine::table::Table;
use crate::error::{FdbError, Result};
use crate::records::codec::RowView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
    IsNull,
    IsNotNull,
}

impl Op {
    pub fn is_range(self) -> bool {
        matches!(self, Op::Eq | Op::Gt | Op::Ge | Op::Lt | Op::Le)
    }
}

/// `column <op> value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate {
    pub column: usize,
    pub op: Op,
    pub value: i64,
}

impl Predicate {
    pub fn new(column: usize, op: Op, value: i64) -> Self {
        Self { column, op, value }
    }

    /// A predicate on the key column.
    pub fn key(op: Op, value: i64) -> Self {
        Self::new(0, op, value)
    }
}

/// Half-open span of key positions a cursor will visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start: i64,
    pub stop: i64,
    pub bucket_count: u32,
}

impl ScanRange {
    pub fn full(bucket_count: u32) -> Self {
        Self {
            start: 0,
            stop: bucket_count as i64,
            bucket_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    /// Number of bucket positions in the range.
    pub fn len(&self) -> u64 {
        (self.stop as i128 - self.start as i128).max(0) as u64
    }

    pub fn is_narrowed(&self) -> bool {
        self.len() < self.bucket_count as u64
    }

    /// Planner estimate: the bucket count for a full scan, 1 otherwise.
    pub fn estimated_cost(&self) -> f64 {
        if self.is_narrowed() {
            1.0
        } else {
            self.bucket_count as f64
        }
    }

    /// Folds key predicates, in order, into a range of bucket positions.
    ///
    /// Starts from `[i64::MIN, i64::MAX)`. `Eq` replaces everything folded
    /// so far; the other operators only tighten. A span smaller than the
    /// bucket count is used as-is; anything wider becomes a full scan.
    pub fn fold(predicates: &[Predicate], bucket_count: u32) -> Self {
        // i128 so that `value + 1` never overflows
        let mut min = i64::MIN as i128;
        let mut max = i64::MAX as i128;

        for p in predicates {
            let value = p.value as i128;
            match p.op {
                Op::Gt => min = min.max(value + 1),
                Op::Ge => min = min.max(value),
                Op::Eq => {
                    min = value;
                    max = value + 1;
                }
                Op::Le => max = max.min(value + 1),
                Op::Lt => max = max.min(value),
                Op::Ne | Op::IsNull | Op::IsNotNull => {}
            }
        }

        if max <= min {
            let at = min.min(i64::MAX as i128) as i64;
            return Self {
                start: at,
                stop: at,
                bucket_count,
            };
        }

        let span = bucket_count as i128;
        if max - min >= span {
            return Self::full(bucket_count);
        }

        // A range ending just past i64::MAX is shifted down by one lap of
        // the bucket array; positions map to the same buckets.
        if max > i64::MAX as i128 {
            min -= span;
            max -= span;
        }
        Self {
            start: min as i64,
            stop: max as i64,
            bucket_count,
        }
    }
}

/// Checks that every predicate can narrow a scan of `table`.
pub fn check_predicates(table: &Table, predicates: &[Predicate]) -> Result<()> {
    for p in predicates {
        if p.column != 0 {
            return Err(FdbError::UnsupportedPredicate(format!(
                "only column 0 can be ranged, got column {}",
                p.column
            )));
        }
        if !p.op.is_range() {
            return Err(FdbError::UnsupportedPredicate(format!(
                "{:?} is not a range operator",
                p.op
            )));
        }
        match table.columns().first() {
            None => {
                return Err(FdbError::UnsupportedPredicate(format!(
                    "table {} has no columns",
                    table.name()
                )));
            }
            Some(key) if key.kind.is_string() => {
                return Err(FdbError::UnsupportedPredicate(format!(
                    "key column {} of {} is {}",
                    key.name,
                    table.name(),
                    key.kind
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Positioned over the whole table, no range applied.
    Unfiltered,
    /// Positioned on the first row of an applied range.
    Filtered,
    Iterating,
    Exhausted,
}

/// Scan position over one table.
///
/// A cursor holds indices only, so it can be kept across calls that
/// mutate row values; the table structure itself never changes.
#[derive(Debug, Clone)]
pub struct Cursor {
    table: TableHandle,
    range: ScanRange,
    position: i64,
    node: Option<usize>,
    depth: u32,
    state: CursorState,
}

impl Cursor {
    /// Binds a cursor to `table` and positions it on the first row of a full scan.
    pub fn open(db: &Database, table: TableHandle) -> Self {
        let t = db.table(table);
        let range = ScanRange::full(t.hash_table.bucket_count());
        let mut cursor = Self {
            table,
            range,
            position: range.start,
            node: None,
            depth: 0,
            state: CursorState::Unfiltered,
        };
        cursor.seek(t, range.start);
        if cursor.at_end() {
            cursor.state = CursorState::Exhausted;
        }
        cursor
    }

    pub fn table(&self) -> TableHandle {
        self.table
    }

    pub fn range(&self) -> ScanRange {
        self.range
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Restricts the scan to the buckets the key predicates can hit.
    ///
    /// On [`FdbError::UnsupportedPredicate`] the cursor is rewound to a full
    /// scan, so the caller can carry on and filter rows itself.
    pub fn apply_range(&mut self, db: &Database, predicates: &[Predicate]) -> Result<()> {
        let table = db.table(self.table);
        let bucket_count = table.hash_table.bucket_count();

        if let Err(err) = check_predicates(table, predicates) {
            warn!(table = %table.name(), %err, "predicate rejected, scanning whole table");
            self.range = ScanRange::full(bucket_count);
            self.seek(table, self.range.start);
            self.state = if self.at_end() {
                CursorState::Exhausted
            } else {
                CursorState::Unfiltered
            };
            return Err(err);
        }

        self.range = ScanRange::fold(predicates, bucket_count);
        debug!(
            table = %table.name(),
            start = self.range.start,
            stop = self.range.stop,
            narrowed = self.range.is_narrowed(),
            "applied scan range"
        );

        self.seek(table, self.range.start);
        self.state = if self.at_end() {
            CursorState::Exhausted
        } else {
            CursorState::Filtered
        };
        Ok(())
    }

    /// Moves to the next chain node, or to the head of the next non-empty
    /// bucket in range.
    pub fn advance(&mut self, db: &Database) {
        if self.at_end() {
            return;
        }
        let table = db.table(self.table);

        if let Some(next) = self.node.and_then(|id| table.hash_table.node(id).next) {
            self.node = Some(next);
            self.depth += 1;
            self.state = CursorState::Iterating;
            return;
        }

        self.seek(table, self.position + 1);
        self.state = if self.at_end() {
            CursorState::Exhausted
        } else {
            CursorState::Iterating
        };
    }

    pub fn at_end(&self) -> bool {
        self.position == self.range.stop
    }

    pub fn current_row<'a>(&self, db: &'a Database) -> Option<RowView<'a>> {
        let node = self.current_node()?;
        Some(RowView::new(db.image(), db.table(self.table).row_of(node)))
    }

    pub fn current_handle(&self, db: &Database) -> Option<RowHandle> {
        self.current_node()?;
        let hash_table = &db.table(self.table).hash_table;
        let bucket = (self.position as u64 & hash_table.mask()) as u32;
        Some(hash_table.encode_handle(bucket, self.depth))
    }

    fn current_node(&self) -> Option<usize> {
        if self.at_end() { None } else { self.node }
    }

    // Finds the first non-empty bucket at a position in `[from, stop)`.
    fn seek(&mut self, table: &Table, from: i64) {
        let hash_table = &table.hash_table;
        self.node = None;
        self.depth = 0;

        let mut position = from;
        while position < self.range.stop {
            let bucket = (position as u64 & hash_table.mask()) as u32;
            if let Some(head) = hash_table.head(bucket) {
                self.position = position;
                self.node = Some(head);
                return;
            }
            position += 1;
        }
        self.position = self.range.stop;
    }
}
