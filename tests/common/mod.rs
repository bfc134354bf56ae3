//! Lays out FDB images for tests.

#![allow(dead_code)]

use std::collections::HashMap;

use fdb_engine::{DataKind, SENTINEL};

#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    I32(i32),
    U32(u32),
    F32(f32),
    Text(String),
    Bool(bool),
    I64(i64),
    U64(u64),
    Other(String),
}

impl Cell {
    pub fn kind(&self) -> DataKind {
        match self {
            Cell::Null => DataKind::Null,
            Cell::I32(_) => DataKind::Int32,
            Cell::U32(_) => DataKind::UInt32,
            Cell::F32(_) => DataKind::Float32,
            Cell::Text(_) => DataKind::StringInline,
            Cell::Bool(_) => DataKind::Bool,
            Cell::I64(_) => DataKind::Int64,
            Cell::U64(_) => DataKind::UInt64,
            Cell::Other(_) => DataKind::StringOther,
        }
    }
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub struct TableSpec {
    pub name: String,
    pub columns: Vec<(String, DataKind)>,
    pub bucket_count: u32,
    /// `chains[b]` lists the rows of bucket `b`, head first.
    pub chains: Vec<Vec<Vec<Cell>>>,
}

impl TableSpec {
    pub fn new(name: &str, columns: &[(&str, DataKind)], bucket_count: u32) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|(n, k)| (n.to_string(), *k)).collect(),
            bucket_count,
            chains: vec![Vec::new(); bucket_count as usize],
        }
    }

    /// Appends a row to the tail of `bucket`'s chain.
    pub fn row(mut self, bucket: u32, cells: Vec<Cell>) -> Self {
        self.chains[bucket as usize].push(cells);
        self
    }
}

pub struct Built {
    pub bytes: Vec<u8>,
    /// (table, bucket, depth, column) -> position of the value record
    pub values: HashMap<(usize, u32, usize, usize), usize>,
}

impl Built {
    pub fn value_record(&self, table: usize, bucket: u32, depth: usize, column: usize) -> usize {
        self.values[&(table, bucket, depth, column)]
    }

    pub fn patch_u32(&mut self, at: usize, v: u32) {
        self.bytes[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn alloc(&mut self, len: usize) -> usize {
        let at = self.buf.len();
        self.buf.resize(at + len, 0);
        at
    }

    fn put(&mut self, at: usize, v: u32) {
        self.buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn pair(&mut self, at: usize, a: u32, b: u32) {
        self.put(at, a);
        self.put(at + 4, b);
    }

    fn c_str(&mut self, s: &str) -> u32 {
        let at = self.alloc(s.len() + 1);
        self.buf[at..at + s.len()].copy_from_slice(s.as_bytes());
        at as u32
    }

    fn cell64(&mut self, v: u64) -> u32 {
        let at = self.alloc(8);
        self.buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
        at as u32
    }
}

pub fn build(tables: &[TableSpec]) -> Built {
    let mut w = Writer { buf: Vec::new() };
    let mut values = HashMap::new();

    let root = w.alloc(8);
    let tables_at = w.alloc(tables.len() * 8);
    w.pair(root, tables.len() as u32, tables_at as u32);

    for (t, spec) in tables.iter().enumerate() {
        let desc_at = w.alloc(12);
        let name_at = w.c_str(&spec.name);
        let columns_at = w.alloc(spec.columns.len() * 8);
        for (c, (name, kind)) in spec.columns.iter().enumerate() {
            let col_name = w.c_str(name);
            w.pair(columns_at + c * 8, kind.code(), col_name);
        }
        w.put(desc_at, spec.columns.len() as u32);
        w.pair(desc_at + 4, name_at, columns_at as u32);

        let hash_at = w.alloc(8);
        let slots_at = w.alloc(spec.bucket_count as usize * 4);
        w.pair(hash_at, spec.bucket_count, slots_at as u32);
        w.pair(tables_at + t * 8, desc_at as u32, hash_at as u32);

        for bucket in 0..spec.bucket_count {
            let slot = slots_at + bucket as usize * 4;
            w.put(slot, SENTINEL);
            let mut prev: Option<usize> = None;

            for (depth, cells) in spec.chains[bucket as usize].iter().enumerate() {
                let node_at = w.alloc(8);
                let row_at = w.alloc(8);
                let values_at = w.alloc(cells.len() * 8);
                w.pair(node_at, row_at as u32, SENTINEL);
                w.pair(row_at, cells.len() as u32, values_at as u32);

                for (c, cell) in cells.iter().enumerate() {
                    let value_at = values_at + c * 8;
                    values.insert((t, bucket, depth, c), value_at);
                    let payload = match cell {
                        Cell::Null => 0,
                        Cell::I32(v) => *v as u32,
                        Cell::U32(v) => *v,
                        Cell::F32(v) => v.to_bits(),
                        Cell::Bool(v) => *v as u32,
                        Cell::I64(v) => w.cell64(*v as u64),
                        Cell::U64(v) => w.cell64(*v),
                        Cell::Text(s) | Cell::Other(s) => w.c_str(s),
                    };
                    w.pair(value_at, cell.kind().code(), payload);
                }

                match prev {
                    Some(prev) => w.put(prev + 4, node_at as u32),
                    None => w.put(slot, node_at as u32),
                }
                prev = Some(node_at);
            }
        }
    }

    Built { bytes: w.buf, values }
}

pub const OBJECTS_COLUMNS: &[(&str, DataKind)] = &[
    ("id", DataKind::Int32),
    ("name", DataKind::StringInline),
    ("scale", DataKind::Float32),
    ("active", DataKind::Bool),
    ("big", DataKind::Int64),
    ("mask", DataKind::UInt64),
    ("notes", DataKind::StringOther),
    ("count", DataKind::UInt32),
    ("unused", DataKind::Null),
];

pub fn object_row(id: i32, name: &str) -> Vec<Cell> {
    vec![
        Cell::I32(id),
        text(name),
        Cell::F32(1.5),
        Cell::Bool(true),
        Cell::I64(id as i64 * 1_000_000_000_000),
        Cell::U64(u64::MAX - id as u64),
        Cell::Other(format!("notes for {name}")),
        Cell::U32(id as u32),
        Cell::Null,
    ]
}

/// "Objects": 8 buckets keyed by `id & 7`. Bucket 3 chains ids 3 then 11;
/// buckets 4 and 6 are empty.
/// "Icons": string-keyed, 2 buckets.
pub fn sample() -> Built {
    let objects = TableSpec::new("Objects", OBJECTS_COLUMNS, 8)
        .row(0, object_row(0, "zero"))
        .row(1, object_row(1, "one"))
        .row(2, object_row(2, "two"))
        .row(3, object_row(3, "three"))
        .row(3, object_row(11, "eleven"))
        .row(5, object_row(5, "five"))
        .row(7, object_row(7, "seven"));

    let icons = TableSpec::new(
        "Icons",
        &[("path", DataKind::StringOther), ("id", DataKind::Int32)],
        2,
    )
    .row(0, vec![Cell::Other("a.dds".into()), Cell::I32(10)])
    .row(1, vec![Cell::Other("b.dds".into()), Cell::I32(11)]);

    build(&[objects, icons])
}
