use std::fmt;

use crate::error::{FdbError, Result};

/// Stable row identifier: `bucket | depth << log2(bucket_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(pub u64);

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chain node: a row plus the link to the next node in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub row: usize,
    pub next: Option<usize>,
}

/// Fixed-capacity bucket array with chained rows.
///
/// Nodes live in one arena; `heads[b]` is the first node of bucket `b`.
/// Chain order is the order found in the image and never changes.
#[derive(Debug, Clone)]
pub struct HashTable {
    bucket_count: u32,
    heads: Vec<Option<usize>>,
    nodes: Vec<Bucket>,
}

impl HashTable {
    pub(crate) fn new(bucket_count: u32) -> Result<Self> {
        if !bucket_count.is_power_of_two() {
            return Err(FdbError::malformed(
                "hash table",
                format!("bucket count {bucket_count} is not a power of two"),
            ));
        }
        Ok(Self {
            bucket_count,
            heads: vec![None; bucket_count as usize],
            nodes: Vec::new(),
        })
    }

    /// Appends a node holding `row` after `prev`, or as the head of `bucket`.
    pub(crate) fn push_node(&mut self, bucket: u32, prev: Option<usize>, row: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Bucket { row, next: None });
        match prev {
            Some(prev) => self.nodes[prev].next = Some(id),
            None => self.heads[bucket as usize] = Some(id),
        }
        id
    }

    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    pub fn mask(&self) -> u64 {
        self.bucket_count as u64 - 1
    }

    /// `log2(bucket_count)`.
    pub fn shift(&self) -> u32 {
        self.bucket_count.trailing_zeros()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn head(&self, bucket: u32) -> Option<usize> {
        self.heads.get(bucket as usize).copied().flatten()
    }

    pub fn node(&self, id: usize) -> &Bucket {
        &self.nodes[id]
    }

    /// Node ids of `bucket`, head first.
    pub fn chain(&self, bucket: u32) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head(bucket), move |&id| self.nodes[id].next)
    }

    /// The node `depth` links away from the head of `bucket`.
    pub fn node_at(&self, bucket: u32, depth: u64) -> Option<usize> {
        let depth = usize::try_from(depth).ok()?;
        self.chain(bucket).nth(depth)
    }

    pub fn non_empty_buckets(&self) -> usize {
        self.heads.iter().filter(|h| h.is_some()).count()
    }

    pub fn encode_handle(&self, bucket: u32, depth: u32) -> RowHandle {
        RowHandle(bucket as u64 | ((depth as u64) << self.shift()))
    }

    /// Splits a handle into `(bucket, depth)`.
    pub fn decode_handle(&self, handle: RowHandle) -> (u32, u64) {
        ((handle.0 & self.mask()) as u32, handle.0 >> self.shift())
    }

    /// Finds the node a handle refers to.
    pub fn resolve(&self, handle: RowHandle) -> Result<usize> {
        let (bucket, depth) = self.decode_handle(handle);
        self.node_at(bucket, depth)
            .ok_or(FdbError::RowNotFound { handle: handle.0 })
    }
}
