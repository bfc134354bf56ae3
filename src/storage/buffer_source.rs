//! Places a raw FDB buffer can come from.
//!
//! The core engine only ever sees a `Vec<u8>`; sources are optional and
//! sit entirely outside it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub trait BufferSource {
    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;

    fn read_buffer(&self) -> Result<Vec<u8>>;
}

/// A snapshot file on disk, read whole.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl BufferSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_buffer(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Bytes that are already in memory.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl BufferSource for SliceSource<'_> {
    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.bytes.len())
    }

    fn read_buffer(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

/// A region of another process's address space holding an unrelocated image.
///
/// Reads go through `/proc/<pid>/mem`, so the caller needs ptrace access to
/// the target. Only available on Linux; elsewhere `read_buffer` reports
/// [`FdbError::Unsupported`](crate::error::FdbError::Unsupported).
#[derive(Debug, Clone, Copy)]
pub struct ProcessMemorySource {
    pub pid: u32,
    pub address: u64,
    pub len: usize,
}

impl BufferSource for ProcessMemorySource {
    fn describe(&self) -> String {
        format!("pid {} @ {:#x} (+{} bytes)", self.pid, self.address, self.len)
    }

    #[cfg(target_os = "linux")]
    fn read_buffer(&self) -> Result<Vec<u8>> {
        use std::os::unix::fs::FileExt;

        let mem = fs::File::open(format!("/proc/{}/mem", self.pid))?;
        let mut buf = vec![0u8; self.len];
        mem.read_exact_at(&mut buf, self.address)?;
        Ok(buf)
    }

    #[cfg(not(target_os = "linux"))]
    fn read_buffer(&self) -> Result<Vec<u8>> {
        Err(crate::error::FdbError::Unsupported("process memory source on this platform"))
    }
}
