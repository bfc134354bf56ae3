use crate::error::{FdbError, Result};
use crate::helpers::helper::c_str_len;
use crate::storage::layout::RawRecord;

/// Offset value meaning "no pointer".
pub const SENTINEL: u32 = 0xFFFF_FFFF;

/// The loaded byte buffer backing a database.
///
/// Offsets stored in the image are relative to `base`, the position inside
/// the buffer where the image starts. Every position handed out by
/// [`Image::locate`] has been checked against the buffer extent.
#[derive(Debug, Clone)]
pub struct Image {
    bytes: Vec<u8>,
    base: usize,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, base: 0 }
    }

    pub fn with_base(bytes: Vec<u8>, base: usize) -> Result<Self> {
        if base > bytes.len() {
            return Err(FdbError::OutOfBounds {
                what: "image base",
                offset: base as u64,
                len: 0,
                image_len: bytes.len(),
            });
        }
        Ok(Self { bytes, base })
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Turns a stored offset into a buffer position without bounds checks.
    ///
    /// The sentinel is tested before the base is added, so an offset of zero
    /// is a real location (the image start).
    pub fn resolve(&self, raw: u32) -> Option<u64> {
        if raw == SENTINEL {
            return None;
        }
        Some(self.base as u64 + raw as u64)
    }

    /// Checks that `len` bytes starting at the absolute position `at` lie inside the buffer.
    pub fn check(&self, at: u64, len: usize, what: &'static str) -> Result<usize> {
        let end = at.checked_add(len as u64);
        match end {
            Some(end) if end <= self.bytes.len() as u64 => Ok(at as usize),
            _ => Err(FdbError::OutOfBounds {
                what,
                offset: at,
                len,
                image_len: self.bytes.len(),
            }),
        }
    }

    /// Resolves an optional offset to a region of `len` bytes.
    pub fn locate(&self, raw: u32, len: usize, what: &'static str) -> Result<Option<usize>> {
        match self.resolve(raw) {
            None => Ok(None),
            Some(at) => self.check(at, len, what).map(Some),
        }
    }

    /// Resolves an offset that must be present.
    pub fn require(&self, raw: u32, len: usize, what: &'static str) -> Result<usize> {
        self.locate(raw, len, what)?
            .ok_or_else(|| FdbError::malformed(what, "required offset is the absent sentinel"))
    }

    /// Resolves the start of an array of `count` elements of `elem` bytes.
    ///
    /// An empty array is never dereferenced, so its offset is not checked and
    /// may be anything, including the sentinel.
    pub fn require_array(&self, raw: u32, count: u32, elem: usize, what: &'static str) -> Result<usize> {
        if count == 0 {
            return Ok(self.base);
        }
        let len = (count as usize)
            .checked_mul(elem)
            .ok_or_else(|| FdbError::malformed(what, format!("{count} elements overflow")))?;
        self.require(raw, len, what)
    }

    /// Length (without terminator) of the NUL-terminated string at `at`.
    pub fn c_string(&self, at: usize, what: &'static str) -> Result<usize> {
        c_str_len(&self.bytes, at).ok_or(FdbError::OutOfBounds {
            what,
            offset: at as u64,
            len: self.bytes.len().saturating_sub(at) + 1,
            image_len: self.bytes.len(),
        })
    }

    pub fn record<T: RawRecord>(&self, at: usize) -> Result<T> {
        let at = self.check(at as u64, T::SIZE, T::WHAT)?;
        Ok(T::read_from(&self.bytes[at..at + T::SIZE]))
    }

    /// CRC32 over the image, from `base` to the end of the buffer.
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.bytes[self.base..])
    }
}
