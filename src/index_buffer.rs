//! Output buffer the indexer writes into.
//!
//! Entries are appended in place behind a reserved header, so finishing the
//! index is a header write rather than a copy.

use tracing::trace;

use crate::log_index::{LogIndex, INDEX_ENTRY_LEN, INDEX_HEADER_LEN};

/// Entries reserved before the first record is indexed.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10_000;

/// Returned when the index cannot grow to hold another entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExhausted;

/// Growable output buffer for the record index.
///
/// The buffer holds the final index layout from the start: a header that is
/// left zeroed until [`IndexBuffer::finalize`], followed by one packed
/// `(entry_id, offset)` pair per record. Capacity is counted in entries and
/// doubles whenever a push would exceed it.
///
/// # Growth Failure
///
/// Growing uses a fallible reservation. If the allocator refuses, or the
/// doubled capacity would exceed the configured maximum, the push fails with
/// [`CapacityExhausted`] and every entry written so far stays intact. The
/// indexer treats this as the end of the scan rather than an error.
#[derive(Debug)]
pub struct IndexBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    max_capacity: usize,
    count: u32,
}

impl IndexBuffer {
    /// Creates a buffer with room for `DEFAULT_INITIAL_CAPACITY` entries and no growth cap.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, usize::MAX)
    }

    /// Creates a buffer for `initial` entries that will never grow past `max_capacity`.
    pub fn with_capacity(initial: usize, max_capacity: usize) -> Self {
        let mut capacity = initial.min(max_capacity);
        let mut bytes = Vec::new();
        let wanted = capacity
            .checked_mul(INDEX_ENTRY_LEN)
            .and_then(|len| len.checked_add(INDEX_HEADER_LEN));
        let reserved = match wanted {
            Some(len) => bytes.try_reserve_exact(len).is_ok(),
            None => false,
        };
        if !reserved {
            capacity = 0;
        }
        bytes.resize(INDEX_HEADER_LEN, 0);

        Self {
            bytes,
            capacity,
            max_capacity,
            count: 0,
        }
    }

    /// Appends one record's entry id and offset.
    ///
    /// Both values are written together or not at all.
    pub fn push(&mut self, entry_id: u32, offset: u32) -> Result<(), CapacityExhausted> {
        if self.count as usize >= self.capacity {
            self.grow()?;
        }
        self.bytes.extend_from_slice(&entry_id.to_le_bytes());
        self.bytes.extend_from_slice(&offset.to_le_bytes());
        self.count += 1;
        Ok(())
    }

    fn grow(&mut self) -> Result<(), CapacityExhausted> {
        let requested = match self.capacity {
            0 => 1,
            capacity => capacity.checked_mul(2).ok_or(CapacityExhausted)?,
        };
        if requested > self.max_capacity {
            return Err(CapacityExhausted);
        }

        let additional = (requested - self.count as usize)
            .checked_mul(INDEX_ENTRY_LEN)
            .ok_or(CapacityExhausted)?;
        self.bytes
            .try_reserve_exact(additional)
            .map_err(|_| CapacityExhausted)?;

        trace!(from = self.capacity, to = requested, "growing record index");
        self.capacity = requested;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// True until the first entry is pushed.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current capacity in entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes the header and hands the buffer over as a finished index.
    ///
    /// Timestamps are given in microseconds and stored as seconds.
    pub fn finalize(mut self, min_timestamp: i64, max_timestamp: i64) -> LogIndex {
        let min_seconds = min_timestamp as f64 * 1.0e-6;
        let max_seconds = max_timestamp as f64 * 1.0e-6;
        self.bytes[0..8].copy_from_slice(&min_seconds.to_le_bytes());
        self.bytes[8..16].copy_from_slice(&max_seconds.to_le_bytes());
        self.bytes[16..20].copy_from_slice(&self.count.to_le_bytes());
        LogIndex::from_finalized(self.bytes)
    }
}

impl Default for IndexBuffer {
    fn default() -> Self {
        Self::new()
    }
}
