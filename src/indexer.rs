//! The decode-and-index pass.
//!
//! Walks the record region once, pushing an `(entry_id, offset)` pair per
//! record and keeping the timestamp range of data records.

use tracing::debug;

use crate::file_header::records_start;
use crate::index_buffer::{IndexBuffer, DEFAULT_INITIAL_CAPACITY};
use crate::log_index::LogIndex;
use crate::record::{RecordHeader, StopReason};

/// Decode-and-index pass over a WPILOG buffer.
///
/// The indexer walks every record after the file header and writes one
/// `(entry_id, offset)` pair per record into a [`LogIndex`], tracking the
/// timestamp range of the data (non-control) records on the way.
///
/// # Stopping
///
/// Scanning is best-effort. It ends at the first record that does not fit in
/// the buffer, has a corrupt size field, or cannot be added to the index.
/// Nothing past that point is trusted, since record boundaries can't be
/// recovered without a valid length. Everything before it is returned.
///
/// # Examples
///
/// ```
/// # use wpilog_indexer::Indexer;
/// let mut log = b"WPILOG".to_vec();
/// log.extend_from_slice(&0x0100u16.to_le_bytes());
/// log.extend_from_slice(&0u32.to_le_bytes());
/// // one data record: entry 5, no payload, t=2s
/// log.extend_from_slice(&[0x20, 5, 0]);
/// log.extend_from_slice(&2_000_000u32.to_le_bytes()[..3]);
///
/// let index = Indexer::new().run(&log);
/// assert_eq!(index.record_count(), 1);
/// assert!((index.max_timestamp() - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Indexer {
    options: IndexerOptions,
}

/// Tuning for the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexerOptions {
    /// Entries allocated up front.
    pub initial_capacity: usize,
    /// Largest capacity the index may double to. Growth past it stops the
    /// scan the same way an allocation failure does.
    pub max_capacity: usize,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: usize::MAX,
        }
    }
}

/// Running min/max over data record timestamps, in microseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimestampRange {
    bounds: Option<(i64, i64)>,
}

impl TimestampRange {
    /// Widens the range to include `timestamp`. The first call sets both bounds.
    pub fn observe(&mut self, timestamp: i64) {
        self.bounds = Some(match self.bounds {
            None => (timestamp, timestamp),
            Some((min, max)) => (min.min(timestamp), max.max(timestamp)),
        });
    }

    /// Smallest timestamp seen, or 0 before the first one.
    pub fn min(&self) -> i64 {
        self.bounds.map_or(0, |(min, _)| min)
    }

    /// Largest timestamp seen, or 0 before the first one.
    pub fn max(&self) -> i64 {
        self.bounds.map_or(0, |(_, max)| max)
    }

    /// True until the first timestamp is observed.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }
}

impl Indexer {
    /// Creates an indexer with default options.
    pub fn new() -> Self {
        Self::with_options(IndexerOptions::default())
    }

    /// Creates an indexer with the given buffer options.
    pub fn with_options(options: IndexerOptions) -> Self {
        Self { options }
    }

    /// Options this indexer runs with.
    pub fn options(&self) -> &IndexerOptions {
        &self.options
    }

    /// Indexes `data`. Never fails; a damaged log yields a shorter index.
    pub fn run(&self, data: &[u8]) -> LogIndex {
        let mut output =
            IndexBuffer::with_capacity(self.options.initial_capacity, self.options.max_capacity);
        let mut range = TimestampRange::default();
        let mut offset = records_start(data);

        let stop = loop {
            let header = match RecordHeader::decode(data, offset) {
                Ok(header) => header,
                Err(reason) => break reason,
            };
            let Ok(position) = u32::try_from(offset) else {
                break StopReason::OffsetOverflow;
            };

            // The pair goes in before the range moves so a refused push
            // leaves both untouched.
            if output.push(header.entry_id, position).is_err() {
                break StopReason::CapacityExhausted;
            }
            if !header.is_control() {
                range.observe(header.timestamp);
            }

            offset += header.record_len();
        };

        debug!(
            records = output.len(),
            stopped_at = offset,
            buffer_len = data.len(),
            reason = %stop,
            "finished indexing"
        );
        output.finalize(range.min(), range.max())
    }
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Indexes `data` with default options.
pub fn index(data: &[u8]) -> LogIndex {
    Indexer::new().run(data)
}
