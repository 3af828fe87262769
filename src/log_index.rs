//! The finished index and its byte layout.
//!
//! A [`LogIndex`] owns the packed output buffer. It can come straight from the
//! indexer or be parsed back from bytes stored or sent elsewhere.

use std::io;

/// Bytes before the first entry.
pub const INDEX_HEADER_LEN: usize = 8 + 8 + 4;

/// Bytes per `(entry_id, offset)` entry.
pub const INDEX_ENTRY_LEN: usize = 4 + 4;

/// One indexed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Entry id of the record; `CONTROL_ENTRY` for control records.
    pub entry_id: u32,
    /// Offset of the record's framing byte in the log buffer.
    pub offset: u32,
}

/// Finished record index.
///
/// Byte layout, little-endian and packed:
///
/// ```text
/// [min_ts_secs: f64 | max_ts_secs: f64 | record_count: u32 | (entry_id: u32, offset: u32) * record_count]
/// ```
///
/// The layout is kept as-is so the buffer can be handed to consumers that
/// read it directly; the accessors below decode it on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct LogIndex {
    bytes: Vec<u8>,
}

fn read_f64(bytes: &[u8], at: usize) -> f64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    f64::from_le_bytes(raw)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

impl LogIndex {
    /// Wraps bytes already laid out by the index buffer.
    pub(crate) fn from_finalized(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= INDEX_HEADER_LEN);
        Self { bytes }
    }

    /// Parses an index buffer produced elsewhere.
    ///
    /// Fails with `InvalidData` if the buffer is shorter than the header or
    /// its length disagrees with the record count it declares.
    pub fn from_bytes(bytes: Vec<u8>) -> io::Result<Self> {
        if bytes.len() < INDEX_HEADER_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("index buffer too short: {} bytes", bytes.len()),
            ));
        }

        let count = read_u32(&bytes, 16) as usize;
        let expected = count
            .checked_mul(INDEX_ENTRY_LEN)
            .and_then(|len| len.checked_add(INDEX_HEADER_LEN));
        if expected != Some(bytes.len()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "index declares {} records but holds {} bytes",
                    count,
                    bytes.len()
                ),
            ));
        }

        Ok(Self { bytes })
    }

    /// Earliest data record timestamp, in seconds.
    pub fn min_timestamp(&self) -> f64 {
        read_f64(&self.bytes, 0)
    }

    /// Latest data record timestamp, in seconds.
    pub fn max_timestamp(&self) -> f64 {
        read_f64(&self.bytes, 8)
    }

    /// `(min_timestamp, max_timestamp)` in seconds. Both are 0 when the log
    /// holds no data records.
    pub fn timestamp_range(&self) -> (f64, f64) {
        (self.min_timestamp(), self.max_timestamp())
    }

    /// Number of records indexed, as stored in the header.
    pub fn record_count(&self) -> u32 {
        read_u32(&self.bytes, 16)
    }

    /// Number of entries, same as `record_count`.
    pub fn len(&self) -> usize {
        self.record_count() as usize
    }

    /// True when no record was indexed.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Returns the `i`th entry in file order, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<IndexEntry> {
        if i >= self.len() {
            return None;
        }
        let at = INDEX_HEADER_LEN + i * INDEX_ENTRY_LEN;
        Some(IndexEntry {
            entry_id: read_u32(&self.bytes, at),
            offset: read_u32(&self.bytes, at + 4),
        })
    }

    /// Iterates the entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.bytes[INDEX_HEADER_LEN..]
            .chunks_exact(INDEX_ENTRY_LEN)
            .map(|chunk| IndexEntry {
                entry_id: read_u32(chunk, 0),
                offset: read_u32(chunk, 4),
            })
    }

    /// The packed index bytes, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Gives up the packed index bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
