//! Record framing for the WPILOG data log format.
//!
//! Every record starts with a single framing byte that packs the byte widths
//! of the three header fields that follow it:
//!
//! ```text
//!  bit   7   6 5 4     3 2     1 0
//!      +---+-------+-------+-------+
//!      | - | ts-1  | size-1| id-1  |
//!      +---+-------+-------+-------+
//! ```
//!
//! Format: `[framing(1) | entry_id(1-4) | payload_size(1-4) | timestamp(1-8) | payload(N)]`

use std::fmt;

use crate::varint::read_var_int;

/// Entry id reserved for control records (start, finish, set metadata).
pub const CONTROL_ENTRY: u32 = 0;

/// Smallest number of bytes a record header can occupy.
///
/// The scanner stops once fewer than this many bytes remain.
pub const MIN_HEADER_LEN: usize = 4;

/// Byte widths of the fields described by one framing byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWidths {
    /// Bytes in the entry id field, 1 to 4.
    pub entry_id: u8,
    /// Bytes in the payload size field, 1 to 4.
    pub payload_size: u8,
    /// Bytes in the timestamp field, 1 to 8.
    pub timestamp: u8,
}

impl FieldWidths {
    /// Unpacks a framing byte. Each width is stored minus one.
    pub const fn from_framing_byte(byte: u8) -> Self {
        Self {
            entry_id: (byte & 0x3) + 1,
            payload_size: ((byte >> 2) & 0x3) + 1,
            timestamp: ((byte >> 4) & 0x7) + 1,
        }
    }

    /// Packs the widths back into a framing byte, leaving bit 7 clear.
    ///
    /// Widths outside `1..=4` / `1..=4` / `1..=8` are masked.
    pub const fn to_framing_byte(self) -> u8 {
        ((self.entry_id.wrapping_sub(1)) & 0x3)
            | (((self.payload_size.wrapping_sub(1)) & 0x3) << 2)
            | (((self.timestamp.wrapping_sub(1)) & 0x7) << 4)
    }

    /// Total header length: framing byte plus the three fields.
    pub const fn header_len(self) -> usize {
        1 + self.entry_id as usize + self.payload_size as usize + self.timestamp as usize
    }
}

/// Builds the decode table for every possible framing byte.
pub const fn build_framing_table() -> [FieldWidths; 256] {
    let mut table = [FieldWidths::from_framing_byte(0); 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = FieldWidths::from_framing_byte(byte as u8);
        byte += 1;
    }
    table
}

static FRAMING_TABLE: [FieldWidths; 256] = build_framing_table();

/// Looks up the field widths for a framing byte.
#[inline]
pub fn field_widths(framing: u8) -> FieldWidths {
    FRAMING_TABLE[framing as usize]
}

/// Why a scan over the record region stopped.
///
/// None of these are failures for the caller: everything decoded before
/// the stop is still indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Fewer than `MIN_HEADER_LEN` bytes remain.
    EndOfInput,
    /// The header declared by the framing byte runs past the end of the buffer.
    TruncatedHeader,
    /// The payload runs past the end of the buffer.
    TruncatedPayload,
    /// Entry id or payload size has its top bit set when read as `i32`.
    NegativeField,
    /// The record starts beyond what a 32-bit offset can address.
    OffsetOverflow,
    /// The output index could not grow.
    CapacityExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::EndOfInput => "end of input",
            StopReason::TruncatedHeader => "truncated record header",
            StopReason::TruncatedPayload => "truncated record payload",
            StopReason::NegativeField => "negative entry id or payload size",
            StopReason::OffsetOverflow => "record offset exceeds 32 bits",
            StopReason::CapacityExhausted => "index capacity exhausted",
        };
        f.write_str(text)
    }
}

/// Decoded header of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Log stream this record belongs to; `CONTROL_ENTRY` for control records.
    pub entry_id: u32,
    /// Length of the payload following the header.
    pub payload_size: u32,
    /// Microseconds since log start.
    pub timestamp: i64,
    /// Bytes occupied by the framing byte and the three fields.
    pub header_len: usize,
}

impl RecordHeader {
    /// Decodes and bounds-checks the record header at `offset`.
    ///
    /// Every field is checked against `data.len()` before it is read. On
    /// success the whole record, payload included, lies inside `data`.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, StopReason> {
        match offset.checked_add(MIN_HEADER_LEN) {
            Some(end) if end <= data.len() => {}
            _ => return Err(StopReason::EndOfInput),
        }

        let widths = field_widths(data[offset]);
        let header_len = widths.header_len();
        if offset + header_len > data.len() {
            return Err(StopReason::TruncatedHeader);
        }

        let id_at = offset + 1;
        let size_at = id_at + widths.entry_id as usize;
        let ts_at = size_at + widths.payload_size as usize;

        let entry_id = read_var_int(data, id_at, widths.entry_id as usize) as u32;
        let payload_size = read_var_int(data, size_at, widths.payload_size as usize) as u32;
        let timestamp = read_var_int(data, ts_at, widths.timestamp as usize) as i64;

        // A four byte field with its top bit set is treated as corrupt.
        if (entry_id as i32) < 0 || (payload_size as i32) < 0 {
            return Err(StopReason::NegativeField);
        }

        let record_len = header_len + payload_size as usize;
        if offset + record_len > data.len() {
            return Err(StopReason::TruncatedPayload);
        }

        Ok(Self {
            entry_id,
            payload_size,
            timestamp,
            header_len,
        })
    }

    /// Header plus payload length.
    #[inline]
    pub fn record_len(&self) -> usize {
        self.header_len + self.payload_size as usize
    }

    /// True for records on the control entry.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.entry_id == CONTROL_ENTRY
    }
}

/// A record located inside a log buffer.
///
/// The payload is handed out untouched; interpreting it depends on the
/// entry's declared type, which lives in a control record elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Offset of the framing byte in the log buffer.
    pub offset: usize,
    /// Decoded header fields.
    pub header: RecordHeader,
    /// Raw payload bytes, `header.payload_size` long.
    pub payload: &'a [u8],
}

impl Record<'_> {
    /// Log stream the record belongs to.
    pub fn entry_id(&self) -> u32 {
        self.header.entry_id
    }

    /// Timestamp in microseconds since log start.
    pub fn timestamp(&self) -> i64 {
        self.header.timestamp
    }

    /// Timestamp in seconds since log start.
    pub fn timestamp_seconds(&self) -> f64 {
        self.header.timestamp as f64 * 1.0e-6
    }

    /// True for control records (start, finish, set metadata).
    pub fn is_control(&self) -> bool {
        self.header.is_control()
    }

    /// Offset of the byte just past this record.
    pub fn end(&self) -> usize {
        self.offset + self.header.record_len()
    }
}

/// Reads the record whose framing byte is at `offset`.
///
/// Intended for offsets taken from a [`LogIndex`](crate::LogIndex). Returns
/// `None` when the bytes at `offset` do not form a complete record.
///
/// # Examples
///
/// ```
/// # use wpilog_indexer::record::record_at;
/// // framing 0x00: all widths one byte; entry 3, two payload bytes, t=7us
/// let data = [0x00, 3, 2, 7, 0xAB, 0xCD];
/// let record = record_at(&data, 0).unwrap();
/// assert_eq!(record.entry_id(), 3);
/// assert_eq!(record.timestamp(), 7);
/// assert_eq!(record.payload, &[0xAB, 0xCD]);
/// ```
pub fn record_at(data: &[u8], offset: usize) -> Option<Record<'_>> {
    let header = RecordHeader::decode(data, offset).ok()?;
    let start = offset + header.header_len;
    Some(Record {
        offset,
        header,
        payload: &data[start..start + header.payload_size as usize],
    })
}
