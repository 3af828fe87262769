#![warn(missing_docs)]

//! # WPILOG Indexer
//!
//! Builds a compact seek index for WPILOG data logs: a sequence of
//! self-describing, variable-length binary records behind a small file header.
//!
//! One pass over the log produces:
//!
//! * the entry id and byte offset of every record, in file order
//! * the earliest and latest timestamp of the data records, in seconds
//! * the number of records indexed
//!
//! With the index, a reader can jump straight to any record instead of
//! rescanning the file. Payloads are never interpreted here.
//!
//! ## Main Components
//!
//! * `Indexer`: the decode-and-index pass
//! * `LogIndex`: the finished index and its byte layout
//! * `record`: framing byte decoding and random access to a record by offset
//! * `file_header`: magic, version and extra header of a log
//! * `loader`: reads a log file and indexes it
//!
//! ## Quick Start
//!
//! ```
//! use wpilog_indexer::{index, record::record_at};
//!
//! let mut log = b"WPILOG".to_vec();
//! log.extend_from_slice(&0x0100u16.to_le_bytes());
//! log.extend_from_slice(&0u32.to_le_bytes());
//! log.extend_from_slice(&[0x00, 1, 1, 10, 42]); // entry 1, t=10us, payload [42]
//! log.extend_from_slice(&[0x00, 1, 1, 30, 43]); // entry 1, t=30us, payload [43]
//!
//! let idx = index(&log);
//! assert_eq!(idx.record_count(), 2);
//!
//! for entry in idx.entries() {
//!     let record = record_at(&log, entry.offset as usize).unwrap();
//!     assert_eq!(record.entry_id(), entry.entry_id);
//! }
//! ```

pub mod file_header;
pub mod index_buffer;
pub mod indexer;
pub mod loader;
pub mod log_index;
pub mod record;
pub mod varint;

pub use file_header::LogHeader;
pub use index_buffer::IndexBuffer;
pub use indexer::{index, Indexer, IndexerOptions, TimestampRange};
pub use loader::{load_file, IndexedLog};
pub use log_index::{IndexEntry, LogIndex};
pub use record::{record_at, Record, RecordHeader, StopReason, CONTROL_ENTRY};
