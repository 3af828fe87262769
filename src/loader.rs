//! Loads a log file from disk and indexes it.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::file_header::LogHeader;
use crate::indexer::Indexer;
use crate::log_index::LogIndex;

/// A log file read into memory together with its index.
///
/// Keeps the raw bytes around so indexed offsets can be resolved with
/// [`record_at`](crate::record::record_at).
#[derive(Debug)]
pub struct IndexedLog {
    /// Raw file contents.
    pub data: Vec<u8>,
    /// Index over `data`.
    pub index: LogIndex,
}

impl IndexedLog {
    /// File header view over `data`.
    pub fn header(&self) -> LogHeader<'_> {
        LogHeader::new(&self.data)
    }
}

/// Reads the file at `path` and indexes it.
///
/// With `strict` set, a file without a valid WPILOG header is rejected with
/// `InvalidData`; otherwise it is only logged and indexed anyway.
pub fn load_file(path: impl AsRef<Path>, indexer: &Indexer, strict: bool) -> io::Result<IndexedLog> {
    let path = path.as_ref();
    let data = fs::read(path)?;

    let header = LogHeader::new(&data);
    if !header.is_valid() {
        if strict {
            header.validate()?;
        }
        warn!(path = %path.display(), version = header.version(), "missing or unsupported WPILOG header");
    }

    let index = indexer.run(&data);
    info!(
        path = %path.display(),
        bytes = data.len(),
        records = index.record_count(),
        "indexed log file"
    );
    Ok(IndexedLog { data, index })
}
