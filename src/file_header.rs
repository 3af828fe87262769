//! File header of a WPILOG data log.
//!
//! Layout: `[magic "WPILOG"(6) | version(2) | extra_header_len(4) | extra_header(N)]`,
//! all integers little-endian. Records start right after the extra header.

use std::borrow::Cow;
use std::io;

use crate::varint::read_var_int;

/// Magic bytes at the start of every data log.
pub const HEADER_MAGIC: &[u8; 6] = b"WPILOG";

/// The only supported format version, exactly 1.0. Major version in the high byte.
pub const HEADER_VERSION: u16 = 0x0100;

/// Bytes before the extra-header length field.
pub const FIXED_HEADER_LEN: usize = 8;

/// Offset of the first byte of the extra header.
pub const EXTRA_HEADER_START: usize = FIXED_HEADER_LEN + 4;

/// Returns the offset where the record region starts.
///
/// Reads the extra-header length at byte 8 and skips past it. Nothing here
/// checks that the result is inside `data`; a buffer too short to hold the
/// length field, or a length pointing past the end, simply yields an offset
/// at which the scanner finds no records.
pub fn records_start(data: &[u8]) -> usize {
    if data.len() < EXTRA_HEADER_START {
        return EXTRA_HEADER_START;
    }
    let extra_len = read_var_int(data, FIXED_HEADER_LEN, 4) as usize;
    EXTRA_HEADER_START.saturating_add(extra_len)
}

/// Read-only view over the file header of a log buffer.
#[derive(Debug, Clone, Copy)]
pub struct LogHeader<'a> {
    data: &'a [u8],
}

impl<'a> LogHeader<'a> {
    /// Wraps a log buffer. Nothing is read until an accessor is called.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// True when the buffer carries the magic and version 1.0 exactly.
    pub fn is_valid(&self) -> bool {
        self.data.len() >= EXTRA_HEADER_START
            && &self.data[..HEADER_MAGIC.len()] == HEADER_MAGIC
            && self.version() == HEADER_VERSION
    }

    /// Format version, or 0 when the buffer is too short to hold a header.
    pub fn version(&self) -> u16 {
        if self.data.len() < EXTRA_HEADER_START {
            return 0;
        }
        read_var_int(self.data, HEADER_MAGIC.len(), 2) as u16
    }

    /// Declared length of the extra header, or 0 when there is no header.
    pub fn extra_header_len(&self) -> u32 {
        if self.data.len() < EXTRA_HEADER_START {
            return 0;
        }
        read_var_int(self.data, FIXED_HEADER_LEN, 4) as u32
    }

    /// Extra header bytes, clipped to the end of the buffer.
    pub fn extra_header_bytes(&self) -> &'a [u8] {
        if self.data.len() < EXTRA_HEADER_START {
            return &[];
        }
        let end = EXTRA_HEADER_START
            .saturating_add(self.extra_header_len() as usize)
            .min(self.data.len());
        &self.data[EXTRA_HEADER_START..end]
    }

    /// Extra header as text. Invalid UTF-8 is replaced.
    pub fn extra_header(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.extra_header_bytes())
    }

    /// Offset of the first record; see [`records_start`].
    pub fn records_start(&self) -> usize {
        records_start(self.data)
    }

    /// Fails with `InvalidData` unless [`is_valid`](Self::is_valid) holds.
    pub fn validate(&self) -> io::Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "not a WPILOG file (length {}, version {:#06x})",
                self.data.len(),
                self.version()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u16, extra: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(HEADER_MAGIC);
        data.extend_from_slice(&version.to_le_bytes());
        data.extend_from_slice(&(extra.len() as u32).to_le_bytes());
        data.extend_from_slice(extra);
        data
    }

    #[test]
    fn test_valid_header() {
        let data = header(0x0100, b"team=6328");
        let header = LogHeader::new(&data);
        assert!(header.is_valid());
        assert_eq!(header.version(), 0x0100);
        assert_eq!(header.extra_header(), "team=6328");
        assert_eq!(header.records_start(), 12 + 9);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_old_version_rejected() {
        let data = header(0x00FF, b"");
        let header = LogHeader::new(&data);
        assert!(!header.is_valid());
        let err = header.validate().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_newer_major_version_rejected() {
        let data = header(0x0200, b"");
        let view = LogHeader::new(&data);
        assert_eq!(view.version(), 0x0200);
        assert!(!view.is_valid());
        assert_eq!(view.validate().unwrap_err().kind(), io::ErrorKind::InvalidData);

        let data = header(0x0101, b"");
        assert!(!LogHeader::new(&data).is_valid());
    }

    #[test]
    fn test_wrong_magic() {
        let mut data = header(0x0100, b"");
        data[0] = b'X';
        assert!(!LogHeader::new(&data).is_valid());
    }

    #[test]
    fn test_short_buffer() {
        let data = b"WPILOG".to_vec();
        let header = LogHeader::new(&data);
        assert!(!header.is_valid());
        assert_eq!(header.version(), 0);
        assert_eq!(header.extra_header_len(), 0);
        assert!(header.extra_header_bytes().is_empty());
        assert_eq!(records_start(&data), 12);
    }

    #[test]
    fn test_extra_header_past_end_is_clipped() {
        let mut data = header(0x0100, b"abc");
        data[8..12].copy_from_slice(&1000u32.to_le_bytes());
        let header = LogHeader::new(&data);
        assert_eq!(header.extra_header_bytes(), b"abc");
        assert_eq!(header.records_start(), 1012);
    }
}
