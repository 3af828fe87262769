#![allow(dead_code)]

use wpilog_indexer::record::FieldWidths;

/// Builds synthetic WPILOG buffers for tests.
pub struct LogBuilder {
    data: Vec<u8>,
}

/// Fewest bytes (at least one) that hold `value`.
pub fn min_width(value: u64) -> u8 {
    let bits = 64 - value.leading_zeros();
    bits.div_ceil(8).max(1) as u8
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::with_extra_header(b"")
    }

    pub fn with_extra_header(extra: &[u8]) -> Self {
        let mut data = Vec::new();
        data.extend_from_slice(b"WPILOG");
        data.extend_from_slice(&0x0100u16.to_le_bytes());
        data.extend_from_slice(&(extra.len() as u32).to_le_bytes());
        data.extend_from_slice(extra);
        Self { data }
    }

    /// Appends a record using the narrowest widths. Returns its offset.
    pub fn record(&mut self, entry_id: u32, timestamp: u64, payload: &[u8]) -> usize {
        let widths = FieldWidths {
            entry_id: min_width(entry_id as u64),
            payload_size: min_width(payload.len() as u64),
            timestamp: min_width(timestamp),
        };
        self.record_with_widths(widths, entry_id, timestamp, payload)
    }

    /// Appends a record with explicit field widths. Returns its offset.
    pub fn record_with_widths(
        &mut self,
        widths: FieldWidths,
        entry_id: u32,
        timestamp: u64,
        payload: &[u8],
    ) -> usize {
        let offset = self.data.len();
        self.data.push(widths.to_framing_byte());
        self.data
            .extend_from_slice(&(entry_id as u64).to_le_bytes()[..widths.entry_id as usize]);
        self.data.extend_from_slice(
            &(payload.len() as u64).to_le_bytes()[..widths.payload_size as usize],
        );
        self.data
            .extend_from_slice(&timestamp.to_le_bytes()[..widths.timestamp as usize]);
        self.data.extend_from_slice(payload);
        offset
    }

    /// Appends raw bytes after the records.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
