//! Little-endian variable width integers.
//!
//! Record headers store their fields with a per-record byte width between
//! one and eight bytes. The reader here only combines bytes; callers are
//! expected to have checked that the bytes exist.

/// Reads an unsigned little-endian integer `width` bytes wide starting at `offset`.
///
/// Byte `i` contributes `data[offset + i] << (8 * i)`. No sign extension is
/// performed.
///
/// # Panics
///
/// Panics if `offset + width` is past the end of `data` or `width > 8`.
/// The scanner bounds-checks every field before calling this.
///
/// # Examples
///
/// ```
/// # use wpilog_indexer::varint::read_var_int;
/// let data = [0xAA, 0x34, 0x12, 0xFF];
/// assert_eq!(read_var_int(&data, 1, 2), 0x1234);
/// ```
#[inline]
pub fn read_var_int(data: &[u8], offset: usize, width: usize) -> u64 {
    debug_assert!(width <= 8, "field width {} exceeds 8 bytes", width);
    data[offset..offset + width]
        .iter()
        .enumerate()
        .fold(0u64, |value, (i, &byte)| value | ((byte as u64) << (8 * i)))
}
