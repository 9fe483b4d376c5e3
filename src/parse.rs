//! Shared winnow-based parsing utilities used by the GMA and TPL readers.

use winnow::Parser;
use winnow::binary::{be_u16, be_u32};
use winnow::error::ContextError;

/// Parse a big-endian u32 from `file_data` at an absolute `offset`.
///
/// Returns `None` if the read would extend past the end of the data.
pub fn be_u32_at(file_data: &[u8], offset: usize) -> Option<u32> {
    let input = &mut file_data.get(offset..offset + 4)?;
    be_u32::<_, ContextError>.parse_next(input).ok()
}

/// Parse a big-endian u16 from `file_data` at an absolute `offset`.
pub fn be_u16_at(file_data: &[u8], offset: usize) -> Option<u16> {
    let input = &mut file_data.get(offset..offset + 2)?;
    be_u16::<_, ContextError>.parse_next(input).ok()
}

/// Scan a null-terminated string starting at `offset`, bounded by `limit`
/// (an absolute offset at or before `file_data.len()`).
///
/// Returns the string bytes (terminator excluded) and the total scanned
/// length (terminator included), or `None` if no terminator exists before
/// the limit. The whole remaining region is scanned in one pass rather
/// than probing a byte at a time.
pub fn scan_null_terminated(file_data: &[u8], offset: usize, limit: usize) -> Option<(&[u8], usize)> {
    let region = file_data.get(offset..limit.min(file_data.len()))?;
    let end = region.iter().position(|&b| b == 0)?;
    Some((&region[..end], end + 1))
}
