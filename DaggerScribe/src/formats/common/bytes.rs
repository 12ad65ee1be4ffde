//! Bounds-checked little-endian field extraction
//!
//! Callers validate `offset + width <= len` once per section (the formats are
//! dense fixed layouts), so the per-field reads below never fail. A read that
//! would run past the buffer yields zero instead of panicking.

use byteorder::{ByteOrder, LittleEndian};

/// Read-only view over a byte buffer with little-endian accessors.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying buffer.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Whether `width` bytes starting at `offset` lie inside the buffer.
    #[must_use]
    pub fn fits(&self, offset: usize, width: usize) -> bool {
        offset
            .checked_add(width)
            .is_some_and(|end| end <= self.data.len())
    }

    fn window(&self, offset: usize, width: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(width)?;
        debug_assert!(
            end <= self.data.len(),
            "read of {width} bytes at {offset:#x} overruns {}-byte buffer",
            self.data.len()
        );
        self.data.get(offset..end)
    }

    #[must_use]
    pub fn u8(&self, offset: usize) -> u8 {
        self.window(offset, 1).map_or(0, |b| b[0])
    }

    #[must_use]
    pub fn u16(&self, offset: usize) -> u16 {
        self.window(offset, 2).map_or(0, LittleEndian::read_u16)
    }

    #[must_use]
    pub fn i16(&self, offset: usize) -> i16 {
        self.window(offset, 2).map_or(0, LittleEndian::read_i16)
    }

    #[must_use]
    pub fn u32(&self, offset: usize) -> u32 {
        self.window(offset, 4).map_or(0, LittleEndian::read_u32)
    }

    #[must_use]
    pub fn i32(&self, offset: usize) -> i32 {
        self.window(offset, 4).map_or(0, LittleEndian::read_i32)
    }

    /// Copy `N` raw bytes starting at `offset`.
    #[must_use]
    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(src) = self.window(offset, N) {
            out.copy_from_slice(src);
        }
        out
    }

    /// Fixed-length string field: up to `max_len` bytes, stopping at the first NUL.
    #[must_use]
    pub fn fixed_str(&self, offset: usize, max_len: usize) -> String {
        let end = offset.saturating_add(max_len).min(self.data.len());
        nul_terminated(self.data.get(offset..end).unwrap_or_default())
    }
}

/// Text up to the first NUL of a fixed-size byte field.
#[must_use]
pub fn nul_terminated(field: &[u8]) -> String {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_fields() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF];
        let r = ByteReader::new(&data);
        assert_eq!(r.u16(0), 0x1234);
        assert_eq!(r.u32(2), 0x12345678);
        assert_eq!(r.i16(6), -1);
        assert_eq!(r.u8(7), 0xFF);
    }

    #[test]
    fn test_fits() {
        let data = [0u8; 8];
        let r = ByteReader::new(&data);
        assert!(r.fits(4, 4));
        assert!(!r.fits(5, 4));
        assert!(!r.fits(usize::MAX, 2));
    }

    #[test]
    fn test_fixed_str_stops_at_nul() {
        let data = b"npc1\0garbage";
        let r = ByteReader::new(data);
        assert_eq!(r.fixed_str(0, 20), "npc1");
        assert_eq!(r.fixed_str(5, 3), "gar");
        assert_eq!(r.fixed_str(100, 4), "");
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_overrun_reads_zero() {
        let data = [1u8, 2];
        let r = ByteReader::new(&data);
        assert_eq!(r.u32(0), 0);
    }
}
