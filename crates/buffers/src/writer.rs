//! Binary buffer writer with auto-growing capacity.

use crate::Endianness;

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use binmodel_buffers::{Endianness, Writer};
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.uint(0x0203, 2, Endianness::Big);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x02, 0x03]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with default allocation size (1KB).
    pub fn new() -> Self {
        Self::with_alloc_size(1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(1);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Bytes written since the last flush, without consuming them.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Drops everything written since the last flush.
    pub fn rewind(&mut self) {
        self.x = self.x0;
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Writes the low `size` bytes of an unsigned integer.
    ///
    /// Bits above `size * 8` are discarded; range checking is the caller's
    /// job.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not in `1..=8`.
    #[inline]
    pub fn uint(&mut self, val: u64, size: usize, endianness: Endianness) {
        assert!(
            (1..=8).contains(&size),
            "integer width must be 1 to 8 bytes, got {size}"
        );
        self.ensure_capacity(size);
        let dst = &mut self.uint8[self.x..self.x + size];
        match endianness {
            Endianness::Big => dst.copy_from_slice(&val.to_be_bytes()[8 - size..]),
            Endianness::Little => dst.copy_from_slice(&val.to_le_bytes()[..size]),
        }
        self.x += size;
    }

    /// Writes the low `size` bytes of a two's complement signed integer.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not in `1..=8`.
    #[inline]
    pub fn int(&mut self, val: i64, size: usize, endianness: Endianness) {
        self.uint(val as u64, size, endianness);
    }

    /// Writes a 32-bit floating point number.
    #[inline]
    pub fn f32(&mut self, val: f32, endianness: Endianness) {
        self.uint(val.to_bits() as u64, 4, endianness);
    }

    /// Writes a 64-bit floating point number.
    #[inline]
    pub fn f64(&mut self, val: f64, endianness: Endianness) {
        self.uint(val.to_bits(), 8, endianness);
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}
