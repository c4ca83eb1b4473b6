//! Binary buffer reader with cursor tracking.

use std::str;

use crate::{BufferError, Endianness};

/// A binary buffer reader over a borrowed byte slice.
///
/// Every read is bounds-checked and reports [`BufferError::EndOfBuffer`]
/// instead of panicking, leaving the cursor where it was.
///
/// # Example
///
/// ```
/// use binmodel_buffers::{Endianness, Reader};
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8().unwrap(), 0x01);
/// assert_eq!(reader.try_uint(2, Endianness::Big).unwrap(), 0x0203);
/// assert_eq!(reader.size(), 1);
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader positioned at `x` in `uint8`.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        let end = uint8.len();
        Self {
            uint8,
            x: x.min(end),
            end,
        }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.size();
        if n > remaining {
            Err(BufferError::EndOfBuffer {
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by `length` bytes.
    pub fn try_skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        self.x += size;
        Ok(&self.uint8[x..self.x])
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned integer stored in `size` bytes.
    ///
    /// A `size` outside `1..=8` fails with [`BufferError::InvalidWidth`]
    /// without moving the cursor.
    pub fn try_uint(&mut self, size: usize, endianness: Endianness) -> Result<u64, BufferError> {
        if !(1..=8).contains(&size) {
            return Err(BufferError::InvalidWidth(size));
        }
        let bytes = self.try_buf(size)?;
        let mut wide = [0u8; 8];
        let val = match endianness {
            Endianness::Big => {
                wide[8 - size..].copy_from_slice(bytes);
                u64::from_be_bytes(wide)
            }
            Endianness::Little => {
                wide[..size].copy_from_slice(bytes);
                u64::from_le_bytes(wide)
            }
        };
        Ok(val)
    }

    /// Reads a two's complement signed integer stored in `size` bytes and
    /// sign-extends it.
    pub fn try_int(&mut self, size: usize, endianness: Endianness) -> Result<i64, BufferError> {
        let raw = self.try_uint(size, endianness)?;
        let shift = 64 - (size as u32) * 8;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Reads a 32-bit floating point number.
    #[inline]
    pub fn try_f32(&mut self, endianness: Endianness) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.try_uint(4, endianness)? as u32))
    }

    /// Reads a 64-bit floating point number.
    #[inline]
    pub fn try_f64(&mut self, endianness: Endianness) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.try_uint(8, endianness)?))
    }

    /// Reads a UTF-8 string of the given size.
    ///
    /// On invalid UTF-8 the cursor still advances past the bytes.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let bytes = self.try_buf(size)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }
}
