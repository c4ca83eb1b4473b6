//! Binary buffer primitives used by the binmodel codec.
//!
//! [`Writer`] appends bytes into an auto-growing buffer, [`Reader`] walks a
//! borrowed byte slice with a cursor. Both speak fixed-width integers of any
//! width from 1 to 8 bytes in either byte order.
//!
//! # Example
//!
//! ```
//! use binmodel_buffers::{Endianness, Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x09);
//! writer.uint(0x0102_0304_0506, 6, Endianness::Big);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.try_u8().unwrap(), 0x09);
//! assert_eq!(reader.try_uint(6, Endianness::Big).unwrap(), 0x0102_0304_0506);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte order of multi-byte numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

/// Error type for bounds-checked reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("integer width must be 1 to 8 bytes, got {0}")]
    InvalidWidth(usize),
}
