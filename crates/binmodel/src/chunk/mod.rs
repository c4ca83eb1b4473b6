//! Tag-length-value chunk codec.
//!
//! A chunk is one typed value on the wire:
//!
//! ```text
//! [tag: 1 byte][length prefix: 0, 1, 4 or 6 bytes][payload]
//! ```
//!
//! | Tag                      | Prefix               | Payload                    |
//! |--------------------------|----------------------|----------------------------|
//! | NULL, UNDEFINED          | none                 | none                       |
//! | STRING, JSON             | 6 bytes (4 if narrow)| UTF-8 text                 |
//! | DATE                     | 1 byte               | ISO 8601 text              |
//! | BOOLEAN                  | none                 | 1 byte                     |
//! | INT_*, UINT_*            | none                 | 1, 2, 4 or 6 (4) bytes     |
//! | FLOAT, DOUBLE            | none                 | 4 or 8 bytes IEEE-754      |
//!
//! The codec holds no buffer state; every operation is a pure function of
//! its [`CodecConfig`] and input.

mod data_buffer;
mod decoder;
mod encoder;

pub use data_buffer::DataBuffer;
pub use decoder::{read_double, read_float, read_int, Chunks};
pub use encoder::{write_double, write_float, write_int};

use crate::config::CodecConfig;
use crate::data_type::DataType;
use crate::value::Value;

/// One decoded chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub data_type: DataType,
    /// Payload bytes, excluding tag and length prefix.
    pub data_size: usize,
    /// Total bytes consumed from the stream.
    pub chunk_size: usize,
    pub data: Value,
}

impl Chunk {
    /// Bytes taken by the length prefix.
    pub fn prefix_size(&self) -> usize {
        self.chunk_size - 1 - self.data_size
    }
}

/// Encodes and decodes single chunks under a fixed [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkCodec {
    config: CodecConfig,
}

impl ChunkCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
