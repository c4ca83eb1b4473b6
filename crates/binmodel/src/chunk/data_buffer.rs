//! Stateful chunk accumulator.

use super::{Chunk, ChunkCodec, Chunks};
use crate::data_type::DataType;
use crate::error::Result;
use crate::value::Value;

/// An owned byte buffer that chunks are appended to one at a time.
///
/// # Example
///
/// ```
/// use binmodel::{DataBuffer, DataType, Value};
///
/// let mut buffer = DataBuffer::new();
/// buffer.append(DataType::String, &"hi".into()).unwrap();
/// buffer.append(DataType::Boolean, &true.into()).unwrap();
///
/// let values = buffer.values().unwrap();
/// assert_eq!(values, vec![Value::Str("hi".into()), Value::Bool(true)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBuffer {
    buffer: Vec<u8>,
    codec: ChunkCodec,
}

impl DataBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(codec: ChunkCodec) -> Self {
        Self {
            buffer: Vec::new(),
            codec,
        }
    }

    /// Wraps previously encoded bytes.
    pub fn from_bytes(buffer: Vec<u8>, codec: ChunkCodec) -> Self {
        Self { buffer, codec }
    }

    /// Appends one chunk. On error the buffer is unchanged.
    pub fn append(&mut self, data_type: DataType, value: &Value) -> Result<&mut Self> {
        let chunk = self.codec.encode_chunk(data_type, value)?;
        self.buffer.extend_from_slice(&chunk);
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    pub fn iter(&self) -> Chunks<'_> {
        self.codec.iter(&self.buffer)
    }

    pub fn chunks(&self) -> Result<Vec<Chunk>> {
        self.codec.read_all_chunks(&self.buffer)
    }

    pub fn values(&self) -> Result<Vec<Value>> {
        self.codec.read_values(&self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
