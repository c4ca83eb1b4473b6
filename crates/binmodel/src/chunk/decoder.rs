//! Chunk decoding.

use std::iter::FusedIterator;

use binmodel_buffers::{Endianness, Reader};
use log::{trace, warn};

use super::{Chunk, ChunkCodec};
use crate::data_type::DataType;
use crate::date::Timestamp;
use crate::error::{Error, Result};
use crate::value::Value;

impl ChunkCodec {
    /// Reads the chunk at the start of `buf`.
    ///
    /// Returns `Ok(None)` only when `buf` is empty. A buffer that ends inside
    /// a chunk fails with [`Error::TruncatedInput`].
    pub fn read_next_chunk(&self, buf: &[u8]) -> Result<Option<Chunk>> {
        if buf.is_empty() {
            return Ok(None);
        }
        let mut reader = Reader::new(buf);
        self.read_chunk(&mut reader).map(Some)
    }

    /// Iterates over the chunks of `buf`, advancing by each chunk's size.
    pub fn iter<'a>(&self, buf: &'a [u8]) -> Chunks<'a> {
        Chunks {
            codec: *self,
            reader: Reader::new(buf),
            failed: false,
        }
    }

    /// Reads every chunk in `buf`.
    pub fn read_all_chunks(&self, buf: &[u8]) -> Result<Vec<Chunk>> {
        self.iter(buf).collect()
    }

    /// Reads every chunk in `buf`, keeping only the values.
    pub fn read_values(&self, buf: &[u8]) -> Result<Vec<Value>> {
        self.iter(buf).map(|chunk| chunk.map(|c| c.data)).collect()
    }

    /// Reads a bare integer at `offset` using the configured default
    /// signedness and byte order.
    pub fn read_int(&self, buf: &[u8], offset: usize, byte_size: usize) -> Result<i64> {
        read_int(
            buf,
            offset,
            byte_size,
            self.config.unsigned,
            self.config.endianness,
        )
    }

    pub(crate) fn read_chunk(&self, reader: &mut Reader<'_>) -> Result<Chunk> {
        let start = reader.x;
        let endianness = self.config.endianness;
        let data_type = DataType::try_from(reader.try_u8()?)?;
        let (data_size, data) = match data_type {
            DataType::Null => (0, Value::Null),
            DataType::Undefined => (0, Value::Undefined),
            DataType::String => {
                let text = self.read_text(reader)?;
                (text.len(), Value::Str(text.to_string()))
            }
            DataType::Json => {
                let text = self.read_text(reader)?;
                let json = serde_json::from_str(text)
                    .map_err(|e| Error::MalformedChunk(format!("invalid JSON: {e}")))?;
                (text.len(), Value::Json(json))
            }
            DataType::Date => {
                let len = reader.try_u8()? as usize;
                let text = reader.try_utf8(len)?;
                let ts = Timestamp::parse_iso(text).ok_or_else(|| {
                    Error::MalformedChunk(format!("failed to decode date ({text})"))
                })?;
                (len, Value::Date(ts))
            }
            DataType::Boolean => {
                let byte = reader.try_u8()?;
                (1, Value::Bool(self.decode_bool(byte)?))
            }
            DataType::Float => (4, Value::Float(reader.try_f32(endianness)? as f64)),
            DataType::Double => (8, Value::Float(reader.try_f64(endianness)?)),
            DataType::UInt64 | DataType::Int64 => {
                read_int_payload(reader, data_type, self.config.int64_width(), endianness)?
            }
            DataType::UInt32 | DataType::Int32 => {
                read_int_payload(reader, data_type, 4, endianness)?
            }
            DataType::UInt16 | DataType::Int16 => {
                read_int_payload(reader, data_type, 2, endianness)?
            }
            DataType::UInt8 | DataType::Int8 => read_int_payload(reader, data_type, 1, endianness)?,
        };
        let chunk_size = reader.x - start;
        trace!(
            "read {} chunk at {}: data_size={} chunk_size={}",
            data_type,
            start,
            data_size,
            chunk_size
        );
        Ok(Chunk {
            data_type,
            data_size,
            chunk_size,
            data,
        })
    }

    fn read_text<'a>(&self, reader: &mut Reader<'a>) -> Result<&'a str> {
        let width = self.config.length_prefix_width();
        let len = reader.try_uint(width, self.config.endianness)?;
        let remaining = reader.size();
        let len = usize::try_from(len).map_err(|_| Error::TruncatedInput {
            needed: usize::MAX,
            remaining,
        })?;
        Ok(reader.try_utf8(len)?)
    }

    fn decode_bool(&self, byte: u8) -> Result<bool> {
        match byte {
            1 => Ok(true),
            0 => Ok(false),
            other if self.config.strict_booleans => Err(Error::MalformedChunk(format!(
                "invalid boolean byte 0x{other:02x}"
            ))),
            other => {
                warn!("boolean byte 0x{other:02x} decoded as false");
                Ok(false)
            }
        }
    }
}

fn read_int_payload(
    reader: &mut Reader<'_>,
    data_type: DataType,
    width: usize,
    endianness: Endianness,
) -> Result<(usize, Value)> {
    let n = if data_type.is_unsigned() {
        reader.try_uint(width, endianness)? as i64
    } else {
        reader.try_int(width, endianness)?
    };
    Ok((width, Value::Integer(n)))
}

/// Reads a bare `byte_size`-byte integer (`1..=8`) at `offset`.
///
/// Unsigned 8-byte values above `i64::MAX` wrap.
pub fn read_int(
    buf: &[u8],
    offset: usize,
    byte_size: usize,
    unsigned: bool,
    endianness: Endianness,
) -> Result<i64> {
    if !(1..=8).contains(&byte_size) {
        return Err(Error::invalid_value(
            "an integer width between 1 and 8 bytes",
            format!("{byte_size} bytes"),
        ));
    }
    let mut reader = Reader::at(buf, offset);
    if unsigned {
        Ok(reader.try_uint(byte_size, endianness)? as i64)
    } else {
        Ok(reader.try_int(byte_size, endianness)?)
    }
}

/// Reads a bare 4-byte IEEE-754 float at `offset`.
pub fn read_float(buf: &[u8], offset: usize, endianness: Endianness) -> Result<f64> {
    Ok(Reader::at(buf, offset).try_f32(endianness)? as f64)
}

/// Reads a bare 8-byte IEEE-754 double at `offset`.
pub fn read_double(buf: &[u8], offset: usize, endianness: Endianness) -> Result<f64> {
    Ok(Reader::at(buf, offset).try_f64(endianness)?)
}

/// Iterator over the chunks of a buffer, created by [`ChunkCodec::iter`].
///
/// Stops after the first error.
pub struct Chunks<'a> {
    codec: ChunkCodec,
    reader: Reader<'a>,
    failed: bool,
}

impl Chunks<'_> {
    /// Cursor position: bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.reader.x
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.reader.size()
    }
}

impl Iterator for Chunks<'_> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.size() == 0 {
            return None;
        }
        let result = self.codec.read_chunk(&mut self.reader);
        self.failed = result.is_err();
        Some(result)
    }
}

impl FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use serde_json::json;

    fn codec() -> ChunkCodec {
        ChunkCodec::default()
    }

    #[test]
    fn empty_buffer_is_no_more_data() {
        assert_eq!(codec().read_next_chunk(&[]), Ok(None));
        assert_eq!(codec().iter(&[]).count(), 0);
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(codec().read_next_chunk(&[255]), Err(Error::UnknownType(255)));
        assert_eq!(codec().read_next_chunk(&[16, 0]), Err(Error::UnknownType(16)));
    }

    #[test]
    fn string_sizes() {
        let chunk = codec()
            .read_next_chunk(&[2, 0, 0, 0, 0, 0, 3, b'A', b'n', b'n', 0xee])
            .unwrap()
            .unwrap();
        assert_eq!(chunk.data, Value::Str("Ann".into()));
        assert_eq!(chunk.data_size, 3);
        assert_eq!(chunk.prefix_size(), 6);
        assert_eq!(chunk.chunk_size, 10);
    }

    #[test]
    fn string_longer_than_buffer_is_truncated() {
        assert_eq!(
            codec().read_next_chunk(&[2, 0, 0, 0, 0, 0, 5, b'A', b'n']),
            Err(Error::TruncatedInput {
                needed: 5,
                remaining: 2
            })
        );
        // Cut inside the length prefix.
        assert!(matches!(
            codec().read_next_chunk(&[2, 0, 0]),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn fixed_width_payload_truncated() {
        for buf in [
            &[5u8][..],
            &[15, 0, 0, 0][..],
            &[6, 0, 0, 0, 0, 0][..],
            &[12, 1][..],
        ] {
            assert!(
                matches!(codec().read_next_chunk(buf), Err(Error::TruncatedInput { .. })),
                "{buf:?}"
            );
        }
    }

    #[test]
    fn json_payload_parsed() {
        let text = br#"{"a":[1,null]}"#;
        let mut buf = vec![4, 0, 0, 0, 0, 0, text.len() as u8];
        buf.extend_from_slice(text);
        let chunk = codec().read_next_chunk(&buf).unwrap().unwrap();
        assert_eq!(chunk.data, Value::Json(json!({"a": [1, null]})));
        assert_eq!(chunk.data_size, text.len());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let buf = [4, 0, 0, 0, 0, 0, 2, b'{', b'x'];
        assert!(matches!(
            codec().read_next_chunk(&buf),
            Err(Error::MalformedChunk(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let buf = [2, 0, 0, 0, 0, 0, 1, 0xff];
        assert!(matches!(
            codec().read_next_chunk(&buf),
            Err(Error::MalformedChunk(_))
        ));
    }

    #[test]
    fn date_payload() {
        let text = b"2018-01-01T00:00:00.000Z";
        let mut buf = vec![3, text.len() as u8];
        buf.extend_from_slice(text);
        let chunk = codec().read_next_chunk(&buf).unwrap().unwrap();
        assert_eq!(
            chunk.data,
            Value::Date(Timestamp::from_ymd_hms_milli(2018, 1, 1, 0, 0, 0, 0).unwrap())
        );
        assert_eq!(chunk.chunk_size, 26);
    }

    #[test]
    fn bad_date_is_malformed() {
        let mut buf = vec![3, 7];
        buf.extend_from_slice(b"garbage");
        assert_eq!(
            codec().read_next_chunk(&buf),
            Err(Error::MalformedChunk(
                "failed to decode date (garbage)".into()
            ))
        );
    }

    #[test]
    fn boolean_decode_is_permissive_by_default() {
        let read = |b| codec().read_next_chunk(&[5, b]).unwrap().unwrap().data;
        assert_eq!(read(1), Value::Bool(true));
        assert_eq!(read(0), Value::Bool(false));
        assert_eq!(read(2), Value::Bool(false));
        assert_eq!(read(0xff), Value::Bool(false));
    }

    #[test]
    fn strict_booleans_reject_other_bytes() {
        let strict = ChunkCodec::new(CodecConfig {
            strict_booleans: true,
            ..CodecConfig::default()
        });
        assert!(matches!(
            strict.read_next_chunk(&[5, 2]),
            Err(Error::MalformedChunk(_))
        ));
        assert_eq!(
            strict.read_next_chunk(&[5, 1]).unwrap().unwrap().data,
            Value::Bool(true)
        );
    }

    #[test]
    fn integers_sign_from_tag() {
        let read = |buf: &[u8]| codec().read_next_chunk(buf).unwrap().unwrap().data;
        assert_eq!(read(&[9, 0xff]), Value::Integer(255));
        assert_eq!(read(&[13, 0xff]), Value::Integer(-1));
        assert_eq!(read(&[6, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]), Value::Integer((1 << 48) - 1));
        assert_eq!(read(&[10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]), Value::Integer(-1));
    }

    #[test]
    fn narrow_int64_is_four_bytes() {
        let narrow = ChunkCodec::new(CodecConfig {
            support_64: false,
            ..CodecConfig::default()
        });
        let chunk = narrow
            .read_next_chunk(&[10, 0xff, 0xff, 0xff, 0xfe])
            .unwrap()
            .unwrap();
        assert_eq!(chunk.data, Value::Integer(-2));
        assert_eq!(chunk.chunk_size, 5);
    }

    #[test]
    fn iterator_walks_every_chunk() {
        let buf = [0, 1, 9, 7, 5, 1];
        let mut chunks = codec().iter(&buf);
        let sizes: Vec<usize> = chunks
            .by_ref()
            .map(|c| c.unwrap().chunk_size)
            .collect();
        assert_eq!(sizes, vec![1, 1, 2, 2]);
        assert_eq!(chunks.offset(), buf.len());
        assert_eq!(chunks.remaining(), 0);
    }

    #[test]
    fn iterator_stops_after_error() {
        let buf = [9, 7, 200, 9, 7];
        let results: Vec<_> = codec().iter(&buf).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(Error::UnknownType(200)));
    }

    #[test]
    fn read_values_keeps_data_only() {
        let buf = [9, 7, 0, 5, 1];
        assert_eq!(
            codec().read_values(&buf),
            Ok(vec![Value::Integer(7), Value::Null, Value::Bool(true)])
        );
    }

    #[test]
    fn bare_reads() {
        let buf = [0x00, 0xff, 0xfe, 0x40, 0x25, 0, 0, 0, 0, 0, 0];
        assert_eq!(codec().read_int(&buf, 1, 2), Ok(-2));
        assert_eq!(read_int(&buf, 1, 2, true, Endianness::Big), Ok(0xfffe));
        assert_eq!(read_int(&buf, 1, 2, true, Endianness::Little), Ok(0xfeff));
        assert_eq!(read_double(&buf, 3, Endianness::Big), Ok(10.5));
        assert!(matches!(
            read_float(&buf, 9, Endianness::Big),
            Err(Error::TruncatedInput { .. })
        ));
    }
}
