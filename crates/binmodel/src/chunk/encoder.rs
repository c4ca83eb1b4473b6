//! Chunk encoding.

use binmodel_buffers::{Endianness, Writer};
use log::trace;

use super::ChunkCodec;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

impl ChunkCodec {
    /// Returns `buf` followed by one chunk of `data_type` holding `value`.
    ///
    /// `buf` itself is left untouched.
    pub fn append(&self, buf: &[u8], data_type: DataType, value: &Value) -> Result<Vec<u8>> {
        let mut writer = Writer::with_alloc_size(buf.len() + 32);
        writer.buf(buf);
        self.append_to(&mut writer, data_type, value)?;
        Ok(writer.flush())
    }

    /// Encodes a single chunk.
    pub fn encode_chunk(&self, data_type: DataType, value: &Value) -> Result<Vec<u8>> {
        self.append(&[], data_type, value)
    }

    /// Writes one chunk into `writer`.
    ///
    /// The value is validated before the tag byte goes out, so a failed call
    /// leaves the writer as it was.
    pub fn append_to(&self, writer: &mut Writer, data_type: DataType, value: &Value) -> Result<()> {
        let endianness = self.config.endianness;
        let tag = data_type.as_u8();
        let start = writer.x;
        match data_type {
            DataType::Null | DataType::Undefined => writer.u8(tag),
            DataType::String => match value {
                Value::Str(s) => self.write_text(writer, tag, s)?,
                other => return Err(Error::invalid_value("string", other.kind())),
            },
            DataType::Json => {
                let json = value
                    .to_json()
                    .ok_or_else(|| Error::invalid_value("a JSON value", value.kind()))?;
                let text = serde_json::to_string(&json)
                    .map_err(|e| Error::invalid_value("a JSON value", e.to_string()))?;
                self.write_text(writer, tag, &text)?;
            }
            DataType::Date => {
                let ts = match value {
                    Value::Date(ts) if ts.is_valid() => *ts,
                    Value::Date(ts) => {
                        return Err(Error::invalid_value(
                            "a date within 8.64e15 ms of the epoch",
                            format!("{} ms", ts.as_millis()),
                        ))
                    }
                    other => return Err(Error::invalid_value("date", other.kind())),
                };
                let text = ts.to_iso_string();
                writer.u8(tag);
                writer.u8(text.len() as u8);
                writer.utf8(&text);
            }
            DataType::Boolean => {
                let b = value
                    .as_bool()
                    .ok_or_else(|| Error::invalid_value("boolean", value.kind()))?;
                writer.u8(tag);
                writer.u8(b as u8);
            }
            DataType::Float => {
                let f = float_operand(value)?;
                writer.u8(tag);
                write_float(writer, f, endianness);
            }
            DataType::Double => {
                let f = float_operand(value)?;
                writer.u8(tag);
                write_double(writer, f, endianness);
            }
            DataType::UInt64 | DataType::Int64 => {
                self.write_int_chunk(writer, data_type, self.config.int64_width(), value)?
            }
            DataType::UInt32 | DataType::Int32 => self.write_int_chunk(writer, data_type, 4, value)?,
            DataType::UInt16 | DataType::Int16 => self.write_int_chunk(writer, data_type, 2, value)?,
            DataType::UInt8 | DataType::Int8 => self.write_int_chunk(writer, data_type, 1, value)?,
        }
        trace!("appended {} chunk ({} bytes)", data_type, writer.x - start);
        Ok(())
    }

    fn write_text(&self, writer: &mut Writer, tag: u8, text: &str) -> Result<()> {
        let width = self.config.length_prefix_width();
        let len = text.len() as u64;
        if len >> (width * 8) != 0 {
            return Err(Error::invalid_value(
                format!("a string of at most 2^{} - 1 bytes", width * 8),
                format!("{len} bytes"),
            ));
        }
        writer.u8(tag);
        writer.uint(len, width, self.config.endianness);
        writer.utf8(text);
        Ok(())
    }

    fn write_int_chunk(
        &self,
        writer: &mut Writer,
        data_type: DataType,
        width: usize,
        value: &Value,
    ) -> Result<()> {
        let n = int_operand(value)?;
        check_int_range(n, width, data_type.is_unsigned())?;
        writer.u8(data_type.as_u8());
        writer.int(n, width, self.config.endianness);
        Ok(())
    }

    /// Returns `buf` followed by a bare integer of `byte_size` bytes, using
    /// the configured default signedness and byte order.
    pub fn append_int(&self, buf: &[u8], value: i64, byte_size: usize) -> Result<Vec<u8>> {
        let mut writer = Writer::with_alloc_size(buf.len() + byte_size);
        writer.buf(buf);
        write_int(
            &mut writer,
            value,
            byte_size,
            self.config.unsigned,
            self.config.endianness,
        )?;
        Ok(writer.flush())
    }
}

/// Writes a bare `byte_size`-byte integer (`1..=8`).
///
/// Fails with [`Error::InvalidValue`] when `value` does not fit, without
/// writing anything.
pub fn write_int(
    writer: &mut Writer,
    value: i64,
    byte_size: usize,
    unsigned: bool,
    endianness: Endianness,
) -> Result<()> {
    if !(1..=8).contains(&byte_size) {
        return Err(Error::invalid_value(
            "an integer width between 1 and 8 bytes",
            format!("{byte_size} bytes"),
        ));
    }
    check_int_range(value, byte_size, unsigned)?;
    writer.int(value, byte_size, endianness);
    Ok(())
}

/// Writes a bare 4-byte IEEE-754 float. Any value, NaN included, is accepted.
pub fn write_float(writer: &mut Writer, value: f64, endianness: Endianness) {
    writer.f32(value as f32, endianness);
}

/// Writes a bare 8-byte IEEE-754 double.
pub fn write_double(writer: &mut Writer, value: f64, endianness: Endianness) {
    writer.f64(value, endianness);
}

fn int_operand(value: &Value) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Float(f) if !f.is_finite() => {
            Err(Error::invalid_value("a finite number", f.to_string()))
        }
        Value::Float(f) if f.fract() != 0.0 => {
            Err(Error::invalid_value("an integral number", f.to_string()))
        }
        // Saturates outside i64; the range check rejects those.
        Value::Float(f) => Ok(*f as i64),
        other => Err(Error::invalid_value("number", other.kind())),
    }
}

fn float_operand(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::invalid_value("number", value.kind()))
}

fn check_int_range(n: i64, width: usize, unsigned: bool) -> Result<()> {
    let bits = width as u32 * 8;
    let (min, max) = if unsigned {
        let max = if bits >= 64 { i64::MAX } else { ((1u64 << bits) - 1) as i64 };
        (0, max)
    } else if bits >= 64 {
        (i64::MIN, i64::MAX)
    } else {
        (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
    };
    if n < min || n > max {
        let kind = if unsigned { "unsigned" } else { "signed" };
        return Err(Error::invalid_value(
            format!("a {kind} {bits}-bit integer in {min}..={max}"),
            n.to_string(),
        ));
    }
    Ok(())
}
