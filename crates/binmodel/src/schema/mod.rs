//! Ordered, named field lists and whole-record encode/decode.
//!
//! Fields are written as one chunk each, in schema order, with no names on
//! the wire. Decoding replays the same order, so two schemas holding the same
//! fields in a different order are not wire compatible, and reordering a
//! schema makes data encoded under the old order unreadable.

mod definition;
mod field;

pub use field::{FieldDescriptor, FieldOptions, FieldRef};

use std::collections::HashMap;

use binmodel_buffers::Writer;
use log::debug;

use crate::chunk::ChunkCodec;
use crate::config::CodecConfig;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::{Record, Value};

/// An ordered list of typed fields.
///
/// # Example
///
/// ```
/// use binmodel::{DataType, FieldOptions, Record, Schema, Value};
///
/// let schema = Schema::from_fields([
///     ("name", FieldOptions::required(DataType::String)),
///     ("userType", DataType::UInt8.into()),
///     ("balance", DataType::Double.into()),
/// ]);
///
/// let record = Record::from([
///     ("name".to_string(), Value::from("Ann")),
///     ("userType".to_string(), Value::from(5)),
///     ("balance".to_string(), Value::from(10.5)),
/// ]);
///
/// let bytes = schema.encode(&record).unwrap();
/// assert_eq!(schema.decode(&bytes).unwrap(), record);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    codec: ChunkCodec,
}

impl Schema {
    /// Creates an empty schema with the default [`CodecConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            codec: ChunkCodec::new(config),
            ..Self::default()
        }
    }

    /// Builds a schema from `(name, options)` pairs, in order.
    ///
    /// A repeated name keeps its first position and takes the later options.
    pub fn from_fields<K, O>(fields: impl IntoIterator<Item = (K, O)>) -> Self
    where
        K: Into<String>,
        O: Into<FieldOptions>,
    {
        Self::with_config(CodecConfig::default()).fields_from(fields)
    }

    /// Appends `(name, options)` pairs to this schema.
    pub fn fields_from<K, O>(mut self, fields: impl IntoIterator<Item = (K, O)>) -> Self
    where
        K: Into<String>,
        O: Into<FieldOptions>,
    {
        for (key, options) in fields {
            let options = options.into();
            self.add_or_replace_field(key, options.data_type, options.required);
        }
        self
    }

    pub fn config(&self) -> &CodecConfig {
        self.codec.config()
    }

    pub fn codec(&self) -> &ChunkCodec {
        &self.codec
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Declares a field.
    ///
    /// An existing field keeps its position and takes the new type and
    /// required flag; a new field goes to the end.
    pub fn add_or_replace_field(
        &mut self,
        key: impl Into<String>,
        data_type: DataType,
        required: bool,
    ) -> &mut Self {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => {
                let field = &mut self.fields[i];
                field.data_type = data_type;
                field.required = required;
                debug!("schema field {key:?} redefined as {data_type} (required={required})");
            }
            None => {
                debug!("schema field {key:?} added as {data_type} (required={required})");
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push(FieldDescriptor {
                    key,
                    data_type,
                    required,
                });
            }
        }
        self
    }

    /// Removes a field if present; later fields move up one position.
    pub fn remove_field(&mut self, key: &str) -> &mut Self {
        if let Some(i) = self.index.remove(key) {
            self.fields.remove(i);
            for field in &self.fields[i..] {
                if let Some(pos) = self.index.get_mut(&field.key) {
                    *pos -= 1;
                }
            }
            debug!("schema field {key:?} removed");
        }
        self
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Looks up a field by name or position.
    pub fn field_options<'a>(&self, field: impl Into<FieldRef<'a>>) -> Option<&FieldDescriptor> {
        match field.into() {
            FieldRef::Name(key) => self.index_of(key).map(|i| &self.fields[i]),
            FieldRef::Index(i) => self.fields.get(i),
        }
    }

    /// Encodes `record` as one chunk per field, in schema order.
    ///
    /// `Null` values become NULL chunks and missing or `Undefined` values
    /// become UNDEFINED chunks regardless of the declared type. Required
    /// fields are checked for the whole record before anything is encoded.
    ///
    /// Some fields accept more than one value shape, and decoding returns
    /// the shape the tag implies. FLOAT and DOUBLE fields take integers and
    /// decode them as [`Value::Float`]. Integer fields take integral floats
    /// and decode them as [`Value::Integer`]. JSON fields take any value and
    /// decode it as [`Value::Json`], with dates as ISO strings.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        for field in &self.fields {
            if field.required && record.get(&field.key).map_or(true, Value::is_absent) {
                return Err(Error::RequiredFieldMissing(field.key.clone()));
            }
        }

        let mut writer = Writer::with_alloc_size(self.fields.len() * 16 + 16);
        for field in &self.fields {
            match record.get(&field.key) {
                None | Some(Value::Undefined) => {
                    self.codec
                        .append_to(&mut writer, DataType::Undefined, &Value::Undefined)?
                }
                Some(Value::Null) => self
                    .codec
                    .append_to(&mut writer, DataType::Null, &Value::Null)?,
                Some(value) => self.codec.append_to(&mut writer, field.data_type, value)?,
            }
        }
        let bytes = writer.flush();
        debug!(
            "encoded record with {} fields into {} bytes",
            self.fields.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Decodes one chunk per field, in schema order.
    ///
    /// NULL chunks decode to [`Value::Null`]; UNDEFINED chunks leave the key
    /// out of the record. Bytes after the last field are ignored.
    pub fn decode(&self, data: &[u8]) -> Result<Record> {
        self.decode_with_offset(data).map(|(record, _)| record)
    }

    /// Like [`decode`](Self::decode) but fails with
    /// [`Error::TrailingBytes`] if bytes remain after the last field.
    pub fn decode_exact(&self, data: &[u8]) -> Result<Record> {
        let (record, consumed) = self.decode_with_offset(data)?;
        if consumed != data.len() {
            return Err(Error::TrailingBytes(data.len() - consumed));
        }
        Ok(record)
    }

    fn decode_with_offset(&self, data: &[u8]) -> Result<(Record, usize)> {
        let mut record = Record::with_capacity(self.fields.len());
        let mut chunks = self.codec.iter(data);
        for field in &self.fields {
            let chunk = match chunks.next() {
                Some(chunk) => chunk?,
                None => return Err(Error::TruncatedRecord(field.key.clone())),
            };
            if field.required && chunk.data_type.is_absent() {
                return Err(Error::RequiredFieldMissing(field.key.clone()));
            }
            if chunk.data_type != DataType::Undefined {
                record.insert(field.key.clone(), chunk.data);
            }
        }
        debug!(
            "decoded record with {} fields from {} bytes",
            self.fields.len(),
            chunks.offset()
        );
        Ok((record, chunks.offset()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Schema {
        Schema::from_fields([
            ("name", FieldOptions::required(DataType::String)),
            ("userType", DataType::UInt8.into()),
            ("balance", DataType::Double.into()),
        ])
    }

    fn record<const N: usize>(pairs: [(&str, Value); N]) -> Record {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn field_order_preserved() {
        let schema = person();
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["name", "userType", "balance"]
        );
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn replace_keeps_position() {
        let mut schema = person();
        schema.add_or_replace_field("name", DataType::Json, false);
        assert_eq!(schema.index_of("name"), Some(0));
        let field = schema.field_options("name").unwrap();
        assert_eq!(field.data_type, DataType::Json);
        assert!(!field.required);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn add_appends() {
        let mut schema = person();
        schema.add_or_replace_field("createDate", DataType::Date, false);
        assert_eq!(schema.index_of("createDate"), Some(3));
    }

    #[test]
    fn remove_shifts_later_fields() {
        let mut schema = person();
        schema.remove_field("name");
        assert!(!schema.has_field("name"));
        assert_eq!(schema.index_of("userType"), Some(0));
        assert_eq!(schema.index_of("balance"), Some(1));
        assert_eq!(schema.field_options(1usize).unwrap().key, "balance");
        schema.remove_field("missing");
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn field_options_by_name_or_index() {
        let schema = person();
        assert_eq!(schema.field_options(0usize).unwrap().key, "name");
        assert_eq!(
            schema.field_options("balance").unwrap().data_type,
            DataType::Double
        );
        assert!(schema.field_options("nope").is_none());
        assert!(schema.field_options(3usize).is_none());
    }

    #[test]
    fn concrete_person_scenario() {
        let schema = person();
        let input = record([
            ("name", "Ann".into()),
            ("userType", 5.into()),
            ("balance", 10.5.into()),
        ]);
        let bytes = schema.encode(&input).unwrap();
        let output = schema.decode(&bytes).unwrap();
        assert_eq!(output, input);
        assert_eq!(output["userType"], Value::Integer(5));
        assert_eq!(output["balance"], Value::Float(10.5));
    }

    #[test]
    fn null_and_undefined_markers() {
        let schema = person();
        let input = record([("name", "x".into()), ("userType", Value::Null)]);
        let bytes = schema.encode(&input).unwrap();
        assert_eq!(&bytes[bytes.len() - 2..], &[0, 1]);
        let output = schema.decode(&bytes).unwrap();
        assert_eq!(output, input);
        assert!(!output.contains_key("balance"));
    }

    #[test]
    fn explicit_undefined_matches_missing_key() {
        let schema = person();
        let a = schema
            .encode(&record([("name", "x".into()), ("balance", Value::Undefined)]))
            .unwrap();
        let b = schema.encode(&record([("name", "x".into())])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn required_on_encode() {
        let schema = person();
        for value in [Value::Null, Value::Undefined] {
            assert_eq!(
                schema.encode(&record([("name", value)])),
                Err(Error::RequiredFieldMissing("name".into()))
            );
        }
        assert_eq!(
            schema.encode(&Record::new()),
            Err(Error::RequiredFieldMissing("name".into()))
        );
        assert!(schema.encode(&record([("name", "".into())])).is_ok());
    }

    #[test]
    fn required_checked_before_other_errors() {
        let schema = Schema::from_fields([
            ("flag", FieldOptions::optional(DataType::Boolean)),
            ("id", FieldOptions::required(DataType::UInt32)),
        ]);
        assert_eq!(
            schema.encode(&record([("flag", "not a bool".into())])),
            Err(Error::RequiredFieldMissing("id".into()))
        );
    }

    #[test]
    fn required_on_decode() {
        let optional = Schema::from_fields([("name", DataType::String)]);
        let bytes = optional.encode(&Record::new()).unwrap();
        assert_eq!(
            person().decode(&bytes),
            Err(Error::RequiredFieldMissing("name".into()))
        );
    }

    #[test]
    fn short_stream_is_truncated_record() {
        let schema = person();
        let bytes = Schema::from_fields([("name", DataType::String)])
            .encode(&record([("name", "x".into())]))
            .unwrap();
        assert_eq!(
            schema.decode(&bytes),
            Err(Error::TruncatedRecord("userType".into()))
        );
    }

    #[test]
    fn trailing_bytes() {
        let schema = Schema::from_fields([("a", DataType::UInt8)]);
        let bytes = [9, 1, 9, 2];
        assert_eq!(
            schema.decode(&bytes),
            Ok(record([("a", Value::Integer(1))]))
        );
        assert_eq!(schema.decode_exact(&bytes), Err(Error::TrailingBytes(2)));
        assert!(schema.decode_exact(&bytes[..2]).is_ok());
    }

    #[test]
    fn empty_schema() {
        let schema = Schema::new();
        assert!(schema.is_empty());
        assert_eq!(schema.encode(&record([("x", 1.into())])), Ok(vec![]));
        assert_eq!(schema.decode(&[]), Ok(Record::new()));
    }

    #[test]
    fn type_mismatch() {
        let schema = Schema::from_fields([("ok", DataType::Boolean)]);
        assert!(matches!(
            schema.encode(&record([("ok", "yes".into())])),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn schema_order_decides_wire_compat() {
        let ab = Schema::from_fields([("a", DataType::UInt8), ("b", DataType::String)]);
        let ba = Schema::from_fields([("b", DataType::String), ("a", DataType::UInt8)]);
        let input = record([("a", 1.into()), ("b", "x".into())]);
        let bytes = ab.encode(&input).unwrap();
        assert_ne!(bytes, ba.encode(&input).unwrap());
        // Positional decode under the wrong order hands each value to the
        // other field.
        let swapped = ba.decode(&bytes).unwrap();
        assert_eq!(swapped["b"], Value::Integer(1));
        assert_eq!(swapped["a"], Value::Str("x".into()));
    }
}
