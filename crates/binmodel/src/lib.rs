//! Schema-driven tag-length-value binary records.
//!
//! A [`Schema`] is an ordered list of typed fields. Encoding a [`Record`]
//! writes one self-describing chunk per field, in schema order; decoding
//! reads the chunks back in the same order. Field names never reach the
//! wire.
//!
//! ```
//! use binmodel::{DataType, FieldOptions, Record, Schema, Timestamp, Value};
//!
//! let person = Schema::from_fields([
//!     ("name", FieldOptions::required(DataType::String)),
//!     ("userType", DataType::UInt8.into()),
//!     ("createDate", DataType::Date.into()),
//! ]);
//!
//! let mut record = Record::new();
//! record.insert("name".into(), "Ann".into());
//! record.insert("createDate".into(), Timestamp::from_millis(0).into());
//!
//! let bytes = person.encode(&record).unwrap();
//! let decoded = person.decode(&bytes).unwrap();
//! assert_eq!(decoded["name"], Value::Str("Ann".into()));
//! assert!(!decoded.contains_key("userType"));
//! ```
//!
//! The lower-level [`ChunkCodec`] reads and writes single chunks without a
//! schema.

mod config;
mod data_type;
mod date;
mod error;
mod value;

pub mod chunk;
pub mod schema;

pub use binmodel_buffers::Endianness;
pub use chunk::{Chunk, ChunkCodec, Chunks, DataBuffer};
pub use config::CodecConfig;
pub use data_type::DataType;
pub use date::{Timestamp, MAX_TIMESTAMP_MS};
pub use error::{Error, Result};
pub use schema::{FieldDescriptor, FieldOptions, FieldRef, Schema};
pub use value::{Record, Value};
