//! Type tags identifying the wire representation of a chunk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::error::Error;

/// The type tag written as the first byte of every chunk.
///
/// The discriminants are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    #[serde(rename = "NULL")]
    Null = 0,
    #[serde(rename = "UNDEFINED")]
    Undefined = 1,
    #[serde(rename = "STRING")]
    String = 2,
    #[serde(rename = "DATE")]
    Date = 3,
    #[serde(rename = "JSON")]
    Json = 4,
    #[serde(rename = "BOOLEAN")]
    Boolean = 5,
    /// 48-bit unsigned integer (32-bit when 64-bit support is off).
    #[serde(rename = "UINT_64")]
    UInt64 = 6,
    #[serde(rename = "UINT_32")]
    UInt32 = 7,
    #[serde(rename = "UINT_16")]
    UInt16 = 8,
    #[serde(rename = "UINT_8")]
    UInt8 = 9,
    /// 48-bit signed integer (32-bit when 64-bit support is off).
    #[serde(rename = "INT_64")]
    Int64 = 10,
    #[serde(rename = "INT_32")]
    Int32 = 11,
    #[serde(rename = "INT_16")]
    Int16 = 12,
    #[serde(rename = "INT_8")]
    Int8 = 13,
    #[serde(rename = "FLOAT")]
    Float = 14,
    #[serde(rename = "DOUBLE")]
    Double = 15,
}

impl DataType {
    pub const ALL: [DataType; 16] = [
        DataType::Null,
        DataType::Undefined,
        DataType::String,
        DataType::Date,
        DataType::Json,
        DataType::Boolean,
        DataType::UInt64,
        DataType::UInt32,
        DataType::UInt16,
        DataType::UInt8,
        DataType::Int64,
        DataType::Int32,
        DataType::Int16,
        DataType::Int8,
        DataType::Float,
        DataType::Double,
    ];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Upper-case wire name, e.g. `"UINT_8"`.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Undefined => "UNDEFINED",
            DataType::String => "STRING",
            DataType::Date => "DATE",
            DataType::Json => "JSON",
            DataType::Boolean => "BOOLEAN",
            DataType::UInt64 => "UINT_64",
            DataType::UInt32 => "UINT_32",
            DataType::UInt16 => "UINT_16",
            DataType::UInt8 => "UINT_8",
            DataType::Int64 => "INT_64",
            DataType::Int32 => "INT_32",
            DataType::Int16 => "INT_16",
            DataType::Int8 => "INT_8",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
        }
    }

    /// NULL and UNDEFINED carry no payload and stand for an absent value.
    pub fn is_absent(self) -> bool {
        matches!(self, DataType::Null | DataType::Undefined)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            DataType::UInt64 | DataType::UInt32 | DataType::UInt16 | DataType::UInt8
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_unsigned()
            || matches!(
                self,
                DataType::Int64 | DataType::Int32 | DataType::Int16 | DataType::Int8
            )
    }

    /// Payload width of integer tags under `config`, `None` for other tags.
    pub fn int_width(self, config: &CodecConfig) -> Option<usize> {
        match self {
            DataType::UInt64 | DataType::Int64 => Some(config.int64_width()),
            DataType::UInt32 | DataType::Int32 => Some(4),
            DataType::UInt16 | DataType::Int16 => Some(2),
            DataType::UInt8 | DataType::Int8 => Some(1),
            _ => None,
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        DataType::ALL
            .get(tag as usize)
            .copied()
            .ok_or(Error::UnknownType(tag))
    }
}

impl From<DataType> for u8 {
    fn from(data_type: DataType) -> u8 {
        data_type as u8
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::InvalidSchema(format!("unknown data type \"{s}\"")))
    }
}
