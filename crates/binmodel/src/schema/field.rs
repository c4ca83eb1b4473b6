//! Field declarations.

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// A named, typed field of a [`Schema`](super::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub required: bool,
}

/// Type and required flag of a field, without its name.
///
/// A bare [`DataType`] converts into an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub required: bool,
}

impl FieldOptions {
    pub fn optional(data_type: DataType) -> Self {
        Self {
            data_type,
            required: false,
        }
    }

    pub fn required(data_type: DataType) -> Self {
        Self {
            data_type,
            required: true,
        }
    }
}

impl From<DataType> for FieldOptions {
    fn from(data_type: DataType) -> Self {
        Self::optional(data_type)
    }
}

/// Looks a field up by name or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for FieldRef<'a> {
    fn from(name: &'a str) -> Self {
        FieldRef::Name(name)
    }
}

impl<'a> From<&'a String> for FieldRef<'a> {
    fn from(name: &'a String) -> Self {
        FieldRef::Name(name)
    }
}

impl From<usize> for FieldRef<'_> {
    fn from(index: usize) -> Self {
        FieldRef::Index(index)
    }
}
