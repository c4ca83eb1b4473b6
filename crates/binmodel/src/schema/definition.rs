//! JSON schema definitions.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [{ "key": "name", "type": "STRING", "required": true }, { "key": "age", "type": "UINT_8" }]
//! ```
//!
//! ```json
//! { "name": { "type": "STRING", "required": true }, "age": "UINT_8" }
//! ```
//!
//! Object keys keep their document order.

use indexmap::IndexMap;
use serde::Deserialize;

use super::{FieldDescriptor, FieldOptions, Schema};
use crate::config::CodecConfig;
use crate::error::{Error, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum Definition {
    List(Vec<FieldDescriptor>),
    Map(IndexMap<String, FieldEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldEntry {
    Options(FieldOptions),
    Type(String),
}

impl Schema {
    /// Parses a JSON schema definition with the default [`CodecConfig`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with_config(json, CodecConfig::default())
    }

    pub fn from_json_with_config(json: &str, config: CodecConfig) -> Result<Self> {
        let definition: Definition =
            serde_json::from_str(json).map_err(|e| Error::InvalidSchema(e.to_string()))?;
        let mut schema = Schema::with_config(config);
        match definition {
            Definition::List(fields) => {
                for field in fields {
                    if schema.has_field(&field.key) {
                        return Err(Error::InvalidSchema(format!(
                            "duplicate field \"{}\"",
                            field.key
                        )));
                    }
                    schema.add_or_replace_field(field.key, field.data_type, field.required);
                }
            }
            Definition::Map(fields) => {
                for (key, entry) in fields {
                    let options = match entry {
                        FieldEntry::Options(options) => options,
                        FieldEntry::Type(name) => FieldOptions::optional(name.parse()?),
                    };
                    schema.add_or_replace_field(key, options.data_type, options.required);
                }
            }
        }
        Ok(schema)
    }

    /// Serializes the field list in the array form accepted by
    /// [`from_json`](Self::from_json).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.fields).map_err(|e| Error::InvalidSchema(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    #[test]
    fn array_form() {
        let schema = Schema::from_json(
            r#"[{"key":"name","type":"STRING","required":true},{"key":"age","type":"UINT_8"}]"#,
        )
        .unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["name", "age"]);
        assert!(schema.field_options("name").unwrap().required);
        assert!(!schema.field_options("age").unwrap().required);
    }

    #[test]
    fn object_form_keeps_document_order() {
        let schema = Schema::from_json(
            r#"{"zeta":"DOUBLE","alpha":{"type":"DATE","required":true},"mid":"JSON"}"#,
        )
        .unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            schema.field_options("alpha").unwrap().data_type,
            DataType::Date
        );
        assert!(schema.field_options("alpha").unwrap().required);
    }

    #[test]
    fn unknown_type_name() {
        assert!(matches!(
            Schema::from_json(r#"{"a":"INT_128"}"#),
            Err(Error::InvalidSchema(_))
        ));
        assert!(matches!(
            Schema::from_json(r#"[{"key":"a","type":"TEXT"}]"#),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn duplicate_keys_in_array() {
        assert!(matches!(
            Schema::from_json(r#"[{"key":"a","type":"NULL"},{"key":"a","type":"STRING"}]"#),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn not_json() {
        assert!(matches!(
            Schema::from_json("fields: [a]"),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn to_json_round_trips() {
        let schema = Schema::from_fields([
            ("a", FieldOptions::required(DataType::Int64)),
            ("b", DataType::Boolean.into()),
        ]);
        let json = schema.to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"key":"a","type":"INT_64","required":true},{"key":"b","type":"BOOLEAN","required":false}]"#
        );
        assert_eq!(Schema::from_json(&json).unwrap(), schema);
    }
}
