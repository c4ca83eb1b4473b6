//! Dynamic field values and records.

use indexmap::IndexMap;

use crate::date::Timestamp;

/// A record: field name to value, in insertion order.
///
/// A missing key and a key mapped to [`Value::Undefined`] both mean "unset".
pub type Record = IndexMap<String, Value>;

/// Runtime value of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Unset.
    Undefined,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Date(Timestamp),
    /// Arbitrary JSON document.
    Json(serde_json::Value),
}

impl Value {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Json(_) => "json",
        }
    }

    /// `true` for [`Value::Null`] and [`Value::Undefined`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64`, converting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Timestamp> {
        match self {
            Value::Date(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }

    /// JSON form of the value, as stored in a JSON chunk.
    ///
    /// Dates become their ISO string and non-finite floats become `null`.
    /// `Undefined` has no JSON form.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        let json = match self {
            Value::Null => Json::Null,
            Value::Undefined => return None,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::Date(ts) => Json::String(ts.to_iso_string()),
            Value::Json(v) => v.clone(),
        };
        Some(json)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(n as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Date(ts)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(5u8), Value::Integer(5));
        assert_eq!(Value::from(-3i32), Value::Integer(-3));
        assert_eq!(Value::from(10.5), Value::Float(10.5));
        assert_eq!(Value::from("Ann"), Value::Str("Ann".into()));
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
        assert_eq!(Value::from(json!([1])), Value::Json(json!([1])));
    }

    #[test]
    fn absence() {
        assert!(Value::Null.is_absent());
        assert!(Value::Undefined.is_absent());
        assert!(!Value::Str(String::new()).is_absent());
    }

    #[test]
    fn json_forms() {
        assert_eq!(Value::Undefined.to_json(), None);
        assert_eq!(Value::Float(f64::NAN).to_json(), Some(json!(null)));
        assert_eq!(Value::Integer(7).to_json(), Some(json!(7)));
        assert_eq!(
            Value::Date(Timestamp::UNIX_EPOCH).to_json(),
            Some(json!("1970-01-01T00:00:00.000Z"))
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_i64(), None);
        assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Value::Bool(true).kind(), "boolean");
    }
}
