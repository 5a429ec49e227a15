//! Recursive-descent decoding of Bot API JSON into typed entities
//!
//! Every entity implements [`Decode`] by reading its fields through an
//! [`Object`] view. The view applies one policy for the whole tree:
//!
//! - mandatory fields use [`Object::required`] and abort the entity with
//!   [`DecodeError::MissingField`] when absent
//! - optional scalars and nested objects are absorbed on failure: the field
//!   is left `None` and a warning is logged, the parent still decodes
//! - list fields decode to an owned `Vec`; absent lists are empty unless the
//!   caller asks for presence with [`Object::list_opt`]
//!
//! JSON `null` is treated the same as an omitted field.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Failure to turn a JSON value into a typed entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Value was expected to be an object
    #[error("expected a JSON object for {0}")]
    NotAnObject(&'static str),

    /// Value was expected to be an array
    #[error("expected a JSON array")]
    NotAnArray,

    /// A mandatory field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A mandatory field is present with the wrong shape
    #[error("field `{field}` is not a valid {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// A scalar root value has the wrong shape
    #[error("expected {0}")]
    InvalidValue(&'static str),

    /// Payload is not JSON at all
    #[error("malformed JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// A type that can be decoded from a Bot API JSON value
pub trait Decode: Sized {
    /// Decode `value` into `Self`
    ///
    /// # Errors
    ///
    /// Returns error if a mandatory field is missing or malformed
    fn decode(value: &Value) -> Result<Self, DecodeError>;
}

impl Decode for bool {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value.as_bool().ok_or(DecodeError::InvalidValue("a boolean"))
    }
}

impl Decode for i64 {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value.as_i64().ok_or(DecodeError::InvalidValue("an integer"))
    }
}

impl Decode for String {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(DecodeError::InvalidValue("a string"))
    }
}

impl Decode for Value {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

/// Root arrays decode element by element; a malformed element is dropped
/// so one bad entry cannot poison the whole batch
impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let items = value.as_array().ok_or(DecodeError::NotAnArray)?;
        Ok(decode_elements(items, "result"))
    }
}

/// Parse `bytes` as JSON and decode the result as `T`
///
/// # Errors
///
/// Returns error if the bytes are not JSON or `T` cannot be decoded
pub fn decode_slice<T: Decode>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    T::decode(&value)
}

fn decode_elements<T: Decode>(items: &[Value], field: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::decode(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(field, index, error = %e, "dropping malformed list element");
                None
            }
        })
        .collect()
}

/// Read-only view of one JSON object being decoded as `entity`
#[derive(Debug, Clone, Copy)]
pub struct Object<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Object<'a> {
    /// Wrap `value`, failing if it is not an object
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] for any non-object value
    pub fn new(entity: &'static str, value: &'a Value) -> Result<Self, DecodeError> {
        value
            .as_object()
            .map(|map| Self { entity, map })
            .ok_or(DecodeError::NotAnObject(entity))
    }

    /// Name of the entity being decoded
    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    /// Raw field value, `None` when omitted or `null`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    /// Whether the field is present and not `null`
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Mandatory scalar field
    ///
    /// # Errors
    ///
    /// Returns error if the field is missing or has the wrong type
    pub fn required<T: Deserialize<'a>>(&self, field: &'static str) -> Result<T, DecodeError> {
        let value = self.get(field).ok_or(DecodeError::MissingField(field))?;
        T::deserialize(value).map_err(|_| DecodeError::InvalidField {
            field,
            expected: std::any::type_name::<T>(),
        })
    }

    /// Optional scalar field; a malformed value is logged and treated as absent
    #[must_use]
    pub fn optional<T: Deserialize<'a>>(&self, field: &'static str) -> Option<T> {
        let value = self.get(field)?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.absorb(field, &e);
                None
            }
        }
    }

    /// Mandatory nested entity; its own failure fails the parent
    ///
    /// # Errors
    ///
    /// Returns error if the field is missing or the nested entity is invalid
    pub fn required_nested<T: Decode>(&self, field: &'static str) -> Result<T, DecodeError> {
        self.required_nested_with(field, T::decode)
    }

    /// Mandatory nested entity decoded with a custom function
    ///
    /// # Errors
    ///
    /// Returns error if the field is missing or `decode` fails
    pub fn required_nested_with<T>(
        &self,
        field: &'static str,
        decode: impl FnOnce(&Value) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let value = self.get(field).ok_or(DecodeError::MissingField(field))?;
        decode(value)
    }

    /// Optional nested entity; a failure is logged and the field left absent
    #[must_use]
    pub fn nested<T: Decode>(&self, field: &'static str) -> Option<T> {
        self.nested_with(field, T::decode)
    }

    /// Optional nested entity decoded with a custom function
    #[must_use]
    pub fn nested_with<T>(
        &self,
        field: &'static str,
        decode: impl FnOnce(&Value) -> Result<T, DecodeError>,
    ) -> Option<T> {
        let value = self.get(field)?;
        match decode(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.absorb(field, &e);
                None
            }
        }
    }

    /// List field; absent or malformed lists decode as empty
    #[must_use]
    pub fn list<T: Decode>(&self, field: &'static str) -> Vec<T> {
        self.list_opt(field).unwrap_or_default()
    }

    /// List field that keeps the difference between omitted and empty
    #[must_use]
    pub fn list_opt<T: Decode>(&self, field: &'static str) -> Option<Vec<T>> {
        let value = self.get(field)?;
        let Some(items) = value.as_array() else {
            self.absorb(field, &DecodeError::NotAnArray);
            return None;
        };
        Some(decode_elements(items, field))
    }

    /// Mandatory list field; elements are still decoded leniently
    ///
    /// # Errors
    ///
    /// Returns error if the field is missing or not an array
    pub fn required_list<T: Decode>(&self, field: &'static str) -> Result<Vec<T>, DecodeError> {
        let items = self
            .get(field)
            .ok_or(DecodeError::MissingField(field))?
            .as_array()
            .ok_or(DecodeError::InvalidField {
                field,
                expected: "array",
            })?;
        Ok(decode_elements(items, field))
    }

    /// Mandatory list of lists, e.g. keyboard rows or photo size sets
    ///
    /// # Errors
    ///
    /// Returns error if the field is missing or not an array
    pub fn required_grid<T: Decode>(
        &self,
        field: &'static str,
    ) -> Result<Vec<Vec<T>>, DecodeError> {
        let rows = self
            .get(field)
            .ok_or(DecodeError::MissingField(field))?
            .as_array()
            .ok_or(DecodeError::InvalidField {
                field,
                expected: "array",
            })?;

        Ok(rows
            .iter()
            .filter_map(|row| match row.as_array() {
                Some(items) => Some(decode_elements(items, field)),
                None => {
                    self.absorb(field, &DecodeError::NotAnArray);
                    None
                }
            })
            .collect())
    }

    fn absorb(&self, field: &str, error: &dyn std::fmt::Display) {
        tracing::warn!(
            entity = self.entity,
            field,
            error = %error,
            "ignoring malformed optional field"
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        label: Option<String>,
        tags: Vec<String>,
    }

    impl Decode for Point {
        fn decode(value: &Value) -> Result<Self, DecodeError> {
            let obj = Object::new("Point", value)?;
            Ok(Self {
                x: obj.required("x")?,
                label: obj.optional("label"),
                tags: obj.list("tags"),
            })
        }
    }

    #[test]
    fn required_field_missing() {
        let err = Point::decode(&json!({"label": "a"})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("x"));
    }

    #[test]
    fn required_field_wrong_type() {
        let err = Point::decode(&json!({"x": "nope"})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "x", .. }));
    }

    #[test]
    fn null_counts_as_absent() {
        let err = Point::decode(&json!({"x": null})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("x"));

        let p = Point::decode(&json!({"x": 1, "label": null})).unwrap();
        assert_eq!(p.label, None);
    }

    #[test]
    fn optional_wrong_type_is_absorbed() {
        let p = Point::decode(&json!({"x": 1, "label": 7})).unwrap();
        assert_eq!(p.label, None);
    }

    #[test]
    fn empty_string_is_distinct_from_absent() {
        let p = Point::decode(&json!({"x": 1, "label": ""})).unwrap();
        assert_eq!(p.label.as_deref(), Some(""));
    }

    #[test]
    fn list_drops_bad_elements() {
        let p = Point::decode(&json!({"x": 1, "tags": ["a", 2, "b"]})).unwrap();
        assert_eq!(p.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn list_opt_keeps_presence() {
        let v = json!({"empty": [], "x": 1});
        let obj = Object::new("Test", &v).unwrap();
        assert_eq!(obj.list_opt::<String>("empty"), Some(vec![]));
        assert_eq!(obj.list_opt::<String>("missing"), None);
        assert!(obj.list::<String>("missing").is_empty());
    }

    #[test]
    fn not_an_object() {
        assert_eq!(
            Point::decode(&json!([1, 2])).unwrap_err(),
            DecodeError::NotAnObject("Point")
        );
    }

    #[test]
    fn root_vec_skips_malformed_entries() {
        let points: Vec<Point> = Vec::decode(&json!([{"x": 1}, {"y": 2}, {"x": 3}])).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].x, 3);
    }

    #[test]
    fn root_scalars() {
        assert!(bool::decode(&json!(true)).unwrap());
        assert_eq!(
            bool::decode(&json!("true")).unwrap_err(),
            DecodeError::InvalidValue("a boolean")
        );
        assert_eq!(i64::decode(&json!(-5)).unwrap(), -5);
    }

    #[test]
    fn decode_slice_rejects_garbage() {
        let err = decode_slice::<bool>(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn grid_decodes_rows() {
        let v = json!({"rows": [["a", "b"], "bad", ["c"]]});
        let obj = Object::new("Test", &v).unwrap();
        let rows: Vec<Vec<String>> = obj.required_grid("rows").unwrap();
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    }
}
