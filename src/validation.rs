//! Field-level payload validation.
//!
//! A [`FieldReader`] walks a JSON object one field at a time, coercing each
//! value to its declared type and collecting every failure into a
//! [`FieldErrors`] map so a single 400 response reports all bad fields.
//!
//! When a `current` value is supplied for a field (partial updates), an absent
//! key falls back to it instead of being reported as missing.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";

/// Key used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Mapping from field name to the list of messages for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error map holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Borrow the payload as a JSON object, or report what was sent instead.
pub fn expect_object(payload: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    payload.as_object().ok_or_else(|| {
        FieldErrors::single(
            NON_FIELD_ERRORS,
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(payload)
            ),
        )
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads typed fields out of a JSON object, accumulating errors.
pub struct FieldReader<'a> {
    data: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a Map<String, Value>) -> Self {
        Self {
            data,
            errors: FieldErrors::new(),
        }
    }

    /// Read a required, non-blank string field. Surrounding whitespace is
    /// trimmed; numbers are accepted in their textual form.
    pub fn string(
        &mut self,
        field: &str,
        max_length: Option<usize>,
        current: Option<&str>,
    ) -> Option<String> {
        let data = self.data;
        let raw = match data.get(field) {
            None => {
                return match current {
                    Some(value) => Some(value.to_string()),
                    None => self.fail(field, REQUIRED),
                };
            }
            Some(Value::Null) => return self.fail(field, NOT_NULL),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return self.fail(field, INVALID_STRING),
        };

        if raw.is_empty() {
            return self.fail(field, NOT_BLANK);
        }
        if let Some(max) = max_length {
            if raw.chars().count() > max {
                return self.fail(
                    field,
                    format!("Ensure this field has no more than {max} characters."),
                );
            }
        }
        Some(raw)
    }

    /// Read a required primary-key reference. Integers and integer strings
    /// are accepted.
    pub fn pk(&mut self, field: &str, current: Option<i32>) -> Option<i32> {
        let data = self.data;
        let parsed = match data.get(field) {
            None => {
                return match current {
                    Some(value) => Some(value),
                    None => self.fail(field, REQUIRED),
                };
            }
            Some(Value::Null) => return self.fail(field, NOT_NULL),
            Some(Value::Number(n)) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
            Some(_) => None,
        };

        match parsed {
            Some(pk) => Some(pk),
            None => {
                let received = data.get(field).map_or("null", json_type_name);
                self.fail(
                    field,
                    format!("Incorrect type. Expected pk value, received {received}."),
                )
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn fail<T>(&mut self, field: &str, message: impl Into<String>) -> Option<T> {
        self.errors.add(field, message);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test payload is an object")
    }

    #[test]
    fn missing_field_is_required_unless_current_value_given() {
        let data = object(json!({}));
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.string("title", None, Some("kept")), Some("kept".into()));
        assert!(reader.is_valid());

        assert_eq!(reader.string("title", None, None), None);
        let errors = reader.into_errors();
        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn string_rules_collect_every_failure() {
        let data = object(json!({
            "blank": "   ",
            "null": null,
            "flag": true,
            "long": "abcdef",
            "number": 42,
        }));
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.string("blank", None, None), None);
        assert_eq!(reader.string("null", None, None), None);
        assert_eq!(reader.string("flag", None, None), None);
        assert_eq!(reader.string("long", Some(5), None), None);
        assert_eq!(reader.string("number", None, None), Some("42".into()));

        let errors = reader.into_errors();
        assert_eq!(errors.get("blank").unwrap(), [NOT_BLANK]);
        assert_eq!(errors.get("null").unwrap(), [NOT_NULL]);
        assert_eq!(errors.get("flag").unwrap(), [INVALID_STRING]);
        assert_eq!(
            errors.get("long").unwrap(),
            ["Ensure this field has no more than 5 characters."]
        );
        assert!(errors.get("number").is_none());
    }

    #[test]
    fn strings_are_trimmed() {
        let data = object(json!({ "name": "  Ada  " }));
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.string("name", Some(3), None), Some("Ada".into()));
    }

    #[test]
    fn pk_accepts_integers_and_numeric_strings() {
        let data = object(json!({ "a": 3, "b": " 7 ", "c": "x", "d": [1], "e": 1.5 }));
        let mut reader = FieldReader::new(&data);
        assert_eq!(reader.pk("a", None), Some(3));
        assert_eq!(reader.pk("b", None), Some(7));
        assert_eq!(reader.pk("c", None), None);
        assert_eq!(reader.pk("d", None), None);
        assert_eq!(reader.pk("e", None), None);

        let errors = reader.into_errors();
        assert_eq!(
            errors.get("c").unwrap(),
            ["Incorrect type. Expected pk value, received string."]
        );
        assert_eq!(
            errors.get("d").unwrap(),
            ["Incorrect type. Expected pk value, received array."]
        );
    }

    #[test]
    fn non_object_payload_is_a_non_field_error() {
        let errors = expect_object(&json!([1, 2])).unwrap_err();
        assert_eq!(
            errors.get(NON_FIELD_ERRORS).unwrap(),
            ["Invalid data. Expected a dictionary, but got array."]
        );
    }

    #[test]
    fn errors_serialize_as_plain_map() {
        let errors = FieldErrors::single("title", REQUIRED);
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "title": ["This field is required."] })
        );
    }
}
