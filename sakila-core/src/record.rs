//! Opaque backend records.
//!
//! The backend is authoritative for every field, so records are kept as raw
//! JSON and only read by field name (objects) or by position (the array rows
//! returned by the Home endpoints).

use crate::error::ValidationError;
use crate::ids::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::value::Index;
use serde_json::Value;

/// Rendered in place of a field the backend did not send.
pub const MISSING_FIELD: &str = "undefined";

/// One JSON entity returned by the backend (customer, film, actor, rental).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Raw field access: `record.get("title")` or `record.get(1)`.
    pub fn get<I: Index>(&self, key: I) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn has<I: Index>(&self, key: I) -> bool {
        self.0.get(key).is_some()
    }

    /// Field rendered for display. Strings lose their quotes, `null` is
    /// blank and a missing field shows [`MISSING_FIELD`].
    pub fn text<I: Index>(&self, key: I) -> String {
        match self.0.get(key) {
            None => MISSING_FIELD.to_string(),
            Some(value) => display_value(value),
        }
    }

    /// Integer field, accepting numeric strings as well as numbers.
    pub fn int<I: Index>(&self, key: I) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn id<Id: RecordId, I: Index>(&self, key: I) -> Option<Id> {
        self.int(key).map(Id::new)
    }

    /// Like [`Record::id`] but reports which field was missing.
    pub fn require_id<Id: RecordId>(&self, field: &'static str) -> Result<Id, ValidationError> {
        self.id(field).ok_or(ValidationError::MissingId { field })
    }

    pub fn is_null<I: Index>(&self, key: I) -> bool {
        matches!(self.0.get(key), None | Some(Value::Null))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ActorId, CustomerId};
    use serde_json::json;

    #[test]
    fn text_reads_object_fields() {
        let record = Record::new(json!({"first_name": "MARY", "active": true, "store_id": 1}));
        assert_eq!(record.text("first_name"), "MARY");
        assert_eq!(record.text("active"), "true");
        assert_eq!(record.text("store_id"), "1");
    }

    #[test]
    fn missing_field_renders_placeholder() {
        let record = Record::new(json!({"title": "ACADEMY DINOSAUR"}));
        assert_eq!(record.text("genre"), MISSING_FIELD);
        assert_eq!(record.text(7), MISSING_FIELD);
    }

    #[test]
    fn null_field_renders_blank() {
        let record = Record::new(json!({"return_date": null}));
        assert_eq!(record.text("return_date"), "");
        assert!(record.is_null("return_date"));
        assert!(record.is_null("missing"));
    }

    #[test]
    fn positional_rows_are_indexed() {
        let record = Record::new(json!([107, "GINA", "DEGENERES", 42]));
        assert_eq!(record.id::<ActorId, _>(0), Some(ActorId::new(107)));
        assert_eq!(record.text(1), "GINA");
    }

    #[test]
    fn ids_accept_numeric_strings() {
        let record = Record::new(json!({"customer_id": "12"}));
        assert_eq!(record.id::<CustomerId, _>("customer_id"), Some(CustomerId::new(12)));
    }

    #[test]
    fn require_id_names_missing_field() {
        let record = Record::new(json!({"first_name": "MARY"}));
        let err = record.require_id::<CustomerId>("customer_id").unwrap_err();
        assert_eq!(err, ValidationError::MissingId { field: "customer_id" });
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn absent_keys_render_placeholder(key in "[a-z_]{1,12}", value in "[A-Z]{0,8}") {
            let record = Record::new(json!({ "present": value }));
            prop_assume!(key != "present");
            prop_assert_eq!(record.text(key.as_str()), MISSING_FIELD);
            prop_assert_eq!(record.text("present"), value);
        }

        #[test]
        fn integer_ids_survive_string_form(raw in 1i64..1_000_000) {
            let as_number = Record::new(json!({ "rental_id": raw }));
            let as_string = Record::new(json!({ "rental_id": raw.to_string() }));
            prop_assert_eq!(as_number.int("rental_id"), Some(raw));
            prop_assert_eq!(as_string.int("rental_id"), Some(raw));
        }
    }
}
