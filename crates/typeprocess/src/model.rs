//! Data types exchanged with the list item endpoint.
//!
//! Field names follow SharePoint's wire casing (`FieldName`, `FieldValue`, ...)
//! so these types serialize directly into request bodies and deserialize
//! directly out of verbose OData responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field value to set on the new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormValue {
    /// Internal name of the list field.
    pub field_name: String,
    /// Value in the string form the endpoint validates.
    pub field_value: String,
}

impl FormValue {
    /// Create a new field value pair.
    #[must_use]
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

/// Caller-supplied data for a create-item call.
///
/// Reads from and writes to `{"formValues": [...]}` so form payloads can be
/// kept in JSON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    /// Ordered field values for the new item.
    #[serde(default)]
    pub form_values: Vec<FormValue>,
}

impl SubmissionData {
    /// Create submission data from field values.
    #[must_use]
    pub fn new(form_values: Vec<FormValue>) -> Self {
        Self { form_values }
    }
}

impl FromIterator<FormValue> for SubmissionData {
    fn from_iter<I: IntoIterator<Item = FormValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One validated field echoed back by the server.
///
/// The entry is kept exactly as received (including `__metadata` and any
/// properties newer servers add) and serializes back unchanged. The accessors
/// read the well-known properties leniently: a missing or `null` property is
/// `None`/`false` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListItemFormUpdateValue(Value);

impl ListItemFormUpdateValue {
    /// Wrap a raw result entry.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    /// The entry as received.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the raw entry.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Internal name of the list field.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        self.0.get("FieldName").and_then(Value::as_str)
    }

    /// Value as stored by the server. Non-string scalars are rendered as JSON.
    #[must_use]
    pub fn field_value(&self) -> Option<String> {
        match self.0.get("FieldValue")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Whether validation failed for this field.
    #[must_use]
    pub fn has_exception(&self) -> bool {
        self.0
            .get("HasException")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Server error code for this field (0 on success).
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        self.0.get("ErrorCode").and_then(Value::as_i64)
    }

    /// Validation message, when `has_exception` is set.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("ErrorMessage").and_then(Value::as_str)
    }

    /// Id of the created item.
    #[must_use]
    pub fn item_id(&self) -> Option<i64> {
        match self.0.get("ItemId")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl From<Value> for ListItemFormUpdateValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

/// Count the fields the server rejected.
#[must_use]
pub fn exception_count(results: &[ListItemFormUpdateValue]) -> usize {
    results.iter().filter(|v| v.has_exception()).count()
}

/// The id of the created item, taken from the first field that reports one.
#[must_use]
pub fn created_item_id(results: &[ListItemFormUpdateValue]) -> Option<i64> {
    results.iter().find_map(ListItemFormUpdateValue::item_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_data_reads_form_values_key() {
        let json = r#"{"formValues":[{"FieldName":"Title","FieldValue":"Hello"}]}"#;
        let data: SubmissionData = serde_json::from_str(json).unwrap();
        assert_eq!(data.form_values, vec![FormValue::new("Title", "Hello")]);
    }

    #[test]
    fn test_submission_data_missing_key_is_empty() {
        let data: SubmissionData = serde_json::from_str("{}").unwrap();
        assert!(data.form_values.is_empty());
    }

    #[test]
    fn test_form_value_serializes_pascal_case() {
        let json = serde_json::to_string(&FormValue::new("Status", "Open")).unwrap();
        assert_eq!(json, r#"{"FieldName":"Status","FieldValue":"Open"}"#);
    }

    #[test]
    fn test_collect_preserves_order() {
        let data: SubmissionData = ["A", "B", "C"]
            .iter()
            .map(|name| FormValue::new(*name, "x"))
            .collect();
        let names: Vec<_> = data.form_values.iter().map(|v| v.field_name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_update_value_accessors() {
        let json = r#"{
            "__metadata": {"type": "SP.ListItemFormUpdateValue"},
            "ErrorCode": 0,
            "ErrorMessage": null,
            "FieldName": "Title",
            "FieldValue": "Hello",
            "HasException": false,
            "ItemId": 17
        }"#;
        let value: ListItemFormUpdateValue = serde_json::from_str(json).unwrap();
        assert_eq!(value.field_name(), Some("Title"));
        assert_eq!(value.field_value().as_deref(), Some("Hello"));
        assert_eq!(value.item_id(), Some(17));
        assert_eq!(value.error_code(), Some(0));
        assert_eq!(value.error_message(), None);
        assert!(!value.has_exception());
    }

    #[test]
    fn test_update_value_round_trips_unknown_properties() {
        let raw = serde_json::json!({
            "__metadata": {"type": "SP.ListItemFormUpdateValue"},
            "FieldName": "Title",
            "FieldValue": "Hello",
            "Extra": {"nested": [1, 2]}
        });
        let value: ListItemFormUpdateValue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), raw);
        assert_eq!(value.into_json(), raw);
    }

    #[test]
    fn test_update_value_tolerates_nulls_and_numbers() {
        let value = ListItemFormUpdateValue::from_json(serde_json::json!({
            "FieldName": "Count",
            "FieldValue": 5,
            "HasException": null,
            "ErrorCode": null,
            "ItemId": "23"
        }));
        assert_eq!(value.field_value().as_deref(), Some("5"));
        assert!(!value.has_exception());
        assert_eq!(value.error_code(), None);
        assert_eq!(value.item_id(), Some(23));

        let empty = ListItemFormUpdateValue::from_json(serde_json::json!({"FieldValue": null}));
        assert_eq!(empty.field_name(), None);
        assert_eq!(empty.field_value(), None);
    }

    #[test]
    fn test_exception_count_and_item_id() {
        let results: Vec<ListItemFormUpdateValue> = vec![
            serde_json::json!({"FieldName": "Title", "ItemId": 4}).into(),
            serde_json::json!({
                "FieldName": "DueDate",
                "HasException": true,
                "ErrorCode": -2_146_232_832,
                "ErrorMessage": "Invalid date"
            })
            .into(),
        ];
        assert_eq!(exception_count(&results), 1);
        assert_eq!(created_item_id(&results), Some(4));
        assert_eq!(results[1].error_message(), Some("Invalid date"));
    }

    #[test]
    fn test_created_item_id_empty() {
        assert_eq!(created_item_id(&[]), None);
    }
}
