//! Uniform record shape produced by the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One logical entity (a place, a review, a route, a search hit...)
///
/// Fields are passed through as returned by the API. Nested collections such
/// as `reviews_data` or `photos_data` stay nested inside the parent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: Map<String, Value>,

    #[serde(skip)]
    identity_field: Option<&'static str>,
}

impl NormalizedRecord {
    /// Wrap an entity mapping, noting which field identifies it
    pub fn new(fields: Map<String, Value>, identity_field: Option<&'static str>) -> Self {
        Self {
            fields,
            identity_field,
        }
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields of the record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Name of the identity-bearing field for this record's operation
    pub fn identity_field(&self) -> Option<&'static str> {
        self.identity_field
    }

    /// Value of the identity field, when the upstream payload carried one
    pub fn identity(&self) -> Option<&str> {
        self.identity_field
            .and_then(|field| self.fields.get(field))
            .and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_identity_present() {
        let record = NormalizedRecord::new(
            map(json!({"place_id": "ChIJ123", "name": "Cafe"})),
            Some("place_id"),
        );
        assert_eq!(record.identity(), Some("ChIJ123"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_identity_absent_is_not_an_error() {
        let record = NormalizedRecord::new(map(json!({"name": "Cafe"})), Some("place_id"));
        assert_eq!(record.identity(), None);

        let route = NormalizedRecord::new(map(json!({"distance": "3 km"})), None);
        assert_eq!(route.identity(), None);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let record = NormalizedRecord::new(
            map(json!({"name": "Cafe", "reviews_data": [{"review_id": "r1"}]})),
            Some("place_id"),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["reviews_data"][0]["review_id"], "r1");
        assert!(value.get("identity_field").is_none());
    }
}
