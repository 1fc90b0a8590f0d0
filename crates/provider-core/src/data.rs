//! Attribute state for a single resource instance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidInputError;

/// The id and attributes of one resource, data source, or provider config.
///
/// An empty id means the object does not exist remotely: reads clear it when
/// the remote API reports the object gone, deletes clear it on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for an existing object known only by id (import passthrough).
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: Map::new(),
        }
    }

    /// Build from a JSON object of attributes.
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the object as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Returns the id or an error naming the missing id.
    pub fn require_id(&self) -> Result<&str, InvalidInputError> {
        self.id()
            .ok_or_else(|| InvalidInputError::attribute("id", "resource has no id"))
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns a non-null attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns a non-empty string attribute.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn get_map(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// Returns the single block of a `max_items = 1` block list.
    pub fn get_block(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get_list(key)
            .and_then(|items| items.first())
            .and_then(Value::as_object)
    }

    /// Returns a required string attribute.
    pub fn require_str(&self, key: &str) -> Result<&str, InvalidInputError> {
        self.get_str(key)
            .ok_or_else(|| InvalidInputError::attribute(key, "is required"))
    }

    /// Returns a required integer attribute.
    pub fn require_i64(&self, key: &str) -> Result<i64, InvalidInputError> {
        self.get_i64(key)
            .ok_or_else(|| InvalidInputError::attribute(key, "is required"))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Copy every attribute of `other` over this one.
    pub fn merge(&mut self, other: &ResourceData) {
        for (k, v) in &other.attributes {
            self.attributes.insert(k.clone(), v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_getters() {
        let data = ResourceData::new()
            .with("label", "key")
            .with("cores", 2)
            .with("hourly", true)
            .with("empty", "")
            .with("nothing", Value::Null);

        assert_eq!(data.get_str("label"), Some("key"));
        assert_eq!(data.get_i64("cores"), Some(2));
        assert_eq!(data.get_bool("hourly"), Some(true));
        assert_eq!(data.get_non_empty("empty"), None);
        assert!(data.get("nothing").is_none());
        assert!(data.require_str("missing").is_err());
    }

    #[test]
    fn block_lookup() {
        let data = ResourceData::new().with("metadata", json!([{ "name": "ns" }]));
        assert_eq!(data.get_block("metadata").unwrap()["name"], "ns");
    }

    #[test]
    fn id_lifecycle() {
        let mut data = ResourceData::with_id("123");
        assert_eq!(data.require_id().unwrap(), "123");
        data.clear_id();
        assert!(data.id().is_none());
        assert!(data.require_id().is_err());
    }

    #[test]
    fn serde_skips_missing_id() {
        let data = ResourceData::new().with("label", "key");
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("id").is_none());

        let back: ResourceData = serde_json::from_value(json!({ "id": "9" })).unwrap();
        assert_eq!(back.id(), Some("9"));
        assert!(back.attributes().is_empty());
    }
}
