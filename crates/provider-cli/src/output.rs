//! Terminal output.
//!
//! Status lines are decorated for humans; resource state goes to stdout as
//! plain JSON so it can be piped.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};

use provider_core::ResourceData;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field, `-` when unset.
pub fn field(label: &str, value: Option<&str>) {
    println!("{}: {}", label.dimmed(), value.unwrap_or("-"));
}

pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resource state as one JSON object, the id alongside the attributes.
fn flatten_resource(data: &ResourceData) -> Value {
    let mut object = Map::new();
    if let Some(id) = data.id() {
        object.insert("id".to_string(), Value::String(id.to_string()));
    }
    for (key, value) in data.attributes() {
        if !value.is_null() {
            object.insert(key.clone(), value.clone());
        }
    }
    Value::Object(object)
}

pub fn resource(data: &ResourceData) -> Result<()> {
    json_pretty(&flatten_resource(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_json_includes_id_and_drops_nulls() {
        let mut data = ResourceData::new()
            .with("label", "deploy")
            .with("notes", Value::Null);
        data.set_id("42");

        let value = flatten_resource(&data);
        assert_eq!(value, json!({"id": "42", "label": "deploy"}));
    }
}
