//! The `metadata` block: schema, validators, and conversion to and from
//! [`ObjectMeta`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use provider_core::{Schema, SchemaMap};

use crate::types::ObjectMeta;

const DNS1123_LABEL_MAX: usize = 63;
const DNS1123_SUBDOMAIN_MAX: usize = 253;
const QUALIFIED_NAME_MAX: usize = 63;
const LABEL_VALUE_MAX: usize = 63;
/// Room left for the five-character random suffix the server appends.
const GENERATE_NAME_MAX: usize = DNS1123_LABEL_MAX - 5;

/// Keys containing this are owned by Kubernetes itself.
const RESERVED_KEY: &str = "kubernetes.io/";

static DNS1123_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid regex")
});

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$").expect("valid regex")
});

/// Schema of the single `metadata` block.
pub fn metadata_schema() -> Schema {
    let block = SchemaMap::from([
        (
            "annotations",
            Schema::map(
                "An unstructured key value map stored with the namespace that may be \
                 used to store arbitrary metadata.",
            )
            .optional()
            .validate_with(validate_annotations),
        ),
        (
            "generate_name",
            Schema::string(
                "Prefix used by the server to generate a unique name when `name` is unset.",
            )
            .optional()
            .force_new()
            .conflicts_with(&["name"])
            .validate_with(validate_generate_name),
        ),
        (
            "generation",
            Schema::int("A sequence number representing a specific generation of the desired state.")
                .computed(),
        ),
        (
            "labels",
            Schema::map("Map of string keys and values used to organize and select objects.")
                .optional()
                .validate_with(validate_labels),
        ),
        (
            "name",
            Schema::string("Name of the namespace, unique within the cluster. Cannot be updated.")
                .optional()
                .computed()
                .force_new()
                .conflicts_with(&["generate_name"])
                .validate_with(validate_name),
        ),
        (
            "resource_version",
            Schema::string("Opaque version of this object, used for change detection.")
                .computed(),
        ),
        (
            "self_link",
            Schema::string("A URL representing this object.").computed(),
        ),
        (
            "uid",
            Schema::string("The unique in time and space value for this object.").computed(),
        ),
    ]);

    Schema::block_list(block, "Standard object's metadata.")
        .required()
        .max_items(1)
}

/// Build [`ObjectMeta`] from the user's `metadata` block.
pub fn expand_metadata(block: Option<&Map<String, Value>>) -> ObjectMeta {
    let Some(block) = block else {
        return ObjectMeta::default();
    };

    let string = |key: &str| {
        block
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    ObjectMeta {
        name: string("name"),
        generate_name: string("generate_name"),
        labels: expand_string_map(block.get("labels")),
        annotations: expand_string_map(block.get("annotations")),
        ..Default::default()
    }
}

fn expand_string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Render [`ObjectMeta`] as the one-element `metadata` list.
///
/// Keys reserved for Kubernetes are dropped from labels and annotations so
/// that server-added entries do not show up as drift.
pub fn flatten_metadata(meta: &ObjectMeta) -> Value {
    json!([{
        "annotations": remove_internal_keys(&meta.annotations),
        "generate_name": meta.generate_name.clone().unwrap_or_default(),
        "generation": meta.generation.unwrap_or_default(),
        "labels": remove_internal_keys(&meta.labels),
        "name": meta.name.clone().unwrap_or_default(),
        "resource_version": meta.resource_version.clone().unwrap_or_default(),
        "self_link": meta.self_link.clone().unwrap_or_default(),
        "uid": meta.uid.clone().unwrap_or_default(),
    }])
}

fn remove_internal_keys(map: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.iter()
        .filter(|(k, _)| !k.contains(RESERVED_KEY))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

// ============================================================================
// Validators
// ============================================================================

pub fn validate_name(value: &Value) -> Result<(), String> {
    let name = value.as_str().unwrap_or_default();
    if name.len() > DNS1123_LABEL_MAX {
        return Err(format!(
            "must be no more than {DNS1123_LABEL_MAX} characters"
        ));
    }
    if !DNS1123_LABEL.is_match(name) {
        return Err(
            "must consist of lower case alphanumeric characters or '-', and must start \
             and end with an alphanumeric character"
                .to_string(),
        );
    }
    Ok(())
}

pub fn validate_generate_name(value: &Value) -> Result<(), String> {
    let prefix = value.as_str().unwrap_or_default();
    if prefix.len() > GENERATE_NAME_MAX {
        return Err(format!(
            "must be no more than {GENERATE_NAME_MAX} characters"
        ));
    }
    // A prefix may end with '-'; the generated suffix completes the label.
    let masked = match prefix.strip_suffix('-') {
        Some(stem) => format!("{stem}a"),
        None => prefix.to_string(),
    };
    validate_name(&Value::String(masked))
}

pub fn validate_labels(value: &Value) -> Result<(), String> {
    let Some(labels) = value.as_object() else {
        return Ok(());
    };

    for (key, value) in labels {
        validate_key(key)?;

        let value = value.as_str().unwrap_or_default();
        if value.len() > LABEL_VALUE_MAX {
            return Err(format!(
                "label value of {key:?} must be no more than {LABEL_VALUE_MAX} characters"
            ));
        }
        if !value.is_empty() && !QUALIFIED_NAME.is_match(value) {
            return Err(format!(
                "label value {value:?} must consist of alphanumeric characters, '-', '_' \
                 or '.', and must start and end with an alphanumeric character"
            ));
        }
    }
    Ok(())
}

pub fn validate_annotations(value: &Value) -> Result<(), String> {
    let Some(annotations) = value.as_object() else {
        return Ok(());
    };

    for key in annotations.keys() {
        validate_key(key)?;
    }
    Ok(())
}

/// A qualified name that is not reserved.
fn validate_key(key: &str) -> Result<(), String> {
    if key.contains(RESERVED_KEY) {
        return Err(format!("{key:?} is reserved for Kubernetes"));
    }
    validate_qualified_name(key)
}

/// `[prefix/]name` where the prefix is a DNS-1123 subdomain.
fn validate_qualified_name(key: &str) -> Result<(), String> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            if prefix.is_empty() {
                return Err(format!("{key:?}: prefix part must be non-empty"));
            }
            if prefix.len() > DNS1123_SUBDOMAIN_MAX || !DNS1123_SUBDOMAIN.is_match(prefix) {
                return Err(format!(
                    "{key:?}: prefix part must be a lowercase DNS-1123 subdomain"
                ));
            }
            name
        }
        None => key,
    };

    if name.is_empty() {
        return Err(format!("{key:?}: name part must be non-empty"));
    }
    if name.len() > QUALIFIED_NAME_MAX {
        return Err(format!(
            "{key:?}: name part must be no more than {QUALIFIED_NAME_MAX} characters"
        ));
    }
    if !QUALIFIED_NAME.is_match(name) {
        return Err(format!(
            "{key:?}: name part must consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn names_are_dns_labels() {
        assert!(validate_name(&s("team-a")).is_ok());
        assert!(validate_name(&s("a")).is_ok());
        assert!(validate_name(&s("Team-A")).is_err());
        assert!(validate_name(&s("-team")).is_err());
        assert!(validate_name(&s("team-")).is_err());
        assert!(validate_name(&s("team_a")).is_err());
        assert!(validate_name(&s(&"a".repeat(64))).is_err());
        assert!(validate_name(&s(&"a".repeat(63))).is_ok());
    }

    #[test]
    fn generate_name_may_end_with_dash() {
        assert!(validate_generate_name(&s("team-")).is_ok());
        assert!(validate_generate_name(&s("team")).is_ok());
        assert!(validate_generate_name(&s("-team")).is_err());
        assert!(validate_generate_name(&s(&"a".repeat(59))).is_err());
        assert!(validate_generate_name(&s(&"a".repeat(58))).is_ok());
    }

    #[test]
    fn label_keys_and_values() {
        assert!(validate_labels(&json!({"app": "web", "example.com/tier": "front_end"})).is_ok());
        assert!(validate_labels(&json!({"app": ""})).is_ok());
        assert!(validate_labels(&json!({"kubernetes.io/name": "x"})).is_err());
        assert!(validate_labels(&json!({"Example.com/app": "x"})).is_err());
        assert!(validate_labels(&json!({"/app": "x"})).is_err());
        assert!(validate_labels(&json!({"app": "-web"})).is_err());
        assert!(validate_labels(&json!({"app": "a".repeat(64)})).is_err());
    }

    #[test]
    fn annotation_values_are_free_form() {
        assert!(validate_annotations(&json!({"note": "anything goes: {} / !"})).is_ok());
        assert!(validate_annotations(&json!({"deployment.kubernetes.io/revision": "1"})).is_err());
        assert!(validate_annotations(&json!({"bad key": "x"})).is_err());
    }

    #[test]
    fn expand_skips_empty_strings() {
        let block = json!({
            "name": "team-a",
            "generate_name": "",
            "labels": {"app": "web"}
        });
        let meta = expand_metadata(block.as_object());
        assert_eq!(meta.name.as_deref(), Some("team-a"));
        assert!(meta.generate_name.is_none());
        assert_eq!(meta.labels.get("app").map(String::as_str), Some("web"));
        assert!(meta.annotations.is_empty());
    }

    #[test]
    fn flatten_drops_internal_keys() {
        let meta = ObjectMeta {
            name: Some("team-a".to_string()),
            annotations: BTreeMap::from([
                ("owner".to_string(), "ops".to_string()),
                (
                    "kubectl.kubernetes.io/last-applied-configuration".to_string(),
                    "{}".to_string(),
                ),
            ]),
            generation: Some(3),
            uid: Some("b1c2".to_string()),
            ..Default::default()
        };

        let flat = flatten_metadata(&meta);
        let block = &flat[0];
        assert_eq!(block["name"], "team-a");
        assert_eq!(block["generation"], 3);
        assert_eq!(block["uid"], "b1c2");
        assert_eq!(block["annotations"], json!({"owner": "ops"}));
        assert_eq!(block["labels"], json!({}));
    }
}
