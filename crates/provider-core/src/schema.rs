//! Declarative attribute schemas.
//!
//! A [`SchemaMap`] describes the attributes a provider, resource, or data
//! source accepts: their types, whether they are required, optional, or
//! computed, and how they are defaulted and validated. Configuration is
//! checked against it with [`prepare`] before any remote call is made.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::ResourceData;
use crate::error::InvalidInputError;

/// Attribute schemas keyed by attribute name.
pub type SchemaMap = BTreeMap<&'static str, Schema>;

/// Produces a default value for an unset attribute.
pub type DefaultFn = fn() -> Option<Value>;

/// Checks an attribute value, returning a reason on failure.
pub type ValidateFn = fn(&Value) -> Result<(), String>;

/// Attribute value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Bool,
    List,
    Map,
}

impl ValueType {
    fn matches(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Bool => value.is_boolean(),
            ValueType::List => value.is_array(),
            ValueType::Map => value
                .as_object()
                .is_some_and(|m| m.values().all(Value::is_string)),
        }
    }
}

/// Element description for list attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Elem {
    /// A list of scalar values.
    Type(ValueType),
    /// A list of nested blocks.
    Block(SchemaMap),
}

/// Schema for a single attribute.
#[derive(Clone, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub description: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "no_keys")]
    pub conflicts_with: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem: Option<Elem>,
    #[serde(skip)]
    pub default: Option<DefaultFn>,
    #[serde(skip)]
    pub validate: Option<ValidateFn>,
}

impl Schema {
    fn of(value_type: ValueType, description: &'static str) -> Self {
        Self {
            value_type,
            description,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            max_items: None,
            conflicts_with: &[],
            elem: None,
            default: None,
            validate: None,
        }
    }

    pub fn string(description: &'static str) -> Self {
        Self::of(ValueType::String, description)
    }

    pub fn int(description: &'static str) -> Self {
        Self::of(ValueType::Int, description)
    }

    pub fn bool(description: &'static str) -> Self {
        Self::of(ValueType::Bool, description)
    }

    pub fn map(description: &'static str) -> Self {
        Self::of(ValueType::Map, description)
    }

    /// A list of scalar values.
    pub fn list_of(value_type: ValueType, description: &'static str) -> Self {
        let mut schema = Self::of(ValueType::List, description);
        schema.elem = Some(Elem::Type(value_type));
        schema
    }

    /// A list of nested blocks.
    pub fn block_list(block: SchemaMap, description: &'static str) -> Self {
        let mut schema = Self::of(ValueType::List, description);
        schema.elem = Some(Elem::Block(block));
        schema
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn conflicts_with(mut self, keys: &'static [&'static str]) -> Self {
        self.conflicts_with = keys;
        self
    }

    pub fn default_fn(mut self, f: DefaultFn) -> Self {
        self.default = Some(f);
        self
    }

    pub fn validate_with(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    /// Computed attributes that the user may not set.
    fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("type", &self.value_type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .finish_non_exhaustive()
    }
}

fn no_keys(keys: &&'static [&'static str]) -> bool {
    keys.is_empty()
}

/// Fill unset attributes from their default functions.
pub fn apply_defaults(schema: &SchemaMap, data: &mut ResourceData) {
    for (key, attr) in schema {
        if data.get(key).is_some() {
            continue;
        }
        if let Some(default) = attr.default
            && let Some(value) = default()
        {
            data.set(*key, value);
        }
    }
}

/// Validate attributes against a schema.
pub fn validate(schema: &SchemaMap, data: &ResourceData) -> Result<(), InvalidInputError> {
    validate_block(schema, data.attributes(), "")
}

/// Apply defaults, then validate.
pub fn prepare(schema: &SchemaMap, data: &mut ResourceData) -> Result<(), InvalidInputError> {
    apply_defaults(schema, data);
    validate(schema, data)
}

fn validate_block(
    schema: &SchemaMap,
    attrs: &Map<String, Value>,
    prefix: &str,
) -> Result<(), InvalidInputError> {
    for key in attrs.keys() {
        if !schema.contains_key(key.as_str()) {
            return Err(InvalidInputError::attribute(
                format!("{prefix}{key}"),
                "is not a known attribute",
            ));
        }
    }

    for (key, attr) in schema {
        let path = format!("{prefix}{key}");
        let value = attrs.get(*key).filter(|v| !v.is_null());

        let Some(value) = value else {
            if attr.required {
                return Err(InvalidInputError::attribute(path, "is required"));
            }
            continue;
        };

        if attr.is_computed_only() {
            return Err(InvalidInputError::attribute(
                path,
                "is computed and cannot be set",
            ));
        }

        if !attr.value_type.matches(value) {
            return Err(InvalidInputError::attribute(
                path,
                format!("expected {:?}", attr.value_type).to_lowercase(),
            ));
        }

        if let Some(other) = attr
            .conflicts_with
            .iter()
            .find(|other| attrs.get(**other).is_some_and(|v| !v.is_null()))
        {
            return Err(InvalidInputError::attribute(
                path,
                format!("conflicts with {prefix}{other}"),
            ));
        }

        if let (Some(max), Some(items)) = (attr.max_items, value.as_array())
            && items.len() > max
        {
            return Err(InvalidInputError::attribute(
                path,
                format!("at most {max} item(s) allowed, got {}", items.len()),
            ));
        }

        if let Some(check) = attr.validate {
            check(value).map_err(|reason| InvalidInputError::attribute(path.clone(), reason))?;
        }

        match (&attr.elem, value.as_array()) {
            (Some(Elem::Type(elem_type)), Some(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if !elem_type.matches(item) {
                        return Err(InvalidInputError::attribute(
                            format!("{path}.{i}"),
                            format!("expected {:?}", elem_type).to_lowercase(),
                        ));
                    }
                }
            }
            (Some(Elem::Block(block)), Some(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let inner = item.as_object().ok_or_else(|| {
                        InvalidInputError::attribute(format!("{path}.{i}"), "expected a block")
                    })?;
                    validate_block(block, inner, &format!("{path}.{i}."))?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
