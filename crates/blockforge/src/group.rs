//! Field group documents
//!
//! A field group is the unit handed to the host plugin for registration. Only
//! `key` and `fields` are interpreted here; every other top-level setting
//! (title, location rules, ...) is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

/// Conventional prefix of field group keys
pub const GROUP_KEY_PREFIX: &str = "group_";

/// Keys that hold nested field collections
pub const CONTAINER_KEYS: [&str; 3] = ["fields", "sub_fields", "layouts"];

/// Returns true when `key` names a nested field collection
pub fn is_container_key(key: &str) -> bool {
    CONTAINER_KEYS.contains(&key)
}

/// Returns true when an entry owns a nested field collection
pub fn has_container(entry: &Map<String, Value>) -> bool {
    entry.keys().any(|k| is_container_key(k))
}

/// Bare token of a group key, used when rewriting embedded identifiers.
///
/// Every occurrence of `group_` is removed, not only a leading one.
pub fn key_token(key: &str) -> String {
    key.replace(GROUP_KEY_PREFIX, "")
}

/// A single field entry: an open JSON object with a few well-known keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field(Map<String, Value>);

impl Field {
    /// Create a field with a name and a type
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(name.into()));
        map.insert("type".to_string(), Value::String(field_type.into()));
        Field(map)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn field_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a setting, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style variant of [`Field::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// A composite field owns a nested collection and never receives defaults directly
    pub fn is_composite(&self) -> bool {
        has_container(&self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Field {
    fn from(map: Map<String, Value>) -> Self {
        Field(map)
    }
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        Value::Object(field.0)
    }
}

/// A field group document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    /// Globally unique key, conventionally `group_<token>`
    pub key: String,

    /// Ordered top-level fields
    pub fields: Vec<Field>,

    /// Every other top-level setting, opaque to composition
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl FieldGroup {
    /// Create an empty group
    pub fn new(key: impl Into<String>) -> Self {
        FieldGroup {
            key: key.into(),
            fields: Vec::new(),
            settings: Map::new(),
        }
    }

    /// Parse a base document
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(SchemaError::InvalidDocument {
                reason: "root must be an object".to_string(),
            });
        };

        let key = match map.remove("key") {
            Some(Value::String(key)) => key,
            _ => return Err(SchemaError::MissingKey),
        };

        let fields = match map.remove("fields") {
            Some(Value::Array(items)) => items,
            _ => return Err(SchemaError::MissingFieldList { key }),
        };

        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(entry) => Ok(Field(entry)),
                other => Err(SchemaError::InvalidDocument {
                    reason: format!("field {} of '{}' is not an object: {}", index, key, other),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FieldGroup {
            key,
            fields,
            settings: map,
        })
    }

    /// Parse a global fragment destined for `anchor`, failing fast on a missing key or field list
    pub fn fragment_from_value(anchor: &str, value: Value) -> Result<Self> {
        Self::from_value(value).map_err(|err| match err {
            SchemaError::MissingKey => SchemaError::malformed(anchor, "missing 'key'"),
            SchemaError::MissingFieldList { .. } => {
                SchemaError::malformed(anchor, "missing 'fields' list")
            }
            SchemaError::InvalidDocument { reason } => SchemaError::malformed(anchor, reason),
            other => other,
        })
    }

    /// Serialize back into a plain JSON document
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Top-level field names in order; unnamed fields are skipped
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().filter_map(Field::name).collect()
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

}

impl TryFrom<Value> for FieldGroup {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self> {
        FieldGroup::from_value(value)
    }
}
