//! Default field settings
//!
//! [`SchemaBuilder`] walks a field group depth-first and fills in per-type
//! default settings on every leaf field. Explicit settings always win, so
//! building twice with the same defaults is a no-op the second time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::case;
use crate::error::{Result, SchemaError};
use crate::group::{Field, FieldGroup, has_container, is_container_key};

/// Defaults entry applied to the group's own top-level settings
pub const FIELD_GROUP_DEFAULTS: &str = "field_group";

/// Default settings keyed by field type
///
/// Type keys are normalised to snake_case on the way in, so `trueFalse`
/// and `true_false` address the same entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Map<String, Value>>")]
pub struct FieldDefaults(BTreeMap<String, Map<String, Value>>);

impl From<BTreeMap<String, Map<String, Value>>> for FieldDefaults {
    fn from(raw: BTreeMap<String, Map<String, Value>>) -> Self {
        let mut defaults = FieldDefaults::new();
        for (field_type, settings) in raw {
            defaults.set(field_type, settings);
        }
        defaults
    }
}

impl FieldDefaults {
    pub fn new() -> Self {
        FieldDefaults(BTreeMap::new())
    }

    /// Parse a `{ type: { setting: value } }` document
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(raw) = value else {
            return Err(SchemaError::InvalidDocument {
                reason: "field defaults must be an object keyed by field type".to_string(),
            });
        };

        let mut defaults = FieldDefaults::new();
        for (field_type, settings) in raw {
            match settings {
                Value::Object(settings) => {
                    defaults.set(field_type, settings);
                }
                other => {
                    return Err(SchemaError::InvalidDocument {
                        reason: format!(
                            "defaults for field type '{}' must be an object, got {}",
                            field_type, other
                        ),
                    });
                }
            }
        }
        Ok(defaults)
    }

    /// Replace the defaults for one field type
    pub fn set(&mut self, field_type: impl AsRef<str>, settings: Map<String, Value>) -> &mut Self {
        self.0.insert(case::snake(field_type.as_ref()), settings);
        self
    }

    /// Builder-style variant of [`FieldDefaults::set`]
    pub fn with(mut self, field_type: impl AsRef<str>, settings: Value) -> Self {
        if let Value::Object(settings) = settings {
            self.set(field_type, settings);
        }
        self
    }

    pub fn get(&self, field_type: &str) -> Option<&Map<String, Value>> {
        self.0.get(field_type)
    }

    /// Settings merged into the group itself, if configured
    pub fn field_group(&self) -> Option<&Map<String, Value>> {
        self.get(FIELD_GROUP_DEFAULTS)
    }

    /// Layer `overrides` on top of these defaults; an overriding type replaces the whole entry
    pub fn layered(mut self, overrides: &FieldDefaults) -> Self {
        for (field_type, settings) in &overrides.0 {
            self.0.insert(field_type.clone(), settings.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

/// Applies [`FieldDefaults`] to field groups and raw field trees
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    defaults: FieldDefaults,
}

impl SchemaBuilder {
    pub fn new(defaults: FieldDefaults) -> Self {
        SchemaBuilder { defaults }
    }

    pub fn defaults(&self) -> &FieldDefaults {
        &self.defaults
    }

    /// Apply defaults to every leaf field of `group`
    ///
    /// Field order is preserved and no field is added or removed.
    pub fn build(&self, mut group: FieldGroup) -> FieldGroup {
        let mut applied = 0;
        for field in &mut group.fields {
            applied += self.apply_field(field.as_map_mut());
        }
        applied += self.apply_node(&mut group.settings);

        debug!(
            group = %group.key,
            fields = group.fields.len(),
            applied,
            "applied field defaults"
        );
        group
    }

    /// Apply defaults to a raw document or a raw field list
    ///
    /// Objects are treated as documents (only container keys are visited),
    /// arrays as field lists. Anything else is returned unchanged.
    pub fn build_value(&self, mut value: Value) -> Value {
        if let Value::Object(node) = &mut value {
            self.apply_node(node);
        } else if value.is_array() {
            self.apply_container(&mut value);
        }
        value
    }

    /// Apply defaults to a single field, recursing if it is composite
    pub fn build_field(&self, field: Field) -> Field {
        let mut map = field.into_map();
        self.apply_field(&mut map);
        Field::from(map)
    }

    // Visit the container keys of a document or composite field
    fn apply_node(&self, node: &mut Map<String, Value>) -> usize {
        node.iter_mut()
            .filter(|(key, _)| is_container_key(key))
            .map(|(_, value)| self.apply_container(value))
            .sum()
    }

    // Field lists are arrays; flexible-content layouts may also be keyed objects.
    // Any other shape is skipped.
    fn apply_container(&self, container: &mut Value) -> usize {
        let entries: Box<dyn Iterator<Item = &mut Value>> = match container {
            Value::Array(items) => Box::new(items.iter_mut()),
            Value::Object(items) => Box::new(items.values_mut()),
            _ => return 0,
        };

        entries
            .map(|entry| match entry {
                Value::Object(field) => self.apply_field(field),
                _ => 0,
            })
            .sum()
    }

    fn apply_field(&self, field: &mut Map<String, Value>) -> usize {
        if has_container(field) {
            return self.apply_node(field);
        }

        let Some(defaults) = field
            .get("type")
            .and_then(Value::as_str)
            .and_then(|t| self.defaults.get(t))
        else {
            return 0;
        };

        // Defaults first so explicit settings overwrite them in place
        let explicit = std::mem::take(field);
        let mut merged = defaults.clone();
        merged.extend(explicit);
        *field = merged;
        1
    }
}
