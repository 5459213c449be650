//! Block composition pipeline
//!
//! For every enabled block the composer:
//!
//! 1. registers the block type,
//! 2. merges the design fragment and then the configured global fragments,
//! 3. merges the `field_group` defaults into the group's top-level settings,
//! 4. adds a location rule targeting the block when none is set,
//! 5. applies per-type defaults (configured defaults overlaid by the block's own),
//! 6. registers the field group.
//!
//! [`Composer::compose_group`] runs the same pipeline for a field group that
//! belongs to no block, without the block registration or location rule.

use blockforge::{FieldDefaults, FieldGroup, GlobalFieldMerger, GlobalFieldSet, SchemaBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::block::{Block, BlockRegistration};
use crate::config::ComposerConfig;
use crate::error::Result;
use crate::registrar::BlockRegistrar;

/// A block after composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedBlock {
    pub registration: BlockRegistration,
    pub namespace: String,
    pub field_group: FieldGroup,
}

impl ComposedBlock {
    pub fn slug(&self) -> &str {
        &self.registration.name
    }
}

/// Composes blocks and hands them to a registrar
pub struct Composer<R: BlockRegistrar> {
    config: ComposerConfig,
    merger: GlobalFieldMerger,
    globals: GlobalFieldSet,
    registrar: R,
}

impl<R: BlockRegistrar> Composer<R> {
    pub fn new(config: ComposerConfig, registrar: R) -> Self {
        Composer {
            globals: GlobalFieldSet::standard_with(&config.globals),
            config,
            merger: GlobalFieldMerger::new(),
            registrar,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    /// Every fragment merged into a composed group, design fragment first
    pub fn globals(&self) -> &GlobalFieldSet {
        &self.globals
    }

    /// Compose and register one block
    ///
    /// Returns `Ok(None)` for a block without a display name.
    pub fn compose(&self, mut block: Block) -> Result<Option<ComposedBlock>> {
        if !block.is_enabled() {
            debug!(key = %block.fields.key, "skipping block without a name");
            return Ok(None);
        }

        block.resolve();
        let registration = block.registration()?;
        self.registrar.register_block(&registration)?;

        let group = self.compose_fields(block.fields, &block.defaults, Some(&block.namespace))?;

        debug!(
            block = %registration.name,
            namespace = %block.namespace,
            fields = group.fields.len(),
            "composed block"
        );

        Ok(Some(ComposedBlock {
            registration,
            namespace: block.namespace,
            field_group: group,
        }))
    }

    /// Parse a block declaration and compose it
    pub fn compose_value(&self, value: Value) -> Result<Option<ComposedBlock>> {
        self.compose(Block::from_value(value)?)
    }

    /// Compose and register a field group that belongs to no block
    ///
    /// `defaults` are layered over the configured defaults. The group's own
    /// location rules are kept as they are.
    pub fn compose_group(&self, group: FieldGroup, defaults: &FieldDefaults) -> Result<FieldGroup> {
        let group = self.compose_fields(group, defaults, None)?;
        debug!(key = %group.key, fields = group.fields.len(), "composed field group");
        Ok(group)
    }

    fn compose_fields(
        &self,
        group: FieldGroup,
        defaults: &FieldDefaults,
        namespace: Option<&str>,
    ) -> Result<FieldGroup> {
        let defaults = self.config.defaults.clone().layered(defaults);

        let group = self.merger.merge(group, &self.globals);
        let mut group = apply_field_group_defaults(group, &defaults)?;
        if let Some(namespace) = namespace {
            ensure_location(&mut group, namespace);
        }
        let group = SchemaBuilder::new(defaults).build(group);

        self.registrar.register_field_group(&group)?;
        Ok(group)
    }
}

/// Overlay the `field_group` defaults onto the group's top-level entries
///
/// Configured values replace existing ones, including `key` and `fields`.
pub fn apply_field_group_defaults(group: FieldGroup, defaults: &FieldDefaults) -> Result<FieldGroup> {
    let Some(overrides) = defaults.field_group() else {
        return Ok(group);
    };

    let mut document = match group.to_value()? {
        Value::Object(map) => map,
        _ => return Ok(group),
    };
    for (key, value) in overrides {
        document.insert(key.clone(), value.clone());
    }
    Ok(FieldGroup::from_value(Value::Object(document))?)
}

/// Returns true when the group's first location rule exists
pub fn has_location_rule(group: &FieldGroup) -> bool {
    group
        .setting("location")
        .and_then(|location| location.get(0))
        .and_then(|rules| rules.get(0))
        .is_some()
}

/// Set the first location rule to target `namespace` unless one is already present
pub fn ensure_location(group: &mut FieldGroup, namespace: &str) {
    if has_location_rule(group) {
        return;
    }

    let rule = json!({"param": "block", "operator": "==", "value": namespace});

    let location = group
        .settings
        .entry("location")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !location.is_array() {
        *location = Value::Array(Vec::new());
    }

    if let Value::Array(groups) = location {
        match groups.first_mut() {
            Some(Value::Array(rules)) => rules.insert(0, rule),
            Some(other) => *other = Value::Array(vec![rule]),
            None => groups.push(Value::Array(vec![rule])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group(value: Value) -> FieldGroup {
        FieldGroup::from_value(value).unwrap()
    }

    #[test]
    fn test_ensure_location_sets_rule() {
        let mut g = group(json!({"key": "group_hero", "fields": []}));
        ensure_location(&mut g, "acf/hero");
        assert_eq!(
            g.setting("location"),
            Some(&json!([[{"param": "block", "operator": "==", "value": "acf/hero"}]]))
        );
    }

    #[test]
    fn test_ensure_location_keeps_existing_rule() {
        let location = json!([[{"param": "post_type", "operator": "==", "value": "page"}]]);
        let mut g = group(json!({"key": "group_hero", "fields": [], "location": location.clone()}));
        ensure_location(&mut g, "acf/hero");
        assert_eq!(g.setting("location"), Some(&location));
    }

    #[test]
    fn test_ensure_location_fills_empty_groups() {
        let mut g = group(json!({
            "key": "group_hero",
            "fields": [],
            "location": [[], [{"param": "post_type", "operator": "==", "value": "page"}]],
        }));
        ensure_location(&mut g, "acf/hero");
        assert_eq!(
            g.setting("location"),
            Some(&json!([
                [{"param": "block", "operator": "==", "value": "acf/hero"}],
                [{"param": "post_type", "operator": "==", "value": "page"}],
            ]))
        );

        let mut g = group(json!({"key": "group_hero", "fields": [], "location": "bogus"}));
        ensure_location(&mut g, "acf/hero");
        assert!(has_location_rule(&g));
    }

    #[test]
    fn test_field_group_defaults_override_settings() {
        let defaults = FieldDefaults::new().with(
            "fieldGroup",
            json!({"style": "seamless", "title": "Overridden"}),
        );
        let g = group(json!({"key": "group_hero", "title": "Hero", "fields": []}));
        let g = apply_field_group_defaults(g, &defaults).unwrap();

        assert_eq!(g.setting("title"), Some(&json!("Overridden")));
        assert_eq!(g.setting("style"), Some(&json!("seamless")));
    }

    #[test]
    fn test_field_group_defaults_absent_is_noop() {
        let g = group(json!({"key": "group_hero", "title": "Hero", "fields": []}));
        let out = apply_field_group_defaults(g.clone(), &FieldDefaults::new()).unwrap();
        assert_eq!(out, g);
    }
}
