//! Block declarations and their registration payload

use blockforge::{FieldDefaults, FieldGroup};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RegistryError, Result};
use crate::slug::{ensure_prefix, slug_from_type_name};

/// Namespace prefix used when a block does not set its own
pub const DEFAULT_PREFIX: &str = "acf/";

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_post_types() -> Vec<String> {
    vec!["post".to_string(), "page".to_string()]
}

fn default_icon() -> Value {
    Value::String(String::new())
}

fn default_mode() -> String {
    "preview".to_string()
}

/// A content block: display metadata plus the field group edited with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Display name; a block without one is never composed
    #[serde(default)]
    pub name: String,

    /// Machine name, derived from the display name when empty
    #[serde(default)]
    pub slug: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Fully qualified block name, `prefix` + slug when empty
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    /// Icon name or icon object
    #[serde(default = "default_icon")]
    pub icon: Value,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default = "default_post_types")]
    pub post_types: Vec<String>,

    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default)]
    pub align: String,

    #[serde(default)]
    pub supports: Map<String, Value>,

    pub fields: FieldGroup,

    /// Per-block defaults layered over the configured ones
    #[serde(default)]
    pub defaults: FieldDefaults,
}

impl Block {
    pub fn new(name: impl Into<String>, fields: FieldGroup) -> Self {
        Block {
            name: name.into(),
            slug: String::new(),
            prefix: default_prefix(),
            namespace: String::new(),
            description: String::new(),
            category: String::new(),
            icon: default_icon(),
            keywords: Vec::new(),
            post_types: default_post_types(),
            mode: default_mode(),
            align: String::new(),
            supports: Map::new(),
            fields,
            defaults: FieldDefaults::new(),
        }
    }

    /// Declare a block whose slug comes from the Rust type `T`
    ///
    /// `crate::blocks::HeroBanner` yields the slug `crate-blocks-hero-banner`,
    /// `app::blocks::HeroBanner` yields `hero-banner`.
    pub fn for_type<T: ?Sized>(name: impl Into<String>, fields: FieldGroup) -> Self {
        let mut block = Block::new(name, fields);
        block.slug = slug_from_type_name(std::any::type_name::<T>());
        block
    }

    /// Load a block declaration from JSON
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = align.into();
        self
    }

    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Blocks with an empty display name are skipped by the composer
    pub fn is_enabled(&self) -> bool {
        !self.name.is_empty()
    }

    /// The explicit slug, or one derived from the display name
    pub fn resolved_slug(&self) -> String {
        if self.slug.is_empty() {
            slug_from_type_name(&self.name)
        } else {
            self.slug.clone()
        }
    }

    /// The explicit namespace, or the slug under `prefix`
    pub fn resolved_namespace(&self) -> String {
        if self.namespace.is_empty() {
            ensure_prefix(&self.resolved_slug(), &self.prefix)
        } else {
            self.namespace.clone()
        }
    }

    /// Fill in the derived slug and namespace
    pub fn resolve(&mut self) {
        self.slug = self.resolved_slug();
        self.namespace = self.resolved_namespace();
    }

    /// The block-type payload handed to the host
    pub fn registration(&self) -> Result<BlockRegistration> {
        if !self.is_enabled() {
            return Err(RegistryError::MissingName);
        }

        Ok(BlockRegistration {
            name: self.resolved_slug(),
            title: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            icon: self.icon.clone(),
            keywords: self.keywords.clone(),
            post_types: self.post_types.clone(),
            mode: self.mode.clone(),
            align: self.align.clone(),
            supports: self.supports.clone(),
        })
    }
}

/// Block type registration payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRegistration {
    /// The block slug
    pub name: String,
    /// The display name
    pub title: String,
    pub description: String,
    pub category: String,
    pub icon: Value,
    pub keywords: Vec<String>,
    pub post_types: Vec<String>,
    pub mode: String,
    pub align: String,
    pub supports: Map<String, Value>,
}
