//! Composer configuration
//!
//! ```json
//! {
//!   "defaults": { "trueFalse": { "ui": 1 }, "fieldGroup": { "style": "seamless" } },
//!   "globals": { "design_tab": { "key": "group_global_fields", "fields": [ ... ] } }
//! }
//! ```
//!
//! The built-in design fragment is always merged first. `globals` lists the
//! extra fragments merged after it; a missing or empty object adds none.

use std::path::Path;

use blockforge::{FieldDefaults, GlobalFieldSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Defaults and global fragments shared by every composed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Per-type default settings, including the `field_group` entry
    #[serde(default)]
    pub defaults: FieldDefaults,

    /// Extra global fragments, merged in order after the design fragment
    #[serde(default)]
    pub globals: GlobalFieldSet,
}

impl ComposerConfig {
    pub fn new(defaults: FieldDefaults, globals: GlobalFieldSet) -> Self {
        ComposerConfig { defaults, globals }
    }

    /// Parse a configuration document
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(RegistryError::InvalidConfig(format!(
                "configuration must be an object, got {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| RegistryError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| RegistryError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_value(value)?;

        debug!(
            path = %path.display(),
            defaults = config.defaults.len(),
            globals = config.globals.len(),
            "loaded composer config"
        );
        Ok(config)
    }

    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_globals(mut self, globals: GlobalFieldSet) -> Self {
        self.globals = globals;
        self
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            defaults: FieldDefaults::new(),
            globals: GlobalFieldSet::new(),
        }
    }
}
