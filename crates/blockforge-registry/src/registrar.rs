//! Registration boundary
//!
//! The host plugin owns the actual block and field group registries. The
//! composer only talks to them through [`BlockRegistrar`].

use std::collections::HashMap;
use std::sync::Mutex;

use blockforge::FieldGroup;
use tracing::{info, warn};

use crate::block::BlockRegistration;
use crate::error::{RegistryError, Result};

/// Sink for composed blocks
pub trait BlockRegistrar: Send + Sync {
    /// Register a block type
    fn register_block(&self, registration: &BlockRegistration) -> Result<()>;

    /// Register a local field group
    fn register_field_group(&self, group: &FieldGroup) -> Result<()>;
}

#[derive(Debug, Default)]
struct Registered {
    blocks: Vec<BlockRegistration>,
    groups: HashMap<String, FieldGroup>,
}

/// In-memory registrar for testing and for the worker
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    data: Mutex<Registered>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered block payloads in registration order
    pub fn blocks(&self) -> Vec<BlockRegistration> {
        self.data
            .lock()
            .map(|data| data.blocks.clone())
            .unwrap_or_default()
    }

    /// Look up a registered field group by key
    pub fn field_group(&self, key: &str) -> Option<FieldGroup> {
        self.data
            .lock()
            .ok()
            .and_then(|data| data.groups.get(key).cloned())
    }

    pub fn contains_block(&self, name: &str) -> bool {
        self.data
            .lock()
            .map(|data| data.blocks.iter().any(|b| b.name == name))
            .unwrap_or(false)
    }

    /// Number of registered blocks
    pub fn len(&self) -> usize {
        self.data.lock().map(|data| data.blocks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockRegistrar for InMemoryRegistry {
    fn register_block(&self, registration: &BlockRegistration) -> Result<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| RegistryError::InvalidConfig("registry lock poisoned".into()))?;

        if data.blocks.iter().any(|b| b.name == registration.name) {
            warn!(block = %registration.name, "block registered twice");
            return Err(RegistryError::AlreadyRegistered(registration.name.clone()));
        }

        data.blocks.push(registration.clone());
        info!(block = %registration.name, title = %registration.title, "registered block");
        Ok(())
    }

    fn register_field_group(&self, group: &FieldGroup) -> Result<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| RegistryError::InvalidConfig("registry lock poisoned".into()))?;

        data.groups.insert(group.key.clone(), group.clone());
        info!(group = %group.key, fields = group.fields.len(), "registered field group");
        Ok(())
    }
}
