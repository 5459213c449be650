//! Blockforge composes the field groups of content blocks.
//!
//! A block's field group is combined with shared global fragments
//! ([`GlobalFieldMerger`]) and then filled in with per-type default settings
//! ([`SchemaBuilder`]). The result is a plain JSON document ready to be
//! registered with the host plugin.

pub mod builder;
pub mod case;
pub mod error;
pub mod group;
mod macros;
pub mod merge;
pub mod rewrite;
pub mod schema;

// Re-export core types
pub use builder::FieldsBuilder;
pub use error::{Result, SchemaError};
pub use group::{CONTAINER_KEYS, Field, FieldGroup, GROUP_KEY_PREFIX, key_token};
pub use merge::{
    DESIGN_ANCHOR, GlobalFieldMerger, GlobalFieldSet, GlobalFields, Placement, design_fragment,
};
pub use rewrite::{RewriteScope, TokenRewrite};
pub use schema::{FIELD_GROUP_DEFAULTS, FieldDefaults, SchemaBuilder};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
