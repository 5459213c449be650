//! # Blockforge Registry
//!
//! Turns block declarations into registered block types and field groups:
//! - Slug and namespace derivation for blocks
//! - The composition pipeline (global fields, defaults, location rule)
//! - A registrar boundary with an in-memory implementation
//! - Render context preparation (element ids, CSS classes, field values)
//!
//! ## Example Usage
//!
//! ```rust
//! use blockforge::FieldsBuilder;
//! use blockforge_registry::{Block, Composer, ComposerConfig, InMemoryRegistry};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fields = FieldsBuilder::new("hero")
//!     .add_text("heading")
//!     .add_image("background")
//!     .build()?;
//!
//! let composer = Composer::new(ComposerConfig::default(), InMemoryRegistry::new());
//! let composed = composer.compose(Block::new("Hero", fields))?;
//!
//! if let Some(composed) = composed {
//!     assert_eq!(composed.namespace, "acf/hero");
//!     assert_eq!(composed.field_group.field_names(), vec![
//!         "heading", "background", "design_tab", "custom_classes", "custom_id",
//!     ]);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod block;
pub mod composer;
pub mod config;
pub mod error;
pub mod registrar;
pub mod render;
pub mod slug;

pub use block::{Block, BlockRegistration};
pub use composer::{ComposedBlock, Composer};
pub use config::ComposerConfig;
pub use error::{RegistryError, Result};
pub use registrar::{BlockRegistrar, InMemoryRegistry};
pub use render::{BlockContext, BlockIds, BlockProps, FieldValues, RenderRequest};
pub use slug::slug_from_type_name;
