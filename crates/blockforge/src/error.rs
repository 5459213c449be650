//! Error types for field group composition
//!
//! Composition is total over well-formed documents: unknown field types and
//! missing anchors are silent fallbacks, not errors. The variants here cover
//! documents that cannot be composed at all.

use thiserror::Error;

/// Main error type for schema composition
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document root is not a JSON object
    #[error("Invalid field group document: {reason}")]
    InvalidDocument { reason: String },

    /// The base document has no `fields` sequence
    #[error("Field group '{key}' has no 'fields' list")]
    MissingFieldList { key: String },

    /// The base document has no string `key`
    #[error("Field group has no 'key'")]
    MissingKey,

    /// A global fragment lacks a `key` or `fields`
    #[error("Malformed global fragment for anchor '{anchor}': {reason}")]
    MalformedFragment { anchor: String, reason: String },

    /// Misuse of the fields builder (unbalanced composite, setting without a field)
    #[error("Fields builder error: {message}")]
    Builder { message: String },

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn builder(message: impl Into<String>) -> Self {
        SchemaError::Builder {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(anchor: &str, reason: impl Into<String>) -> Self {
        SchemaError::MalformedFragment {
            anchor: anchor.to_string(),
            reason: reason.into(),
        }
    }
}

/// Shorthand result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
