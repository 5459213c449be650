//! Error types for the blockforge registry

use thiserror::Error;

/// Registry-specific errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Schema error: {0}")]
    Schema(#[from] blockforge::SchemaError),

    #[error("Block has no display name")]
    MissingName,

    #[error("Block already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
