//! Error handling for the worker

use blockforge_registry::RegistryError;
use thiserror::Error;

/// Result type for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Worker error types
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{failed} of {total} blocks failed to compose")]
    BlocksFailed { failed: usize, total: usize },
}
