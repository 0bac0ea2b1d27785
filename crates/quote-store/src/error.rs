use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No .quote/ workspace found at {0}. Run `quote init` first.")]
    NotInitialized(PathBuf),

    #[error("quotation not found: {0}")]
    RecordNotFound(String),

    #[error("workspace is locked by another process ({0})")]
    Locked(PathBuf),

    #[error("invalid value for config key {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}
