//! Error types for draftcfg-core

use std::path::PathBuf;

/// Result type for draftcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by change listeners
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in draftcfg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Store options rejected at construction
    #[error("Invalid store options: {message}")]
    Validation { message: String },

    /// Backing file absent and creation disallowed
    #[error("Configuration resource missing at {path}")]
    ResourceMissing { path: PathBuf },

    /// Write failure that could not be healed
    #[error("Failed to persist configuration to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: draftcfg_fs::Error,
    },

    /// Key not declared by the draft
    #[error("Unknown configuration key: {key}")]
    KeyNotFound { key: String },

    /// Draft could not be turned into a schema
    #[error("Invalid draft: {message}")]
    InvalidDraft { message: String },

    /// Typed read failed to deserialize
    #[error("Failed to decode {target}: {source}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// A change listener returned an error; remaining dispatch was aborted
    #[error("Listener for '{event}' failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    pub(crate) fn invalid_draft(message: impl Into<String>) -> Self {
        Self::InvalidDraft {
            message: message.into(),
        }
    }
}

impl From<draftcfg_fs::Error> for Error {
    fn from(err: draftcfg_fs::Error) -> Self {
        match err {
            draftcfg_fs::Error::ResourceMissing { path } => Self::ResourceMissing { path },
            other => Self::Persistence {
                path: other.path().to_path_buf(),
                source: other,
            },
        }
    }
}
