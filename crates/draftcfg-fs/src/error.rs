//! Error types for draftcfg-fs

use std::path::PathBuf;

/// Result type for draftcfg-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in draftcfg-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource not found at {path} and creation is disabled")]
    ResourceMissing { path: PathBuf },

    #[error("Failed to serialize JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure means the target path (or its directory) is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// The filesystem path this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::ResourceMissing { path }
            | Self::Json { path, .. }
            | Self::LockFailed { path } => path,
        }
    }
}
