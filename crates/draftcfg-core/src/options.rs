//! Construction options for [`ConfigStore`](crate::ConfigStore)

use std::path::{Path, PathBuf};

use draftcfg_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Required extension of the backing file
pub const RESOURCE_EXTENSION: &str = "json";

fn default_allow_create() -> bool {
    true
}

/// How a store locates and mirrors its backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOptions {
    /// Path to the JSON resource
    pub path: PathBuf,

    /// Keep the configuration in memory and only write through to disk
    #[serde(default)]
    pub use_cache: bool,

    /// Create missing parent directories instead of failing
    #[serde(default = "default_allow_create")]
    pub allow_create: bool,

    /// Emit `change:<key>` events alongside the batch event
    #[serde(default)]
    pub exposed_events: bool,
}

impl StoreOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_cache: false,
            allow_create: default_allow_create(),
            exposed_events: false,
        }
    }

    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    pub fn allow_create(mut self, enabled: bool) -> Self {
        self.allow_create = enabled;
        self
    }

    pub fn exposed_events(mut self, enabled: bool) -> Self {
        self.exposed_events = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reject paths that do not end in `.json` (case-sensitive).
    pub fn validate(&self) -> Result<()> {
        if NormalizedPath::new(&self.path).has_extension(RESOURCE_EXTENSION) {
            Ok(())
        } else {
            Err(Error::Validation {
                message: format!(
                    "resource path {} must end in .{RESOURCE_EXTENSION}",
                    self.path.display()
                ),
            })
        }
    }
}
