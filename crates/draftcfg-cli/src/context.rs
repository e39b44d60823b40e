//! Resolves CLI flags into an open store

use std::path::PathBuf;

use draftcfg_core::{ConfigStore, Draft, StoreOptions};

use crate::error::{CliError, Result};

/// Where the draft and the resource live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    pub draft: PathBuf,
    pub path: PathBuf,
    pub allow_create: bool,
}

impl StoreContext {
    /// Build a context from optional flag values.
    pub fn resolve(draft: Option<PathBuf>, path: Option<PathBuf>, no_create: bool) -> Result<Self> {
        let draft = draft.ok_or_else(|| {
            CliError::user("No draft given. Pass --draft <FILE> or set DRAFTCFG_DRAFT.")
        })?;
        let path = path.ok_or_else(|| {
            CliError::user("No resource path given. Pass --path <FILE> or set DRAFTCFG_PATH.")
        })?;
        Ok(Self {
            draft,
            path,
            allow_create: !no_create,
        })
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions::new(&self.path)
            .use_cache(true)
            .allow_create(self.allow_create)
    }

    /// Load the draft and open the store.
    pub fn open(&self) -> Result<ConfigStore> {
        let draft = Draft::load(&self.draft)?;
        tracing::debug!(draft = %self.draft.display(), keys = draft.len(), "loaded draft");
        Ok(ConfigStore::open(draft, self.options())?)
    }
}
