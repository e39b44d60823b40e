//! [`TestResource`] fixture for store scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use draftcfg_core::{ConfigStore, StoreOptions};
use serde_json::Value;
use tempfile::TempDir;

/// Relative location of the resource inside the fixture directory.
pub const RESOURCE: &str = "conf/settings.json";

/// A temporary directory with one configuration resource at
/// [`RESOURCE`], which does not exist until written.
///
/// # Example
///
/// ```rust,no_run
/// use draftcfg_test_utils::{TestResource, sample_draft};
///
/// let fixture = TestResource::new();
/// fixture.write_raw("{ not json");
/// let store = fixture.open(sample_draft(), |o| o.use_cache(true));
/// ```
pub struct TestResource {
    temp_dir: TempDir,
}

impl Default for TestResource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResource {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of the resource file.
    pub fn path(&self) -> PathBuf {
        self.root().join(RESOURCE)
    }

    /// Default options for the resource, adjusted by `configure`.
    pub fn options(&self, configure: impl FnOnce(StoreOptions) -> StoreOptions) -> StoreOptions {
        configure(StoreOptions::new(self.path()))
    }

    /// Open a store, panicking on failure.
    pub fn open(
        &self,
        draft: draftcfg_core::Draft,
        configure: impl FnOnce(StoreOptions) -> StoreOptions,
    ) -> ConfigStore {
        ConfigStore::open(draft, self.options(configure))
            .unwrap_or_else(|e| panic!("TestResource::open: {e}"))
    }

    /// Write raw text to the resource, creating directories as needed.
    pub fn write_raw(&self, contents: &str) {
        let path = self.path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Write a JSON value to the resource.
    pub fn write_json(&self, value: &Value) {
        self.write_raw(&serde_json::to_string_pretty(value).unwrap());
    }

    /// Raw file contents, or `None` if the file does not exist.
    pub fn read_raw(&self) -> Option<String> {
        fs::read_to_string(self.path()).ok()
    }

    /// Parse the resource as JSON.
    ///
    /// # Panics
    /// Panics if the file is missing or not valid JSON.
    pub fn read_json(&self) -> Value {
        let raw = self
            .read_raw()
            .unwrap_or_else(|| panic!("Expected resource at {}", self.path().display()));
        serde_json::from_str(&raw).expect("resource should hold valid JSON")
    }

    /// Remove the directory holding the resource.
    pub fn delete_resource_dir(&self) {
        fs::remove_dir_all(self.path().parent().unwrap()).unwrap();
    }

    /// Assert the resource file exists.
    pub fn assert_exists(&self) {
        assert!(
            self.path().is_file(),
            "Expected resource to exist: {}",
            self.path().display()
        );
    }

    /// Assert the resource file does not exist.
    pub fn assert_missing(&self) {
        assert!(
            !self.path().exists(),
            "Expected resource NOT to exist: {}",
            self.path().display()
        );
    }
}
