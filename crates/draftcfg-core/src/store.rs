//! The configuration store
//!
//! [`ConfigStore`] ties a [`Schema`] to a [`JsonResource`] and an
//! [`Emitter`]. It runs in one of two shapes:
//!
//! - **cached** (`use_cache = true`): the configuration lives in memory,
//!   reads never touch disk and every mutation is mirrored to the file.
//! - **uncached**: the file is the source of truth; every read and every
//!   `alter` re-reads it merged over the presets.
//!
//! If a write fails fatally after the cache was updated, cache and disk
//! stay divergent. There is no rollback.

use std::borrow::Cow;
use std::path::Path;

use draftcfg_fs::JsonResource;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::{Alteration, ChangeEvent, Emitter, ListenerResult, Payload};
use crate::options::StoreOptions;
use crate::schema::{Draft, Schema};

/// Configuration object: key to current value, in schema order
pub type Config = Map<String, Value>;

/// A JSON-file-backed configuration with change notification.
#[derive(Debug)]
pub struct ConfigStore {
    schema: Schema,
    resource: JsonResource,
    options: StoreOptions,
    cache: Option<Config>,
    emitter: Emitter,
}

impl ConfigStore {
    /// Open a store for `draft`.
    ///
    /// Fails with [`Error::Validation`] if the path does not end in `.json`,
    /// and with [`Error::ResourceMissing`] if the file is absent and
    /// creation is disabled. A corrupt file is not an error.
    pub fn open(draft: Draft, options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Self::build(Schema::new(draft)?, options)
    }

    /// Open a store for an already-built schema.
    pub fn with_schema(schema: Schema, options: StoreOptions) -> Result<Self> {
        options.validate()?;
        Self::build(schema, options)
    }

    fn build(schema: Schema, options: StoreOptions) -> Result<Self> {
        let resource = JsonResource::new(options.path(), options.allow_create);
        resource.ensure()?;

        let cache = options
            .use_cache
            .then(|| resource.read_merged(schema.flattened()));

        debug!(
            path = %resource.path(),
            keys = schema.len(),
            cached = options.use_cache,
            exposed_events = options.exposed_events,
            "opened config store"
        );

        Ok(Self {
            schema,
            resource,
            options,
            cache,
            emitter: Emitter::new(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn path(&self) -> &Path {
        self.options.path()
    }

    /// Metadata declared for `key`.
    pub fn meta(&self, key: &str) -> Result<&Map<String, Value>> {
        self.schema.meta(key)
    }

    /// The whole configuration.
    pub fn read(&self) -> Config {
        self.current().into_owned()
    }

    /// The current value of one declared key.
    ///
    /// A declared key missing from the configuration (only possible after a
    /// partial `overwrite` on a cached store) reads as `null`.
    pub fn read_key(&self, key: &str) -> Result<Value> {
        self.require(key)?;
        Ok(self.current().get(key).cloned().unwrap_or(Value::Null))
    }

    /// Deserialize one key into `T`.
    pub fn read_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.read_key(key)?;
        serde_json::from_value(value).map_err(|source| Error::Decode {
            target: key.to_string(),
            source,
        })
    }

    /// Deserialize the whole configuration into `T`.
    pub fn read_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.read())).map_err(|source| Error::Decode {
            target: self.resource.path().to_string(),
            source,
        })
    }

    /// Set one declared key, persist, then notify.
    pub fn alter(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.require(key)?;
        let value = value.into();

        match self.cache.as_mut() {
            Some(cache) => {
                cache.insert(key.to_string(), value.clone());
                self.resource.write(cache)?;
            }
            None => {
                let mut current = self.resource.read_merged(self.schema.flattened());
                current.insert(key.to_string(), value.clone());
                self.resource.write(&current)?;
            }
        }
        debug!(key, "altered property");

        self.emit(&[Alteration::new(key, value)])
    }

    /// Replace the whole configuration with `next`, verbatim.
    ///
    /// `next` need not match the schema's key set. One alteration is emitted
    /// per entry, in `next`'s order.
    pub fn overwrite(&mut self, next: Config) -> Result<()> {
        let alterations: Vec<Alteration> = next
            .iter()
            .map(|(key, value)| Alteration::new(key.clone(), value.clone()))
            .collect();

        if self.options.use_cache {
            let cache = self.cache.insert(next);
            self.resource.write(cache)?;
        } else {
            self.resource.write(&next)?;
        }
        debug!(keys = alterations.len(), "overwrote configuration");

        self.emit(&alterations)
    }

    /// Restore every key to its preset.
    pub fn reset(&mut self) -> Result<()> {
        self.overwrite(self.schema.flattened().clone())
    }

    /// Re-emit the current value of each key without writing anything.
    ///
    /// All keys are checked first; an undeclared key emits nothing.
    pub fn trigger<I, S>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<S> = keys.into_iter().collect();
        for key in &keys {
            self.require(key.as_ref())?;
        }

        let alterations: Vec<Alteration> = {
            let current = self.current();
            keys.iter()
                .map(|key| {
                    let key = key.as_ref();
                    Alteration::new(key, current.get(key).cloned().unwrap_or(Value::Null))
                })
                .collect()
        };
        debug!(keys = alterations.len(), "triggered change events");

        self.emit(&alterations)
    }

    /// Refresh the cache from disk without emitting. No-op when uncached.
    pub fn reload(&mut self) {
        if self.cache.is_some() {
            self.cache = Some(self.resource.read_merged(self.schema.flattened()));
            debug!(path = %self.resource.path(), "reloaded cache");
        }
    }

    /// Subscribe to an event.
    pub fn on<F>(&mut self, event: ChangeEvent, listener: F)
    where
        F: FnMut(&Payload<'_>) -> ListenerResult + 'static,
    {
        self.warn_if_unexposed(&event);
        self.emitter.subscribe(event, listener);
    }

    /// Subscribe to the next occurrence of an event only.
    pub fn once<F>(&mut self, event: ChangeEvent, listener: F)
    where
        F: FnMut(&Payload<'_>) -> ListenerResult + 'static,
    {
        self.warn_if_unexposed(&event);
        self.emitter.subscribe_once(event, listener);
    }

    /// Remove every listener for `event`.
    pub fn ignore(&mut self, event: &ChangeEvent) {
        self.emitter.unsubscribe_all(event);
    }

    /// Subscribe to every commit's batch of alterations.
    pub fn on_change<F>(&mut self, mut listener: F)
    where
        F: FnMut(&[Alteration]) -> ListenerResult + 'static,
    {
        self.on(ChangeEvent::Any, move |payload| match payload {
            Payload::Batch(batch) => listener(batch),
            Payload::Value(_) => Ok(()),
        });
    }

    /// Subscribe to new values of one key. Requires `exposed_events`.
    pub fn on_key<F>(&mut self, key: impl Into<String>, mut listener: F)
    where
        F: FnMut(&Value) -> ListenerResult + 'static,
    {
        self.on(ChangeEvent::Key(key.into()), move |payload| match payload {
            Payload::Value(value) => listener(value),
            Payload::Batch(_) => Ok(()),
        });
    }

    fn current(&self) -> Cow<'_, Config> {
        match &self.cache {
            Some(cache) => Cow::Borrowed(cache),
            None => Cow::Owned(self.resource.read_merged(self.schema.flattened())),
        }
    }

    fn require(&self, key: &str) -> Result<()> {
        if self.schema.has(key) {
            Ok(())
        } else {
            Err(Error::KeyNotFound {
                key: key.to_string(),
            })
        }
    }

    fn emit(&mut self, alterations: &[Alteration]) -> Result<()> {
        self.emitter.dispatch(alterations, self.options.exposed_events)
    }

    fn warn_if_unexposed(&self, event: &ChangeEvent) {
        if let ChangeEvent::Key(key) = event
            && !self.options.exposed_events
        {
            warn!(key = %key, "per-key listener registered but exposed events are disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn draft() -> Draft {
        Draft::new().preset("theme", "light").preset("volume", 7)
    }

    #[test]
    fn current_borrows_when_cached() {
        let temp = TempDir::new().unwrap();
        let options = StoreOptions::new(temp.path().join("s.json")).use_cache(true);
        let store = ConfigStore::open(draft(), options).unwrap();

        assert!(matches!(store.current(), Cow::Borrowed(_)));
    }

    #[test]
    fn current_reads_disk_when_uncached() {
        let temp = TempDir::new().unwrap();
        let options = StoreOptions::new(temp.path().join("s.json"));
        let store = ConfigStore::open(draft(), options).unwrap();

        assert!(matches!(store.current(), Cow::Owned(_)));
    }

    #[test]
    fn validation_precedes_schema_construction() {
        let err = ConfigStore::open(Draft::new(), StoreOptions::new("s.yaml")).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
    }

    #[test]
    fn alter_rejects_undeclared_key_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let mut store = ConfigStore::open(draft(), StoreOptions::new(&path)).unwrap();

        let err = store.alter("brightness", json!(3)).unwrap_err();

        assert!(matches!(err, Error::KeyNotFound { .. }));
        assert!(!path.exists());
    }
}
