//! JSON-backed configuration resource
//!
//! A [`JsonResource`] owns one `.json` file. Reads never fail: a missing,
//! unreadable or corrupt file yields the caller's defaults. Writes replace
//! the whole file and heal once if the directory disappeared underneath.

use std::fs;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Error, NormalizedPath, Result, io};

/// A configuration file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResource {
    path: NormalizedPath,
    allow_create: bool,
}

impl JsonResource {
    pub fn new(path: impl Into<NormalizedPath>, allow_create: bool) -> Self {
        Self {
            path: path.into(),
            allow_create,
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn allow_create(&self) -> bool {
        self.allow_create
    }

    /// Make sure the file exists or can be created.
    ///
    /// When the file is absent, creates its parent directory chain if
    /// creation is allowed, otherwise fails with [`Error::ResourceMissing`].
    /// The file itself is created by the first write. Safe to call repeatedly.
    pub fn ensure(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        if !self.allow_create {
            return Err(Error::ResourceMissing {
                path: self.path.to_native(),
            });
        }
        if let Some(parent) = self.path.parent() {
            let native = parent.to_native();
            fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))?;
            debug!(dir = %parent, "ensured resource directory");
        }
        Ok(())
    }

    /// Read the file and shallow-merge it over a fresh copy of `defaults`.
    ///
    /// Falls back to `defaults` on any read or parse failure, including a
    /// file whose top-level value is not an object.
    pub fn read_merged(&self, defaults: &Map<String, Value>) -> Map<String, Value> {
        let text = match io::read_text(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %self.path, error = %err, "resource unreadable, using defaults");
                return defaults.clone();
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(stored)) => merge_over(defaults, stored),
            Ok(other) => {
                warn!(
                    path = %self.path,
                    kind = json_kind(&other),
                    "resource is not a JSON object, using defaults"
                );
                defaults.clone()
            }
            Err(err) => {
                warn!(path = %self.path, error = %err, "resource is not valid JSON, using defaults");
                defaults.clone()
            }
        }
    }

    /// Replace the file contents with `config`.
    ///
    /// A not-found failure (directory removed externally) triggers one
    /// [`ensure`](Self::ensure) and one retry. Anything else propagates.
    pub fn write(&self, config: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(config).map_err(|source| Error::Json {
            path: self.path.to_native(),
            source,
        })?;

        match io::write_text(&self.path, &content) {
            Err(err) if err.is_not_found() => {
                warn!(path = %self.path, "resource path vanished, recreating before retry");
                self.ensure()?;
                io::write_text(&self.path, &content)?;
            }
            other => other?,
        }

        debug!(path = %self.path, keys = config.len(), "wrote resource");
        Ok(())
    }
}

/// Overlay `stored` on a copy of `defaults`, top-level keys only.
///
/// Keys keep their default position; keys only present in `stored` are
/// appended in their stored order.
pub fn merge_over(defaults: &Map<String, Value>, stored: Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();
    for (key, value) in stored {
        merged.insert(key, value);
    }
    merged
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
