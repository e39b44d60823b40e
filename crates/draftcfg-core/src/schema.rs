//! Drafts and the schemas built from them
//!
//! A [`Draft`] lists configuration keys in declaration order, each with a
//! preset value and an open bag of metadata. A [`Schema`] is the frozen
//! form the store works against.
//!
//! On disk or in code a draft looks like:
//!
//! ```json
//! {
//!   "theme":  { "preset": "light", "label": "Colour theme" },
//!   "volume": { "preset": 7, "min": 0, "max": 10 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use draftcfg_fs::{NormalizedPath, io};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Field holding the preset value inside a draft entry
pub const PRESET_FIELD: &str = "preset";

/// One declared key: its preset plus free-form metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    pub preset: Value,
    pub meta: Map<String, Value>,
}

impl DraftEntry {
    pub fn new(preset: impl Into<Value>) -> Self {
        Self {
            preset: preset.into(),
            meta: Map::new(),
        }
    }

    /// Attach a metadata field.
    pub fn with_meta(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(field.into(), value.into());
        self
    }

    fn from_value(key: &str, value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::invalid_draft(format!(
                "entry '{key}' must be an object with a '{PRESET_FIELD}' field"
            )));
        };
        let preset = fields.shift_remove(PRESET_FIELD).ok_or_else(|| {
            Error::invalid_draft(format!("entry '{key}' has no '{PRESET_FIELD}' field"))
        })?;
        Ok(Self {
            preset,
            meta: fields,
        })
    }

    fn to_value(&self) -> Value {
        let mut fields = Map::with_capacity(self.meta.len() + 1);
        fields.insert(PRESET_FIELD.to_string(), self.preset.clone());
        for (field, value) in &self.meta {
            fields.insert(field.clone(), value.clone());
        }
        Value::Object(fields)
    }
}

/// Ordered declaration of configuration keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    entries: Vec<(String, DraftEntry)>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key` with a preset and no metadata.
    pub fn preset(self, key: impl Into<String>, preset: impl Into<Value>) -> Self {
        self.entry(key, DraftEntry::new(preset))
    }

    /// Declare `key`. Re-declaring a key replaces it in place.
    pub fn entry(mut self, key: impl Into<String>, entry: DraftEntry) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a draft from a JSON object of entry objects.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(Error::invalid_draft("draft must be a JSON object"));
        };
        let entries = entries
            .into_iter()
            .map(|(key, entry)| DraftEntry::from_value(&key, entry).map(|entry| (key, entry)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Load a draft from a `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = NormalizedPath::new(path);
        let text = io::read_text(&path).map_err(|e| {
            Error::invalid_draft(format!("cannot read draft {path}: {e}"))
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            Error::invalid_draft(format!("draft {path} is not valid JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.to_value()))
                .collect(),
        )
    }
}

impl Serialize for Draft {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Draft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Immutable view of a draft.
#[derive(Debug, Clone)]
pub struct Schema {
    entries: HashMap<String, DraftEntry>,
    flattened: Map<String, Value>,
}

impl Schema {
    /// Freeze a draft. Empty drafts are rejected.
    pub fn new(draft: Draft) -> Result<Self> {
        if draft.is_empty() {
            return Err(Error::invalid_draft("draft declares no keys"));
        }

        let flattened = draft
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.preset.clone()))
            .collect();
        let entries = draft.entries.into_iter().collect();

        Ok(Self { entries, flattened })
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Preset value for `key`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entry(key).map(|entry| &entry.preset)
    }

    /// Every draft field for `key` except the preset.
    pub fn meta(&self, key: &str) -> Result<&Map<String, Value>> {
        self.entry(key).map(|entry| &entry.meta)
    }

    /// Key to preset, in draft order.
    pub fn flattened(&self) -> &Map<String, Value> {
        &self.flattened
    }

    /// Declared keys in draft order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.flattened.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }

    fn entry(&self, key: &str) -> Result<&DraftEntry> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::key_not_found(key))
    }
}

impl TryFrom<Draft> for Schema {
    type Error = Error;

    fn try_from(draft: Draft) -> Result<Self> {
        Self::new(draft)
    }
}
