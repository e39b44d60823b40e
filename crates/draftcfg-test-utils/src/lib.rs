//! Shared test utilities for the draftcfg workspace.
//!
//! This crate is a dev-dependency only; it is never published.
//!
//! - [`sample_draft`]: a small draft with metadata, scalars and an object
//! - [`TestResource`]: a temporary directory holding one `.json` resource

pub mod resource;

pub use resource::TestResource;

use draftcfg_core::{Draft, DraftEntry};
use serde_json::json;

/// Draft used across test suites.
///
/// Keys in order: `theme`, `volume`, `window`, `plugins`.
pub fn sample_draft() -> Draft {
    Draft::new()
        .entry(
            "theme",
            DraftEntry::new("light")
                .with_meta("label", "Colour theme")
                .with_meta("choices", json!(["light", "dark"])),
        )
        .entry(
            "volume",
            DraftEntry::new(7).with_meta("min", 0).with_meta("max", 10),
        )
        .preset("window", json!({"width": 800, "height": 600}))
        .preset("plugins", json!([]))
}

/// Flattened presets of [`sample_draft`], as a JSON value.
pub fn sample_presets() -> serde_json::Value {
    json!({
        "theme": "light",
        "volume": 7,
        "window": {"width": 800, "height": 600},
        "plugins": []
    })
}
