//! End-to-end integration test for the store lifecycle
//!
//! Exercises the complete flow: draft file -> store -> disk -> second store.

use draftcfg_core::{ChangeEvent, ConfigStore, Draft, Error, StoreOptions};
use draftcfg_test_utils::{TestResource, sample_draft, sample_presets};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

#[derive(Debug, Deserialize, PartialEq)]
struct Window {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Settings {
    theme: String,
    volume: u8,
    window: Window,
    plugins: Vec<String>,
}

#[test]
fn test_draft_file_to_persisted_config() {
    let fixture = TestResource::new();
    let draft_path = fixture.root().join("draft.json");
    fs::write(
        &draft_path,
        r#"{
            "theme": {"preset": "light", "label": "Colour theme"},
            "volume": {"preset": 7, "min": 0, "max": 10}
        }"#,
    )
    .unwrap();

    let draft = Draft::load(&draft_path).unwrap();
    let mut store = fixture.open(draft, |o| o.use_cache(true));

    assert_eq!(store.meta("volume").unwrap()["max"], json!(10));
    fixture.assert_missing();

    store.alter("theme", "dark").unwrap();

    assert_eq!(
        fixture.read_json(),
        json!({"theme": "dark", "volume": 7})
    );
}

#[test]
fn test_second_store_sees_first_store_writes() {
    let fixture = TestResource::new();
    let mut writer = fixture.open(sample_draft(), |o| o.use_cache(true));
    writer.alter("volume", 3).unwrap();
    writer.alter("plugins", json!(["spellcheck"])).unwrap();

    let reader = fixture.open(sample_draft(), |o| o);
    let settings: Settings = reader.read_typed().unwrap();

    assert_eq!(
        settings,
        Settings {
            theme: "light".into(),
            volume: 3,
            window: Window {
                width: 800,
                height: 600
            },
            plugins: vec!["spellcheck".into()],
        }
    );
}

#[test]
fn test_cached_store_ignores_external_edits_until_reload() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));
    store.alter("volume", 4).unwrap();

    let mut edited = fixture.read_json();
    edited["volume"] = json!(9);
    fixture.write_json(&edited);

    assert_eq!(store.read_key("volume").unwrap(), json!(4));
    store.reload();
    assert_eq!(store.read_key("volume").unwrap(), json!(9));
}

#[test]
fn test_uncached_store_sees_external_edits_immediately() {
    let fixture = TestResource::new();
    let store = fixture.open(sample_draft(), |o| o);

    fixture.write_json(&json!({"volume": 2}));

    assert_eq!(store.read_key("volume").unwrap(), json!(2));
    assert_eq!(store.read_key("theme").unwrap(), json!("light"));
}

#[test]
fn test_reset_after_edits_restores_presets_and_notifies() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true).exposed_events(true));
    store.alter("theme", "dark").unwrap();
    store.alter("volume", 1).unwrap();

    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let batch_seen = Rc::clone(&seen);
    store.on_change(move |batch| {
        batch_seen
            .borrow_mut()
            .extend(batch.iter().map(|a| a.key.clone()));
        Ok(())
    });
    let key_seen = Rc::clone(&seen);
    store.on_key("volume", move |value| {
        key_seen.borrow_mut().push(format!("volume={value}"));
        Ok(())
    });

    store.reset().unwrap();

    assert_eq!(fixture.read_json(), sample_presets());
    assert_eq!(
        *seen.borrow(),
        vec!["theme", "volume", "window", "plugins", "volume=7"]
    );
}

#[test]
fn test_write_heals_after_directory_removed() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));
    store.alter("volume", 5).unwrap();

    fixture.delete_resource_dir();
    store.alter("volume", 6).unwrap();

    assert_eq!(fixture.read_json()["volume"], json!(6));
}

#[test]
fn test_missing_resource_without_creation_fails() {
    let fixture = TestResource::new();
    let err = ConfigStore::open(
        sample_draft(),
        StoreOptions::new(fixture.path()).allow_create(false),
    )
    .unwrap_err();

    assert!(matches!(err, Error::ResourceMissing { .. }), "got {err:?}");
}

#[test]
fn test_overwrite_with_foreign_keys_round_trips_through_disk() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));

    let next = json!({"theme": "dark", "legacy": true});
    let Value::Object(next) = next else {
        unreachable!()
    };
    store.overwrite(next).unwrap();

    let reopened = fixture.open(sample_draft(), |o| o);
    let config = reopened.read();
    assert_eq!(config["theme"], json!("dark"));
    assert_eq!(config["volume"], json!(7));
    assert_eq!(config["legacy"], json!(true));
    assert!(matches!(
        reopened.read_key("legacy"),
        Err(Error::KeyNotFound { .. })
    ));
}

#[test]
fn test_ignore_then_trigger_is_silent() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    store.on(ChangeEvent::Any, move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });

    store.trigger(["theme"]).unwrap();
    store.ignore(&ChangeEvent::Any);
    store.trigger(["theme"]).unwrap();

    assert_eq!(*calls.borrow(), 1);
    fixture.assert_missing();
}
