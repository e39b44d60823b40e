//! Scenario tests
//!
//! Production-like situations: damaged files, several stores sharing one
//! resource, listeners that fail part way through a commit.

use draftcfg_core::{ChangeEvent, Draft, DraftEntry, Error, Schema};
use draftcfg_fs::JsonResource;
use draftcfg_test_utils::{TestResource, sample_draft, sample_presets};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

// =============================================================================
// Damaged resources
// =============================================================================

#[test]
fn scenario_truncated_file_is_replaced_on_next_write() {
    let fixture = TestResource::new();
    fixture.write_raw(r#"{"theme": "dark", "vol"#);

    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));
    assert_eq!(Value::Object(store.read()), sample_presets());

    store.alter("theme", "dark").unwrap();

    let mut expected = sample_presets();
    expected["theme"] = json!("dark");
    assert_eq!(fixture.read_json(), expected);
}

#[test]
fn scenario_array_file_falls_back_to_presets() {
    let fixture = TestResource::new();
    fixture.write_json(&json!([1, 2, 3]));

    let store = fixture.open(sample_draft(), |o| o);

    assert_eq!(Value::Object(store.read()), sample_presets());
}

#[test]
fn scenario_partial_file_keeps_presets_for_missing_keys() {
    let fixture = TestResource::new();
    fixture.write_json(&json!({"window": {"width": 1024}}));

    let store = fixture.open(sample_draft(), |o| o);

    // Top-level merge only: the stored object replaces the preset object.
    assert_eq!(store.read_key("window").unwrap(), json!({"width": 1024}));
    assert_eq!(store.read_key("volume").unwrap(), json!(7));
}

// =============================================================================
// Shared resources
// =============================================================================

#[test]
fn scenario_concurrent_stores_leave_valid_json() {
    let fixture = TestResource::new();
    let path = fixture.path();
    fixture.write_json(&sample_presets());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let options = fixture.options(|o| o);
            thread::spawn(move || {
                let mut store =
                    draftcfg_core::ConfigStore::open(sample_draft(), options).unwrap();
                for round in 0..10 {
                    store.alter("volume", worker * 10 + round).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&text).expect("file must stay valid JSON");
    let volume = parsed["volume"].as_u64().unwrap();
    assert!(volume % 10 == 9, "last write of some worker wins, got {volume}");
}

#[test]
fn scenario_resource_shared_with_raw_json_resource() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));
    store.alter("volume", 2).unwrap();

    let raw = JsonResource::new(fixture.path(), false);
    let seen = raw.read_merged(&Map::new());

    assert_eq!(seen.get("volume"), Some(&json!(2)));
    assert_eq!(seen.len(), 4);
}

// =============================================================================
// Listener failures
// =============================================================================

#[test]
fn scenario_failing_listener_after_persisted_write() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true).exposed_events(true));

    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    store.on(ChangeEvent::Any, |_| Err("listener rejected change".into()));
    let key_log = Rc::clone(&log);
    store.on_key("theme", move |value| {
        key_log.borrow_mut().push(value.to_string());
        Ok(())
    });

    let err = store.alter("theme", "dark").unwrap_err();

    assert!(matches!(err, Error::Listener { .. }), "got {err:?}");
    assert!(log.borrow().is_empty());
    // The write happened before dispatch and is not rolled back.
    assert_eq!(fixture.read_json()["theme"], json!("dark"));
    assert_eq!(store.read_key("theme").unwrap(), json!("dark"));
}

#[test]
fn scenario_once_listener_observes_first_commit_only() {
    let fixture = TestResource::new();
    let mut store = fixture.open(sample_draft(), |o| o.use_cache(true));

    let log: Rc<RefCell<Vec<Value>>> = Rc::default();
    let once_log = Rc::clone(&log);
    store.once(ChangeEvent::Any, move |payload| {
        if let draftcfg_core::Payload::Batch(batch) = payload {
            once_log
                .borrow_mut()
                .extend(batch.iter().map(|a| a.value.clone()));
        }
        Ok(())
    });

    store.alter("volume", 1).unwrap();
    store.alter("volume", 2).unwrap();

    assert_eq!(*log.borrow(), vec![json!(1)]);
}

// =============================================================================
// Drafts
// =============================================================================

#[test]
fn scenario_draft_metadata_survives_schema_build() {
    let draft = Draft::new()
        .entry(
            "language",
            DraftEntry::new("en").with_meta("choices", json!(["en", "fr"])),
        )
        .preset("telemetry", false);

    let schema = Schema::new(draft).unwrap();

    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["language", "telemetry"]);
    assert_eq!(schema.meta("language").unwrap()["choices"], json!(["en", "fr"]));
    assert!(schema.meta("telemetry").unwrap().is_empty());
}

#[test]
fn scenario_draft_without_preset_is_rejected() {
    let err = Draft::from_value(json!({"theme": {"label": "Theme"}})).unwrap_err();
    assert!(matches!(err, Error::InvalidDraft { .. }), "got {err:?}");
}
