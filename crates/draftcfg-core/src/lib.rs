//! Draft-driven JSON configuration store
//!
//! A [`Draft`] declares configuration keys with preset values and optional
//! metadata. A [`ConfigStore`] opened for that draft reads the backing
//! `.json` file merged over the presets, writes every mutation back, and
//! notifies listeners synchronously.
//!
//! # Architecture
//!
//! ```text
//!        ConfigStore ── Emitter ("change", "change:<key>")
//!         |      |
//!      Schema  JsonResource (draftcfg-fs)
//!         |
//!       Draft
//! ```
//!
//! # Example
//!
//! ```no_run
//! use draftcfg_core::{ConfigStore, Draft, StoreOptions};
//! use serde_json::json;
//!
//! fn example() -> draftcfg_core::Result<()> {
//!     let draft = Draft::new().preset("theme", "light").preset("volume", 7);
//!     let options = StoreOptions::new("settings/app.json").use_cache(true);
//!
//!     let mut store = ConfigStore::open(draft, options)?;
//!     store.on_change(|batch| {
//!         for change in batch {
//!             println!("{} -> {}", change.key, change.value);
//!         }
//!         Ok(())
//!     });
//!
//!     store.alter("volume", json!(9))?;
//!     assert_eq!(store.read_key("volume")?, json!(9));
//!     Ok(())
//! }
//! ```
//!
//! Listeners run on the caller's stack and are not `Send`; a store has a
//! single owner.

pub mod error;
pub mod events;
pub mod options;
pub mod schema;
pub mod store;

pub use error::{BoxError, Error, Result};
pub use events::{Alteration, CHANGE_EVENT, ChangeEvent, Emitter, ListenerResult, Payload};
pub use options::StoreOptions;
pub use schema::{Draft, DraftEntry, Schema};
pub use store::{Config, ConfigStore};
