//! JSON resource persistence for draftcfg
//!
//! Provides normalized path handling, atomic text I/O and the
//! [`JsonResource`] adapter that reads a configuration file merged over
//! defaults and writes full snapshots back to disk.

pub mod error;
pub mod io;
pub mod path;
pub mod resource;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use resource::{JsonResource, merge_over};
