//! Command implementations for draftcfg-cli

pub mod read;
pub mod write;

pub use read::{run_describe, run_get, run_show};
pub use write::{parse_value, run_reset, run_set};
