//! Mutating commands: set, reset

use colored::Colorize;
use draftcfg_core::{Alteration, ConfigStore};
use serde_json::Value;

use crate::context::StoreContext;
use crate::error::Result;

/// Interpret a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Set one key
pub fn run_set(ctx: &StoreContext, key: &str, raw: &str) -> Result<()> {
    let mut store = ctx.open()?;
    print_changes(&mut store);
    store.alter(key, parse_value(raw))?;
    Ok(())
}

/// Restore presets
pub fn run_reset(ctx: &StoreContext) -> Result<()> {
    let mut store = ctx.open()?;
    print_changes(&mut store);
    store.reset()?;
    println!("{} restored presets in {}", "ok".green().bold(), store.path().display());
    Ok(())
}

fn print_changes(store: &mut ConfigStore) {
    store.on_change(|batch: &[Alteration]| {
        for change in batch {
            println!("  {} {} = {}", "~".yellow(), change.key.bold(), change.value);
        }
        Ok(())
    });
}
