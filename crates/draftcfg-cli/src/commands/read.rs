//! Read-only commands: show, get, describe

use colored::Colorize;
use serde_json::{Map, Value, json};

use crate::context::StoreContext;
use crate::error::Result;

/// Print the whole configuration
pub fn run_show(ctx: &StoreContext) -> Result<()> {
    let store = ctx.open()?;
    println!("{}", serde_json::to_string_pretty(&store.read())?);
    Ok(())
}

/// Print one value as JSON
pub fn run_get(ctx: &StoreContext, key: &str) -> Result<()> {
    let store = ctx.open()?;
    println!("{}", serde_json::to_string_pretty(&store.read_key(key)?)?);
    Ok(())
}

/// List declared keys with their presets, current values and metadata
pub fn run_describe(ctx: &StoreContext, json: bool) -> Result<()> {
    let store = ctx.open()?;
    let schema = store.schema();
    let current = store.read();

    if json {
        let keys: Map<String, Value> = schema
            .keys()
            .map(|key| {
                let entry = json!({
                    "preset": schema.get(key).ok(),
                    "current": current.get(key),
                    "meta": schema.meta(key).ok(),
                });
                (key.to_string(), entry)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    println!("{}", "Declared Keys".bold());
    println!("  {:<12} {}", "Resource:".dimmed(), store.path().display());
    println!();

    for key in schema.keys() {
        let preset = schema.get(key)?;
        let value = current.get(key).unwrap_or(&Value::Null);
        let marker = if value == preset {
            " ".normal()
        } else {
            "*".yellow()
        };
        println!("  {} {}", marker, key.bold());
        println!("      {:<10} {}", "preset:".dimmed(), preset);
        println!("      {:<10} {}", "current:".dimmed(), value);
        for (field, meta) in schema.meta(key)? {
            println!("      {:<10} {}", format!("{field}:").as_str().dimmed(), meta);
        }
    }

    Ok(())
}
