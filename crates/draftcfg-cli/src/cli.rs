//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// draftcfg - Inspect and edit a draft-backed JSON configuration
#[derive(Parser, Debug)]
#[command(name = "draftcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Draft file declaring keys, presets and metadata
    #[arg(short, long, env = "DRAFTCFG_DRAFT", global = true)]
    pub draft: Option<PathBuf>,

    /// Configuration resource (must end in .json)
    #[arg(short, long, env = "DRAFTCFG_PATH", global = true)]
    pub path: Option<PathBuf>,

    /// Fail instead of creating missing directories
    #[arg(long, global = true)]
    pub no_create: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the full configuration as JSON
    Show,

    /// Print the current value of one key
    Get {
        /// Declared key
        key: String,
    },

    /// Set one key
    ///
    /// The value is parsed as JSON; anything that is not valid JSON is
    /// stored as a string.
    ///
    /// Examples:
    ///   draftcfg set volume 9
    ///   draftcfg set theme dark
    ///   draftcfg set window '{"width": 1024, "height": 768}'
    Set {
        /// Declared key
        key: String,

        /// New value
        value: String,
    },

    /// Restore every key to its preset
    Reset,

    /// List declared keys with presets and metadata
    Describe {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
