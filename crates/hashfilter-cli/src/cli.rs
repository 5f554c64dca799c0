//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hashfilter: validate and coerce JSON payloads against a schema
#[derive(Parser)]
#[command(name = "hashfilter")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a JSON payload through a schema
    Check {
        /// Path to the schema document (JSON/YAML)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Path to the JSON payload (default: stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Print plain-English messages instead of symbolic errors
        #[arg(long)]
        messages: bool,

        /// Print the filtered payload on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Show the fields a schema declares
    Inspect {
        /// Path to the schema document (JSON/YAML)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
