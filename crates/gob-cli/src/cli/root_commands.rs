use clap::{Args, Subcommand};
use gob_core::enums::Collection;

use crate::cli::subcommands::{FormCommands, StateCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Edit the run-configuration form.
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Persisted UI state.
    State {
        #[command(subcommand)]
        action: StateCommands,
    },
    /// Apply realtime events (one JSON object per line) to the entity cache.
    Replay(ReplayArgs),
    /// List-fetch collections from the API into the entity cache.
    Sync(SyncArgs),
}

/// Arguments for `gob replay`.
#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// JSONL file of events, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,
}

/// Arguments for `gob sync`.
#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Only this collection (defaults to all).
    #[arg(long, value_parser = parse_collection)]
    pub collection: Option<Collection>,
}

fn parse_collection(raw: &str) -> Result<Collection, String> {
    raw.parse().map_err(|error: gob_core::errors::CoreError| error.to_string())
}
