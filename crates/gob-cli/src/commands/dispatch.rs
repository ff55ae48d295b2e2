use gob_config::DashboardConfig;
use gob_store::AppContext;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    config: &DashboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Form { action } => commands::form::handle(&action, ctx, flags),
        Commands::State { action } => commands::state::handle(&action, ctx, flags),
        Commands::Replay(args) => commands::replay::handle(&args, ctx, flags).await,
        Commands::Sync(args) => commands::sync::handle(&args, ctx, config, flags).await,
    }
}
