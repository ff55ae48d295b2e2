use chrono::Utc;
use gob_store::AppContext;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StateCommands;
use crate::output::output;

/// Handle `gob state`.
pub fn handle(
    action: &StateCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StateCommands::Show => {}
        StateCommands::Tab { name } => ctx.state.update(|s| s.tab.clone_from(name)),
        StateCommands::ToggleDeleted => ctx.state.update(|s| s.show_deleted = !s.show_deleted),
        StateCommands::Collapse { key } => ctx.state.update(|s| {
            s.toggle_collapse(key);
        }),
        StateCommands::Hint { key, version } => {
            let now = Utc::now();
            ctx.state.update(|s| s.mark_hint_seen(key, *version, now));
        }
    }
    output(ctx.state.value(), flags.format)
}
