use clap::Subcommand;

/// Persisted UI state.
#[derive(Clone, Debug, Subcommand)]
pub enum StateCommands {
    /// Show the UI state.
    Show,
    /// Switch the active tab.
    Tab {
        name: String,
    },
    /// Toggle whether soft-deleted entities are listed.
    #[command(name = "toggle-deleted")]
    ToggleDeleted,
    /// Toggle a collapsible panel.
    Collapse {
        key: String,
    },
    /// Mark a hint as read at the given version.
    Hint {
        key: String,
        #[arg(default_value_t = 1)]
        version: u32,
    },
}
