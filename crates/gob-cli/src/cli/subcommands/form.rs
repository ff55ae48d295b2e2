use clap::Subcommand;

/// Run-configuration form editing.
#[derive(Clone, Debug, Subcommand)]
pub enum FormCommands {
    /// Show the form value, whether it changed, and its payload or errors.
    Show,
    /// Set one dotted field of the form, e.g. `auth.token`.
    Set {
        /// Dotted field path. Array elements are addressed by index.
        path: String,
        /// JSON value; anything that is not valid JSON is taken as a string.
        value: String,
    },
    /// Discard edits, or load a server config as the new baseline.
    Restore {
        /// JSON file holding the server's run config.
        #[arg(long)]
        from: Option<String>,
    },
    /// Return to the empty form.
    Reset,
}
