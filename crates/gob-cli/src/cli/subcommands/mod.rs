pub mod form;
pub mod state;

pub use form::FormCommands;
pub use state::StateCommands;
