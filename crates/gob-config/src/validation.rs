//! Form validation settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_debounce_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Debounce window for re-validating the configuration form while typing.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ValidationConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
