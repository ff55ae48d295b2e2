//! Durable client-side storage settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const fn default_enabled() -> bool {
    true
}

const fn default_debounce_wait_ms() -> u64 {
    500
}

const fn default_debounce_max_wait_ms() -> u64 {
    2000
}

fn default_redaction_patterns() -> Vec<String> {
    vec![String::from("(?i)secret"), String::from("(?i)password")]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// Whether stores write to durable storage at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory holding one `<key>.json` file per store. Empty means the
    /// platform data directory.
    #[serde(default)]
    pub dir: String,

    /// Quiet period before a trailing write is flushed.
    #[serde(default = "default_debounce_wait_ms")]
    pub debounce_wait_ms: u64,

    /// Upper bound on how long a burst of edits can postpone a write.
    #[serde(default = "default_debounce_max_wait_ms")]
    pub debounce_max_wait_ms: u64,

    /// Key-name regexes whose string values are redacted before any write.
    #[serde(default = "default_redaction_patterns")]
    pub redaction_patterns: Vec<String>,

    /// Persist the normalized entity cache too. Off by default: server data is
    /// refetched on startup.
    #[serde(default)]
    pub persist_entity_cache: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: String::new(),
            debounce_wait_ms: default_debounce_wait_ms(),
            debounce_max_wait_ms: default_debounce_max_wait_ms(),
            redaction_patterns: default_redaction_patterns(),
            persist_entity_cache: false,
        }
    }
}

impl PersistenceConfig {
    /// Resolve the storage directory, falling back to `<data_dir>/gobyoall`.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        if self.dir.is_empty() {
            dirs::data_dir().map(|p| p.join("gobyoall"))
        } else {
            Some(PathBuf::from(&self.dir))
        }
    }

    pub const fn debounce_wait(&self) -> Duration {
        Duration::from_millis(self.debounce_wait_ms)
    }

    pub const fn debounce_max_wait(&self) -> Duration {
        Duration::from_millis(self.debounce_max_wait_ms)
    }
}
