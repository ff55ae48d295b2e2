//! Realtime channel settings.

use serde::{Deserialize, Serialize};

const fn default_refresh_on_reconnect() -> bool {
    true
}

const fn default_reconnect_base_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealtimeConfig {
    /// Refetch every collection after the channel reconnects, since events
    /// sent while disconnected are lost.
    #[serde(default = "default_refresh_on_reconnect")]
    pub refresh_on_reconnect: bool,

    /// Base delay before the transport reconnects.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            refresh_on_reconnect: default_refresh_on_reconnect(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
        }
    }
}
