//! Connection settings for the Gobyoall API.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("http://localhost:80")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Server origin. Resource paths are built as `{base_url}/api/{collection}/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// URL of a resource collection, always with a single trailing slash.
    pub fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/{}/",
            self.base_url.trim_end_matches('/'),
            collection.trim_matches('/')
        )
    }
}
