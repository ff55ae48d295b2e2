//! Cross-cutting error types for the dashboard.
//!
//! Crate-specific errors (`StorageError`, `CacheError`, `ConfigError`) live in
//! their own crates. `ApiError` is the error body returned by the Gobyoall API
//! and is stored per collection in the entity cache, so it is plain data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the API, or synthesized by the transport when no
/// response was received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("api error ({code}): {error}")]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub error: String,
}

impl ApiError {
    /// Code used when the transport failed before any status was received.
    pub const NO_STATUS: &'static str = "NoStatusReceived";

    /// Code used when a response arrived but could not be interpreted.
    pub const MALFORMED_RESPONSE: &'static str = "MalformedResponse";

    #[must_use]
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }

    #[must_use]
    pub fn no_status(error: impl Into<String>) -> Self {
        Self::new(Self::NO_STATUS, error)
    }

    #[must_use]
    pub fn malformed(error: impl Into<String>) -> Self {
        Self::new(Self::MALFORMED_RESPONSE, error)
    }
}

/// Errors raised while parsing domain values from text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known collection, variant or kind.
    #[error("Unknown {what}: '{value}'")]
    UnknownVariant { what: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_code_and_message() {
        let err = ApiError::new("404", "not found");
        assert_eq!(err.to_string(), "api error (404): not found");
    }

    #[test]
    fn api_error_tolerates_missing_fields() {
        let err: ApiError = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(err.code, "");
        assert_eq!(err.error, "boom");
    }
}
