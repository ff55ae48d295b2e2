//! HTTP transport for list fetches.
//!
//! Every failure is turned into the `ApiError` the entity cache stores per
//! collection: transport failures use `NoStatusReceived`, undecodable bodies
//! use `MalformedResponse`, and error responses keep the server's own body
//! when it has one.

use std::time::Duration;

use gob_config::ApiConfig;
use gob_core::enums::Collection;
use gob_core::errors::ApiError;
use serde_json::Value;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// `GET {base_url}/api/{collection}/`, returning the raw JSON body.
    pub async fn list(&self, collection: Collection) -> Result<Value, ApiError> {
        let url = self.config.collection_url(collection.as_str());
        tracing::debug!(%url, "fetching collection");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|error| ApiError::no_status(error.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|error| ApiError::no_status(error.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|error| ApiError::malformed(error.to_string()))
    }
}

/// Prefer the server's `{code, error}` body; fall back to the status code.
fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(error) if !error.code.is_empty() => error,
        _ => ApiError::new(status.to_string(), body.trim()),
    }
}
