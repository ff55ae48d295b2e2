//! The run configuration attached to endpoints, requests and schedules.
//!
//! This is the payload shape the server accepts. Every field is optional and
//! omitted from JSON when unset, so a partially filled `RunConfig` doubles as
//! a diff payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::enums::AuthKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Concurrency for the requests to be made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<i64>,

    /// HTTP status codes to consider OK. The server defaults to 200 and 204.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok_status_codes: Option<Vec<i64>>,

    /// Number of requests to perform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_count: Option<i64>,

    /// Whether response data should be stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<BTreeMap<String, String>>,
}

impl RunConfig {
    /// True when no field is set, i.e. there is nothing to submit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Identity provider flavour for impersonation. Only `keycloak` is supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,

    /// Header to put the token in. The server defaults to `Authorization`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_key: Option<String>,

    #[serde(
        rename = "impersionation_credentials",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub impersonation_credentials: Option<ImpersonationCredentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AuthKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicAuth {
    #[serde(rename = "headerKey", default, skip_serializing_if = "Option::is_none")]
    pub header_key: Option<String>,

    #[serde(default)]
    pub requests: Vec<DynamicRequest>,
}

/// One step of a dynamic authentication chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub json_request: bool,

    #[serde(default)]
    pub json_response: bool,

    #[serde(default)]
    pub method: String,

    /// JMESPath expression selecting the token from the response.
    #[serde(default)]
    pub result_jmes_path: String,

    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpersonationCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// User id to impersonate. Preferred over `user_name_to_impersonate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id_to_impersonate: Option<String>,

    /// Looked up server-side to resolve the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name_to_impersonate: Option<String>,

    /// Username with the impersonation role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
