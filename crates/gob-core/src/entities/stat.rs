use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Aggregated statistics of one run. Durations are nanoseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatEntity {
    pub id: String,
    #[serde(rename = "StartTime", default)]
    pub start_time: String,
    #[serde(rename = "Average", default, skip_serializing_if = "Option::is_none")]
    pub average: Option<i64>,
    #[serde(rename = "Max", default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(rename = "Min", default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(rename = "Total", default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(rename = "Requests", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, CompactStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_hash_map: Option<Value>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
}

/// Outcome of a single request within a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompactStat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_hash: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i16>,
}
