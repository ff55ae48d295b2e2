//! Wire-format tests for entities as the API and realtime channel send them.

use gob_core::entities::*;
use gob_core::enums::AuthKind;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn endpoint_decodes_with_only_id_and_url() {
    let endpoint: EndpointEntity =
        serde_json::from_value(json!({"id": "a", "url": "http://x"})).unwrap();
    assert_eq!(endpoint.id, "a");
    assert_eq!(endpoint.url, "http://x");
    assert_eq!(endpoint.deleted, None);
    assert!(endpoint.headers.is_empty());
}

#[test]
fn endpoint_keeps_camel_case_timestamps() {
    let endpoint: EndpointEntity = serde_json::from_value(json!({
        "id": "a",
        "url": "http://x",
        "createdAt": "2024-01-01T00:00:00Z",
        "deleted": "2024-01-02"
    }))
    .unwrap();
    assert_eq!(endpoint.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(endpoint.deleted.as_deref(), Some("2024-01-02"));

    let back = serde_json::to_value(&endpoint).unwrap();
    assert_eq!(back["createdAt"], "2024-01-01T00:00:00Z");
}

#[test]
fn entity_without_id_is_rejected() {
    let result = serde_json::from_value::<RequestEntity>(json!({"method": "GET"}));
    assert!(result.is_err());
}

#[test]
fn schedule_decodes_server_field_names() {
    let schedule: ScheduleEntity = serde_json::from_value(json!({
        "id": "s1",
        "endpointID": "e1",
        "requestID": "r1",
        "maxInterJobConcurrency": true,
        "offsets": [1, 2],
        "config": {"concurrency": 2, "request_count": 4, "auth": {"kind": "bearer"}}
    }))
    .unwrap();
    assert_eq!(schedule.endpoint_id.as_deref(), Some("e1"));
    assert_eq!(schedule.request_id.as_deref(), Some("r1"));
    assert!(schedule.max_inter_job_concurrency);
    let config = schedule.config.unwrap();
    assert_eq!(config.concurrency, Some(2));
    assert_eq!(config.auth.unwrap().kind, Some(AuthKind::Bearer));
}

#[test]
fn stat_decodes_pascal_case_aggregates() {
    let stat: StatEntity = serde_json::from_value(json!({
        "id": "st1",
        "StartTime": "2024-01-01T00:00:00Z",
        "Average": 1500,
        "Requests": {"r": {"status_code": 200, "duration": 10}}
    }))
    .unwrap();
    assert_eq!(stat.average, Some(1500));
    assert_eq!(stat.requests["r"].status_code, Some(200));
}
