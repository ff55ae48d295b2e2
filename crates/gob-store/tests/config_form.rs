//! Configuration form integration tests
//!
//! - debounced validation converges to the latest edit
//! - restore_from a server config
//! - persisted drafts are redacted and revalidated on hydration

use std::rc::Rc;
use std::time::Duration;

use gob_core::enums::AuthKind;
use gob_core::run_config::RunConfig;
use gob_store::config_form::{CONFIG_FORM_KEY, ConfigFormStore};
use gob_store::{DebounceOptions, ManualClock, MemoryStorage, REDACTED, RedactionRule, Redactor};
use pretty_assertions::assert_eq;
use serde_json::json;

const VALIDATION_WAIT: Duration = Duration::from_millis(250);

struct Harness {
    form: ConfigFormStore,
    storage: MemoryStorage,
    clock: Rc<ManualClock>,
}

fn harness_with(storage: MemoryStorage) -> Harness {
    let clock = Rc::new(ManualClock::new());
    let store = ConfigFormStore::builder()
        .persist(Rc::new(storage.clone()), CONFIG_FORM_KEY)
        .redactor(Redactor::default().with_rule(RedactionRule::Key("token".into())))
        .validation_debounce(DebounceOptions::new(VALIDATION_WAIT).trailing_only())
        .clock(clock.clone())
        .build();
    Harness {
        form: ConfigFormStore::new(store),
        storage,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(MemoryStorage::new())
}

#[test]
fn concurrency_then_request_count() {
    let mut h = harness();

    h.form.update(|f| f.concurrency = Some(5));
    assert_eq!(h.form.errors(), None, "validation waits for the debounce window");

    h.clock.advance(VALIDATION_WAIT);
    h.form.tick();
    let errors = h.form.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors["request_count"],
        "If concurrency is set, request-count must also be set"
    );
    assert_eq!(h.form.payload(), None);

    h.form.update(|f| f.request_count = Some(10));
    h.clock.advance(VALIDATION_WAIT);
    h.form.tick();
    assert_eq!(h.form.errors(), None);
    assert_eq!(
        serde_json::to_value(h.form.payload().unwrap()).unwrap(),
        json!({"concurrency": 5, "request_count": 10})
    );
}

#[test]
fn typing_burst_validates_latest_value_once() {
    let mut h = harness();
    for n in 1..=5 {
        h.form.update(|f| f.concurrency = Some(n));
        h.clock.advance(Duration::from_millis(50));
    }
    h.form.update(|f| f.request_count = Some(3));
    h.clock.advance(VALIDATION_WAIT);
    h.form.tick();

    assert_eq!(
        h.form.errors().unwrap()["concurrency"],
        "Concurrency cannot be higher than request-count"
    );
}

#[test]
fn restore_from_server_config_clears_change_state() {
    let mut h = harness();
    h.form.update(|f| f.concurrency = Some(1));

    let config: RunConfig = serde_json::from_value(json!({
        "concurrency": 2,
        "request_count": 8,
        "auth": {"kind": "bearer", "token": "abc", "client_secret": "shh"}
    }))
    .unwrap();
    h.form.restore_from(Some(&config));

    assert!(!h.form.store().did_change());
    assert_eq!(h.form.payload(), None);
    assert_eq!(h.form.value().auth.kind, Some(AuthKind::Bearer));

    let raw = h.storage.raw(CONFIG_FORM_KEY).unwrap();
    assert!(!raw.contains("abc"));
    assert!(!raw.contains("shh"));
    assert!(raw.contains(REDACTED));

    h.form.update(|f| f.request_count = Some(4));
    h.form.restore_from(None);
    assert_eq!(h.form.value().request_count, Some(8));
}

#[test]
fn hydrated_draft_is_validated_at_construction() {
    let storage = MemoryStorage::new();
    storage.seed(
        CONFIG_FORM_KEY,
        r#"{"concurrency":3,"request_count":6,"auth":{"kind":"bearer","token":"**REDACTED**"}}"#,
    );
    let h = harness_with(storage);

    assert!(h.form.store().did_change());
    let payload = h.form.payload().unwrap();
    assert_eq!(payload.concurrency, Some(3));
    let auth = payload.auth.as_ref().unwrap();
    assert_eq!(auth.kind, Some(AuthKind::Bearer));
    assert_eq!(auth.token, None, "redacted token stays on the server");
}

#[test]
fn reset_drops_validation_output() {
    let mut h = harness();
    h.form.update(|f| f.concurrency = Some(-1));
    h.form.flush();
    assert!(h.form.errors().is_some());

    h.form.reset();
    assert_eq!(h.form.errors(), None);
    assert_eq!(h.form.store().next_deadline(), None);
}
