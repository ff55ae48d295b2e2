//! Application context integration tests
//!
//! - UI state and form drafts survive a restart through `FileStorage`
//! - `next_deadline` / `tick` drive every store
//! - configuration toggles reach the stores
//! - bearer tokens never reach storage from any store

use std::rc::Rc;

use gob_config::DashboardConfig;
use gob_core::entities::EndpointEntity;
use gob_core::enums::AuthKind;
use gob_core::run_config::{AuthConfig, RunConfig};
use gob_store::{AppContext, Clock, FileStorage, ManualClock, MemoryStorage, REDACTED};
use pretty_assertions::assert_eq;

fn file_context(dir: &std::path::Path, config: &DashboardConfig) -> AppContext {
    AppContext::new(
        config,
        Rc::new(FileStorage::new(dir)),
        Rc::new(ManualClock::new()),
    )
    .unwrap()
}

#[test]
fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig::default();

    let mut ctx = file_context(dir.path(), &config);
    ctx.state.update(|s| {
        s.tab = "schedules".into();
        s.toggle_collapse("stats");
    });
    ctx.config_form.update(|f| f.concurrency = Some(2));
    ctx.flush();
    drop(ctx);

    let ctx = file_context(dir.path(), &config);
    assert_eq!(ctx.state.value().tab, "schedules");
    assert!(ctx.state.value().is_collapsed("stats"));
    assert_eq!(ctx.config_form.value().concurrency, Some(2));
    assert!(ctx.config_form.store().did_change());
}

#[test]
fn tick_flushes_due_work_across_stores() {
    let config = DashboardConfig::default();
    let storage = MemoryStorage::new();
    let clock = Rc::new(ManualClock::new());
    let mut ctx = AppContext::new(&config, Rc::new(storage.clone()), clock.clone()).unwrap();

    ctx.state.update(|s| s.tab = "a".into());
    ctx.state.update(|s| s.tab = "b".into());
    ctx.config_form.update(|f| f.concurrency = Some(1));

    let deadline = ctx.next_deadline().unwrap();
    assert!(deadline > clock.now());

    clock.advance(config.persistence.debounce_max_wait());
    ctx.tick();

    assert_eq!(ctx.next_deadline(), None);
    let last_state = storage.writes_for("state").pop().unwrap();
    assert!(last_state.contains(r#""tab":"b""#));
    assert!(ctx.config_form.errors().is_some());
}

#[test]
fn zero_validation_debounce_validates_on_every_edit() {
    let mut config = DashboardConfig::default();
    config.validation.debounce_ms = 0;
    let mut ctx = AppContext::new(
        &config,
        Rc::new(MemoryStorage::new()),
        Rc::new(ManualClock::new()),
    )
    .unwrap();

    ctx.config_form.update(|f| f.request_count = Some(5));
    assert_eq!(
        ctx.config_form.errors().unwrap()["concurrency"],
        "If request-count is set, concurrency must also be set"
    );
}

#[test]
fn persisted_entity_cache_is_opt_in() {
    let mut config = DashboardConfig::default();
    config.persistence.persist_entity_cache = true;
    config.realtime.refresh_on_reconnect = false;
    let mut ctx = AppContext::new(
        &config,
        Rc::new(MemoryStorage::new()),
        Rc::new(ManualClock::new()),
    )
    .unwrap();

    assert_eq!(ctx.db.store().persistence_key(), Some("db"));
    assert!(ctx.db.handle_reconnect().is_empty());
}

#[test]
fn persisted_entity_cache_redacts_bearer_tokens() {
    let mut config = DashboardConfig::default();
    config.persistence.persist_entity_cache = true;
    let storage = MemoryStorage::new();
    let mut ctx = AppContext::new(
        &config,
        Rc::new(storage.clone()),
        Rc::new(ManualClock::new()),
    )
    .unwrap();

    let endpoint = EndpointEntity {
        id: "a".into(),
        url: "http://target".into(),
        config: Some(RunConfig {
            auth: Some(AuthConfig {
                kind: Some(AuthKind::Bearer),
                token: Some("bearer-plaintext".into()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    };
    ctx.db.apply_entity(endpoint).unwrap();
    ctx.config_form.update(|f| f.auth.token = Some("form-plaintext".into()));
    ctx.flush();

    let db = storage.raw("db").unwrap();
    assert!(!db.contains("bearer-plaintext"));
    assert!(db.contains(REDACTED));
    let form = storage.raw("form-config").unwrap();
    assert!(!form.contains("form-plaintext"));

    // the live cache keeps the real token
    let cached = ctx.db.get::<EndpointEntity>("a").unwrap();
    let token = cached
        .config
        .as_ref()
        .and_then(|c| c.auth.as_ref())
        .and_then(|a| a.token.as_deref());
    assert_eq!(token, Some("bearer-plaintext"));
}
