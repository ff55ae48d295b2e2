//! The three dashboard stores, built once from configuration and passed
//! around explicitly.

use std::rc::Rc;
use std::time::Instant;

use gob_config::DashboardConfig;

use crate::clock::{Clock, SystemClock};
use crate::config_form::{CONFIG_FORM_KEY, ConfigFormStore};
use crate::debounce::DebounceOptions;
use crate::entity_cache::{Db, ENTITY_CACHE_KEY, EntityCache};
use crate::error::StoreError;
use crate::persistence::{MemoryStorage, PersistenceAdapter};
use crate::redact::{RedactionRule, Redactor};
use crate::store::{Store, StoreBuilder, StoreValue};
use crate::ui_state::{UI_STATE_KEY, UiState, UiStateStore};
use crate::validator::Validator;

pub struct AppContext {
    pub db: EntityCache,
    pub state: UiStateStore,
    pub config_form: ConfigFormStore,
}

impl AppContext {
    /// Build and hydrate every store. Fails only on invalid redaction
    /// patterns; unreadable persisted data falls back to initial values.
    pub fn new(
        config: &DashboardConfig,
        adapter: Rc<dyn PersistenceAdapter>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        let persistence = &config.persistence;
        let redactor = Redactor::from_patterns(&persistence.redaction_patterns)?
            .with_rule(RedactionRule::Key("token".into()));
        let persist_debounce = DebounceOptions::new(persistence.debounce_wait())
            .with_max_wait(persistence.debounce_max_wait());

        let state = with_persistence(
            Store::builder(UiState::default()).redactor(redactor.clone()),
            persistence.enabled.then(|| Rc::clone(&adapter)),
            UI_STATE_KEY,
            persist_debounce,
            &clock,
        )
        .build();

        let mut form_builder = ConfigFormStore::builder().redactor(redactor.clone());
        if !config.validation.debounce().is_zero() {
            let validation = DebounceOptions::new(config.validation.debounce()).trailing_only();
            form_builder = form_builder.validation_debounce(validation);
        }
        let config_form = ConfigFormStore::new(
            with_persistence(
                form_builder,
                persistence.enabled.then(|| Rc::clone(&adapter)),
                CONFIG_FORM_KEY,
                persist_debounce,
                &clock,
            )
            .build(),
        );

        let db = EntityCache::new(
            with_persistence(
                Store::builder(Db::default()).redactor(redactor),
                (persistence.enabled && persistence.persist_entity_cache)
                    .then(|| Rc::clone(&adapter)),
                ENTITY_CACHE_KEY,
                persist_debounce,
                &clock,
            )
            .build(),
        )
        .with_refresh_on_reconnect(config.realtime.refresh_on_reconnect);

        Ok(Self {
            db,
            state,
            config_form,
        })
    }

    /// Every store kept in memory, on the system clock.
    pub fn in_memory(config: &DashboardConfig) -> Result<Self, StoreError> {
        Self::new(config, Rc::new(MemoryStorage::new()), Rc::new(SystemClock))
    }

    /// Run due debounced work in every store.
    pub fn tick(&mut self) {
        self.db.tick();
        self.state.tick();
        self.config_form.tick();
    }

    /// Write out every pending debounced change.
    pub fn flush(&mut self) {
        self.db.flush();
        self.state.flush();
        self.config_form.flush();
    }

    /// Earliest deadline across all stores.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.db.store().next_deadline(),
            self.state.next_deadline(),
            self.config_form.store().next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

fn with_persistence<T: StoreValue, V: Validator<T>>(
    builder: StoreBuilder<T, V>,
    adapter: Option<Rc<dyn PersistenceAdapter>>,
    key: &str,
    debounce: DebounceOptions,
    clock: &Rc<dyn Clock>,
) -> StoreBuilder<T, V> {
    let builder = builder.persist_debounce(debounce).clock(Rc::clone(clock));
    match adapter {
        Some(adapter) => builder.persist(adapter, key),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn disabled_persistence_never_writes() {
        let mut config = DashboardConfig::default();
        config.persistence.enabled = false;
        let storage = MemoryStorage::new();
        let mut ctx = AppContext::new(
            &config,
            Rc::new(storage.clone()),
            Rc::new(ManualClock::new()),
        )
        .unwrap();

        ctx.state.update(|s| s.tab = "stats".into());
        ctx.flush();
        assert!(storage.writes().is_empty());
        assert_eq!(ctx.state.persistence_key(), None);
    }

    #[test]
    fn entity_cache_is_memory_only_by_default() {
        let ctx = AppContext::in_memory(&DashboardConfig::default()).unwrap();
        assert_eq!(ctx.db.store().persistence_key(), None);
        assert_eq!(ctx.state.persistence_key(), Some(UI_STATE_KEY));
        assert_eq!(ctx.config_form.store().persistence_key(), Some(CONFIG_FORM_KEY));
    }

    #[test]
    fn invalid_redaction_pattern_is_reported() {
        let mut config = DashboardConfig::default();
        config.persistence.redaction_patterns = vec!["(".into()];
        assert!(matches!(
            AppContext::in_memory(&config),
            Err(StoreError::InvalidRedactionPattern(_))
        ));
    }
}
