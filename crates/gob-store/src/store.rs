//! The reactive persisted store engine.
//!
//! A [`Store`] owns a typed value plus three derived meta fields
//! ([`StoreState`]) and keeps them consistent across every transition:
//!
//! - `did_change` is recomputed against the restore baseline on every commit.
//! - The validator runs on every commit (or on the trailing edge of its own
//!   debounce window) and its payload/errors are replaced together.
//! - Every write to the persistence adapter goes through the redactor first.
//!   `update`/`set` writes are debounced; `restore`/`reset` write immediately.
//! - Observers are notified synchronously, in subscription order.
//!
//! Stores are single-threaded and expect a driver to call [`Store::tick`]
//! around [`Store::next_deadline`] so debounced work gets flushed.

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::debounce::{DebounceOptions, Debouncer};
use crate::merge::merge_over;
use crate::persistence::PersistenceAdapter;
use crate::redact::Redactor;
use crate::validator::{FieldErrors, NoValidation, Validator};

/// Default persistence debounce: 500ms quiet period, flushed at least every 2s.
pub const DEFAULT_PERSIST_DEBOUNCE: DebounceOptions =
    DebounceOptions::new(Duration::from_millis(500)).with_max_wait(Duration::from_secs(2));

/// Values a store can hold.
pub trait StoreValue: Serialize + DeserializeOwned + Clone + PartialEq + 'static {}

impl<T> StoreValue for T where T: Serialize + DeserializeOwned + Clone + PartialEq + 'static {}

/// The live value plus meta fields that are never part of the value itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreState<T, P> {
    pub value: T,
    /// True iff `value` differs from the restore baseline.
    pub did_change: bool,
    pub validation_payload: Option<P>,
    pub validation_errors: Option<FieldErrors>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer<T, P> = Box<dyn FnMut(&StoreState<T, P>)>;

struct Persistence {
    adapter: Rc<dyn PersistenceAdapter>,
    key: String,
    redactor: Redactor,
    debouncer: Debouncer,
}

pub struct Store<T: StoreValue, V: Validator<T> = NoValidation> {
    initial: T,
    baseline: T,
    state: StoreState<T, V::Payload>,
    validator: V,
    validation_debouncer: Option<Debouncer>,
    persistence: Option<Persistence>,
    observers: Vec<(SubscriptionId, Observer<T, V::Payload>)>,
    next_subscription: u64,
    clock: Rc<dyn Clock>,
}

impl<T: StoreValue> Store<T> {
    pub fn builder(initial: T) -> StoreBuilder<T> {
        StoreBuilder::new(initial)
    }

    /// An in-memory store without persistence or validation.
    pub fn new(initial: T) -> Self {
        StoreBuilder::new(initial).build()
    }
}

impl<T: StoreValue, V: Validator<T>> Store<T, V> {
    // -- reads ---------------------------------------------------------------

    pub const fn state(&self) -> &StoreState<T, V::Payload> {
        &self.state
    }

    pub const fn value(&self) -> &T {
        &self.state.value
    }

    pub const fn did_change(&self) -> bool {
        self.state.did_change
    }

    pub const fn baseline(&self) -> &T {
        &self.baseline
    }

    pub const fn initial_value(&self) -> &T {
        &self.initial
    }

    pub fn persistence_key(&self) -> Option<&str> {
        self.persistence.as_ref().map(|p| p.key.as_str())
    }

    // -- observers -----------------------------------------------------------

    /// Register an observer. It is called once immediately with the current
    /// state, then after every committed change.
    pub fn subscribe(
        &mut self,
        mut observer: impl FnMut(&StoreState<T, V::Payload>) + 'static,
    ) -> SubscriptionId {
        observer(&self.state);
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    // -- transitions ---------------------------------------------------------

    /// Apply `f` to a copy of the value. If the result equals the current
    /// value nothing happens: no validation, no write, no notification.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        let mut candidate = self.state.value.clone();
        f(&mut candidate);
        self.commit(candidate);
    }

    /// Replace the value wholesale, with the same contract as [`Self::update`].
    pub fn set(&mut self, value: T) {
        self.commit(value);
    }

    /// With a value: merge it over the initial value and make the result both
    /// the live value and the new baseline. Without: discard edits and return
    /// to the current baseline. Either way the validation results are
    /// cleared and the value is written immediately.
    pub fn restore(&mut self, baseline: Option<T>) {
        if let Some(next) = baseline {
            self.baseline = match serde_json::to_value(&next)
                .and_then(|overlay| merge_over(&self.initial, overlay))
            {
                Ok(merged) => merged,
                Err(error) => {
                    warn!(store = self.name(), %error, "failed to merge restored value over initial value");
                    next
                }
            };
        }
        self.state.value = self.baseline.clone();
        self.settle("restore");
    }

    /// Return to the initial value (not the restore baseline), which also
    /// becomes the baseline. Meta fields are cleared and the value is written
    /// immediately.
    pub fn reset(&mut self) {
        self.baseline = self.initial.clone();
        self.state.value = self.initial.clone();
        self.settle("reset");
    }

    // -- driver --------------------------------------------------------------

    /// Run debounced work that is due: a trailing persisted write and/or a
    /// trailing validation. Observers are notified if validation output
    /// changed.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if let Some(persistence) = self.persistence.as_mut() {
            if persistence.debouncer.poll(now) {
                write_record(persistence, &self.state.value);
            }
        }
        let validate = self
            .validation_debouncer
            .as_mut()
            .is_some_and(|d| d.poll(now));
        if validate && self.run_validation() {
            self.notify();
        }
    }

    /// Run all pending debounced work now, regardless of deadlines.
    pub fn flush(&mut self) {
        if let Some(persistence) = self.persistence.as_mut() {
            if persistence.debouncer.is_pending() {
                persistence.debouncer.cancel();
                write_record(persistence, &self.state.value);
            }
        }
        let validate = self.validation_debouncer.as_mut().is_some_and(|d| {
            let pending = d.is_pending();
            d.cancel();
            pending
        });
        if validate && self.run_validation() {
            self.notify();
        }
    }

    /// Earliest instant at which [`Self::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let write = self
            .persistence
            .as_ref()
            .and_then(|p| p.debouncer.pending_deadline());
        let validate = self
            .validation_debouncer
            .as_ref()
            .and_then(Debouncer::pending_deadline);
        match (write, validate) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether a debounced write or validation is still outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.next_deadline().is_some()
    }

    // -- internals -----------------------------------------------------------

    fn name(&self) -> &str {
        self.persistence_key().unwrap_or("<memory>")
    }

    fn commit(&mut self, candidate: T) {
        if candidate == self.state.value {
            trace!(store = self.name(), "update produced no change");
            return;
        }
        let now = self.clock.now();
        self.state.value = candidate;
        self.state.did_change = self.state.value != self.baseline;

        let validate_now = self
            .validation_debouncer
            .as_mut()
            .is_none_or(|d| d.call(now));
        if validate_now {
            self.run_validation();
        }

        if let Some(persistence) = self.persistence.as_mut() {
            if persistence.debouncer.call(now) {
                write_record(persistence, &self.state.value);
            }
        }

        debug!(
            store = self.name(),
            did_change = self.state.did_change,
            "committed store update"
        );
        self.notify();
    }

    /// Shared tail of `restore` and `reset`.
    fn settle(&mut self, reason: &'static str) {
        self.state.did_change = false;
        self.state.validation_payload = None;
        self.state.validation_errors = None;
        if let Some(debouncer) = self.validation_debouncer.as_mut() {
            debouncer.cancel();
        }
        if let Some(persistence) = self.persistence.as_mut() {
            persistence.debouncer.cancel();
            write_record(persistence, &self.state.value);
        }
        debug!(store = self.name(), reason, "store settled");
        self.notify();
    }

    /// Returns whether the validation output changed.
    fn run_validation(&mut self) -> bool {
        let (payload, errors) = self
            .validator
            .validate(&self.state.value, self.state.did_change)
            .into_parts();
        let changed =
            payload != self.state.validation_payload || errors != self.state.validation_errors;
        self.state.validation_payload = payload;
        self.state.validation_errors = errors;
        changed
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, observer) in &mut self.observers {
            observer(state);
        }
    }
}

fn write_record<T: Serialize>(persistence: &Persistence, value: &T) {
    let record = match persistence.redactor.redact_to_string(value) {
        Ok(record) => record,
        Err(error) => {
            warn!(key = %persistence.key, %error, "failed to serialize store for persistence");
            return;
        }
    };
    match persistence.adapter.set(&persistence.key, &record) {
        Ok(()) => debug!(key = %persistence.key, bytes = record.len(), "persisted store"),
        Err(error) => warn!(key = %persistence.key, %error, "failed to persist store"),
    }
}

fn hydrate<T: StoreValue>(initial: &T, persistence: &Persistence) -> T {
    let key = persistence.key.as_str();
    let raw = match persistence.adapter.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return initial.clone(),
        Err(error) => {
            warn!(key, %error, "failed to read persisted store; using initial value");
            return initial.clone();
        }
    };
    let overlay: Value = match serde_json::from_str(&raw) {
        Ok(overlay) => overlay,
        Err(error) => {
            warn!(key, %error, "persisted store is not valid JSON; using initial value");
            return initial.clone();
        }
    };
    match merge_over(initial, overlay) {
        Ok(value) => {
            debug!(key, "hydrated store from persistence");
            value
        }
        Err(error) => {
            warn!(key, %error, "persisted store does not match its shape; using initial value");
            initial.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct StoreBuilder<T, V = NoValidation> {
    initial: T,
    persistence: Option<(Rc<dyn PersistenceAdapter>, String)>,
    redactor: Option<Redactor>,
    persist_debounce: DebounceOptions,
    validator: V,
    validation_debounce: Option<DebounceOptions>,
    clock: Option<Rc<dyn Clock>>,
}

impl<T: StoreValue> StoreBuilder<T> {
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            persistence: None,
            redactor: None,
            persist_debounce: DEFAULT_PERSIST_DEBOUNCE,
            validator: NoValidation,
            validation_debounce: None,
            clock: None,
        }
    }
}

impl<T: StoreValue, V: Validator<T>> StoreBuilder<T, V> {
    /// Hydrate from and write to `adapter` under `key`.
    #[must_use]
    pub fn persist(mut self, adapter: Rc<dyn PersistenceAdapter>, key: impl Into<String>) -> Self {
        self.persistence = Some((adapter, key.into()));
        self
    }

    /// Redaction applied before every write. Defaults to [`Redactor::default`].
    #[must_use]
    pub fn redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = Some(redactor);
        self
    }

    #[must_use]
    pub fn persist_debounce(mut self, options: DebounceOptions) -> Self {
        self.persist_debounce = options;
        self
    }

    /// Debounce validation as well. Without this, validation runs on every
    /// commit.
    #[must_use]
    pub fn validation_debounce(mut self, options: DebounceOptions) -> Self {
        self.validation_debounce = Some(options);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn validator<W: Validator<T>>(self, validator: W) -> StoreBuilder<T, W> {
        StoreBuilder {
            initial: self.initial,
            persistence: self.persistence,
            redactor: self.redactor,
            persist_debounce: self.persist_debounce,
            validator,
            validation_debounce: self.validation_debounce,
            clock: self.clock,
        }
    }

    /// Hydrate and construct. The baseline starts at the initial value, so a
    /// hydrated draft that differs from it starts out changed (and validated).
    pub fn build(self) -> Store<T, V> {
        let Self {
            initial,
            persistence,
            redactor,
            persist_debounce,
            validator,
            validation_debounce,
            clock,
        } = self;

        let persistence = persistence.map(|(adapter, key)| Persistence {
            adapter,
            key,
            redactor: redactor.unwrap_or_default(),
            debouncer: Debouncer::new(persist_debounce),
        });

        let value = persistence
            .as_ref()
            .map_or_else(|| initial.clone(), |p| hydrate(&initial, p));
        let did_change = value != initial;
        let (validation_payload, validation_errors) =
            validator.validate(&value, did_change).into_parts();

        Store {
            baseline: initial.clone(),
            initial,
            state: StoreState {
                value,
                did_change,
                validation_payload,
                validation_errors,
            },
            validator,
            validation_debouncer: validation_debounce.map(Debouncer::new),
            persistence,
            observers: Vec::new(),
            next_subscription: 0,
            clock: clock.unwrap_or_else(|| Rc::new(SystemClock)),
        }
    }
}
