//! # gob-store
//!
//! Reactive persisted stores for the Gobyoall dashboard.
//!
//! A [`Store`] holds one typed value and keeps three derived fields in sync
//! with it: whether it differs from the last restored baseline, and the
//! payload or field errors produced by its [`Validator`]. Every write to the
//! [`PersistenceAdapter`] goes through a [`Redactor`] first and is debounced.
//!
//! Three stores are built on the engine:
//! - [`EntityCache`]: normalized server entities, fed by list fetches and
//!   realtime events
//! - [`UiStateStore`]: persisted UI toggles
//! - [`ConfigFormStore`]: the run-configuration form and its validator
//!
//! [`AppContext`] builds all three from a [`gob_config::DashboardConfig`].
//!
//! Stores are single-threaded. Debounced work runs when the owner calls
//! `tick()` at or after `next_deadline()`, or `flush()`.

pub mod clock;
pub mod config_form;
pub mod context;
pub mod debounce;
pub mod entity_cache;
pub mod error;
pub mod merge;
pub mod persistence;
pub mod redact;
pub mod store;
pub mod ui_state;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config_form::{ConfigForm, ConfigFormStore, ConfigFormValidator};
pub use context::AppContext;
pub use debounce::{DebounceOptions, Debouncer};
pub use entity_cache::{Db, Entity, EntityCache, ResponseState};
pub use error::{CacheError, StorageError, StoreError};
pub use persistence::{FileStorage, MemoryStorage, PersistenceAdapter};
pub use redact::{REDACTED, RedactionRule, Redactor};
pub use store::{Store, StoreBuilder, StoreState, SubscriptionId};
pub use ui_state::{UiState, UiStateStore};
pub use validator::{FieldErrors, Validation, Validator};
