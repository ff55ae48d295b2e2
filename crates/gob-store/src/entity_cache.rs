//! Normalized client-side cache of server entities.
//!
//! One map per [`Collection`], keyed by entity id, plus a loading/error flag
//! per collection. Kept in sync by list fetches (`apply_list*`), single-entity
//! responses (`apply_entity*`) and realtime push events.
//!
//! Soft-deleted entities stay in their map with `deleted` set. Only a `clean`
//! event removes entries, and it removes the whole collection.
//!
//! Malformed payloads from the server are logged and dropped without touching
//! the maps. Caller mistakes (an entity without an id) return [`CacheError`].

use std::collections::BTreeMap;

use gob_core::entities::{EndpointEntity, RequestEntity, ScheduleEntity, StatEntity};
use gob_core::enums::Collection;
use gob_core::errors::ApiError;
use gob_core::events::RealtimeEvent;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::store::{Store, StoreState, SubscriptionId};

/// Storage key of the entity cache, when it is persisted.
pub const ENTITY_CACHE_KEY: &str = "db";

pub type EntityMap<E> = BTreeMap<String, E>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseState {
    pub loading: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseStates {
    pub endpoint: ResponseState,
    pub request: ResponseState,
    pub schedule: ResponseState,
    pub stat: ResponseState,
}

impl ResponseStates {
    #[must_use]
    pub const fn get(&self, collection: Collection) -> &ResponseState {
        match collection {
            Collection::Endpoint => &self.endpoint,
            Collection::Request => &self.request,
            Collection::Schedule => &self.schedule,
            Collection::Stat => &self.stat,
        }
    }

    pub const fn get_mut(&mut self, collection: Collection) -> &mut ResponseState {
        match collection {
            Collection::Endpoint => &mut self.endpoint,
            Collection::Request => &mut self.request,
            Collection::Schedule => &mut self.schedule,
            Collection::Stat => &mut self.stat,
        }
    }
}

/// The cache contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Db {
    pub endpoint: EntityMap<EndpointEntity>,
    pub request: EntityMap<RequestEntity>,
    pub schedule: EntityMap<ScheduleEntity>,
    pub stat: EntityMap<StatEntity>,
    #[serde(rename = "responseStates")]
    pub response_states: ResponseStates,
}

impl Db {
    #[must_use]
    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Endpoint => self.endpoint.len(),
            Collection::Request => self.request.len(),
            Collection::Schedule => self.schedule.len(),
            Collection::Stat => self.stat.len(),
        }
    }

    fn clear(&mut self, collection: Collection) {
        match collection {
            Collection::Endpoint => self.endpoint.clear(),
            Collection::Request => self.request.clear(),
            Collection::Schedule => self.schedule.clear(),
            Collection::Stat => self.stat.clear(),
        }
    }
}

/// An entity type stored in one of the [`Db`] maps.
pub trait Entity: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn deleted(&self) -> Option<&str>;
    fn map(db: &Db) -> &EntityMap<Self>;
    fn map_mut(db: &mut Db) -> &mut EntityMap<Self>;
}

macro_rules! impl_entity {
    ($ty:ty, $collection:ident, $field:ident) => {
        impl Entity for $ty {
            const COLLECTION: Collection = Collection::$collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn deleted(&self) -> Option<&str> {
                self.deleted.as_deref()
            }

            fn map(db: &Db) -> &EntityMap<Self> {
                &db.$field
            }

            fn map_mut(db: &mut Db) -> &mut EntityMap<Self> {
                &mut db.$field
            }
        }
    };
}

impl_entity!(EndpointEntity, Endpoint, endpoint);
impl_entity!(RequestEntity, Request, request);
impl_entity!(ScheduleEntity, Schedule, schedule);
impl_entity!(StatEntity, Stat, stat);

pub type DbState = StoreState<Db, ()>;

pub struct EntityCache {
    store: Store<Db>,
    refresh_on_reconnect: bool,
    connected: bool,
}

impl EntityCache {
    /// Wrap a store. Loading flags hydrated from a previous session are
    /// cleared, since no fetch from that session can still complete.
    pub fn new(mut store: Store<Db>) -> Self {
        store.update(|db| {
            for collection in Collection::ALL {
                db.response_states.get_mut(collection).loading = false;
            }
        });
        Self {
            store,
            refresh_on_reconnect: true,
            connected: true,
        }
    }

    /// A cache that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Store::new(Db::default()))
    }

    #[must_use]
    pub fn with_refresh_on_reconnect(mut self, refresh: bool) -> Self {
        self.refresh_on_reconnect = refresh;
        self
    }

    pub const fn store(&self) -> &Store<Db> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut Store<Db> {
        &mut self.store
    }

    pub const fn db(&self) -> &Db {
        self.store.value()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&DbState) + 'static) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // -- reads ---------------------------------------------------------------

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::map(self.db()).get(id)
    }

    /// Entities in id order. Soft-deleted ones are skipped unless asked for.
    pub fn list<E: Entity>(&self, include_deleted: bool) -> Vec<&E> {
        E::map(self.db())
            .values()
            .filter(|e| include_deleted || e.deleted().is_none())
            .collect()
    }

    pub const fn response_state(&self, collection: Collection) -> &ResponseState {
        self.db().response_states.get(collection)
    }

    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    // -- list loads ----------------------------------------------------------

    /// Mark a list fetch as started.
    pub fn begin_list(&mut self, collection: Collection) {
        self.store
            .update(|db| db.response_states.get_mut(collection).loading = true);
    }

    /// Merge a list response into the collection. Entries are keyed by their
    /// own id; ids not in the response are left alone. The collection's
    /// loading flag is cleared and its error replaced either way.
    pub fn apply_list<E: Entity>(&mut self, result: Result<EntityMap<E>, ApiError>) {
        let collection = E::COLLECTION;
        let (entries, error) = match result {
            Ok(partial) => (rekey(collection, partial), None),
            Err(error) => {
                warn!(%collection, %error, "list fetch failed");
                (Vec::new(), Some(error))
            }
        };
        let count = entries.len();
        self.store.update(|db| {
            E::map_mut(db).extend(entries);
            let state = db.response_states.get_mut(collection);
            state.loading = false;
            state.error = error;
        });
        debug!(%collection, count, "applied list response");
    }

    /// Untyped form of [`Self::apply_list`] for raw transport responses. A
    /// payload that is not a JSON object is reported as a malformed response
    /// and leaves the map untouched.
    pub fn apply_list_value(&mut self, collection: Collection, result: Result<Value, ApiError>) {
        let entries = match result {
            Ok(Value::Object(entries)) => entries,
            Ok(other) => {
                warn!(%collection, kind = json_kind(&other), "list response is not an object");
                let error = ApiError::malformed(format!(
                    "expected an object of {collection} entities, got {}",
                    json_kind(&other)
                ));
                self.settle_list_error(collection, error);
                return;
            }
            Err(error) => {
                warn!(%collection, %error, "list fetch failed");
                self.settle_list_error(collection, error);
                return;
            }
        };
        match collection {
            Collection::Endpoint => self.apply_list(Ok(decode_entries::<EndpointEntity>(entries))),
            Collection::Request => self.apply_list(Ok(decode_entries::<RequestEntity>(entries))),
            Collection::Schedule => self.apply_list(Ok(decode_entries::<ScheduleEntity>(entries))),
            Collection::Stat => self.apply_list(Ok(decode_entries::<StatEntity>(entries))),
        }
    }

    fn settle_list_error(&mut self, collection: Collection, error: ApiError) {
        self.store.update(|db| {
            let state = db.response_states.get_mut(collection);
            state.loading = false;
            state.error = Some(error);
        });
    }

    // -- single entities -----------------------------------------------------

    /// Replace the entry at the entity's id with the entity as given.
    pub fn apply_entity<E: Entity>(&mut self, entity: E) -> Result<(), CacheError> {
        if entity.id().is_empty() {
            return Err(CacheError::MissingId {
                collection: E::COLLECTION,
            });
        }
        let id = entity.id().to_string();
        debug!(collection = %E::COLLECTION, %id, "applying entity");
        self.store.update(|db| {
            E::map_mut(db).insert(id, entity);
        });
        Ok(())
    }

    /// Untyped form of [`Self::apply_entity`] for raw get/create/update
    /// responses. A missing body or a missing id is a caller error; a body
    /// that does not decode is logged and dropped.
    pub fn apply_entity_value(
        &mut self,
        collection: Collection,
        value: Option<Value>,
    ) -> Result<(), CacheError> {
        let value = value
            .filter(|v| !v.is_null())
            .ok_or(CacheError::MissingValue { collection })?;
        match collection {
            Collection::Endpoint => self.decode_and_apply::<EndpointEntity>(value),
            Collection::Request => self.decode_and_apply::<RequestEntity>(value),
            Collection::Schedule => self.decode_and_apply::<ScheduleEntity>(value),
            Collection::Stat => self.decode_and_apply::<StatEntity>(value),
        }
    }

    fn decode_and_apply<E: Entity>(&mut self, value: Value) -> Result<(), CacheError> {
        match serde_json::from_value::<E>(value) {
            Ok(entity) => self.apply_entity(entity),
            Err(error) => {
                warn!(collection = %E::COLLECTION, %error, "dropping undecodable entity");
                Ok(())
            }
        }
    }

    // -- realtime ------------------------------------------------------------

    /// Apply one push event. `create`, `update` and `soft-delete` replace the
    /// entry at `contents.id`; `clean` empties the collection. Events without
    /// usable contents are logged and dropped.
    pub fn apply_realtime_event(&mut self, event: RealtimeEvent) {
        let RealtimeEvent {
            kind,
            variant,
            contents,
        } = event;

        if !variant.replaces_entity() {
            debug!(collection = %kind, "clearing collection");
            self.store.update(|db| db.clear(kind));
            return;
        }

        let contents = match contents {
            Some(contents @ Value::Object(_)) => contents,
            Some(other) => {
                warn!(collection = %kind, %variant, kind = json_kind(&other), "dropping realtime event with non-object contents");
                return;
            }
            None => {
                warn!(collection = %kind, %variant, "dropping realtime event without contents");
                return;
            }
        };

        if let Err(error) = self.apply_entity_value(kind, Some(contents)) {
            warn!(%variant, %error, "dropping realtime event");
        }
    }

    // -- connection ----------------------------------------------------------

    /// The transport lost its channel. Cached entities stay as they are.
    pub fn handle_disconnect(&mut self) {
        self.connected = false;
        debug!("realtime channel disconnected; keeping cached entities");
    }

    /// The transport reconnected. Returns the collections the caller must
    /// list-fetch to catch up on events missed while disconnected, already
    /// marked as loading.
    pub fn handle_reconnect(&mut self) -> Vec<Collection> {
        self.connected = true;
        if !self.refresh_on_reconnect {
            debug!("realtime channel reconnected; refresh disabled");
            return Vec::new();
        }
        self.store.update(|db| {
            for collection in Collection::ALL {
                db.response_states.get_mut(collection).loading = true;
            }
        });
        debug!("realtime channel reconnected; refetching all collections");
        Collection::ALL.to_vec()
    }

    pub fn tick(&mut self) {
        self.store.tick();
    }

    pub fn flush(&mut self) {
        self.store.flush();
    }
}

/// Key entries by their own id, dropping those without one.
fn rekey<E: Entity>(collection: Collection, partial: EntityMap<E>) -> Vec<(String, E)> {
    partial
        .into_iter()
        .filter_map(|(key, entity)| {
            let id = entity.id();
            if id.is_empty() {
                warn!(%collection, %key, "dropping list entry without id");
                return None;
            }
            if id != key {
                warn!(%collection, %key, %id, "list entry keyed under a foreign id; using its own id");
            }
            Some((id.to_string(), entity))
        })
        .collect()
}

fn decode_entries<E: Entity>(entries: Map<String, Value>) -> EntityMap<E> {
    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<E>(value) {
            Ok(entity) => Some((key, entity)),
            Err(error) => {
                warn!(collection = %E::COLLECTION, %key, %error, "dropping undecodable list entry");
                None
            }
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
