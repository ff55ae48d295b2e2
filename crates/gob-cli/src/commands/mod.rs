use std::collections::BTreeMap;

use gob_core::entities::{EndpointEntity, RequestEntity, ScheduleEntity, StatEntity};
use gob_core::enums::Collection;
use gob_core::errors::ApiError;
use gob_store::{Entity, EntityCache};
use serde::Serialize;

pub mod dispatch;
pub mod form;
pub mod replay;
pub mod state;
pub mod sync;

/// Entity counts for one collection, as reported by `replay` and `sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub total: usize,
    pub deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

pub fn summarize(
    cache: &EntityCache,
    collections: &[Collection],
) -> BTreeMap<Collection, CollectionSummary> {
    collections
        .iter()
        .map(|&collection| {
            let (total, live) = match collection {
                Collection::Endpoint => counts::<EndpointEntity>(cache),
                Collection::Request => counts::<RequestEntity>(cache),
                Collection::Schedule => counts::<ScheduleEntity>(cache),
                Collection::Stat => counts::<StatEntity>(cache),
            };
            let summary = CollectionSummary {
                total,
                deleted: total - live,
                error: cache.response_state(collection).error.clone(),
            };
            (collection, summary)
        })
        .collect()
}

fn counts<E: Entity>(cache: &EntityCache) -> (usize, usize) {
    (cache.list::<E>(true).len(), cache.list::<E>(false).len())
}
