//! Error types for gob-store.
//!
//! Most runtime failures inside the stores are logged and recovered (see the
//! store and entity cache docs). The errors here are the ones callers must
//! see: storage backends failing, invalid store setup, and caller contract
//! violations on the entity cache.

use std::path::PathBuf;

use gob_core::enums::Collection;
use thiserror::Error;

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Keys become file names, so they are restricted to `[A-Za-z0-9_-]`.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Errors from building stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid redaction pattern: {0}")]
    InvalidRedactionPattern(#[from] regex::Error),
}

/// Caller contract violations on the entity cache. These indicate a bug in
/// the caller, not a runtime condition, and are never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("{collection} entity is missing its id")]
    MissingId { collection: Collection },

    #[error("{collection} response carried no entity")]
    MissingValue { collection: Collection },
}
