//! Closed enumerations for collections, realtime event variants, auth kinds and
//! editor languages.
//!
//! All enums serialize to the exact strings used by the API and the realtime
//! channel, and provide `as_str()` plus `FromStr` for CLI parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// A server resource family. Each one is a normalized map in the entity cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Endpoint,
    Request,
    Schedule,
    Stat,
}

impl Collection {
    pub const ALL: [Self; 4] = [Self::Endpoint, Self::Request, Self::Schedule, Self::Stat];

    /// Return the string used in API paths and realtime `kind` fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Endpoint => "endpoint",
            Self::Request => "request",
            Self::Schedule => "schedule",
            Self::Stat => "stat",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                what: "collection",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// EventVariant
// ---------------------------------------------------------------------------

/// What happened to an entity in a realtime event.
///
/// `SoftDelete` carries the updated entity (with `deleted` set); entities are
/// never removed individually. `Clean` empties the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventVariant {
    Create,
    Update,
    SoftDelete,
    Clean,
}

impl EventVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::SoftDelete => "soft-delete",
            Self::Clean => "clean",
        }
    }

    /// Whether this variant carries a replacement entity.
    #[must_use]
    pub const fn replaces_entity(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::SoftDelete)
    }
}

impl fmt::Display for EventVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuthKind
// ---------------------------------------------------------------------------

/// Authentication strategy of a run config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Bearer,
    Impersonation,
    Dynamic,
}

impl AuthKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::Impersonation => "impersonation",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CodeLanguage
// ---------------------------------------------------------------------------

/// Language the config editor renders in. `Raw` disables conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    #[serde(rename = "")]
    Raw,
    #[default]
    Toml,
    Json,
    Yaml,
}

impl CodeLanguage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "",
            Self::Toml => "toml",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}
