//! # gob-core
//!
//! Core types shared across the Gobyoall dashboard crates.
//!
//! This crate provides the foundational types the client-side stores work with:
//! - Entity structs for every server resource family (endpoints, requests, schedules, stats)
//! - The run-config payload sent to the server (`RunConfig` and its auth sub-types)
//! - Closed enums for collections, realtime event variants, and auth kinds
//! - The realtime event envelope pushed over the websocket channel
//! - Cross-cutting error types, including the server's `ApiError` body

pub mod entities;
pub mod enums;
pub mod errors;
pub mod events;
pub mod run_config;
