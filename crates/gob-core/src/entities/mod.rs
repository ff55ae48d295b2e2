//! Entity structs for every server resource family.
//!
//! Each entity is one row of a server collection. Timestamps are kept as the
//! RFC 3339 strings the server sends; the dashboard only displays them.
//! `deleted` marks a soft-deleted entity, which stays in its collection.

mod endpoint;
mod request;
mod schedule;
mod stat;

pub use endpoint::EndpointEntity;
pub use request::RequestEntity;
pub use schedule::ScheduleEntity;
pub use stat::{CompactStat, StatEntity};
