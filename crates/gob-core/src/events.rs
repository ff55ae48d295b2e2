//! Realtime event envelope pushed by the server over the websocket channel.
//!
//! ```text
//! {"kind": "endpoint", "variant": "soft-delete", "contents": {"id": "a", ...}}
//! ```
//!
//! `contents` is kept as an untyped JSON value: the entity cache decides per
//! `kind` which entity type to decode it into, and drops events whose contents
//! are missing or malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{Collection, EventVariant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub kind: Collection,
    pub variant: EventVariant,
    #[serde(default)]
    pub contents: Option<Value>,
}

impl RealtimeEvent {
    #[must_use]
    pub const fn new(kind: Collection, variant: EventVariant, contents: Option<Value>) -> Self {
        Self {
            kind,
            variant,
            contents,
        }
    }

    /// Parse one websocket text frame.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The `id` field of the contents, if the contents are an object with a
    /// non-empty string id.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.contents
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|obj| obj.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_soft_delete_frame() {
        let event = RealtimeEvent::parse(
            r#"{"kind":"endpoint","variant":"soft-delete","contents":{"id":"a","deleted":"2024-01-01"}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, Collection::Endpoint);
        assert_eq!(event.variant, EventVariant::SoftDelete);
        assert_eq!(event.content_id(), Some("a"));
    }

    #[test]
    fn clean_frame_may_omit_contents() {
        let event = RealtimeEvent::parse(r#"{"kind":"stat","variant":"clean"}"#).unwrap();
        assert_eq!(event.contents, None);
        assert_eq!(event.content_id(), None);
    }

    #[test]
    fn content_id_ignores_non_object_and_empty_ids() {
        let scalar = RealtimeEvent::new(Collection::Request, EventVariant::Create, Some(json!(42)));
        assert_eq!(scalar.content_id(), None);

        let empty = RealtimeEvent::new(
            Collection::Request,
            EventVariant::Create,
            Some(json!({"id": ""})),
        );
        assert_eq!(empty.content_id(), None);
    }

    #[test]
    fn unknown_variant_fails_to_parse() {
        assert!(RealtimeEvent::parse(r#"{"kind":"stat","variant":"explode"}"#).is_err());
    }
}
