//! Persisted dashboard UI state: active tab, display toggles, dismissed hints
//! and collapsed panels.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gob_core::enums::CodeLanguage;
use serde::{Deserialize, Serialize};

use crate::store::Store;

/// Storage key of the UI state.
pub const UI_STATE_KEY: &str = "state";

/// A dismissed hint: the hint version the user saw, and when.
/// Serialized as a `[version, read_at]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenHint(pub u32, pub DateTime<Utc>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiState {
    pub tab: String,
    pub show_deleted: bool,
    pub server_stats: bool,
    pub editor_raw_format: bool,
    pub code_language: CodeLanguage,
    pub seen_hints: BTreeMap<String, SeenHint>,
    pub collapse: BTreeMap<String, bool>,
}

impl UiState {
    /// Flip a panel's collapsed flag and return the new value.
    pub fn toggle_collapse(&mut self, key: &str) -> bool {
        let collapsed = !self.is_collapsed(key);
        self.collapse.insert(key.to_string(), collapsed);
        collapsed
    }

    #[must_use]
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapse.get(key).copied().unwrap_or(false)
    }

    pub fn mark_hint_seen(&mut self, key: &str, version: u32, at: DateTime<Utc>) {
        self.seen_hints.insert(key.to_string(), SeenHint(version, at));
    }

    /// True if the user dismissed `key` at `version` or a later one. A newer
    /// hint version shows again.
    #[must_use]
    pub fn has_seen_hint(&self, key: &str, version: u32) -> bool {
        self.seen_hints
            .get(key)
            .is_some_and(|SeenHint(seen, _)| *seen >= version)
    }
}

pub type UiStateStore = Store<UiState>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_collapse_flips_and_reports() {
        let mut state = UiState::default();
        assert!(!state.is_collapsed("stats"));
        assert!(state.toggle_collapse("stats"));
        assert!(state.is_collapsed("stats"));
        assert!(!state.toggle_collapse("stats"));
    }

    #[test]
    fn newer_hint_version_is_unseen() {
        let mut state = UiState::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        state.mark_hint_seen("schedule-intro", 1, at);
        assert!(state.has_seen_hint("schedule-intro", 1));
        assert!(!state.has_seen_hint("schedule-intro", 2));
        assert!(!state.has_seen_hint("other", 1));
    }

    #[test]
    fn serializes_with_camel_case_and_hint_pairs() {
        let mut state = UiState {
            tab: "endpoints".into(),
            code_language: CodeLanguage::Json,
            ..Default::default()
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        state.mark_hint_seen("intro", 3, at);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["showDeleted"], false);
        assert_eq!(json["codeLanguage"], "json");
        assert_eq!(json["seenHints"]["intro"][0], 3);
        assert_eq!(json["seenHints"]["intro"][1], "2024-03-01T12:00:00Z");

        let back: UiState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state: UiState = serde_json::from_str(r#"{"tab":"stats"}"#).unwrap();
        assert_eq!(state.tab, "stats");
        assert_eq!(state.code_language, CodeLanguage::Toml);
        assert!(state.collapse.is_empty());
    }
}
