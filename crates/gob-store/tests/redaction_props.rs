//! Redaction properties over generated JSON trees
//!
//! - redacting twice equals redacting once
//! - no string under a matching key survives in plaintext

use gob_store::redact::is_redacted;
use gob_store::{REDACTED, RedactionRule, Redactor};
use proptest::prelude::*;
use serde_json::{Map, Value};

const KEYS: [&str; 6] = ["name", "url", "password", "client_secret", "token", "nested"];

fn key() -> impl Strategy<Value = String> {
    prop::sample::select(KEYS.to_vec()).prop_map(str::to_string)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z0-9]{0,8}".prop_map(Value::String),
        Just(Value::String(REDACTED.to_string())),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn redactor() -> Redactor {
    Redactor::default().with_rule(RedactionRule::Key("token".into()))
}

fn key_is_sensitive(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    lower.contains("secret") || lower.contains("password") || key == "token"
}

/// Walk input and output together; every string leaf under a sensitive key
/// (at any depth) must be the sentinel in the output.
fn assert_no_plaintext(input: &Value, output: &Value, sensitive: bool) {
    match (input, output) {
        (Value::Object(a), Value::Object(b)) => {
            for (k, v) in a {
                assert_no_plaintext(v, &b[k], sensitive || key_is_sensitive(k));
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                assert_no_plaintext(x, y, sensitive);
            }
        }
        (Value::String(_), Value::String(out)) if sensitive => {
            assert!(is_redacted(out), "plaintext leaked: {out}");
        }
        (a, b) => assert_eq!(a, b, "non-sensitive leaf changed"),
    }
}

proptest! {
    #[test]
    fn redaction_is_idempotent(input in tree()) {
        let r = redactor();
        let once = r.redact(&input);
        prop_assert_eq!(r.redact(&once), once);
    }

    #[test]
    fn sensitive_strings_never_survive(input in tree()) {
        let output = redactor().redact(&input);
        assert_no_plaintext(&input, &output, false);
    }

    #[test]
    fn redaction_preserves_shape(input in tree()) {
        let output = Redactor::none().redact(&input);
        prop_assert_eq!(output, input);
    }
}
