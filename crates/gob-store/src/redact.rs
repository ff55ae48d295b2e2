//! Secret redaction applied to every value before it reaches durable storage.
//!
//! A [`Redactor`] walks a JSON tree and replaces string leaves whose key
//! matches any [`RedactionRule`] with [`REDACTED`]. When a rule matches a key
//! holding an object or array, every string leaf below it is redacted too, so
//! a whole `secrets` map never lands on disk. Array elements are judged by the
//! key of their array.
//!
//! Redaction is idempotent: a leaf already equal to the sentinel stays as is.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Sentinel written in place of redacted values.
pub const REDACTED: &str = "**REDACTED**";

/// Key fragments redacted by [`Redactor::default`].
const DEFAULT_SECRET_WORDS: [&str; 2] = ["secret", "password"];

/// Whether a string is the redaction sentinel.
#[must_use]
pub fn is_redacted(value: &str) -> bool {
    value == REDACTED
}

type KeyPredicate = dyn Fn(&str, &Value) -> bool;

#[derive(Clone)]
pub enum RedactionRule {
    /// Exact, case-sensitive key name.
    Key(String),
    /// Key name matched by a regex (unanchored).
    Pattern(Regex),
    /// Arbitrary predicate over the key and the value stored under it.
    Predicate(Rc<KeyPredicate>),
}

impl RedactionRule {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    pub fn predicate(f: impl Fn(&str, &Value) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(f))
    }

    fn matches(&self, key: &str, value: &Value) -> bool {
        match self {
            Self::Key(name) => name == key,
            Self::Pattern(re) => re.is_match(key),
            Self::Predicate(f) => f(key, value),
        }
    }
}

impl fmt::Debug for RedactionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.debug_tuple("Key").field(name).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Default for Redactor {
    /// Redacts keys containing `secret` or `password`, case-insensitively.
    fn default() -> Self {
        Self::new(vec![RedactionRule::predicate(|key, _| {
            let key = key.to_lowercase();
            DEFAULT_SECRET_WORDS.iter().any(|word| key.contains(word))
        })])
    }
}

impl Redactor {
    #[must_use]
    pub const fn new(rules: Vec<RedactionRule>) -> Self {
        Self { rules }
    }

    /// A redactor that leaves every value untouched.
    #[must_use]
    pub const fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build pattern rules from regex sources, e.g. from configuration.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| RedactionRule::pattern(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn with_rule(mut self, rule: RedactionRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Return a redacted deep copy of `value`. The input is not modified.
    #[must_use]
    pub fn redact(&self, value: &Value) -> Value {
        let mut copy = value.clone();
        self.redact_in_place(&mut copy, false);
        copy
    }

    /// Serialize `value` and redact it, producing the exact string that may
    /// be written to storage.
    pub fn redact_to_string<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        let mut tree = serde_json::to_value(value)?;
        self.redact_in_place(&mut tree, false);
        serde_json::to_string(&tree)
    }

    fn key_matches(&self, key: &str, value: &Value) -> bool {
        self.rules.iter().any(|rule| rule.matches(key, value))
    }

    fn redact_in_place(&self, value: &mut Value, inherited: bool) {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    let matched = inherited || self.key_matches(key, child);
                    redact_child(self, child, matched);
                }
            }
            Value::Array(items) => {
                for child in items {
                    redact_child(self, child, inherited);
                }
            }
            Value::String(s) if inherited => redact_leaf(s),
            _ => {}
        }
    }
}

fn redact_child(redactor: &Redactor, child: &mut Value, matched: bool) {
    match child {
        Value::String(s) if matched => redact_leaf(s),
        Value::Object(_) | Value::Array(_) => redactor.redact_in_place(child, matched),
        _ => {}
    }
}

fn redact_leaf(s: &mut String) {
    if !is_redacted(s) {
        REDACTED.clone_into(s);
    }
}
