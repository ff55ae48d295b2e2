//! Pluggable validation contract for stores.
//!
//! A validator is a total function over a store's value. It yields exactly one
//! of: a payload ready to submit, per-field error messages, or "nothing to
//! submit". The store keeps the payload and the errors mutually exclusive.
//!
//! Rules are grouped. Inside a group they run in a fixed order and the first
//! failing rule is the group's only error, which maps naturally onto a
//! function returning [`RuleResult`] with early `?` returns. Cross-field rules
//! belong in one group so they never report contradictory paired errors.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Error messages keyed by dotted field path (e.g. `auth.token`).
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one rule group.
pub type RuleResult = Result<(), FieldError>;

/// Fail a group unless `ok` holds.
pub fn ensure(ok: bool, path: &str, message: &str) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(FieldError::new(path, message))
    }
}

/// Collect the first error of each group.
pub fn collect_errors(groups: impl IntoIterator<Item = RuleResult>) -> FieldErrors {
    groups
        .into_iter()
        .filter_map(Result::err)
        .map(|e| (e.path, e.message))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation<P> {
    /// Derivable and ready to submit.
    Valid(P),
    /// The UI must display these.
    Invalid(FieldErrors),
    /// No actionable change.
    Unchanged,
}

impl<P> Validation<P> {
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(path.into(), message.into());
        Self::Invalid(errors)
    }

    /// Split into the store's `(validation_payload, validation_errors)` pair.
    pub fn into_parts(self) -> (Option<P>, Option<FieldErrors>) {
        match self {
            Self::Valid(payload) => (Some(payload), None),
            Self::Invalid(errors) => (None, Some(errors)),
            Self::Unchanged => (None, None),
        }
    }
}

pub trait Validator<T> {
    type Payload: Clone + PartialEq + fmt::Debug;

    /// Must not panic for any value of `T`; the store does not catch panics.
    fn validate(&self, value: &T, did_change: bool) -> Validation<Self::Payload>;
}

/// The default validator: never produces a payload or errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl<T> Validator<T> for NoValidation {
    type Payload = ();

    fn validate(&self, _value: &T, _did_change: bool) -> Validation<()> {
        Validation::Unchanged
    }
}

/// Adapts a plain function or closure into a [`Validator`].
pub struct FnValidator<F, P> {
    f: F,
    _payload: PhantomData<fn() -> P>,
}

impl<F, P> FnValidator<F, P> {
    pub const fn new(f: F) -> Self {
        Self {
            f,
            _payload: PhantomData,
        }
    }
}

impl<T, F, P> Validator<T> for FnValidator<F, P>
where
    F: Fn(&T, bool) -> Validation<P>,
    P: Clone + PartialEq + fmt::Debug,
{
    type Payload = P;

    fn validate(&self, value: &T, did_change: bool) -> Validation<P> {
        (self.f)(value, did_change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_then_parity(n: i64) -> RuleResult {
        ensure(n >= 0, "n", "must be positive")?;
        ensure(n % 2 == 0, "n", "must be even")?;
        Ok(())
    }

    #[test]
    fn first_failing_rule_in_group_wins() {
        let errors = collect_errors([range_then_parity(-3)]);
        assert_eq!(errors["n"], "must be positive");

        let errors = collect_errors([range_then_parity(3)]);
        assert_eq!(errors["n"], "must be even");
    }

    #[test]
    fn groups_report_independently() {
        let errors = collect_errors([
            range_then_parity(1),
            Err(FieldError::new("m", "missing")),
            Ok(()),
        ]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["m"], "missing");
    }

    #[test]
    fn into_parts_is_mutually_exclusive() {
        assert_eq!(Validation::Valid(1).into_parts(), (Some(1), None));
        let (payload, errors) = Validation::<i32>::invalid("x", "bad").into_parts();
        assert!(payload.is_none());
        assert_eq!(errors.unwrap()["x"], "bad");
        assert_eq!(Validation::<i32>::Unchanged.into_parts(), (None, None));
    }

    #[test]
    fn fn_validator_forwards_did_change() {
        let v = FnValidator::new(|n: &i64, changed: bool| {
            if changed {
                Validation::Valid(*n)
            } else {
                Validation::Unchanged
            }
        });
        assert_eq!(v.validate(&4, true), Validation::Valid(4));
        assert_eq!(v.validate(&4, false), Validation::Unchanged);
    }
}
