//! The run-configuration form and its validator.
//!
//! [`ConfigForm`] is the editable, everything-nullable mirror of
//! [`RunConfig`], plus a `_` section of UI-only flags. The
//! [`ConfigFormValidator`] derives the `RunConfig` diff payload to submit, or
//! the per-field messages to show.
//!
//! Rule groups, each reporting at most its first failure:
//! 1. counts: concurrency and request count, evaluated as one unit
//! 2. extras: status codes, response data, secrets
//! 3. auth: by kind (bearer, impersonation, dynamic)
//!
//! Redacted values (hydrated from storage) count as present but are never
//! copied into the payload, so the server keeps its stored secret.

use std::collections::BTreeMap;

use gob_core::enums::AuthKind;
use gob_core::run_config::{
    AuthConfig, DynamicAuth, DynamicRequest, ImpersonationCredentials, RunConfig,
};
use serde::{Deserialize, Serialize};

use crate::redact::is_redacted;
use crate::store::{Store, StoreBuilder, StoreState, SubscriptionId};
use crate::validator::{
    FieldError, FieldErrors, RuleResult, Validation, Validator, collect_errors, ensure,
};

/// Storage key of the form draft.
pub const CONFIG_FORM_KEY: &str = "form-config";

/// The only supported impersonation identity provider.
pub const KEYCLOAK: &str = "keycloak";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigForm {
    #[serde(rename = "_")]
    pub ui: FormUi,
    pub concurrency: Option<i64>,
    pub request_count: Option<i64>,
    pub response_data: Option<bool>,
    pub ok_status_codes: Vec<i64>,
    pub secrets: BTreeMap<String, String>,
    pub auth: AuthForm,
}

/// Form-only state that never reaches the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormUi {
    #[serde(rename = "showDecodedJWT")]
    pub show_decoded_jwt: bool,
    #[serde(rename = "decodedToken")]
    pub decoded_token: Vec<(String, Option<String>)>,
    #[serde(rename = "impersonateUserName")]
    pub impersonate_user_name: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthForm {
    pub kind: Option<AuthKind>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub dynamic: DynamicAuthForm,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub endpoint_type: Option<String>,
    pub header_key: Option<String>,
    #[serde(rename = "impersionation_credentials")]
    pub impersonation_credentials: ImpersonationForm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicAuthForm {
    pub requests: Vec<DynamicRequest>,
    #[serde(rename = "headerKey")]
    pub header_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpersonationForm {
    pub user_id_to_impersonate: Option<String>,
    pub user_name_to_impersonate: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConfigForm {
    /// Load a server config into the form, with the UI section reset.
    #[must_use]
    pub fn from_run_config(config: &RunConfig) -> Self {
        let auth = config.auth.clone().unwrap_or_default();
        let dynamic = auth.dynamic.unwrap_or_default();
        let creds = auth.impersonation_credentials.unwrap_or_default();
        Self {
            ui: FormUi::default(),
            concurrency: config.concurrency,
            request_count: config.request_count,
            response_data: config.response_data,
            ok_status_codes: config.ok_status_codes.clone().unwrap_or_default(),
            secrets: config.secrets.clone().unwrap_or_default(),
            auth: AuthForm {
                kind: auth.kind,
                redirect_uri: auth.redirect_uri,
                client_id: auth.client_id,
                client_secret: auth.client_secret,
                dynamic: DynamicAuthForm {
                    requests: dynamic.requests,
                    header_key: dynamic.header_key.or(auth.header_key.clone()).unwrap_or_default(),
                },
                endpoint: auth.endpoint,
                token: auth.token,
                endpoint_type: auth.endpoint_type,
                header_key: auth.header_key,
                impersonation_credentials: ImpersonationForm {
                    user_id_to_impersonate: creds.user_id_to_impersonate,
                    user_name_to_impersonate: creds.user_name_to_impersonate,
                    username: creds.username,
                    password: creds.password,
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigFormValidator;

impl Validator<ConfigForm> for ConfigFormValidator {
    type Payload = RunConfig;

    fn validate(&self, form: &ConfigForm, did_change: bool) -> Validation<RunConfig> {
        if !did_change {
            return Validation::Unchanged;
        }

        let mut payload = RunConfig::default();
        let errors = collect_errors([
            counts(form, &mut payload),
            extras(form, &mut payload),
            auth(form, &mut payload),
        ]);

        if !errors.is_empty() {
            Validation::Invalid(errors)
        } else if payload.is_empty() {
            Validation::Unchanged
        } else {
            Validation::Valid(payload)
        }
    }
}

/// Concurrency and request count depend on each other, so they are checked
/// as a single group.
fn counts(form: &ConfigForm, payload: &mut RunConfig) -> RuleResult {
    let concurrency = form.concurrency.filter(|c| *c != 0);
    let request_count = form.request_count.filter(|r| *r != 0);

    match (concurrency, request_count) {
        (Some(c), rc) => {
            ensure(c > 0, "concurrency", "Concurrency must be positive")?;
            let rc = rc.ok_or_else(|| {
                FieldError::new(
                    "request_count",
                    "If concurrency is set, request-count must also be set",
                )
            })?;
            ensure(rc > 0, "request_count", "Request-count must be positive")?;
            ensure(
                c <= rc,
                "concurrency",
                "Concurrency cannot be higher than request-count",
            )?;
            payload.concurrency = Some(c);
            payload.request_count = Some(rc);
            Ok(())
        }
        (None, Some(rc)) => {
            ensure(rc > 0, "request_count", "Request-count must be positive")?;
            Err(FieldError::new(
                "concurrency",
                "If request-count is set, concurrency must also be set",
            ))
        }
        (None, None) => Ok(()),
    }
}

fn extras(form: &ConfigForm, payload: &mut RunConfig) -> RuleResult {
    ensure(
        form.ok_status_codes.iter().all(|code| (100..=599).contains(code)),
        "ok_status_codes",
        "Status codes must be between 100 and 599",
    )?;

    payload.response_data = form.response_data;
    if !form.ok_status_codes.is_empty() {
        payload.ok_status_codes = Some(form.ok_status_codes.clone());
    }
    let secrets: BTreeMap<String, String> = form
        .secrets
        .iter()
        .filter(|(_, value)| !is_redacted(value))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !secrets.is_empty() {
        payload.secrets = Some(secrets);
    }
    Ok(())
}

fn auth(form: &ConfigForm, payload: &mut RunConfig) -> RuleResult {
    let auth = &form.auth;
    let Some(kind) = auth.kind else {
        return Ok(());
    };

    let mut out = AuthConfig {
        kind: Some(kind),
        ..AuthConfig::default()
    };

    match kind {
        AuthKind::Bearer => {
            ensure(
                present(auth.token.as_ref()),
                "auth.token",
                "Token must be set if type is bearer",
            )?;
            out.token = usable(auth.token.as_ref());
            out.header_key = usable(auth.header_key.as_ref());
        }
        AuthKind::Impersonation => {
            let creds = &auth.impersonation_credentials;
            ensure(
                present(auth.client_id.as_ref()),
                "auth.client_id",
                "client-id is missing",
            )?;
            ensure(
                auth.endpoint_type.as_deref() == Some(KEYCLOAK),
                "auth.endpoint_type",
                "endpoint-type must be one of: \"keycloak\"",
            )?;
            ensure(
                present(auth.redirect_uri.as_ref()),
                "auth.redirect_uri",
                "redirect-uri must be set",
            )?;
            ensure(
                present(creds.username.as_ref()),
                "auth.impersionation_credentials",
                "Impersonation: username missing",
            )?;
            ensure(
                present(creds.user_id_to_impersonate.as_ref())
                    || present(creds.user_name_to_impersonate.as_ref()),
                "auth.impersionation_credentials.userID/userName",
                "Impersonation: No id or username to impersonate is set",
            )?;

            out.client_id = usable(auth.client_id.as_ref());
            out.client_secret = usable(auth.client_secret.as_ref());
            out.endpoint = usable(auth.endpoint.as_ref());
            out.endpoint_type = usable(auth.endpoint_type.as_ref());
            out.redirect_uri = usable(auth.redirect_uri.as_ref());
            out.header_key = usable(auth.header_key.as_ref());
            out.impersonation_credentials = Some(ImpersonationCredentials {
                password: usable(creds.password.as_ref()),
                user_id_to_impersonate: usable(creds.user_id_to_impersonate.as_ref()),
                user_name_to_impersonate: usable(creds.user_name_to_impersonate.as_ref()),
                username: usable(creds.username.as_ref()),
            });
        }
        AuthKind::Dynamic => {
            let dynamic = &auth.dynamic;
            ensure(
                !dynamic.requests.is_empty(),
                "auth.dynamic",
                "For dynamic authentication, at least one request must be appended",
            )?;
            for request in &dynamic.requests {
                ensure(!request.uri.trim().is_empty(), "auth.dynamic", "Uri must be set")?;
                ensure(
                    !request.method.trim().is_empty(),
                    "auth.dynamic",
                    "Method must be set",
                )?;
            }

            out.header_key = Some(dynamic.header_key.clone());
            out.dynamic = Some(DynamicAuth {
                header_key: None,
                requests: dynamic
                    .requests
                    .iter()
                    .map(|r| DynamicRequest {
                        headers: None,
                        ..r.clone()
                    })
                    .collect(),
            });
        }
    }

    payload.auth = Some(out);
    Ok(())
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn usable(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && !is_redacted(v)).cloned()
}

// ---------------------------------------------------------------------------
// Store wrapper
// ---------------------------------------------------------------------------

pub type ConfigFormState = StoreState<ConfigForm, RunConfig>;

/// The configuration-form store. Restoring accepts the server's `RunConfig`.
pub struct ConfigFormStore {
    store: Store<ConfigForm, ConfigFormValidator>,
}

impl ConfigFormStore {
    /// A builder preloaded with the empty form and its validator.
    pub fn builder() -> StoreBuilder<ConfigForm, ConfigFormValidator> {
        Store::builder(ConfigForm::default()).validator(ConfigFormValidator)
    }

    pub const fn new(store: Store<ConfigForm, ConfigFormValidator>) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &Store<ConfigForm, ConfigFormValidator> {
        &self.store
    }

    pub const fn state(&self) -> &ConfigFormState {
        self.store.state()
    }

    pub const fn value(&self) -> &ConfigForm {
        self.store.value()
    }

    pub const fn payload(&self) -> Option<&RunConfig> {
        self.store.state().validation_payload.as_ref()
    }

    pub const fn errors(&self) -> Option<&FieldErrors> {
        self.store.state().validation_errors.as_ref()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&ConfigFormState) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn update(&mut self, f: impl FnOnce(&mut ConfigForm)) {
        self.store.update(f);
    }

    pub fn set(&mut self, form: ConfigForm) {
        self.store.set(form);
    }

    /// With a server config: load it (UI flags reset) as the new baseline.
    /// Without: discard edits back to the current baseline.
    pub fn restore_from(&mut self, config: Option<&RunConfig>) {
        self.store.restore(config.map(ConfigForm::from_run_config));
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn tick(&mut self) {
        self.store.tick();
    }

    pub fn flush(&mut self) {
        self.store.flush();
    }
}
