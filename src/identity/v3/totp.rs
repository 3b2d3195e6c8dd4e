use super::{keystone_body, Scope, UserIdentity};
use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

/// Time-based one-time passcode authentication.
#[derive(Clone)]
pub struct Totp {
    auth_url: String,
    user: UserIdentity,
    passcode: Option<SecretString>,
    scope: Scope,
}

impl Totp {
    pub const PARAMETERS: &'static [&'static str] = &[
        "auth_url",
        "user_id",
        "username",
        "user_domain_id",
        "user_domain_name",
        "passcode",
        "system_scope",
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
        "trust_id",
    ];

    const METHOD: &'static str = "totp";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = &[
        ("user_id", |t| t.user.user_id.as_deref()),
        ("username", |t| t.user.username.as_deref()),
        ("user_domain_id", |t| t.user.user_domain_id.as_deref()),
        ("user_domain_name", |t| t.user.user_domain_name.as_deref()),
        ("passcode", |t| t.passcode.as_ref().map(|s| s.expose_secret())),
    ];

    /// # Errors
    /// Returns an error if `auth_url` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            user: UserIdentity::from_params(params)?,
            passcode: params.secret("passcode")?,
            scope: Scope::from_params(params)?,
        })
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    #[must_use]
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }
}

impl AuthPlugin for Totp {
    fn kind(&self) -> PluginKind {
        PluginKind::Totp
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        let mut user = self.user.to_json();
        if let Some(passcode) = &self.passcode {
            user.insert("passcode".into(), Value::from(passcode.expose_secret()));
        }
        AuthPayload {
            method: Self::METHOD,
            body: keystone_body(Self::METHOD, json!({ "user": user }), &self.scope),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for Totp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Totp")
            .field("auth_url", &self.auth_url)
            .field("user", &self.user)
            .field("passcode", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}
