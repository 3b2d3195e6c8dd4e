use super::{keystone_body, Scope, UserIdentity};
use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

/// Username/password authentication against `/auth/tokens`.
#[derive(Clone)]
pub struct Password {
    auth_url: String,
    user: UserIdentity,
    password: Option<SecretString>,
    scope: Scope,
}

impl Password {
    pub const PARAMETERS: &'static [&'static str] = &[
        "auth_url",
        "user_id",
        "username",
        "user_domain_id",
        "user_domain_name",
        "password",
        "system_scope",
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
        "trust_id",
    ];

    const METHOD: &'static str = "password";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = &[
        ("user_id", |p| p.user.user_id.as_deref()),
        ("username", |p| p.user.username.as_deref()),
        ("user_domain_id", |p| p.user.user_domain_id.as_deref()),
        ("user_domain_name", |p| p.user.user_domain_name.as_deref()),
        ("password", |p| p.password.as_ref().map(|s| s.expose_secret())),
    ];

    /// # Errors
    /// Returns an error if `auth_url` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            user: UserIdentity::from_params(params)?,
            password: params.secret("password")?,
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

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl AuthPlugin for Password {
    fn kind(&self) -> PluginKind {
        PluginKind::Password
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        let mut user = self.user.to_json();
        if let Some(password) = &self.password {
            user.insert(
                "password".into(),
                Value::from(password.expose_secret()),
            );
        }
        AuthPayload {
            method: Self::METHOD,
            body: keystone_body(Self::METHOD, serde_json::json!({ "user": user }), &self.scope),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("auth_url", &self.auth_url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}
