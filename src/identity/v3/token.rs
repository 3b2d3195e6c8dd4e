use super::{keystone_body, Scope};
use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

/// Re-scope or renew with an existing token.
#[derive(Clone)]
pub struct Token {
    auth_url: String,
    token: SecretString,
    scope: Scope,
}

impl Token {
    pub const PARAMETERS: &'static [&'static str] = &[
        "auth_url",
        "token",
        "system_scope",
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
        "trust_id",
    ];

    const METHOD: &'static str = "token";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] =
        &[("token", |t| Some(t.token.expose_secret()))];

    /// # Errors
    /// Returns an error if `auth_url` or `token` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            token: params.require_secret("token")?,
            scope: Scope::from_params(params)?,
        })
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl AuthPlugin for Token {
    fn kind(&self) -> PluginKind {
        PluginKind::Token
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        AuthPayload {
            method: Self::METHOD,
            body: keystone_body(
                Self::METHOD,
                json!({ "id": self.token.expose_secret() }),
                &self.scope,
            ),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("auth_url", &self.auth_url)
            .field("token", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}
