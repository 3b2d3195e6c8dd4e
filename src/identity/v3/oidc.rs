//! OpenID Connect federation plugins.
//!
//! The grant flows describe the request sent to the identity provider's token
//! endpoint; the access token they obtain is then exchanged at
//! [`OidcBase::federated_token_url`]. Discovery and the exchange itself are the
//! transport layer's business.

use super::Scope;
use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};

/// `<auth_url>/OS-FEDERATION/identity_providers/<idp>/protocols/<protocol>/auth`
fn federated_token_url(auth_url: &str, identity_provider: &str, protocol: &str) -> String {
    format!(
        "{}/OS-FEDERATION/identity_providers/{identity_provider}/protocols/{protocol}/auth",
        auth_url.trim_end_matches('/')
    )
}

/// Options shared by every OpenID Connect grant flow.
#[derive(Clone)]
pub struct OidcBase {
    pub auth_url: String,
    pub identity_provider: String,
    pub protocol: String,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub scope: String,
    pub access_token_endpoint: Option<String>,
    pub discovery_endpoint: Option<String>,
    pub access_token_type: Option<String>,
    pub project_scope: Scope,
}

impl OidcBase {
    fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            identity_provider: params.require_text("identity_provider")?,
            protocol: params.require_text("protocol")?,
            client_id: params.text("client_id")?,
            client_secret: params.secret("client_secret")?,
            scope: params.require_text("scope")?,
            access_token_endpoint: params.text("access_token_endpoint")?,
            discovery_endpoint: params.text("discovery_endpoint")?,
            access_token_type: params.text("access_token_type")?,
            project_scope: Scope::from_params(params)?,
        })
    }

    #[must_use]
    pub fn federated_token_url(&self) -> String {
        federated_token_url(&self.auth_url, &self.identity_provider, &self.protocol)
    }

    /// Which token from the provider's response is traded in, `access_token`
    /// unless `access-token-type` says otherwise.
    #[must_use]
    pub fn token_type(&self) -> &str {
        self.access_token_type.as_deref().unwrap_or("access_token")
    }

    /// Keystone side of the flow: where the provider's token is exchanged and
    /// which scope the resulting token is requested for.
    #[must_use]
    pub fn exchange(&self) -> Value {
        let mut exchange = Map::new();
        exchange.insert("url".into(), json!(self.federated_token_url()));
        exchange.insert("token_type".into(), json!(self.token_type()));
        if let Some(scope) = self.project_scope.to_json() {
            exchange.insert("scope".into(), scope);
        }
        Value::Object(exchange)
    }

    fn grant(&self, grant_type: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("grant_type".into(), json!(grant_type));
        body.insert("scope".into(), json!(self.scope));
        body
    }

    /// `{"grant": <token endpoint request>, "exchange": <keystone request>}`
    fn payload(&self, grant: Map<String, Value>) -> Value {
        json!({ "grant": grant, "exchange": self.exchange() })
    }
}

impl std::fmt::Debug for OidcBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcBase")
            .field("auth_url", &self.auth_url)
            .field("identity_provider", &self.identity_provider)
            .field("protocol", &self.protocol)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scope", &self.scope)
            .field("access_token_endpoint", &self.access_token_endpoint)
            .field("discovery_endpoint", &self.discovery_endpoint)
            .field("access_token_type", &self.access_token_type)
            .field("project_scope", &self.project_scope)
            .finish()
    }
}

macro_rules! oidc_base_cache_id {
    ($($extra:tt)*) => {
        &[
            ("identity_provider", |p| Some(p.base.identity_provider.as_str())),
            ("protocol", |p| Some(p.base.protocol.as_str())),
            ("client_id", |p| p.base.client_id.as_deref()),
            ("client_secret", |p| p.base.client_secret.as_ref().map(|s| s.expose_secret())),
            ("access_token_endpoint", |p| p.base.access_token_endpoint.as_deref()),
            ("discovery_endpoint", |p| p.base.discovery_endpoint.as_deref()),
            ("scope", |p| Some(p.base.scope.as_str())),
            $($extra)*
        ]
    };
}

macro_rules! oidc_parameters {
    ($($extra:literal),* $(,)?) => {
        &[
            "auth_url",
            "system_scope",
            "domain_id",
            "domain_name",
            "project_id",
            "project_name",
            "project_domain_id",
            "project_domain_name",
            "trust_id",
            "identity_provider",
            "protocol",
            "client_id",
            "client_secret",
            "scope",
            "access_token_endpoint",
            "discovery_endpoint",
            "access_token_type",
            $($extra),*
        ]
    };
}

/// Client credentials grant.
#[derive(Debug, Clone)]
pub struct OidcClientCredentials {
    base: OidcBase,
}

impl OidcClientCredentials {
    pub const PARAMETERS: &'static [&'static str] = oidc_parameters!();

    const METHOD: &'static str = "oidc_client_credentials";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = oidc_base_cache_id!();

    /// # Errors
    /// Returns an error if a federation parameter is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            base: OidcBase::from_params(params)?,
        })
    }

    #[must_use]
    pub fn base(&self) -> &OidcBase {
        &self.base
    }
}

impl AuthPlugin for OidcClientCredentials {
    fn kind(&self) -> PluginKind {
        PluginKind::OidcClientCredentials
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        AuthPayload {
            method: Self::METHOD,
            body: self.base.payload(self.base.grant("client_credentials")),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

/// Resource owner password grant.
#[derive(Clone)]
pub struct OidcPassword {
    base: OidcBase,
    username: String,
    password: SecretString,
}

impl OidcPassword {
    pub const PARAMETERS: &'static [&'static str] = oidc_parameters!("username", "password");

    const METHOD: &'static str = "oidc_password";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = oidc_base_cache_id!(
        ("username", |p| Some(p.username.as_str())),
        ("password", |p| Some(p.password.expose_secret())),
    );

    /// # Errors
    /// Returns an error if a federation parameter, `username` or `password` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            base: OidcBase::from_params(params)?,
            username: params.require_text("username")?,
            password: params.require_secret("password")?,
        })
    }

    #[must_use]
    pub fn base(&self) -> &OidcBase {
        &self.base
    }
}

impl AuthPlugin for OidcPassword {
    fn kind(&self) -> PluginKind {
        PluginKind::OidcPassword
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        let mut body = self.base.grant("password");
        body.insert("username".into(), json!(self.username));
        body.insert("password".into(), json!(self.password.expose_secret()));
        AuthPayload {
            method: Self::METHOD,
            body: self.base.payload(body),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for OidcPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcPassword")
            .field("base", &self.base)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Authorization code grant.
#[derive(Clone)]
pub struct OidcAuthorizationCode {
    base: OidcBase,
    redirect_uri: Option<String>,
    code: SecretString,
}

impl OidcAuthorizationCode {
    pub const PARAMETERS: &'static [&'static str] = oidc_parameters!("redirect_uri", "code");

    const METHOD: &'static str = "oidc_authorization_code";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = oidc_base_cache_id!(
        ("redirect_uri", |p| p.redirect_uri.as_deref()),
        ("code", |p| Some(p.code.expose_secret())),
    );

    /// # Errors
    /// Returns an error if a federation parameter or `code` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            base: OidcBase::from_params(params)?,
            redirect_uri: params.text("redirect_uri")?,
            code: params.require_secret("code")?,
        })
    }

    #[must_use]
    pub fn base(&self) -> &OidcBase {
        &self.base
    }
}

impl AuthPlugin for OidcAuthorizationCode {
    fn kind(&self) -> PluginKind {
        PluginKind::OidcAuthorizationCode
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        let mut body = self.base.grant("authorization_code");
        if let Some(redirect_uri) = &self.redirect_uri {
            body.insert("redirect_uri".into(), json!(redirect_uri));
        }
        body.insert("code".into(), json!(self.code.expose_secret()));
        AuthPayload {
            method: Self::METHOD,
            body: self.base.payload(body),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for OidcAuthorizationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcAuthorizationCode")
            .field("base", &self.base)
            .field("redirect_uri", &self.redirect_uri)
            .field("code", &"***")
            .finish()
    }
}

/// An access token already obtained from the identity provider.
#[derive(Clone)]
pub struct OidcAccessToken {
    auth_url: String,
    identity_provider: String,
    protocol: String,
    access_token: SecretString,
    scope: Scope,
}

impl OidcAccessToken {
    pub const PARAMETERS: &'static [&'static str] = &[
        "auth_url",
        "system_scope",
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
        "trust_id",
        "identity_provider",
        "protocol",
        "access_token",
    ];

    const METHOD: &'static str = "oidc_access_token";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = &[
        ("identity_provider", |p| Some(p.identity_provider.as_str())),
        ("protocol", |p| Some(p.protocol.as_str())),
        ("access_token", |p| Some(p.access_token.expose_secret())),
    ];

    /// # Errors
    /// Returns an error if a federation parameter or `access_token` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            identity_provider: params.require_text("identity_provider")?,
            protocol: params.require_text("protocol")?,
            access_token: params.require_secret("access_token")?,
            scope: Scope::from_params(params)?,
        })
    }

    #[must_use]
    pub fn federated_token_url(&self) -> String {
        federated_token_url(&self.auth_url, &self.identity_provider, &self.protocol)
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl AuthPlugin for OidcAccessToken {
    fn kind(&self) -> PluginKind {
        PluginKind::OidcAccessToken
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        AuthPayload {
            method: Self::METHOD,
            body: json!({
                "url": self.federated_token_url(),
                "headers": {
                    "Authorization": format!("Bearer {}", self.access_token.expose_secret()),
                },
            }),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for OidcAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcAccessToken")
            .field("auth_url", &self.auth_url)
            .field("identity_provider", &self.identity_provider)
            .field("protocol", &self.protocol)
            .field("access_token", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}
