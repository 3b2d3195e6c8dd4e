//! The set of named auth plugin loaders.

use crate::identity::PluginKind;
use crate::loading::{
    error::{LoadError, SchemaError},
    loader::{Level, Loaded, Loader},
    opts::Opt,
    resolve::RawOptions,
    rules,
};
use std::sync::OnceLock;

static REGISTRY: OnceLock<Result<Registry, SchemaError>> = OnceLock::new();

/// Shared registry, built on first use.
///
/// # Errors
/// Returns the `SchemaError` raised while composing the built-in loaders.
pub fn registry() -> Result<&'static Registry, SchemaError> {
    REGISTRY
        .get_or_init(Registry::build)
        .as_ref()
        .map_err(Clone::clone)
}

/// Run the named loader over `raw`.
///
/// # Errors
/// Returns `UnknownPlugin` for an unregistered name, otherwise whatever the
/// loader reports.
pub fn load(name: &str, raw: &RawOptions) -> Result<Loaded, LoadError> {
    registry()?.load(name, raw)
}

#[derive(Debug, Clone)]
pub struct Registry {
    loaders: Vec<Loader>,
}

impl Registry {
    /// Compose every built-in loader.
    ///
    /// # Errors
    /// Returns a `SchemaError` if any loader's levels collide.
    pub fn build() -> Result<Self, SchemaError> {
        let loaders = vec![
            Loader::new(
                "v3password",
                "Authenticate with a username and password",
                PluginKind::Password,
                vec![base(), identity(), v3(), password()],
            )?,
            Loader::new(
                "v3token",
                "Authenticate with an existing token",
                PluginKind::Token,
                vec![base(), identity(), v3(), token()],
            )?,
            Loader::new(
                "v3totp",
                "Authenticate with a TOTP passcode",
                PluginKind::Totp,
                vec![base(), identity(), v3(), totp()],
            )?,
            Loader::new(
                "v3oidcclientcredentials",
                "OpenID Connect client credentials grant",
                PluginKind::OidcClientCredentials,
                vec![base(), identity(), v3(), federation(), oidc()],
            )?,
            Loader::new(
                "v3oidcpassword",
                "OpenID Connect resource owner password grant",
                PluginKind::OidcPassword,
                vec![base(), identity(), v3(), federation(), oidc(), oidc_password()],
            )?,
            Loader::new(
                "v3oidcauthcode",
                "OpenID Connect authorization code grant",
                PluginKind::OidcAuthorizationCode,
                vec![base(), identity(), v3(), federation(), oidc(), oidc_authcode()],
            )?,
            Loader::new(
                "v3oidcaccesstoken",
                "Authenticate with an OpenID Connect access token",
                PluginKind::OidcAccessToken,
                vec![base(), identity(), v3(), federation(), oidc_access_token()],
            )?,
            Loader::new(
                "v3tokenlessauth",
                "Tokenless auth using an X.509 client certificate",
                PluginKind::TokenlessAuth,
                vec![base(), identity(), tokenless()],
            )?,
            Loader::new(
                "v3refreshtoken",
                "OAuth 2.0 refresh token exchange",
                PluginKind::RefreshToken,
                vec![base(), identity(), v3(), refresh_token()],
            )?,
        ];
        Ok(Self { loaders })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Loader> {
        self.loaders.iter().find(|loader| loader.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaders.iter().map(Loader::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loader> {
        self.loaders.iter()
    }

    /// # Errors
    /// Returns `UnknownPlugin` for an unregistered name, otherwise whatever the
    /// loader reports.
    pub fn load(&self, name: &str, raw: &RawOptions) -> Result<Loaded, LoadError> {
        self.get(name)
            .ok_or_else(|| LoadError::UnknownPlugin(name.to_string()))?
            .load(raw)
    }
}

fn base() -> Level {
    Level::new("base")
        .rule(rules::REQUIRED_OPTIONS)
        .rule(rules::TEXT_VALUES)
}

fn identity() -> Level {
    Level::new("identity").options(vec![Opt::new("auth-url")
        .required(true)
        .help("Authentication URL")])
}

fn v3() -> Level {
    Level::new("v3")
        .options(vec![
            Opt::new("system-scope").help("Scope for system operations"),
            Opt::new("domain-id").help("Domain ID to scope to"),
            Opt::new("domain-name").help("Domain name to scope to"),
            Opt::new("project-id")
                .help("Project ID to scope to")
                .deprecated("tenant-id"),
            Opt::new("project-name")
                .help("Project name to scope to")
                .deprecated("tenant-name"),
            Opt::new("project-domain-id").help("Domain ID containing project"),
            Opt::new("project-domain-name").help("Domain name containing project"),
            Opt::new("trust-id").help("ID of the trust to use as a trustee use"),
        ])
        .rule(rules::V3_PROJECT_SCOPE)
}

fn common_identity_options() -> Vec<Opt> {
    vec![
        Opt::new("user-id").help("User ID"),
        Opt::new("username").help("Username").deprecated("user-name"),
        Opt::new("user-domain-id").help("User's domain id"),
        Opt::new("user-domain-name").help("User's domain name"),
    ]
}

fn password() -> Level {
    let mut options = common_identity_options();
    options.push(Opt::new("password").secret(true).help("User's password"));
    Level::new("password")
        .options(options)
        .rule(rules::COMMON_IDENTITY)
}

fn token() -> Level {
    Level::new("token").options(vec![Opt::new("token")
        .secret(true)
        .required(true)
        .help("Token to authenticate with")])
}

fn totp() -> Level {
    let mut options = common_identity_options();
    options.push(Opt::new("passcode").secret(true).help("User's TOTP passcode"));
    Level::new("totp")
        .options(options)
        .rule(rules::COMMON_IDENTITY)
}

fn federation() -> Level {
    Level::new("federation").options(vec![
        Opt::new("identity-provider")
            .required(true)
            .help("Identity Provider's name"),
        Opt::new("protocol")
            .required(true)
            .help("Protocol for federated plugin"),
    ])
}

fn oidc() -> Level {
    Level::new("oidc")
        .options(vec![
            Opt::new("client-id").help("OAuth 2.0 Client ID"),
            Opt::new("client-secret")
                .secret(true)
                .help("OAuth 2.0 Client Secret"),
            Opt::new("openid-scope")
                .dest("scope")
                .default_value("openid profile")
                .help(
                    "OpenID Connect scope that is requested from authorization server. \
                     Note that the OpenID Connect specification states that \"openid\" \
                     must be always specified.",
                ),
            Opt::new("access-token-endpoint").help(
                "OpenID Connect Provider Token Endpoint. Note that if a discovery \
                 document is being passed this option will override the endpoint \
                 provided by the server in the discovery document.",
            ),
            Opt::new("discovery-endpoint").help(
                "OpenID Connect Discovery Document URL. The discovery document will \
                 be used to obtain the values of the access token endpoint and the \
                 authentication endpoint. This URL should look like \
                 https://idp.example.org/.well-known/openid-configuration",
            ),
            Opt::new("access-token-type").help(
                "OAuth 2.0 Authorization Server Introspection token type, it is used \
                 to decide which type of token will be used when processing token \
                 introspection. Valid values are: \"access_token\" or \"id_token\"",
            ),
        ])
        .rule(rules::OIDC_ENDPOINT)
}

fn oidc_password() -> Level {
    Level::new("oidc-password").options(vec![
        Opt::new("username").required(true).help("Username"),
        Opt::new("password")
            .secret(true)
            .required(true)
            .help("Password"),
    ])
}

fn oidc_authcode() -> Level {
    Level::new("oidc-authcode").options(vec![
        Opt::new("redirect-uri").help("OpenID Connect Redirect URL"),
        Opt::new("code")
            .secret(true)
            .required(true)
            .deprecated("authorization-code")
            .help("OAuth 2.0 Authorization Code"),
    ])
}

fn oidc_access_token() -> Level {
    Level::new("oidc-access-token").options(vec![Opt::new("access-token")
        .secret(true)
        .required(true)
        .help("OAuth 2.0 Access Token")])
}

fn tokenless() -> Level {
    Level::new("tokenless")
        .options(vec![
            Opt::new("domain-id").help("Domain ID to scope to"),
            Opt::new("domain-name").help("Domain name to scope to"),
            Opt::new("project-id").help("Project ID to scope to"),
            Opt::new("project-name").help("Project name to scope to"),
            Opt::new("project-domain-id").help("Domain ID containing project"),
            Opt::new("project-domain-name").help("Domain name containing project"),
        ])
        .rule(rules::TOKENLESS_SCOPE)
}

fn refresh_token() -> Level {
    Level::new("refresh-token")
        .options(vec![
            // the exchange happens at the token endpoint, not at auth-url
            Opt::new("auth-url").help("Authentication URL"),
            Opt::new("client-id").help("Client's ID"),
            Opt::new("client-secret")
                .secret(true)
                .help("Client's Secret"),
            Opt::new("refresh-token")
                .secret(true)
                .help("User's refresh token"),
        ])
        .rule(rules::REFRESH_TOKEN)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_builds() {
        let registry = registry().unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![
                "v3password",
                "v3token",
                "v3totp",
                "v3oidcclientcredentials",
                "v3oidcpassword",
                "v3oidcauthcode",
                "v3oidcaccesstoken",
                "v3tokenlessauth",
                "v3refreshtoken",
            ]
        );
    }

    #[test]
    fn every_schema_has_unique_dests() {
        for loader in registry().unwrap().iter() {
            let dests = loader.schema().dests();
            let unique: HashSet<&str> = dests.iter().copied().collect();
            assert_eq!(unique.len(), dests.len(), "{}", loader.name());
        }
    }

    #[test]
    fn every_kind_has_a_loader() {
        let registry = registry().unwrap();
        for kind in PluginKind::ALL {
            assert!(registry.iter().any(|loader| loader.kind() == kind), "{kind:?}");
        }
    }

    #[test]
    fn declared_parameters_exist_in_schema() {
        for loader in registry().unwrap().iter() {
            for param in loader.kind().parameters() {
                assert!(
                    loader.schema().get(param).is_some(),
                    "{} declares {param} but its schema has no such option",
                    loader.name()
                );
            }
        }
    }

    #[test]
    fn refresh_token_overrides_auth_url_in_place() {
        let registry = registry().unwrap();
        let loader = registry.get("v3refreshtoken").unwrap();
        let schema = loader.schema();
        assert_eq!(schema.dests()[0], "auth_url");
        assert!(!schema.get("auth_url").unwrap().is_required());
        assert!(registry
            .get("v3password")
            .unwrap()
            .schema()
            .get("auth_url")
            .unwrap()
            .is_required());
    }

    #[test]
    fn oidc_scope_has_default() {
        let registry = registry().unwrap();
        let scope = registry
            .get("v3oidcpassword")
            .unwrap()
            .schema()
            .get("scope")
            .unwrap();
        assert_eq!(scope.get_name(), "openid-scope");
        assert_eq!(scope.get_default().and_then(|v| v.as_str()), Some("openid profile"));
    }

    #[test]
    fn unknown_plugin() {
        let err = load("v2password", &RawOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "unknown auth plugin: v2password");
    }
}
