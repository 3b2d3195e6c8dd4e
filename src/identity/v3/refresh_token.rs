use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

/// OAuth 2.0 refresh-token exchange.
#[derive(Clone)]
pub struct RefreshToken {
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
}

impl RefreshToken {
    pub const PARAMETERS: &'static [&'static str] = &["client_id", "client_secret", "refresh_token"];

    const METHOD: &'static str = "refresh_token";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = &[
        ("client_id", |r| Some(r.client_id.as_str())),
        ("client_secret", |r| Some(r.client_secret.expose_secret())),
        ("refresh_token", |r| Some(r.refresh_token.expose_secret())),
    ];

    /// # Errors
    /// Returns an error if any of the three parameters is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            client_id: params.require_text("client_id")?,
            client_secret: params.require_secret("client_secret")?,
            refresh_token: params.require_secret("refresh_token")?,
        })
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl AuthPlugin for RefreshToken {
    fn kind(&self) -> PluginKind {
        PluginKind::RefreshToken
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        AuthPayload {
            method: Self::METHOD,
            body: json!({
                "grant_type": "refresh_token",
                "client_id": self.client_id,
                "client_secret": self.client_secret.expose_secret(),
                "refresh_token": self.refresh_token.expose_secret(),
            }),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshToken")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loading::{resolve, Opt, RawOptions, Schema};

    fn build(pairs: &[(&str, &str)]) -> Result<RefreshToken, ConstructError> {
        let schema = Schema::from_opts(vec![
            Opt::new("client-id"),
            Opt::new("client-secret").secret(true),
            Opt::new("refresh-token").secret(true),
            Opt::new("auth-url"),
        ])
        .unwrap();
        let raw: RawOptions = pairs.iter().copied().collect();
        let (resolved, _) = resolve(&schema, &raw);
        RefreshToken::from_params(&Params::project(&resolved, RefreshToken::PARAMETERS))
    }

    #[test]
    fn grant_payload() {
        let plugin = build(&[
            ("client_id", "a"),
            ("client_secret", "b"),
            ("refresh_token", "c"),
            ("auth_url", "https://ignored"),
        ])
        .unwrap();
        assert_eq!(plugin.client_id(), "a");
        assert_eq!(
            plugin.auth_payload(&()).body,
            json!({
                "grant_type": "refresh_token",
                "client_id": "a",
                "client_secret": "b",
                "refresh_token": "c"
            })
        );
    }

    #[test]
    fn fingerprint_is_idempotent() {
        let plugin = build(&[
            ("client_id", "a"),
            ("client_secret", "b"),
            ("refresh_token", "c"),
        ])
        .unwrap();
        let first = serde_json::to_vec(&plugin.cache_fingerprint()).unwrap();
        let second = serde_json::to_vec(&plugin.cache_fingerprint()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_parameter() {
        assert!(matches!(
            build(&[("client_id", "a"), ("client_secret", "b")]),
            Err(ConstructError::MissingParameter("refresh_token"))
        ));
    }

    #[test]
    fn debug_redacts() {
        let plugin = build(&[
            ("client_id", "a"),
            ("client_secret", "topsecret"),
            ("refresh_token", "refreshme"),
        ])
        .unwrap();
        let debug = format!("{plugin:?}");
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("refreshme"));
    }
}
