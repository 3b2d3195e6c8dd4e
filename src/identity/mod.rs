//! Identity auth plugins and their shared capability set.

pub mod params;
pub mod v3;

pub use params::Params;

use crate::loading::{ConstructError, ResolvedOptions};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};
use tracing::debug;

/// Network session handed to plugins by the transport layer. Opaque here.
pub trait SessionContext: Send + Sync {}

impl SessionContext for () {}

/// Capabilities of a constructed plugin.
pub trait AuthPlugin: Send + Sync {
    fn kind(&self) -> PluginKind;

    /// Request body the transport layer sends to authenticate.
    fn auth_payload(&self, session: &dyn SessionContext) -> AuthPayload;

    /// Deterministic identity of this plugin's credentials, used as a
    /// session-cache key.
    fn cache_fingerprint(&self) -> Fingerprint;
}

impl fmt::Debug for dyn AuthPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPlugin")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Plugin types known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Password,
    Token,
    Totp,
    OidcClientCredentials,
    OidcPassword,
    OidcAuthorizationCode,
    OidcAccessToken,
    TokenlessAuth,
    RefreshToken,
}

impl PluginKind {
    pub const ALL: [Self; 9] = [
        Self::Password,
        Self::Token,
        Self::Totp,
        Self::OidcClientCredentials,
        Self::OidcPassword,
        Self::OidcAuthorizationCode,
        Self::OidcAccessToken,
        Self::TokenlessAuth,
        Self::RefreshToken,
    ];

    /// Parameters the plugin type accepts from the resolved options, in order.
    #[must_use]
    pub const fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::Password => v3::Password::PARAMETERS,
            Self::Token => v3::Token::PARAMETERS,
            Self::Totp => v3::Totp::PARAMETERS,
            Self::OidcClientCredentials => v3::OidcClientCredentials::PARAMETERS,
            Self::OidcPassword => v3::OidcPassword::PARAMETERS,
            Self::OidcAuthorizationCode => v3::OidcAuthorizationCode::PARAMETERS,
            Self::OidcAccessToken => v3::OidcAccessToken::PARAMETERS,
            Self::TokenlessAuth => v3::TokenlessAuth::PARAMETERS,
            Self::RefreshToken => v3::RefreshToken::PARAMETERS,
        }
    }
}

/// Build a plugin of `kind` from validated options.
///
/// Only the entries named by [`PluginKind::parameters`] reach the plugin.
///
/// # Errors
/// Returns a `ConstructError` if a parameter the plugin cannot do without is
/// absent, which means validation was skipped.
pub fn construct(
    kind: PluginKind,
    resolved: &ResolvedOptions,
) -> Result<Box<dyn AuthPlugin>, ConstructError> {
    let params = Params::project(resolved, kind.parameters());
    debug!(
        plugin = ?kind,
        params = ?params.present().collect::<Vec<_>>(),
        "Constructing auth plugin"
    );

    Ok(match kind {
        PluginKind::Password => Box::new(v3::Password::from_params(&params)?),
        PluginKind::Token => Box::new(v3::Token::from_params(&params)?),
        PluginKind::Totp => Box::new(v3::Totp::from_params(&params)?),
        PluginKind::OidcClientCredentials => {
            Box::new(v3::OidcClientCredentials::from_params(&params)?)
        }
        PluginKind::OidcPassword => Box::new(v3::OidcPassword::from_params(&params)?),
        PluginKind::OidcAuthorizationCode => {
            Box::new(v3::OidcAuthorizationCode::from_params(&params)?)
        }
        PluginKind::OidcAccessToken => Box::new(v3::OidcAccessToken::from_params(&params)?),
        PluginKind::TokenlessAuth => Box::new(v3::TokenlessAuth::from_params(&params)?),
        PluginKind::RefreshToken => Box::new(v3::RefreshToken::from_params(&params)?),
    })
}

/// Authentication request body built by a plugin.
#[derive(Clone, PartialEq, Serialize)]
pub struct AuthPayload {
    pub method: &'static str,
    pub body: serde_json::Value,
}

impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("method", &self.method)
            .field("body", &"***")
            .finish()
    }
}

/// Reads one fingerprint parameter off a plugin.
pub type Accessor<T> = fn(&T) -> Option<&str>;

/// `"<method>_<param>"` -> value mapping identifying a plugin's credentials.
///
/// Equal fingerprints mean equal identity claims. `Debug` lists keys only,
/// values can be credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(BTreeMap<String, Option<String>>);

impl Fingerprint {
    /// Read each `(name, accessor)` pair off `plugin`, keyed `"<tag>_<name>"`.
    #[must_use]
    pub fn derive<T>(tag: &str, fields: &[(&str, Accessor<T>)], plugin: &T) -> Self {
        Self(
            fields
                .iter()
                .map(|(name, accessor)| {
                    (
                        format!("{tag}_{name}"),
                        accessor(plugin).map(ToString::to_string),
                    )
                })
                .collect(),
        )
    }

    /// Value for `key`; `None` both when the key is unknown and when the
    /// parameter was unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Option::as_deref)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Creds {
        user: Option<String>,
        domain: Option<String>,
    }

    const FIELDS: &[(&str, Accessor<Creds>)] = &[
        ("user", |c| c.user.as_deref()),
        ("domain", |c| c.domain.as_deref()),
    ];

    #[test]
    fn derive_prefixes_keys() {
        let creds = Creds {
            user: Some("alice".to_string()),
            domain: None,
        };
        let fp = Fingerprint::derive("password", FIELDS, &creds);
        assert_eq!(fp.len(), 2);
        assert_eq!(fp.get("password_user"), Some("alice"));
        assert!(fp.contains_key("password_domain"));
        assert_eq!(fp.get("password_domain"), None);
        assert_eq!(
            fp.keys().collect::<Vec<_>>(),
            vec!["password_domain", "password_user"]
        );
    }

    #[test]
    fn fingerprint_debug_hides_values() {
        let creds = Creds {
            user: Some("alice".to_string()),
            domain: None,
        };
        let fp = Fingerprint::derive("password", FIELDS, &creds);
        let debug = format!("{fp:?}");
        assert!(debug.contains("password_user"));
        assert!(!debug.contains("alice"));
    }

    #[test]
    fn payload_debug_hides_body() {
        let payload = AuthPayload {
            method: "token",
            body: serde_json::json!({"token": {"id": "abc"}}),
        };
        assert!(!format!("{payload:?}").contains("abc"));
    }

    #[test]
    fn every_kind_declares_parameters() {
        for kind in PluginKind::ALL {
            assert!(!kind.parameters().is_empty(), "{kind:?}");
        }
        assert_eq!(
            PluginKind::RefreshToken.parameters(),
            &["client_id", "client_secret", "refresh_token"]
        );
    }
}
