use crate::identity::{
    Accessor, AuthPayload, AuthPlugin, Fingerprint, Params, PluginKind, SessionContext,
};
use crate::loading::ConstructError;
use serde_json::{Map, Value};

/// Tokenless (X.509 client certificate) auth. The scope travels as request
/// headers and the certificate identifies the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenlessAuth {
    auth_url: String,
    domain_id: Option<String>,
    domain_name: Option<String>,
    project_id: Option<String>,
    project_name: Option<String>,
    project_domain_id: Option<String>,
    project_domain_name: Option<String>,
}

impl TokenlessAuth {
    pub const PARAMETERS: &'static [&'static str] = &[
        "auth_url",
        "domain_id",
        "domain_name",
        "project_id",
        "project_name",
        "project_domain_id",
        "project_domain_name",
    ];

    const METHOD: &'static str = "tokenless";

    const CACHE_ID: &'static [(&'static str, Accessor<Self>)] = &[
        ("domain_id", |t| t.domain_id.as_deref()),
        ("domain_name", |t| t.domain_name.as_deref()),
        ("project_id", |t| t.project_id.as_deref()),
        ("project_name", |t| t.project_name.as_deref()),
        ("project_domain_id", |t| t.project_domain_id.as_deref()),
        ("project_domain_name", |t| t.project_domain_name.as_deref()),
    ];

    /// # Errors
    /// Returns an error if `auth_url` is absent.
    pub fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            auth_url: params.require_text("auth_url")?,
            domain_id: params.text("domain_id")?,
            domain_name: params.text("domain_name")?,
            project_id: params.text("project_id")?,
            project_name: params.text("project_name")?,
            project_domain_id: params.text("project_domain_id")?,
            project_domain_name: params.text("project_domain_name")?,
        })
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Scope headers, the most specific target first: project id, project
    /// name with its domain, domain id, domain name.
    #[must_use]
    pub fn headers(&self) -> Map<String, Value> {
        let mut headers = Map::new();
        let mut put = |name: &str, value: &String| {
            headers.insert(name.to_string(), Value::from(value.as_str()));
        };

        if let Some(id) = &self.project_id {
            put("X-Project-Id", id);
        } else if let Some(name) = &self.project_name {
            put("X-Project-Name", name);
            if let Some(id) = &self.project_domain_id {
                put("X-Project-Domain-Id", id);
            } else if let Some(name) = &self.project_domain_name {
                put("X-Project-Domain-Name", name);
            }
        } else if let Some(id) = &self.domain_id {
            put("X-Domain-Id", id);
        } else if let Some(name) = &self.domain_name {
            put("X-Domain-Name", name);
        }
        headers
    }
}

impl AuthPlugin for TokenlessAuth {
    fn kind(&self) -> PluginKind {
        PluginKind::TokenlessAuth
    }

    fn auth_payload(&self, _session: &dyn SessionContext) -> AuthPayload {
        let mut body = Map::new();
        body.insert("headers".into(), Value::Object(self.headers()));
        AuthPayload {
            method: Self::METHOD,
            body: Value::Object(body),
        }
    }

    fn cache_fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(Self::METHOD, Self::CACHE_ID, self)
    }
}
