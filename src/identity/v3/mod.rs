//! Keystone V3 identity plugins.

mod oidc;
mod password;
mod refresh_token;
mod token;
mod tokenless;
mod totp;

pub use oidc::{
    OidcAccessToken, OidcAuthorizationCode, OidcBase, OidcClientCredentials, OidcPassword,
};
pub use password::Password;
pub use refresh_token::RefreshToken;
pub use token::Token;
pub use tokenless::TokenlessAuth;
pub use totp::Totp;

use crate::identity::Params;
use crate::loading::ConstructError;
use serde_json::{json, Map, Value};

/// Scope parameters shared by every V3 plugin that talks to `/auth/tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub system_scope: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub trust_id: Option<String>,
}

impl Scope {
    pub(crate) fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            system_scope: params.text("system_scope")?,
            domain_id: params.text("domain_id")?,
            domain_name: params.text("domain_name")?,
            project_id: params.text("project_id")?,
            project_name: params.text("project_name")?,
            project_domain_id: params.text("project_domain_id")?,
            project_domain_name: params.text("project_domain_name")?,
            trust_id: params.text("trust_id")?,
        })
    }

    /// Keystone `scope` object, `None` for an unscoped request.
    ///
    /// Targets are tried project, domain, trust, then system; the first one
    /// given wins.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        if let Some(id) = &self.project_id {
            return Some(json!({ "project": { "id": id } }));
        }
        if let Some(name) = &self.project_name {
            let mut project = Map::new();
            project.insert("name".into(), json!(name));
            if let Some(domain) = id_or_name(&self.project_domain_id, &self.project_domain_name)
            {
                project.insert("domain".into(), domain);
            }
            return Some(json!({ "project": project }));
        }
        if let Some(domain) = id_or_name(&self.domain_id, &self.domain_name) {
            return Some(json!({ "domain": domain }));
        }
        if let Some(id) = &self.trust_id {
            return Some(json!({ "OS-TRUST:trust": { "id": id } }));
        }
        self.system_scope.as_ref().map(|system| {
            if system == "all" {
                json!({ "system": { "all": true } })
            } else {
                json!({ "system": { system: true } })
            }
        })
    }
}

/// User reference shared by the password and TOTP methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
}

impl UserIdentity {
    pub(crate) fn from_params(params: &Params<'_>) -> Result<Self, ConstructError> {
        Ok(Self {
            user_id: params.text("user_id")?,
            username: params.text("username")?,
            user_domain_id: params.text("user_domain_id")?,
            user_domain_name: params.text("user_domain_name")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut user = Map::new();
        if let Some(id) = &self.user_id {
            user.insert("id".into(), json!(id));
        }
        if let Some(name) = &self.username {
            user.insert("name".into(), json!(name));
        }
        if let Some(domain) = id_or_name(&self.user_domain_id, &self.user_domain_name) {
            user.insert("domain".into(), domain);
        }
        user
    }
}

fn id_or_name(id: &Option<String>, name: &Option<String>) -> Option<Value> {
    match (id, name) {
        (Some(id), _) => Some(json!({ "id": id })),
        (None, Some(name)) => Some(json!({ "name": name })),
        (None, None) => None,
    }
}

/// `{"auth": {"identity": {"methods": [method], method: body}, "scope": ...}}`
fn keystone_body(method: &str, body: Value, scope: &Scope) -> Value {
    let mut auth = Map::new();
    auth.insert(
        "identity".into(),
        json!({ "methods": [method], method: body }),
    );
    if let Some(scope) = scope.to_json() {
        auth.insert("scope".into(), scope);
    }
    json!({ "auth": auth })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscoped() {
        assert_eq!(Scope::default().to_json(), None);
    }

    #[test]
    fn project_by_name_carries_domain() {
        let scope = Scope {
            project_name: Some("demo".into()),
            project_domain_name: Some("Default".into()),
            ..Scope::default()
        };
        assert_eq!(
            scope.to_json(),
            Some(json!({ "project": { "name": "demo", "domain": { "name": "Default" } } }))
        );
    }

    #[test]
    fn project_wins_over_domain() {
        let scope = Scope {
            project_id: Some("p1".into()),
            domain_id: Some("d1".into()),
            ..Scope::default()
        };
        assert_eq!(scope.to_json(), Some(json!({ "project": { "id": "p1" } })));
    }

    #[test]
    fn trust_and_system() {
        let trust = Scope {
            trust_id: Some("t1".into()),
            ..Scope::default()
        };
        assert_eq!(
            trust.to_json(),
            Some(json!({ "OS-TRUST:trust": { "id": "t1" } }))
        );
        let system = Scope {
            system_scope: Some("all".into()),
            ..Scope::default()
        };
        assert_eq!(system.to_json(), Some(json!({ "system": { "all": true } })));
    }

    #[test]
    fn user_prefers_domain_id() {
        let user = UserIdentity {
            username: Some("alice".into()),
            user_domain_id: Some("d1".into()),
            user_domain_name: Some("Default".into()),
            ..UserIdentity::default()
        };
        assert_eq!(
            Value::Object(user.to_json()),
            json!({ "name": "alice", "domain": { "id": "d1" } })
        );
    }

    #[test]
    fn body_shape() {
        let body = keystone_body("token", json!({ "id": "abc" }), &Scope::default());
        assert_eq!(
            body,
            json!({ "auth": { "identity": { "methods": ["token"], "token": { "id": "abc" } } } })
        );
    }
}
