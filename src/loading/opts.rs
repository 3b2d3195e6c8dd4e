//! Option descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw or resolved option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptValue {
    Bool(bool),
    Str(String),
}

impl OptValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            Self::Bool(_) => None,
        }
    }

    /// Whether a cross-field rule should treat the value as given.
    /// Empty strings and `false` count as not given.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(value) => !value.is_empty(),
            Self::Bool(value) => *value,
        }
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for OptValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for OptValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Normalize an option name into its `dest` identifier: `user-domain-id` -> `user_domain_id`.
#[must_use]
pub fn to_dest(name: &str) -> String {
    name.replace('-', "_")
}

/// Environment variable for an option name: `user-domain-id` -> `OS_USER_DOMAIN_ID`.
#[must_use]
pub fn to_env_var(prefix: &str, name: &str) -> String {
    format!("{prefix}{}", to_dest(name).to_uppercase())
}

/// Schema unit describing one configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt {
    name: String,
    dest: String,
    required: bool,
    secret: bool,
    default: Option<OptValue>,
    aliases: Vec<String>,
    help: String,
    metavar: Option<String>,
}

impl Opt {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dest: to_dest(name),
            required: false,
            secret: false,
            default: None,
            aliases: Vec::new(),
            help: String::new(),
            metavar: None,
        }
    }

    #[must_use]
    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<OptValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Override the derived `dest`, e.g. `openid-scope` stored as `scope`.
    #[must_use]
    pub fn dest(mut self, dest: &str) -> Self {
        self.dest = dest.to_string();
        self
    }

    /// Add a deprecated name. Aliases are tried in the order they are added.
    #[must_use]
    pub fn deprecated(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    #[must_use]
    pub fn metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    #[must_use]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get_dest(&self) -> &str {
        &self.dest
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    #[must_use]
    pub fn get_default(&self) -> Option<&OptValue> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn get_aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub fn get_help(&self) -> &str {
        &self.help
    }

    /// Placeholder shown in usage, the uppercased `dest` unless set.
    #[must_use]
    pub fn get_metavar(&self) -> String {
        self.metavar
            .clone()
            .unwrap_or_else(|| self.dest.to_uppercase())
    }

    /// `dest` identifiers of the deprecated aliases, in declared order.
    pub fn alias_dests(&self) -> impl Iterator<Item = String> + '_ {
        self.aliases.iter().map(|alias| to_dest(alias))
    }

    #[must_use]
    pub fn env_var(&self, prefix: &str) -> String {
        to_env_var(prefix, &self.name)
    }

    /// Command-line flags for the option: `--<name>` then `--<alias>` per alias.
    pub fn argument_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(&self.aliases)
            .map(|name| format!("--{name}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dest_is_derived_from_name() {
        let opt = Opt::new("user-domain-id");
        assert_eq!(opt.get_name(), "user-domain-id");
        assert_eq!(opt.get_dest(), "user_domain_id");
        assert!(!opt.is_required());
        assert!(!opt.is_secret());
    }

    #[test]
    fn explicit_dest_wins() {
        let opt = Opt::new("openid-scope")
            .dest("scope")
            .default_value("openid profile");
        assert_eq!(opt.get_dest(), "scope");
        assert_eq!(opt.get_default(), Some(&OptValue::from("openid profile")));
        assert_eq!(opt.get_metavar(), "SCOPE");
    }

    #[test]
    fn alias_dests_keep_declared_order() {
        let opt = Opt::new("code")
            .deprecated("authorization-code")
            .deprecated("auth-code");
        let dests: Vec<String> = opt.alias_dests().collect();
        assert_eq!(dests, vec!["authorization_code", "auth_code"]);
    }

    #[test]
    fn env_var_uses_prefix_and_uppercase() {
        let opt = Opt::new("user-domain-id");
        assert_eq!(opt.env_var("OS_"), "OS_USER_DOMAIN_ID");
        assert_eq!(to_env_var("OS_", "tenant-name"), "OS_TENANT_NAME");
    }

    #[test]
    fn argument_names_include_aliases() {
        let opt = Opt::new("project-id").deprecated("tenant-id");
        let names: Vec<String> = opt.argument_names().collect();
        assert_eq!(names, vec!["--project-id", "--tenant-id"]);
    }

    #[test]
    fn truthiness() {
        assert!(OptValue::from("x").is_truthy());
        assert!(!OptValue::from("").is_truthy());
        assert!(OptValue::from(true).is_truthy());
        assert!(!OptValue::from(false).is_truthy());
        assert_eq!(OptValue::from(true).as_str(), None);
        assert_eq!(OptValue::from("a").to_string(), "a");
    }

    #[test]
    fn opt_value_deserializes_strings_and_bools() {
        let value: OptValue = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(value, OptValue::from("alice"));
        let value: OptValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, OptValue::from(true));
        assert!(serde_json::from_str::<OptValue>("1").is_err());
    }
}
