//! Projection of resolved options onto a plugin's declared parameters.

use crate::loading::{ConstructError, OptValue, ResolvedOptions};
use secrecy::SecretString;
use std::collections::BTreeMap;

/// The subset of a resolved map a plugin type is allowed to see.
///
/// Reading a name outside the declared list is a programming error and
/// yields [`ConstructError::Undeclared`].
#[derive(Debug)]
pub struct Params<'a> {
    declared: &'static [&'static str],
    values: BTreeMap<&'static str, &'a OptValue>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn project(resolved: &'a ResolvedOptions, declared: &'static [&'static str]) -> Self {
        let values = declared
            .iter()
            .filter_map(|name| resolved.get(name).map(|value| (*name, value)))
            .collect();
        Self { declared, values }
    }

    fn value(&self, name: &'static str) -> Result<Option<&'a OptValue>, ConstructError> {
        if !self.declared.contains(&name) {
            return Err(ConstructError::Undeclared(name));
        }
        Ok(self.values.get(name).copied())
    }

    /// # Errors
    /// Returns an error if `name` is undeclared or holds a non-string value.
    pub fn text(&self, name: &'static str) -> Result<Option<String>, ConstructError> {
        match self.value(name)? {
            Some(OptValue::Str(value)) => Ok(Some(value.clone())),
            Some(OptValue::Bool(_)) => Err(ConstructError::NotText(name)),
            None => Ok(None),
        }
    }

    /// # Errors
    /// Returns an error if `name` is undeclared, absent or not a string.
    pub fn require_text(&self, name: &'static str) -> Result<String, ConstructError> {
        self.text(name)?
            .ok_or(ConstructError::MissingParameter(name))
    }

    /// # Errors
    /// Returns an error if `name` is undeclared or holds a non-string value.
    pub fn secret(&self, name: &'static str) -> Result<Option<SecretString>, ConstructError> {
        Ok(self.text(name)?.map(SecretString::from))
    }

    /// # Errors
    /// Returns an error if `name` is undeclared, absent or not a string.
    pub fn require_secret(&self, name: &'static str) -> Result<SecretString, ConstructError> {
        self.require_text(name).map(SecretString::from)
    }

    /// Declared names that have a value, in declared order.
    pub fn present(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.declared
            .iter()
            .copied()
            .filter(|name| self.values.contains_key(name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loading::{resolve, Opt, RawOptions, Schema};
    use secrecy::ExposeSecret;

    const DECLARED: &[&str] = &["client_id", "client_secret", "enabled"];

    fn resolved(pairs: &[(&str, OptValue)]) -> ResolvedOptions {
        let schema = Schema::from_opts(vec![
            Opt::new("client-id"),
            Opt::new("client-secret").secret(true),
            Opt::new("enabled"),
            Opt::new("auth-url"),
        ])
        .unwrap();
        let raw: RawOptions = pairs.iter().cloned().collect();
        resolve(&schema, &raw).0
    }

    #[test]
    fn projection_drops_undeclared_entries() {
        let opts = resolved(&[
            ("client_id", "a".into()),
            ("auth_url", "https://id".into()),
        ]);
        let params = Params::project(&opts, DECLARED);
        assert_eq!(params.present().collect::<Vec<_>>(), vec!["client_id"]);
        assert_eq!(params.text("client_id").unwrap(), Some("a".to_string()));
        assert_eq!(params.text("client_secret").unwrap(), None);
    }

    #[test]
    fn undeclared_reads_fail() {
        let opts = resolved(&[("auth_url", "https://id".into())]);
        let params = Params::project(&opts, DECLARED);
        assert_eq!(
            params.text("auth_url"),
            Err(ConstructError::Undeclared("auth_url"))
        );
    }

    #[test]
    fn required_reads_fail_when_absent() {
        let opts = resolved(&[]);
        let params = Params::project(&opts, DECLARED);
        assert_eq!(
            params.require_text("client_id"),
            Err(ConstructError::MissingParameter("client_id"))
        );
        assert!(params.require_secret("client_secret").is_err());
    }

    #[test]
    fn secrets_and_bools() {
        let opts = resolved(&[
            ("client_secret", "s3cr3t".into()),
            ("enabled", true.into()),
        ]);
        let params = Params::project(&opts, DECLARED);
        let secret = params.require_secret("client_secret").unwrap();
        assert_eq!(secret.expose_secret(), "s3cr3t");
        assert_eq!(params.text("enabled"), Err(ConstructError::NotText("enabled")));
    }
}
