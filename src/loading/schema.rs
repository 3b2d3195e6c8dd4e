//! Ordered option schemas and their composition.

use crate::loading::{error::SchemaError, opts::Opt};
use std::collections::{HashMap, HashSet};

/// Ordered, deduplicated list of option descriptors for one loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    opts: Vec<Opt>,
}

impl Schema {
    /// Schema holding only `opts`, subject to the same checks as [`Schema::compose`].
    ///
    /// # Errors
    /// Returns an error if two options share a `dest` or an alias collides.
    pub fn from_opts(opts: Vec<Opt>) -> Result<Self, SchemaError> {
        Self::compose(&Self::default(), opts)
    }

    /// Append `additional` to `parent`.
    ///
    /// An additional option whose `dest` already exists replaces the parent's
    /// entry at the same position.
    ///
    /// # Errors
    /// Returns `DuplicateDest` if two of the additional options share a `dest`,
    /// and `AliasCollision` if an alias of the result matches another option's
    /// `dest` or alias.
    pub fn compose(parent: &Self, additional: Vec<Opt>) -> Result<Self, SchemaError> {
        {
            let mut seen = HashSet::new();
            for opt in &additional {
                if !seen.insert(opt.get_dest()) {
                    return Err(SchemaError::DuplicateDest(opt.get_dest().to_string()));
                }
            }
        }

        let mut opts = parent.opts.clone();
        for opt in additional {
            match opts.iter_mut().find(|o| o.get_dest() == opt.get_dest()) {
                Some(slot) => *slot = opt,
                None => opts.push(opt),
            }
        }

        let schema = Self { opts };
        schema.check_aliases()?;
        Ok(schema)
    }

    fn check_aliases(&self) -> Result<(), SchemaError> {
        let mut owners: HashMap<String, &str> = self
            .opts
            .iter()
            .map(|opt| (opt.get_dest().to_string(), opt.get_name()))
            .collect();

        for opt in &self.opts {
            for alias in opt.alias_dests() {
                if let Some(other) = owners.get(&alias) {
                    return Err(SchemaError::AliasCollision {
                        alias,
                        owner: opt.get_name().to_string(),
                        other: (*other).to_string(),
                    });
                }
                owners.insert(alias, opt.get_name());
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opt> {
        self.opts.iter()
    }

    #[must_use]
    pub fn get(&self, dest: &str) -> Option<&Opt> {
        self.opts.iter().find(|opt| opt.get_dest() == dest)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.opts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opts.is_empty()
    }

    #[must_use]
    pub fn dests(&self) -> Vec<&str> {
        self.opts.iter().map(Opt::get_dest).collect()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Opt;
    type IntoIter = std::slice::Iter<'a, Opt>;

    fn into_iter(self) -> Self::IntoIter {
        self.opts.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parent() -> Schema {
        Schema::from_opts(vec![
            Opt::new("auth-url").required(true),
            Opt::new("project-id").deprecated("tenant-id"),
            Opt::new("trust-id"),
        ])
        .unwrap()
    }

    #[test]
    fn compose_appends_after_parent() {
        let schema = Schema::compose(&parent(), vec![Opt::new("token").secret(true)]).unwrap();
        assert_eq!(
            schema.dests(),
            vec!["auth_url", "project_id", "trust_id", "token"]
        );
        assert_eq!(schema.len(), 4);
        assert!(schema.get("token").is_some_and(Opt::is_secret));
    }

    #[test]
    fn compose_override_keeps_position() {
        let schema = Schema::compose(
            &parent(),
            vec![
                Opt::new("client-id"),
                Opt::new("auth-url").help("Optional here"),
            ],
        )
        .unwrap();
        assert_eq!(
            schema.dests(),
            vec!["auth_url", "project_id", "trust_id", "client_id"]
        );
        let auth_url = schema.get("auth_url").unwrap();
        assert!(!auth_url.is_required());
        assert_eq!(auth_url.get_help(), "Optional here");
    }

    #[test]
    fn compose_leaves_parent_untouched() {
        let base = parent();
        let _ = Schema::compose(&base, vec![Opt::new("auth-url")]).unwrap();
        assert!(base.get("auth_url").is_some_and(Opt::is_required));
    }

    #[test]
    fn duplicate_additions_fail() {
        let err = Schema::compose(&parent(), vec![Opt::new("code"), Opt::new("code")]);
        assert_eq!(err, Err(SchemaError::DuplicateDest("code".to_string())));
    }

    #[test]
    fn alias_colliding_with_dest_fails() {
        let err = Schema::compose(
            &parent(),
            vec![Opt::new("username").deprecated("trust-id")],
        );
        assert_eq!(
            err,
            Err(SchemaError::AliasCollision {
                alias: "trust_id".to_string(),
                owner: "username".to_string(),
                other: "trust-id".to_string(),
            })
        );
    }

    #[test]
    fn alias_colliding_with_alias_fails() {
        let err = Schema::compose(&parent(), vec![Opt::new("tenant").deprecated("tenant-id")]);
        assert!(matches!(err, Err(SchemaError::AliasCollision { .. })));
    }

    #[test]
    fn empty_schema() {
        let schema = Schema::default();
        assert!(schema.is_empty());
        assert_eq!(schema.iter().count(), 0);
    }
}
