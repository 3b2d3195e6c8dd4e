//! Cross-field validation rules.
//!
//! Each loader level contributes a list of rules. A loader runs its levels'
//! rules base-first and stops at the first failure.

use crate::loading::{error::OptionError, resolve::ResolvedOptions};
use std::fmt;
use tracing::debug;

pub type Check = fn(&ResolvedOptions) -> Result<(), OptionError>;

/// A named, pure predicate over resolved options.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    check: Check,
}

impl Rule {
    #[must_use]
    pub const fn new(name: &'static str, check: Check) -> Self {
        Self { name, check }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// # Errors
    /// Returns the rule's `OptionError` if `opts` violates it.
    pub fn check(&self, opts: &ResolvedOptions) -> Result<(), OptionError> {
        (self.check)(opts)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Run `rules` in order, stopping at the first failure.
///
/// # Errors
/// Returns the first failing rule's `OptionError`.
pub fn run(rules: &[Rule], opts: &ResolvedOptions) -> Result<(), OptionError> {
    for rule in rules {
        debug!(rule = rule.name(), "Checking option rule");
        rule.check(opts)?;
    }
    Ok(())
}

pub const REQUIRED_OPTIONS: Rule = Rule::new("required-options", required_options);
pub const TEXT_VALUES: Rule = Rule::new("text-values", text_values);
pub const V3_PROJECT_SCOPE: Rule = Rule::new("v3-project-scope", v3_project_scope);
pub const COMMON_IDENTITY: Rule = Rule::new("common-identity", common_identity);
pub const OIDC_ENDPOINT: Rule = Rule::new("oidc-endpoint", oidc_endpoint);
pub const TOKENLESS_SCOPE: Rule = Rule::new("tokenless-scope", tokenless_scope);
pub const REFRESH_TOKEN: Rule = Rule::new("refresh-token", refresh_token);

fn any_set(opts: &ResolvedOptions, dests: &[&str]) -> bool {
    dests.iter().any(|dest| opts.is_set(dest))
}

fn project_domain_missing(opts: &ResolvedOptions) -> bool {
    opts.is_set("project_name") && !any_set(opts, &["project_domain_id", "project_domain_name"])
}

fn required_options(opts: &ResolvedOptions) -> Result<(), OptionError> {
    let missing = opts.missing_required();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(OptionError::missing_required(missing))
    }
}

fn text_values(opts: &ResolvedOptions) -> Result<(), OptionError> {
    let non_text = opts.non_text();
    if non_text.is_empty() {
        Ok(())
    } else {
        Err(OptionError::not_text(non_text))
    }
}

fn v3_project_scope(opts: &ResolvedOptions) -> Result<(), OptionError> {
    if project_domain_missing(opts) {
        return Err(OptionError::new(
            "You have provided a project_name. In the V3 identity API a \
             project_name is only unique within a domain so you must also \
             provide either a project_domain_id or project_domain_name.",
        ));
    }
    Ok(())
}

fn common_identity(opts: &ResolvedOptions) -> Result<(), OptionError> {
    if opts.is_set("username") && !any_set(opts, &["user_domain_id", "user_domain_name"]) {
        return Err(OptionError::new(
            "You have provided a username. In the V3 identity API a \
             username is only unique within a domain so you must also \
             provide either a user_domain_id or user_domain_name.",
        ));
    }
    Ok(())
}

fn oidc_endpoint(opts: &ResolvedOptions) -> Result<(), OptionError> {
    if !any_set(opts, &["access_token_endpoint", "discovery_endpoint"]) {
        return Err(OptionError::new(
            "You have to specify either an 'access-token-endpoint' or a 'discovery-endpoint'.",
        ));
    }
    Ok(())
}

fn tokenless_scope(opts: &ResolvedOptions) -> Result<(), OptionError> {
    let unscoped = !any_set(
        opts,
        &["domain_id", "domain_name", "project_id", "project_name"],
    );
    if unscoped || project_domain_missing(opts) {
        return Err(OptionError::new(
            "You need to provide either a domain_name, domain_id, project_id \
             or project_name. If you have provided a project_name, in the V3 \
             identity API a project_name is only unique within a domain so you \
             must also provide either a project_domain_id or project_domain_name.",
        ));
    }
    Ok(())
}

// Every one of the three is needed for the exchange, so any gap fails.
fn refresh_token(opts: &ResolvedOptions) -> Result<(), OptionError> {
    if !["client_id", "client_secret", "refresh_token"]
        .iter()
        .all(|dest| opts.is_set(dest))
    {
        return Err(OptionError::new(
            "You need to provide the client_id, client_secret and the refresh_token.",
        ));
    }
    Ok(())
}
