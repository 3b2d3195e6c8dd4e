//! # authload (auth plugin option loading)
//!
//! `authload` turns a flat set of named option values (command-line flags,
//! `OS_*` environment variables, or a JSON config file) into a validated,
//! constructed identity auth plugin.
//!
//! ## Pipeline
//!
//! - **Schema:** every loader is composed from explicit levels (`base`,
//!   `identity`, `v3`, `federation`, `oidc`, plus the plugin's own options).
//!   A child option with the same `dest` replaces the parent's in place.
//! - **Resolution:** canonical names win, then deprecated aliases in declared
//!   order (each hit yields a deprecation notice), then defaults.
//! - **Validation:** rules run base-first and stop at the first failure with
//!   an [`loading::OptionError`] whose message is shown to the user verbatim.
//! - **Construction:** the resolved map is projected onto the plugin's
//!   declared parameters; the plugin never sees anything else.
//!
//! ## Fingerprints
//!
//! Constructed plugins expose [`identity::AuthPlugin::cache_fingerprint`], a
//! deterministic `"<method>_<param>"` mapping that session caches use to decide
//! whether an earlier authentication result can be reused.

pub mod cli;
pub mod identity;
pub mod loading;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Environment prefix for auth options, `--user-domain-id` reads `OS_USER_DOMAIN_ID`.
pub const ENV_PREFIX: &str = "OS_";
