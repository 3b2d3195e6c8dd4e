//! Error types for option loading.

use thiserror::Error;

/// A user-input defect found while validating resolved options.
///
/// The message is meant to be shown as-is, e.g. as the exit message of a CLI
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OptionError {
    message: String,
}

impl OptionError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for required options that resolved to nothing, named by their option names.
    #[must_use]
    pub fn missing_required<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        Self::new(format!(
            "Auth plugin requires parameters which were not given: {}",
            names.join(", ")
        ))
    }

    /// Error for options given a non-string value, named by their option names.
    #[must_use]
    pub fn not_text<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        Self::new(format!(
            "Auth plugin parameters must be strings: {}",
            names.join(", ")
        ))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Structural errors in a loader schema. Raised while the registry is built,
/// never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("option dest '{0}' is declared more than once in the same level")]
    DuplicateDest(String),
    #[error("alias '{alias}' of option '{owner}' collides with '{other}'")]
    AliasCollision {
        alias: String,
        owner: String,
        other: String,
    },
}

/// Invariant violations while building a plugin from a resolved map.
///
/// These only happen if validation was skipped or a plugin type reads a
/// parameter it never declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("plugin parameter '{0}' is missing from the resolved options")]
    MissingParameter(&'static str),
    #[error("plugin parameter '{0}' is not declared by the plugin type")]
    Undeclared(&'static str),
    #[error("plugin parameter '{0}' must be a string")]
    NotText(&'static str),
}

/// Errors from the full load pipeline.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown auth plugin: {0}")]
    UnknownPlugin(String),
    #[error("auth plugin registry is broken: {0}")]
    Registry(#[from] SchemaError),
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error(transparent)]
    Construct(#[from] ConstructError),
}
