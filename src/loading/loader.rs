//! Loaders assembled from explicit option/rule levels.

use crate::identity::{self, AuthPlugin, PluginKind};
use crate::loading::{
    error::{LoadError, OptionError, SchemaError},
    opts::Opt,
    resolve::{resolve, DeprecationNotice, RawOptions, ResolvedOptions},
    rules::{self, Rule},
    schema::Schema,
};
use tracing::{debug, warn};

/// One layer of a loader: the options it adds and the rules it checks.
#[derive(Debug, Clone)]
pub struct Level {
    name: &'static str,
    options: Vec<Opt>,
    rules: Vec<Rule>,
}

impl Level {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            options: Vec::new(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: Vec<Opt>) -> Self {
        self.options.extend(options);
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A constructed plugin together with the options it was built from.
#[derive(Debug)]
pub struct Loaded {
    pub plugin: Box<dyn AuthPlugin>,
    pub options: ResolvedOptions,
    pub deprecations: Vec<DeprecationNotice>,
}

/// Composed schema, ordered rule chain and target plugin type for one auth
/// plugin name. Immutable once built.
#[derive(Debug, Clone)]
pub struct Loader {
    name: &'static str,
    about: &'static str,
    kind: PluginKind,
    levels: Vec<&'static str>,
    schema: Schema,
    rules: Vec<Rule>,
}

impl Loader {
    /// Compose `levels` base-first into a loader.
    ///
    /// # Errors
    /// Returns a `SchemaError` if any level breaks the schema invariants.
    pub fn new(
        name: &'static str,
        about: &'static str,
        kind: PluginKind,
        levels: Vec<Level>,
    ) -> Result<Self, SchemaError> {
        let mut schema = Schema::default();
        let mut rules = Vec::new();
        let mut names = Vec::with_capacity(levels.len());

        for level in levels {
            schema = Schema::compose(&schema, level.options)?;
            rules.extend(level.rules);
            names.push(level.name);
        }

        Ok(Self {
            name,
            about,
            kind,
            levels: names,
            schema,
            rules,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn about(&self) -> &'static str {
        self.about
    }

    #[must_use]
    pub fn kind(&self) -> PluginKind {
        self.kind
    }

    #[must_use]
    pub fn levels(&self) -> &[&'static str] {
        &self.levels
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn resolve(&self, raw: &RawOptions) -> (ResolvedOptions, Vec<DeprecationNotice>) {
        resolve(&self.schema, raw)
    }

    /// # Errors
    /// Returns the first failing rule's `OptionError`.
    pub fn validate(&self, options: &ResolvedOptions) -> Result<(), OptionError> {
        rules::run(&self.rules, options)
    }

    /// Resolve, validate and construct.
    ///
    /// # Errors
    /// Returns `LoadError::Option` for invalid input and `LoadError::Construct`
    /// if construction breaks a plugin invariant.
    pub fn load(&self, raw: &RawOptions) -> Result<Loaded, LoadError> {
        debug!(loader = self.name, levels = ?self.levels, "Resolving auth options");
        let (options, deprecations) = self.resolve(raw);
        for notice in &deprecations {
            warn!("{notice}");
        }
        debug!(?options, "Resolved auth options");

        self.validate(&options)?;
        let plugin = identity::construct(self.kind, &options)?;

        Ok(Loaded {
            plugin,
            options,
            deprecations,
        })
    }
}
