//! Resolution of raw option input into canonical `dest` values.

use crate::loading::{
    opts::{to_dest, OptValue},
    schema::Schema,
};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::{collections::BTreeMap, fmt};

const REDACTED: &str = "***";

/// Flat raw input keyed by option name. Keys are normalized on insert, so
/// `user-domain-id` and `user_domain_id` address the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    values: BTreeMap<String, OptValue>,
}

impl RawOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any earlier value for the same key.
    pub fn insert(&mut self, name: &str, value: impl Into<OptValue>) {
        self.values.insert(to_dest(name), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptValue> {
        self.values.get(&to_dest(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&to_dest(name))
    }

    /// Layer `other` on top of `self`; values in `other` win.
    pub fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawOptions
where
    K: AsRef<str>,
    V: Into<OptValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (name, value) in iter {
            raw.insert(name.as_ref(), value);
        }
        raw
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Canonical,
    Alias(String),
    Default,
}

#[derive(Clone, PartialEq, Eq)]
struct Resolved {
    name: String,
    value: OptValue,
    secret: bool,
    source: Source,
}

/// A deprecated alias was used in place of its canonical option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub alias: String,
    pub replacement: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Option \"{}\" is deprecated, use \"{}\" instead",
            self.alias, self.replacement
        )
    }
}

/// Canonical `dest` -> value mapping produced by [`resolve`].
///
/// Secret entries are tagged, not hidden: `Debug` and `Serialize` render them
/// as `***`, while accessors hand out the real value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    entries: BTreeMap<String, Resolved>,
    // (dest, name) of required options, in schema order
    required: Vec<(String, String)>,
}

impl ResolvedOptions {
    #[must_use]
    pub fn get(&self, dest: &str) -> Option<&OptValue> {
        self.entries.get(dest).map(|entry| &entry.value)
    }

    #[must_use]
    pub fn get_str(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(OptValue::as_str)
    }

    #[must_use]
    pub fn contains(&self, dest: &str) -> bool {
        self.entries.contains_key(dest)
    }

    /// Present and truthy, the notion of "given" used by cross-field rules.
    #[must_use]
    pub fn is_set(&self, dest: &str) -> bool {
        self.get(dest).is_some_and(OptValue::is_truthy)
    }

    #[must_use]
    pub fn is_secret(&self, dest: &str) -> bool {
        self.entries.get(dest).is_some_and(|entry| entry.secret)
    }

    #[must_use]
    pub fn source(&self, dest: &str) -> Option<&Source> {
        self.entries.get(dest).map(|entry| &entry.source)
    }

    /// Names of required options that resolved to nothing, in schema order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|(dest, _)| !self.contains(dest))
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Names of options that resolved to something other than a string.
    #[must_use]
    pub fn non_text(&self) -> Vec<&str> {
        self.entries
            .values()
            .filter(|entry| entry.value.as_str().is_none())
            .map(|entry| entry.name.as_str())
            .collect()
    }

    pub fn dests(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the map with secret values replaced by `***`.
    #[must_use]
    pub fn redacted(&self) -> BTreeMap<&str, OptValue> {
        self.entries
            .iter()
            .map(|(dest, entry)| {
                let value = if entry.secret {
                    OptValue::from(REDACTED)
                } else {
                    entry.value.clone()
                };
                (dest.as_str(), value)
            })
            .collect()
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

impl Serialize for ResolvedOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let redacted = self.redacted();
        let mut map = serializer.serialize_map(Some(redacted.len()))?;
        for (dest, value) in &redacted {
            map.serialize_entry(dest, value)?;
        }
        map.end()
    }
}

/// Resolve `raw` against `schema`.
///
/// For each option: the canonical `dest` (or the option name, when the two
/// differ), then each alias in declared order (emitting a
/// [`DeprecationNotice`]), then the default. Anything else stays
/// absent; missing required options are left for validation to report.
/// Raw keys unknown to the schema are dropped.
#[must_use]
pub fn resolve(schema: &Schema, raw: &RawOptions) -> (ResolvedOptions, Vec<DeprecationNotice>) {
    let mut resolved = ResolvedOptions::default();
    let mut notices = Vec::new();

    for opt in schema {
        if opt.is_required() {
            resolved
                .required
                .push((opt.get_dest().to_string(), opt.get_name().to_string()));
        }

        let found = if let Some(value) = raw
            .get(opt.get_dest())
            .or_else(|| raw.get(opt.get_name()))
        {
            Some((value.clone(), Source::Canonical))
        } else if let Some((alias, value)) = opt
            .get_aliases()
            .iter()
            .find_map(|alias| raw.get(alias).map(|value| (alias, value)))
        {
            notices.push(DeprecationNotice {
                alias: alias.clone(),
                replacement: opt.get_name().to_string(),
            });
            Some((value.clone(), Source::Alias(alias.clone())))
        } else {
            opt.get_default()
                .map(|value| (value.clone(), Source::Default))
        };

        if let Some((value, source)) = found {
            resolved.entries.insert(
                opt.get_dest().to_string(),
                Resolved {
                    name: opt.get_name().to_string(),
                    value,
                    secret: opt.is_secret(),
                    source,
                },
            );
        }
    }

    (resolved, notices)
}
