use crate::cli::actions::{
    show::{Args, Output},
    Action,
};
use crate::cli::commands::{ARG_CONFIG, ARG_OUTPUT};
use crate::loading::{Loader, OptValue, RawOptions, Registry};
use anyhow::{Context, Result};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

/// Read a flat JSON object of option values.
///
/// # Errors
/// Returns an error if the file can't be read or isn't a flat object of
/// strings and booleans.
pub fn read_config(path: &Path) -> Result<RawOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let values: BTreeMap<String, OptValue> = serde_json::from_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(values.into_iter().collect())
}

/// Options given as flags or environment variables, keyed by `dest`.
#[must_use]
pub fn collect_args(loader: &Loader, matches: &clap::ArgMatches) -> RawOptions {
    let mut raw = RawOptions::new();
    for opt in loader.schema() {
        let ids = std::iter::once(opt.get_dest().to_string()).chain(opt.alias_dests());
        for id in ids {
            if let Some(value) = matches.get_one::<String>(&id) {
                raw.insert(&id, value.as_str());
            }
        }
    }
    raw
}

/// # Errors
/// Returns an error if no known subcommand was given or the config file is unusable.
pub fn handler(matches: &clap::ArgMatches, registry: &Registry) -> Result<Action> {
    let (name, sub_m) = matches.subcommand().context("missing auth plugin")?;
    let loader = registry
        .get(name)
        .with_context(|| format!("unknown auth plugin: {name}"))?;

    let mut raw = match sub_m.get_one::<String>(ARG_CONFIG) {
        Some(path) => read_config(Path::new(path))?,
        None => RawOptions::new(),
    };
    let given = collect_args(loader, sub_m);
    debug!(config = raw.len(), args = given.len(), "Collected auth options");
    raw.merge(given);

    let output = sub_m
        .get_one::<String>(ARG_OUTPUT)
        .map_or(Ok(Output::Fingerprint), |s| s.parse())?;

    Ok(Action::Show(Args {
        plugin: name.to_string(),
        raw,
        output,
    }))
}
