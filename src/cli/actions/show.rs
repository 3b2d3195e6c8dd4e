use crate::loading::{self, Loaded, RawOptions};
use anyhow::{anyhow, Result};
use std::str::FromStr;
use tracing::{debug, info};

/// What `show` prints once the plugin is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Fingerprint,
    Payload,
    Options,
}

impl FromStr for Output {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fingerprint" => Ok(Self::Fingerprint),
            "payload" => Ok(Self::Payload),
            "options" => Ok(Self::Options),
            other => Err(anyhow!("unknown output: {other}")),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub plugin: String,
    pub raw: RawOptions,
    pub output: Output,
}

/// Load the plugin and render the requested view as pretty JSON.
///
/// # Errors
/// Returns the loader's error unchanged, so validation messages reach the
/// user verbatim.
pub fn render(args: &Args) -> Result<String> {
    debug!(plugin = %args.plugin, given = args.raw.len(), "Loading auth plugin");
    let Loaded {
        plugin, options, ..
    } = loading::load(&args.plugin, &args.raw)?;
    info!(plugin = %args.plugin, kind = ?plugin.kind(), "Auth plugin loaded");

    let json = match args.output {
        Output::Fingerprint => serde_json::to_string_pretty(&plugin.cache_fingerprint())?,
        Output::Payload => serde_json::to_string_pretty(&plugin.auth_payload(&()))?,
        Output::Options => serde_json::to_string_pretty(&options)?,
    };

    Ok(json)
}

/// Execute the show action.
/// # Errors
/// Returns an error if loading or serialization fails.
pub fn execute(args: &Args) -> Result<()> {
    let json = render(args)?;
    println!("{json}");
    Ok(())
}
