use crate::cli::{
    actions::Action,
    commands, dispatch,
    telemetry::{self, Format},
};
use crate::loading::registry;
use anyhow::{Context, Result};

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if the loader registry is broken, or telemetry
/// initialization or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Build the loader registry, every subcommand comes from it
    let registry = registry().context("failed to build auth plugin registry")?;

    // 2. Parse command-line arguments
    let matches = commands::new(registry).get_matches();

    // 3. Extract verbosity level and log format
    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );
    let format = Format::parse(
        matches
            .get_one::<String>(commands::logging::ARG_LOG_FORMAT)
            .map(String::as_str),
    );

    // 4. Initialize telemetry
    telemetry::init(verbosity_level, format)?;

    // 5. Dispatch to appropriate action
    let action = dispatch::handler(&matches, registry)?;

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_verbosity_level() {
        assert_eq!(get_verbosity_level(0), None);
        assert_eq!(get_verbosity_level(1), Some(tracing::Level::WARN));
        assert_eq!(get_verbosity_level(2), Some(tracing::Level::INFO));
        assert_eq!(get_verbosity_level(3), Some(tracing::Level::DEBUG));
        assert_eq!(get_verbosity_level(4), Some(tracing::Level::TRACE));
        assert_eq!(get_verbosity_level(9), Some(tracing::Level::TRACE));
    }
}
