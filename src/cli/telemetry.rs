use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Filter from `RUST_LOG`, falling back to `verbosity_level` (ERROR if unset).
///
/// # Errors
/// Returns an error if a built-in directive fails to parse.
pub fn filter(verbosity_level: Option<Level>) -> Result<EnvFilter> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("clap=error".parse()?))
}

/// Initialize logging to stderr. stdout carries the command's JSON output.
///
/// # Errors
///
/// Returns an error if the subscriber can't be installed
pub fn init(verbosity_level: Option<Level>, format: Format) -> Result<()> {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        Format::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        Format::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .boxed(),
    };

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(filter(verbosity_level)?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse(Some("json")), Format::Json);
        assert_eq!(Format::parse(Some("text")), Format::Text);
        assert_eq!(Format::parse(None), Format::Text);
    }

    #[test]
    fn test_filter_defaults_to_error() {
        temp_env::with_vars([("RUST_LOG", None::<&str>)], || {
            let filter = filter(None).unwrap();
            assert_eq!(filter.max_level_hint(), Some(Level::ERROR.into()));
        });
    }

    #[test]
    fn test_filter_uses_verbosity() {
        temp_env::with_vars([("RUST_LOG", None::<&str>)], || {
            let filter = filter(Some(Level::DEBUG)).unwrap();
            assert_eq!(filter.max_level_hint(), Some(Level::DEBUG.into()));
        });
    }
}
