pub mod logging;
pub mod plugins;

use crate::loading::Registry;
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_CONFIG: &str = "config";
pub const ARG_OUTPUT: &str = "output";

#[must_use]
pub fn new(registry: &Registry) -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authload")
        .about("Load and validate identity auth plugin options")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_CONFIG)
                .short('c')
                .long("config")
                .help("JSON file with option values, overridden by flags and environment")
                .env("AUTHLOAD_CONFIG")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_OUTPUT)
                .short('o')
                .long("output")
                .help("What to print once the plugin is loaded")
                .env("AUTHLOAD_OUTPUT")
                .default_value("fingerprint")
                .value_parser(["fingerprint", "payload", "options"])
                .global(true),
        );

    let command = logging::with_args(command);

    plugins::with_subcommands(command, registry)
}
