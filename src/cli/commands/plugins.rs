//! One subcommand per registered loader, one argument per option.

use crate::loading::{to_env_var, Loader, Opt, Registry};
use crate::ENV_PREFIX;
use clap::{Arg, Command};

/// Argument for the canonical option, bound to `OS_<NAME>`.
///
/// Defaults and requiredness are not handed to clap: the resolver applies
/// defaults and the loader's rules report missing options, so values from a
/// config file still count.
#[must_use]
pub fn opt_arg(opt: &Opt) -> Arg {
    let mut help = opt.get_help().to_string();
    if opt.is_required() {
        help.push_str(" (required)");
    }
    if let Some(default) = opt.get_default() {
        help.push_str(&format!(" [default: {default}]"));
    }

    Arg::new(opt.get_dest().to_string())
        .long(opt.get_name().to_string())
        .help(help)
        .value_name(opt.get_metavar())
        .env(opt.env_var(ENV_PREFIX))
        .hide_env_values(opt.is_secret())
}

/// Hidden arguments for the deprecated aliases of `opt`.
pub fn alias_args(opt: &Opt) -> impl Iterator<Item = Arg> + '_ {
    opt.get_aliases().iter().map(move |alias| {
        Arg::new(crate::loading::to_dest(alias))
            .long(alias.clone())
            .hide(true)
            .value_name(opt.get_metavar())
            .env(to_env_var(ENV_PREFIX, alias))
            .hide_env_values(opt.is_secret())
    })
}

#[must_use]
pub fn subcommand(loader: &Loader) -> Command {
    loader
        .schema()
        .iter()
        .fold(Command::new(loader.name()).about(loader.about()), |cmd, opt| {
            cmd.arg(opt_arg(opt)).args(alias_args(opt))
        })
}

#[must_use]
pub fn with_subcommands(command: Command, registry: &Registry) -> Command {
    registry
        .iter()
        .fold(command, |cmd, loader| cmd.subcommand(subcommand(loader)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loading::registry;

    fn command() -> Command {
        with_subcommands(Command::new("authload"), registry().unwrap())
    }

    #[test]
    fn every_loader_is_a_subcommand() {
        let command = command();
        for name in registry().unwrap().names() {
            assert!(command.find_subcommand(name).is_some(), "{name}");
        }
    }

    #[test]
    fn every_argument_name_is_a_flag() {
        let command = command();
        for loader in registry().unwrap().iter() {
            let sub = command.find_subcommand(loader.name()).unwrap();
            let longs: Vec<String> = sub
                .get_arguments()
                .filter_map(|arg| arg.get_long().map(|long| format!("--{long}")))
                .collect();
            for opt in loader.schema() {
                for name in opt.argument_names() {
                    assert!(longs.contains(&name), "{} {name}", loader.name());
                }
            }
        }
    }

    #[test]
    fn flags_and_aliases() {
        let matches = command().get_matches_from(vec![
            "authload",
            "v3password",
            "--auth-url",
            "https://keystone/v3",
            "--user-name",
            "alice",
            "--tenant-id",
            "p1",
        ]);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "v3password");
        assert_eq!(
            sub.get_one::<String>("auth_url").cloned(),
            Some("https://keystone/v3".to_string())
        );
        assert_eq!(
            sub.get_one::<String>("user_name").cloned(),
            Some("alice".to_string())
        );
        assert_eq!(
            sub.get_one::<String>("tenant_id").cloned(),
            Some("p1".to_string())
        );
        assert_eq!(sub.get_one::<String>("username"), None);
    }

    #[test]
    fn env_vars_use_os_prefix() {
        temp_env::with_vars(
            [
                ("OS_AUTH_URL", Some("https://keystone/v3")),
                ("OS_USER_DOMAIN_ID", Some("d1")),
                ("OS_PASSWORD", Some("hunter2")),
                ("OS_OPENID_SCOPE", None),
            ],
            || {
                let matches = command().get_matches_from(vec!["authload", "v3password"]);
                let (_, sub) = matches.subcommand().unwrap();
                assert_eq!(
                    sub.get_one::<String>("user_domain_id").cloned(),
                    Some("d1".to_string())
                );
                assert_eq!(
                    sub.get_one::<String>("password").cloned(),
                    Some("hunter2".to_string())
                );
            },
        );
    }

    #[test]
    fn dest_differs_from_flag() {
        let matches = command().get_matches_from(vec![
            "authload",
            "v3oidcpassword",
            "--openid-scope",
            "openid",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("scope").cloned(), Some("openid".to_string()));
    }

    #[test]
    fn secrets_hide_env_values_and_aliases_are_hidden() {
        let command = command();
        let sub = command.find_subcommand("v3oidcauthcode").unwrap();
        let code = sub.get_arguments().find(|a| a.get_id() == "code").unwrap();
        assert!(code.is_hide_env_values_set());
        let alias = sub
            .get_arguments()
            .find(|a| a.get_id() == "authorization_code")
            .unwrap();
        assert!(alias.is_hide_set());
        assert_eq!(
            alias.get_env().and_then(|e| e.to_str()),
            Some("OS_AUTHORIZATION_CODE")
        );
    }
}
