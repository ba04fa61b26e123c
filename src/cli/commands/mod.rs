pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";
pub const ARG_UPSTREAM_URL: &str = "upstream-url";
pub const ARG_LOGIN_ENCRYPTION_KEY: &str = "login-encryption-key";
pub const ARG_UPSTREAM_TIMEOUT: &str = "upstream-timeout-seconds";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("gatehouse")
        .about("Session authentication relay for the school platform")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("GATEHOUSE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_UPSTREAM_URL)
                .short('u')
                .long(ARG_UPSTREAM_URL)
                .help("Base URL of the upstream school platform API, example: https://api.school.tld/api/v1")
                .env("GATEHOUSE_UPSTREAM_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_ENCRYPTION_KEY)
                .long(ARG_LOGIN_ENCRYPTION_KEY)
                .help("Base64 AES-256 key used to seal login credentials")
                .long_help(
                    "Base64 encoding of exactly 32 bytes, shared with the upstream. Generate one with `openssl rand -base64 32`.",
                )
                .env("GATEHOUSE_LOGIN_ENCRYPTION_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_UPSTREAM_TIMEOUT)
                .long(ARG_UPSTREAM_TIMEOUT)
                .help("Timeout for each upstream request, in seconds")
                .default_value("10")
                .env("GATEHOUSE_UPSTREAM_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn with_cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("GATEHOUSE_PORT", None::<&str>),
                ("GATEHOUSE_UPSTREAM_URL", None::<&str>),
                ("GATEHOUSE_LOGIN_ENCRYPTION_KEY", None::<&str>),
                ("GATEHOUSE_UPSTREAM_TIMEOUT_SECONDS", None::<&str>),
                ("GATEHOUSE_LOG_LEVEL", None::<&str>),
            ],
            f,
        )
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "gatehouse");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session authentication relay for the school platform".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args_and_defaults() {
        with_cleared_env(|| {
            let matches = new().get_matches_from(vec![
                "gatehouse",
                "--upstream-url",
                "https://api.school.test/api/v1",
                "--login-encryption-key",
                KEY,
            ]);

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
                Some(10)
            );
            assert_eq!(
                matches.get_one::<String>(ARG_UPSTREAM_URL).cloned(),
                Some("https://api.school.test/api/v1".to_string())
            );
            assert_eq!(
                matches.get_one::<String>(ARG_LOGIN_ENCRYPTION_KEY).cloned(),
                Some(KEY.to_string())
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("GATEHOUSE_PORT", Some("443")),
                ("GATEHOUSE_UPSTREAM_URL", Some("http://upstream:3000/api")),
                ("GATEHOUSE_LOGIN_ENCRYPTION_KEY", Some(KEY)),
                ("GATEHOUSE_UPSTREAM_TIMEOUT_SECONDS", Some("3")),
                ("GATEHOUSE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["gatehouse"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
                    Some(3)
                );
                assert_eq!(
                    matches.get_one::<String>(ARG_UPSTREAM_URL).cloned(),
                    Some("http://upstream:3000/api".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            with_cleared_env(|| {
                let mut args = vec![
                    "gatehouse".to_string(),
                    "--upstream-url".to_string(),
                    "http://upstream:3000".to_string(),
                    "--login-encryption-key".to_string(),
                    KEY.to_string(),
                ];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_missing_required_args() {
        with_cleared_env(|| {
            let result = new().try_get_matches_from(vec!["gatehouse", "--port", "9090"]);
            assert_eq!(
                result.map_err(|e| e.kind()),
                Err(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn test_zero_timeout_rejected() {
        with_cleared_env(|| {
            let result = new().try_get_matches_from(vec![
                "gatehouse",
                "--upstream-url",
                "http://upstream:3000",
                "--login-encryption-key",
                KEY,
                "--upstream-timeout-seconds",
                "0",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()),
                Err(clap::error::ErrorKind::ValueValidation)
            );
        });
    }
}
