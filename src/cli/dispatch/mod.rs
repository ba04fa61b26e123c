//! Map parsed CLI arguments to the action the binary runs.

use crate::{
    api::ProcessConfig,
    cli::{
        actions::{Action, server::Args},
        commands::{ARG_LOGIN_ENCRYPTION_KEY, ARG_PORT, ARG_UPSTREAM_TIMEOUT, ARG_UPSTREAM_URL},
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if a required argument is missing or the upstream URL does not parse.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let upstream_url = matches
        .get_one::<String>(ARG_UPSTREAM_URL)
        .context("missing required argument: --upstream-url")?;
    let upstream_url = Url::parse(upstream_url).context("invalid GATEHOUSE_UPSTREAM_URL")?;

    let key = matches
        .get_one::<String>(ARG_LOGIN_ENCRYPTION_KEY)
        .cloned()
        .context("missing required argument: --login-encryption-key")?;

    let timeout = matches
        .get_one::<u64>(ARG_UPSTREAM_TIMEOUT)
        .copied()
        .unwrap_or(10);

    let config = ProcessConfig::new(upstream_url, SecretString::from(key))
        .with_upstream_timeout(Duration::from_secs(timeout));

    Ok(Action::Server(Args { port, config }))
}
