use crate::{api, api::ProcessConfig, cli::telemetry};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub config: ProcessConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the encryption key or upstream URL is unusable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Starting gatehouse with {:?}", args.config);

    let result = api::new(args.port, &args.config).await;

    telemetry::shutdown_tracer();

    result
}
