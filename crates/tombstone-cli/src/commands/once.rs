//! Once command implementation.

use super::build_reaper;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the once command.
pub async fn execute_once(config: &Config, formatter: &Formatter) -> Result<()> {
    let config = config.clone();

    // Both the site client and the cycle block on network I/O
    let artifact = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut reaper = build_reaper(&config)?;
        let artifact = reaper.run_cycle()?;
        tracing::info!("{}", reaper.metrics().summary());
        Ok(artifact)
    })
    .await
    .map_err(|e| CliError::Task(e.to_string()))??;

    println!("{}", formatter.format_artifact(&artifact)?);
    Ok(())
}
