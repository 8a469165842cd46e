//! Run command implementation.

use super::spawn_reaper;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tombstone_reaper::ReaperWorker;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let worker = ReaperWorker::new(spawn_reaper(config).await?);

    match args.cycles {
        Some(cycles) => {
            let succeeded = worker.run_cycles(cycles).await?;
            println!(
                "{}",
                formatter.success(&format!("{}/{} cycle(s) succeeded", succeeded, cycles))
            );
        }
        None => worker.run().await?,
    }

    Ok(())
}
