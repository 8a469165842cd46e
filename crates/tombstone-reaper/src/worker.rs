//! Cycle driver for continuous Reaper operation

use crate::{Reaper, ReaperError, ReaperMetrics, StatusArtifact};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tombstone_domain::traits::{ContentSite, RecordStore};

/// Background worker that runs the Reaper on a schedule
///
/// Cycles run one at a time on the blocking pool. After a cycle the worker
/// sleeps for the poll interval, or backs off after a failure:
///
/// - connectivity loss waits `transient_backoff_secs` and is not counted
/// - any other failure waits `failure_backoff_secs` and is counted
/// - `failure_budget` consecutive counted failures stop the worker
///
/// # Examples
///
/// ```no_run
/// use tombstone_reaper::{Reaper, ReaperConfig, ReaperWorker};
/// use tombstone_site::{HttpSite, HttpSiteConfig};
/// use tombstone_store::JsonFileStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ReaperConfig::default();
///     let store = JsonFileStore::open("data/records.json")?;
///     let site = HttpSite::new(HttpSiteConfig::default())?;
///     let worker = ReaperWorker::new(Reaper::new(config, store, site));
///
///     // Run until Ctrl+C or the failure budget runs out
///     worker.run().await?;
///     Ok(())
/// }
/// ```
pub struct ReaperWorker<S, C> {
    reaper: Arc<Mutex<Reaper<S, C>>>,
    poll_interval: Duration,
    transient_backoff: Duration,
    failure_backoff: Duration,
    failure_budget: u32,
}

impl<S, C> ReaperWorker<S, C>
where
    S: RecordStore + Send + 'static,
    S::Error: Display,
    C: ContentSite + Send + 'static,
{
    /// Create a worker driving `reaper`
    pub fn new(reaper: Reaper<S, C>) -> Self {
        let config = reaper.config();
        let poll_interval = config.poll_interval();
        let transient_backoff = config.transient_backoff();
        let failure_backoff = config.failure_backoff();
        let failure_budget = config.failure_budget;
        Self {
            reaper: Arc::new(Mutex::new(reaper)),
            poll_interval,
            transient_backoff,
            failure_backoff,
            failure_budget,
        }
    }

    /// Run the worker until Ctrl+C or until the failure budget is exhausted
    ///
    /// # Errors
    ///
    /// Returns [`ReaperError::FailureBudgetExhausted`] once too many cycles
    /// in a row have failed.
    pub async fn run(&self) -> Result<(), ReaperError> {
        tracing::info!(
            "Reaper worker started (interval: {:?}, budget: {})",
            self.poll_interval,
            self.failure_budget
        );

        let mut failures = 0;
        loop {
            let outcome = self.cycle().await;
            let pause = self.next_pause(outcome, &mut failures)?;
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping reaper");
                    break;
                }
            }
        }

        tracing::info!("Reaper stopped. Final metrics:\n{}", self.metrics().summary());
        Ok(())
    }

    /// Run a fixed number of cycles with the same backoff rules
    ///
    /// Returns how many cycles succeeded.
    pub async fn run_cycles(&self, cycles: usize) -> Result<usize, ReaperError> {
        let mut failures = 0;
        let mut succeeded = 0;
        for cycle in 0..cycles {
            tracing::debug!("Starting cycle {}/{}", cycle + 1, cycles);
            let outcome = self.cycle().await;
            if outcome.is_ok() {
                succeeded += 1;
            }
            let pause = self.next_pause(outcome, &mut failures)?;
            if cycle + 1 < cycles {
                tokio::time::sleep(pause).await;
            }
        }
        tracing::info!(
            "Reaper finished {} cycles. Final metrics:\n{}",
            cycles,
            self.metrics().summary()
        );
        Ok(succeeded)
    }

    /// Run a single cycle on the blocking pool
    pub async fn cycle(&self) -> Result<StatusArtifact, ReaperError> {
        let reaper = Arc::clone(&self.reaper);
        tokio::task::spawn_blocking(move || {
            let mut reaper = reaper
                .lock()
                .map_err(|_| ReaperError::Worker("reaper lock poisoned".to_string()))?;
            reaper.run_cycle()
        })
        .await
        .map_err(|e| ReaperError::Worker(e.to_string()))?
    }

    /// Pause before the next cycle, or the error that stops the worker
    fn next_pause(
        &self,
        outcome: Result<StatusArtifact, ReaperError>,
        failures: &mut u32,
    ) -> Result<Duration, ReaperError> {
        match outcome {
            Ok(_) => {
                *failures = 0;
                Ok(self.poll_interval)
            }
            Err(e) if e.is_transient() => {
                tracing::warn!("Site unreachable, backing off: {}", e);
                Ok(self.transient_backoff)
            }
            Err(e) => {
                *failures += 1;
                tracing::error!(
                    "Cycle failed ({}/{}): {}",
                    failures,
                    self.failure_budget,
                    e
                );
                if *failures >= self.failure_budget {
                    return Err(ReaperError::FailureBudgetExhausted(*failures));
                }
                Ok(self.failure_backoff)
            }
        }
    }

    /// Snapshot of the reaper's metrics
    pub fn metrics(&self) -> ReaperMetrics {
        self.reaper
            .lock()
            .map(|reaper| reaper.metrics().clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().metrics().clone())
    }

    /// Reset the reaper's metrics counters
    pub fn reset_metrics(&self) {
        if let Ok(mut reaper) = self.reaper.lock() {
            reaper.reset_metrics();
        }
    }
}
