//! Metrics collection for Reaper operations

use crate::report::CycleStats;

/// Metrics collected across Reaper cycles
///
/// Tracks countdown transitions, deviations and driver health.
#[derive(Debug, Clone, Default)]
pub struct ReaperMetrics {
    /// Successful cycles
    pub cycle_count: usize,

    /// Cycles that aborted
    pub failed_cycles: usize,

    /// Countdowns opened
    pub flagged: usize,

    /// Countdowns stopped after a recovery
    pub rescinded: usize,

    /// Countdowns lengthened from 24h to 72h
    pub widened: usize,

    /// Countdowns shortened from 72h to 24h
    pub tightened: usize,

    /// Countdowns that reached their deadline
    pub expired: usize,

    /// Deviations published
    pub deviations: usize,

    /// Stale records dropped
    pub collected: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl ReaperMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed cycle
    pub fn record_cycle(&mut self, stats: &CycleStats, deviations: usize, runtime_ms: u64) {
        self.cycle_count += 1;
        self.flagged += stats.flagged;
        self.rescinded += stats.rescinded;
        self.widened += stats.widened;
        self.tightened += stats.tightened;
        self.expired += stats.expired;
        self.collected += stats.collected;
        self.deviations += deviations;
        self.total_runtime_ms += runtime_ms;
    }

    /// Record an aborted cycle
    pub fn record_failure(&mut self) {
        self.failed_cycles += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Reaper Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Cycles: {} ok, {} failed", self.cycle_count, self.failed_cycles),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            "Countdowns:".to_string(),
            format!("  Flagged: {}", self.flagged),
            format!("  Rescinded: {}", self.rescinded),
            format!("  Widened: {}", self.widened),
            format!("  Tightened: {}", self.tightened),
            format!("  Expired: {}", self.expired),
            String::new(),
            format!("Deviations: {}", self.deviations),
            format!("Stale records collected: {}", self.collected),
        ]
        .join("\n")
    }
}
