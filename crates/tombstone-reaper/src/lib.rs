//! Tombstone Reaper
//!
//! Deletion countdown engine for low-rated wiki pages.
//!
//! # Overview
//!
//! The Reaper is responsible for:
//! - **Flagging**: opening a countdown on originals and translations that fall
//!   below the score rules, by posting an announcement and tagging the page
//! - **Reconciliation**: re-reading every running countdown from its
//!   announcement post and adjusting it as the live score moves
//! - **Reporting**: collecting expired, sub-floor and already-deleted pages
//!   into one status document
//!
//! # Countdown Lifecycle
//!
//! | Trigger | Interval |
//! |---------|----------|
//! | Original older than 30 days | 72h |
//! | Original, score -2 to -9 | 72h |
//! | Original, score -10 or lower | 24h |
//! | Translation, score below 0, older than 24h | 24h |
//!
//! A running countdown on an original widens from 24h to 72h when the score
//! climbs above -10 and tightens to 24h when it drops to -10 or lower with
//! more than a day left. It is rescinded once the score recovers.
//!
//! # Usage
//!
//! ## One-time Cycle
//!
//! ```
//! use tombstone_reaper::{Reaper, ReaperConfig};
//! use tombstone_site::MockSite;
//! use tombstone_store::JsonFileStore;
//! use tombstone_domain::Timestamp;
//!
//! let now = Timestamp::from_secs(1_700_000_000);
//! let mut reaper = Reaper::new(
//!     ReaperConfig::for_tests(),
//!     JsonFileStore::in_memory(),
//!     MockSite::new(now),
//! );
//!
//! let artifact = reaper.run_cycle_at(now).unwrap();
//! println!("{}", reaper.metrics().summary());
//! # assert!(artifact.errors.is_empty());
//! ```
//!
//! ## Background Worker
//!
//! See [`ReaperWorker`].
//!
//! # Configuration
//!
//! The Reaper can be configured via TOML:
//!
//! ```toml
//! [reaper]
//! original_tag = "原创"
//! pending_tag = "待删除"
//! exempt_tags = ["_protected"]
//! origin_sites = ["backrooms-wiki"]
//! staff = ["mod-a", "mod-b"]
//! store_path = "data/records.json"
//! output_path = "data/status.json"
//! poll_interval_secs = 1800
//! failure_budget = 5
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod error;
mod metrics;
pub mod notice;
mod reaper;
pub mod report;
mod retry;
pub mod timer;
mod worker;

pub use aggregator::{aggregate, Aggregator};
pub use config::ReaperConfig;
pub use error::ReaperError;
pub use metrics::ReaperMetrics;
pub use reaper::Reaper;
pub use report::{AnnounceRecord, Deviation, ErrorType, PreDeletePage, StatusArtifact};
pub use retry::{RetryPolicy, Retryable};
pub use timer::{TimerCodec, TimerFormat, TimerParseError};
pub use worker::ReaperWorker;
