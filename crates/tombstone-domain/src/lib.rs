//! Tombstone Domain Layer
//!
//! Core model for the deletion-countdown workflow. This crate has no external
//! dependencies and holds the value types, the fixed policy thresholds and the
//! trait seams that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Item**: a wiki page whose retention depends on its community score
//! - **DeletionRecord**: the locally cached state of an open countdown
//! - **PendingCheckEntry**: one reason, found during a cycle, to report an item
//! - **ContentSite**: the only door to the hosting site (reads and writes)
//! - **RecordStore**: persisted mapping from item id to deletion record
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business rules only (see [`policy`])
//! - Infrastructure implementations live in `tombstone-store` and `tombstone-site`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod item;
pub mod policy;
pub mod record;
pub mod time;
pub mod traits;

// Re-exports for convenience
pub use entry::{EntryKind, PendingCheckEntry};
pub use error::SiteError;
pub use item::{Item, ItemId, ItemQuery, Post, Thread};
pub use record::DeletionRecord;
pub use time::Timestamp;
