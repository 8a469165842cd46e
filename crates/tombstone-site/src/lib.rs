//! Tombstone Content Site Layer
//!
//! Implementations of the `ContentSite` trait from `tombstone-domain`.
//!
//! # Sites
//!
//! - `MockSite`: Deterministic in-memory site for testing
//! - `HttpSite`: Blocking HTTP client for a site bridge service
//!
//! # Examples
//!
//! ```
//! use tombstone_site::MockSite;
//! use tombstone_domain::traits::ContentSite;
//! use tombstone_domain::Timestamp;
//!
//! let site = MockSite::new(Timestamp::from_secs(1_700_000_000));
//! assert!(site.probe().is_ok());
//! ```

#![warn(missing_docs)]

pub mod http;
pub mod mock;

pub use http::{HttpSite, HttpSiteConfig};
pub use mock::MockSite;
