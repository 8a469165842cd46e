//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{DeletionRecord, Item, ItemId, ItemQuery, Post, SiteError, Thread};
use std::collections::BTreeMap;

/// Capability interface to the hosting site
///
/// Every call is synchronous and may block on network I/O. Mutating calls
/// report `Ok(())` on success and a classified [`SiteError`] otherwise.
///
/// Implemented by the infrastructure layer (tombstone-site)
pub trait ContentSite {
    /// Cheap reachability check
    fn probe(&self) -> Result<(), SiteError>;

    /// Items matching the query
    fn search_items(&self, query: &ItemQuery) -> Result<Vec<Item>, SiteError>;

    /// Look up an item by page name; `None` if it no longer exists
    fn get_item(&self, name: &str) -> Result<Option<Item>, SiteError>;

    /// Raw source text of a page
    fn page_source(&self, name: &str) -> Result<String, SiteError>;

    /// Whether a page with this name exists on another site
    fn exists_on(&self, site: &str, name: &str) -> Result<bool, SiteError>;

    /// Discussion thread of an item, created if absent
    fn discussion_thread(&self, id: &ItemId) -> Result<Thread, SiteError>;

    /// All posts of a thread, in thread order
    fn list_posts(&self, thread_id: &str) -> Result<Vec<Post>, SiteError>;

    /// Add a post to a thread
    fn create_post(&self, thread_id: &str, title: &str, body: &str) -> Result<(), SiteError>;

    /// Replace the body of an existing post
    fn edit_post(&self, thread_id: &str, post_id: &str, body: &str) -> Result<(), SiteError>;

    /// Replace the tag set of an item
    fn edit_tags(&self, id: &ItemId, tags: &[String]) -> Result<(), SiteError>;
}

/// Persisted form of a record store
pub type StoreSnapshot = BTreeMap<ItemId, DeletionRecord>;

/// Trait for storing and retrieving deletion records
///
/// Implemented by the infrastructure layer (tombstone-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Record for an item, if any
    fn get(&self, id: &ItemId) -> Option<DeletionRecord>;

    /// Insert or replace the record for an item
    fn put(&mut self, id: ItemId, record: DeletionRecord);

    /// Remove the record for an item, returning it
    fn delete(&mut self, id: &ItemId) -> Option<DeletionRecord>;

    /// Ids of every stored record
    fn ids(&self) -> Vec<ItemId>;

    /// Copy of the full store contents
    fn snapshot(&self) -> StoreSnapshot;

    /// Replace the full store contents
    fn restore(&mut self, snapshot: StoreSnapshot);

    /// Write the current contents to durable storage
    fn flush(&mut self) -> Result<(), Self::Error>;
}
