//! Item module - the wiki pages the deletion policy applies to

use crate::Timestamp;
use std::fmt;

/// Opaque identifier the hosting site assigns to a page
///
/// The site's page ids are stable across renames, so the record store keys on
/// this rather than on the page name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a raw site identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A page as seen through the content site
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Site-assigned identifier
    pub id: ItemId,

    /// Stable page name (slug), used as the item reference everywhere else
    pub name: String,

    /// Display title
    pub title: String,

    /// Absolute page URL
    pub url: String,

    /// Current community rating
    pub score: i64,

    /// When the page was created
    pub created_at: Timestamp,

    /// Page tags
    pub tags: Vec<String>,

    /// Page category (e.g. `_default`, `deleted`)
    pub category: String,
}

impl Item {
    /// Whether the page carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Seconds since the page was created
    pub fn age_secs(&self, now: Timestamp) -> i64 {
        now.secs_since(self.created_at)
    }

    /// Tag set with `tag` added (no-op if already present)
    pub fn tags_with(&self, tag: &str) -> Vec<String> {
        let mut tags = self.tags.clone();
        if !self.has_tag(tag) {
            tags.push(tag.to_string());
        }
        tags
    }

    /// Tag set with every occurrence of `tag` removed
    pub fn tags_without(&self, tag: &str) -> Vec<String> {
        self.tags.iter().filter(|t| *t != tag).cloned().collect()
    }
}

/// Query criteria for searching items on the site
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    /// Item must carry every one of these tags
    pub tags_all: Vec<String>,

    /// Item must carry none of these tags
    pub tags_none: Vec<String>,

    /// Restrict to one category
    pub category: Option<String>,

    /// Strict upper bound on the rating
    pub rating_below: Option<i64>,

    /// Minimum age in seconds
    pub min_age_secs: Option<i64>,
}

impl ItemQuery {
    /// Whether `item` satisfies the query at instant `now`
    ///
    /// Site implementations that cannot filter server-side use this to filter
    /// locally, so the semantics stay identical across implementations.
    pub fn matches(&self, item: &Item, now: Timestamp) -> bool {
        if !self.tags_all.iter().all(|t| item.has_tag(t)) {
            return false;
        }
        if self.tags_none.iter().any(|t| item.has_tag(t)) {
            return false;
        }
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(bound) = self.rating_below {
            if item.score >= bound {
                return false;
            }
        }
        if let Some(min_age) = self.min_age_secs {
            if item.age_secs(now) < min_age {
                return false;
            }
        }
        true
    }
}

/// Discussion thread attached to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    /// Site-assigned thread id
    pub id: String,

    /// Public URL of the thread
    pub url: String,
}

/// A forum post in a discussion thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Site-assigned post id
    pub id: String,

    /// Post title
    pub title: String,

    /// Author account name
    pub author: String,

    /// Post source text
    pub body: String,
}
