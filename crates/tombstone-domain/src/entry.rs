//! Pending-check entries - reasons to report an item, collected per cycle

use std::fmt;

/// Why an item is being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Score-based countdown on an original item expired
    Normal,

    /// Countdown on a derivative (translated) item expired
    Translate,

    /// Live score at or below the minus-thirty floor
    MinusThirty,

    /// Item already sits in the deleted category
    Deleted,
}

impl EntryKind {
    /// Wire name used in the output artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Normal => "normal",
            EntryKind::Translate => "translate",
            EntryKind::MinusThirty => "minusThirty",
            EntryKind::Deleted => "deleted",
        }
    }

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(EntryKind::Normal),
            "translate" => Some(EntryKind::Translate),
            "minusThirty" => Some(EntryKind::MinusThirty),
            "deleted" => Some(EntryKind::Deleted),
            _ => None,
        }
    }

    /// Expiry kind for an item, depending on whether it is original
    pub fn expiry(original: bool) -> Self {
        if original {
            EntryKind::Normal
        } else {
            EntryKind::Translate
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(item name, release score, kind)`, built fresh each cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheckEntry {
    /// Page name
    pub item_name: String,

    /// Release score carried into the report
    pub release_score: i64,

    /// Trigger reason
    pub kind: EntryKind,
}

impl PendingCheckEntry {
    /// Create an entry
    pub fn new(item_name: impl Into<String>, release_score: i64, kind: EntryKind) -> Self {
        Self {
            item_name: item_name.into(),
            release_score,
            kind,
        }
    }
}
