//! Announcement aggregation
//!
//! Collapses the cycle's pending-check entries into one record per item. The
//! first entry for an item fetches its details and fixes the hour label; later
//! entries only append their kind (and a `normal` entry refreshes the release
//! score).

use crate::report::AnnounceRecord;
use tombstone_domain::policy::SEVERE_SCORE;
use tombstone_domain::traits::ContentSite;
use tombstone_domain::{EntryKind, PendingCheckEntry, SiteError};

/// Builds announce records from pending-check entries
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<(String, AnnounceRecord)>,
}

impl Aggregator {
    /// Empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entry in, fetching the item on first sight
    pub fn add<C: ContentSite>(
        &mut self,
        site: &C,
        entry: &PendingCheckEntry,
    ) -> Result<(), SiteError> {
        if let Some((_, record)) = self
            .records
            .iter_mut()
            .find(|(name, _)| name == &entry.item_name)
        {
            if entry.kind == EntryKind::Normal {
                record.release_score = entry.release_score;
            }
            record.page_type.push(entry.kind);
            return Ok(());
        }

        let Some(item) = site.get_item(&entry.item_name)? else {
            tracing::warn!(item = %entry.item_name, kind = %entry.kind, "Reported item vanished, skipping");
            return Ok(());
        };
        let context = site.page_source(&item.name)?;
        let record = AnnounceRecord {
            link: item.url,
            title: item.title,
            score: item.score,
            release_score: entry.release_score,
            time: hour_label(entry),
            context,
            page_type: vec![entry.kind],
        };
        self.records.push((entry.item_name.clone(), record));
        Ok(())
    }

    /// Records in first-seen order
    pub fn finish(self) -> Vec<AnnounceRecord> {
        self.records.into_iter().map(|(_, record)| record).collect()
    }
}

/// Hour label for a freshly created record
fn hour_label(entry: &PendingCheckEntry) -> u32 {
    if entry.release_score <= SEVERE_SCORE || entry.kind == EntryKind::Translate {
        24
    } else {
        72
    }
}

/// Aggregate every entry against `site`
pub fn aggregate<C: ContentSite>(
    site: &C,
    entries: &[PendingCheckEntry],
) -> Result<Vec<AnnounceRecord>, SiteError> {
    let mut aggregator = Aggregator::new();
    for entry in entries {
        aggregator.add(site, entry)?;
    }
    Ok(aggregator.finish())
}
