//! Cycle accumulators and the published status artifact
//!
//! Each pass fills its own [`PassOutput`]. The cycle folds a pass's output into
//! the [`CycleReport`] only once the pass has succeeded, so a retried pass
//! never leaves duplicate rows behind. The report is rebuilt every cycle.

use crate::ReaperError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tombstone_domain::{EntryKind, PendingCheckEntry, Timestamp};

/// Operator-facing failure classes
///
/// The reaper itself only records rows for permission, parse and unknown
/// write failures. `StaleReference` and `TransientNetwork` complete the wire
/// taxonomy so that documents from any producer deserialize: stale records are
/// collected without a row, and lost connectivity aborts the cycle before an
/// artifact is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The site refused a write for lack of rights
    PermissionError,
    /// Deadline or score text in a post was unreadable
    ParseError,
    /// A record pointed at an item that no longer exists; never recorded
    StaleReference,
    /// The site could not be reached; never recorded
    TransientNetwork,
    /// A write kept failing with an unrecognized status
    UnknownWriteFailure,
}

impl ErrorType {
    /// Wire name, as written into the artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::PermissionError => "permission_error",
            ErrorType::ParseError => "parse_error",
            ErrorType::StaleReference => "stale_reference",
            ErrorType::TransientNetwork => "transient_network",
            ErrorType::UnknownWriteFailure => "unknown_write_failure",
        }
    }
}

/// A write or read the engine could not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deviation {
    /// Item name
    pub item: String,
    /// Discussion thread, when the failure concerns a post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Post within the thread, when one existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// Content that was being written, or the text that failed to parse
    pub content: String,
    /// Where an operator can fix it by hand
    pub url: String,
    /// Failure class
    pub error_type: ErrorType,
}

impl Deviation {
    fn same_write(&self, thread_id: Option<&str>, content: &str) -> bool {
        self.thread_id.as_deref() == thread_id && self.content == content
    }
}

/// An item whose countdown is still running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreDeletePage {
    /// Item URL
    pub link: String,
    /// Item title
    pub title: String,
    /// Live score
    pub score: i64,
    /// Score the countdown length was fixed at
    pub release_score: i64,
    /// Countdown length label in hours (72 or 24)
    pub time: u32,
    /// Discussion thread URL
    pub discuss_link: String,
    /// Discussion thread id
    pub thread_id: String,
    /// Announcement post id
    pub post_id: String,
    /// Whether the item is an original
    #[serde(rename = "isOriginal")]
    pub is_original: bool,
    /// Deadline in epoch seconds
    pub timestamp: f64,
}

/// An item reported for final deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnounceRecord {
    /// Item URL
    pub link: String,
    /// Item title
    pub title: String,
    /// Live score when the record was built
    pub score: i64,
    /// Score from the triggering entry, replaced by any later `normal` entry
    pub release_score: i64,
    /// Countdown length label in hours, fixed by the first entry
    pub time: u32,
    /// Raw page source
    pub context: String,
    /// Every reason the item was reported, in arrival order
    #[serde(with = "kind_list")]
    pub page_type: Vec<EntryKind>,
}

mod kind_list {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use tombstone_domain::EntryKind;

    pub fn serialize<S: Serializer>(kinds: &[EntryKind], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(kinds.iter().map(EntryKind::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<EntryKind>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|raw| {
                EntryKind::parse(raw).ok_or_else(|| D::Error::custom(format!("unknown kind {}", raw)))
            })
            .collect()
    }
}

/// Document served by the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusArtifact {
    /// Countdowns still running
    pub pre_delete_pages: Vec<PreDeletePage>,
    /// Items reported for deletion
    pub deleted_pages: Vec<AnnounceRecord>,
    /// Deviations left after de-duplication
    pub errors: Vec<Deviation>,
    /// Epoch seconds of the cycle that produced this document
    pub update_timestamp: f64,
}

impl StatusArtifact {
    /// Write the artifact to `path` atomically
    ///
    /// The document goes to a temporary sibling first and is renamed over
    /// the target, so readers never see a half-written file.
    pub fn write_to(&self, path: &Path) -> Result<(), ReaperError> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// What happened to items during a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
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
    /// Stale records dropped
    pub collected: usize,
}

impl CycleStats {
    fn add(&mut self, other: &CycleStats) {
        self.flagged += other.flagged;
        self.rescinded += other.rescinded;
        self.widened += other.widened;
        self.tightened += other.tightened;
        self.expired += other.expired;
        self.collected += other.collected;
    }
}

/// Output of a single pass attempt
#[derive(Debug, Clone, Default)]
pub struct PassOutput {
    /// Countdowns still running
    pub pre_delete: Vec<PreDeletePage>,
    /// Entries for the aggregator
    pub pending: Vec<PendingCheckEntry>,
    /// Failures recorded during the pass
    pub deviations: Vec<Deviation>,
    /// Counters
    pub stats: CycleStats,
    successes: Vec<(Option<String>, String)>,
}

impl PassOutput {
    /// Empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure
    pub fn record_deviation(&mut self, deviation: Deviation) {
        tracing::warn!(
            item = %deviation.item,
            error_type = ?deviation.error_type,
            "Recorded deviation"
        );
        self.deviations.push(deviation);
    }

    /// Record a successful write, clearing earlier failures of the same write
    pub fn record_success(&mut self, thread_id: Option<&str>, content: &str) {
        self.deviations.retain(|d| !d.same_write(thread_id, content));
        self.successes
            .push((thread_id.map(str::to_string), content.to_string()));
    }

    /// Queue an entry for the aggregator
    pub fn enqueue(&mut self, entry: PendingCheckEntry) {
        if entry.kind == EntryKind::Normal || entry.kind == EntryKind::Translate {
            self.stats.expired += 1;
        }
        self.pending.push(entry);
    }
}

/// Everything one cycle produced, threaded through the passes
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Countdowns still running
    pub pre_delete: Vec<PreDeletePage>,
    /// Entries for the aggregator, in arrival order
    pub pending: Vec<PendingCheckEntry>,
    /// Deviations that were not cleared by a later success
    pub deviations: Vec<Deviation>,
    /// Counters across all passes
    pub stats: CycleStats,
}

impl CycleReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a successful pass into the report
    pub fn absorb(&mut self, output: PassOutput) {
        for (thread_id, content) in &output.successes {
            self.deviations
                .retain(|d| !d.same_write(thread_id.as_deref(), content));
        }
        self.pre_delete.extend(output.pre_delete);
        self.pending.extend(output.pending);
        self.deviations.extend(output.deviations);
        self.stats.add(&output.stats);
    }

    /// Final document for this cycle
    pub fn into_artifact(self, deleted_pages: Vec<AnnounceRecord>, now: Timestamp) -> StatusArtifact {
        StatusArtifact {
            pre_delete_pages: self.pre_delete,
            deleted_pages,
            errors: self.deviations,
            update_timestamp: now.as_secs_f64(),
        }
    }
}
