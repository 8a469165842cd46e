//! Core lifecycle reconciler
//!
//! One cycle runs four passes over the site, then garbage-collects the store
//! and aggregates everything that reached the end of its countdown.

use crate::aggregator::aggregate;
use crate::notice::{
    extract_int_after, find_announcement, NoticeKind, NoticeWriter, RECOVERY_MARKER,
    RESCIND_NOTICE, SCORE_MARKER,
};
use crate::report::{CycleReport, CycleStats, Deviation, ErrorType, PassOutput, PreDeletePage};
use crate::timer::TimerCodec;
use crate::{ReaperConfig, ReaperError, ReaperMetrics, StatusArtifact};
use std::fmt::Display;
use std::time::Instant;
use tombstone_domain::policy::{
    self, DERIVATIVE_MIN_AGE_SECS, DERIVATIVE_RATING_CEILING, LONG_INTERVAL_SECS, LOW_SCORE,
    ORIGINAL_RATING_CEILING, SHORT_INTERVAL_SECS,
};
use tombstone_domain::traits::{ContentSite, RecordStore};
use tombstone_domain::{
    DeletionRecord, EntryKind, Item, ItemQuery, PendingCheckEntry, Post, SiteError, Thread,
    Timestamp,
};
use uuid::Uuid;

/// Result of a write after retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    /// The site accepted the write
    Applied,
    /// The site refused it for lack of rights
    Denied,
    /// Every attempt failed with an unrecognized status
    Abandoned,
}

impl WriteOutcome {
    /// Whether local state should follow the write
    fn committed(self) -> bool {
        self != WriteOutcome::Denied
    }
}

/// Deletion countdown reconciler
///
/// Owns the record store and the site handle. Each call to
/// [`run_cycle`](Reaper::run_cycle) is one complete reconciliation.
///
/// # Examples
///
/// ```
/// use tombstone_reaper::{Reaper, ReaperConfig};
/// use tombstone_site::MockSite;
/// use tombstone_store::JsonFileStore;
/// use tombstone_domain::Timestamp;
///
/// let now = Timestamp::from_secs(1_700_000_000);
/// let site = MockSite::new(now);
/// let mut reaper = Reaper::new(ReaperConfig::for_tests(), JsonFileStore::in_memory(), site);
///
/// let artifact = reaper.run_cycle_at(now).unwrap();
/// assert!(artifact.pre_delete_pages.is_empty());
/// ```
pub struct Reaper<S, C> {
    config: ReaperConfig,
    store: S,
    site: C,
    notices: NoticeWriter,
    metrics: ReaperMetrics,
}

impl<S, C> Reaper<S, C>
where
    S: RecordStore,
    S::Error: Display,
    C: ContentSite,
{
    /// Create a new Reaper
    pub fn new(config: ReaperConfig, store: S, site: C) -> Self {
        let notices = NoticeWriter::new(TimerCodec::new(config.timer_base_url.clone()));
        Self {
            config,
            store,
            site,
            notices,
            metrics: ReaperMetrics::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ReaperConfig {
        &self.config
    }

    /// Record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Site handle
    pub fn site(&self) -> &C {
        &self.site
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &ReaperMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run one cycle against the wall clock
    pub fn run_cycle(&mut self) -> Result<StatusArtifact, ReaperError> {
        self.run_cycle_at(Timestamp::now())
    }

    /// Run one cycle as of `now`
    ///
    /// On failure the store is rolled back to its state at cycle start and
    /// nothing is persisted. The artifact is written after the store.
    pub fn run_cycle_at(&mut self, now: Timestamp) -> Result<StatusArtifact, ReaperError> {
        let cycle_id = Uuid::now_v7();
        let span = tracing::info_span!("cycle", id = %cycle_id);
        let _guard = span.enter();
        let started = Instant::now();

        // Any failed probe counts as lost connectivity, whatever the status
        if let Err(e) = self.site.probe() {
            tracing::warn!("Site probe failed: {}", e);
            self.metrics.record_failure();
            let lost = match e {
                SiteError::Connectivity(_) => e,
                other => SiteError::Connectivity(format!("probe failed: {}", other)),
            };
            return Err(lost.into());
        }

        let snapshot = self.store.snapshot();
        let (artifact, stats) = match self.reconcile(now) {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("Cycle aborted, store rolled back: {}", e);
                self.store.restore(snapshot);
                self.metrics.record_failure();
                return Err(e);
            }
        };

        if let Some(path) = &self.config.output_path {
            if let Err(e) = artifact.write_to(path) {
                self.metrics.record_failure();
                return Err(e);
            }
        }

        let runtime_ms = started.elapsed().as_millis() as u64;
        self.metrics
            .record_cycle(&stats, artifact.errors.len(), runtime_ms);
        tracing::info!(
            pending = artifact.pre_delete_pages.len(),
            reported = artifact.deleted_pages.len(),
            deviations = artifact.errors.len(),
            runtime_ms,
            "Cycle completed"
        );
        Ok(artifact)
    }

    fn reconcile(&mut self, now: Timestamp) -> Result<(StatusArtifact, CycleStats), ReaperError> {
        let mut report = CycleReport::new();

        self.run_pass("flag_originals", &mut report, |r, out| r.flag_originals(now, out))?;
        self.run_pass("flag_derivatives", &mut report, |r, out| r.flag_derivatives(now, out))?;
        self.run_pass("reconcile_flagged", &mut report, |r, out| r.reconcile_flagged(now, out))?;
        self.run_pass("sweep_deleted", &mut report, |r, out| r.sweep_deleted(out))?;
        self.run_pass("collect_garbage", &mut report, |r, out| r.collect_garbage(out))?;

        let deleted_pages = self
            .config
            .pass_retry()
            .run("aggregate", || aggregate(&self.site, &report.pending).map_err(ReaperError::from))?;

        self.store
            .flush()
            .map_err(|e| ReaperError::Store(e.to_string()))?;

        let stats = report.stats;
        Ok((report.into_artifact(deleted_pages, now), stats))
    }

    /// Run a pass under the pass retry policy
    ///
    /// Each attempt starts from the store as it was before the pass, and its
    /// output reaches the report only when the attempt succeeds.
    fn run_pass<F>(
        &mut self,
        name: &str,
        report: &mut CycleReport,
        mut pass: F,
    ) -> Result<(), ReaperError>
    where
        F: FnMut(&mut Self, &mut PassOutput) -> Result<(), ReaperError>,
    {
        let policy = self.config.pass_retry();
        let output = policy.run(name, || {
            let before = self.store.snapshot();
            let mut output = PassOutput::new();
            match pass(self, &mut output) {
                Ok(()) => Ok(output),
                Err(e) => {
                    self.store.restore(before);
                    Err(e)
                }
            }
        })?;
        tracing::debug!(
            pass = name,
            pending = output.pending.len(),
            deviations = output.deviations.len(),
            "Pass finished"
        );
        report.absorb(output);
        Ok(())
    }

    fn excluded_tags(&self, with: &[&String]) -> Vec<String> {
        with.iter()
            .map(|tag| tag.to_string())
            .chain(self.config.exempt_tags.iter().cloned())
            .collect()
    }

    /// Pass A: open countdowns on low-rated or matured originals
    fn flag_originals(&mut self, now: Timestamp, out: &mut PassOutput) -> Result<(), ReaperError> {
        let query = ItemQuery {
            tags_all: vec![self.config.original_tag.clone()],
            tags_none: self.excluded_tags(&[&self.config.pending_tag]),
            rating_below: Some(ORIGINAL_RATING_CEILING),
            ..ItemQuery::default()
        };
        for item in self.site.search_items(&query)? {
            if item.category == self.config.deleted_category {
                continue;
            }
            if self.store.delete(&item.id).is_some() {
                tracing::debug!(item = %item.name, "Dropped leftover record");
            }
            let Some(interval) = policy::original_interval_secs(item.score, item.age_secs(now))
            else {
                continue;
            };
            let deadline = now.plus_secs(interval);
            let body = self.notices.normal(item.score, deadline);
            self.open_countdown(&item, &body, out)?;
        }
        Ok(())
    }

    /// Pass B: open 24h countdowns on low-rated derivatives
    fn flag_derivatives(&mut self, now: Timestamp, out: &mut PassOutput) -> Result<(), ReaperError> {
        let query = ItemQuery {
            tags_none: self.excluded_tags(&[&self.config.original_tag, &self.config.pending_tag]),
            rating_below: Some(DERIVATIVE_RATING_CEILING),
            min_age_secs: Some(DERIVATIVE_MIN_AGE_SECS),
            ..ItemQuery::default()
        };
        'items: for item in self.site.search_items(&query)? {
            if item.category == self.config.deleted_category {
                continue;
            }
            if self.store.delete(&item.id).is_some() {
                tracing::debug!(item = %item.name, "Dropped leftover record");
            }
            for origin in &self.config.origin_sites {
                if self.site.exists_on(origin, &item.name)? {
                    tracing::info!(item = %item.name, origin = %origin, "Found on origin site, retagging as original");
                    let tags = item.tags_with(&self.config.original_tag);
                    self.set_tags(&item, &tags, out)?;
                    continue 'items;
                }
            }
            let body = self.notices.translate(now.plus_secs(SHORT_INTERVAL_SECS));
            self.open_countdown(&item, &body, out)?;
        }
        Ok(())
    }

    /// Post the announcement, then tag the item once the post exists
    fn open_countdown(&self, item: &Item, body: &str, out: &mut PassOutput) -> Result<(), ReaperError> {
        let thread = self.thread_of(item)?;
        let posts = self.site.list_posts(&thread.id)?;
        let post = find_announcement(&posts, &self.config.staff);
        if self.publish(item, &thread, post, body, out)? != WriteOutcome::Applied {
            return Ok(());
        }
        let tags = item.tags_with(&self.config.pending_tag);
        if self.set_tags(item, &tags, out)? == WriteOutcome::Applied {
            tracing::info!(item = %item.name, score = item.score, "Countdown opened");
            out.stats.flagged += 1;
        }
        Ok(())
    }

    /// Pass C: re-evaluate every running countdown
    fn reconcile_flagged(&mut self, now: Timestamp, out: &mut PassOutput) -> Result<(), ReaperError> {
        let query = ItemQuery {
            tags_all: vec![self.config.pending_tag.clone()],
            tags_none: self.config.exempt_tags.clone(),
            ..ItemQuery::default()
        };
        for item in self.site.search_items(&query)? {
            self.reconcile_item(&item, now, out)?;
        }
        Ok(())
    }

    fn reconcile_item(&mut self, item: &Item, now: Timestamp, out: &mut PassOutput) -> Result<(), ReaperError> {
        let original = item.has_tag(&self.config.original_tag);
        let thread = self.thread_of(item)?;
        let posts = self.site.list_posts(&thread.id)?;

        let Some(post) = find_announcement(&posts, &self.config.staff).cloned() else {
            tracing::warn!(item = %item.name, "Flagged without an announcement, clearing flag");
            self.clear_flag(item, out)?;
            return Ok(());
        };
        if post.body.contains(RECOVERY_MARKER) {
            tracing::info!(item = %item.name, "Countdown already stopped, clearing flag");
            self.clear_flag(item, out)?;
            return Ok(());
        }

        let decoded = match TimerCodec::decode_body(&post.body) {
            Ok(deadline) => deadline,
            Err(e) => {
                tracing::warn!(item = %item.name, "Skipping item: {}", e);
                out.record_deviation(parse_deviation(item, &thread, &post));
                return Ok(());
            }
        };

        let stored = self.store.get(&item.id);
        let (page_score, decoded) = match NoticeKind::of(&post.body) {
            NoticeKind::Normal => match extract_int_after(&post.body, SCORE_MARKER) {
                Some(score) => (score, decoded),
                None => {
                    tracing::warn!(item = %item.name, "Skipping item: unreadable score");
                    out.record_deviation(parse_deviation(item, &thread, &post));
                    return Ok(());
                }
            },
            NoticeKind::Translate | NoticeKind::Rescinded if original => {
                tracing::info!(item = %item.name, "Translate notice on an original, rewriting");
                let deadline = now.plus_secs(LONG_INTERVAL_SECS);
                let body = self.notices.normal(LOW_SCORE, deadline);
                if !self.publish(item, &thread, Some(&post), &body, out)?.committed() {
                    return Ok(());
                }
                (LOW_SCORE, deadline)
            }
            NoticeKind::Translate | NoticeKind::Rescinded => (
                stored.as_ref().map_or(item.score, |r| r.release_score),
                decoded,
            ),
        };

        let deadline = policy::resolve_deadline(
            page_score,
            decoded,
            stored.map(|r| r.deadline),
            now,
        );
        let mut record = DeletionRecord::new(page_score, deadline, item.name.clone());
        self.store.put(item.id.clone(), record.clone());

        if policy::should_rescind(original, item.score, item.age_secs(now)) {
            if !self
                .publish(item, &thread, Some(&post), RESCIND_NOTICE, out)?
                .committed()
            {
                return Ok(());
            }
            if self.clear_flag(item, out)?.committed() {
                tracing::info!(item = %item.name, score = item.score, "Countdown rescinded");
                out.stats.rescinded += 1;
            }
            return Ok(());
        }

        if policy::should_widen(record.release_score, item.score, original) {
            let body = self.notices.normal(item.score, record.deadline);
            if self.publish(item, &thread, Some(&post), &body, out)?.committed() {
                tracing::info!(item = %item.name, score = item.score, "Countdown widened to 72h");
                record.release_score = item.score;
                self.store.put(item.id.clone(), record.clone());
                out.stats.widened += 1;
            }
        } else if policy::should_tighten(record.release_score, record.deadline, item.score, original, now) {
            let tightened = now.plus_secs(SHORT_INTERVAL_SECS);
            let body = self.notices.normal(item.score, tightened);
            if self.publish(item, &thread, Some(&post), &body, out)?.committed() {
                tracing::info!(item = %item.name, score = item.score, "Countdown tightened to 24h");
                record.release_score = item.score;
                record.deadline = tightened;
                self.store.put(item.id.clone(), record.clone());
                out.stats.tightened += 1;
            }
        }

        if record.is_expired(now) {
            tracing::info!(item = %item.name, "Countdown expired");
            out.enqueue(PendingCheckEntry::new(
                item.name.clone(),
                record.release_score,
                EntryKind::expiry(original),
            ));
        } else {
            out.pre_delete.push(PreDeletePage {
                link: item.url.clone(),
                title: item.title.clone(),
                score: item.score,
                release_score: record.release_score,
                time: if original { record.interval_hours() } else { 24 },
                discuss_link: thread.url.clone(),
                thread_id: thread.id.clone(),
                post_id: post.id.clone(),
                is_original: original,
                timestamp: record.deadline.as_secs_f64(),
            });
        }
        if policy::below_floor(item.score) {
            out.enqueue(PendingCheckEntry::new(
                item.name.clone(),
                record.release_score,
                EntryKind::MinusThirty,
            ));
        }
        Ok(())
    }

    /// Pass D: report everything already in the deleted bucket
    fn sweep_deleted(&mut self, out: &mut PassOutput) -> Result<(), ReaperError> {
        let query = ItemQuery {
            category: Some(self.config.deleted_category.clone()),
            ..ItemQuery::default()
        };
        for item in self.site.search_items(&query)? {
            out.enqueue(PendingCheckEntry::new(item.name, item.score, EntryKind::Deleted));
        }
        Ok(())
    }

    /// Drop records whose item no longer resolves
    fn collect_garbage(&mut self, out: &mut PassOutput) -> Result<(), ReaperError> {
        for id in self.store.ids() {
            let Some(record) = self.store.get(&id) else {
                continue;
            };
            if self.site.get_item(&record.item_ref)?.is_none() {
                tracing::debug!(item = %record.item_ref, "Collected stale record");
                self.store.delete(&id);
                out.stats.collected += 1;
            }
        }
        Ok(())
    }

    /// Remove the pending tag and, unless refused, the record
    fn clear_flag(&mut self, item: &Item, out: &mut PassOutput) -> Result<WriteOutcome, ReaperError> {
        let tags = item.tags_without(&self.config.pending_tag);
        let outcome = self.set_tags(item, &tags, out)?;
        if outcome.committed() {
            self.store.delete(&item.id);
        }
        Ok(outcome)
    }

    fn thread_of(&self, item: &Item) -> Result<Thread, ReaperError> {
        Ok(self
            .config
            .write_retry()
            .run("discussion_thread", || self.site.discussion_thread(&item.id))?)
    }

    /// Create the announcement, or overwrite it when one exists
    fn publish(
        &self,
        item: &Item,
        thread: &Thread,
        post: Option<&Post>,
        body: &str,
        out: &mut PassOutput,
    ) -> Result<WriteOutcome, ReaperError> {
        let target = WriteTarget {
            item,
            thread: Some(thread),
            post_id: post.map(|p| p.id.as_str()),
        };
        match post {
            Some(post) => self.write(target, body, out, || {
                self.site.edit_post(&thread.id, &post.id, body)
            }),
            None => self.write(target, body, out, || {
                self.site
                    .create_post(&thread.id, &self.config.announcement_title, body)
            }),
        }
    }

    fn set_tags(&self, item: &Item, tags: &[String], out: &mut PassOutput) -> Result<WriteOutcome, ReaperError> {
        let content = tags.join(" ");
        let target = WriteTarget {
            item,
            thread: None,
            post_id: None,
        };
        self.write(target, &content, out, || self.site.edit_tags(&item.id, tags))
    }

    /// Apply a write under the write retry policy
    ///
    /// Permission and unrecognized failures become deviations. Connectivity
    /// loss aborts the pass.
    fn write<F>(
        &self,
        target: WriteTarget<'_>,
        content: &str,
        out: &mut PassOutput,
        op: F,
    ) -> Result<WriteOutcome, ReaperError>
    where
        F: FnMut() -> Result<(), SiteError>,
    {
        let thread_id = target.thread.map(|t| t.id.as_str());
        let error_type = match self.config.write_retry().run("write", op) {
            Ok(()) => {
                out.record_success(thread_id, content);
                return Ok(WriteOutcome::Applied);
            }
            Err(e) if e.is_connectivity() => return Err(e.into()),
            Err(SiteError::PermissionDenied(reason)) => {
                tracing::warn!(item = %target.item.name, "Write refused: {}", reason);
                ErrorType::PermissionError
            }
            Err(e) => {
                tracing::warn!(item = %target.item.name, "Write abandoned: {}", e);
                ErrorType::UnknownWriteFailure
            }
        };
        out.record_deviation(Deviation {
            item: target.item.name.clone(),
            thread_id: thread_id.map(str::to_string),
            post_id: target.post_id.map(str::to_string),
            content: content.to_string(),
            url: target
                .thread
                .map_or_else(|| target.item.url.clone(), |t| t.url.clone()),
            error_type,
        });
        Ok(match error_type {
            ErrorType::PermissionError => WriteOutcome::Denied,
            _ => WriteOutcome::Abandoned,
        })
    }
}

/// What a write touches, for deviation reporting
struct WriteTarget<'a> {
    item: &'a Item,
    thread: Option<&'a Thread>,
    post_id: Option<&'a str>,
}

fn parse_deviation(item: &Item, thread: &Thread, post: &Post) -> Deviation {
    Deviation {
        item: item.name.clone(),
        thread_id: Some(thread.id.clone()),
        post_id: Some(post.id.clone()),
        content: post.body.clone(),
        url: thread.url.clone(),
        error_type: ErrorType::ParseError,
    }
}
