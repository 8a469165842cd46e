//! Integration tests for tombstone-reaper
//!
//! These tests drive whole cycles against the in-memory site and check the
//! tags, posts, records and artifact left behind.

use tombstone_domain::traits::RecordStore;
use tombstone_domain::{DeletionRecord, EntryKind, Item, ItemId, Post, SiteError, Timestamp};
use tombstone_reaper::notice::{NoticeWriter, ANNOUNCEMENT_TITLE, RESCIND_NOTICE};
use tombstone_reaper::{ErrorType, Reaper, ReaperConfig, StatusArtifact, TimerCodec};
use tombstone_site::MockSite;
use tombstone_store::JsonFileStore;

const NOW: Timestamp = Timestamp::from_secs(1_700_000_000);
const DAY: i64 = 86_400;
const ORIGINAL: &str = "原创";
const PENDING: &str = "待删除";

fn item(id: &str, score: i64, age_secs: i64, tags: &[&str]) -> Item {
    Item {
        id: ItemId::new(id),
        name: format!("page-{}", id),
        title: format!("Page {}", id),
        url: format!("http://wiki.test/page-{}", id),
        score,
        created_at: NOW.plus_secs(-age_secs),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: "_default".to_string(),
    }
}

fn announce(site: &MockSite, id: &str, body: &str) {
    site.add_post(
        &ItemId::new(id),
        Post {
            id: format!("p-{}", id),
            title: ANNOUNCEMENT_TITLE.to_string(),
            author: "mod-a".to_string(),
            body: body.to_string(),
        },
    );
}

fn reaper_with(site: &MockSite, store: JsonFileStore) -> Reaper<JsonFileStore, MockSite> {
    Reaper::new(ReaperConfig::for_tests(), store, site.clone())
}

fn reaper(site: &MockSite) -> Reaper<JsonFileStore, MockSite> {
    reaper_with(site, JsonFileStore::in_memory())
}

fn record(reaper: &Reaper<JsonFileStore, MockSite>, id: &str) -> Option<DeletionRecord> {
    reaper.store().get(&ItemId::new(id))
}

fn run(reaper: &mut Reaper<JsonFileStore, MockSite>, site: &MockSite, at: Timestamp) -> StatusArtifact {
    site.set_now(at);
    reaper.run_cycle_at(at).unwrap()
}

#[test]
fn test_severe_original_gets_baseline_extension() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -12, 2 * DAY, &[ORIGINAL, PENDING]));
    let decoded = NOW.plus_secs(100_000);
    announce(&site, "1", &NoticeWriter::default().normal(-12, decoded));
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    let expected = decoded.plus_secs(172_800);
    assert_eq!(
        record(&reaper, "1"),
        Some(DeletionRecord::new(-12, expected, "page-1"))
    );
    assert_eq!(artifact.pre_delete_pages.len(), 1);
    let page = &artifact.pre_delete_pages[0];
    assert_eq!(page.time, 24);
    assert_eq!(page.release_score, -12);
    assert_eq!(page.timestamp, expected.as_secs_f64());
    assert_eq!(page.thread_id, "t-1");
    assert_eq!(page.post_id, "p-1");
    assert!(page.is_original);
    assert!(artifact.deleted_pages.is_empty());
}

#[test]
fn test_reconcile_is_idempotent() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -12, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-12, NOW.plus_secs(100_000)));
    let mut reaper = reaper(&site);

    run(&mut reaper, &site, NOW);
    let first_record = record(&reaper, "1");
    let first_posts = site.posts(&ItemId::new("1"));

    run(&mut reaper, &site, NOW.plus_secs(1));
    assert_eq!(record(&reaper, "1"), first_record);
    assert_eq!(site.posts(&ItemId::new("1")), first_posts);
    assert_eq!(site.item("page-1").unwrap().tags, vec![ORIGINAL, PENDING]);
    assert_eq!(site.write_count(), 0);
}

#[test]
fn test_recovered_original_is_rescinded() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", 6, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-3, NOW.plus_secs(DAY)));
    let mut store = JsonFileStore::in_memory();
    store.put(ItemId::new("1"), DeletionRecord::new(-3, NOW.plus_secs(DAY), "page-1"));
    let mut reaper = reaper_with(&site, store);

    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "1"), None);
    assert!(!site.item("page-1").unwrap().has_tag(PENDING));
    assert_eq!(site.posts(&ItemId::new("1"))[0].body, RESCIND_NOTICE);
    assert!(artifact.pre_delete_pages.is_empty());
    assert!(artifact.deleted_pages.is_empty());
    assert_eq!(reaper.metrics().rescinded, 1);
}

#[test]
fn test_flagging_posts_then_tags() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 2 * DAY, &[ORIGINAL]));
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    let posts = site.posts(&ItemId::new("1"));
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, ANNOUNCEMENT_TITLE);
    assert!(posts[0].body.contains("条目的分数为-4分"));
    assert_eq!(TimerCodec::decode_body(&posts[0].body).unwrap(), NOW.plus_secs(3 * DAY));
    assert!(site.item("page-1").unwrap().has_tag(PENDING));

    // The same cycle picks the new countdown up
    assert_eq!(
        record(&reaper, "1"),
        Some(DeletionRecord::new(-4, NOW.plus_secs(3 * DAY), "page-1"))
    );
    assert_eq!(artifact.pre_delete_pages[0].time, 72);
    assert_eq!(reaper.metrics().flagged, 1);
}

#[test]
fn test_severe_original_flagged_for_a_day() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -15, 2 * DAY, &[ORIGINAL]));
    let mut reaper = reaper(&site);

    run(&mut reaper, &site, NOW);

    let body = &site.posts(&ItemId::new("1"))[0].body;
    assert_eq!(TimerCodec::decode_body(body).unwrap(), NOW.plus_secs(DAY));
}

#[test]
fn test_matured_original_is_flagged() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", 3, 31 * DAY, &[ORIGINAL]));
    site.add_item(item("2", -1, 5 * DAY, &[ORIGINAL]));
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    let body = &site.posts(&ItemId::new("1"))[0].body;
    assert!(body.contains("且距离发布时间已满1个月"));
    assert!(site.item("page-1").unwrap().has_tag(PENDING));
    assert_eq!(artifact.pre_delete_pages.len(), 1);

    // Young and only slightly negative: not eligible
    assert!(site.posts(&ItemId::new("2")).is_empty());
    assert!(!site.item("page-2").unwrap().has_tag(PENDING));
}

#[test]
fn test_denied_post_leaves_item_untagged() {
    let site = MockSite::new(NOW);
    site.add_item(item("2", -4, 2 * DAY, &[ORIGINAL]));
    site.deny("t-2");
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    assert!(!site.item("page-2").unwrap().has_tag(PENDING));
    assert_eq!(artifact.errors.len(), 1);
    assert_eq!(artifact.errors[0].error_type, ErrorType::PermissionError);
    assert_eq!(artifact.errors[0].thread_id.as_deref(), Some("t-2"));
    assert_eq!(record(&reaper, "2"), None);
}

#[test]
fn test_derivative_flagging_and_origin_disambiguation() {
    let site = MockSite::new(NOW);
    site.add_item(item("5", -1, 2 * DAY, &[]));
    site.add_item(item("6", -3, 2 * DAY, &[]));
    site.add_item(item("7", -3, DAY / 2, &[]));
    site.add_origin("origin-wiki", "page-6");
    let mut config = ReaperConfig::for_tests();
    config.origin_sites = vec!["origin-wiki".to_string()];
    let mut reaper = Reaper::new(config, JsonFileStore::in_memory(), site.clone());

    let artifact = run(&mut reaper, &site, NOW);

    let posts = site.posts(&ItemId::new("5"));
    assert!(posts[0].body.contains("由于翻译质量不佳"));
    assert_eq!(TimerCodec::decode_body(&posts[0].body).unwrap(), NOW.plus_secs(DAY));
    assert!(site.item("page-5").unwrap().has_tag(PENDING));
    assert_eq!(record(&reaper, "5").unwrap().release_score, -1);
    assert_eq!(artifact.pre_delete_pages.len(), 1);
    assert_eq!(artifact.pre_delete_pages[0].time, 24);
    assert!(!artifact.pre_delete_pages[0].is_original);

    // Exists on an origin site: retagged, flagging deferred
    let retagged = site.item("page-6").unwrap();
    assert!(retagged.has_tag(ORIGINAL));
    assert!(!retagged.has_tag(PENDING));
    assert!(site.posts(&ItemId::new("6")).is_empty());

    // Too young
    assert!(site.posts(&ItemId::new("7")).is_empty());
}

#[test]
fn test_widening_keeps_deadline() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -12, 5 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-12, NOW.plus_secs(50_000)));
    let mut reaper = reaper(&site);

    run(&mut reaper, &site, NOW);
    let before = record(&reaper, "1").unwrap();
    assert_eq!(before.deadline, NOW.plus_secs(50_000 + 172_800));

    site.set_score("page-1", -8);
    let artifact = run(&mut reaper, &site, NOW.plus_secs(1800));

    let after = record(&reaper, "1").unwrap();
    assert!(after.deadline >= before.deadline);
    assert_eq!(after.release_score, -8);
    let body = &site.posts(&ItemId::new("1"))[0].body;
    assert!(body.contains("条目的分数为-8分"));
    assert_eq!(TimerCodec::decode_body(body).unwrap(), before.deadline);
    assert_eq!(artifact.pre_delete_pages[0].time, 72);
    assert_eq!(reaper.metrics().widened, 1);

    // Settles: another cycle changes nothing
    let writes = site.write_count();
    run(&mut reaper, &site, NOW.plus_secs(3600));
    assert_eq!(record(&reaper, "1"), Some(after));
    assert_eq!(site.write_count(), writes);
}

#[test]
fn test_tightening_to_a_day() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 2 * DAY, &[ORIGINAL]));
    let mut reaper = reaper(&site);
    run(&mut reaper, &site, NOW);

    site.set_score("page-1", -11);
    let later = NOW.plus_secs(1800);
    let artifact = run(&mut reaper, &site, later);

    let tightened = later.plus_secs(DAY);
    assert_eq!(
        record(&reaper, "1"),
        Some(DeletionRecord::new(-11, tightened, "page-1"))
    );
    let body = &site.posts(&ItemId::new("1"))[0].body;
    assert_eq!(TimerCodec::decode_body(body).unwrap(), tightened);
    assert_eq!(artifact.pre_delete_pages[0].time, 24);
    assert_eq!(reaper.metrics().tightened, 1);

    // Settles on the tightened deadline
    run(&mut reaper, &site, NOW.plus_secs(3600));
    assert_eq!(record(&reaper, "1").unwrap().deadline, tightened);
    assert_eq!(reaper.metrics().tightened, 1);
}

#[test]
fn test_tightening_guard() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -15, 5 * DAY, &[ORIGINAL, PENDING]));
    let deadline = NOW.plus_secs(DAY - 400);
    announce(&site, "1", &NoticeWriter::default().normal(-5, deadline));
    let mut reaper = reaper(&site);

    run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "1"), Some(DeletionRecord::new(-5, deadline, "page-1")));
    assert_eq!(site.write_count(), 0);
    assert_eq!(reaper.metrics().tightened, 0);
}

#[test]
fn test_expired_and_below_floor_merge() {
    let site = MockSite::new(NOW);
    site.add_item(item("8", -35, 10 * DAY, &[ORIGINAL, PENDING]));
    site.set_source("page-8", "++ Level 8");
    announce(&site, "8", &NoticeWriter::default().normal(-12, NOW.plus_secs(-500)));
    let mut store = JsonFileStore::in_memory();
    store.put(ItemId::new("8"), DeletionRecord::new(-12, NOW.plus_secs(-500), "page-8"));
    let mut reaper = reaper_with(&site, store);

    let artifact = run(&mut reaper, &site, NOW);

    assert!(artifact.pre_delete_pages.is_empty());
    assert_eq!(artifact.deleted_pages.len(), 1);
    let reported = &artifact.deleted_pages[0];
    assert_eq!(reported.page_type, vec![EntryKind::Normal, EntryKind::MinusThirty]);
    assert_eq!(reported.release_score, -12);
    assert_eq!(reported.score, -35);
    assert_eq!(reported.time, 24);
    assert_eq!(reported.context, "++ Level 8");
    // Expiry does not drop the record
    assert!(record(&reaper, "8").is_some());
}

#[test]
fn test_deleted_category_is_reported() {
    let site = MockSite::new(NOW);
    let mut gone = item("9", 2, 40 * DAY, &[]);
    gone.category = "deleted".to_string();
    site.add_item(gone);
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(artifact.deleted_pages.len(), 1);
    assert_eq!(artifact.deleted_pages[0].page_type, vec![EntryKind::Deleted]);
    assert_eq!(artifact.deleted_pages[0].release_score, 2);
    assert_eq!(artifact.deleted_pages[0].time, 72);
}

#[test]
fn test_flag_without_announcement_is_cleared() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -5, 5 * DAY, &[ORIGINAL, PENDING]));
    site.add_item(item("2", -5, 5 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "2", RESCIND_NOTICE);
    let mut store = JsonFileStore::in_memory();
    store.put(ItemId::new("1"), DeletionRecord::new(-5, NOW.plus_secs(DAY), "page-1"));
    let mut reaper = reaper_with(&site, store);

    let artifact = run(&mut reaper, &site, NOW);

    assert!(!site.item("page-1").unwrap().has_tag(PENDING));
    assert!(!site.item("page-2").unwrap().has_tag(PENDING));
    assert_eq!(record(&reaper, "1"), None);
    assert!(artifact.pre_delete_pages.is_empty());
}

#[test]
fn test_unrecognized_author_is_not_an_announcement() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -5, 5 * DAY, &[ORIGINAL, PENDING]));
    site.add_post(
        &ItemId::new("1"),
        Post {
            id: "p-1".to_string(),
            title: ANNOUNCEMENT_TITLE.to_string(),
            author: "visitor".to_string(),
            body: NoticeWriter::default().normal(-5, NOW.plus_secs(DAY)),
        },
    );
    let mut config = ReaperConfig::for_tests();
    config.staff = vec!["mod-a".to_string()];
    let mut reaper = Reaper::new(config, JsonFileStore::in_memory(), site.clone());

    run(&mut reaper, &site, NOW);

    assert!(!site.item("page-1").unwrap().has_tag(PENDING));
}

#[test]
fn test_unparseable_post_is_skipped() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -5, 5 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", "由于条目的分数为-5分，倒计时见置顶");
    let mut store = JsonFileStore::in_memory();
    let kept = DeletionRecord::new(-5, NOW.plus_secs(DAY), "page-1");
    store.put(ItemId::new("1"), kept.clone());
    let mut reaper = reaper_with(&site, store);

    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "1"), Some(kept));
    assert!(site.item("page-1").unwrap().has_tag(PENDING));
    assert!(artifact.pre_delete_pages.is_empty());
    assert_eq!(artifact.errors.len(), 1);
    assert_eq!(artifact.errors[0].error_type, ErrorType::ParseError);
    assert_eq!(site.write_count(), 0);
}

#[test]
fn test_translate_notice_on_original_is_rewritten() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -5, 5 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().translate(NOW.plus_secs(DAY)));
    let mut reaper = reaper(&site);

    run(&mut reaper, &site, NOW);

    let deadline = NOW.plus_secs(3 * DAY);
    assert_eq!(record(&reaper, "1"), Some(DeletionRecord::new(-2, deadline, "page-1")));
    let body = &site.posts(&ItemId::new("1"))[0].body;
    assert!(body.contains("条目的分数为-2分"));
    assert_eq!(TimerCodec::decode_body(body).unwrap(), deadline);
}

#[test]
fn test_translate_notice_prefers_stored_score() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 5 * DAY, &[PENDING]));
    let deadline = NOW.plus_secs(DAY / 2);
    announce(&site, "1", &NoticeWriter::default().translate(deadline));
    let mut store = JsonFileStore::in_memory();
    store.put(ItemId::new("1"), DeletionRecord::new(-1, deadline, "page-1"));
    let mut reaper = reaper_with(&site, store);

    run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "1"), Some(DeletionRecord::new(-1, deadline, "page-1")));
}

#[test]
fn test_denied_rescind_leaves_flag() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", 6, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-3, NOW.plus_secs(DAY)));
    site.deny("t-1");
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    assert!(site.item("page-1").unwrap().has_tag(PENDING));
    assert!(record(&reaper, "1").is_some());
    assert_eq!(artifact.errors.len(), 1);
    assert_eq!(artifact.errors[0].error_type, ErrorType::PermissionError);
    assert_eq!(artifact.errors[0].content, RESCIND_NOTICE);
    assert_eq!(artifact.errors[0].post_id.as_deref(), Some("p-1"));
}

#[test]
fn test_abandoned_rescind_still_clears_state() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", 6, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-3, NOW.plus_secs(DAY)));
    site.fail_next_writes(5);
    let mut reaper = reaper(&site);

    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "1"), None);
    assert!(!site.item("page-1").unwrap().has_tag(PENDING));
    assert_eq!(artifact.errors.len(), 1);
    assert_eq!(artifact.errors[0].error_type, ErrorType::UnknownWriteFailure);
}

#[test]
fn test_stale_records_are_collected() {
    let site = MockSite::new(NOW);
    let mut store = JsonFileStore::in_memory();
    store.put(ItemId::new("99"), DeletionRecord::new(-5, NOW, "vanished"));
    let mut reaper = reaper_with(&site, store);

    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(record(&reaper, "99"), None);
    assert!(artifact.errors.is_empty());
    assert_eq!(reaper.metrics().collected, 1);
}

#[test]
fn test_aborted_cycle_restores_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let site = MockSite::new(NOW);
    let mut gone = item("9", 2, 40 * DAY, &[]);
    gone.category = "deleted".to_string();
    site.add_item(gone);
    site.set_source_failure(Some(SiteError::Transient("busy".into())));

    let mut store = JsonFileStore::open(&path).unwrap();
    store.put(ItemId::new("99"), DeletionRecord::new(-5, NOW, "vanished"));
    let mut reaper = reaper_with(&site, store);

    let err = reaper.run_cycle_at(NOW).unwrap_err();
    assert!(!err.is_transient());
    assert!(record(&reaper, "99").is_some());
    assert!(!path.exists());
    assert_eq!(reaper.metrics().failed_cycles, 1);

    site.set_source_failure(None);
    reaper.run_cycle_at(NOW).unwrap();
    assert_eq!(record(&reaper, "99"), None);
    assert!(path.exists());
}

#[test]
fn test_unreachable_site_fails_cycle_as_transient() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 2 * DAY, &[ORIGINAL]));
    site.set_unreachable(true);
    let mut reaper = reaper(&site);

    let err = reaper.run_cycle_at(NOW).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(site.write_count(), 0);
}

#[test]
fn test_failed_health_check_is_transient_whatever_the_status() {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 2 * DAY, &[ORIGINAL]));
    site.set_probe_failure(Some(SiteError::Transient("HTTP 503 from health".into())));
    let mut reaper = reaper(&site);

    let err = reaper.run_cycle_at(NOW).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(site.write_count(), 0);
    assert_eq!(reaper.metrics().failed_cycles, 1);

    site.set_probe_failure(Some(SiteError::Unexpected("HTTP 418".into())));
    assert!(reaper.run_cycle_at(NOW).unwrap_err().is_transient());
}

/// Two running countdowns: one sub-floor original with no stored record, one
/// mild original
fn two_countdowns() -> MockSite {
    let site = MockSite::new(NOW);
    site.add_item(item("1", -31, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "1", &NoticeWriter::default().normal(-31, NOW.plus_secs(100_000)));
    site.add_item(item("2", -4, 2 * DAY, &[ORIGINAL, PENDING]));
    announce(&site, "2", &NoticeWriter::default().normal(-4, NOW.plus_secs(200_000)));
    site
}

#[test]
fn test_pass_retry_after_mid_pass_read_failure() {
    let clean_site = two_countdowns();
    let mut clean = reaper(&clean_site);
    let expected = run(&mut clean, &clean_site, NOW);

    // Searches for passes A, B and C, then thread and posts of item 1 and the
    // thread of item 2 succeed; listing item 2's posts fails once
    let site = two_countdowns();
    site.fail_reads_after(6, 1);
    let mut reaper = reaper(&site);
    let artifact = run(&mut reaper, &site, NOW);

    assert_eq!(site.pending_read_failures(), 0);
    assert_eq!(artifact, expected);
    assert_eq!(artifact.pre_delete_pages.len(), 2);
    assert_eq!(artifact.deleted_pages.len(), 1);
    assert_eq!(artifact.deleted_pages[0].page_type, vec![EntryKind::MinusThirty]);
    assert!(artifact.errors.is_empty());
    for id in ["1", "2"] {
        assert_eq!(record(&reaper, id), record(&clean, id));
    }
    assert_eq!(reaper.store().ids().len(), 2);
    assert_eq!(site.write_count(), 0);
}

#[test]
fn test_read_failure_without_pass_retry_aborts_cycle() {
    let site = two_countdowns();
    site.fail_reads_after(6, 1);
    let config = ReaperConfig {
        pass_attempts: 1,
        ..ReaperConfig::for_tests()
    };
    let mut reaper = Reaper::new(config, JsonFileStore::in_memory(), site.clone());

    let err = reaper.run_cycle_at(NOW).unwrap_err();
    assert!(!err.is_transient());
    assert!(err.is_retryable());
    // The record written for item 1 before the failure is rolled back
    assert_eq!(record(&reaper, "1"), None);
}

#[test]
fn test_store_and_artifact_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("records.json");
    let output_path = dir.path().join("status.json");
    let site = MockSite::new(NOW);
    site.add_item(item("1", -4, 2 * DAY, &[ORIGINAL]));

    let mut config = ReaperConfig::for_tests();
    config.output_path = Some(output_path.clone());
    let store = JsonFileStore::open(&store_path).unwrap();
    let mut reaper = Reaper::new(config, store, site.clone());
    let artifact = reaper.run_cycle_at(NOW).unwrap();

    let reloaded = JsonFileStore::open(&store_path).unwrap();
    assert_eq!(
        reloaded.get(&ItemId::new("1")),
        Some(DeletionRecord::new(-4, NOW.plus_secs(3 * DAY), "page-1"))
    );
    let written: StatusArtifact =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written, artifact);
    assert_eq!(written.update_timestamp, NOW.as_secs_f64());
}
