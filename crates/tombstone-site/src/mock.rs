//! In-memory content site for deterministic tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tombstone_domain::traits::ContentSite;
use tombstone_domain::{Item, ItemId, ItemQuery, Post, SiteError, Thread, Timestamp};

/// Account name used as the author of posts the mock creates
pub const MOCK_ACCOUNT: &str = "tombstone-bot";

#[derive(Debug, Default)]
struct MockState {
    now: Timestamp,
    items: Vec<Item>,
    threads: HashMap<ItemId, Thread>,
    posts: HashMap<String, Vec<Post>>,
    sources: HashMap<String, String>,
    origins: HashSet<(String, String)>,
    denied: HashSet<String>,
    pending_failures: u32,
    unreachable: bool,
    search_failure: Option<SiteError>,
    source_failure: Option<SiteError>,
    probe_failure: Option<SiteError>,
    reads_before_failure: u32,
    pending_read_failures: u32,
    next_post: u64,
    writes: usize,
}

impl MockState {
    fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    /// Shared failure injection for every mutating call
    fn check_write(&mut self, target: &str) -> Result<(), SiteError> {
        if self.unreachable {
            return Err(SiteError::Connectivity("mock site unreachable".to_string()));
        }
        if self.denied.contains(target) {
            return Err(SiteError::PermissionDenied(format!("no rights on {}", target)));
        }
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(SiteError::Unexpected("injected write failure".to_string()));
        }
        self.writes += 1;
        Ok(())
    }

    fn check_reachable(&self) -> Result<(), SiteError> {
        if self.unreachable {
            return Err(SiteError::Connectivity("mock site unreachable".to_string()));
        }
        Ok(())
    }

    /// Failure injection for every read except the probe
    fn check_read(&mut self) -> Result<(), SiteError> {
        self.check_reachable()?;
        if self.pending_read_failures > 0 {
            if self.reads_before_failure > 0 {
                self.reads_before_failure -= 1;
            } else {
                self.pending_read_failures -= 1;
                return Err(SiteError::Transient("injected read failure".to_string()));
            }
        }
        Ok(())
    }
}

/// Mock content site
///
/// Holds items, threads and posts in memory and applies every write so later
/// reads observe it, the way the real site does. Cloning shares the state, so
/// a test can keep a handle while the reconciler owns another.
///
/// # Examples
///
/// ```
/// use tombstone_site::MockSite;
/// use tombstone_domain::traits::ContentSite;
/// use tombstone_domain::{Item, ItemId, ItemQuery, Timestamp};
///
/// let now = Timestamp::from_secs(1_700_000_000);
/// let site = MockSite::new(now);
/// site.add_item(Item {
///     id: ItemId::new("1"),
///     name: "level-1".into(),
///     title: "Level 1".into(),
///     url: "http://wiki.test/level-1".into(),
///     score: -4,
///     created_at: now,
///     tags: vec!["原创".into()],
///     category: "_default".into(),
/// });
///
/// let found = site.search_items(&ItemQuery::default()).unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    state: Arc<Mutex<MockState>>,
}

impl MockSite {
    /// Create an empty site whose clock reads `now` for age filters
    pub fn new(now: Timestamp) -> Self {
        let site = Self::default();
        site.state().now = now;
        site
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move the site clock
    pub fn set_now(&self, now: Timestamp) {
        self.state().now = now;
    }

    /// Add or replace an item
    pub fn add_item(&self, item: Item) {
        let mut state = self.state();
        state.items.retain(|i| i.id != item.id);
        state.items.push(item);
    }

    /// Delete an item from the site
    pub fn remove_item(&self, name: &str) {
        self.state().items.retain(|i| i.name != name);
    }

    /// Current copy of an item
    pub fn item(&self, name: &str) -> Option<Item> {
        self.state().items.iter().find(|i| i.name == name).cloned()
    }

    /// Change the live score of an item
    pub fn set_score(&self, name: &str, score: i64) {
        if let Some(item) = self.state().items.iter_mut().find(|i| i.name == name) {
            item.score = score;
        }
    }

    /// Set the raw source of a page
    pub fn set_source(&self, name: &str, source: &str) {
        self.state().sources.insert(name.to_string(), source.to_string());
    }

    /// Make `name` resolve on another site
    pub fn add_origin(&self, site: &str, name: &str) {
        self.state().origins.insert((site.to_string(), name.to_string()));
    }

    /// Append a post to the item's discussion thread
    pub fn add_post(&self, id: &ItemId, post: Post) {
        let thread = self.thread_for(id);
        self.state().posts.entry(thread.id).or_default().push(post);
    }

    /// Posts in the item's discussion thread
    pub fn posts(&self, id: &ItemId) -> Vec<Post> {
        let thread = self.thread_for(id);
        self.state().posts.get(&thread.id).cloned().unwrap_or_default()
    }

    /// Reject writes against a thread id or item id with a permission error
    pub fn deny(&self, target: &str) {
        self.state().denied.insert(target.to_string());
    }

    /// Fail the next `n` writes with an unrecognized status
    pub fn fail_next_writes(&self, n: u32) {
        self.state().pending_failures = n;
    }

    /// Let `skip` reads through, then fail the next `n` with a transient error
    ///
    /// The probe is not counted.
    pub fn fail_reads_after(&self, skip: u32, n: u32) {
        let mut state = self.state();
        state.reads_before_failure = skip;
        state.pending_read_failures = n;
    }

    /// Fail the next `n` reads with a transient error
    pub fn fail_next_reads(&self, n: u32) {
        self.fail_reads_after(0, n);
    }

    /// Injected reads still waiting to fail
    pub fn pending_read_failures(&self) -> u32 {
        self.state().pending_read_failures
    }

    /// Make the probe fail with `error` (or succeed again with `None`)
    pub fn set_probe_failure(&self, error: Option<SiteError>) {
        self.state().probe_failure = error;
    }

    /// Toggle connectivity loss for every call
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// Make searches fail with `error` (or succeed again with `None`)
    pub fn set_search_failure(&self, error: Option<SiteError>) {
        self.state().search_failure = error;
    }

    /// Make page source reads fail with `error` (or succeed again with `None`)
    pub fn set_source_failure(&self, error: Option<SiteError>) {
        self.state().source_failure = error;
    }

    /// Number of writes applied so far
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    /// Thread id the mock uses for an item
    pub fn thread_for(&self, id: &ItemId) -> Thread {
        let mut state = self.state();
        state
            .threads
            .entry(id.clone())
            .or_insert_with(|| Thread {
                id: format!("t-{}", id),
                url: format!("http://wiki.test/forum/t-{}", id),
            })
            .clone()
    }
}

impl ContentSite for MockSite {
    fn probe(&self) -> Result<(), SiteError> {
        let state = self.state();
        state.check_reachable()?;
        match &state.probe_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn search_items(&self, query: &ItemQuery) -> Result<Vec<Item>, SiteError> {
        let mut state = self.state();
        state.check_read()?;
        if let Some(error) = &state.search_failure {
            return Err(error.clone());
        }
        Ok(state
            .items
            .iter()
            .filter(|item| query.matches(item, state.now))
            .cloned()
            .collect())
    }

    fn get_item(&self, name: &str) -> Result<Option<Item>, SiteError> {
        let mut state = self.state();
        state.check_read()?;
        Ok(state.items.iter().find(|i| i.name == name).cloned())
    }

    fn page_source(&self, name: &str) -> Result<String, SiteError> {
        let mut state = self.state();
        state.check_read()?;
        if let Some(error) = &state.source_failure {
            return Err(error.clone());
        }
        if !state.items.iter().any(|i| i.name == name) {
            return Err(SiteError::NotFound(name.to_string()));
        }
        Ok(state.sources.get(name).cloned().unwrap_or_default())
    }

    fn exists_on(&self, site: &str, name: &str) -> Result<bool, SiteError> {
        let mut state = self.state();
        state.check_read()?;
        Ok(state.origins.contains(&(site.to_string(), name.to_string())))
    }

    fn discussion_thread(&self, id: &ItemId) -> Result<Thread, SiteError> {
        self.state().check_read()?;
        Ok(self.thread_for(id))
    }

    fn list_posts(&self, thread_id: &str) -> Result<Vec<Post>, SiteError> {
        let mut state = self.state();
        state.check_read()?;
        Ok(state.posts.get(thread_id).cloned().unwrap_or_default())
    }

    fn create_post(&self, thread_id: &str, title: &str, body: &str) -> Result<(), SiteError> {
        let mut state = self.state();
        state.check_write(thread_id)?;
        state.next_post += 1;
        let post = Post {
            id: format!("post-{}", state.next_post),
            title: title.to_string(),
            author: MOCK_ACCOUNT.to_string(),
            body: body.to_string(),
        };
        state.posts.entry(thread_id.to_string()).or_default().push(post);
        Ok(())
    }

    fn edit_post(&self, thread_id: &str, post_id: &str, body: &str) -> Result<(), SiteError> {
        let mut state = self.state();
        state.check_write(thread_id)?;
        let post = state
            .posts
            .get_mut(thread_id)
            .and_then(|posts| posts.iter_mut().find(|p| p.id == post_id))
            .ok_or_else(|| SiteError::NotFound(format!("{}/{}", thread_id, post_id)))?;
        post.body = body.to_string();
        Ok(())
    }

    fn edit_tags(&self, id: &ItemId, tags: &[String]) -> Result<(), SiteError> {
        let mut state = self.state();
        state.check_write(id.as_str())?;
        let item = state
            .item_mut(id)
            .ok_or_else(|| SiteError::NotFound(id.to_string()))?;
        item.tags = tags.to_vec();
        Ok(())
    }
}
