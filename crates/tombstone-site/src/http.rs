//! HTTP Site Implementation
//!
//! Talks to a site bridge service that exposes the hosting wiki as a small
//! JSON API. The bridge owns the session with the wiki; this client only maps
//! facade calls to requests and classifies the responses.
//!
//! # Endpoints
//!
//! | Call | Request |
//! |------|---------|
//! | `probe` | `GET /health` |
//! | `search_items` | `POST /items/search` |
//! | `get_item` | `GET /items/{name}` |
//! | `page_source` | `GET /items/{name}/source` |
//! | `exists_on` | `GET /sites/{site}/items/{name}` |
//! | `discussion_thread` | `POST /items/{id}/thread` |
//! | `list_posts` | `GET /threads/{id}/posts` |
//! | `create_post` | `POST /threads/{id}/posts` |
//! | `edit_post` | `PUT /threads/{id}/posts/{post}` |
//! | `edit_tags` | `PUT /items/{id}/tags` |
//!
//! # Examples
//!
//! ```no_run
//! use tombstone_site::{HttpSite, HttpSiteConfig};
//!
//! let config = HttpSiteConfig {
//!     base_url: "http://localhost:7300".into(),
//!     ..Default::default()
//! };
//! let site = HttpSite::new(config).unwrap();
//! ```

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tombstone_domain::traits::ContentSite;
use tombstone_domain::{Item, ItemId, ItemQuery, Post, SiteError, Thread, Timestamp};

/// Default per-request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the site bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSiteConfig {
    /// Bridge base URL (e.g. "http://localhost:7300")
    pub base_url: String,

    /// Account name on the wiki
    #[serde(default)]
    pub username: String,

    /// Account password
    #[serde(default)]
    pub password: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for HttpSiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7300".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemDto {
    id: String,
    name: String,
    title: String,
    url: String,
    score: i64,
    /// Epoch seconds
    created_at: i64,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category: String,
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        Item {
            id: ItemId::new(dto.id),
            name: dto.name,
            title: dto.title,
            url: dto.url,
            score: dto.score,
            created_at: Timestamp::from_secs(dto.created_at),
            tags: dto.tags,
            category: dto.category,
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryDto<'a> {
    tags_all: &'a [String],
    tags_none: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating_below: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_age_secs: Option<i64>,
}

impl<'a> From<&'a ItemQuery> for QueryDto<'a> {
    fn from(query: &'a ItemQuery) -> Self {
        QueryDto {
            tags_all: &query.tags_all,
            tags_none: &query.tags_none,
            category: query.category.as_deref(),
            rating_below: query.rating_below,
            min_age_secs: query.min_age_secs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThreadDto {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PostDto {
    id: String,
    title: String,
    #[serde(default)]
    author: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct SourceDto {
    source: String,
}

#[derive(Debug, Serialize)]
struct NewPostDto<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct EditPostDto<'a> {
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct TagsDto<'a> {
    tags: &'a [String],
}

/// Map an HTTP status to the facade's failure taxonomy
pub fn classify_status(status: StatusCode, context: &str) -> SiteError {
    let message = format!("HTTP {} from {}", status, context);
    match status {
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => SiteError::PermissionDenied(message),
        StatusCode::NOT_FOUND => SiteError::NotFound(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => SiteError::Transient(message),
        s if s.is_server_error() => SiteError::Transient(message),
        _ => SiteError::Unexpected(message),
    }
}

fn classify_transport(error: reqwest::Error, context: &str) -> SiteError {
    if error.is_connect() || error.is_timeout() {
        SiteError::Connectivity(format!("{}: {}", context, error))
    } else if error.is_decode() {
        SiteError::Unexpected(format!("Malformed response from {}: {}", context, error))
    } else {
        SiteError::Transient(format!("{}: {}", context, error))
    }
}

/// Blocking HTTP client for the site bridge
pub struct HttpSite {
    base_url: String,
    username: String,
    password: String,
    client: Client,
}

impl HttpSite {
    /// Create a client for the configured bridge
    pub fn new(config: HttpSiteConfig) -> Result<Self, SiteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SiteError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.username.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Send and turn non-success statuses into classified errors
    fn send(&self, builder: RequestBuilder, context: &str) -> Result<Response, SiteError> {
        let response = self
            .authed(builder)
            .send()
            .map_err(|e| classify_transport(e, context))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_status(response.status(), context))
        }
    }

    fn json<T: serde::de::DeserializeOwned>(response: Response, context: &str) -> Result<T, SiteError> {
        response.json::<T>().map_err(|e| classify_transport(e, context))
    }
}

impl ContentSite for HttpSite {
    fn probe(&self) -> Result<(), SiteError> {
        self.send(self.client.get(self.url("/health")), "health")?;
        Ok(())
    }

    fn search_items(&self, query: &ItemQuery) -> Result<Vec<Item>, SiteError> {
        let request = self
            .client
            .post(self.url("/items/search"))
            .json(&QueryDto::from(query));
        let response = self.send(request, "item search")?;
        let items: Vec<ItemDto> = Self::json(response, "item search")?;
        tracing::debug!(count = items.len(), "Item search returned");
        Ok(items.into_iter().map(Item::from).collect())
    }

    fn get_item(&self, name: &str) -> Result<Option<Item>, SiteError> {
        let context = format!("item {}", name);
        match self.send(self.client.get(self.url(&format!("/items/{}", name))), &context) {
            Ok(response) => Ok(Some(Self::json::<ItemDto>(response, &context)?.into())),
            Err(SiteError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn page_source(&self, name: &str) -> Result<String, SiteError> {
        let context = format!("source of {}", name);
        let response = self.send(
            self.client.get(self.url(&format!("/items/{}/source", name))),
            &context,
        )?;
        Ok(Self::json::<SourceDto>(response, &context)?.source)
    }

    fn exists_on(&self, site: &str, name: &str) -> Result<bool, SiteError> {
        let context = format!("{} on {}", name, site);
        match self.send(
            self.client.get(self.url(&format!("/sites/{}/items/{}", site, name))),
            &context,
        ) {
            Ok(_) => Ok(true),
            Err(SiteError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn discussion_thread(&self, id: &ItemId) -> Result<Thread, SiteError> {
        let context = format!("thread of {}", id);
        let response = self.send(
            self.client.post(self.url(&format!("/items/{}/thread", id))),
            &context,
        )?;
        let dto: ThreadDto = Self::json(response, &context)?;
        Ok(Thread {
            id: dto.id,
            url: dto.url,
        })
    }

    fn list_posts(&self, thread_id: &str) -> Result<Vec<Post>, SiteError> {
        let context = format!("posts of {}", thread_id);
        let response = self.send(
            self.client.get(self.url(&format!("/threads/{}/posts", thread_id))),
            &context,
        )?;
        let posts: Vec<PostDto> = Self::json(response, &context)?;
        Ok(posts
            .into_iter()
            .map(|p| Post {
                id: p.id,
                title: p.title,
                author: p.author,
                body: p.body,
            })
            .collect())
    }

    fn create_post(&self, thread_id: &str, title: &str, body: &str) -> Result<(), SiteError> {
        let request = self
            .client
            .post(self.url(&format!("/threads/{}/posts", thread_id)))
            .json(&NewPostDto { title, body });
        self.send(request, &format!("new post in {}", thread_id))?;
        Ok(())
    }

    fn edit_post(&self, thread_id: &str, post_id: &str, body: &str) -> Result<(), SiteError> {
        let request = self
            .client
            .put(self.url(&format!("/threads/{}/posts/{}", thread_id, post_id)))
            .json(&EditPostDto { body });
        self.send(request, &format!("edit of {}/{}", thread_id, post_id))?;
        Ok(())
    }

    fn edit_tags(&self, id: &ItemId, tags: &[String]) -> Result<(), SiteError> {
        let request = self
            .client
            .put(self.url(&format!("/items/{}/tags", id)))
            .json(&TagsDto { tags });
        self.send(request, &format!("tags of {}", id))?;
        Ok(())
    }
}
