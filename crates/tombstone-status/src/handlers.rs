//! HTTP request handlers for the status server.
//!
//! Serves the reaper's status document and a health check using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tombstone_domain::Timestamp;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Status document written by the reaper
    pub artifact_path: Arc<PathBuf>,
    /// Age in seconds after which the document counts as stale
    pub stale_after_secs: u64,
}

impl AppState {
    /// State serving the document at `path`
    pub fn new(path: impl Into<PathBuf>, stale_after_secs: u64) -> Self {
        Self {
            artifact_path: Arc::new(path.into()),
            stale_after_secs,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// "healthy", "stale" or "missing"
    pub status: String,
    /// Whether a readable status document exists
    pub artifact_present: bool,
    /// `update_timestamp` of the document, seconds since the epoch
    pub updated_at: Option<f64>,
    /// Seconds since the document was written
    pub age_secs: Option<f64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// No document has been written yet
    ArtifactMissing(String),
    /// The document exists but cannot be read or parsed
    ArtifactUnreadable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::ArtifactMissing(path) => format!("No status document at {}", path),
            AppError::ArtifactUnreadable(msg) => msg,
        };

        let body = Json(ErrorResponse { error: message });
        (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
    }
}

#[derive(Deserialize)]
struct ArtifactStamp {
    update_timestamp: f64,
}

async fn load_artifact(state: &AppState) -> Result<serde_json::Value, AppError> {
    let path = state.artifact_path.as_path();
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::ArtifactMissing(path.display().to_string()));
        }
        Err(e) => {
            return Err(AppError::ArtifactUnreadable(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    serde_json::from_str(&text).map_err(|e| {
        AppError::ArtifactUnreadable(format!("Malformed status document: {}", e))
    })
}

/// GET / - The latest status document, as written by the reaper
async fn status_document(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document = load_artifact(&state).await?;
    Ok(Json(document))
}

/// GET /health - Presence and age of the status document
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let stamp = match load_artifact(&state).await {
        Ok(document) => serde_json::from_value::<ArtifactStamp>(document).ok(),
        Err(e) => {
            tracing::debug!("Health check without artifact: {:?}", e);
            None
        }
    };

    let Some(stamp) = stamp else {
        return Json(HealthCheckResponse {
            status: "missing".to_string(),
            artifact_present: false,
            updated_at: None,
            age_secs: None,
        });
    };

    let age = (Timestamp::now().as_secs_f64() - stamp.update_timestamp).max(0.0);
    let status = if age > state.stale_after_secs as f64 {
        "stale"
    } else {
        "healthy"
    };

    Json(HealthCheckResponse {
        status: status.to_string(),
        artifact_present: true,
        updated_at: Some(stamp.update_timestamp),
        age_secs: Some(age),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    AxumRouter::new()
        .route("/", get(status_document))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt; // for oneshot

    fn write_artifact(dir: &TempDir, update_timestamp: f64) -> PathBuf {
        let path = dir.path().join("status.json");
        let document = serde_json::json!({
            "pre_delete_pages": [],
            "deleted_pages": [],
            "errors": [],
            "update_timestamp": update_timestamp,
        });
        std::fs::write(&path, document.to_string()).unwrap();
        path
    }

    async fn fetch(app: AxumRouter, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_serves_document() {
        let dir = TempDir::new().unwrap();
        let path = write_artifact(&dir, 1_700_000_000.0);
        let app = create_router(AppState::new(path, 5400));

        let (status, body) = fetch(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["update_timestamp"], 1_700_000_000.0);
        assert!(body["pre_delete_pages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_document_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let app = create_router(AppState::new(dir.path().join("absent.json"), 5400));

        let (status, body) = fetch(app, "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_malformed_document_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("status.json");
        std::fs::write(&path, "{not json").unwrap();
        let app = create_router(AppState::new(path, 5400));

        let (status, body) = fetch(app, "/").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed"));
    }

    #[tokio::test]
    async fn test_health_fresh_document() {
        let dir = TempDir::new().unwrap();
        let path = write_artifact(&dir, Timestamp::now().as_secs_f64());
        let app = create_router(AppState::new(path, 5400));

        let (status, body) = fetch(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["artifact_present"], true);
    }

    #[tokio::test]
    async fn test_health_stale_document() {
        let dir = TempDir::new().unwrap();
        let path = write_artifact(&dir, 1_000.0);
        let app = create_router(AppState::new(path, 5400));

        let (_, body) = fetch(app, "/health").await;
        assert_eq!(body["status"], "stale");
        assert!(body["age_secs"].as_f64().unwrap() > 5400.0);
    }

    #[tokio::test]
    async fn test_health_without_document() {
        let dir = TempDir::new().unwrap();
        let app = create_router(AppState::new(dir.path().join("absent.json"), 5400));

        let (status, body) = fetch(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "missing");
        assert!(body["updated_at"].is_null());
    }
}
