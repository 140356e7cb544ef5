//! tagfs-api - HTTP API server for tagfs

mod handlers;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagfs_api::services::{FileService, TagService};
use tagfs_core::{FileRepository, TagRepository};
use tagfs_db::Database;

use handlers::{
    files::{
        create_file, delete_file, file_content, list_files, search_files, update_file_tags,
    },
    tags::{create_tag, delete_tag, list_tags, reorder_tags, update_tag},
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub tags: TagService,
    pub files: FileService,
}

/// HTTP-facing error classification.
pub enum ApiError {
    Internal(tagfs_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<tagfs_core::Error> for ApiError {
    fn from(err: tagfs_core::Error) -> Self {
        use tagfs_core::Error;
        match err {
            Error::NotFound(_) | Error::TagNotFound(_) | Error::FileNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            Error::Conflict(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Whether an Origin header value points at this machine.
///
/// The server binds to localhost and only browser pages served from
/// localhost may call it cross-origin.
fn is_local_origin(origin: &str) -> bool {
    let rest = match origin.split_once("://") {
        Some((_, rest)) => rest,
        None => return false,
    };
    let host_port = rest.split('/').next().unwrap_or(rest);
    let host = host_port
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(host_port);
    host == "localhost" || host == "127.0.0.1"
}

/// Build the application router.
fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin.to_str().map(is_local_origin).unwrap_or(false)
        }))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/order", put(reorder_tags))
        .route("/tags/:id", put(update_tag).delete(delete_tag))
        .route("/files", get(list_files).post(create_file))
        .route("/files/search", post(search_files))
        .route("/files/:id", put(update_file_tags).delete(delete_file))
        .route("/files/:id/content", get(file_content))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tagfs_api=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tagfs.sqlite3".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8077".to_string())
        .parse()
        .unwrap_or(8077);

    let db = Database::connect(&database_url).await?;
    info!(
        subsystem = "api",
        op = "startup",
        database_url = %database_url,
        "Database ready"
    );

    let tag_repo: Arc<dyn TagRepository> = Arc::new(db.tags.clone());
    let file_repo: Arc<dyn FileRepository> = Arc::new(db.files.clone());
    let state = AppState {
        tags: TagService::new(tag_repo.clone()),
        files: FileService::new(file_repo, tag_repo),
    };

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        subsystem = "api",
        op = "listen",
        addr = %addr,
        "tagfs API listening"
    );
    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::is_local_origin;

    #[test]
    fn accepts_localhost_origins() {
        assert!(is_local_origin("http://localhost"));
        assert!(is_local_origin("http://localhost:5173"));
        assert!(is_local_origin("https://127.0.0.1:8080"));
    }

    #[test]
    fn rejects_foreign_origins() {
        assert!(!is_local_origin("http://example.com"));
        assert!(!is_local_origin("http://localhost.example.com"));
        assert!(!is_local_origin("localhost"));
    }
}
