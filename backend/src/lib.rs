//! # Finances Backend
//!
//! Bookkeeping for income and outcome transactions filed under categories,
//! with a balance guard on new outcomes and bulk import from CSV files.
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (services, balance guard, CSV reconciliation)
//!     ↓
//! Storage Layer (SQLite repositories, upload directory)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{BalanceService, CategoryService, ImportService, TransactionService};
use crate::storage::{
    CategoryRepository, DbConnection, LocalUploadStorage, TransactionRepository, UploadStorage,
};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub transaction_service: TransactionService,
    pub import_service: ImportService,
}

impl AppState {
    pub fn new(db: DbConnection, uploads: Arc<dyn UploadStorage>) -> Self {
        let transaction_repository = TransactionRepository::new();
        let category_service = CategoryService::new(CategoryRepository::new());
        let balance_service = BalanceService::new(transaction_repository.clone());

        let transaction_service = TransactionService::new(
            db.clone(),
            transaction_repository.clone(),
            category_service.clone(),
            balance_service,
        );
        let import_service = ImportService::new(db, uploads, category_service, transaction_repository);

        Self {
            transaction_service,
            import_service,
        }
    }
}

/// Open the database and upload directory named in `config` and wire up the services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url, config.max_connections).await?;

    info!("Using upload directory {}", config.upload_directory.display());
    let uploads = LocalUploadStorage::new(&config.upload_directory)
        .await
        .with_context(|| format!("Failed to prepare upload directory {}", config.upload_directory.display()))?;

    Ok(AppState::new(db, Arc::new(uploads)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/health", get(io::health))
        .route("/transactions", get(io::list_transactions).post(io::create_transaction))
        .route("/transactions/import", post(io::import_transactions));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnvironment;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_route() {
        let env = TestEnvironment::new().await.unwrap();
        let app = create_router(env.state.clone(), "http://localhost:3000").unwrap();

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let env = TestEnvironment::new().await.unwrap();
        let app = create_router(env.state.clone(), "http://localhost:3000").unwrap();

        let response = app
            .oneshot(Request::builder().uri("/api/categories").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_origin_is_echoed() {
        let env = TestEnvironment::new().await.unwrap();
        let app = create_router(env.state.clone(), "http://localhost:3000").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_rejected() {
        let env = TestEnvironment::new().await.unwrap();
        assert!(create_router(env.state.clone(), "bad\norigin").is_err());
    }

    #[tokio::test]
    async fn test_initialize_backend_creates_upload_directory() {
        let dir = tempfile::tempdir().unwrap();
        let upload_directory = dir.path().join("uploads");
        let config = AppConfig {
            database_url: format!("sqlite:{}", dir.path().join("finances.db").display()),
            upload_directory: upload_directory.clone(),
            bind_address: "127.0.0.1:0".parse().unwrap(),
            max_connections: 2,
            cors_origin: "http://localhost:3000".to_string(),
        };

        let state = initialize_backend(&config).await.unwrap();

        assert!(upload_directory.is_dir());
        let listing = state.transaction_service.list_transactions().await.unwrap();
        assert!(listing.transactions.is_empty());
    }
}
