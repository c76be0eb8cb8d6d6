//! Sayings - A multilingual quotes website
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Locale redirect middleware                               │
//! │  - Locale-prefixed HTML pages                               │
//! │  - JSON API for authors, quotes and seeding                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Service + Render Layer                         │
//! │  - Count, paginate and fetch per request                    │
//! │  - HTML pages from dictionaries and listings                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! │  - Request-scoped render cache (moka)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for pages and the JSON API
//! - `service`: Per-request catalog reads
//! - `render`: HTML rendering
//! - `data`: Database and cache layer
//! - `locale`: Locale negotiation and routing
//! - `i18n`: UI dictionaries
//! - `pagination`: Page math and page links
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod metrics;
pub mod pagination;
pub mod render;
pub mod service;

use std::sync::Arc;

/// Largest accepted request body; JSON API payloads are small
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool and dictionaries.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// UI strings for every locale
    pub dictionaries: Arc<i18n::Dictionaries>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Load dictionaries
    /// 2. Connect to SQLite database (and migrate, if configured)
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Load dictionaries
        let dictionaries = i18n::Dictionaries::load()?;

        // 2. Connect to SQLite database
        let db = data::Database::connect_with_options(
            &config.database.path,
            config.database.max_connections,
            config.database.run_migrations,
        )
        .await?;

        let features = db.schema_features();
        tracing::info!(
            tables = features.tables,
            tags = features.tags,
            "Application state initialized successfully"
        );

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            dictionaries: Arc::new(dictionaries),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{Router, middleware};
    use tower_http::{
        compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
    };

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::authors_router())
        .merge(api::quotes_router())
        .merge(api::seed_router())
        .merge(api::pages_router())
        .route_layer(middleware::from_fn(api::track_http_metrics))
        .fallback(api::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            locale::redirect_to_locale,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.public_url.starts_with("https://") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from public URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
