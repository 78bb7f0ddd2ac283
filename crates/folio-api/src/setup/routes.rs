//! Route configuration and setup

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use folio_core::constants::MAX_FILE_SIZE_BYTES;
use folio_core::{Config, PortfolioPhotoType};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::CurrentIdentity;

const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1_000;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);

    let mut app = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes())
        .nest("/api/profile", profile_routes())
        .nest("/api/files", file_routes());

    let storage = config.storage();
    let url_prefix = storage.local_storage_url_prefix.trim_end_matches('/');
    if storage.local_enabled && !url_prefix.is_empty() {
        tracing::info!(
            url_prefix = %url_prefix,
            path = %storage.local_storage_path,
            "Serving locally stored photos"
        );
        app = app.nest_service(url_prefix, ServeDir::new(&storage.local_storage_path));
    }

    let app = app
        // Room for multipart framing; the photo validator enforces the real limit.
        .layer(DefaultBodyLimit::max(2 * MAX_FILE_SIZE_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(state.auth_state()),
            auth_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::profile::get_current_profile)
                .post(handlers::profile::save_profile)
                .put(handlers::profile::update_profile)
                .delete(handlers::profile::delete_profile),
        )
        .route("/exists", get(handlers::profile::profile_exists))
        .route("/template", put(handlers::profile::update_template))
        .route(
            "/user/{username}",
            get(handlers::profile::get_profile_by_username),
        )
}

fn file_routes() -> Router<Arc<AppState>> {
    let mut router = Router::new()
        .route("/ping", get(handlers::files::ping))
        .route("/storage/info", get(handlers::files::storage_info))
        .route(
            "/upload/profile-photo",
            post(handlers::files::upload_profile_photo),
        )
        .route("/upload/{path}", post(handlers::files::upload_file))
        .route("/delete", delete(handlers::files::delete_file));

    for kind in PortfolioPhotoType::ALL {
        router = router.route(
            &format!("/upload/{}-photo", kind),
            post(
                move |state: State<Arc<AppState>>,
                      identity: CurrentIdentity,
                      multipart: Multipart| {
                    handlers::files::upload_portfolio_photo(kind, state, identity, multipart)
                },
            ),
        );
    }

    router
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
