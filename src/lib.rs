//! Donation Site - library for app logic and testing

pub mod auth;
pub mod config;
pub mod cookies;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
pub mod store;
pub mod uploads;

#[cfg(test)]
mod test_support;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    trace::TraceLayer,
};

use config::AppConfig;
use error::{AppError, AppResult};
use logging::LoggingConfig;
use state::AppState;

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let upload_files = ServeDir::new(state.uploads.root());
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(routes::home::index))
        .route(
            "/admin/login",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route("/admin/logout", get(routes::auth::logout))
        .route("/admin/dashboard", get(routes::beneficiaries::dashboard))
        .route("/admin/add", post(routes::beneficiaries::add))
        .route(
            "/admin/edit/{id}",
            get(routes::beneficiaries::edit_page).post(routes::beneficiaries::edit),
        )
        .route("/admin/delete/{id}", get(routes::beneficiaries::delete))
        .route(
            "/admin/news",
            get(routes::news::manage).post(routes::news::create),
        )
        .route("/admin/news/delete/{id}", get(routes::news::delete))
        .route(
            "/admin/gallery",
            get(routes::gallery::manage).post(routes::gallery::create),
        )
        .route(
            "/admin/gallery/delete/{image_id}",
            get(routes::gallery::delete),
        )
        .nest_service(uploads::PUBLIC_PREFIX, upload_files)
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/database", get(routes::health::health_database))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Uploads are capped by the layer below instead of axum's 2 MB default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}

/// Run the server (used by main). Startup failures are logged and returned.
pub async fn run() -> AppResult<()> {
    dotenvy::dotenv().ok();

    // Dropping the guards stops the background writers and loses buffered lines.
    let _log_guards = logging::init(&LoggingConfig::from_env());

    routes::health::init_start_time();

    let result = serve().await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server failed");
    }
    result
}

async fn serve() -> AppResult<()> {
    let config = AppConfig::from_env()?;

    let pool = db::init_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let state = AppState::new(config, pool);
    state.uploads.ensure_exists().await.map_err(|e| {
        AppError::Config(format!(
            "cannot create upload directory {}: {e}",
            state.uploads.root().display()
        ))
    })?;

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST/PORT: {e}")))?;

    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
