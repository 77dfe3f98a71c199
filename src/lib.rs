//! Documentation of a leaderboard backend for browser-hosted block-based games.
//!
//! Extensions running inside the visual editor register players, push score fields and read the
//! leaderboard back over plain JSON. The editor is served from another origin, so every route is
//! open to cross-origin requests.
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | GET | `/version.json` | |
//! | GET | `/` | |
//! | GET | `/api/leaderboard` | |
//! | GET | `/api/users/{userId}` | |
//! | POST | `/api/users` | `{userId, username}` |
//! | GET | `/api/users/{userId}/scores` | |
//! | GET | `/api/users/{userId}/scores/{fieldName}` | |
//! | POST | `/api/users/{userId}/scores` | `{field, value}` |
//! | POST | `/api/users/{userId}/rename-score-field` | `{oldField, newField}` |
//! | POST | `/api/users/{userId}/profile` | `{field, value}` |
//!
//! Single score reads return a bare JSON scalar so blocks can use the body directly.
//! Mutations answer with a plain text confirmation.
//!
//!
//!
//! # Environment
//!
//! - `PORT`: listen port, default `3000`
//! - `VERSION`: reported by `/version.json`, default `inconnu`
//! - `PROJECT_URL`: reported by `/version.json`, `null` when unset
//! - `SEED_USERS`: start with sample players, default `true`
//! - `RUST_LOG`: tracing filter, default `info`
//!
//!
//!
//! # Notes
//!
//! Everything lives in memory. A restart drops every registered player and goes back to the sample
//! seed.
//!
//! Run with mutation logging.
//! ```sh
//! RUST_LOG=debug cargo run --features verbose
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use config::Config;
use routes::{
    create_user_handler, get_score_handler, get_user_handler, leaderboard_handler,
    list_scores_handler, rename_score_handler, root_handler, set_profile_handler,
    set_score_handler, version_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/version.json", get(version_handler))
        .route("/", get(root_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/users", post(create_user_handler))
        .route("/api/users/{user_id}", get(get_user_handler))
        .route(
            "/api/users/{user_id}/scores",
            get(list_scores_handler).post(set_score_handler),
        )
        .route(
            "/api/users/{user_id}/scores/{field_name}",
            get(get_score_handler),
        )
        .route(
            "/api/users/{user_id}/rename-score-field",
            post(rename_score_handler),
        )
        .route("/api/users/{user_id}/profile", post(set_profile_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config);
    info!("Store ready with {} users", state.store.read().await.len());

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
