//! HTTP surface and composition root for mochila.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Router, middleware};
use mochila_core::photo::MAX_PHOTO_BYTES;
use mochila_infrastructure::AppConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod app;
pub mod error;
pub mod routes;

pub use app::{AppState, bootstrap};

use routes::{email, health, members, user};

/// Room for a maximum-size photo sent as base64 JSON plus form fields.
const BODY_LIMIT_BYTES: usize = MAX_PHOTO_BYTES * 3 / 2;

pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/send-verification-email", post(email::send_verification_email))
        .route("/user/profile", post(user::submit_profile))
        .route("/user/profile/photo", post(user::upload_photo))
        .route("/user/profile/{email}", get(user::get_profile))
        .route("/members", get(members::list_members))
        .route("/members/likes", post(members::add_like))
        .route(
            "/members/likes/received/{user_id}",
            get(members::likes_received),
        )
        .route("/members/footprints/{user_id}", get(members::footprints))
        .route("/members/{id}", get(members::get_member));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::attach_error_details,
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors_layer(state.frontend_url.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            tracing::warn!("FRONTEND_URL is not a valid origin, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// Builds the application from `config` and serves it until a shutdown signal.
pub async fn run(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing state...");
    let state = bootstrap(&config).await?;
    let app = create_app(state);

    let address = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
