//! ReelHub admin API
//!
//! Assembles the admin application: request IDs, request tracing and the
//! CSRF gate in front of the content, webhook and token routes.

pub mod config;
pub mod logging;
pub mod routes;

use config::AdminConfig;
use reelhub_core::{delete, get, post, ReelHub, RequestIdLayer, TracingLayer};
use reelhub_csrf::{issue_token, CsrfLayer};
use routes::{content, health, webhooks, VideoLibrary};

/// Service name reported in request spans
pub const SERVICE_NAME: &str = "reelhub-admin";

/// Build the application with a fresh, empty video library
pub fn build_app(config: &AdminConfig) -> ReelHub {
    build_app_with(config, VideoLibrary::new())
}

/// Build the application around an existing video library
pub fn build_app_with(config: &AdminConfig, library: VideoLibrary) -> ReelHub {
    let csrf = config.csrf();

    ReelHub::new()
        .body_limit(config.max_body_bytes)
        .state(csrf.clone())
        .state(library)
        .layer(RequestIdLayer::new())
        .layer(TracingLayer::new().service(SERVICE_NAME))
        .layer(CsrfLayer::new(csrf))
        .route("/health", get(health::health))
        .route("/api/csrf-token", get(issue_token))
        .route(
            "/api/content/videos",
            get(content::list_videos).post(content::create_video),
        )
        .route("/api/content/videos/{id}", delete(content::delete_video))
        .route("/api/webhooks/stripe", post(webhooks::stripe))
}
