//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Health check
//! GET  /health/ready                  - Readiness (store reachable)
//!
//! # Auth (public)
//! GET  /admin                         - Login screen (?method=email|phone, ?mode=sign_up)
//! POST /admin/login/email             - Email sign-in / sign-up
//! POST /admin/login/otp/send          - Send SMS code
//! POST /admin/login/otp/verify        - Verify SMS code
//! POST /admin/login/otp/reset         - Use a different number
//! POST /admin/logout                  - Sign out
//!
//! # Behind the admin gate
//! GET  /admin/dashboard               - Overview
//! GET  /admin/products                - Product list
//! GET  /admin/products/new            - New product form
//! POST /admin/products/new            - Create product
//! GET  /admin/products/edit/{id}      - Edit product form
//! POST /admin/products/edit/{id}      - Update product
//! GET  /admin/products/{id}/delete    - Delete confirmation
//! POST /admin/products/{id}/delete    - Delete product
//! GET  /admin/about                   - About Us editor
//! POST /admin/about                   - Save all sections
//! GET  /admin/contact                 - Contact editor
//! POST /admin/contact                 - Save contact info
//! ```

pub mod about;
pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod layout;
pub mod products;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use furnitureco_store::{Caller, ProductRepository};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::filters;
use crate::middleware::{create_session_layer, require_admin};
use crate::state::AppState;

/// Static assets directory, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Screens behind the admin gate.
///
/// The gate runs as a `route_layer`, so unknown paths still fall through
/// to the 404 handler instead of redirecting to login.
pub fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(products::router())
        .merge(about::router())
        .merge(contact::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
}

/// Build the complete admin application.
pub fn router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth::router())
        .merge(protected_routes(&state))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Runs an anonymous product count against the store.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match ProductRepository::new(state.store(), Caller::Anonymous)
        .count()
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

/// Catch-all 404.
async fn not_found() -> Response {
    match NotFoundTemplate.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Template render error");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
