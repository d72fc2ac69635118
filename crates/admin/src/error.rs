//! Unified error handling for admin.
//!
//! Most store failures in the admin are shown to the operator as a notice
//! and never reach this type. `AppError` covers what is left: failures
//! while rendering a page at all.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use furnitureco_store::StoreError;
use thiserror::Error;

use crate::models::CurrentAdmin;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend request failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Admin request error"
        );

        // Details stay in the logs
        let (status, message) = match &self {
            Self::Store(_) => (StatusCode::BAD_GATEWAY, "External service error"),
            Self::Session(_) | Self::Template(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

/// Set the Sentry user context from the verified admin.
pub fn set_sentry_user(admin: &CurrentAdmin) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin.user_id.to_string()),
            username: Some(admin.display_name.clone()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
