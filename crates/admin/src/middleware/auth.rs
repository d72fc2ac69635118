//! The admin gate and its extractor.
//!
//! [`require_admin`] is layered once over every protected admin route.
//! The role lookup runs on the first protected request after sign-in and
//! its result is cached in the session as [`CurrentAdmin`]; later requests
//! only check that the cached verification belongs to the session's user.
//! Sign-out removes it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use furnitureco_store::{AuthSession, Caller};
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, Flash, session_keys};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/admin";

/// The verified admin and their tokens, for handlers behind the gate.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin: CurrentAdmin,
    pub auth: AuthSession,
}

impl AdminContext {
    /// Run store calls as the signed-in admin.
    #[must_use]
    pub fn caller(&self) -> Caller<'_> {
        self.auth.caller()
    }
}

/// Remove every sign-in key from the session and rotate its ID.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_auth_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthSession>(session_keys::AUTH_SESSION)
        .await?;
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session.remove::<String>(session_keys::OTP_PHONE).await?;
    session.cycle_id().await?;
    clear_sentry_user();
    Ok(())
}

async fn deny(session: &Session, flash: Option<Flash>) -> Response {
    if let Err(e) = clear_auth_session(session).await {
        tracing::warn!(error = %e, "failed to clear session");
    }
    if let Some(flash) = flash {
        flash.push(session).await;
    }
    Redirect::to(LOGIN_PATH).into_response()
}

/// Admin gate middleware.
///
/// - No sign-in: redirect to the login screen.
/// - Expired access token: refresh it, or discard the session with a
///   "Session expired" notice.
/// - Cached verification for this user: let the request through.
/// - Otherwise look the role up. Without it the user is signed out and
///   sent back with "Access denied"; a failed lookup redirects with the
///   error as a notice.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = match session.get::<AuthSession>(session_keys::AUTH_SESSION).await {
        Ok(Some(auth)) => auth,
        Ok(None) => return deny(&session, None).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read session");
            return deny(&session, None).await;
        }
    };

    let service = AdminAuthService::new(state.store(), state.auth());

    let auth = if auth.is_expired() {
        match service.refresh(&auth).await {
            Ok(refreshed) => {
                if let Err(e) = session.insert(session_keys::AUTH_SESSION, &refreshed).await {
                    tracing::warn!(error = %e, "failed to store refreshed session");
                }
                tracing::debug!(user_id = %refreshed.user.id, "access token refreshed");
                refreshed
            }
            Err(e) => {
                tracing::info!(error = %e, "refresh failed");
                return deny(
                    &session,
                    Some(Flash::error("Session expired", "Please sign in again.")),
                )
                .await;
            }
        }
    } else {
        auth
    };

    let cached = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .filter(|admin| admin.user_id == auth.user.id);

    let admin = if let Some(admin) = cached {
        admin
    } else {
        match service.authorize(&auth).await {
            Ok(admin) => {
                if let Err(e) = session.insert(session_keys::CURRENT_ADMIN, &admin).await {
                    tracing::warn!(error = %e, "failed to cache admin verification");
                }
                admin
            }
            Err(AdminAuthError::AccessDenied) => {
                return deny(
                    &session,
                    Some(Flash::error(
                        "Access denied",
                        AdminAuthError::AccessDenied.to_string(),
                    )),
                )
                .await;
            }
            Err(e) => {
                tracing::error!(error = %e, "admin role lookup failed");
                Flash::error("Error", e.to_string()).push(&session).await;
                return Redirect::to(LOGIN_PATH).into_response();
            }
        }
    };

    set_sentry_user(&admin);
    request.extensions_mut().insert(AdminContext { admin, auth });
    next.run(request).await
}

/// Extractor for the context the admin gate attached to the request.
///
/// Handlers outside the gate get a redirect to the login screen.
pub struct RequireAdmin(pub AdminContext);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminContext>()
            .cloned()
            .map(Self)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
