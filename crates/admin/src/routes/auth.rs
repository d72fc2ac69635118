//! Sign-in, sign-up and sign-out.
//!
//! The login screen offers email + password (with a sign-up toggle) or a
//! phone number + SMS code. Every successful sign-in goes through the
//! admin role check before the session is established.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use furnitureco_store::AuthSession;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::render;
use crate::error::{AppError, set_sentry_user};
use crate::filters;
use crate::middleware::{LOGIN_PATH, clear_auth_session};
use crate::models::{CurrentAdmin, Flash, session_keys};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

const DASHBOARD_PATH: &str = "/admin/dashboard";
const EMAIL_LOGIN_PATH: &str = "/admin?method=email";
const SIGN_UP_PATH: &str = "/admin?method=email&mode=sign_up";
const PHONE_LOGIN_PATH: &str = "/admin?method=phone";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(login_page))
        .route("/admin/login/email", post(email_login))
        .route("/admin/login/otp/send", post(send_code))
        .route("/admin/login/otp/verify", post(verify_code))
        .route("/admin/login/otp/reset", post(reset_code))
        .route("/admin/logout", post(logout))
}

// =============================================================================
// Login page
// =============================================================================

/// Sign-in method tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    #[default]
    Email,
    Phone,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub method: LoginMethod,
    pub mode: Option<String>,
}

impl LoginQuery {
    fn is_sign_up(&self) -> bool {
        self.method == LoginMethod::Email && self.mode.as_deref() == Some("sign_up")
    }
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub is_phone: bool,
    pub is_sign_up: bool,
    /// Number a code was sent to; switches the phone tab to the code step.
    pub otp_phone: Option<String>,
    pub flashes: Vec<Flash>,
}

/// GET /admin
#[instrument(skip(session))]
async fn login_page(
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Result<Response, AppError> {
    let signed_in = session
        .get::<AuthSession>(session_keys::AUTH_SESSION)
        .await?
        .is_some();
    let verified = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?
        .is_some();
    if signed_in && verified {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let otp_phone = session.get::<String>(session_keys::OTP_PHONE).await?;
    let template = LoginTemplate {
        is_phone: query.method == LoginMethod::Phone,
        is_sign_up: query.is_sign_up(),
        otp_phone,
        flashes: Flash::take(&session).await,
    };
    Ok(render(&template)?.into_response())
}

// =============================================================================
// Email + password
// =============================================================================

#[derive(Deserialize)]
pub struct EmailLoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub mode: Option<String>,
}

/// POST /admin/login/email
///
/// Signs in, or creates an account when the form came from the sign-up
/// toggle.
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn email_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<EmailLoginForm>,
) -> Result<Redirect, AppError> {
    let service = AdminAuthService::new(state.store(), state.auth());
    let password = SecretString::from(form.password);

    if form.mode.as_deref() == Some("sign_up") {
        return Ok(match service.sign_up(&form.email, &password).await {
            Ok(_) => {
                Flash::success(
                    "Account created!",
                    "You can now sign in. An administrator must grant access before the panel opens.",
                )
                .push(&session)
                .await;
                Redirect::to(EMAIL_LOGIN_PATH)
            }
            Err(e) => {
                Flash::error("Sign up failed", e.to_string())
                    .push(&session)
                    .await;
                Redirect::to(SIGN_UP_PATH)
            }
        });
    }

    match service.sign_in(&form.email, &password).await {
        Ok(auth) => establish(&service, &session, auth, EMAIL_LOGIN_PATH).await,
        Err(e) => {
            Flash::error("Login failed", e.to_string()).push(&session).await;
            Ok(Redirect::to(EMAIL_LOGIN_PATH))
        }
    }
}

// =============================================================================
// Phone + one-time code
// =============================================================================

#[derive(Deserialize)]
pub struct SendCodeForm {
    pub phone: String,
}

/// POST /admin/login/otp/send
#[instrument(skip(state, session, form))]
async fn send_code(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SendCodeForm>,
) -> Result<Redirect, AppError> {
    let service = AdminAuthService::new(state.store(), state.auth());

    match service.send_otp(&form.phone).await {
        Ok(phone) => {
            session
                .insert(session_keys::OTP_PHONE, phone.as_str())
                .await?;
            Flash::success("Code sent", format!("Enter the code sent to {phone}."))
                .push(&session)
                .await;
        }
        Err(e) => {
            Flash::error("Could not send code", e.to_string())
                .push(&session)
                .await;
        }
    }
    Ok(Redirect::to(PHONE_LOGIN_PATH))
}

#[derive(Deserialize)]
pub struct VerifyCodeForm {
    pub code: String,
}

/// POST /admin/login/otp/verify
#[instrument(skip(state, session, form))]
async fn verify_code(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VerifyCodeForm>,
) -> Result<Redirect, AppError> {
    let Some(phone) = session.get::<String>(session_keys::OTP_PHONE).await? else {
        Flash::error("Code expired", "Request a new code to continue.")
            .push(&session)
            .await;
        return Ok(Redirect::to(PHONE_LOGIN_PATH));
    };

    let service = AdminAuthService::new(state.store(), state.auth());
    match service.verify_otp(&phone, &form.code).await {
        Ok(auth) => {
            session.remove::<String>(session_keys::OTP_PHONE).await?;
            establish(&service, &session, auth, PHONE_LOGIN_PATH).await
        }
        Err(e) => {
            Flash::error("Verification failed", e.to_string())
                .push(&session)
                .await;
            Ok(Redirect::to(PHONE_LOGIN_PATH))
        }
    }
}

/// POST /admin/login/otp/reset
///
/// Back to the phone-number step.
async fn reset_code(session: Session) -> Result<Redirect, AppError> {
    session.remove::<String>(session_keys::OTP_PHONE).await?;
    Ok(Redirect::to(PHONE_LOGIN_PATH))
}

/// Run the admin check on a fresh sign-in and store the result.
///
/// A user without the role has already been signed out by the check and
/// goes back to `retry_path` with the denial as a notice.
async fn establish(
    service: &AdminAuthService<'_>,
    session: &Session,
    auth: AuthSession,
    retry_path: &str,
) -> Result<Redirect, AppError> {
    let admin = match service.authorize(&auth).await {
        Ok(admin) => admin,
        Err(AdminAuthError::AccessDenied) => {
            clear_auth_session(session).await?;
            Flash::error("Access denied", AdminAuthError::AccessDenied.to_string())
                .push(session)
                .await;
            return Ok(Redirect::to(retry_path));
        }
        Err(e) => {
            tracing::error!(error = %e, "admin role lookup failed");
            service.sign_out(&auth).await;
            Flash::error("Error", e.to_string()).push(session).await;
            return Ok(Redirect::to(retry_path));
        }
    };

    session.cycle_id().await?;
    session.insert(session_keys::AUTH_SESSION, &auth).await?;
    session.insert(session_keys::CURRENT_ADMIN, &admin).await?;
    set_sentry_user(&admin);

    tracing::info!(user_id = %admin.user_id, "admin signed in");
    Flash::success("Welcome back", format!("Signed in as {}.", admin.display_name))
        .push(session)
        .await;
    Ok(Redirect::to(DASHBOARD_PATH))
}

// =============================================================================
// Sign-out
// =============================================================================

/// POST /admin/logout
///
/// Revokes the tokens at the auth service (best effort) and drops the
/// cached admin verification.
#[instrument(skip(state, session))]
async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect, AppError> {
    if let Some(auth) = session
        .get::<AuthSession>(session_keys::AUTH_SESSION)
        .await?
    {
        AdminAuthService::new(state.store(), state.auth())
            .sign_out(&auth)
            .await;
    }

    clear_auth_session(&session).await?;
    Flash::success("Logged out", "You have been signed out.")
        .push(&session)
        .await;
    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_only_on_email_tab() {
        let query = LoginQuery {
            method: LoginMethod::Email,
            mode: Some("sign_up".to_string()),
        };
        assert!(query.is_sign_up());

        let query = LoginQuery {
            method: LoginMethod::Phone,
            mode: Some("sign_up".to_string()),
        };
        assert!(!query.is_sign_up());
    }
}
