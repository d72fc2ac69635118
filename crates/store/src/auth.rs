//! Auth sessions issued by the auth service.

use chrono::{DateTime, TimeDelta, Utc};
use furnitureco_core::UserId;
use serde::{Deserialize, Serialize};

use crate::backend::Caller;

/// Seconds before actual expiry at which a token is treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// The signed-in user as the auth service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AuthUser {
    /// Email, phone or ID, whichever identifies the user first.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.email
            .clone()
            .or_else(|| self.phone.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Access and refresh tokens for one signed-in user.
///
/// Stored in the server-side session, so it is a plain serde struct rather
/// than holding `SecretString`s. `Debug` redacts the tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub obtained_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl AuthSession {
    /// Whether the access token is expired or about to be.
    ///
    /// A lifetime too large to add to the issue time counts as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let refresh_at = TimeDelta::try_seconds(self.expires_in.saturating_sub(EXPIRY_BUFFER_SECS))
            .and_then(|lifetime| self.obtained_at.checked_add_signed(lifetime));
        refresh_at.is_none_or(|at| Utc::now() >= at)
    }

    /// Run store calls as this user.
    #[must_use]
    pub fn caller(&self) -> Caller<'_> {
        Caller::Bearer(&self.access_token)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .field("user", &self.user)
            .finish()
    }
}
