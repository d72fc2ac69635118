//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use furnitureco_core::UserId;
use furnitureco_store::AuthUser;
use serde::{Deserialize, Serialize};

/// Session-stored proof that the signed-in user holds the admin role.
///
/// Written once by the admin gate after a successful role lookup and
/// trusted for the rest of the session. Removed on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Auth user ID the check was made for.
    pub user_id: UserId,
    /// Email or phone, for the sidebar.
    pub display_name: String,
    /// When the role lookup succeeded.
    pub verified_at: DateTime<Utc>,
}

impl CurrentAdmin {
    #[must_use]
    pub fn verified(user: &AuthUser) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name(),
            verified_at: Utc::now(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Tokens returned by the auth service.
    pub const AUTH_SESSION: &str = "auth_session";

    /// Cached admin verification.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Phone number waiting for a one-time code.
    pub const OTP_PHONE: &str = "otp_phone";

    /// Queued notifications.
    pub const FLASH: &str = "flash";
}
