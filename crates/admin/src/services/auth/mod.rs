//! Admin authentication service.
//!
//! Two sign-in methods (email + password, phone + one-time code) funnel
//! into one admin-role check. A user who signs in without the role is
//! signed straight back out at the auth service.

mod error;

pub use error::AdminAuthError;

use furnitureco_core::{Email, PhoneNumber, Role};
use furnitureco_store::{AuthProvider, AuthSession, AuthUser, TableStore, UserRoleRepository};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::models::CurrentAdmin;

/// Minimum sign-up password length, matching the auth service's default.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Length of the SMS one-time code.
pub const OTP_CODE_LENGTH: usize = 6;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    store: &'a dyn TableStore,
    auth: &'a dyn AuthProvider,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn TableStore, auth: &'a dyn AuthProvider) -> Self {
        Self { store, auth }
    }

    // =========================================================================
    // Email + password
    // =========================================================================

    /// Register a new account. The account still needs an admin role
    /// granted before it can reach the panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed, the password is too
    /// short, or the auth service rejects the sign-up.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, AdminAuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AdminAuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let user = self.auth.sign_up(&email, password).await?;
        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or the credentials are
    /// rejected.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, AdminAuthError> {
        let email = Email::parse(email)?;
        Ok(self.auth.sign_in_with_password(&email, password).await?)
    }

    // =========================================================================
    // Phone + one-time code
    // =========================================================================

    /// Send a one-time code and return the normalized number.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is malformed or the auth service
    /// cannot send the code.
    #[instrument(skip(self))]
    pub async fn send_otp(&self, phone: &str) -> Result<PhoneNumber, AdminAuthError> {
        let phone = PhoneNumber::parse(phone)?;
        self.auth.send_otp(&phone).await?;
        tracing::info!(phone = %phone, "one-time code sent");
        Ok(phone)
    }

    /// Verify a one-time code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not six digits or is rejected.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<AuthSession, AdminAuthError> {
        let phone = PhoneNumber::parse(phone)?;
        let code = code.trim();
        if code.len() != OTP_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AdminAuthError::InvalidCode);
        }
        Ok(self.auth.verify_otp(&phone, code).await?)
    }

    // =========================================================================
    // Gate
    // =========================================================================

    /// Check the signed-in user for the admin role.
    ///
    /// On denial the session is signed out at the auth service before
    /// returning [`AdminAuthError::AccessDenied`].
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` without the role, or `Store` if the lookup
    /// itself failed.
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub async fn authorize(&self, session: &AuthSession) -> Result<CurrentAdmin, AdminAuthError> {
        let is_admin = UserRoleRepository::new(self.store, session.caller())
            .has_role(session.user.id, Role::Admin)
            .await?;

        if !is_admin {
            tracing::warn!("sign-in without admin role");
            self.sign_out(session).await;
            return Err(AdminAuthError::AccessDenied);
        }

        Ok(CurrentAdmin::verified(&session.user))
    }

    /// Exchange the refresh token for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is no longer valid.
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub async fn refresh(&self, session: &AuthSession) -> Result<AuthSession, AdminAuthError> {
        Ok(self.auth.refresh(&session.refresh_token).await?)
    }

    /// Revoke the session at the auth service. Failures are logged only:
    /// the local session is cleared either way.
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub async fn sign_out(&self, session: &AuthSession) {
        if let Err(e) = self.auth.sign_out(&session.access_token).await {
            tracing::warn!(error = %e, "remote sign-out failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use furnitureco_store::memory::MemoryBackend;

    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn test_authorize_grants_admin() {
        let backend = MemoryBackend::new();
        let user_id = backend
            .create_user("owner@furnitureco.com", "hunter22")
            .await
            .unwrap();
        backend.grant_role(user_id, Role::Admin).await.unwrap();

        let service = AdminAuthService::new(&backend, &backend);
        let session = service
            .sign_in("owner@furnitureco.com", &secret("hunter22"))
            .await
            .unwrap();
        let admin = service.authorize(&session).await.unwrap();

        assert_eq!(admin.user_id, user_id);
        assert_eq!(admin.display_name, "owner@furnitureco.com");
    }

    #[tokio::test]
    async fn test_authorize_denies_and_signs_out() {
        let backend = MemoryBackend::new();
        backend
            .create_user("visitor@furnitureco.com", "hunter22")
            .await
            .unwrap();

        let service = AdminAuthService::new(&backend, &backend);
        let session = service
            .sign_in("visitor@furnitureco.com", &secret("hunter22"))
            .await
            .unwrap();

        let err = service.authorize(&session).await.unwrap_err();
        assert!(matches!(err, AdminAuthError::AccessDenied));
        assert!(!backend.is_signed_in(&session.access_token).await);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_short_password() {
        let backend = MemoryBackend::new();
        let service = AdminAuthService::new(&backend, &backend);

        let err = service
            .sign_up("new@furnitureco.com", &secret("12345"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminAuthError::WeakPassword { min: 6 }));
    }

    #[tokio::test]
    async fn test_verify_otp_checks_code_shape() {
        let backend = MemoryBackend::new();
        let service = AdminAuthService::new(&backend, &backend);

        let err = service.verify_otp("+254712345678", "12ab").await.unwrap_err();
        assert!(matches!(err, AdminAuthError::InvalidCode));
    }

    #[tokio::test]
    async fn test_otp_round_trip() {
        let backend = MemoryBackend::new();
        let service = AdminAuthService::new(&backend, &backend);

        let phone = service.send_otp("+254 712 345 678").await.unwrap();
        let code = backend.last_otp(phone.as_str()).await.unwrap();
        let session = service.verify_otp(phone.as_str(), &code).await.unwrap();

        assert_eq!(session.user.phone.as_deref(), Some("+254712345678"));
    }

    #[tokio::test]
    async fn test_wrong_credentials_surface_service_message() {
        let backend = MemoryBackend::new();
        let service = AdminAuthService::new(&backend, &backend);

        let err = service
            .sign_in("nobody@furnitureco.com", &secret("whatever"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
