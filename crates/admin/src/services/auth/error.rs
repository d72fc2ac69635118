//! Admin authentication error types.

use furnitureco_store::{AuthError, StoreError};
use thiserror::Error;

/// Errors that can occur during admin sign-in and the admin gate.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] furnitureco_core::EmailError),

    /// Invalid phone number format.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] furnitureco_core::PhoneError),

    /// Password too short for sign-up.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// One-time code is not six digits.
    #[error("Enter the 6-digit code sent to your phone")]
    InvalidCode,

    /// Signed in, but without the admin role.
    #[error("Access denied. Admin privileges required.")]
    AccessDenied,

    /// The auth service rejected the request.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The role lookup failed.
    #[error("{0}")]
    Store(#[from] StoreError),
}
