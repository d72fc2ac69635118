//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email/password and phone OTP sign-in, gated on the admin role

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService};
