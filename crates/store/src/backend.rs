//! The seams between the site and its hosted backend.
//!
//! [`TableStore`] covers row access and [`AuthProvider`] covers sign-in.
//! Both are implemented by [`crate::SupabaseClient`] and, behind the
//! `memory` feature, by [`crate::memory::MemoryBackend`].

use async_trait::async_trait;
use furnitureco_core::{Email, PhoneNumber};
use secrecy::SecretString;
use serde_json::Value;

use crate::auth::{AuthSession, AuthUser};
use crate::error::{AuthError, StoreError};
use crate::query::{Filter, Select, Table};

/// Identity a table call runs as.
///
/// Row-level policies on the remote side decide what each identity may do:
/// anonymous callers can read the public tables, writes need a user token
/// whose owner holds the admin role.
#[derive(Clone, Copy)]
pub enum Caller<'a> {
    Anonymous,
    Bearer(&'a str),
}

impl Caller<'_> {
    #[must_use]
    pub const fn bearer(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Bearer(token) => Some(*token),
        }
    }
}

impl std::fmt::Debug for Caller<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Bearer(_) => f.write_str("Bearer([REDACTED])"),
        }
    }
}

/// Row access against the four site tables.
///
/// Rows are exchanged as JSON objects; the repositories in [`crate::repo`]
/// give them types.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Filtered, ordered read.
    async fn select(
        &self,
        caller: Caller<'_>,
        table: Table,
        query: &Select,
    ) -> Result<Vec<Value>, StoreError>;

    /// Exact row count.
    async fn count(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<u64, StoreError>;

    /// Insert rows; returns them as stored.
    async fn insert(
        &self,
        caller: Caller<'_>,
        table: Table,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Merge `patch` into every matching row; returns the updated rows.
    async fn update(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Insert-or-merge keyed on `on_conflict` (comma-separated columns),
    /// applied as one statement: either every row is written or none is.
    async fn upsert(
        &self,
        caller: Caller<'_>,
        table: Table,
        on_conflict: &'static str,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Delete every matching row; returns the deleted rows.
    async fn delete(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError>;
}

/// Email/password and phone one-time-code authentication.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new email/password account.
    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<AuthUser, AuthError>;

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError>;

    /// Text a one-time code to `phone`.
    async fn send_otp(&self, phone: &PhoneNumber) -> Result<(), AuthError>;

    async fn verify_otp(&self, phone: &PhoneNumber, code: &str) -> Result<AuthSession, AuthError>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    /// The user an access token belongs to.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    /// Revoke the session behind an access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
