//! In-memory backend for tests and offline development.
//!
//! Mirrors the behaviour of the hosted project closely enough for the
//! routers to be exercised end to end:
//!
//! - the public tables are readable anonymously, `user_roles` only by the
//!   row's owner
//! - every write requires a bearer token whose user holds the admin role
//! - `products.model`, `site_content.section` and `(user_roles.user_id,
//!   user_roles.role)` are unique
//! - writes are applied to a copy of the table and committed only when the
//!   whole batch succeeds
//! - descending order puts `null`s first, ascending puts them last

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use furnitureco_core::{Email, PhoneNumber, Role, UserId};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::{AuthSession, AuthUser};
use crate::backend::{AuthProvider, Caller, TableStore};
use crate::error::{AuthError, StoreError};
use crate::query::{Direction, Filter, Select, Table};

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct MemoryUser {
    id: UserId,
    email: Option<Email>,
    phone: Option<PhoneNumber>,
    password: Option<String>,
}

impl MemoryUser {
    fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.as_ref().map(|e| e.as_str().to_string()),
            phone: self.phone.as_ref().map(|p| p.as_str().to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Value>>,
    users: Vec<MemoryUser>,
    access_tokens: HashMap<String, UserId>,
    refresh_tokens: HashMap<String, UserId>,
    pending_otps: HashMap<String, String>,
    token_ttl_secs: i64,
    last_created_at: Option<DateTime<Utc>>,
    fail_next_write: Option<String>,
    fail_next_read: Option<String>,
}

/// A self-contained stand-in for the hosted table and auth APIs.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_keys(table: Table) -> &'static [&'static [&'static str]] {
    match table {
        Table::Products => &[&["model"]],
        Table::SiteContent => &[&["section"]],
        Table::UserRoles => &[&["user_id", "role"]],
        Table::ContactInfo => &[],
    }
}

/// Text form of a column value, as compared by `eq` filters.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| {
        row.get(f.column)
            .is_some_and(|value| value_text(value) == f.value)
    })
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&b.as_f64().unwrap_or_default()),
        _ => value_text(a).cmp(&value_text(b)),
    }
}

fn compare_rows(a: &Value, b: &Value, column: &str, direction: Direction) -> Ordering {
    let a = a.get(column).filter(|v| !v.is_null());
    let b = b.get(column).filter(|v| !v.is_null());
    match (a, b, direction) {
        (None, None, _) => Ordering::Equal,
        (None, Some(_), Direction::Asc) | (Some(_), None, Direction::Desc) => Ordering::Greater,
        (None, Some(_), Direction::Desc) | (Some(_), None, Direction::Asc) => Ordering::Less,
        (Some(a), Some(b), Direction::Asc) => compare_present(a, b),
        (Some(a), Some(b), Direction::Desc) => compare_present(b, a),
    }
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

fn as_object(row: Value) -> Result<Map<String, Value>, StoreError> {
    match row {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Api {
            status: 400,
            code: Some("PGRST102".to_string()),
            message: format!("expected a JSON object, got {other}"),
        }),
    }
}

fn unique_violation(table: Table, columns: &[&str]) -> StoreError {
    StoreError::Api {
        status: 409,
        code: Some("23505".to_string()),
        message: format!(
            "duplicate key value violates unique constraint \"{}_{}_key\"",
            table.name(),
            columns.join("_")
        ),
    }
}

fn check_unique(table: Table, rows: &[Value]) -> Result<(), StoreError> {
    for columns in unique_keys(table) {
        let mut seen = std::collections::HashSet::new();
        for row in rows {
            let key: Vec<String> = columns
                .iter()
                .map(|c| row.get(*c).map(value_text).unwrap_or_default())
                .collect();
            if !seen.insert(key) {
                return Err(unique_violation(table, columns));
            }
        }
    }
    Ok(())
}

fn rejected(status: u16, message: &str) -> AuthError {
    AuthError::Rejected {
        status,
        message: message.to_string(),
    }
}

impl MemoryState {
    fn next_created_at(&mut self) -> String {
        let mut now = Utc::now();
        if let Some(last) = self.last_created_at
            && now <= last
        {
            now = last + Duration::microseconds(1);
        }
        self.last_created_at = Some(now);
        now.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn stamp(&mut self, mut row: Map<String, Value>) -> Value {
        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        if !row.contains_key("created_at") {
            let created_at = self.next_created_at();
            row.insert("created_at".to_string(), Value::String(created_at));
        }
        Value::Object(row)
    }

    fn user_for_token(&self, token: &str) -> Result<UserId, StoreError> {
        self.access_tokens
            .get(token)
            .copied()
            .ok_or_else(|| StoreError::Api {
                status: 401,
                code: Some("PGRST301".to_string()),
                message: "JWT expired".to_string(),
            })
    }

    fn is_admin(&self, user_id: UserId) -> bool {
        let user_id = user_id.to_string();
        self.tables.get(&Table::UserRoles).is_some_and(|rows| {
            rows.iter().any(|row| {
                row.get("user_id").map(value_text).as_deref() == Some(user_id.as_str())
                    && row.get("role").map(value_text).as_deref() == Some(Role::Admin.as_str())
            })
        })
    }

    /// Rows of `table` visible to `caller`.
    fn readable(&self, caller: Caller<'_>, table: Table) -> Result<Vec<Value>, StoreError> {
        let rows = self.tables.get(&table).cloned().unwrap_or_default();
        if table != Table::UserRoles {
            return Ok(rows);
        }
        // Owners see their own role rows; anonymous callers see none.
        let Some(token) = caller.bearer() else {
            return Ok(Vec::new());
        };
        let owner = self.user_for_token(token)?.to_string();
        Ok(rows
            .into_iter()
            .filter(|row| row.get("user_id").map(value_text).as_deref() == Some(owner.as_str()))
            .collect())
    }

    /// Gate for every write: an admin's bearer token and no injected failure.
    fn authorize_write(&mut self, caller: Caller<'_>, table: Table) -> Result<(), StoreError> {
        if let Some(message) = self.fail_next_write.take() {
            return Err(StoreError::Api {
                status: 503,
                code: None,
                message,
            });
        }

        let denied = || StoreError::Api {
            status: 403,
            code: Some("42501".to_string()),
            message: format!(
                "new row violates row-level security policy for table \"{}\"",
                table.name()
            ),
        };

        let Some(token) = caller.bearer() else {
            return Err(denied());
        };
        let user_id = self.user_for_token(token)?;
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(denied())
        }
    }

    fn issue_session(&mut self, user_id: UserId) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| rejected(404, "User not found"))?
            .to_auth_user();

        let access_token = format!("mem-at-{}", Uuid::new_v4());
        let refresh_token = format!("mem-rt-{}", Uuid::new_v4());
        self.access_tokens.insert(access_token.clone(), user_id);
        self.refresh_tokens.insert(refresh_token.clone(), user_id);

        Ok(AuthSession {
            access_token,
            refresh_token,
            expires_in: self.token_ttl_secs,
            obtained_at: Utc::now(),
            user,
        })
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
                ..MemoryState::default()
            }),
        }
    }

    /// Insert a row directly, bypassing access rules. Returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the row is not an object or breaks a unique key.
    pub async fn seed(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let mut state = self.state.lock().await;
        let row = as_object(row)?;
        let row = state.stamp(row);
        let mut rows = state.tables.get(&table).cloned().unwrap_or_default();
        rows.push(row.clone());
        check_unique(table, &rows)?;
        state.tables.insert(table, rows);
        Ok(row)
    }

    /// Grant a role directly, bypassing access rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the user already holds the role.
    pub async fn grant_role(&self, user_id: UserId, role: Role) -> Result<(), StoreError> {
        self.seed(
            Table::UserRoles,
            json!({ "user_id": user_id, "role": role }),
        )
        .await
        .map(|_| ())
    }

    /// Create an email/password account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the password is too short.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let email = Email::parse(email).map_err(|e| rejected(422, &e.to_string()))?;
        let password = SecretString::from(password.to_string());
        Ok(self.sign_up(&email, &password).await?.id)
    }

    /// Every row of a table, in storage order.
    pub async fn rows(&self, table: Table) -> Vec<Value> {
        self.state
            .lock()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// The code most recently texted to `phone`.
    pub async fn last_otp(&self, phone: &str) -> Option<String> {
        let phone = PhoneNumber::parse(phone).ok()?;
        self.state
            .lock()
            .await
            .pending_otps
            .get(phone.as_str())
            .cloned()
    }

    /// Lifetime of sessions issued from now on.
    pub async fn set_token_ttl(&self, secs: i64) {
        self.state.lock().await.token_ttl_secs = secs;
    }

    /// Make the next write fail with `message` without touching any table.
    pub async fn fail_next_write(&self, message: &str) {
        self.state.lock().await.fail_next_write = Some(message.to_string());
    }

    /// Make the next read fail with `message`.
    pub async fn fail_next_read(&self, message: &str) {
        self.state.lock().await.fail_next_read = Some(message.to_string());
    }

    /// Number of access tokens that have not been revoked or refreshed away.
    pub async fn live_sessions(&self) -> usize {
        self.state.lock().await.access_tokens.len()
    }

    /// Whether an access token is still live.
    pub async fn is_signed_in(&self, access_token: &str) -> bool {
        self.state
            .lock()
            .await
            .access_tokens
            .contains_key(access_token)
    }
}

#[async_trait]
impl TableStore for MemoryBackend {
    async fn select(
        &self,
        caller: Caller<'_>,
        table: Table,
        query: &Select,
    ) -> Result<Vec<Value>, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.fail_next_read.take() {
            return Err(StoreError::Api {
                status: 503,
                code: None,
                message,
            });
        }
        let mut rows: Vec<Value> = state
            .readable(caller, table)?
            .into_iter()
            .filter(|row| matches(row, &query.filters))
            .collect();

        rows.sort_by(|a, b| {
            query
                .order
                .iter()
                .map(|o| compare_rows(a, b, o.column, o.direction))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn count(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<u64, StoreError> {
        let state = self.state.lock().await;
        let count = state
            .readable(caller, table)?
            .iter()
            .filter(|row| matches(row, filters))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn insert(
        &self,
        caller: Caller<'_>,
        table: Table,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut state = self.state.lock().await;
        state.authorize_write(caller, table)?;

        let mut next = state.tables.get(&table).cloned().unwrap_or_default();
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let row = state.stamp(as_object(row)?);
            next.push(row.clone());
            inserted.push(row);
        }
        check_unique(table, &next)?;

        state.tables.insert(table, next);
        Ok(inserted)
    }

    async fn update(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::MissingFilter("update"));
        }
        let mut state = self.state.lock().await;
        state.authorize_write(caller, table)?;

        let mut next = state.tables.get(&table).cloned().unwrap_or_default();
        let mut updated = Vec::new();
        for row in next.iter_mut().filter(|row| matches(row, filters)) {
            merge(row, &patch);
            updated.push(row.clone());
        }
        check_unique(table, &next)?;

        state.tables.insert(table, next);
        Ok(updated)
    }

    async fn upsert(
        &self,
        caller: Caller<'_>,
        table: Table,
        on_conflict: &'static str,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut state = self.state.lock().await;
        state.authorize_write(caller, table)?;

        let columns: Vec<&str> = on_conflict.split(',').map(str::trim).collect();
        let mut next = state.tables.get(&table).cloned().unwrap_or_default();
        let mut written = Vec::with_capacity(rows.len());

        for row in rows {
            let row = as_object(row)?;
            let key: Vec<String> = columns
                .iter()
                .map(|c| row.get(*c).map(value_text).unwrap_or_default())
                .collect();

            let existing = next.iter_mut().find(|stored| {
                columns
                    .iter()
                    .zip(&key)
                    .all(|(c, value)| stored.get(*c).map(value_text).as_ref() == Some(value))
            });

            match existing {
                Some(stored) => {
                    merge(stored, &Value::Object(row));
                    written.push(stored.clone());
                }
                None => {
                    let row = state.stamp(row);
                    next.push(row.clone());
                    written.push(row);
                }
            }
        }
        check_unique(table, &next)?;

        state.tables.insert(table, next);
        Ok(written)
    }

    async fn delete(
        &self,
        caller: Caller<'_>,
        table: Table,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::MissingFilter("delete"));
        }
        let mut state = self.state.lock().await;
        state.authorize_write(caller, table)?;

        let rows = state.tables.remove(&table).unwrap_or_default();
        let (deleted, kept): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|row| matches(row, filters));
        state.tables.insert(table, kept);
        Ok(deleted)
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<AuthUser, AuthError> {
        let mut state = self.state.lock().await;
        if password.expose_secret().len() < MIN_PASSWORD_LEN {
            return Err(rejected(
                422,
                "Password should be at least 6 characters.",
            ));
        }
        if state.users.iter().any(|u| u.email.as_ref() == Some(email)) {
            return Err(rejected(422, "User already registered"));
        }

        let user = MemoryUser {
            id: UserId::new_v4(),
            email: Some(email.clone()),
            phone: None,
            password: Some(password.expose_secret().to_string()),
        };
        let auth_user = user.to_auth_user();
        state.users.push(user);
        Ok(auth_user)
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let mut state = self.state.lock().await;
        let user_id = state
            .users
            .iter()
            .find(|u| {
                u.email.as_ref() == Some(email)
                    && u.password.as_deref() == Some(password.expose_secret())
            })
            .map(|u| u.id)
            .ok_or_else(|| rejected(400, "Invalid login credentials"))?;
        state.issue_session(user_id)
    }

    async fn send_otp(&self, phone: &PhoneNumber) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        if !state.users.iter().any(|u| u.phone.as_ref() == Some(phone)) {
            state.users.push(MemoryUser {
                id: UserId::new_v4(),
                email: None,
                phone: Some(phone.clone()),
                password: None,
            });
        }
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        state.pending_otps.insert(phone.as_str().to_string(), code);
        Ok(())
    }

    async fn verify_otp(&self, phone: &PhoneNumber, code: &str) -> Result<AuthSession, AuthError> {
        let mut state = self.state.lock().await;
        let expected = state.pending_otps.get(phone.as_str());
        if expected.map(String::as_str) != Some(code) {
            return Err(rejected(403, "Token has expired or is invalid"));
        }
        state.pending_otps.remove(phone.as_str());

        let user_id = state
            .users
            .iter()
            .find(|u| u.phone.as_ref() == Some(phone))
            .map(|u| u.id)
            .ok_or_else(|| rejected(404, "User not found"))?;
        state.issue_session(user_id)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let mut state = self.state.lock().await;
        let user_id = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| rejected(400, "Invalid Refresh Token: Refresh Token Not Found"))?;
        state.issue_session(user_id)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let state = self.state.lock().await;
        let user_id = state
            .access_tokens
            .get(access_token)
            .ok_or_else(|| rejected(401, "invalid JWT"))?;
        state
            .users
            .iter()
            .find(|u| u.id == *user_id)
            .map(MemoryUser::to_auth_user)
            .ok_or_else(|| rejected(404, "User not found"))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        if let Some(user_id) = state.access_tokens.remove(access_token) {
            state.refresh_tokens.retain(|_, owner| *owner != user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn admin_session(backend: &MemoryBackend) -> AuthSession {
        let user_id = backend
            .create_user("owner@furnitureco.com", "secret123")
            .await
            .unwrap();
        backend.grant_role(user_id, Role::Admin).await.unwrap();
        backend
            .sign_in_with_password(
                &Email::parse("owner@furnitureco.com").unwrap(),
                &SecretString::from("secret123".to_string()),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_select_orders_featured_then_newest() {
        let backend = MemoryBackend::new();
        backend
            .seed(Table::Products, json!({"name": "A", "model": "a", "featured": false}))
            .await
            .unwrap();
        backend
            .seed(Table::Products, json!({"name": "B", "model": "b", "featured": true}))
            .await
            .unwrap();
        backend
            .seed(Table::Products, json!({"name": "C", "model": "c", "featured": false}))
            .await
            .unwrap();

        let query = Select::all()
            .order_by("featured", Direction::Desc)
            .order_by("created_at", Direction::Desc);
        let rows = backend
            .select(Caller::Anonymous, Table::Products, &query)
            .await
            .unwrap();
        let models: Vec<_> = rows.iter().map(|r| r["model"].as_str().unwrap()).collect();
        assert_eq!(models, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_writes_require_admin() {
        let backend = MemoryBackend::new();
        let err = backend
            .insert(Caller::Anonymous, Table::Products, vec![json!({"name": "A", "model": "a"})])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));

        let user_id = backend.create_user("user@example.com", "secret123").await.unwrap();
        let session = backend
            .sign_in_with_password(
                &Email::parse("user@example.com").unwrap(),
                &SecretString::from("secret123".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(session.user.id, user_id);
        let err = backend
            .insert(session.caller(), Table::Products, vec![json!({"name": "A", "model": "a"})])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_unique_model_rejected_without_partial_write() {
        let backend = MemoryBackend::new();
        let session = admin_session(&backend).await;

        let err = backend
            .insert(
                session.caller(),
                Table::Products,
                vec![
                    json!({"name": "A", "model": "romeo"}),
                    json!({"name": "B", "model": "romeo"}),
                ],
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
        assert!(backend.rows(Table::Products).await.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_merges_on_conflict_column() {
        let backend = MemoryBackend::new();
        let session = admin_session(&backend).await;
        backend
            .seed(Table::SiteContent, json!({"section": "hero", "title": "Old", "content": "Old"}))
            .await
            .unwrap();

        let written = backend
            .upsert(
                session.caller(),
                Table::SiteContent,
                "section",
                vec![
                    json!({"section": "hero", "title": "New", "content": "Body"}),
                    json!({"section": "about_intro", "title": "Intro", "content": ""}),
                ],
            )
            .await
            .unwrap();

        assert_eq!(written.len(), 2);
        let rows = backend.rows(Table::SiteContent).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "New");
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_table_untouched() {
        let backend = MemoryBackend::new();
        let session = admin_session(&backend).await;
        backend.fail_next_write("connection reset").await;

        let err = backend
            .upsert(
                session.caller(),
                Table::SiteContent,
                "section",
                vec![json!({"section": "hero", "title": "New"})],
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(backend.rows(Table::SiteContent).await.is_empty());
    }

    #[tokio::test]
    async fn test_user_roles_visible_only_to_owner() {
        let backend = MemoryBackend::new();
        let session = admin_session(&backend).await;
        let other = UserId::new_v4();
        backend.grant_role(other, Role::Admin).await.unwrap();

        let rows = backend
            .select(session.caller(), Table::UserRoles, &Select::all())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let rows = backend
            .select(Caller::Anonymous, Table::UserRoles, &Select::all())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_otp_flow() {
        let backend = MemoryBackend::new();
        let phone = PhoneNumber::parse("+254712345678").unwrap();
        backend.send_otp(&phone).await.unwrap();

        let wrong = backend.verify_otp(&phone, "000000x").await.unwrap_err();
        assert_eq!(wrong.to_string(), "Token has expired or is invalid");

        let code = backend.last_otp("+254 712 345 678").await.unwrap();
        assert_eq!(code.len(), 6);
        let session = backend.verify_otp(&phone, &code).await.unwrap();
        assert_eq!(session.user.phone.as_deref(), Some("+254712345678"));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_tokens() {
        let backend = MemoryBackend::new();
        let session = admin_session(&backend).await;
        assert!(backend.is_signed_in(&session.access_token).await);

        backend.sign_out(&session.access_token).await.unwrap();
        assert!(!backend.is_signed_in(&session.access_token).await);
        assert!(backend.refresh(&session.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password() {
        let backend = MemoryBackend::new();
        backend.create_user("owner@furnitureco.com", "secret123").await.unwrap();
        let err = backend
            .sign_in_with_password(
                &Email::parse("owner@furnitureco.com").unwrap(),
                &SecretString::from("wrong-password".to_string()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
