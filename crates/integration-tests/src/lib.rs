//! Integration tests for FurnitureCo.
//!
//! The storefront and admin routers are driven in-process with
//! `tower::ServiceExt::oneshot` against a shared
//! [`MemoryBackend`], so no network or hosted project is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p furnitureco-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::Response;
use furnitureco_admin::AdminConfig;
use furnitureco_core::{Role, UserId};
use furnitureco_store::memory::MemoryBackend;
use furnitureco_store::{AuthProvider, AuthSession, SupabaseConfig, Table};
use furnitureco_storefront::config::StorefrontConfig;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

pub const ADMIN_EMAIL: &str = "owner@furnitureco.com";
pub const ADMIN_PASSWORD: &str = "hunter22";

fn supabase_config() -> SupabaseConfig {
    SupabaseConfig {
        url: Url::parse("https://test.supabase.co").unwrap(),
        anon_key: SecretString::from("test-anon-key".to_string()),
        timeout: Duration::from_secs(5),
    }
}

/// Admin configuration for tests (plain HTTP, no Sentry).
#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        supabase: supabase_config(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Storefront configuration for tests.
#[must_use]
pub fn storefront_config(cache_ttl: Duration) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        supabase: supabase_config(),
        catalog_cache_ttl: cache_ttl,
        sentry_dsn: None,
        sentry_environment: "test".to_string(),
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the storefront over `backend`.
#[must_use]
pub fn storefront(backend: &Arc<MemoryBackend>) -> Router {
    let state = furnitureco_storefront::AppState::new(
        storefront_config(Duration::from_secs(60)),
        backend.clone(),
    );
    furnitureco_storefront::router(state)
}

/// Create an email user holding the admin role.
pub async fn seed_admin(backend: &MemoryBackend, email: &str) -> UserId {
    let user_id = backend.create_user(email, ADMIN_PASSWORD).await.unwrap();
    backend.grant_role(user_id, Role::Admin).await.unwrap();
    user_id
}

/// Sign in directly against the backend, outside the admin panel.
pub async fn direct_session(backend: &MemoryBackend, email: &str) -> AuthSession {
    backend
        .sign_in_with_password(
            &email.parse().unwrap(),
            &SecretString::from(ADMIN_PASSWORD.to_string()),
        )
        .await
        .unwrap()
}

/// Insert a product row, bypassing access rules.
pub async fn seed_product(backend: &MemoryBackend, row: Value) -> Value {
    backend.seed(Table::Products, row).await.unwrap()
}

/// Send a request through a router.
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Plain GET.
#[must_use]
pub fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

/// Form POST with a pre-encoded body.
#[must_use]
pub fn post_form(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// A browser session against the admin router: remembers the session
/// cookie between requests.
pub struct AdminClient {
    pub backend: Arc<MemoryBackend>,
    app: Router,
    cookie: Option<String>,
}

impl AdminClient {
    #[must_use]
    pub fn new(backend: Arc<MemoryBackend>) -> Self {
        let state = furnitureco_admin::AppState::new(
            admin_config(),
            backend.clone(),
            backend.clone(),
        );
        Self {
            app: furnitureco_admin::router(state),
            backend,
            cookie: None,
        }
    }

    /// Send a request with the current cookie and keep any new one.
    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }
        let response = send(&self.app, request).await;
        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }
        response
    }

    pub async fn get(&mut self, path: &str) -> Response {
        self.send(get(path)).await
    }

    pub async fn post(&mut self, path: &str, body: &str) -> Response {
        self.send(post_form(path, body)).await
    }

    /// GET and return the body, asserting a 200.
    pub async fn page(&mut self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        body_text(response).await
    }

    /// Sign in through the email form.
    pub async fn login(&mut self, email: &str) -> Response {
        self.post(
            "/admin/login/email",
            &format!("email={}&password={ADMIN_PASSWORD}", email.replace('@', "%40")),
        )
        .await
    }
}

/// `name=value` of the session cookie, if the response set one.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("fco_admin_session="))
        .map(str::to_string)
}
