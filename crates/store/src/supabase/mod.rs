//! Client for a hosted Supabase project.
//!
//! # Architecture
//!
//! - Table access goes through the `PostgREST` API at `/rest/v1`
//! - Sign-in goes through the `GoTrue` API at `/auth/v1`
//! - The remote project is the source of truth; nothing is synced locally
//!
//! Every request carries the project's anon key in the `apikey` header.
//! Calls made on behalf of a user also carry that user's access token as a
//! bearer token, which is what the row-level policies check.

mod auth;
mod rest;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::backend::Caller;
use crate::error::StoreError;

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: Url,
    /// Public anon key.
    pub anon_key: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for the Supabase table and auth APIs.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: Url,
    auth_url: Url,
    anon_key: SecretString,
}

impl SupabaseClient {
    /// Create a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the project
    /// URL cannot serve as a base.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("furnitureco/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base = config.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| StoreError::InvalidResponse(format!("invalid project URL: {e}")))
        };

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                rest_url: join("rest/v1/")?,
                auth_url: join("auth/v1/")?,
                anon_key: config.anon_key.clone(),
            }),
        })
    }

    /// Build a request with the project key and the caller's credentials.
    fn request(&self, method: Method, url: Url, caller: Caller<'_>) -> RequestBuilder {
        let anon_key = self.inner.anon_key.expose_secret();
        let bearer = caller.bearer().unwrap_or(anon_key);

        self.inner
            .client
            .request(method, url)
            .header("apikey", anon_key)
            .bearer_auth(bearer)
    }
}

/// Read `Retry-After` from a 429 response.
fn retry_after(response: &Response) -> Option<u64> {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    Some(
        response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1),
    )
}

/// Error body shapes used by `PostgREST` and `GoTrue`.
///
/// `PostgREST` sends `{code, message, details, hint}`; `GoTrue` has sent
/// both `{error, error_description}` and `{code, error_code, msg}` over time.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The most specific human-readable message in the body.
    fn message(&self, status: StatusCode, body: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| {
                let snippet: String = body.chars().take(200).collect();
                if snippet.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {snippet}")
                }
            })
    }

    /// String error code (`PostgREST` codes such as `23505`).
    fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_postgrest_error_body() {
        let body = r#"{"code":"23505","details":"Key (model)=(romeo) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"products_model_key\""}"#;
        let parsed = ErrorBody::parse(body);
        assert_eq!(parsed.code().as_deref(), Some("23505"));
        assert_eq!(
            parsed.message(StatusCode::CONFLICT, body),
            "duplicate key value violates unique constraint \"products_model_key\""
        );
    }

    #[test]
    fn test_gotrue_error_bodies() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            ErrorBody::parse(body).message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );

        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        let parsed = ErrorBody::parse(body);
        assert_eq!(parsed.code(), None);
        assert_eq!(
            parsed.message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );
    }

    #[test]
    fn test_non_json_error_body() {
        let parsed = ErrorBody::parse("<html>bad gateway</html>");
        assert_eq!(
            parsed.message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "HTTP 502 Bad Gateway: <html>bad gateway</html>"
        );
        assert_eq!(
            ErrorBody::parse("").message(StatusCode::BAD_GATEWAY, ""),
            "HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn test_client_joins_api_paths() {
        let client = SupabaseClient::new(&SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            anon_key: SecretString::from("anon".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            client.inner.rest_url.as_str(),
            "https://abcd.supabase.co/rest/v1/"
        );
        assert_eq!(
            client.inner.auth_url.as_str(),
            "https://abcd.supabase.co/auth/v1/"
        );
    }
}
