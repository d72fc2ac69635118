//! `GoTrue` implementation of [`AuthProvider`].

use async_trait::async_trait;
use chrono::Utc;
use furnitureco_core::{Email, PhoneNumber, UserId};
use reqwest::{Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;
use url::Url;

use super::{ErrorBody, SupabaseClient, retry_after};
use crate::auth::{AuthSession, AuthUser};
use crate::backend::{AuthProvider, Caller};
use crate::error::AuthError;

/// User object as returned by `GoTrue`.
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        // GoTrue reports an unset email/phone as ""
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            id: user.id,
            email: non_blank(user.email),
            phone: non_blank(user.phone),
        }
    }
}

/// Token grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            obtained_at: Utc::now(),
            user: token.user.into(),
        }
    }
}

/// Sign-up returns a session when email confirmation is off and a bare
/// user when it is on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(GoTrueUser),
}

impl SupabaseClient {
    fn auth_endpoint(&self, path: &str, grant_type: Option<&str>) -> Result<Url, AuthError> {
        let mut url = self.inner.auth_url.join(path).map_err(|e| AuthError::Rejected {
            status: 0,
            message: format!("invalid auth URL: {e}"),
        })?;
        if let Some(grant_type) = grant_type {
            url.query_pairs_mut().append_pair("grant_type", grant_type);
        }
        Ok(url)
    }
}

async fn check(response: Response) -> Result<String, AuthError> {
    if let Some(secs) = retry_after(&response) {
        return Err(AuthError::RateLimited(secs));
    }

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = ErrorBody::parse(&body).message(status, &body);
        tracing::warn!(status = %status, message = %message, "auth API rejected request");
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    let body = check(response).await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, "failed to parse auth API response");
        AuthError::Decode(e)
    })
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(&self, email: &Email, password: &SecretString) -> Result<AuthUser, AuthError> {
        let url = self.auth_endpoint("signup", None)?;
        let response = self
            .request(Method::POST, url, Caller::Anonymous)
            .json(&json!({
                "email": email.as_str(),
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        Ok(match read_json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(token) => token.user.into(),
            SignUpResponse::User(user) => user.into(),
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let url = self.auth_endpoint("token", Some("password"))?;
        let response = self
            .request(Method::POST, url, Caller::Anonymous)
            .json(&json!({
                "email": email.as_str(),
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        Ok(read_json::<TokenResponse>(response).await?.into())
    }

    #[instrument(skip(self), fields(phone = %phone))]
    async fn send_otp(&self, phone: &PhoneNumber) -> Result<(), AuthError> {
        let url = self.auth_endpoint("otp", None)?;
        let response = self
            .request(Method::POST, url, Caller::Anonymous)
            .json(&json!({ "phone": phone.as_str() }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    #[instrument(skip(self, code), fields(phone = %phone))]
    async fn verify_otp(&self, phone: &PhoneNumber, code: &str) -> Result<AuthSession, AuthError> {
        let url = self.auth_endpoint("verify", None)?;
        let response = self
            .request(Method::POST, url, Caller::Anonymous)
            .json(&json!({
                "type": "sms",
                "phone": phone.as_str(),
                "token": code,
            }))
            .send()
            .await?;

        Ok(read_json::<TokenResponse>(response).await?.into())
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let url = self.auth_endpoint("token", Some("refresh_token"))?;
        let response = self
            .request(Method::POST, url, Caller::Anonymous)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        Ok(read_json::<TokenResponse>(response).await?.into())
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let url = self.auth_endpoint("user", None)?;
        let response = self
            .request(Method::GET, url, Caller::Bearer(access_token))
            .send()
            .await?;

        Ok(read_json::<GoTrueUser>(response).await?.into())
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = self.auth_endpoint("logout", None)?;
        let response = self
            .request(Method::POST, url, Caller::Bearer(access_token))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_into_session() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "refresh_token": "refresh",
            "user": {
                "id": "3b241101-e2bb-4255-8caf-4136c566a962",
                "email": "owner@furnitureco.com",
                "phone": ""
            }
        }))
        .unwrap();

        let session: AuthSession = token.into();
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("owner@furnitureco.com"));
        assert_eq!(session.user.phone, None);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_sign_up_response_shapes() {
        let confirm_required: SignUpResponse = serde_json::from_value(json!({
            "id": "3b241101-e2bb-4255-8caf-4136c566a962",
            "email": "new@furnitureco.com",
            "confirmation_sent_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert!(matches!(confirm_required, SignUpResponse::User(_)));

        let auto_confirmed: SignUpResponse = serde_json::from_value(json!({
            "access_token": "jwt",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": {"id": "3b241101-e2bb-4255-8caf-4136c566a962"}
        }))
        .unwrap();
        assert!(matches!(auto_confirmed, SignUpResponse::Session(_)));
    }
}
