//! Error types for table and auth calls.

use thiserror::Error;

/// Postgres error code for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur when reading or writing tables.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The table API rejected the request. `message` is shown to admins as-is.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A row did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A keyed write matched no row.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Updates and deletes must be scoped by at least one filter.
    #[error("refusing to {0} without a filter")]
    MissingFilter(&'static str),

    /// Rate limited by the table API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response was well-formed HTTP but not what the API documents.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// HTTP status reported by the API, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    /// Whether the write collided with a unique constraint (e.g. a duplicate slug).
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == UNIQUE_VIOLATION)
            || matches!(self, Self::Api { status: 409, .. })
    }

    /// Whether the caller's token was missing, invalid or expired.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Errors that can occur when talking to the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The auth service refused the request. `message` is its own wording,
    /// e.g. "Invalid login credentials".
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rate limited by the auth service.
    #[error("Too many requests, retry after {0} seconds")]
    RateLimited(u64),
}

impl AuthError {
    /// HTTP status reported by the service, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection() {
        let err = StoreError::Api {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key value violates unique constraint \"products_model_key\""
                .to_string(),
        };
        assert!(err.is_unique_violation());
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint \"products_model_key\""
        );

        let err = StoreError::NotFound("product".to_string());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_auth_error_shows_service_message() {
        let err = AuthError::Rejected {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(err.status(), Some(400));
    }
}
