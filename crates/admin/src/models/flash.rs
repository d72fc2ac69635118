//! One-shot notifications carried across a redirect.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session_keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier for the notice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A notification shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub title: String,
    pub message: String,
}

impl Flash {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Queue a notification for the next page.
    ///
    /// A session failure only loses the notice, so it is logged rather than
    /// returned.
    pub async fn push(self, session: &Session) {
        let mut queued = Self::peek(session).await;
        queued.push(self);
        if let Err(e) = session.insert(session_keys::FLASH, queued).await {
            tracing::warn!(error = %e, "failed to queue flash message");
        }
    }

    /// Take every queued notification.
    pub async fn take(session: &Session) -> Vec<Self> {
        match session.remove::<Vec<Self>>(session_keys::FLASH).await {
            Ok(queued) => queued.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read flash messages");
                Vec::new()
            }
        }
    }

    async fn peek(session: &Session) -> Vec<Self> {
        session
            .get::<Vec<Self>>(session_keys::FLASH)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        Flash::success("Saved", "Product created").push(&session).await;
        Flash::error("Oops", "Something failed").push(&session).await;

        let taken = Flash::take(&session).await;
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].kind, FlashKind::Success);
        assert_eq!(taken[1].message, "Something failed");

        assert!(Flash::take(&session).await.is_empty());
    }
}
