//! Application state shared across handlers.

use std::sync::Arc;

use furnitureco_store::{AuthProvider, TableStore};

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Holds the configuration and the two backend seams. The admin keeps no
/// cache: every page reads straight from the store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn TableStore>,
    auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn TableStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the table store.
    #[must_use]
    pub fn store(&self) -> &dyn TableStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the auth provider.
    #[must_use]
    pub fn auth(&self) -> &dyn AuthProvider {
        self.inner.auth.as_ref()
    }
}
