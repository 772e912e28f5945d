//! Application state shared across handlers.

use std::sync::Arc;

use blush_store::Store;
use blush_store::accounts::AccountService;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; the store is injected so tests can hand in a
/// [`blush_store::MemoryStore`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn Store>,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn Store>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the document store.
    #[must_use]
    pub fn store(&self) -> &(dyn Store + 'static) {
        self.inner.store.as_ref()
    }

    /// Account operations over the store's user collection.
    #[must_use]
    pub fn accounts(&self) -> AccountService<'_, dyn Store> {
        AccountService::new(self.store())
    }
}
