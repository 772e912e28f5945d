//! Application state shared across handlers.

use std::sync::Arc;

use blush_store::Store;
use blush_store::accounts::AccountService;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn Store>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn Store>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &(dyn Store + 'static) {
        self.inner.store.as_ref()
    }

    #[must_use]
    pub fn accounts(&self) -> AccountService<'_, dyn Store> {
        AccountService::new(self.store())
    }
}
