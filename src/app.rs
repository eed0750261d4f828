//! Application context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `MarketplaceApp` owns every long-lived client component and wires them
//! together explicitly: storage → credential store → API client → session
//! store → router, plus the query client and items store. There are no
//! globals; the CLI and tests construct one context per process or case.
//!
//! BOOT SEQUENCE
//! =============
//! `boot()` restores local favorites and runs one passive identity check.
//! The router is usable afterwards; guarded navigations re-check lazily.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::credentials::CredentialStore;
use crate::query::QueryClient;
use crate::router::{NavigationDecision, Router};
use crate::state::items::ItemsStore;
use crate::state::session::{InitOutcome, SessionStore};
use crate::util::i18n::Locale;
use crate::util::image;
use crate::util::storage::LocalStorage;

pub struct MarketplaceApp {
    pub config: ClientConfig,
    pub storage: Arc<LocalStorage>,
    pub credentials: Arc<CredentialStore>,
    pub api: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub queries: QueryClient,
    pub items: ItemsStore,
    pub router: Router,
}

impl MarketplaceApp {
    /// Construct the context from config. Nothing is fetched until [`boot`](Self::boot).
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let storage = Arc::new(match &config.storage_dir {
            Some(dir) => LocalStorage::open(dir),
            None => LocalStorage::in_memory(),
        });
        let credentials = Arc::new(CredentialStore::new(Arc::clone(&storage)));
        let api = Arc::new(ApiClient::from_config(&config, Arc::clone(&credentials))?);
        let session = Arc::new(SessionStore::new(api.clone(), Arc::clone(&credentials)));
        let items = ItemsStore::new(Arc::clone(&api), Arc::clone(&storage));
        let router = Router::new(Arc::clone(&session));

        let queries = QueryClient::with_limits(config.query_cache);

        Ok(Self { config, storage, credentials, api, session, queries, items, router })
    }

    /// Restore local state and establish identity from the server session.
    pub async fn boot(&self) -> InitOutcome {
        self.items.load_favorites().await;
        let outcome = self.session.initialize().await;
        tracing::info!(
            api = %self.api.base_url(),
            authenticated = outcome.is_authenticated(),
            "client booted"
        );
        outcome
    }

    pub async fn navigate(&self, location: &str) -> NavigationDecision {
        self.router.navigate(location).await
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    /// Absolute URL for a stored image path.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        image::image_url(self.api.base_url(), path)
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;
