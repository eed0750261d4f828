//! Query cache keyed by [`QueryKey`].
//!
//! DESIGN
//! ======
//! Entries live in a bounded `moka` cache so a long-lived client does not
//! grow with every distinct item id or filename it has looked at. An entry
//! carries its own `stale` flag: invalidation marks entries stale instead of
//! dropping them, so stale data stays readable until the next fetch replaces
//! it. Capacity eviction and the optional time-to-live do drop entries.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use super::{Mutation, Query, QueryKey};
use crate::config::QueryCacheLimits;
use crate::error::ApiError;

/// How [`QueryClient::fetch_query`] satisfied a query.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    /// The query is disabled; no call was made.
    Disabled,
    /// Fetched from the server and cached.
    Fresh(T),
    /// Served from a fresh cache entry.
    Cached(T),
}

impl<T> Fetched<T> {
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Disabled => None,
            Self::Fresh(value) | Self::Cached(value) => Some(value),
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

#[derive(Clone)]
struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    stale: bool,
}

pub struct QueryClient {
    cache: Cache<QueryKey, Entry>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::with_limits(QueryCacheLimits::default())
    }
}

impl QueryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache bounded by `limits.max_entries`, with entries expiring after
    /// `limits.ttl_secs` when set.
    #[must_use]
    pub fn with_limits(limits: QueryCacheLimits) -> Self {
        let mut builder = Cache::builder().max_capacity(limits.max_entries);
        if let Some(secs) = limits.ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(secs));
        }
        Self { cache: builder.build() }
    }

    /// Evaluate `query`: skip when disabled, serve a fresh cached entry, or
    /// fetch and cache.
    ///
    /// # Errors
    ///
    /// The fetch failed. A failed fetch leaves any existing entry untouched.
    pub async fn fetch_query<T>(&self, query: &Query<T>) -> Result<Fetched<T>, ApiError>
    where
        T: Clone + Send + Sync + 'static,
    {
        if !query.enabled {
            tracing::trace!(key = %query.key, "query disabled");
            return Ok(Fetched::Disabled);
        }
        if let Some(value) = self.fresh_value::<T>(&query.key).await {
            return Ok(Fetched::Cached(value));
        }

        tracing::debug!(key = %query.key, "fetching query");
        let value = query.fetch().await?;
        self.set_query_data(query.key.clone(), value.clone()).await;
        Ok(Fetched::Fresh(value))
    }

    /// Cached value for `key`, stale or not. A type mismatch reads as absent.
    pub async fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.cache.get(key).await?.value.downcast_ref::<T>().cloned()
    }

    /// Store `value` under `key` as a fresh entry.
    pub async fn set_query_data<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.cache.insert(key, Entry { value: Arc::new(value), stale: false }).await;
    }

    /// Whether the next evaluation of `key` would hit the server.
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.cache.get(key).await.is_none_or(|entry| entry.stale)
    }

    /// Mark every entry whose key starts with `prefix` as stale. Returns the
    /// number of entries marked.
    pub async fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let matching: Vec<(Arc<QueryKey>, Entry)> =
            self.cache.iter().filter(|(key, _)| key.starts_with(prefix)).collect();
        let marked = matching.len();
        for (key, entry) in matching.into_iter().filter(|(_, entry)| !entry.stale) {
            self.cache.insert(QueryKey::clone(&key), Entry { stale: true, ..entry }).await;
        }
        tracing::debug!(prefix = %prefix, marked, "invalidated queries");
        marked
    }

    /// Number of cached entries, after pending evictions have been applied.
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Run a mutation. The cache is left as is.
    ///
    /// # Errors
    ///
    /// Whatever the mutation's call returns.
    pub async fn mutate<P, R>(&self, mutation: &Mutation<P, R>, params: P) -> Result<R, ApiError> {
        tracing::debug!(mutation = mutation.key, "running mutation");
        mutation.run(params).await
    }

    async fn fresh_value<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.cache.get(key).await.filter(|entry| !entry.stale)?;
        entry.value.downcast_ref::<T>().cloned()
    }
}
