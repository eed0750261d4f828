//! Cache-keyed queries and mutations over the REST client.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`Query`] pairs a typed HTTP call with a [`QueryKey`] and an enable flag;
//! a disabled query never fires. A [`Mutation`] pairs a fixed key with a call
//! taking a parameter object. [`QueryClient`] caches query results by key and
//! never invalidates anything on its own: callers decide what a successful
//! mutation makes stale.

pub mod bindings;
pub mod client;
pub mod key;

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

pub use client::{Fetched, QueryClient};
pub use key::{KeySegment, QueryKey, Truthy};

use crate::error::ApiError;

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;
type Runner<P, R> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync>;

pub struct Query<T> {
    pub key: QueryKey,
    pub enabled: bool,
    fetcher: Fetcher<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self { key: self.key.clone(), enabled: self.enabled, fetcher: Arc::clone(&self.fetcher) }
    }
}

impl<T> Query<T> {
    pub fn new<F, Fut>(key: QueryKey, enabled: bool, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self { key, enabled, fetcher: Arc::new(move || Box::pin(fetch())) }
    }

    /// Issue the HTTP call directly, bypassing the cache and the enable flag.
    ///
    /// # Errors
    ///
    /// Whatever the underlying call returns.
    pub async fn fetch(&self) -> Result<T, ApiError> {
        (self.fetcher)().await
    }
}

pub struct Mutation<P, R> {
    pub key: &'static str,
    run: Runner<P, R>,
}

impl<P, R> Mutation<P, R> {
    pub fn new<F, Fut>(key: &'static str, run: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    {
        Self { key, run: Arc::new(move |params| Box::pin(run(params))) }
    }

    /// Unpack `params` and invoke the call.
    ///
    /// # Errors
    ///
    /// Whatever the underlying call returns.
    pub async fn run(&self, params: P) -> Result<R, ApiError> {
        (self.run)(params).await
    }
}
