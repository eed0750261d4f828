//! Client-side item list with locally persisted favorites.

#[cfg(test)]
#[path = "items_test.rs"]
mod items_test;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::{CreateItemRequest, ImageUpload, ItemResponse};
use crate::util::storage::LocalStorage;

const FAVORITES_STORAGE_KEY: &str = "favorites";
const FETCH_FAILED: &str = "Failed to fetch items";
const ADD_FAILED: &str = "Failed to add item";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemsState {
    pub items: Vec<ItemResponse>,
    pub loading: bool,
    pub error: Option<String>,
    /// Favorite item ids, in the order they were added.
    pub favorites: Vec<i64>,
}

pub struct ItemsStore {
    api: Arc<ApiClient>,
    storage: Arc<LocalStorage>,
    state: RwLock<ItemsState>,
}

impl ItemsStore {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, storage: Arc<LocalStorage>) -> Self {
        Self { api, storage, state: RwLock::new(ItemsState::default()) }
    }

    pub async fn snapshot(&self) -> ItemsState {
        self.state.read().await.clone()
    }

    /// Replace the list with `GET /api/items`. On failure the previous list
    /// is kept and a fixed error message is recorded.
    ///
    /// # Errors
    ///
    /// Propagates the request failure after recording it.
    pub async fn fetch_items(&self) -> Result<usize, ApiError> {
        self.state.write().await.loading = true;
        let result = self.api.get_all_items().await;
        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                state.items = items;
                state.error = None;
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "fetching items failed");
                state.error = Some(FETCH_FAILED.to_owned());
                Err(err)
            }
        }
    }

    /// Create an item and append it to the list.
    ///
    /// # Errors
    ///
    /// Propagates the request failure after recording it.
    pub async fn add_item(&self, request: &CreateItemRequest, images: &[ImageUpload]) -> Result<ItemResponse, ApiError> {
        self.state.write().await.loading = true;
        let result = self.api.create_item(request, images).await;
        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(item) => {
                state.items.push(item.clone());
                state.error = None;
                Ok(item)
            }
            Err(err) => {
                tracing::warn!(error = %err, "adding item failed");
                state.error = Some(ADD_FAILED.to_owned());
                Err(err)
            }
        }
    }

    /// Flip an item's favorite flag and persist the list. Returns whether the
    /// item is now a favorite.
    pub async fn toggle_favorite(&self, item_id: i64) -> bool {
        let mut state = self.state.write().await;
        let now_favorite = match state.favorites.iter().position(|id| *id == item_id) {
            Some(index) => {
                state.favorites.remove(index);
                false
            }
            None => {
                state.favorites.push(item_id);
                true
            }
        };
        self.storage.save_json(FAVORITES_STORAGE_KEY, &state.favorites);
        now_favorite
    }

    /// Restore favorites from local storage. Missing or malformed content
    /// leaves the current list untouched.
    pub async fn load_favorites(&self) {
        if let Some(saved) = self.storage.load_json::<Vec<i64>>(FAVORITES_STORAGE_KEY) {
            self.state.write().await.favorites = saved;
        }
    }

    pub async fn is_favorite(&self, item_id: i64) -> bool {
        self.state.read().await.favorites.contains(&item_id)
    }

    /// Loaded items that are marked favorite.
    pub async fn favorite_items(&self) -> Vec<ItemResponse> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .filter(|item| item.id.is_some_and(|id| state.favorites.contains(&id)))
            .cloned()
            .collect()
    }

    pub async fn items_by_category(&self, category_id: i64) -> Vec<ItemResponse> {
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|item| item.category_id() == Some(category_id))
            .cloned()
            .collect()
    }
}
