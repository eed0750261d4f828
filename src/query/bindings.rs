//! Query and mutation bindings for the marketplace endpoints.
//!
//! Each query binding derives its key from the endpoint path and its
//! parameters in positional order, and is enabled only when every required
//! path parameter is truthy. Mutation bindings carry the fixed keys the
//! views use and take a parameter object.

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use std::future::Future;
use std::sync::Arc;

use super::key::{QueryKey, Truthy};
use super::{Mutation, Query};
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::types::{
    CategoryResponse, CreateItemRequest, ImageUpload, ItemResponse, MessageResponse, UpdateEmailRequest,
    UpdatePasswordRequest, UpdateUsernameRequest, UserResponse,
};
use crate::query_key;

fn bind<T, F, Fut>(api: &Arc<ApiClient>, key: QueryKey, enabled: bool, call: F) -> Query<T>
where
    F: Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let api = Arc::clone(api);
    Query::new(key, enabled, move || call(Arc::clone(&api)))
}

fn bind_mutation<P, R, F, Fut>(api: &Arc<ApiClient>, key: &'static str, call: F) -> Mutation<P, R>
where
    F: Fn(Arc<ApiClient>, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
{
    let api = Arc::clone(api);
    Mutation::new(key, move |params| call(Arc::clone(&api), params))
}

// =============================================================================
// KEYS
// =============================================================================

#[must_use]
pub fn all_items_key() -> QueryKey {
    query_key!["api", "items"]
}

#[must_use]
pub fn item_key(id: i64) -> QueryKey {
    query_key!["api", "items", id]
}

#[must_use]
pub fn is_favorite_key(id: i64) -> QueryKey {
    query_key!["api", "items", id, "is-favorite"]
}

#[must_use]
pub fn user_items_key() -> QueryKey {
    query_key!["api", "items", "user"]
}

#[must_use]
pub fn user_favorites_key() -> QueryKey {
    query_key!["api", "items", "favorites"]
}

#[must_use]
pub fn items_by_category_key(category_id: i64) -> QueryKey {
    query_key!["api", "items", "category", category_id]
}

#[must_use]
pub fn item_image_key(filename: &str) -> QueryKey {
    query_key!["api", "items", "images", filename]
}

#[must_use]
pub fn image_key(filename: &str) -> QueryKey {
    query_key!["api", "images", filename]
}

#[must_use]
pub fn categories_key() -> QueryKey {
    query_key!["api", "categories"]
}

#[must_use]
pub fn conversation_key(item_id: i64, receiver_id: i64) -> QueryKey {
    query_key!["conversation", item_id, receiver_id]
}

#[must_use]
pub fn conversations_key() -> QueryKey {
    query_key!["api", "messages", "conversations"]
}

#[must_use]
pub fn user_email_key() -> QueryKey {
    query_key!["api", "userinfo", "email"]
}

#[must_use]
pub fn user_name_key() -> QueryKey {
    query_key!["api", "userinfo", "name"]
}

#[must_use]
pub fn user_by_email_key(email: &str) -> QueryKey {
    query_key!["api", "users", email]
}

// =============================================================================
// QUERIES
// =============================================================================

pub fn get_all_items(api: &Arc<ApiClient>) -> Query<Vec<ItemResponse>> {
    bind(api, all_items_key(), true, |api| async move { api.get_all_items().await })
}

pub fn get_item_by_id(api: &Arc<ApiClient>, id: i64) -> Query<ItemResponse> {
    bind(api, item_key(id), id.is_truthy(), move |api| async move { api.get_item_by_id(id).await })
}

pub fn is_item_favorited(api: &Arc<ApiClient>, id: i64) -> Query<bool> {
    bind(api, is_favorite_key(id), id.is_truthy(), move |api| async move { api.is_item_favorited(id).await })
}

pub fn get_user_items(api: &Arc<ApiClient>) -> Query<Vec<ItemResponse>> {
    bind(api, user_items_key(), true, |api| async move { api.get_user_items().await })
}

pub fn get_user_favorites(api: &Arc<ApiClient>) -> Query<Vec<ItemResponse>> {
    bind(api, user_favorites_key(), true, |api| async move { api.get_user_favorites().await })
}

pub fn get_items_by_category(api: &Arc<ApiClient>, category_id: i64) -> Query<Vec<ItemResponse>> {
    bind(api, items_by_category_key(category_id), category_id.is_truthy(), move |api| async move {
        api.get_items_by_category(category_id).await
    })
}

pub fn get_item_image(api: &Arc<ApiClient>, filename: &str) -> Query<Vec<u8>> {
    let name = filename.to_owned();
    bind(api, item_image_key(filename), filename.is_truthy(), move |api| {
        let name = name.clone();
        async move { api.get_item_image(&name).await }
    })
}

pub fn get_image(api: &Arc<ApiClient>, filename: &str) -> Query<Vec<u8>> {
    let name = filename.to_owned();
    bind(api, image_key(filename), filename.is_truthy(), move |api| {
        let name = name.clone();
        async move { api.get_image(&name).await }
    })
}

pub fn get_categories(api: &Arc<ApiClient>) -> Query<Vec<CategoryResponse>> {
    bind(api, categories_key(), true, |api| async move { api.get_categories().await })
}

pub fn get_conversation(api: &Arc<ApiClient>, item_id: i64, receiver_id: i64) -> Query<Vec<MessageResponse>> {
    let enabled = item_id.is_truthy() && receiver_id.is_truthy();
    bind(api, conversation_key(item_id, receiver_id), enabled, move |api| async move {
        api.get_conversation(item_id, receiver_id).await
    })
}

pub fn get_conversations(api: &Arc<ApiClient>) -> Query<Vec<MessageResponse>> {
    bind(api, conversations_key(), true, |api| async move { api.get_conversations().await })
}

pub fn get_user_email(api: &Arc<ApiClient>) -> Query<String> {
    bind(api, user_email_key(), true, |api| async move { api.get_user_email().await })
}

pub fn get_user_name(api: &Arc<ApiClient>) -> Query<String> {
    bind(api, user_name_key(), true, |api| async move { api.get_user_name().await })
}

pub fn get_user_by_email(api: &Arc<ApiClient>, email: &str) -> Query<UserResponse> {
    let email_owned = email.to_owned();
    bind(api, user_by_email_key(email), email.is_truthy(), move |api| {
        let email = email_owned.clone();
        async move { api.get_user_by_email(&email).await }
    })
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Parameter object for mutations addressed by item id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemIdParams {
    pub id: i64,
}

/// Parameter object for user administration mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailParams {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateItemParams {
    pub data: CreateItemRequest,
    pub images: Vec<ImageUpload>,
}

pub fn create_item(api: &Arc<ApiClient>) -> Mutation<CreateItemParams, ItemResponse> {
    bind_mutation(api, "createItem", |api, params: CreateItemParams| async move {
        api.create_item(&params.data, &params.images).await
    })
}

pub fn add_to_favorites(api: &Arc<ApiClient>) -> Mutation<ItemIdParams, serde_json::Value> {
    bind_mutation(api, "addToFavorites", |api, ItemIdParams { id }| async move { api.add_to_favorites(id).await })
}

pub fn remove_from_favorites(api: &Arc<ApiClient>) -> Mutation<ItemIdParams, ()> {
    bind_mutation(api, "removeFromFavorites", |api, ItemIdParams { id }| async move {
        api.remove_from_favorites(id).await
    })
}

pub fn delete_item(api: &Arc<ApiClient>) -> Mutation<ItemIdParams, ()> {
    bind_mutation(api, "deleteItem", |api, ItemIdParams { id }| async move { api.delete_item(id).await })
}

pub fn reserve_item(api: &Arc<ApiClient>) -> Mutation<ItemIdParams, ItemResponse> {
    bind_mutation(api, "reserveItem", |api, ItemIdParams { id }| async move { api.reserve_item(id).await })
}

pub fn cancel_reservation(api: &Arc<ApiClient>) -> Mutation<ItemIdParams, serde_json::Value> {
    bind_mutation(api, "cancelReservation", |api, ItemIdParams { id }| async move {
        api.cancel_reservation(id).await
    })
}

pub fn update_username(api: &Arc<ApiClient>) -> Mutation<UpdateUsernameRequest, String> {
    bind_mutation(api, "updateUsername", |api, request: UpdateUsernameRequest| async move {
        api.update_username(&request).await
    })
}

pub fn update_email(api: &Arc<ApiClient>) -> Mutation<UpdateEmailRequest, String> {
    bind_mutation(api, "updateEmail", |api, request: UpdateEmailRequest| async move {
        api.update_email(&request).await
    })
}

pub fn update_password(api: &Arc<ApiClient>) -> Mutation<UpdatePasswordRequest, String> {
    bind_mutation(api, "updatePassword", |api, request: UpdatePasswordRequest| async move {
        api.update_password(&request).await
    })
}

pub fn make_user_admin(api: &Arc<ApiClient>) -> Mutation<EmailParams, String> {
    bind_mutation(api, "makeUserAdmin", |api, EmailParams { email }| async move { api.make_user_admin(&email).await })
}

pub fn remove_admin_role(api: &Arc<ApiClient>) -> Mutation<EmailParams, String> {
    bind_mutation(api, "removeAdminRole", |api, EmailParams { email }| async move {
        api.remove_admin_role(&email).await
    })
}

pub fn delete_user(api: &Arc<ApiClient>) -> Mutation<EmailParams, String> {
    bind_mutation(api, "deleteUserByEmail", |api, EmailParams { email }| async move { api.delete_user(&email).await })
}
