//! REST API client for the marketplace backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `ApiClient` is shared by the session store, the items store and the
//! query bindings. Every request goes through the credential interceptor and
//! every response's `Set-Cookie` headers are absorbed into the credential
//! store, mirroring what a browser does with `document.cookie`.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Response`] with the body preserved so
//! views can show the server's own message. Nothing here retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::SET_COOKIE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::credentials::CredentialStore;
use super::interceptor;
use super::types::{
    CategoryResponse, CreateItemRequest, ImageUpload, ItemResponse, LoginCredentials, MessageResponse, RegisterData,
    UpdateEmailRequest, UpdatePasswordRequest, UpdateUsernameRequest, UserResponse,
};
use crate::config::{ClientConfig, ClientTimeouts, normalize_base_url};
use crate::error::ApiError;

// =============================================================================
// ENDPOINTS
// =============================================================================

pub(crate) const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub(crate) const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub(crate) const LOGOUT_ENDPOINT: &str = "/api/auth/logout";
pub(crate) const ME_ENDPOINT: &str = "/api/auth/me";
pub(crate) const ITEMS_ENDPOINT: &str = "/api/items";
pub(crate) const USER_ITEMS_ENDPOINT: &str = "/api/items/user";
pub(crate) const USER_FAVORITES_ENDPOINT: &str = "/api/items/favorites";
pub(crate) const CATEGORIES_ENDPOINT: &str = "/api/categories";
pub(crate) const CONVERSATIONS_ENDPOINT: &str = "/api/messages/conversations";
pub(crate) const USERINFO_EMAIL_ENDPOINT: &str = "/api/userinfo/email";
pub(crate) const USERINFO_NAME_ENDPOINT: &str = "/api/userinfo/name";
pub(crate) const USERINFO_USERNAME_ENDPOINT: &str = "/api/userinfo/username";
pub(crate) const USERINFO_PASSWORD_ENDPOINT: &str = "/api/userinfo/password";

pub(crate) fn item_endpoint(item_id: i64) -> String {
    format!("/api/items/{item_id}")
}

pub(crate) fn item_favorite_endpoint(item_id: i64) -> String {
    format!("/api/items/{item_id}/favorite")
}

pub(crate) fn item_is_favorite_endpoint(item_id: i64) -> String {
    format!("/api/items/{item_id}/is-favorite")
}

pub(crate) fn item_reserve_endpoint(item_id: i64) -> String {
    format!("/api/items/{item_id}/reserve")
}

pub(crate) fn items_by_category_endpoint(category_id: i64) -> String {
    format!("/api/items/category/{category_id}")
}

pub(crate) fn item_image_endpoint(filename: &str) -> String {
    format!("/api/items/images/{}", urlencoding::encode(filename))
}

pub(crate) fn image_endpoint(filename: &str) -> String {
    format!("/api/images/{}", urlencoding::encode(filename))
}

pub(crate) fn conversation_endpoint(item_id: i64, receiver_id: i64) -> String {
    format!("/api/messages/conversation/{item_id}/{receiver_id}")
}

pub(crate) fn user_endpoint(email: &str) -> String {
    format!("/api/users/{}", urlencoding::encode(email))
}

pub(crate) fn user_admin_endpoint(email: &str) -> String {
    format!("{}/admin", user_endpoint(email))
}

pub(crate) fn user_admin_remove_endpoint(email: &str) -> String {
    format!("{}/admin/remove", user_endpoint(email))
}

// =============================================================================
// AUTH SEAM
// =============================================================================

/// Authentication calls the session store depends on.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`. On success the server sets the credential cookie.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-2xx response (e.g. 401 invalid credentials).
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), ApiError>;

    /// `POST /api/auth/register`.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-2xx response (e.g. 400 email already exists).
    async fn register(&self, data: &RegisterData) -> Result<(), ApiError>;

    /// `POST /api/auth/logout`.
    ///
    /// # Errors
    ///
    /// Transport failure or a non-2xx response.
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /api/auth/me`.
    ///
    /// # Errors
    ///
    /// Transport failure, 401 when there is no session, or an unparseable body.
    async fn get_me(&self) -> Result<UserResponse, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl ApiClient {
    /// Build a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: ClientTimeouts, credentials: Arc<CredentialStore>) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, credentials })
    }

    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig, credentials: Arc<CredentialStore>) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.timeouts, credentials)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        interceptor::attach_credentials(self.http.request(method, url), &self.credentials)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        for header in response.headers().get_all(SET_COOKIE) {
            if let Ok(raw) = header.to_str() {
                self.credentials.absorb_set_cookie(raw);
            }
        }

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "api response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Response { status: status.as_u16(), body });
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.execute(request).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Parse a body the schema leaves untyped; an empty body reads as `null`.
    async fn fetch_opaque(&self, request: RequestBuilder) -> Result<serde_json::Value, ApiError> {
        let text = self.execute(request).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    async fn fetch_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute(request).await?;
        Ok(())
    }

    /// Plain-text body, as the profile and admin endpoints send.
    async fn fetch_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        Ok(self.execute(request).await?.text().await?)
    }

    async fn fetch_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let bytes = self.execute(request).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    // -------------------------------------------------------------------------
    // auth
    // -------------------------------------------------------------------------

    async fn login_inner(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        self.fetch_empty(self.request(Method::POST, LOGIN_ENDPOINT).json(credentials)).await
    }

    async fn register_inner(&self, data: &RegisterData) -> Result<(), ApiError> {
        self.fetch_empty(self.request(Method::POST, REGISTER_ENDPOINT).json(data)).await
    }

    async fn logout_inner(&self) -> Result<(), ApiError> {
        self.fetch_empty(self.request(Method::POST, LOGOUT_ENDPOINT)).await
    }

    async fn get_me_inner(&self) -> Result<UserResponse, ApiError> {
        self.fetch_json(self.request(Method::GET, ME_ENDPOINT)).await
    }

    // -------------------------------------------------------------------------
    // items
    // -------------------------------------------------------------------------

    /// `GET /api/items`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_all_items(&self) -> Result<Vec<ItemResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, ITEMS_ENDPOINT)).await
    }

    /// `POST /api/items` as multipart: `itemData` JSON plus `images` files.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure, or an unusable image content type.
    pub async fn create_item(&self, request: &CreateItemRequest, images: &[ImageUpload]) -> Result<ItemResponse, ApiError> {
        let item_data = serde_json::to_string(request).map_err(|e| ApiError::Parse(e.to_string()))?;
        let mut form = reqwest::multipart::Form::new().text("itemData", item_data);
        for image in images {
            let part = reqwest::multipart::Part::bytes(image.bytes.clone())
                .file_name(image.filename.clone())
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::Request(e.to_string()))?;
            form = form.part("images", part);
        }
        self.fetch_json(self.request(Method::POST, ITEMS_ENDPOINT).multipart(form)).await
    }

    /// `GET /api/items/{id}`.
    ///
    /// # Errors
    ///
    /// Transport, status (404 when missing) or parse failure.
    pub async fn get_item_by_id(&self, item_id: i64) -> Result<ItemResponse, ApiError> {
        self.fetch_json(self.request(Method::GET, &item_endpoint(item_id))).await
    }

    /// `DELETE /api/items/{id}`.
    ///
    /// # Errors
    ///
    /// Transport or status failure.
    pub async fn delete_item(&self, item_id: i64) -> Result<(), ApiError> {
        self.fetch_empty(self.request(Method::DELETE, &item_endpoint(item_id))).await
    }

    /// `POST /api/items/{id}/favorite`. Returns the favorite record as sent.
    ///
    /// # Errors
    ///
    /// Transport or status failure.
    pub async fn add_to_favorites(&self, item_id: i64) -> Result<serde_json::Value, ApiError> {
        self.fetch_opaque(self.request(Method::POST, &item_favorite_endpoint(item_id))).await
    }

    /// `DELETE /api/items/{id}/favorite`.
    ///
    /// # Errors
    ///
    /// Transport or status failure.
    pub async fn remove_from_favorites(&self, item_id: i64) -> Result<(), ApiError> {
        self.fetch_empty(self.request(Method::DELETE, &item_favorite_endpoint(item_id))).await
    }

    /// `GET /api/items/{id}/is-favorite`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn is_item_favorited(&self, item_id: i64) -> Result<bool, ApiError> {
        self.fetch_json(self.request(Method::GET, &item_is_favorite_endpoint(item_id))).await
    }

    /// `GET /api/items/user`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_user_items(&self) -> Result<Vec<ItemResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, USER_ITEMS_ENDPOINT)).await
    }

    /// `GET /api/items/favorites`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_user_favorites(&self) -> Result<Vec<ItemResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, USER_FAVORITES_ENDPOINT)).await
    }

    /// `GET /api/items/category/{id}`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_items_by_category(&self, category_id: i64) -> Result<Vec<ItemResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, &items_by_category_endpoint(category_id))).await
    }

    /// `POST /api/items/{id}/reserve`.
    ///
    /// # Errors
    ///
    /// Transport, status (409 when already reserved) or parse failure.
    pub async fn reserve_item(&self, item_id: i64) -> Result<ItemResponse, ApiError> {
        self.fetch_json(self.request(Method::POST, &item_reserve_endpoint(item_id))).await
    }

    /// `DELETE /api/items/{id}/reserve`.
    ///
    /// # Errors
    ///
    /// Transport or status failure (403 when reserved by someone else).
    pub async fn cancel_reservation(&self, item_id: i64) -> Result<serde_json::Value, ApiError> {
        self.fetch_opaque(self.request(Method::DELETE, &item_reserve_endpoint(item_id))).await
    }

    /// `GET /api/items/images/{filename}` as raw bytes.
    ///
    /// # Errors
    ///
    /// Transport or status failure.
    pub async fn get_item_image(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        self.fetch_bytes(self.request(Method::GET, &item_image_endpoint(filename))).await
    }

    // -------------------------------------------------------------------------
    // images, categories, messages
    // -------------------------------------------------------------------------

    /// `GET /api/images/{filename}` as raw bytes.
    ///
    /// # Errors
    ///
    /// Transport or status failure.
    pub async fn get_image(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        self.fetch_bytes(self.request(Method::GET, &image_endpoint(filename))).await
    }

    /// `GET /api/categories`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_categories(&self) -> Result<Vec<CategoryResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, CATEGORIES_ENDPOINT)).await
    }

    /// `GET /api/messages/conversations`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_conversations(&self) -> Result<Vec<MessageResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, CONVERSATIONS_ENDPOINT)).await
    }

    /// `GET /api/messages/conversation/{itemId}/{receiverId}`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failure.
    pub async fn get_conversation(&self, item_id: i64, receiver_id: i64) -> Result<Vec<MessageResponse>, ApiError> {
        self.fetch_json(self.request(Method::GET, &conversation_endpoint(item_id, receiver_id))).await
    }

    // -------------------------------------------------------------------------
    // profile
    // -------------------------------------------------------------------------

    /// `GET /api/userinfo/email`: the signed-in user's email as plain text.
    ///
    /// # Errors
    ///
    /// Transport or status failure (401 without a session).
    pub async fn get_user_email(&self) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::GET, USERINFO_EMAIL_ENDPOINT)).await
    }

    /// `GET /api/userinfo/name`: the signed-in user's username as plain text.
    ///
    /// # Errors
    ///
    /// Transport or status failure (401 without a session).
    pub async fn get_user_name(&self) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::GET, USERINFO_NAME_ENDPOINT)).await
    }

    /// `PUT /api/userinfo/username`. Returns the server's confirmation.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when the name is taken).
    pub async fn update_username(&self, request: &UpdateUsernameRequest) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::PUT, USERINFO_USERNAME_ENDPOINT).json(request)).await
    }

    /// `PUT /api/userinfo/email`. Returns the server's confirmation.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when the email is in use).
    pub async fn update_email(&self, request: &UpdateEmailRequest) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::PUT, USERINFO_EMAIL_ENDPOINT).json(request)).await
    }

    /// `PUT /api/userinfo/password`. Returns the server's confirmation.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when the current password is wrong).
    pub async fn update_password(&self, request: &UpdatePasswordRequest) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::PUT, USERINFO_PASSWORD_ENDPOINT).json(request)).await
    }

    // -------------------------------------------------------------------------
    // user administration
    // -------------------------------------------------------------------------

    /// `GET /api/users/{email}`.
    ///
    /// # Errors
    ///
    /// Transport, status (404 when unknown) or parse failure.
    pub async fn get_user_by_email(&self, email: &str) -> Result<UserResponse, ApiError> {
        self.fetch_json(self.request(Method::GET, &user_endpoint(email))).await
    }

    /// `PUT /api/users/{email}/admin`.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when the user does not exist).
    pub async fn make_user_admin(&self, email: &str) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::PUT, &user_admin_endpoint(email))).await
    }

    /// `PUT /api/users/{email}/admin/remove`.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when unknown or not an admin).
    pub async fn remove_admin_role(&self, email: &str) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::PUT, &user_admin_remove_endpoint(email))).await
    }

    /// `DELETE /api/users/{email}`.
    ///
    /// # Errors
    ///
    /// Transport or status failure (400 when the user does not exist).
    pub async fn delete_user(&self, email: &str) -> Result<String, ApiError> {
        self.fetch_text(self.request(Method::DELETE, &user_endpoint(email))).await
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        self.login_inner(credentials).await
    }

    async fn register(&self, data: &RegisterData) -> Result<(), ApiError> {
        self.register_inner(data).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_inner().await
    }

    async fn get_me(&self) -> Result<UserResponse, ApiError> {
        self.get_me_inner().await
    }
}
