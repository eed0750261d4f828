//! Wire DTOs for the marketplace REST API.
//!
//! DESIGN
//! ======
//! Response types mirror the backend schema: every field the schema marks
//! optional is an `Option`, unknown fields are ignored, and names are
//! camelCase on the wire. Client-side invariants (such as a well-formed
//! identity) are checked by the stores that consume these types, not here.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Account role reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

/// Listing lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Active,
    Archived,
    Sold,
    Reserved,
}

/// `GET /api/auth/me` payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Marketplace listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemResponse {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub brief_description: Option<String>,
    pub full_description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// ISO-8601 local date-time as sent by the backend.
    pub publish_date: Option<String>,
    pub status: Option<ItemStatus>,
    pub reservation_date: Option<String>,
    pub reserved_by: Option<UserResponse>,
    pub owner: Option<UserResponse>,
    pub category: Option<CategoryResponse>,
    pub image_urls: Option<Vec<String>>,
}

impl ItemResponse {
    /// Category id, if the listing carries one.
    #[must_use]
    pub fn category_id(&self) -> Option<i64> {
        self.category.as_ref().and_then(|c| c.id)
    }
}

/// Chat message attached to a listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageResponse {
    pub id: Option<i64>,
    pub sender: Option<UserResponse>,
    pub receiver: Option<UserResponse>,
    pub item: Option<ItemResponse>,
    pub content: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `itemData` part of the multipart create-item request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsernameRequest {
    pub new_username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub new_email: String,
}

/// The backend checks `current_password` before applying `new_password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: String,
    pub brief_description: String,
    pub full_description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub category_id: i64,
}

/// One image file attached to a create-item request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guess the MIME type from the file extension.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_for_filename(&filename).to_owned();
        Self { filename, content_type, bytes }
    }
}

fn mime_for_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
