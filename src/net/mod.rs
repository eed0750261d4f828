//! HTTP layer: wire types, credential cookie, request interceptor and the
//! REST client.

pub mod api;
pub mod credentials;
pub mod interceptor;
pub mod types;

pub use api::{ApiClient, AuthApi};
pub use credentials::CredentialStore;
