//! Outgoing request interceptor.
//!
//! Every request built by [`crate::net::api::ApiClient`] passes through
//! [`attach_credentials`]. The stored cookies go out as a `Cookie` header,
//! which is what the backend authenticates from, and the `Authorization`
//! cookie is repeated as a bearer header. The interceptor only reads the
//! credential store: it knows nothing about the session store, and a 401
//! response is returned to the caller untouched rather than clearing the
//! session or retrying.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderValue};

use super::credentials::CredentialStore;

/// `Authorization: Bearer <token>` value for the stored cookie, if any.
#[must_use]
pub fn bearer_header(credentials: &CredentialStore) -> Option<HeaderValue> {
    let token = credentials.bearer_token()?;
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// `Cookie` value carrying every stored cookie, if there are any.
#[must_use]
pub fn cookie_header(credentials: &CredentialStore) -> Option<HeaderValue> {
    let header = credentials.cookie_header();
    if header.is_empty() {
        return None;
    }
    let mut value = HeaderValue::from_str(&header).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// Attach the stored cookies and the bearer header; pass through when the
/// store is empty.
#[must_use]
pub fn attach_credentials(mut request: RequestBuilder, credentials: &CredentialStore) -> RequestBuilder {
    if let Some(value) = cookie_header(credentials) {
        request = request.header(COOKIE, value);
    }
    if let Some(value) = bearer_header(credentials) {
        request = request.header(AUTHORIZATION, value);
    }
    request
}
