//! Persisted credential cookie.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the client's cookie jar the way a browser holds `document.cookie`.
//! Login responses write the `Authorization` cookie, the request interceptor
//! reads it, logout removes it. The session store never reads it: a present
//! token says nothing about whether the server still accepts it.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::util::cookie;
use crate::util::storage::LocalStorage;

/// Cookie carrying the bearer token.
pub const AUTH_COOKIE_NAME: &str = "Authorization";

const COOKIE_STORAGE_KEY: &str = "cookie";

#[derive(Debug)]
pub struct CredentialStore {
    cookies: RwLock<Vec<(String, String)>>,
    storage: Arc<LocalStorage>,
}

impl CredentialStore {
    /// Load any persisted cookies from `storage`.
    #[must_use]
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        let cookies = storage
            .get_item(COOKIE_STORAGE_KEY)
            .map(|raw| cookie::parse_cookie_header(&raw))
            .unwrap_or_default();
        Self { cookies: RwLock::new(cookies), storage }
    }

    /// Store with no persistence.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(LocalStorage::in_memory()))
    }

    /// Cookie header as a browser would expose it.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        let cookies = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        cookie::format_cookie_header(&cookies)
    }

    /// The bearer token, if a well-formed `Authorization` cookie is present.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        let header = self.cookie_header();
        cookie::find_cookie(&header, AUTH_COOKIE_NAME)
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Set or replace a cookie. Invalid names or values are ignored.
    pub fn set_cookie(&self, name: &str, value: &str) {
        if !cookie::is_valid_cookie_name(name) || !cookie::is_valid_cookie_value(value) {
            tracing::warn!(cookie = name, "ignoring malformed cookie");
            return;
        }
        {
            let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
            match cookies.iter_mut().find(|(n, _)| n == name) {
                Some(entry) => value.clone_into(&mut entry.1),
                None => cookies.push((name.to_owned(), value.to_owned())),
            }
        }
        self.persist();
    }

    pub fn remove_cookie(&self, name: &str) {
        {
            let mut cookies = self.cookies.write().unwrap_or_else(PoisonError::into_inner);
            cookies.retain(|(n, _)| n != name);
        }
        self.persist();
    }

    pub fn set_token(&self, token: &str) {
        self.set_cookie(AUTH_COOKIE_NAME, token);
    }

    pub fn clear_token(&self) {
        self.remove_cookie(AUTH_COOKIE_NAME);
    }

    /// Apply one `Set-Cookie` header value from a response.
    pub fn absorb_set_cookie(&self, header: &str) {
        let Some(directive) = cookie::parse_set_cookie(header) else {
            tracing::debug!("ignoring malformed Set-Cookie header");
            return;
        };
        if directive.is_removal() {
            self.remove_cookie(&directive.name);
        } else {
            self.set_cookie(&directive.name, &directive.value);
        }
    }

    fn persist(&self) {
        let header = self.cookie_header();
        if header.is_empty() {
            self.storage.remove_item(COOKIE_STORAGE_KEY);
        } else {
            self.storage.set_item(COOKIE_STORAGE_KEY, &header);
        }
    }
}
