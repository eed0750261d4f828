//! Client error taxonomy.
//!
//! DESIGN
//! ======
//! Transport failures, server-reported failures and malformed responses are
//! kept distinct so views can decide what to surface. Background paths
//! (boot-time identity check, logout) fold these into typed outcomes instead
//! of propagating them.

use serde::Deserialize;

/// Errors produced by marketplace client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The identity payload is missing a required field.
    #[error("Invalid user data received: missing {field}")]
    InvalidIdentity { field: &'static str },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// HTTP status for server-reported failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the request for lack of a valid session (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the server refused an authenticated caller (403), e.g. when
    /// cancelling someone else's reservation.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Human-readable message for display in the triggering view.
    ///
    /// Server-reported failures prefer the response body: the `message` or
    /// `error` field of a JSON body, otherwise the plain text itself.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Response { status, body } => server_message(body).unwrap_or_else(|| format!("Request failed ({status})")),
            other => other.to_string(),
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        let parsed: ErrorBody = serde_json::from_str(trimmed).ok()?;
        return parsed
            .message
            .or(parsed.error)
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty());
    }
    Some(trimmed.to_owned())
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
