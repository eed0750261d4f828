//! Structured cookie parsing.
//!
//! Parsing is delegated to the `cookie` crate; this module layers the
//! client's acceptance rules on top. Anything malformed is treated as absent,
//! so a damaged cookie can never turn into a bogus credential.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

use cookie::Cookie;
use cookie::time::OffsetDateTime;

/// One `Set-Cookie` directive reduced to what the client acts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age: Option<i64>,
    pub expires_at: Option<OffsetDateTime>,
}

impl SetCookie {
    /// Whether applying this directive deletes the cookie.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.value.is_empty()
            || self.max_age.is_some_and(|age| age <= 0)
            || self.expires_at.is_some_and(|at| at <= OffsetDateTime::now_utc())
    }
}

/// RFC 6265 token characters for cookie names.
#[must_use]
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
                )
        })
}

/// RFC 6265 `cookie-octet` characters, non-empty.
#[must_use]
pub fn is_valid_cookie_value(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

/// Name and unquoted value of a parsed cookie, if both pass validation.
fn accepted(cookie: &Cookie<'_>) -> Option<(String, String)> {
    let value = cookie.value_trimmed();
    (is_valid_cookie_name(cookie.name()) && is_valid_cookie_value(value))
        .then(|| (cookie.name().to_owned(), value.to_owned()))
}

/// Parse a `Cookie`-style header (`a=1; b=2`) into valid pairs.
///
/// Malformed pairs are skipped.
#[must_use]
pub fn parse_cookie_header(raw: &str) -> Vec<(String, String)> {
    Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .filter_map(|cookie| accepted(&cookie))
        .collect()
}

/// Look up the first cookie named `name` in a `Cookie`-style header.
///
/// Returns `None` when the first occurrence is malformed, even if a later
/// duplicate would be valid.
#[must_use]
pub fn find_cookie(raw: &str, name: &str) -> Option<String> {
    let cookie = Cookie::split_parse(raw)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)?;
    accepted(&cookie).map(|(_, value)| value)
}

/// Serialize pairs back into `Cookie` header form.
#[must_use]
pub fn format_cookie_header(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| Cookie::new(name.as_str(), value.as_str()).stripped().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a `Set-Cookie` response header.
///
/// An empty value is accepted (servers clear cookies that way); any other
/// malformed value rejects the directive.
#[must_use]
pub fn parse_set_cookie(header: &str) -> Option<SetCookie> {
    let cookie = Cookie::parse(header).ok()?;
    let value = cookie.value_trimmed();
    if !is_valid_cookie_name(cookie.name()) || !(value.is_empty() || is_valid_cookie_value(value)) {
        return None;
    }

    Some(SetCookie {
        name: cookie.name().to_owned(),
        value: value.to_owned(),
        max_age: cookie.max_age().map(|age| age.whole_seconds()),
        expires_at: cookie.expires_datetime(),
    })
}
