//! Navigation guard for routes that require a session.
//!
//! Before entering a guarded route the guard consults the session store. When
//! no user is present it awaits exactly one `initialize()`; if that does not
//! establish a session the navigation is redirected to `/login` with the
//! requested full path in the `redirect` query parameter.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::{self, RouteMatch};
use crate::state::session::SessionStore;

pub const LOGIN_PATH: &str = "/login";
const REDIRECT_PARAM: &str = "redirect";

/// What the router should do with a navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed(RouteMatch),
    Redirect { location: String },
    NotFound { location: String },
}

/// Decide whether navigation to `location` may proceed.
pub async fn before_each(session: &SessionStore, location: &str) -> NavigationDecision {
    let Some(target) = routes::resolve(location) else {
        tracing::debug!(location, "no route matches");
        return NavigationDecision::NotFound { location: location.to_owned() };
    };
    if !target.requires_auth || session.is_authenticated().await {
        return NavigationDecision::Proceed(target);
    }

    if session.initialize().await.is_authenticated() {
        return NavigationDecision::Proceed(target);
    }

    let redirect = login_location(&target.full_path);
    tracing::info!(route = target.name.as_str(), redirect = %redirect, "guarded route requires login");
    NavigationDecision::Redirect { location: redirect }
}

/// `/login?redirect=<encoded full path>`.
#[must_use]
pub fn login_location(full_path: &str) -> String {
    format!("{LOGIN_PATH}?{REDIRECT_PARAM}={}", urlencoding::encode(full_path))
}

/// Where to go after a successful login from `login_route`: the `redirect`
/// parameter when it is a local absolute path, `/` otherwise.
#[must_use]
pub fn post_login_location(login_route: &RouteMatch) -> String {
    login_route
        .query_value(REDIRECT_PARAM)
        .filter(|target| is_local_path(target))
        .unwrap_or("/")
        .to_owned()
}

fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}
