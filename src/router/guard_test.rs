use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::ApiError;
use crate::net::api::AuthApi;
use crate::net::credentials::CredentialStore;
use crate::net::types::{LoginCredentials, RegisterData, Role, UserResponse};
use crate::router::{RouteName, Router};

/// Identity endpoint that either always accepts or always rejects.
struct FixedAuth {
    logged_in: bool,
    me_calls: AtomicUsize,
}

impl FixedAuth {
    fn new(logged_in: bool) -> Arc<Self> {
        Arc::new(Self { logged_in, me_calls: AtomicUsize::new(0) })
    }
}

#[async_trait::async_trait]
impl AuthApi for FixedAuth {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<(), ApiError> {
        Ok(())
    }

    async fn register(&self, _data: &RegisterData) -> Result<(), ApiError> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn get_me(&self) -> Result<UserResponse, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        if self.logged_in {
            Ok(UserResponse {
                id: Some(1),
                username: Some("bob".into()),
                email: Some("b@x.com".into()),
                role: Some(Role::User),
            })
        } else {
            Err(ApiError::Response { status: 401, body: String::new() })
        }
    }
}

fn session(auth: &Arc<FixedAuth>) -> SessionStore {
    SessionStore::new(auth.clone(), Arc::new(CredentialStore::in_memory()))
}

// =============================================================================
// before_each
// =============================================================================

#[tokio::test]
async fn open_route_proceeds_without_identity_check() {
    let auth = FixedAuth::new(false);
    let store = session(&auth);

    let decision = before_each(&store, "/item/5").await;
    assert!(matches!(decision, NavigationDecision::Proceed(ref m) if m.name == RouteName::ItemView));
    assert_eq!(auth.me_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn guarded_route_without_session_redirects_to_login() {
    let auth = FixedAuth::new(false);
    let store = session(&auth);

    let decision = before_each(&store, "/favorites").await;
    assert_eq!(decision, NavigationDecision::Redirect { location: "/login?redirect=%2Ffavorites".into() });
    assert_eq!(auth.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn redirect_preserves_query_string() {
    let auth = FixedAuth::new(false);
    let store = session(&auth);

    let NavigationDecision::Redirect { location } = before_each(&store, "/chat/3/9?draft=hi").await else {
        panic!("expected redirect");
    };
    let login = routes::resolve(&location).unwrap();
    assert_eq!(login.name, RouteName::Login);
    assert_eq!(login.query_value("redirect"), Some("/chat/3/9?draft=hi"));
}

#[tokio::test]
async fn guarded_route_lazily_establishes_session() {
    let auth = FixedAuth::new(true);
    let store = session(&auth);

    let decision = before_each(&store, "/messages").await;
    assert!(matches!(decision, NavigationDecision::Proceed(ref m) if m.name == RouteName::Messages));
    assert!(store.is_authenticated().await);
    assert_eq!(auth.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn authenticated_session_skips_recheck() {
    let auth = FixedAuth::new(true);
    let store = session(&auth);
    store.initialize().await;

    before_each(&store, "/favorites").await;
    before_each(&store, "/messages").await;
    assert_eq!(auth.me_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let auth = FixedAuth::new(true);
    let store = session(&auth);
    let decision = before_each(&store, "/does-not-exist").await;
    assert_eq!(decision, NavigationDecision::NotFound { location: "/does-not-exist".into() });
}

// =============================================================================
// login locations
// =============================================================================

#[test]
fn login_location_encodes_full_path() {
    assert_eq!(login_location("/chat/1/2"), "/login?redirect=%2Fchat%2F1%2F2");
}

#[test]
fn post_login_uses_local_redirect() {
    let route = routes::resolve("/login?redirect=%2Ffavorites").unwrap();
    assert_eq!(post_login_location(&route), "/favorites");
}

#[test]
fn post_login_rejects_external_targets() {
    for location in [
        "/login",
        "/login?redirect=https%3A%2F%2Fevil.example",
        "/login?redirect=%2F%2Fevil.example",
        "/login?redirect=",
    ] {
        let route = routes::resolve(location).unwrap();
        assert_eq!(post_login_location(&route), "/", "location: {location}");
    }
}

// =============================================================================
// Router
// =============================================================================

#[tokio::test]
async fn router_lands_on_login_after_redirect() {
    let auth = FixedAuth::new(false);
    let router = Router::new(Arc::new(session(&auth)));

    let decision = router.navigate("/favorites").await;
    assert!(matches!(decision, NavigationDecision::Redirect { .. }));
    let current = router.current().await.unwrap();
    assert_eq!(current.name, RouteName::Login);
    assert_eq!(post_login_location(&current), "/favorites");
}

#[tokio::test]
async fn router_keeps_current_route_on_not_found() {
    let auth = FixedAuth::new(true);
    let router = Router::new(Arc::new(session(&auth)));

    router.navigate("/categories/2").await;
    router.navigate("/missing").await;
    let current = router.current().await.unwrap();
    assert_eq!(current.name, RouteName::CategoryItems);
    assert_eq!(current.param("id"), Some("2"));
}
