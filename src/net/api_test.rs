use super::*;
use crate::app::test_helpers::{MockBackend, UNKNOWN_EMAIL, VALID_PASSWORD, VALID_TOKEN};
use crate::net::types::{ItemStatus, Role};

fn client_for(backend: &MockBackend) -> ApiClient {
    ApiClient::new(&backend.base_url, ClientTimeouts::default(), Arc::new(CredentialStore::in_memory())).unwrap()
}

fn bob() -> LoginCredentials {
    LoginCredentials { username: "bob".into(), email: "b@x.com".into(), password: VALID_PASSWORD.into() }
}

// =============================================================================
// endpoint paths
// =============================================================================

#[test]
fn item_endpoints_embed_id() {
    assert_eq!(item_endpoint(7), "/api/items/7");
    assert_eq!(item_favorite_endpoint(42), "/api/items/42/favorite");
    assert_eq!(item_is_favorite_endpoint(42), "/api/items/42/is-favorite");
    assert_eq!(item_reserve_endpoint(3), "/api/items/3/reserve");
    assert_eq!(items_by_category_endpoint(5), "/api/items/category/5");
}

#[test]
fn conversation_endpoint_keeps_positional_order() {
    assert_eq!(conversation_endpoint(10, 20), "/api/messages/conversation/10/20");
}

#[test]
fn image_endpoints_encode_filename() {
    assert_eq!(item_image_endpoint("a.png"), "/api/items/images/a.png");
    assert_eq!(image_endpoint("my photo.jpg"), "/api/images/my%20photo.jpg");
    assert_eq!(item_image_endpoint("../x"), "/api/items/images/..%2Fx");
}

#[test]
fn user_endpoints_encode_email() {
    assert_eq!(user_endpoint("b@x.com"), "/api/users/b%40x.com");
    assert_eq!(user_admin_endpoint("b@x.com"), "/api/users/b%40x.com/admin");
    assert_eq!(user_admin_remove_endpoint("a/b@x.com"), "/api/users/a%2Fb%40x.com/admin/remove");
}

#[test]
fn new_rejects_invalid_base_url() {
    let result = ApiClient::new("not a url", ClientTimeouts::default(), Arc::new(CredentialStore::in_memory()));
    assert!(matches!(result, Err(ApiError::ConfigParse(_))));
}

#[test]
fn new_trims_trailing_slash() {
    let client =
        ApiClient::new("http://localhost:8080/", ClientTimeouts::default(), Arc::new(CredentialStore::in_memory()))
            .unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

// =============================================================================
// auth round trips
// =============================================================================

#[tokio::test]
async fn login_stores_cookie_and_me_sends_it_back() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    AuthApi::login(&client, &bob()).await.unwrap();
    assert_eq!(client.credentials().bearer_token().as_deref(), Some(VALID_TOKEN));

    let me = AuthApi::get_me(&client).await.unwrap();
    assert_eq!(me.id, Some(1));
    assert_eq!(me.username.as_deref(), Some("bob"));

    let seen = backend.requests().pop().unwrap();
    assert_eq!(seen.call, "GET /api/auth/me");
    assert_eq!(seen.cookie, Some(format!("Authorization={VALID_TOKEN}")));
    assert_eq!(seen.authorization, Some(format!("Bearer {VALID_TOKEN}")));
}

#[tokio::test]
async fn login_request_carries_no_credentials() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    AuthApi::login(&client, &bob()).await.unwrap();

    let seen = backend.requests().remove(0);
    assert_eq!(seen.call, "POST /api/auth/login");
    assert_eq!(seen.cookie, None);
    assert_eq!(seen.authorization, None);
}

#[tokio::test]
async fn backend_rejects_bearer_without_cookie() {
    let backend = MockBackend::start().await;
    let response = reqwest::Client::new()
        .get(format!("{}{ME_ENDPOINT}", backend.base_url))
        .bearer_auth(VALID_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn persisted_cookie_authenticates_without_login() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    client.credentials().set_token(VALID_TOKEN);

    let me = AuthApi::get_me(&client).await.unwrap();
    assert_eq!(me.email.as_deref(), Some("b@x.com"));
}

#[tokio::test]
async fn login_with_bad_password_returns_server_message() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let credentials = LoginCredentials { password: "wrong".into(), ..bob() };

    let err = AuthApi::login(&client, &credentials).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!client.credentials().has_token());
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let err = AuthApi::get_me(&client).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn logout_removes_cookie_via_set_cookie() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    AuthApi::login(&client, &bob()).await.unwrap();

    AuthApi::logout(&client).await.unwrap();
    assert!(!client.credentials().has_token());
}

#[tokio::test]
async fn register_conflict_surfaces_body() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let data = RegisterData { username: "taken".into(), email: "t@x.com".into(), password: "pw".into() };

    let err = AuthApi::register(&client, &data).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Username already exists");
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    let client = ApiClient::new(
        "http://127.0.0.1:1",
        ClientTimeouts { request_secs: 2, connect_secs: 1 },
        Arc::new(CredentialStore::in_memory()),
    )
    .unwrap();
    let err = AuthApi::get_me(&client).await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}

// =============================================================================
// items and friends
// =============================================================================

#[tokio::test]
async fn item_reads_parse_payloads() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    let items = client.get_all_items().await.unwrap();
    assert_eq!(items.len(), 2);

    let item = client.get_item_by_id(7).await.unwrap();
    assert_eq!(item.id, Some(7));

    let by_category = client.get_items_by_category(1).await.unwrap();
    assert!(by_category.iter().all(|item| item.category_id() == Some(1)));

    let categories = client.get_categories().await.unwrap();
    assert_eq!(categories[0].name.as_deref(), Some("Electronics"));
}

#[tokio::test]
async fn favorite_calls_hit_expected_paths() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    client.add_to_favorites(42).await.unwrap();
    assert!(client.is_item_favorited(42).await.unwrap());
    client.remove_from_favorites(42).await.unwrap();

    let calls = backend.calls();
    assert!(calls.contains(&"POST /api/items/42/favorite".to_owned()));
    assert!(calls.contains(&"GET /api/items/42/is-favorite".to_owned()));
    assert!(calls.contains(&"DELETE /api/items/42/favorite".to_owned()));
}

#[tokio::test]
async fn reserve_and_cancel() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    let reserved = client.reserve_item(3).await.unwrap();
    assert_eq!(reserved.status, Some(ItemStatus::Reserved));
    let cancelled = client.cancel_reservation(3).await.unwrap();
    assert_eq!(cancelled, serde_json::Value::String("Reservation cancelled".into()));
}

#[tokio::test]
async fn create_item_sends_multipart() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let request = CreateItemRequest { title: "Lamp".into(), price: 150.0, category_id: 1, ..Default::default() };
    let image = ImageUpload::new("lamp.png", vec![0x89, b'P', b'N', b'G']);

    let created = client.create_item(&request, &[image]).await.unwrap();
    assert_eq!(created.title.as_deref(), Some("Lamp"));
    assert!(backend.calls().contains(&"POST /api/items".to_owned()));
}

#[tokio::test]
async fn image_bytes_are_returned_raw() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    assert_eq!(client.get_item_image("a.png").await.unwrap(), b"PNG".to_vec());
    assert_eq!(client.get_image("a.png").await.unwrap(), b"PNG".to_vec());
}

#[tokio::test]
async fn missing_item_is_404_response() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let err = client.get_item_by_id(404).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// =============================================================================
// profile and user administration
// =============================================================================

#[tokio::test]
async fn userinfo_reads_plain_text() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    AuthApi::login(&client, &bob()).await.unwrap();

    assert_eq!(client.get_user_email().await.unwrap(), "b@x.com");
    assert_eq!(client.get_user_name().await.unwrap(), "bob");
}

#[tokio::test]
async fn userinfo_without_session_is_unauthorized() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    let err = client.get_user_email().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn profile_updates_return_server_confirmation() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    AuthApi::login(&client, &bob()).await.unwrap();

    let renamed = client.update_username(&UpdateUsernameRequest { new_username: "robert".into() }).await.unwrap();
    assert_eq!(renamed, "Username updated successfully");
    let moved = client.update_email(&UpdateEmailRequest { new_email: "r@x.com".into() }).await.unwrap();
    assert_eq!(moved, "Email updated successfully");
    let password = UpdatePasswordRequest { current_password: VALID_PASSWORD.into(), new_password: "n3w".into() };
    assert_eq!(client.update_password(&password).await.unwrap(), "Password updated successfully");

    let calls = backend.calls();
    assert!(calls.contains(&"PUT /api/userinfo/username".to_owned()));
    assert!(calls.contains(&"PUT /api/userinfo/email".to_owned()));
    assert!(calls.contains(&"PUT /api/userinfo/password".to_owned()));
}

#[tokio::test]
async fn profile_update_conflicts_surface_server_message() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);
    AuthApi::login(&client, &bob()).await.unwrap();

    let err = client.update_username(&UpdateUsernameRequest { new_username: "taken".into() }).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Username is already taken");

    let wrong = UpdatePasswordRequest { current_password: "nope".into(), new_password: "n3w".into() };
    let err = client.update_password(&wrong).await.unwrap_err();
    assert_eq!(err.user_message(), "Current password is incorrect");
}

#[tokio::test]
async fn admin_calls_address_user_by_email() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    let user = client.get_user_by_email("carol@x.com").await.unwrap();
    assert_eq!(user.email.as_deref(), Some("carol@x.com"));
    assert_eq!(user.role, Some(Role::User));

    assert_eq!(client.make_user_admin("carol@x.com").await.unwrap(), "User role updated to ADMIN successfully");
    assert_eq!(client.remove_admin_role("carol@x.com").await.unwrap(), "Admin role removed successfully");
    assert_eq!(client.delete_user("carol@x.com").await.unwrap(), "User deleted successfully");

    let calls = backend.calls();
    assert!(calls.contains(&"PUT /api/users/carol%40x.com/admin".to_owned()));
    assert!(calls.contains(&"DELETE /api/users/carol%40x.com".to_owned()));
}

#[tokio::test]
async fn admin_calls_on_unknown_user_fail() {
    let backend = MockBackend::start().await;
    let client = client_for(&backend);

    assert_eq!(client.get_user_by_email(UNKNOWN_EMAIL).await.unwrap_err().status(), Some(404));
    let err = client.make_user_admin(UNKNOWN_EMAIL).await.unwrap_err();
    assert_eq!(err.user_message(), format!("User with email {UNKNOWN_EMAIL} not found"));
    assert_eq!(client.delete_user(UNKNOWN_EMAIL).await.unwrap_err().status(), Some(400));
}
