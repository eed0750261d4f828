use reqwest::header::HeaderName;

use super::*;

fn built_header(credentials: &CredentialStore, name: HeaderName) -> Option<String> {
    let client = reqwest::Client::new();
    let request = attach_credentials(client.get("http://localhost/api/items"), credentials)
        .build()
        .unwrap();
    request
        .headers()
        .get(name)
        .map(|v| v.to_str().unwrap().to_owned())
}

#[test]
fn no_token_no_header() {
    let credentials = CredentialStore::in_memory();
    assert!(bearer_header(&credentials).is_none());
    assert!(cookie_header(&credentials).is_none());
    assert_eq!(built_header(&credentials, AUTHORIZATION), None);
    assert_eq!(built_header(&credentials, COOKIE), None);
}

#[test]
fn token_becomes_bearer_header() {
    let credentials = CredentialStore::in_memory();
    credentials.set_token("abc.def.ghi");
    assert_eq!(built_header(&credentials, AUTHORIZATION).as_deref(), Some("Bearer abc.def.ghi"));
}

#[test]
fn token_is_sent_as_cookie_too() {
    let credentials = CredentialStore::in_memory();
    credentials.set_token("abc.def.ghi");
    assert_eq!(built_header(&credentials, COOKIE).as_deref(), Some("Authorization=abc.def.ghi"));
}

#[test]
fn other_cookies_ride_along_without_bearer() {
    let credentials = CredentialStore::in_memory();
    credentials.set_cookie("theme", "dark");
    assert_eq!(built_header(&credentials, COOKIE).as_deref(), Some("theme=dark"));
    assert_eq!(built_header(&credentials, AUTHORIZATION), None);

    credentials.set_token("t");
    assert_eq!(built_header(&credentials, COOKIE).as_deref(), Some("theme=dark; Authorization=t"));
}

#[test]
fn credential_headers_are_marked_sensitive() {
    let credentials = CredentialStore::in_memory();
    credentials.set_token("secret");
    assert!(bearer_header(&credentials).unwrap().is_sensitive());
    assert!(cookie_header(&credentials).unwrap().is_sensitive());
}

#[test]
fn header_follows_store_changes() {
    let credentials = CredentialStore::in_memory();
    credentials.set_token("first");
    assert_eq!(built_header(&credentials, AUTHORIZATION).as_deref(), Some("Bearer first"));
    credentials.clear_token();
    assert_eq!(built_header(&credentials, AUTHORIZATION), None);
    assert_eq!(built_header(&credentials, COOKIE), None);
}
