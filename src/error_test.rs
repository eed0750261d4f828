use super::*;

#[test]
fn user_message_prefers_plain_text_body() {
    let err = ApiError::Response { status: 401, body: "Invalid credentials".into() };
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[test]
fn user_message_reads_json_message_field() {
    let err = ApiError::Response { status: 400, body: r#"{"message":"Email already exists."}"#.into() };
    assert_eq!(err.user_message(), "Email already exists.");
}

#[test]
fn user_message_falls_back_to_json_error_field() {
    let err = ApiError::Response { status: 500, body: r#"{"error":"Internal Server Error","status":500}"#.into() };
    assert_eq!(err.user_message(), "Internal Server Error");
}

#[test]
fn user_message_empty_body_uses_status() {
    let err = ApiError::Response { status: 503, body: "  ".into() };
    assert_eq!(err.user_message(), "Request failed (503)");
}

#[test]
fn user_message_unrecognized_json_uses_status() {
    let err = ApiError::Response { status: 422, body: r#"{"detail":"nope"}"#.into() };
    assert_eq!(err.user_message(), "Request failed (422)");
}

#[test]
fn user_message_for_transport_error_is_display() {
    let err = ApiError::Request("connection refused".into());
    assert_eq!(err.user_message(), "request failed: connection refused");
}

#[test]
fn invalid_identity_names_field() {
    let err = ApiError::InvalidIdentity { field: "email" };
    assert_eq!(err.to_string(), "Invalid user data received: missing email");
}

#[test]
fn unauthorized_statuses() {
    assert!(ApiError::Response { status: 401, body: String::new() }.is_unauthorized());
    assert!(!ApiError::Response { status: 403, body: String::new() }.is_unauthorized());
    assert!(!ApiError::Response { status: 404, body: String::new() }.is_unauthorized());
    assert!(!ApiError::Request("x".into()).is_unauthorized());
}

#[test]
fn forbidden_is_not_a_missing_session() {
    let err = ApiError::Response { status: 403, body: "You can only cancel your own reservations".into() };
    assert!(err.is_forbidden());
    assert!(!err.is_unauthorized());
    assert!(!ApiError::Response { status: 401, body: String::new() }.is_forbidden());
}

#[test]
fn status_only_for_response_variant() {
    assert_eq!(ApiError::Response { status: 418, body: String::new() }.status(), Some(418));
    assert_eq!(ApiError::Parse("bad".into()).status(), None);
}
