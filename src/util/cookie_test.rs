use super::*;

// =============================================================
// find_cookie
// =============================================================

#[test]
fn find_cookie_returns_value_among_others() {
    let raw = "theme=dark; Authorization=abc.def.ghi; lang=no";
    assert_eq!(find_cookie(raw, "Authorization").as_deref(), Some("abc.def.ghi"));
}

#[test]
fn find_cookie_missing_is_none() {
    assert_eq!(find_cookie("theme=dark", "Authorization"), None);
    assert_eq!(find_cookie("", "Authorization"), None);
}

#[test]
fn find_cookie_empty_value_fails_closed() {
    assert_eq!(find_cookie("Authorization=", "Authorization"), None);
}

#[test]
fn find_cookie_malformed_value_fails_closed() {
    assert_eq!(find_cookie("Authorization=a b", "Authorization"), None);
    assert_eq!(find_cookie("Authorization=a\\b", "Authorization"), None);
}

#[test]
fn find_cookie_first_occurrence_decides() {
    assert_eq!(find_cookie("Authorization=; Authorization=tok", "Authorization"), None);
    assert_eq!(find_cookie("Authorization=one; Authorization=two", "Authorization").as_deref(), Some("one"));
}

#[test]
fn find_cookie_does_not_match_prefix_names() {
    assert_eq!(find_cookie("AuthorizationX=tok", "Authorization"), None);
}

#[test]
fn find_cookie_strips_quotes() {
    assert_eq!(find_cookie("Authorization=\"tok\"", "Authorization").as_deref(), Some("tok"));
}

#[test]
fn find_cookie_keeps_equals_inside_value() {
    assert_eq!(find_cookie("Authorization=abc==", "Authorization").as_deref(), Some("abc=="));
}

// =============================================================
// parse / format
// =============================================================

#[test]
fn parse_cookie_header_skips_malformed_pairs() {
    let pairs = parse_cookie_header("a=1; junk; b=; c=3; bad name=4");
    assert_eq!(pairs, vec![("a".to_owned(), "1".to_owned()), ("c".to_owned(), "3".to_owned())]);
}

#[test]
fn format_cookie_header_joins_pairs() {
    let pairs = vec![("a".to_owned(), "1".to_owned()), ("Authorization".to_owned(), "t".to_owned())];
    assert_eq!(format_cookie_header(&pairs), "a=1; Authorization=t");
}

// =============================================================
// parse_set_cookie
// =============================================================

#[test]
fn parse_set_cookie_reads_value_and_max_age() {
    let cookie = parse_set_cookie("Authorization=jwt-token; Max-Age=3600; Path=/; HttpOnly").unwrap();
    assert_eq!(cookie.name, "Authorization");
    assert_eq!(cookie.value, "jwt-token");
    assert_eq!(cookie.max_age, Some(3600));
    assert!(!cookie.is_removal());
}

#[test]
fn parse_set_cookie_empty_value_is_removal() {
    let cookie = parse_set_cookie("Authorization=; Path=/; HttpOnly").unwrap();
    assert!(cookie.is_removal());
}

#[test]
fn parse_set_cookie_zero_max_age_is_removal() {
    let cookie = parse_set_cookie("Authorization=stale; max-age=0").unwrap();
    assert!(cookie.is_removal());
}

#[test]
fn parse_set_cookie_rejects_malformed() {
    assert_eq!(parse_set_cookie("no-equals-sign"), None);
    assert_eq!(parse_set_cookie("=value"), None);
    assert_eq!(parse_set_cookie("Authorization=has space"), None);
}

#[test]
fn parse_set_cookie_past_expiry_is_removal() {
    let cookie = parse_set_cookie("Authorization=old; Path=/; Expires=Thu, 01 Jan 1970 00:00:10 GMT").unwrap();
    assert_eq!(cookie.value, "old");
    assert!(cookie.expires_at.is_some());
    assert!(cookie.is_removal());
}

#[test]
fn parse_set_cookie_strips_quotes() {
    let cookie = parse_set_cookie("Authorization=\"jwt\"; HttpOnly").unwrap();
    assert_eq!(cookie.value, "jwt");
    assert_eq!(cookie.max_age, None);
}
