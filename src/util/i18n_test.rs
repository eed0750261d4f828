use super::*;

#[test]
fn detect_uses_base_language() {
    assert_eq!(Locale::detect(Some("no-NO")), Locale::No);
    assert_eq!(Locale::detect(Some("no_NO.UTF-8")), Locale::No);
    assert_eq!(Locale::detect(Some("NO")), Locale::No);
    assert_eq!(Locale::detect(Some("en-US")), Locale::En);
}

#[test]
fn detect_falls_back_to_english() {
    assert_eq!(Locale::detect(None), Locale::En);
    assert_eq!(Locale::detect(Some("")), Locale::En);
    assert_eq!(Locale::detect(Some("de-DE")), Locale::En);
    assert_eq!(Locale::detect(Some("nb_NO.UTF-8")), Locale::En);
    assert_eq!(Locale::detect(Some("C")), Locale::En);
}

#[test]
fn codes() {
    assert_eq!(Locale::En.code(), "en");
    assert_eq!(Locale::No.code(), "no");
}

#[test]
fn catalog_differs_per_locale() {
    assert_eq!(Locale::En.text(Msg::LoggedOut), "Logged out");
    assert_eq!(Locale::No.text(Msg::LoggedOut), "Logget ut");
    assert_ne!(Locale::En.text(Msg::PageNotFound), Locale::No.text(Msg::PageNotFound));
}
