//! Locale detection and the small message catalog used by the CLI.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

/// Supported UI locales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    No,
}

/// Catalog entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    LoggedInAs,
    LoggedOut,
    NotLoggedIn,
    LoginFailed,
    RegisterFailed,
    RedirectedTo,
    PageNotFound,
    FavoriteAdded,
    FavoriteRemoved,
}

impl Locale {
    /// Pick a locale from a language tag such as `en-US` or `no_NO.UTF-8`.
    ///
    /// Only the base language is considered; unsupported or missing tags
    /// fall back to English.
    #[must_use]
    pub fn detect(tag: Option<&str>) -> Self {
        let base = tag
            .unwrap_or_default()
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match base.as_str() {
            "no" => Self::No,
            _ => Self::En,
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::No => "no",
        }
    }

    #[must_use]
    pub fn text(self, msg: Msg) -> &'static str {
        match (self, msg) {
            (Self::En, Msg::LoggedInAs) => "Logged in as",
            (Self::En, Msg::LoggedOut) => "Logged out",
            (Self::En, Msg::NotLoggedIn) => "Not logged in",
            (Self::En, Msg::LoginFailed) => "Login failed",
            (Self::En, Msg::RegisterFailed) => "Registration failed",
            (Self::En, Msg::RedirectedTo) => "Redirected to",
            (Self::En, Msg::PageNotFound) => "Page not found",
            (Self::En, Msg::FavoriteAdded) => "Added to favorites",
            (Self::En, Msg::FavoriteRemoved) => "Removed from favorites",
            (Self::No, Msg::LoggedInAs) => "Logget inn som",
            (Self::No, Msg::LoggedOut) => "Logget ut",
            (Self::No, Msg::NotLoggedIn) => "Ikke logget inn",
            (Self::No, Msg::LoginFailed) => "Innlogging mislyktes",
            (Self::No, Msg::RegisterFailed) => "Registrering mislyktes",
            (Self::No, Msg::RedirectedTo) => "Omdirigert til",
            (Self::No, Msg::PageNotFound) => "Siden ble ikke funnet",
            (Self::No, Msg::FavoriteAdded) => "Lagt til i favoritter",
            (Self::No, Msg::FavoriteRemoved) => "Fjernet fra favoritter",
        }
    }
}
