//! Static route table and location matching.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

/// Named application routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Categories,
    CategoryItems,
    Favorites,
    Messages,
    Chat,
    Login,
    Register,
    Profile,
    UserSettings,
    CreateItem,
    AdminPanel,
    ItemView,
}

impl RouteName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Categories => "Categories",
            Self::CategoryItems => "CategoryItems",
            Self::Favorites => "Favorites",
            Self::Messages => "Messages",
            Self::Chat => "Chat",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Profile => "Profile",
            Self::UserSettings => "UserSettings",
            Self::CreateItem => "CreateItem",
            Self::AdminPanel => "AdminPanel",
            Self::ItemView => "ItemView",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RouteDef {
    pub name: RouteName,
    /// Path pattern; `:name` segments capture one path segment.
    pub pattern: &'static str,
    pub requires_auth: bool,
}

const fn route(name: RouteName, pattern: &'static str, requires_auth: bool) -> RouteDef {
    RouteDef { name, pattern, requires_auth }
}

pub const ROUTES: &[RouteDef] = &[
    route(RouteName::Home, "/", false),
    route(RouteName::Categories, "/categories", false),
    route(RouteName::CategoryItems, "/categories/:id", false),
    route(RouteName::Favorites, "/favorites", true),
    route(RouteName::Messages, "/messages", true),
    route(RouteName::Chat, "/chat/:itemId/:receiverId", true),
    route(RouteName::Login, "/login", false),
    route(RouteName::Register, "/register", false),
    route(RouteName::Profile, "/profile", false),
    route(RouteName::UserSettings, "/userSettings", false),
    route(RouteName::CreateItem, "/createItem", false),
    route(RouteName::AdminPanel, "/admin", false),
    route(RouteName::ItemView, "/item/:id", false),
];

/// A location resolved against [`ROUTES`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: RouteName,
    pub requires_auth: bool,
    /// Normalized path without query or fragment.
    pub path: String,
    /// Path plus query and fragment, as requested.
    pub full_path: String,
    pub params: Vec<(&'static str, String)>,
    pub query: Vec<(String, String)>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Match `location` (path with optional `?query` and `#fragment`) against the
/// route table. Returns `None` for unknown paths.
#[must_use]
pub fn resolve(location: &str) -> Option<RouteMatch> {
    let (without_fragment, fragment) = match location.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (location, None),
    };
    let (raw_path, raw_query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    };
    let path = normalize_path(raw_path)?;

    let (def, params) = ROUTES.iter().find_map(|def| match_pattern(def.pattern, &path).map(|p| (def, p)))?;

    let mut full_path = path.clone();
    if let Some(query) = raw_query.filter(|q| !q.is_empty()) {
        full_path.push('?');
        full_path.push_str(query);
    }
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        full_path.push('#');
        full_path.push_str(fragment);
    }

    Some(RouteMatch {
        name: def.name,
        requires_auth: def.requires_auth,
        path,
        full_path,
        params,
        query: raw_query.map(parse_query).unwrap_or_default(),
    })
}

/// Absolute path with any trailing slash removed. Relative paths are rejected.
fn normalize_path(raw: &str) -> Option<String> {
    if !raw.starts_with('/') {
        return None;
    }
    let trimmed = raw.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() })
}

fn match_pattern(pattern: &'static str, path: &str) -> Option<Vec<(&'static str, String)>> {
    let pattern_segments: Vec<&'static str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.into_iter().zip(path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name, decode(actual)));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

const QUERY_BASE: &str = "http://localhost/";

/// Form-urlencoded query pairs: `+` reads as a space, empty pairs are skipped.
fn parse_query(raw: &str) -> Vec<(String, String)> {
    let Ok(mut url) = reqwest::Url::parse(QUERY_BASE) else {
        return Vec::new();
    };
    url.set_query(Some(raw));
    url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |s| s.into_owned())
}
