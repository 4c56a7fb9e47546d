//! Static registry of backend endpoints.
//!
//! Each constant binds one logical operation to its path (relative to the
//! configured base URL) and HTTP verb.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry a request body.
    pub fn allows_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
}

impl Endpoint {
    pub const fn new(path: &'static str, method: HttpMethod) -> Self {
        Self { path, method }
    }

    /// Joins `base` and the endpoint path with exactly one slash.
    pub fn url(&self, base: &str) -> String {
        join_url(base, self.path)
    }

    /// Appends one path segment, e.g. `crop/detail/<id>`.
    pub fn url_with_segment(&self, base: &str, segment: &str) -> String {
        join_url(&self.url(base), segment)
    }

    /// Appends query parameters in the given order.
    ///
    /// Pairs whose value is `None` are skipped, so optional filters never
    /// show up as empty parameters.
    pub fn url_with_query<V: Serialize>(&self, base: &str, query: &[(&str, Option<V>)]) -> String {
        let url = self.url(base);
        let present: Vec<(&str, &V)> = query
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (*key, v)))
            .collect();
        if present.is_empty() {
            return url;
        }
        match serde_urlencoded::to_string(&present) {
            Ok(encoded) => format!("{url}?{encoded}"),
            Err(_) => url,
        }
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// --- Auth ---
pub const REGISTER: Endpoint = Endpoint::new("auth/register", HttpMethod::Post);
pub const OTP_GENERATE: Endpoint = Endpoint::new("otp/generate", HttpMethod::Post);
pub const OTP_VERIFY: Endpoint = Endpoint::new("otp/verify", HttpMethod::Post);
pub const LOGOUT: Endpoint = Endpoint::new("user/logout", HttpMethod::Post);

// --- User ---
pub const PROFILE: Endpoint = Endpoint::new("user/profile", HttpMethod::Get);
pub const UPDATE_PROFILE: Endpoint = Endpoint::new("user/update-profile", HttpMethod::Put);
pub const FARMERS: Endpoint = Endpoint::new("user/farmers", HttpMethod::Get);
pub const BUYERS: Endpoint = Endpoint::new("user/buyers", HttpMethod::Get);
pub const AGRO_SHOPS: Endpoint = Endpoint::new("user/agro-shops", HttpMethod::Get);
pub const LANGUAGE: Endpoint = Endpoint::new("user/language", HttpMethod::Put);

// --- Catalogue ---
pub const CATEGORIES: Endpoint = Endpoint::new("category/list", HttpMethod::Get);
pub const CATEGORY_CROPS: Endpoint = Endpoint::new("category/crops", HttpMethod::Get);
pub const CROP_DETAIL: Endpoint = Endpoint::new("crop/detail", HttpMethod::Get);
pub const SELL_CROP: Endpoint = Endpoint::new("crop/sell", HttpMethod::Post);

// --- Favorites ---
pub const FAVORITE_TOGGLE: Endpoint = Endpoint::new("favorite-unfavorite", HttpMethod::Post);
pub const FAVORITE_LIST: Endpoint = Endpoint::new("favorite/list", HttpMethod::Get);

// --- Community ---
pub const COMMUNITY: Endpoint = Endpoint::new("community", HttpMethod::Get);
pub const COMMUNITY_POST: Endpoint = Endpoint::new("community/post", HttpMethod::Post);
pub const COMMUNITY_COMMENT: Endpoint = Endpoint::new("community/comment", HttpMethod::Post);
pub const COMMUNITY_LIKE: Endpoint = Endpoint::new("community/like", HttpMethod::Post);

// --- Content ---
pub const CMS: Endpoint = Endpoint::new("cms", HttpMethod::Get);
pub const CONTACT_US: Endpoint = Endpoint::new("contact-us", HttpMethod::Post);

// --- Notifications ---
pub const NOTIFICATIONS: Endpoint = Endpoint::new("notification/list", HttpMethod::Get);
pub const NOTIFICATION_READ: Endpoint = Endpoint::new("notification/read", HttpMethod::Put);

// --- Media ---
pub const MEDIA_UPLOAD: Endpoint = Endpoint::new("media-upload", HttpMethod::Post);
pub const MEDIA_UPLOAD_BULK: Endpoint = Endpoint::new("media-upload/bulk", HttpMethod::Post);
