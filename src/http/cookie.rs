// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session cookie storage backing the credentials modes
//!
//! The server identifies the caller through its session cookie, so the jar
//! is what makes `authContext.userId` change between requests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use url::Url;

/// Cookie as set by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Host the cookie is scoped to, without a leading dot
    pub domain: String,
    pub path: String,
    /// `None` for a session cookie
    pub expires: Option<DateTime<Utc>>,
    /// Only sent over https
    pub secure: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.expires, Some(at) if at <= Utc::now())
    }

    /// Whether the cookie goes out with a request to `url`
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default();
        let host_ok = self.domain.is_empty()
            || host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .map_or(false, |prefix| prefix.ends_with('.'));

        host_ok
            && url.path().starts_with(&self.path)
            && (!self.secure || url.scheme() == "https")
            && !self.is_expired()
    }

    /// Parse a `Set-Cookie` value received from `url`
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut attributes = header.split(';').map(str::trim);
        let (name, value) = attributes.next()?.split_once('=')?;
        if name.trim().is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name.trim(), value.trim())
            .domain(url.host_str().unwrap_or_default());
        let mut max_age = None;

        for attribute in attributes {
            let (key, val) = attribute.split_once('=').unwrap_or((attribute, ""));
            let val = val.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "domain" if !val.is_empty() => cookie.domain = val.trim_start_matches('.').to_string(),
                "path" if !val.is_empty() => cookie.path = val.to_string(),
                "expires" => {
                    cookie.expires = DateTime::parse_from_rfc2822(val)
                        .ok()
                        .map(|at| at.with_timezone(&Utc))
                }
                "max-age" => max_age = val.parse::<i64>().ok(),
                "secure" => cookie.secure = true,
                _ => {}
            }
        }

        // Max-Age takes precedence over Expires
        if let Some(secs) = max_age {
            cookie.expires = Some(Utc::now() + Duration::seconds(secs));
        }
        Some(cookie)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CookieKey {
    domain: String,
    path: String,
    name: String,
}

impl From<&Cookie> for CookieKey {
    fn from(cookie: &Cookie) -> Self {
        Self {
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            name: cookie.name.clone(),
        }
    }
}

/// Cookie jar shared by clones of a transport
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<DashMap<CookieKey, Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `cookie`, replacing the one with the same domain, path and name.
    /// An expired cookie only removes its predecessor.
    pub fn add(&self, cookie: Cookie) {
        let key = CookieKey::from(&cookie);
        if cookie.is_expired() {
            self.cookies.remove(&key);
        } else {
            self.cookies.insert(key, cookie);
        }
    }

    /// Store the cookie from a `Set-Cookie` header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        match Cookie::parse(header, url) {
            Some(cookie) => self.add(cookie),
            None => tracing::debug!(header, "Ignoring malformed Set-Cookie"),
        }
    }

    /// Cookies to send with a request to `url`
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.cookies
            .iter()
            .filter(|entry| entry.value().matches(url))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// `Cookie` header for a request to `url`
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .get_cookies(url)
            .into_iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    pub fn clear(&self) {
        self.cookies.clear();
    }

    /// Number of live cookies
    pub fn len(&self) -> usize {
        self.cookies.iter().filter(|e| !e.value().is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
