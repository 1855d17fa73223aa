// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client and CSRF extender configuration

use std::time::Duration;

use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("rest-action-client/", env!("CARGO_PKG_VERSION"));

/// Hostname for which cross-origin credentials are sent during development
pub const DEVELOPMENT_HOSTNAME: &str = "localhost";

/// Default origin used when none is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Client configuration shared by every client facade of a process
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the calling page; relative action URLs resolve against it
    pub origin: Url,
    /// Calling hosts equal to this name get `credentials: include`
    pub development_hostname: String,
    /// Default timeout for requests
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Delay before `get_or_fetch_context` issues its own request
    pub auth_grace_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            development_hostname: DEVELOPMENT_HOSTNAME.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_grace_period: Duration::from_millis(100),
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for the given origin
    pub fn for_origin(origin: impl AsRef<str>) -> Result<Self> {
        Self::default().origin(origin)
    }

    /// Set the calling origin
    pub fn origin(mut self, origin: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(origin.as_ref())?;
        if url.host_str().is_none() {
            return Err(Error::Config(format!(
                "Origin '{}' has no host",
                origin.as_ref()
            )));
        }
        self.origin = url;
        Ok(self)
    }

    /// Set the development hostname
    pub fn development_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.development_hostname = hostname.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the auth grace period
    pub fn auth_grace_period(mut self, period: Duration) -> Self {
        self.auth_grace_period = period;
        self
    }

    /// Whether the calling origin is the local development host
    pub fn is_development_origin(&self) -> bool {
        self.origin.host_str() == Some(self.development_hostname.as_str())
    }
}

/// CSRF token extender configuration
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Header carrying the token
    pub header_name: String,
    /// Methods the header is attached to
    pub methods: Vec<Method>,
    /// Path of the token servlet
    pub token_path: String,
    /// Interval between background refreshes
    pub refresh_interval: Duration,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            header_name: "CSRF-Token".to_string(),
            methods: vec![Method::POST],
            token_path: "/libs/granite/csrf/token.json".to_string(),
            refresh_interval: Duration::from_secs(300),
        }
    }
}

impl CsrfConfig {
    /// Create a new CSRF config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set header name
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Set the methods the header applies to
    pub fn methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Set the token servlet path
    pub fn token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Set the refresh interval
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origin_is_development() {
        let config = ClientConfig::default();
        assert!(config.is_development_origin());
        assert_eq!(config.auth_grace_period, Duration::from_millis(100));
    }

    #[test]
    fn test_remote_origin() {
        let config = ClientConfig::for_origin("https://cms.example.com").unwrap();
        assert!(!config.is_development_origin());
    }

    #[test]
    fn test_origin_without_host_rejected() {
        assert!(ClientConfig::for_origin("data:text/plain,hi").is_err());
    }

    #[test]
    fn test_csrf_defaults() {
        let config = CsrfConfig::default();
        assert_eq!(config.header_name, "CSRF-Token");
        assert_eq!(config.methods, vec![Method::POST]);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
    }
}
