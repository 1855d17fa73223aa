// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Completed transport response
//!
//! The body is buffered in full: the dispatcher needs the content type and
//! the whole JSON document before it can classify anything.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// Response as handed from the transport to the dispatcher
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Final URL, after redirects
    pub url: Url,
    /// Set when a redirect was followed, typically to a login page
    pub redirected: bool,
    pub response_time_ms: u64,
}

impl Response {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        redirected: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            redirected,
            response_time_ms,
        }
    }

    /// Response carrying a JSON body, as framework actions send it
    pub fn json_body(status: StatusCode, url: Url, body: impl Into<Bytes>) -> Self {
        Self::new(status, HeaderMap::new(), body.into(), url, false, 0)
            .with_header(super::headers::CONTENT_TYPE, "application/json;charset=utf-8")
    }

    /// Set a header, returning the response
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Body as text, invalid UTF-8 replaced
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(super::headers::CONTENT_TYPE)
    }

    /// Whether the content type starts with `application/json`; parameters
    /// such as `;charset=utf-8` are allowed
    pub fn is_json(&self) -> bool {
        self.content_type().map_or(false, |ct| {
            ct.trim_start()
                .get(..super::APPLICATION_JSON.len())
                .map_or(false, |prefix| prefix.eq_ignore_ascii_case(super::APPLICATION_JSON))
        })
    }
}
