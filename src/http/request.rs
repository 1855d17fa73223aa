// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport-ready request descriptors
//!
//! `FetchParameters` is what the request builder produces and what a
//! [`Transport`](super::Transport) consumes: a URL (usually relative to the
//! calling origin) plus method, headers, body, credentials mode and an
//! optional cancellation token.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Credentials mode for requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Send credentials only to same-origin requests
    #[default]
    SameOrigin,
    /// Always send credentials
    Include,
    /// Never send credentials
    Omit,
}

impl CredentialsMode {
    /// Fetch API name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsMode::SameOrigin => "same-origin",
            CredentialsMode::Include => "include",
            CredentialsMode::Omit => "omit",
        }
    }
}

/// A file attached to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type, `application/octet-stream` when absent
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Bytes,
}

impl FilePart {
    /// Create a new file part
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Set the content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Value of a single form entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

impl FormValue {
    /// Text content, if this is a text entry
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            FormValue::File(_) => None,
        }
    }
}

/// Ordered multi-valued form container, sent as `multipart/form-data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text entry; existing entries with the same name are kept
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into(), FormValue::Text(value.into())));
    }

    /// Append a file entry
    pub fn append_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// Builder-style `append`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// First value for a name
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// All values for a name, in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&FormValue> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect()
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the form is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Transport options for one request
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Request method
    pub method: Method,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body (POST only)
    pub body: Option<FormData>,
    /// Credentials mode
    pub credentials: CredentialsMode,
    /// Cancellation token threaded from the action
    pub signal: Option<CancellationToken>,
}

// Tokens have no identity to compare; two options are equal when they agree
// on everything else and on whether a token is attached.
impl PartialEq for FetchOptions {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.headers == other.headers
            && self.body == other.body
            && self.credentials == other.credentials
            && self.signal.is_some() == other.signal.is_some()
    }
}

impl FetchOptions {
    /// Create options for a method with no headers or body
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            credentials: CredentialsMode::default(),
            signal: None,
        }
    }

    /// Set a header
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Get a header value
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the request has been cancelled already
    pub fn is_cancelled(&self) -> bool {
        self.signal
            .as_ref()
            .map(|s| s.is_cancelled())
            .unwrap_or(false)
    }
}

/// URL plus options, ready for a transport call
#[derive(Debug, Clone, PartialEq)]
pub struct FetchParameters {
    /// Request URL, absolute or relative to the calling origin
    pub url: String,
    /// Transport options
    pub options: FetchOptions,
}

impl FetchParameters {
    /// Create fetch parameters
    pub fn new(url: impl Into<String>, options: FetchOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    /// Request method
    pub fn method(&self) -> &Method {
        &self.options.method
    }
}
