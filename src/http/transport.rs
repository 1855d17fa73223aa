// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport boundary and its reqwest implementation

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::cookie::CookieJar;
use super::request::{CredentialsMode, FetchParameters, FormData, FormValue};
use super::response::Response;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorContext, Result};

/// Maximum redirects to follow
const MAX_REDIRECTS: usize = 10;

/// Fetch-like capability: performs one request and returns the completed
/// response, or an error for network failures and cancellation.
///
/// HTTP error statuses are not errors at this layer; they come back as a
/// `Response` and are classified by the dispatcher.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request described by `params`
    async fn fetch(&self, params: &FetchParameters) -> Result<Response>;
}

/// reqwest-backed transport with its own cookie jar
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    origin: Url,
    /// The only cookie store; reqwest keeps none of its own
    cookie_jar: CookieJar,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Create a transport for the configured origin
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            origin: config.origin.clone(),
            cookie_jar: CookieJar::new(),
            timeout_ms: config.timeout.as_millis() as u64,
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Calling origin
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve a possibly relative URL against the calling origin
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        Ok(self.origin.join(url)?)
    }

    /// Whether cookies go out with a request to `url` under `mode`
    fn sends_credentials(&self, mode: CredentialsMode, url: &Url) -> bool {
        match mode {
            CredentialsMode::Include => true,
            CredentialsMode::SameOrigin => url.origin() == self.origin.origin(),
            CredentialsMode::Omit => false,
        }
    }

    fn multipart_form(form: &FormData) -> Result<multipart::Form> {
        let mut multipart = multipart::Form::new();
        for (name, value) in form.entries() {
            multipart = match value {
                FormValue::Text(text) => multipart.text(name.clone(), text.clone()),
                FormValue::File(file) => {
                    let part = multipart::Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name.clone())
                        .mime_str(
                            file.content_type
                                .as_deref()
                                .unwrap_or("application/octet-stream"),
                        )?;
                    multipart.part(name.clone(), part)
                }
            };
        }
        Ok(multipart)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout("fetch", self.timeout_ms)
        } else if e.is_connect() {
            Error::network(e.to_string())
        } else {
            Error::Http(e)
        }
    }

    async fn send(&self, url: Url, params: &FetchParameters) -> Result<Response> {
        let start = Instant::now();
        let options = &params.options;

        let mut builder = self.client.request(options.method.clone(), url.clone());

        for (name, value) in options.headers.iter() {
            builder = builder.header(name, value);
        }

        let with_credentials = self.sends_credentials(options.credentials, &url);
        if with_credentials {
            if let Some(cookie_header) = self.cookie_jar.get_cookie_header(&url) {
                builder = builder.header(super::headers::COOKIE, cookie_header);
            }
        }

        if let Some(ref form) = options.body {
            builder = builder.multipart(Self::multipart_form(form)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e))
            .with_url(url.as_str())?;
        let response_time = start.elapsed().as_millis() as u64;

        let redirected = response.url() != &url;
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        if with_credentials {
            for cookie in headers.get_all(super::headers::SET_COOKIE) {
                if let Ok(cookie_str) = cookie.to_str() {
                    self.cookie_jar.add_from_header(cookie_str, &final_url);
                }
            }
        }

        let body = response.bytes().await?;

        tracing::debug!(
            method = %options.method,
            url = %final_url,
            status = %status,
            time_ms = response_time,
            "Response"
        );

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            redirected,
            response_time,
        ))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, params: &FetchParameters) -> Result<Response> {
        let url = self.resolve_url(&params.url)?;

        match params.options.signal {
            Some(ref token) => {
                if token.is_cancelled() {
                    return Err(Error::cancelled(url.as_str()));
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::cancelled(url.as_str())),
                    result = self.send(url.clone(), params) => result,
                }
            }
            None => self.send(url, params).await,
        }
    }
}
