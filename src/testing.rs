// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory transport for unit tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use crate::error::Result;
use crate::http::{FetchParameters, Response, Transport};

type Responder = dyn Fn(&FetchParameters) -> Result<Response> + Send + Sync;

/// Transport answering every request through a closure and recording it
#[derive(Clone)]
pub(crate) struct ScriptedTransport {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<FetchParameters>>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&FetchParameters) -> Result<Response> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Always answer with the given JSON body and status
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::new(move |params| Ok(json_response(status, &params.url, &body)))
    }

    /// Wait before answering, honouring cancellation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<FetchParameters> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, params: &FetchParameters) -> Result<Response> {
        self.requests.lock().push(params.clone());
        if let Some(delay) = self.delay {
            match params.options.signal {
                Some(ref token) => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            return Err(crate::error::Error::cancelled(params.url.as_str()))
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }
        }
        (self.responder)(params)
    }
}

fn absolute(url: &str) -> Url {
    Url::parse("http://localhost:8080")
        .and_then(|base| base.join(url))
        .expect("test URL resolves")
}

/// JSON response as a framework servlet would send it
pub(crate) fn json_response(status: u16, url: &str, body: &serde_json::Value) -> Response {
    Response::json_body(
        StatusCode::from_u16(status).expect("valid status"),
        absolute(url),
        body.to_string(),
    )
}

/// Response with an arbitrary content type and raw body
pub(crate) fn raw_response(status: u16, url: &str, content_type: Option<&str>, body: &str) -> Response {
    let resp = Response::new(
        StatusCode::from_u16(status).expect("valid status"),
        HeaderMap::new(),
        Bytes::from(body.to_string()),
        absolute(url),
        false,
        0,
    );
    match content_type {
        Some(ct) => resp.with_header("content-type", ct),
        None => resp,
    }
}
