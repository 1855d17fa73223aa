// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSRF token header extender
//!
//! The token comes from a servlet answering `{"token": "..."}`. The first
//! request that needs it waits for a single shared fetch; afterwards the
//! cached value is used and a background task keeps it fresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::registry::{HeaderRegistry, HeaderValueProvider};
use crate::auth::{AuthContextStore, ListenerId};
use crate::config::CsrfConfig;
use crate::error::{Error, Result};
use crate::http::{headers, CredentialsMode, FetchOptions, FetchParameters, Transport, APPLICATION_JSON};

/// Shortest period the background refresher runs at
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

struct Inner {
    config: CsrfConfig,
    transport: Arc<dyn Transport>,
    token: RwLock<Option<String>>,
    /// Held for the duration of every fetch, so fetches never overlap
    fetch_lock: Mutex<()>,
}

/// Header value provider serving a cached CSRF token
#[derive(Clone)]
pub struct CsrfTokenExtender {
    inner: Arc<Inner>,
}

impl CsrfTokenExtender {
    /// Create an extender fetching through `transport`
    pub fn new(config: CsrfConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                token: RwLock::new(None),
                fetch_lock: Mutex::new(()),
            }),
        }
    }

    /// Extender configuration
    pub fn config(&self) -> &CsrfConfig {
        &self.inner.config
    }

    /// Register this extender in `registry` under the configured header
    pub fn install(&self, registry: &HeaderRegistry) -> Result<()> {
        registry.register_shared(
            &self.inner.config.header_name,
            self.inner.config.methods.clone(),
            Arc::new(self.clone()),
        )
    }

    /// Cached token, if one has been fetched
    pub fn cached(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Cached token, or the result of a fetch shared by all waiting callers
    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let _guard = self.inner.fetch_lock.lock().await;
        // another caller may have filled the cache while we waited
        if let Some(token) = self.cached() {
            return Ok(token);
        }
        self.fetch_and_store().await
    }

    /// Fetch a fresh token and replace the cached one.
    ///
    /// On failure the previous token stays in place.
    pub async fn refresh(&self) -> Result<String> {
        let _guard = self.inner.fetch_lock.lock().await;
        self.fetch_and_store().await
    }

    async fn fetch_and_store(&self) -> Result<String> {
        match self.fetch_token().await {
            Ok(token) => {
                *self.inner.token.write() = Some(token.clone());
                tracing::debug!(path = %self.inner.config.token_path, "CSRF token refreshed");
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.inner.config.token_path,
                    error = %e,
                    "Cannot fetch CSRF token"
                );
                Err(e)
            }
        }
    }

    async fn fetch_token(&self) -> Result<String> {
        let params = FetchParameters::new(
            self.inner.config.token_path.clone(),
            FetchOptions {
                credentials: CredentialsMode::SameOrigin,
                ..FetchOptions::new(Method::GET)
            }
            .header(headers::ACCEPT, APPLICATION_JSON),
        );

        let response = self.inner.transport.fetch(&params).await?;
        if !response.is_success() {
            return Err(Error::header_provider(
                &self.inner.config.header_name,
                format!("Invalid HTTP code: {}", response.status_code()),
            ));
        }

        let parsed: TokenResponse = response.json().map_err(|e| {
            Error::header_provider(
                &self.inner.config.header_name,
                format!("Exception while parsing response: {}", e),
            )
        })?;
        Ok(parsed.token)
    }

    /// Start the background refresh task.
    ///
    /// Refreshes immediately, then every `refresh_interval` (at least
    /// [`MIN_REFRESH_INTERVAL`]), and on every
    /// auth context update except the first one (the first update only
    /// reports the identity the page was loaded with).
    pub fn spawn_refresher(&self, store: Arc<AuthContextStore>) -> RefresherHandle {
        let cancel = CancellationToken::new();
        let (tx, mut updates) = mpsc::unbounded_channel();
        let listener = store.subscribe(move |_| {
            let _ = tx.send(());
        });

        let extender = self.clone();
        let stop = cancel.clone();
        let period = self.inner.config.refresh_interval;
        if period < MIN_REFRESH_INTERVAL {
            tracing::warn!(
                requested_ms = period.as_millis() as u64,
                "CSRF refresh interval too short, using {:?}",
                MIN_REFRESH_INTERVAL
            );
        }
        let period = period.max(MIN_REFRESH_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut first_update_seen = false;

            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        let _ = extender.refresh().await;
                    }
                    Some(()) = updates.recv() => {
                        if !first_update_seen {
                            first_update_seen = true;
                            continue;
                        }
                        let _ = extender.refresh().await;
                    }
                }
            }
            tracing::debug!("CSRF token refresher stopped");
        });

        RefresherHandle {
            cancel,
            task: Some(task),
            store,
            listener: Some(listener),
        }
    }
}

#[async_trait]
impl HeaderValueProvider for CsrfTokenExtender {
    async fn value(&self) -> Result<Option<String>> {
        self.token().await.map(Some)
    }
}

/// Handle to the background refresh task; stops it when dropped
pub struct RefresherHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    store: Arc<AuthContextStore>,
    listener: Option<ListenerId>,
}

impl RefresherHandle {
    /// Stop the task and wait for it to finish
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Whether the task is no longer running
    pub fn is_stopped(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(listener) = self.listener.take() {
            self.store.unsubscribe(listener);
        }
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
