// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header extension registry
//!
//! Maps a header name to the methods it applies to and a provider of its
//! value. Providers are asked for a value every time a request is built.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::error::{Error, Result};
use crate::http::APPLICATION_JSON;

/// Provider of a header value
///
/// # Example
///
/// ```rust
/// use rest_action_client::headers::HeaderValueProvider;
/// use rest_action_client::Result;
/// use async_trait::async_trait;
///
/// struct TenantHeader {
///     tenant: String,
/// }
///
/// #[async_trait]
/// impl HeaderValueProvider for TenantHeader {
///     async fn value(&self) -> Result<Option<String>> {
///         Ok(Some(self.tenant.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait HeaderValueProvider: Send + Sync {
    /// Value to send, `None` to leave the header out.
    ///
    /// May wait on I/O the first time it runs; implementations cache what
    /// they fetch so later calls return without waiting.
    async fn value(&self) -> Result<Option<String>>;
}

/// Provider returning a fixed value
#[derive(Debug, Clone)]
pub struct StaticHeader {
    value: String,
}

impl StaticHeader {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl HeaderValueProvider for StaticHeader {
    async fn value(&self) -> Result<Option<String>> {
        Ok(Some(self.value.clone()))
    }
}

/// Provider backed by a synchronous closure
pub struct FnHeader<F> {
    f: F,
}

impl<F> FnHeader<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> HeaderValueProvider for FnHeader<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    async fn value(&self) -> Result<Option<String>> {
        Ok((self.f)())
    }
}

/// Registered extender: methods plus provider
#[derive(Clone)]
pub struct HeaderExtender {
    methods: Vec<Method>,
    provider: Arc<dyn HeaderValueProvider>,
}

impl HeaderExtender {
    /// Whether the extender applies to `method`
    pub fn applies_to(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Methods the extender applies to
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

impl fmt::Debug for HeaderExtender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderExtender")
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

/// Registry of header extenders keyed by header name
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    extenders: RwLock<Vec<(HeaderName, HeaderExtender)>>,
}

impl HeaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `Accept: application/json` for GET and POST
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.insert(
            HeaderName::from_static("accept"),
            vec![Method::GET, Method::POST],
            Arc::new(StaticHeader::new(APPLICATION_JSON)),
        );
        registry
    }

    /// Register an extender, replacing any previous one for `name`
    pub fn register<P>(&self, name: &str, methods: Vec<Method>, provider: P) -> Result<()>
    where
        P: HeaderValueProvider + 'static,
    {
        self.register_shared(name, methods, Arc::new(provider))
    }

    /// Register an extender whose provider is shared with other owners
    pub fn register_shared(
        &self,
        name: &str,
        methods: Vec<Method>,
        provider: Arc<dyn HeaderValueProvider>,
    ) -> Result<()> {
        let header = HeaderName::try_from(name)
            .map_err(|e| Error::Config(format!("Invalid header name '{}': {}", name, e)))?;
        self.insert(header, methods, provider);
        Ok(())
    }

    fn insert(&self, name: HeaderName, methods: Vec<Method>, provider: Arc<dyn HeaderValueProvider>) {
        let extender = HeaderExtender { methods, provider };
        let mut extenders = self.extenders.write();
        match extenders.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = extender,
            None => extenders.push((name, extender)),
        }
    }

    /// Remove the extender for `name`
    pub fn unregister(&self, name: &str) -> bool {
        let Ok(header) = HeaderName::try_from(name) else {
            return false;
        };
        let mut extenders = self.extenders.write();
        let before = extenders.len();
        extenders.retain(|(n, _)| *n != header);
        extenders.len() != before
    }

    /// Extender registered for `name`
    pub fn get(&self, name: &str) -> Option<HeaderExtender> {
        let header = HeaderName::try_from(name).ok()?;
        self.extenders
            .read()
            .iter()
            .find(|(n, _)| *n == header)
            .map(|(_, e)| e.clone())
    }

    /// Number of registered extenders
    pub fn len(&self) -> usize {
        self.extenders.read().len()
    }

    /// Check if no extender is registered
    pub fn is_empty(&self) -> bool {
        self.extenders.read().is_empty()
    }

    /// Compute headers for a request with `method`.
    ///
    /// A provider that fails or yields an unusable value only loses its own
    /// header; the rest of the request is unaffected.
    pub async fn compute_headers(&self, method: &Method) -> HeaderMap {
        let applicable: Vec<(HeaderName, Arc<dyn HeaderValueProvider>)> = self
            .extenders
            .read()
            .iter()
            .filter(|(_, e)| e.applies_to(method))
            .map(|(n, e)| (n.clone(), e.provider.clone()))
            .collect();

        let values = futures::future::join_all(
            applicable.iter().map(|(_, provider)| provider.value()),
        )
        .await;

        let mut headers = HeaderMap::new();
        for ((name, _), value) in applicable.into_iter().zip(values) {
            match value {
                Ok(Some(value)) => match HeaderValue::try_from(value) {
                    Ok(value) => {
                        headers.insert(name, value);
                    }
                    Err(e) => {
                        tracing::warn!(header = %name, error = %e, "Dropping invalid header value");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(header = %name, error = %e, "Header provider failed");
                }
            }
        }
        headers
    }
}
