// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! REST action client
//!
//! [`RestClient`] is bound to one bundle and runs its actions: the request
//! builder turns an [`Action`] into [`FetchParameters`], the transport sends
//! it, and the dispatcher classifies the outcome, updates the shared auth
//! store and calls exactly one handler.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rest_action_client::client::{Action, ClientContext, Fields, RestClient};
//! use rest_action_client::config::ClientConfig;
//!
//! # async fn run() -> rest_action_client::Result<()> {
//! let context = ClientContext::new(ClientConfig::for_origin("https://cms.example.com")?)?;
//! let client = RestClient::new("my-bundle", context);
//!
//! let action = Action::builder("hello")
//!     .data(Fields::new().field("name", "Janusz"))
//!     .on_success(|response| println!("{:?}", response.message))
//!     .build()?;
//!
//! let outcome = client.post(&action).await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

mod action;
mod builder;
mod dispatch;
mod handlers;
mod response;

use std::sync::Arc;

use parking_lot::RwLock;

pub use action::{
    Action, ActionBuilder, AlwaysHook, Callbacks, FieldValue, Fields, NonFrameworkHandler, Payload,
    ResponseHandler,
};
pub use builder::{build_form_data, build_query_string, credentials_mode, prepare_url, RequestBuilder};
pub use dispatch::{classify, dispatch, Classification, DispatchOutcome};
pub use handlers::{resolve, resolve_non_framework, GlobalHandlers};
pub use response::{
    FrameworkResponse, NonFrameworkError, NonFrameworkKind, Status, ValidationError,
};

use crate::auth::{AuthContext, AuthContextStore};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::headers::HeaderRegistry;
use crate::http::{FetchParameters, HttpTransport, Transport};

/// Shared handles every client of a process works with
#[derive(Clone)]
pub struct ClientContext {
    pub transport: Arc<dyn Transport>,
    pub registry: Arc<HeaderRegistry>,
    pub auth: Arc<AuthContextStore>,
    /// Global handlers seen by every client built on this context
    pub handlers: Arc<RwLock<GlobalHandlers>>,
    pub config: Arc<ClientConfig>,
}

impl ClientContext {
    /// Context with an HTTP transport, default headers and a fresh auth store
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Context over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            registry: Arc::new(HeaderRegistry::with_defaults()),
            auth: Arc::new(AuthContextStore::new()),
            handlers: Arc::new(RwLock::new(GlobalHandlers::default())),
            config: Arc::new(config),
        }
    }

    /// Replace the header registry
    pub fn registry(mut self, registry: Arc<HeaderRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the auth store
    pub fn auth_store(mut self, store: Arc<AuthContextStore>) -> Self {
        self.auth = store;
        self
    }

    /// Replace the global handlers
    pub fn global_handlers(mut self, handlers: Arc<RwLock<GlobalHandlers>>) -> Self {
        self.handlers = handlers;
        self
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("origin", &self.config.origin.as_str())
            .field("registry", &self.registry)
            .field("auth", &self.auth)
            .field("handlers", &*self.handlers.read())
            .finish_non_exhaustive()
    }
}

/// Client for the actions of one bundle
#[derive(Clone)]
pub struct RestClient {
    builder: RequestBuilder,
    context: ClientContext,
}

impl RestClient {
    /// Create a client for `bundle`
    pub fn new(bundle: impl Into<String>, context: ClientContext) -> Self {
        let builder = RequestBuilder::new(bundle, context.registry.clone(), context.config.clone());
        Self { builder, context }
    }

    /// Bundle name
    pub fn bundle_name(&self) -> &str {
        self.builder.bundle()
    }

    /// Shared context
    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Current auth context
    pub fn auth_context(&self) -> Arc<AuthContext> {
        self.context.auth.current()
    }

    /// Run `action` as a GET request
    pub async fn get(&self, action: &Action) -> DispatchOutcome {
        let params = self.builder.build_get(action).await;
        self.request(action, params).await
    }

    /// Run `action` as a POST request
    pub async fn post(&self, action: &Action) -> DispatchOutcome {
        let params = self.builder.build_post(action).await;
        self.request(action, params).await
    }

    /// Transport parameters a GET of `action` would use
    pub async fn build_get_fetch_parameters(&self, action: &Action) -> FetchParameters {
        self.builder.build_get(action).await
    }

    /// Transport parameters a POST of `action` would use
    pub async fn build_post_fetch_parameters(&self, action: &Action) -> FetchParameters {
        self.builder.build_post(action).await
    }

    async fn request(&self, action: &Action, params: FetchParameters) -> DispatchOutcome {
        tracing::debug!(
            bundle = self.bundle_name(),
            action = action.name(),
            method = %params.method(),
            url = %params.url,
            "Sending action request"
        );

        let result = self.context.transport.fetch(&params).await;
        // handlers may call the setters, so run them on a snapshot
        let handlers = self.context.handlers.read().clone();
        let outcome = dispatch(result, action.callbacks(), &handlers, &self.context.auth);

        tracing::debug!(
            bundle = self.bundle_name(),
            action = action.name(),
            outcome = ?outcome,
            "Action request finished"
        );
        outcome
    }

    /// Set the global success handler
    pub fn set_global_on_success<F>(&self, f: F)
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.context.handlers.write().success = Arc::new(f);
    }

    /// Set the global failure handler
    pub fn set_global_on_failure<F>(&self, f: F)
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.context.handlers.write().failure = Arc::new(f);
    }

    /// Set the global validation failure handler
    pub fn set_global_on_validation_failure<F>(&self, f: F)
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.context.handlers.write().validation_failure = Some(Arc::new(f));
    }

    /// Unset the global validation failure handler, so validation failures
    /// fall through to the failure handlers again
    pub fn clear_global_on_validation_failure(&self) {
        self.context.handlers.write().validation_failure = None;
    }

    /// Set the global error handler
    pub fn set_global_on_error<F>(&self, f: F)
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.context.handlers.write().error = Some(Arc::new(f));
    }

    /// Unset the global error handler, so errors fall through to the
    /// failure handlers again
    pub fn clear_global_on_error(&self) {
        self.context.handlers.write().error = None;
    }

    /// Set the global non-framework error handler
    pub fn set_global_on_non_framework_error<F>(&self, f: F)
    where
        F: Fn(&NonFrameworkError) + Send + Sync + 'static,
    {
        self.context.handlers.write().non_framework_error = Arc::new(f);
    }

    /// Snapshot of the global handlers
    pub fn global_handlers(&self) -> GlobalHandlers {
        self.context.handlers.read().clone()
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("bundle", &self.bundle_name())
            .field("handlers", &*self.context.handlers.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ANONYMOUS_USER_ID;
    use crate::headers::{CsrfTokenExtender, StaticHeader};
    use crate::config::CsrfConfig;
    use crate::testing::{raw_response, ScriptedTransport};
    use parking_lot::Mutex;
    use reqwest::Method;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scripted_client(transport: ScriptedTransport) -> RestClient {
        let context = ClientContext::with_transport(ClientConfig::default(), Arc::new(transport));
        RestClient::new("test-bundle", context)
    }

    #[tokio::test]
    async fn test_hello_post_logs_user_in() {
        let transport = ScriptedTransport::json(
            200,
            json!({"status": "SUCCESS", "message": "Hello Test", "authContext": {"userId": "admin"}}),
        );
        let client = scripted_client(transport.clone());
        let message = Arc::new(Mutex::new(None));
        let action = Action::builder("hello")
            .data(Fields::new().field("name", "Test"))
            .on_success({
                let message = message.clone();
                move |r| *message.lock() = r.message.clone()
            })
            .build()
            .unwrap();

        let outcome = client.post(&action).await;

        assert_eq!(outcome, DispatchOutcome::Handled(Status::Success));
        assert_eq!(message.lock().as_deref(), Some("Hello Test"));
        assert_eq!(client.auth_context().user_id(), Some("admin"));
        assert!(client.auth_context().is_logged_in());

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/apps/test-bundle/bin/hello.action");
        assert_eq!(sent[0].method(), &Method::POST);
    }

    #[tokio::test]
    async fn test_global_handlers_shared_through_context() {
        let transport = ScriptedTransport::json(
            200,
            json!({"status": "VALIDATION_FAILURE", "entity": [], "authContext": {"userId": ANONYMOUS_USER_ID}}),
        );
        let context = ClientContext::with_transport(ClientConfig::default(), Arc::new(transport));
        let first = RestClient::new("first", context.clone());
        let second = RestClient::new("second", context);

        let calls = Arc::new(Mutex::new(Vec::new()));
        first.set_global_on_validation_failure({
            let calls = calls.clone();
            move |r: &FrameworkResponse| calls.lock().push(format!("validation:{}", r.status))
        });
        second.set_global_on_failure({
            let calls = calls.clone();
            move |_| calls.lock().push("failure".to_string())
        });

        let action = Action::named("save").unwrap();
        second.post(&action).await;
        assert_eq!(*calls.lock(), vec!["validation:VALIDATION_FAILURE"]);

        first.clear_global_on_validation_failure();
        first.post(&action).await;
        assert_eq!(
            *calls.lock(),
            vec!["validation:VALIDATION_FAILURE", "failure"]
        );

        assert!(Arc::ptr_eq(&first.context().handlers, &second.context().handlers));
        assert!(Arc::ptr_eq(&first.context().auth, &second.context().auth));
        assert_eq!(first.auth_context().user_id(), Some(ANONYMOUS_USER_ID));
    }

    #[tokio::test]
    async fn test_global_error_handler_set_and_cleared() {
        let transport = ScriptedTransport::json(
            200,
            json!({"status": "ERROR", "message": "boom", "authContext": {"userId": "bob"}}),
        );
        let client = scripted_client(transport);
        let calls = Arc::new(Mutex::new(Vec::new()));
        client.set_global_on_error({
            let calls = calls.clone();
            move |_| calls.lock().push("error")
        });
        client.set_global_on_failure({
            let calls = calls.clone();
            move |_| calls.lock().push("failure")
        });

        let action = Action::named("explode").unwrap();
        client.get(&action).await;
        client.clear_global_on_error();
        client.get(&action).await;

        assert_eq!(*calls.lock(), vec!["error", "failure"]);
        assert!(client.global_handlers().error.is_none());
    }

    #[tokio::test]
    async fn test_non_framework_global_handler() {
        let transport = ScriptedTransport::new(|params| {
            Ok(raw_response(400, &params.url, Some("text/html"), "<h1>Bad Request</h1>"))
        });
        let client = scripted_client(transport);
        let status = Arc::new(Mutex::new(None));
        client.set_global_on_non_framework_error({
            let status = status.clone();
            move |e| *status.lock() = e.status_code()
        });

        let outcome = client.get(&Action::named("hello").unwrap()).await;

        assert_eq!(outcome, DispatchOutcome::NonFramework(NonFrameworkKind::NotJson));
        assert_eq!(*status.lock(), Some(400));
        assert!(!client.auth_context().is_initialized());
    }

    #[tokio::test]
    async fn test_cancelled_get() {
        let transport = ScriptedTransport::json(
            200,
            json!({"status": "SUCCESS", "authContext": {"userId": "bob"}}),
        )
        .with_delay(Duration::from_secs(5));
        let client = scripted_client(transport);
        let token = CancellationToken::new();
        let cancelled = Arc::new(Mutex::new(false));
        let action = Action::builder("slow")
            .signal(token.clone())
            .on_non_framework_error({
                let cancelled = cancelled.clone();
                move |e| *cancelled.lock() = e.is_cancelled()
            })
            .build()
            .unwrap();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let outcome = client.get(&action).await;
        canceller.await.unwrap();

        assert_eq!(outcome, DispatchOutcome::NonFramework(NonFrameworkKind::Transport));
        assert!(*cancelled.lock());
        assert!(!client.auth_context().is_initialized());
    }

    #[tokio::test]
    async fn test_build_fetch_parameters_use_registry() {
        let client = scripted_client(ScriptedTransport::json(200, json!({})));
        client
            .context()
            .registry
            .register("X-Tenant", vec![Method::GET], StaticHeader::new("acme"))
            .unwrap();
        let action = Action::builder("list").parameter("q", "a b").build().unwrap();

        let get = client.build_get_fetch_parameters(&action).await;
        let post = client.build_post_fetch_parameters(&action).await;

        assert_eq!(get.url, "/apps/test-bundle/bin/list.action?q=a%20b");
        assert_eq!(get.options.header_value("x-tenant"), Some("acme"));
        assert_eq!(post.url, "/apps/test-bundle/bin/list.action");
        assert!(post.options.header_value("x-tenant").is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/libs/granite/csrf/token.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t0k3n"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/content/site/page.test-bundle.hello.action"))
            .and(header("csrf-token", "t0k3n"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": "SUCCESS", "message": "Hello Test", "authContext": {"userId": "admin"}}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/apps/test-bundle/bin/who.action"))
            .and(query_param("verbose", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": "FAILURE", "message": "nope", "authContext": {"userId": "admin"}}),
            ))
            .mount(&server)
            .await;

        let context = ClientContext::new(ClientConfig::for_origin(server.uri()).unwrap()).unwrap();
        CsrfTokenExtender::new(CsrfConfig::default(), context.transport.clone())
            .install(&context.registry)
            .unwrap();
        let client = RestClient::new("test-bundle", context);

        let post = Action::builder("hello")
            .resource_path("/content/site/page")
            .data(Fields::new().field("name", "Test"))
            .build()
            .unwrap();
        assert_eq!(client.post(&post).await, DispatchOutcome::Handled(Status::Success));
        assert!(client.auth_context().is_logged_in());

        let get = Action::builder("who").parameter("verbose", true).build().unwrap();
        assert_eq!(client.get(&get).await, DispatchOutcome::Handled(Status::Failure));
    }

    #[tokio::test]
    async fn test_handler_may_replace_globals() {
        let transport = ScriptedTransport::json(
            200,
            json!({"status": "SUCCESS", "authContext": {"userId": "bob"}}),
        );
        let client = scripted_client(transport);
        let hits = Arc::new(Mutex::new(0));
        let action = Action::builder("hello")
            .on_success({
                let client = client.clone();
                let hits = hits.clone();
                move |_| {
                    let hits = hits.clone();
                    client.set_global_on_success(move |_| *hits.lock() += 1);
                }
            })
            .build()
            .unwrap();

        client.get(&action).await;
        client.get(&Action::named("hello").unwrap()).await;
        assert_eq!(*hits.lock(), 1);
    }
}
