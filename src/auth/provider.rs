// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Lazy access to the auth context

use std::sync::Arc;
use std::time::Duration;

use super::context::AuthContext;
use crate::client::{Action, Callbacks, ClientContext, FrameworkResponse, NonFrameworkError, RestClient};

/// Bundle hosting the framework's own actions
pub const FRAMEWORK_BUNDLE: &str = "websight-rest-framework";

/// No-op action answering with the caller's auth context
pub const CHECK_AUTHENTICATION_ACTION: &str = "check-authentication";

/// Returns the current auth context, asking the server when none is known
#[derive(Debug, Clone)]
pub struct AuthContextProvider {
    client: RestClient,
    grace_period: Duration,
}

impl AuthContextProvider {
    pub fn new(context: ClientContext) -> Self {
        let grace_period = context.config.auth_grace_period;
        Self {
            client: RestClient::new(FRAMEWORK_BUNDLE, context),
            grace_period,
        }
    }

    /// Current context, without fetching
    pub fn context(&self) -> Arc<AuthContext> {
        self.client.auth_context()
    }

    /// Current context, fetched from the server if still uninitialized.
    ///
    /// Waits the grace period first so responses already in flight can
    /// populate the store. The result may still be uninitialized when the
    /// check request does not produce a framework response.
    pub async fn get_or_fetch_context(&self) -> Arc<AuthContext> {
        let current = self.context();
        if current.is_initialized() {
            return current;
        }

        tokio::time::sleep(self.grace_period).await;
        let current = self.context();
        if current.is_initialized() {
            return current;
        }

        self.check_authentication().await;
        self.context()
    }

    /// Issue the check-authentication request; the dispatcher updates the store
    pub async fn check_authentication(&self) {
        let action = match Action::builder(CHECK_AUTHENTICATION_ACTION)
            .callbacks(silent_callbacks())
            .build()
        {
            Ok(action) => action,
            Err(e) => {
                tracing::error!(error = %e, "Cannot build check-authentication action");
                return;
            }
        };

        let outcome = self.client.get(&action).await;
        tracing::debug!(outcome = ?outcome, "Authentication checked");
    }
}

fn silent_callbacks() -> Callbacks {
    let done = Arc::new(|_: &FrameworkResponse| {});
    Callbacks {
        on_success: Some(done.clone()),
        on_failure: Some(done.clone()),
        on_validation_failure: Some(done.clone()),
        on_error: Some(done),
        on_non_framework_error: Some(Arc::new(|e: &NonFrameworkError| {
            tracing::debug!(error = %e, "Authentication check did not return a framework response");
        })),
        always: None,
    }
}
