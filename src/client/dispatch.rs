// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response classification and handler dispatch

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use super::action::Callbacks;
use super::handlers::{resolve, resolve_non_framework, GlobalHandlers};
use super::response::{FrameworkResponse, NonFrameworkError, NonFrameworkKind, Status};
use crate::auth::AuthContextStore;
use crate::error::Result;
use crate::http::Response;

/// Result of classifying a completed transport call
#[derive(Debug)]
pub enum Classification {
    Framework(Arc<FrameworkResponse>),
    NonFramework(NonFrameworkError),
}

/// Route taken by a dispatched response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A framework response was handed to the handler for its status
    Handled(Status),
    /// The non-framework handler was called
    NonFramework(NonFrameworkKind),
}

impl DispatchOutcome {
    /// Whether the server answered with a framework SUCCESS
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Handled(Status::Success))
    }
}

/// Classify a transport result
pub fn classify(result: Result<Response>) -> Classification {
    let response = match result {
        Ok(response) => response,
        Err(e) => return Classification::NonFramework(NonFrameworkError::Transport(e)),
    };

    if !response.is_json() {
        return Classification::NonFramework(NonFrameworkError::NotJson(response));
    }

    let payload: Value = match serde_json::from_slice(&response.body) {
        Ok(payload) => payload,
        Err(error) => {
            return Classification::NonFramework(NonFrameworkError::Malformed { response, error })
        }
    };

    match FrameworkResponse::from_value(payload) {
        Ok(framework) => Classification::Framework(Arc::new(framework)),
        Err(payload) => {
            Classification::NonFramework(NonFrameworkError::Invalid { response, payload })
        }
    }
}

/// Run the `always` hook; a panic inside it is logged and swallowed
fn run_always(callbacks: &Callbacks) {
    if let Some(ref always) = callbacks.always {
        if catch_unwind(AssertUnwindSafe(|| always())).is_err() {
            tracing::error!("always hook panicked");
        }
    }
}

/// Classify a transport result and invoke the matching handler.
///
/// The `always` hook runs first. For framework responses the auth store is
/// updated before the handler runs, so handlers observe the new context.
pub fn dispatch(
    result: Result<Response>,
    callbacks: &Callbacks,
    global: &GlobalHandlers,
    store: &AuthContextStore,
) -> DispatchOutcome {
    run_always(callbacks);

    match classify(result) {
        Classification::Framework(response) => {
            store.update_from(&response.auth_context);
            let handler = resolve(response.status, callbacks, global);
            tracing::debug!(status = %response.status, "Dispatching framework response");
            handler(&response);
            DispatchOutcome::Handled(response.status)
        }
        Classification::NonFramework(error) => {
            let kind = error.kind();
            tracing::debug!(kind = ?kind, error = %error, "Dispatching non-framework response");
            let handler = resolve_non_framework(callbacks, global);
            handler(&error);
            DispatchOutcome::NonFramework(kind)
        }
    }
}
