// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Global handlers and handler resolution

use std::fmt;
use std::sync::Arc;

use super::action::{Callbacks, NonFrameworkHandler, ResponseHandler};
use super::response::{FrameworkResponse, NonFrameworkError, Status};

/// Client-wide fallback handlers
#[derive(Clone)]
pub struct GlobalHandlers {
    pub success: ResponseHandler,
    pub failure: ResponseHandler,
    pub validation_failure: Option<ResponseHandler>,
    pub error: Option<ResponseHandler>,
    pub non_framework_error: NonFrameworkHandler,
}

impl Default for GlobalHandlers {
    fn default() -> Self {
        Self {
            success: Arc::new(|response: &FrameworkResponse| {
                tracing::warn!(
                    status = %response.status,
                    message = response.message.as_deref().unwrap_or(""),
                    "Unhandled success response"
                );
            }),
            failure: Arc::new(|response: &FrameworkResponse| {
                tracing::warn!(
                    status = %response.status,
                    message = response.message.as_deref().unwrap_or(""),
                    details = response.message_details.as_deref().unwrap_or(""),
                    "Unhandled failure response"
                );
            }),
            validation_failure: None,
            error: None,
            non_framework_error: Arc::new(|error: &NonFrameworkError| {
                tracing::warn!(kind = ?error.kind(), error = %error, "Unhandled non-framework response");
            }),
        }
    }
}

impl fmt::Debug for GlobalHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalHandlers")
            .field("validation_failure", &self.validation_failure.is_some())
            .field("error", &self.error.is_some())
            .finish_non_exhaustive()
    }
}

/// Pick the handler for a framework status.
///
/// Per-request callbacks win over globals. VALIDATION_FAILURE and ERROR fall
/// back to the failure handlers when neither a dedicated callback nor a
/// dedicated global is set.
pub fn resolve(status: Status, callbacks: &Callbacks, global: &GlobalHandlers) -> ResponseHandler {
    let failure = || {
        callbacks
            .on_failure
            .clone()
            .unwrap_or_else(|| global.failure.clone())
    };

    match status {
        Status::Success => callbacks
            .on_success
            .clone()
            .unwrap_or_else(|| global.success.clone()),
        Status::Failure => failure(),
        Status::ValidationFailure => callbacks
            .on_validation_failure
            .clone()
            .or_else(|| global.validation_failure.clone())
            .unwrap_or_else(failure),
        Status::Error => callbacks
            .on_error
            .clone()
            .or_else(|| global.error.clone())
            .unwrap_or_else(failure),
    }
}

/// Pick the handler for a non-framework outcome
pub fn resolve_non_framework(callbacks: &Callbacks, global: &GlobalHandlers) -> NonFrameworkHandler {
    callbacks
        .on_non_framework_error
        .clone()
        .unwrap_or_else(|| global.non_framework_error.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> ResponseHandler {
        Arc::new(|_: &FrameworkResponse| {})
    }

    #[test]
    fn test_success_prefers_callback() {
        let global = GlobalHandlers::default();
        let own = handler();
        let callbacks = Callbacks {
            on_success: Some(own.clone()),
            ..Default::default()
        };

        assert!(Arc::ptr_eq(&resolve(Status::Success, &callbacks, &global), &own));
        assert!(Arc::ptr_eq(
            &resolve(Status::Success, &Callbacks::default(), &global),
            &global.success
        ));
    }

    #[test]
    fn test_validation_failure_chain() {
        let mut global = GlobalHandlers::default();
        let on_failure = handler();
        let callbacks = Callbacks {
            on_failure: Some(on_failure.clone()),
            ..Default::default()
        };

        // nothing dedicated: request failure handler
        assert!(Arc::ptr_eq(
            &resolve(Status::ValidationFailure, &callbacks, &global),
            &on_failure
        ));
        // nothing at all: global failure
        assert!(Arc::ptr_eq(
            &resolve(Status::ValidationFailure, &Callbacks::default(), &global),
            &global.failure
        ));

        // global validation handler beats request failure handler
        let global_validation = handler();
        global.validation_failure = Some(global_validation.clone());
        assert!(Arc::ptr_eq(
            &resolve(Status::ValidationFailure, &callbacks, &global),
            &global_validation
        ));

        let own = handler();
        let callbacks = Callbacks {
            on_validation_failure: Some(own.clone()),
            ..callbacks
        };
        assert!(Arc::ptr_eq(
            &resolve(Status::ValidationFailure, &callbacks, &global),
            &own
        ));
    }

    #[test]
    fn test_error_chain() {
        let mut global = GlobalHandlers::default();
        assert!(Arc::ptr_eq(
            &resolve(Status::Error, &Callbacks::default(), &global),
            &global.failure
        ));

        let global_error = handler();
        global.error = Some(global_error.clone());
        assert!(Arc::ptr_eq(
            &resolve(Status::Error, &Callbacks::default(), &global),
            &global_error
        ));

        let own = handler();
        let callbacks = Callbacks {
            on_error: Some(own.clone()),
            ..Default::default()
        };
        assert!(Arc::ptr_eq(&resolve(Status::Error, &callbacks, &global), &own));
    }

    #[test]
    fn test_failure_ignores_dedicated_handlers() {
        let global = GlobalHandlers {
            validation_failure: Some(handler()),
            error: Some(handler()),
            ..Default::default()
        };
        assert!(Arc::ptr_eq(
            &resolve(Status::Failure, &Callbacks::default(), &global),
            &global.failure
        ));
    }

    #[test]
    fn test_non_framework_resolution() {
        let global = GlobalHandlers::default();
        assert!(Arc::ptr_eq(
            &resolve_non_framework(&Callbacks::default(), &global),
            &global.non_framework_error
        ));

        let own: NonFrameworkHandler = Arc::new(|_: &NonFrameworkError| {});
        let callbacks = Callbacks {
            on_non_framework_error: Some(own.clone()),
            ..Default::default()
        };
        assert!(Arc::ptr_eq(&resolve_non_framework(&callbacks, &global), &own));
    }
}
