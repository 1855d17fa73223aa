// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # rest-action-client - Framework REST Action Client
//!
//! Client for the REST actions of a content-management framework. Every
//! action answers with a JSON envelope carrying a status and the caller's
//! auth context; this crate sends the requests, classifies the responses
//! and keeps the auth context in sync.
//!
//! ## Features
//!
//! - Status taxonomy: SUCCESS, FAILURE, VALIDATION_FAILURE, ERROR, plus a
//!   non-framework path for everything else
//! - Handler fallback chains with global handlers shared per context
//! - Auth context store with change notification
//! - Pluggable request headers, including a self-refreshing CSRF token
//! - Cancellation through `CancellationToken`
//!
//! ## Example
//!
//! ```rust,no_run
//! use rest_action_client::{Action, ClientConfig, ClientContext, RestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ClientContext::new(ClientConfig::for_origin("http://localhost:4502")?)?;
//!     let client = RestClient::new("my-bundle", context);
//!
//!     let action = Action::builder("list-pages")
//!         .parameter("limit", 10)
//!         .on_success(|response| println!("{:?}", response.entity))
//!         .on_failure(|response| eprintln!("{:?}", response.message))
//!         .build()?;
//!
//!     client.get(&action).await;
//!     println!("logged in: {}", client.auth_context().is_logged_in());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;

#[cfg(test)]
mod testing;

// Re-exports for convenience

// Client
pub use client::{
    Action, ActionBuilder, Callbacks, ClientContext, DispatchOutcome, FieldValue, Fields,
    FrameworkResponse, GlobalHandlers, NonFrameworkError, NonFrameworkKind, Payload, RestClient,
    Status, ValidationError,
};

// Auth
pub use auth::{AuthContext, AuthContextProvider, AuthContextStore, AuthContextUpdated};

// Headers
pub use headers::{CsrfTokenExtender, HeaderRegistry, HeaderValueProvider};

// Config
pub use config::{ClientConfig, CsrfConfig};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{FetchOptions, FetchParameters, FormData, HttpTransport, Response, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
