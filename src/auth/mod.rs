// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Authentication context tracking
//!
//! Every framework response reports the user id the server saw. The store
//! keeps the latest one and tells listeners when it changes.

mod context;
mod provider;
mod store;

pub use context::{AuthContext, AuthContextData, ANONYMOUS_USER_ID};
pub use provider::{AuthContextProvider, CHECK_AUTHENTICATION_ACTION, FRAMEWORK_BUNDLE};
pub use store::{AuthContextListener, AuthContextStore, AuthContextUpdated, ListenerId, AUTH_CONTEXT_UPDATED};
