// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Authentication context value

use serde::{Deserialize, Serialize};

/// User id the server reports for unauthenticated callers
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// `authContext` object carried by every framework response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContextData {
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl AuthContextData {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Identity last observed from the server.
///
/// Values are never mutated; the store swaps in a new `Arc<AuthContext>`
/// whenever the user id changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    user_id: Option<String>,
}

impl AuthContext {
    /// Context that has not been populated from any response yet
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Context for the given user id
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// User id, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// true if the user id is present and not empty
    pub fn is_initialized(&self) -> bool {
        self.user_id.as_deref().map_or(false, |id| !id.is_empty())
    }

    /// true if initialized and not the anonymous identity
    pub fn is_logged_in(&self) -> bool {
        self.is_initialized() && self.user_id.as_deref() != Some(ANONYMOUS_USER_ID)
    }
}

impl From<&AuthContextData> for AuthContext {
    fn from(data: &AuthContextData) -> Self {
        AuthContext::new(data.user_id.clone())
    }
}
