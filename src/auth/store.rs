// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Auth context store with change notification

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::{AuthContext, AuthContextData};

/// Name of the event broadcast when the auth context changes
pub const AUTH_CONTEXT_UPDATED: &str = "rest.auth.context-updated";

/// Payload of an `AUTH_CONTEXT_UPDATED` event
#[derive(Debug, Clone)]
pub struct AuthContextUpdated {
    /// The context that just became current
    pub context: Arc<AuthContext>,
}

impl AuthContextUpdated {
    /// Event name
    pub fn name(&self) -> &'static str {
        AUTH_CONTEXT_UPDATED
    }
}

/// Listener callback type
pub type AuthContextListener = Arc<dyn Fn(&AuthContextUpdated) + Send + Sync>;

/// Handle returned by [`AuthContextStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Single slot holding the current auth context.
///
/// One store is shared by every client of a process; it starts
/// uninitialized and lives as long as its last handle.
pub struct AuthContextStore {
    current: RwLock<Arc<AuthContext>>,
    listeners: RwLock<Vec<(ListenerId, AuthContextListener)>>,
    next_listener: AtomicU64,
}

impl Default for AuthContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthContextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContextStore")
            .field("current", &*self.current.read())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl AuthContextStore {
    /// Create a store holding an uninitialized context
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(AuthContext::uninitialized())),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Current context; never blocks on I/O and never fails
    pub fn current(&self) -> Arc<AuthContext> {
        self.current.read().clone()
    }

    /// Replace the current context if `data` carries a different user id.
    ///
    /// Returns true when the context changed. Listeners run after the slot
    /// lock is released, so they may read the store.
    pub fn update_from(&self, data: &AuthContextData) -> bool {
        let updated = {
            let mut current = self.current.write();
            if current.user_id() == Some(data.user_id.as_str()) {
                return false;
            }
            let context = Arc::new(AuthContext::from(data));
            *current = context.clone();
            context
        };

        tracing::debug!(user_id = %data.user_id, "Auth context updated");
        self.emit(&AuthContextUpdated { context: updated });
        true
    }

    /// Register a listener for `AUTH_CONTEXT_UPDATED`
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&AuthContextUpdated) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn emit(&self, event: &AuthContextUpdated) {
        let listeners: Vec<AuthContextListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}
