// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Action descriptors
//!
//! An [`Action`] names a server-side operation and carries everything one
//! call needs: parameters or body, per-request callbacks and an optional
//! cancellation token. Actions are built through [`ActionBuilder`] and
//! validated once, at `build()`.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::response::{FrameworkResponse, NonFrameworkError};
use crate::error::{Error, Result};
use crate::http::FormData;

/// Handler for a classified framework response
pub type ResponseHandler = Arc<dyn Fn(&FrameworkResponse) + Send + Sync>;

/// Handler for responses outside the framework taxonomy
pub type NonFrameworkHandler = Arc<dyn Fn(&NonFrameworkError) + Send + Sync>;

/// Hook run once per request, before any other handler
pub type AlwaysHook = Arc<dyn Fn() + Send + Sync>;

/// Value of a parameter or form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Left out of the request
    Absent,
    Bool(bool),
    Text(String),
    /// Expanded into one `key=item` pair per element
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Text(v.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

macro_rules! numeric_field_value {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Text(v.to_string())
            }
        })*
    };
}

numeric_field_value!(i32, i64, u32, u64, usize, f64);

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Absent)
    }
}

impl<T: ToString> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        FieldValue::List(v.iter().map(ToString::to_string).collect())
    }
}

/// Insertion-ordered field map; setting an existing key keeps its position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// POST payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Sent as is
    Form(FormData),
    /// Converted field by field into a form
    Fields(Fields),
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Payload::Form(form)
    }
}

impl From<Fields> for Payload {
    fn from(fields: Fields) -> Self {
        Payload::Fields(fields)
    }
}

/// Per-request callbacks; unset ones fall back to the client's globals
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_success: Option<ResponseHandler>,
    pub on_failure: Option<ResponseHandler>,
    pub on_validation_failure: Option<ResponseHandler>,
    pub on_error: Option<ResponseHandler>,
    pub on_non_framework_error: Option<NonFrameworkHandler>,
    pub always: Option<AlwaysHook>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .field("on_validation_failure", &self.on_validation_failure.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_non_framework_error", &self.on_non_framework_error.is_some())
            .field("always", &self.always.is_some())
            .finish()
    }
}

/// Validated action descriptor
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    resource_path: Option<String>,
    parameters: Fields,
    data: Option<Payload>,
    callbacks: Callbacks,
    signal: Option<CancellationToken>,
}

impl Action {
    /// Start building an action
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(name)
    }

    /// Action with no parameters or callbacks
    pub fn named(name: impl Into<String>) -> Result<Self> {
        ActionBuilder::new(name).build()
    }

    /// Action name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource path the action is addressed through
    pub fn resource_path(&self) -> Option<&str> {
        self.resource_path.as_deref()
    }

    /// GET parameters
    pub fn parameters(&self) -> &Fields {
        &self.parameters
    }

    /// POST payload
    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// Per-request callbacks
    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Cancellation token
    pub fn signal(&self) -> Option<&CancellationToken> {
        self.signal.as_ref()
    }
}

/// Builder for [`Action`]
#[derive(Debug)]
pub struct ActionBuilder {
    action: Action,
}

impl ActionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            action: Action {
                name: name.into(),
                resource_path: None,
                parameters: Fields::new(),
                data: None,
                callbacks: Callbacks::default(),
                signal: None,
            },
        }
    }

    /// Address the action through a resource path
    pub fn resource_path(mut self, path: impl Into<String>) -> Self {
        self.action.resource_path = Some(path.into());
        self
    }

    /// Add a GET parameter
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.action.parameters.insert(key, value);
        self
    }

    /// Replace all GET parameters
    pub fn parameters(mut self, parameters: Fields) -> Self {
        self.action.parameters = parameters;
        self
    }

    /// Set the POST payload
    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.action.data = Some(data.into());
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.action.callbacks.on_success = Some(Arc::new(f));
        self
    }

    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.action.callbacks.on_failure = Some(Arc::new(f));
        self
    }

    pub fn on_validation_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.action.callbacks.on_validation_failure = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&FrameworkResponse) + Send + Sync + 'static,
    {
        self.action.callbacks.on_error = Some(Arc::new(f));
        self
    }

    pub fn on_non_framework_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&NonFrameworkError) + Send + Sync + 'static,
    {
        self.action.callbacks.on_non_framework_error = Some(Arc::new(f));
        self
    }

    pub fn always<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.action.callbacks.always = Some(Arc::new(f));
        self
    }

    /// Replace all callbacks
    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.action.callbacks = callbacks;
        self
    }

    /// Attach a cancellation token
    pub fn signal(mut self, token: CancellationToken) -> Self {
        self.action.signal = Some(token);
        self
    }

    /// Validate and build the action
    pub fn build(self) -> Result<Action> {
        let action = self.action;

        if action.name.trim().is_empty() {
            return Err(Error::invalid_action("action name is empty"));
        }
        if let Some(c) = action.name.chars().find(|c| matches!(c, '/' | '?' | '#')) {
            return Err(Error::invalid_action(format!(
                "action name '{}' contains '{}'",
                action.name, c
            )));
        }
        if let Some(ref path) = action.resource_path {
            if path.trim().is_empty() {
                return Err(Error::invalid_action("resource path is empty"));
            }
        }

        Ok(action)
    }
}
