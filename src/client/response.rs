// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Framework response envelope and the non-framework error taxonomy

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthContextData;
use crate::error::{Error, Result};
use crate::http::Response;

/// Status of a framework response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failure,
    ValidationFailure,
    Error,
}

impl Status {
    /// All statuses a valid framework response may carry
    pub const ALL: [Status; 4] = [
        Status::Success,
        Status::Failure,
        Status::ValidationFailure,
        Status::Error,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::ValidationFailure => "VALIDATION_FAILURE",
            Status::Error => "ERROR",
        }
    }

    /// Parse a wire name; anything else is not a framework status
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a VALIDATION_FAILURE entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Model property that failed validation
    pub path: String,
    #[serde(rename = "invalidValue", default)]
    pub invalid_value: Option<Value>,
    pub message: String,
}

/// A response that satisfied the framework contract
///
/// Once constructed it is shared read-only (`Arc<FrameworkResponse>`)
/// between the auth store update and the selected handler.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkResponse {
    pub status: Status,
    pub auth_context: AuthContextData,
    pub message: Option<String>,
    pub message_details: Option<String>,
    pub entity: Option<Value>,
    payload: Value,
}

impl FrameworkResponse {
    /// Check the framework contract and extract the envelope.
    ///
    /// Valid iff `status` is one of the four statuses and
    /// `authContext.userId` is a non-empty string. The payload is handed
    /// back unchanged when it is not valid.
    pub fn from_value(payload: Value) -> std::result::Result<Self, Value> {
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .and_then(Status::parse);
        let user_id = payload
            .get("authContext")
            .and_then(|ctx| ctx.get("userId"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty());

        let (status, user_id) = match (status, user_id) {
            (Some(status), Some(user_id)) => (status, user_id.to_string()),
            _ => return Err(payload),
        };

        let text = |key: &str| payload.get(key).and_then(Value::as_str).map(String::from);

        Ok(Self {
            status,
            auth_context: AuthContextData::new(user_id),
            message: text("message"),
            message_details: text("messageDetails"),
            entity: payload.get("entity").filter(|e| !e.is_null()).cloned(),
            payload,
        })
    }

    /// The full JSON payload as received
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Deserialize the entity into a typed value
    pub fn entity_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.entity
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// Validation errors of a VALIDATION_FAILURE response; empty otherwise
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        if self.status != Status::ValidationFailure {
            return Vec::new();
        }
        self.entity_as::<Vec<ValidationError>>()
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Kind of a non-framework outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonFrameworkKind {
    /// Network failure, timeout or cancellation
    Transport,
    /// Content type is not JSON
    NotJson,
    /// Content type says JSON but the body does not parse
    Malformed,
    /// Valid JSON missing the framework fields
    Invalid,
}

/// Anything that could not be classified into the status taxonomy
#[derive(Debug)]
pub enum NonFrameworkError {
    Transport(Error),
    NotJson(Response),
    Malformed {
        response: Response,
        error: serde_json::Error,
    },
    Invalid {
        response: Response,
        payload: Value,
    },
}

impl NonFrameworkError {
    pub fn kind(&self) -> NonFrameworkKind {
        match self {
            NonFrameworkError::Transport(_) => NonFrameworkKind::Transport,
            NonFrameworkError::NotJson(_) => NonFrameworkKind::NotJson,
            NonFrameworkError::Malformed { .. } => NonFrameworkKind::Malformed,
            NonFrameworkError::Invalid { .. } => NonFrameworkKind::Invalid,
        }
    }

    /// The HTTP response, when the transport produced one
    pub fn response(&self) -> Option<&Response> {
        match self {
            NonFrameworkError::Transport(_) => None,
            NonFrameworkError::NotJson(response)
            | NonFrameworkError::Malformed { response, .. }
            | NonFrameworkError::Invalid { response, .. } => Some(response),
        }
    }

    /// HTTP status code, when the transport produced a response
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(Response::status_code)
    }

    /// Parsed payload of an `Invalid` response
    pub fn payload(&self) -> Option<&Value> {
        match self {
            NonFrameworkError::Invalid { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Whether the request was cancelled by its token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NonFrameworkError::Transport(e) if e.is_cancelled())
    }

    /// Whether the server redirected, e.g. to a login page
    pub fn is_redirected(&self) -> bool {
        self.response().map_or(false, |r| r.redirected)
    }
}

impl fmt::Display for NonFrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonFrameworkError::Transport(e) => write!(f, "transport failure: {}", e),
            NonFrameworkError::NotJson(r) => write!(
                f,
                "non-JSON response {} ({})",
                r.status,
                r.content_type().unwrap_or("no content type")
            ),
            NonFrameworkError::Malformed { response, error } => {
                write!(f, "malformed JSON in {} response: {}", response.status, error)
            }
            NonFrameworkError::Invalid { response, .. } => {
                write!(f, "JSON {} response is not a framework response", response.status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_success() {
        let resp = FrameworkResponse::from_value(json!({
            "status": "SUCCESS",
            "message": "Hello Test",
            "authContext": {"userId": "bob"}
        }))
        .unwrap();

        assert_eq!(resp.status, Status::Success);
        assert_eq!(resp.message.as_deref(), Some("Hello Test"));
        assert_eq!(resp.auth_context.user_id, "bob");
        assert!(resp.entity.is_none());
    }

    #[test]
    fn test_missing_auth_context_is_invalid() {
        let payload = json!({"status": "SUCCESS", "message": "Hello"});
        let back = FrameworkResponse::from_value(payload.clone()).unwrap_err();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_empty_user_id_is_invalid() {
        let payload = json!({"status": "SUCCESS", "authContext": {"userId": ""}});
        assert!(FrameworkResponse::from_value(payload).is_err());
    }

    #[test]
    fn test_unknown_status_is_invalid() {
        let payload = json!({"status": "FREE_FORM_RESPONSE", "authContext": {"userId": "bob"}});
        assert!(FrameworkResponse::from_value(payload).is_err());
        assert!(FrameworkResponse::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let resp = FrameworkResponse::from_value(json!({
            "status": "VALIDATION_FAILURE",
            "message": "Validation failed",
            "entity": [{"path": "name", "message": "Name is not valid"}],
            "authContext": {"userId": "anonymous"}
        }))
        .unwrap();

        let errors = resp.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "name");
        assert_eq!(errors[0].message, "Name is not valid");
        assert!(errors[0].invalid_value.is_none());
    }

    #[test]
    fn test_status_wire_names() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, json!(status.as_str()));
        }
        assert_eq!(Status::parse("success"), None);
    }
}
