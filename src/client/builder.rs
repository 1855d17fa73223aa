// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request builder: action descriptor to transport-ready parameters

use std::sync::Arc;

use reqwest::Method;

use super::action::{Action, FieldValue, Fields, Payload};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers::HeaderRegistry;
use crate::http::{CredentialsMode, FetchOptions, FetchParameters, FormData};

/// Action URL for a bundle
pub fn prepare_url(bundle: &str, action: &Action) -> String {
    match action.resource_path() {
        Some(path) => format!("{}.{}.{}.action", path, bundle, action.name()),
        None => format!("/apps/{}/bin/{}.action", bundle, action.name()),
    }
}

/// Query string for GET parameters, including the leading `?`.
///
/// Absent values are skipped and lists expand to one pair per item. Keys
/// and list items are written as given; scalar values are URI-component
/// encoded. Empty when nothing remains.
pub fn build_query_string(parameters: &Fields) -> String {
    let pairs: Vec<String> = parameters
        .iter()
        .filter_map(|(key, value)| match value {
            FieldValue::Absent => None,
            FieldValue::Bool(b) => Some(format!("{}={}", key, b)),
            FieldValue::Text(text) => Some(format!("{}={}", key, urlencoding::encode(text))),
            FieldValue::List(items) if items.is_empty() => None,
            FieldValue::List(items) => Some(
                items
                    .iter()
                    .map(|item| format!("{}={}", key, item))
                    .collect::<Vec<_>>()
                    .join("&"),
            ),
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Form body for a POST payload
pub fn build_form_data(payload: &Payload) -> FormData {
    match payload {
        Payload::Form(form) => form.clone(),
        Payload::Fields(fields) => {
            let mut form = FormData::new();
            for (key, value) in fields.iter() {
                match value {
                    FieldValue::Absent => {}
                    FieldValue::Bool(b) => form.append(key, b.to_string()),
                    FieldValue::Text(text) => form.append(key, text.as_str()),
                    FieldValue::List(items) => {
                        for item in items {
                            form.append(key, item.as_str());
                        }
                    }
                }
            }
            form
        }
    }
}

/// Credentials policy for the calling origin
pub fn credentials_mode(config: &ClientConfig) -> CredentialsMode {
    if config.is_development_origin() {
        CredentialsMode::Include
    } else {
        CredentialsMode::SameOrigin
    }
}

/// Builds [`FetchParameters`] for the actions of one bundle
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    bundle: String,
    registry: Arc<HeaderRegistry>,
    config: Arc<ClientConfig>,
}

impl RequestBuilder {
    pub fn new(bundle: impl Into<String>, registry: Arc<HeaderRegistry>, config: Arc<ClientConfig>) -> Self {
        Self {
            bundle: bundle.into(),
            registry,
            config,
        }
    }

    /// Bundle the actions belong to
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Parameters for a GET call; a body payload is ignored with a warning
    pub async fn build_get(&self, action: &Action) -> FetchParameters {
        if action.data().is_some() {
            tracing::warn!(
                action = action.name(),
                "Ignoring request body: GET does not send data in the request body"
            );
        }

        let url = prepare_url(&self.bundle, action) + &build_query_string(action.parameters());
        FetchParameters::new(url, self.options(Method::GET, action).await)
    }

    /// Parameters for a POST call
    pub async fn build_post(&self, action: &Action) -> FetchParameters {
        let mut options = self.options(Method::POST, action).await;
        options.body = action.data().map(build_form_data);
        FetchParameters::new(prepare_url(&self.bundle, action), options)
    }

    /// Parameters for `method`, which must be GET or POST
    pub async fn build(&self, action: &Action, method: &Method) -> Result<FetchParameters> {
        match *method {
            Method::GET => Ok(self.build_get(action).await),
            Method::POST => Ok(self.build_post(action).await),
            _ => Err(Error::invalid_action(format!(
                "unsupported method {} for action '{}'",
                method,
                action.name()
            ))),
        }
    }

    async fn options(&self, method: Method, action: &Action) -> FetchOptions {
        let headers = self.registry.compute_headers(&method).await;
        FetchOptions {
            headers,
            credentials: credentials_mode(&self.config),
            signal: action.signal().cloned(),
            ..FetchOptions::new(method)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::StaticHeader;
    use crate::http::FormValue;
    use tokio_util::sync::CancellationToken;

    fn builder_for(origin: &str) -> RequestBuilder {
        RequestBuilder::new(
            "test-bundle",
            Arc::new(HeaderRegistry::with_defaults()),
            Arc::new(ClientConfig::for_origin(origin).unwrap()),
        )
    }

    fn builder() -> RequestBuilder {
        builder_for("https://cms.example.com")
    }

    #[test]
    fn test_prepare_url() {
        let plain = Action::named("hello").unwrap();
        assert_eq!(prepare_url("my-bundle", &plain), "/apps/my-bundle/bin/hello.action");

        let addressed = Action::builder("hello")
            .resource_path("/content/site/page")
            .build()
            .unwrap();
        assert_eq!(
            prepare_url("my-bundle", &addressed),
            "/content/site/page.my-bundle.hello.action"
        );
    }

    #[test]
    fn test_query_string_skips_absent_and_expands_lists() {
        let params = Fields::new()
            .field("a", 1)
            .field("b", vec![2, 3])
            .field("c", None::<String>);
        assert_eq!(build_query_string(&params), "?a=1&b=2&b=3");
    }

    #[test]
    fn test_query_string_encodes_scalar_values_only() {
        let params = Fields::new()
            .field("q", "a b&c=d")
            .field("flag", false)
            .field("raw", vec!["x y"])
            .field("empty", Vec::<String>::new());
        assert_eq!(build_query_string(&params), "?q=a%20b%26c%3Dd&flag=false&raw=x y");
    }

    #[test]
    fn test_query_string_empty() {
        assert_eq!(build_query_string(&Fields::new()), "");
        assert_eq!(build_query_string(&Fields::new().field("c", None::<i32>)), "");
    }

    #[test]
    fn test_form_data_from_fields() {
        let payload = Payload::Fields(
            Fields::new()
                .field("name", "Janusz")
                .field("admin", true)
                .field("tags", vec!["a", "b"])
                .field("note", None::<String>),
        );
        let form = build_form_data(&payload);

        assert_eq!(form.len(), 4);
        assert_eq!(form.get("name").and_then(FormValue::as_text), Some("Janusz"));
        assert_eq!(form.get("admin").and_then(FormValue::as_text), Some("true"));
        let tags: Vec<_> = form.get_all("tags").into_iter().filter_map(FormValue::as_text).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert!(form.get("note").is_none());
    }

    #[test]
    fn test_form_data_passthrough() {
        let form = FormData::new().with("x", "1").with("x", "2");
        assert_eq!(build_form_data(&Payload::Form(form.clone())), form);
    }

    #[test]
    fn test_credentials_mode() {
        let dev = ClientConfig::for_origin("http://localhost:4502").unwrap();
        let prod = ClientConfig::for_origin("https://cms.example.com").unwrap();
        assert_eq!(credentials_mode(&dev), CredentialsMode::Include);
        assert_eq!(credentials_mode(&prod), CredentialsMode::SameOrigin);
    }

    #[tokio::test]
    async fn test_build_get() {
        let token = CancellationToken::new();
        let action = Action::builder("list")
            .parameter("page", 2)
            .data(Fields::new().field("ignored", "yes"))
            .signal(token)
            .build()
            .unwrap();

        let params = builder().build_get(&action).await;
        assert_eq!(params.url, "/apps/test-bundle/bin/list.action?page=2");
        assert_eq!(params.method(), &Method::GET);
        assert!(params.options.body.is_none());
        assert_eq!(params.options.header_value("accept"), Some("application/json"));
        assert_eq!(params.options.credentials, CredentialsMode::SameOrigin);
        assert!(params.options.signal.is_some());
    }

    #[tokio::test]
    async fn test_build_post_is_idempotent() {
        let builder = builder_for("http://localhost:8080");
        builder
            .registry
            .register("CSRF-Token", vec![Method::POST], StaticHeader::new("t0k3n"))
            .unwrap();
        let action = Action::builder("hello")
            .data(Fields::new().field("name", "Janusz").field("tags", vec!["a", "b"]))
            .build()
            .unwrap();

        let first = builder.build_post(&action).await;
        let second = builder.build_post(&action).await;

        assert_eq!(first, second);
        assert_eq!(first.url, "/apps/test-bundle/bin/hello.action");
        assert_eq!(first.options.header_value("csrf-token"), Some("t0k3n"));
        assert_eq!(first.options.credentials, CredentialsMode::Include);
        assert_eq!(first.options.body.as_ref().map(FormData::len), Some(3));
    }

    #[tokio::test]
    async fn test_build_post_without_payload_has_no_body() {
        let params = builder().build_post(&Action::named("ping").unwrap()).await;
        assert!(params.options.body.is_none());
    }

    #[tokio::test]
    async fn test_build_rejects_other_methods() {
        let action = Action::named("hello").unwrap();
        assert!(builder().build(&action, &Method::POST).await.is_ok());
        let err = builder().build(&action, &Method::PUT).await.unwrap_err();
        assert!(matches!(err, Error::InvalidAction(_)));
    }
}
