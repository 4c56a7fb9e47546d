//! The HTTP access layer.
//!
//! Every outgoing call goes through [`ApiClient::call`], which injects the
//! bearer token, issues the request and folds every outcome, including
//! transport failures, into an [`Envelope`]. It never returns an error.

use crate::cancel::CancelSignal;
use crate::endpoints::{join_url, Endpoint, HttpMethod};
use crate::envelope::{Envelope, StatusCode};
use crate::session::TokenProvider;
use agrimarket_common::{create_client, AgriError};
use agrimarket_config::ApiConfig;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

const APPLICATION_JSON: &str = "application/json";

/// Request payload. Multipart bodies are built by the caller; the access
/// layer only lets reqwest set the matching content type.
#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    Multipart(Form),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<Form> for RequestBody {
    fn from(form: Form) -> Self {
        RequestBody::Multipart(form)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with its own connection pool configured from `config`.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, AgriError> {
        let http = create_client(config.timeout_secs, config.follow_redirects)?;
        Ok(Self::with_client(http, config.base_url.clone(), tokens))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through, anything else is joined to the base URL.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            join_url(&self.base_url, url)
        }
    }

    /// Issues one request and returns the backend envelope.
    ///
    /// `body` is only sent for POST and PUT. Failures never escape: a
    /// response body is returned as-is whatever the HTTP status, and
    /// transport errors become `{success: false, error}`.
    pub async fn call(&self, url: &str, method: HttpMethod, body: Option<RequestBody>) -> Envelope {
        let target = self.resolve(url);
        debug!(%method, url = %target, "issuing request");

        let mut request = self
            .http
            .request(method.into(), &target)
            .header(ACCEPT, APPLICATION_JSON);

        if let Some(token) = self.tokens.bearer_token() {
            request = request.bearer_auth(token);
        }

        request = match body.filter(|_| method.allows_body()) {
            Some(RequestBody::Json(payload)) => request.json(&payload),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request.header(CONTENT_TYPE, APPLICATION_JSON),
        };

        let envelope = match request.send().await {
            Ok(response) => read_envelope(response).await,
            Err(err) => {
                error!(%method, url = %target, error = %err, "request failed");
                Envelope::failure(err.to_string())
            }
        };

        if envelope.should_log_failure() {
            error!(
                %method,
                url = %target,
                status_code = %envelope.status_code.as_ref().map(ToString::to_string).unwrap_or_default(),
                error = %envelope.failure_message(),
                "backend reported failure"
            );
        }

        envelope
    }

    pub async fn call_endpoint(&self, endpoint: Endpoint, body: Option<RequestBody>) -> Envelope {
        self.call(endpoint.path, endpoint.method, body).await
    }

    pub async fn call_endpoint_with_query<V: Serialize>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, Option<V>)],
        body: Option<RequestBody>,
    ) -> Envelope {
        let url = endpoint.url_with_query(&self.base_url, query);
        self.call(&url, endpoint.method, body).await
    }

    /// Like [`ApiClient::call`], but abandoned when `signal` fires first.
    pub async fn call_cancellable(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        signal: &CancelSignal,
    ) -> Option<Envelope> {
        signal.guard(self.call(url, method, body)).await
    }
}

async fn read_envelope(response: Response) -> Envelope {
    let status = response.status();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(status = status.as_u16(), error = %err, "failed to read response body");
            return Envelope::failure(err.to_string());
        }
    };

    if !bytes.is_empty() {
        match serde_json::from_slice::<Value>(&bytes) {
            // An object is the envelope, whatever the HTTP status says.
            Ok(Value::Object(body)) => return Envelope::from_body(body),
            Ok(other) if status.is_success() => return Envelope::ok(other),
            Ok(other) => {
                return Envelope {
                    data: Some(other),
                    ..http_failure(status)
                };
            }
            Err(err) => warn!(status = status.as_u16(), error = %err, "response body is not JSON"),
        }
    }

    if status.is_success() {
        Envelope {
            success: true,
            ..Envelope::default()
        }
    } else {
        http_failure(status)
    }
}

fn http_failure(status: reqwest::StatusCode) -> Envelope {
    Envelope {
        error: Some(format!("HTTP {}", status.as_u16())),
        status_code: Some(StatusCode::Number(i64::from(status.as_u16()))),
        ..Envelope::default()
    }
}
