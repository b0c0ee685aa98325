//! HTTP client for the Malaffi CRM backend.
//!
//! # Design
//! `ApiClient` owns its configuration, its default headers and a
//! `Transport`. A call is split into three steps:
//! - `build_request` merges headers, encodes the body and produces an
//!   `HttpRequest` (pure);
//! - the transport performs the round-trip and enforces the deadline;
//! - `parse_response` decodes the body and classifies the outcome (pure).
//!
//! Default headers can only change through `&mut self`, and each request
//! copies them when it is built, so a token change never leaks into a
//! request that has already started. There is no global instance: callers
//! construct a client and pass it around, cloning it when they need an
//! independent set of headers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::ApiResponse;

const AUTHORIZATION: &str = "Authorization";

/// Request payload.
///
/// `Raw` strings are sent as-is; `Json` values are serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Raw(String),
}

impl Body {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| ApiError::Serialization {
                message: format!("Failed to serialize request body: {e}"),
            })
    }

    fn encode(&self) -> String {
        match self {
            Body::Json(value) => value.to_string(),
            Body::Raw(raw) => raw.clone(),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(raw: String) -> Self {
        Body::Raw(raw)
    }
}

impl From<&str> for Body {
    fn from(raw: &str) -> Self {
        Body::Raw(raw.to_string())
    }
}

/// Per-call options for `ApiClient::request`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<Body>,
    /// Overrides the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.merge(&headers);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    config: ClientConfig,
    default_headers: Headers,
    transport: T,
}

impl ApiClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }
}

impl<T> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let default_headers = [("Content-Type", "application/json"), ("Accept", "application/json")]
            .into_iter()
            .collect();
        Self {
            config,
            default_headers,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `Authorization: Bearer <token>` on every later request.
    pub fn set_auth_token(&mut self, token: &str) {
        self.default_headers
            .insert(AUTHORIZATION, format!("Bearer {token}"));
    }

    pub fn remove_auth_token(&mut self) {
        self.default_headers.remove(AUTHORIZATION);
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.set_auth_token(token);
        self
    }

    /// Produce the request for `endpoint` without touching the network.
    ///
    /// The URL is the base URL and `endpoint` concatenated as-is. A body is
    /// attached for every method except GET.
    pub fn build_request(&self, endpoint: &str, options: &RequestOptions) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        headers.merge(&options.headers);

        let body = match (&options.body, options.method) {
            (Some(body), method) if method != HttpMethod::Get => Some(body.encode()),
            _ => None,
        };

        HttpRequest {
            method: options.method,
            url: format!("{}{endpoint}", self.config.base_url),
            headers,
            body,
            timeout: options.timeout.unwrap_or(self.config.timeout),
        }
    }

    /// Decode a response into the envelope, or classify it as a failure.
    ///
    /// The body is decoded before the status is inspected, but the status is
    /// kept on every failure that follows, decode failures included.
    pub fn parse_response<R: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<R>, ApiError> {
        let (status, value) = decode_body(&response)?;
        into_envelope(status, value)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn request<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<R>, ApiError> {
        let request = self.build_request(endpoint, &options);
        self.log_outgoing(&request);

        let result = self
            .transport
            .execute(&request)
            .map_err(ApiError::from)
            .and_then(|response| {
                let (status, value) = decode_body(&response)?;
                let decoded = self.config.enable_logging.then(|| value.to_string());
                let envelope = into_envelope(status, value)?;
                if let Some(body) = decoded {
                    tracing::info!(
                        method = %request.method,
                        url = %request.url,
                        body = %body,
                        "request succeeded"
                    );
                }
                Ok(envelope)
            });

        if let Err(err) = &result {
            self.log_failure(&request, err);
        }
        result
    }

    pub fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: Option<Headers>,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.request(endpoint, with_headers(RequestOptions::new(HttpMethod::Get), headers))
    }

    pub fn post<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Body>,
        headers: Option<Headers>,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.request(endpoint, with_body(HttpMethod::Post, body, headers))
    }

    pub fn put<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Body>,
        headers: Option<Headers>,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.request(endpoint, with_body(HttpMethod::Put, body, headers))
    }

    pub fn patch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Body>,
        headers: Option<Headers>,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.request(endpoint, with_body(HttpMethod::Patch, body, headers))
    }

    pub fn delete<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: Option<Headers>,
    ) -> Result<ApiResponse<R>, ApiError> {
        self.request(endpoint, with_headers(RequestOptions::new(HttpMethod::Delete), headers))
    }

    fn log_outgoing(&self, request: &HttpRequest) {
        if !self.config.enable_logging {
            return;
        }
        tracing::info!(
            method = %request.method,
            url = %request.url,
            headers = ?redacted(&request.headers),
            body = request.body.as_deref().unwrap_or(""),
            "sending request"
        );
    }

    fn log_failure(&self, request: &HttpRequest, err: &ApiError) {
        if !self.config.enable_logging {
            return;
        }
        tracing::error!(
            method = %request.method,
            url = %request.url,
            kind = ?err.kind(),
            status = ?err.status(),
            code = ?err.code(),
            "request failed: {err}"
        );
    }
}

/// Parse the body as JSON, then fail with the backend's error if the status
/// is not 2xx.
fn decode_body(response: &HttpResponse) -> Result<(u16, Value), ApiError> {
    let status = response.status;
    let value: Value =
        serde_json::from_str(&response.body).map_err(|e| ApiError::decode(status, &e))?;
    if !response.is_success() {
        return Err(ApiError::from_error_body(status, &value));
    }
    Ok((status, value))
}

fn into_envelope<R: DeserializeOwned>(status: u16, value: Value) -> Result<ApiResponse<R>, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(status, &e))
}

fn with_headers(options: RequestOptions, headers: Option<Headers>) -> RequestOptions {
    match headers {
        Some(headers) => options.headers(headers),
        None => options,
    }
}

fn with_body(method: HttpMethod, body: Option<Body>, headers: Option<Headers>) -> RequestOptions {
    let mut options = with_headers(RequestOptions::new(method), headers);
    options.body = body;
    options
}

/// Header pairs for logging, with the bearer credential masked.
fn redacted(headers: &Headers) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if name.eq_ignore_ascii_case(AUTHORIZATION) {
                "Bearer [redacted]".to_string()
            } else {
                value.to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}
