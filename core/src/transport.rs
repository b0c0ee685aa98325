//! Executes `HttpRequest` values against the network.
//!
//! `ApiClient` only talks to the `Transport` trait. The default
//! implementation is a thin layer over a `ureq::Agent`; tests substitute
//! their own to script responses.

use std::time::Duration;

use thiserror::Error;

use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Failure to obtain any response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),
}

/// Performs one HTTP round-trip.
///
/// Implementations must enforce `request.timeout` themselves and release the
/// connection when it expires. Non-2xx statuses are returned as data, not as
/// errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// The agent is configured to hand back 4xx/5xx responses instead of
/// erroring, and each call sets a global deadline covering connect, send and
/// body read. When the deadline passes ureq closes the socket.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let deadline = Some(request.timeout);
        let url = request.url.as_str();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &request.headers)
                .config()
                .timeout_global(deadline)
                .build()
                .call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), &request.headers)
                .config()
                .timeout_global(deadline)
                .build()
                .call(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(url).force_send_body(), &request.headers)
                    .config()
                    .timeout_global(deadline)
                    .build()
                    .send(body.as_bytes())
            }
            (method, body) => {
                let builder = match method {
                    HttpMethod::Post => self.agent.post(url),
                    HttpMethod::Put => self.agent.put(url),
                    _ => self.agent.patch(url),
                };
                let builder = with_headers(builder, &request.headers)
                    .config()
                    .timeout_global(deadline)
                    .build();
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|err| classify(err, request.timeout))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        // Unbounded, so oversized bodies still reach the parser with their status.
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|err| classify(err, request.timeout))?;

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }
    builder
}

fn classify(err: ureq::Error, timeout: Duration) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout(timeout),
        other => TransportError::Network(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_deadline() {
        let err = TransportError::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "Request timed out after 50ms");
    }

    #[test]
    fn connection_refused_is_a_network_error() {
        // Bind then drop to get a port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://127.0.0.1:{port}/groups"),
            headers: Headers::new(),
            body: None,
            timeout: Duration::from_secs(2),
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
    }
}
