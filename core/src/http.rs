//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data.
//! `ApiClient::build_request` produces an `HttpRequest` and
//! `ApiClient::parse_response` consumes an `HttpResponse`; the round-trip in
//! between belongs to a `Transport`. Keeping the two halves pure makes the
//! header merging and failure classification testable without a socket.

use std::fmt;
use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header list with case-insensitive keys.
///
/// Inserting a name that already exists (in any casing) replaces the old
/// entry in place, so merged headers keep the position of the default while
/// taking the caller's spelling and value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                let (_, old) = std::mem::replace(&mut self.0[idx], (name, value));
                Some(old)
            }
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.0.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.0[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Overlay `other` onto `self`: keys present in `other` win.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// An HTTP request described as plain data.
///
/// `headers` is a snapshot taken when the request was built; later changes
/// to the client's default headers do not reach it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub timeout: Duration,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively_in_place() {
        let mut headers: Headers = [("Content-Type", "application/json"), ("Accept", "application/json")]
            .into_iter()
            .collect();
        let old = headers.insert("content-type", "text/plain");
        assert_eq!(old.as_deref(), Some("application/json"));
        assert_eq!(headers.len(), 2);
        let first = headers.iter().next().unwrap();
        assert_eq!(first, ("content-type", "text/plain"));
    }

    #[test]
    fn remove_absent_header_is_noop() {
        let mut headers = Headers::new();
        headers.insert("Accept", "application/json");
        assert!(headers.remove("Authorization").is_none());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn merge_keeps_defaults_not_overridden() {
        let mut defaults: Headers = [("Content-Type", "application/json"), ("Accept", "application/json")]
            .into_iter()
            .collect();
        let overrides: Headers = [("Accept", "text/csv"), ("X-Trace", "1")].into_iter().collect();
        defaults.merge(&overrides);
        assert_eq!(defaults.get("content-type"), Some("application/json"));
        assert_eq!(defaults.get("ACCEPT"), Some("text/csv"));
        assert_eq!(defaults.get("x-trace"), Some("1"));
        assert_eq!(defaults.len(), 3);
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }
}
