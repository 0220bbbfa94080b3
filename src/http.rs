// HTTP request and response model types
//
// The transport is external to this crate: whatever server loop is in use
// maps its native request onto `HttpRequest`, calls the file server, and
// writes the returned `HttpResponse` back out.

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP request wrapper
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    /// Request path, percent-decoded, without the query string.
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: String::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Header lookup, trying the canonical name then the all-lowercase form.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers
            .get(name)
            .or_else(|| self.headers.get(&name.to_lowercase()))
    }

    pub fn is_head(&self) -> bool {
        self.method.eq_ignore_ascii_case("HEAD")
    }
}

/// HTTP response wrapper
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Response body. `Bytes` so precomputed variants are shared, not copied.
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn not_modified() -> Self {
        Self::new(304)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Permanent redirect to `location`.
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        Self::new(301).with_header("Location", location)
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header_lookup() {
        let request = HttpRequest::new("GET", "/").with_header("accept-encoding", "gzip");
        assert_eq!(
            request.header("Accept-Encoding"),
            Some(&"gzip".to_string())
        );
        assert_eq!(request.header("Range"), None);
    }

    #[test]
    fn test_request_is_head() {
        assert!(HttpRequest::new("HEAD", "/").is_head());
        assert!(HttpRequest::new("head", "/").is_head());
        assert!(!HttpRequest::new("GET", "/").is_head());
    }

    #[test]
    fn test_response_builders() {
        let response = HttpResponse::ok()
            .with_header("Content-Type", "text/plain")
            .with_body(&b"hello"[..]);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"text/plain".to_string())
        );
        assert_eq!(response.body, &b"hello"[..]);
    }

    #[test]
    fn test_moved_permanently() {
        let response = HttpResponse::moved_permanently("./");
        assert_eq!(response.status, 301);
        assert_eq!(response.headers.get("Location"), Some(&"./".to_string()));
    }
}
