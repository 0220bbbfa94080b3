//! Configuration for the file server.
//!
//! All knobs are explicit values handed to [`FileServer::build`]; there is
//! no package-level default state. The compressible-type list is kept sorted
//! so eligibility checks are a binary search.
//!
//! [`FileServer::build`]: crate::FileServer::build

use crate::http::{HttpRequest, HttpResponse};
use std::fmt;
use std::sync::Arc;

/// Shared request handler, used for the not-found fallback.
pub type Handler = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Configuration for building a [`FileServer`](crate::FileServer).
///
/// # Example
///
/// ```
/// use prestatic::FileServerConfig;
///
/// let config = FileServerConfig::new()
///     .with_compressible_content_length(2048)
///     .with_index_file("index.html");
/// assert!(config.is_compressible("text/html", 4096));
/// assert!(!config.is_compressible("image/png", 4096));
/// ```
#[derive(Clone)]
pub struct FileServerConfig {
    /// Content types eligible for precompression, sorted.
    pub compressible_content_types: Vec<String>,
    /// Minimum body length in bytes for precompression.
    pub compressible_content_length: usize,
    /// Index document name served for directory paths.
    pub index_file: String,
    /// Handler invoked for paths absent from the routing table.
    pub not_found: Handler,
}

impl FileServerConfig {
    /// Create a configuration with the default type list, a 1 KiB size
    /// threshold, `index.html` as the index document, and a plain-text 404
    /// fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the compressible content-type list. The list is sorted on the
    /// way in; membership tests are exact (no wildcards).
    pub fn with_compressible_content_types(mut self, mut types: Vec<String>) -> Self {
        types.sort();
        self.compressible_content_types = types;
        self
    }

    /// Set the minimum content length for precompression.
    pub fn with_compressible_content_length(mut self, length: usize) -> Self {
        self.compressible_content_length = length;
        self
    }

    /// Set the index document name.
    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    /// Set the handler for paths absent from the routing table.
    pub fn with_not_found(mut self, handler: Handler) -> Self {
        self.not_found = handler;
        self
    }

    /// Whether a file with this content type and length qualifies for
    /// precompression.
    pub fn is_compressible(&self, content_type: &str, length: usize) -> bool {
        length >= self.compressible_content_length
            && self
                .compressible_content_types
                .binary_search_by(|t| t.as_str().cmp(content_type))
                .is_ok()
    }
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            compressible_content_types: default_compressible_content_types(),
            compressible_content_length: 1024,
            index_file: "index.html".to_string(),
            not_found: Arc::new(default_not_found),
        }
    }
}

impl fmt::Debug for FileServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileServerConfig")
            .field(
                "compressible_content_types",
                &self.compressible_content_types,
            )
            .field(
                "compressible_content_length",
                &self.compressible_content_length,
            )
            .field("index_file", &self.index_file)
            .field("not_found", &"<handler>")
            .finish()
    }
}

/// Default content types eligible for precompression, sorted.
fn default_compressible_content_types() -> Vec<String> {
    [
        "application/atom+xml",
        "application/javascript",
        "application/json",
        "application/rss+xml",
        "application/x-javascript",
        "image/svg+xml",
        "text/css",
        "text/html",
        "text/javascript",
        "text/plain",
    ]
    .map(String::from)
    .to_vec()
}

/// Stock not-found responder: plain-text 404.
fn default_not_found(_request: &HttpRequest) -> HttpResponse {
    HttpResponse::not_found()
        .with_header("Content-Type", "text/plain; charset=utf-8")
        .with_header("X-Content-Type-Options", "nosniff")
        .with_body(&b"404 page not found\n"[..])
}
