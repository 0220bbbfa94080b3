//! Per-resource content negotiation.
//!
//! Each indexed file becomes an immutable [`StaticResource`]: raw bytes,
//! metadata, and the precomputed variant map. Responding is a pure function
//! of the resource and the request, so resources can be tested in isolation
//! and shared freely across request threads.

use crate::accept::AcceptEncoding;
use crate::content::serve_content;
use crate::http::{HttpRequest, HttpResponse};
use bytes::Bytes;
use std::collections::HashMap;
use std::time::SystemTime;

/// One indexed file, immutable once built.
#[derive(Debug, Clone)]
pub struct StaticResource {
    /// Normalized URL path the resource is registered under.
    pub url_path: String,
    /// Content type, detected at index time.
    pub content_type: String,
    /// Raw file bytes.
    pub body: Bytes,
    /// File modification time at index time.
    pub modified: SystemTime,
    /// Precomputed variants: algorithm name → compressed bytes. Empty when
    /// the file did not qualify for precompression.
    pub variants: HashMap<String, Bytes>,
    /// Whether the indexer attempted precompression for this file.
    pub compressible: bool,
}

impl StaticResource {
    /// Produce the response for `request`.
    ///
    /// A `Range` header bypasses negotiation entirely: byte ranges address
    /// the uncompressed representation, so compressed variants are never
    /// range-served. Otherwise the first entry of the client's preference
    /// order with a matching variant wins; the weight only orders candidates
    /// and never disqualifies them, so `gzip;q=0` still selects gzip when it
    /// is the sole offer — the header's literal refusal semantics are not
    /// applied.
    pub fn respond(&self, request: &HttpRequest) -> HttpResponse {
        if !self.variants.is_empty() && request.header("Range").is_none() {
            if let Some((algorithm, compressed)) = self.negotiate(request) {
                return self.compressed_response(request, algorithm, compressed);
            }
        }

        serve_content(request, &self.content_type, self.modified, &self.body)
    }

    /// Scan the preference order, highest weight first, for the first
    /// algorithm present in the variant map.
    fn negotiate(&self, request: &HttpRequest) -> Option<(&str, &Bytes)> {
        let accept = match request.header("Accept-Encoding") {
            Some(value) => AcceptEncoding::parse(value),
            None => AcceptEncoding::default(),
        };

        for preference in &accept.preferences {
            if let Some((name, compressed)) = self.variants.get_key_value(&preference.algorithm) {
                return Some((name.as_str(), compressed));
            }
        }
        None
    }

    fn compressed_response(
        &self,
        request: &HttpRequest,
        algorithm: &str,
        compressed: &Bytes,
    ) -> HttpResponse {
        let mut response = HttpResponse::ok()
            .with_header("Accept-Ranges", "bytes")
            .with_header("Last-Modified", httpdate::fmt_http_date(self.modified))
            .with_header("Content-Encoding", algorithm)
            .with_header("Content-Type", self.content_type.as_str())
            .with_header("Content-Length", compressed.len().to_string());
        if !request.is_head() {
            response.body = compressed.clone();
        }
        response
    }
}
