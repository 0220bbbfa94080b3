//! Conditional and byte-range content serving.
//!
//! This is the uncompressed fallback path: whenever negotiation picks no
//! precomputed variant (or a `Range` header suppresses negotiation), the
//! resource's raw body is served through [`serve_content`], which handles:
//!
//! - `If-None-Match` / `If-Modified-Since` conditional GETs (304)
//! - single byte ranges (`206 Partial Content` with `Content-Range`)
//! - unsatisfiable or malformed ranges (`416` with `Content-Range: bytes */len`)
//! - `ETag`, `Last-Modified`, `Accept-Ranges` and `Content-Length` headers
//! - HEAD body suppression
//!
//! Multiple ranges in one header are ignored and the full body is served;
//! the responder never emits `multipart/byteranges`.

use crate::http::{HttpRequest, HttpResponse};
use bytes::Bytes;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// ============================================================================
// Entity tags
// ============================================================================

/// Strong entity tag derived from content length and modification time,
/// quotes included.
pub(crate) fn entity_tag(length: usize, modified: SystemTime) -> String {
    let modified_unix = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("\"{:x}-{:x}\"", length, modified_unix)
}

/// Whether an `If-None-Match` header value matches the given entity tag.
///
/// Comparison is weak: a `W/` prefix on a listed tag is ignored, and `*`
/// matches any tag.
fn if_none_match_matches(header: &str, etag: &str) -> bool {
    if header.trim() == "*" {
        return true;
    }
    header.split(',').any(|candidate| {
        let candidate = candidate.trim();
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        candidate == etag
    })
}

/// Second-granularity `<=` comparison for `If-Modified-Since`: file mtimes
/// carry sub-second precision, HTTP dates do not.
fn not_modified_since(modified: SystemTime, since: SystemTime) -> bool {
    let truncate = |t: SystemTime| {
        t.duration_since(UNIX_EPOCH)
            .map(|d| Duration::from_secs(d.as_secs()))
            .unwrap_or_default()
    };
    truncate(modified) <= truncate(since)
}

// ============================================================================
// Byte ranges
// ============================================================================

/// A satisfiable byte range within a body of known length, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteRange {
    start: usize,
    end: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum RangeOutcome {
    /// A single satisfiable range.
    Single(ByteRange),
    /// Malformed or out-of-bounds: respond 416.
    Unsatisfiable,
    /// Multiple ranges requested: serve the full body instead.
    Ignored,
}

/// Parse a `Range` header value against a body of `length` bytes.
fn parse_range(header: &str, length: usize) -> RangeOutcome {
    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeOutcome::Unsatisfiable;
    };
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start, end)) = spec.trim().split_once('-') else {
        return RangeOutcome::Unsatisfiable;
    };

    if start.is_empty() {
        // Suffix form: the final `end` bytes.
        let Ok(suffix) = end.parse::<usize>() else {
            return RangeOutcome::Unsatisfiable;
        };
        if suffix == 0 || length == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Single(ByteRange {
            start: length.saturating_sub(suffix),
            end: length - 1,
        });
    }

    let Ok(start) = start.parse::<usize>() else {
        return RangeOutcome::Unsatisfiable;
    };
    if start >= length {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end.is_empty() {
        length - 1
    } else {
        match end.parse::<usize>() {
            Ok(end) if end >= start => end.min(length - 1),
            _ => return RangeOutcome::Unsatisfiable,
        }
    };

    RangeOutcome::Single(ByteRange { start, end })
}

// ============================================================================
// Responder
// ============================================================================

/// Serve `content` for `request`, honoring conditional and range headers.
///
/// The caller supplies the content type; everything else (`ETag`,
/// `Last-Modified`, `Accept-Ranges`, `Content-Length`, status) is derived
/// here. Bodies are sliced zero-copy out of the shared `content` buffer.
pub fn serve_content(
    request: &HttpRequest,
    content_type: &str,
    modified: SystemTime,
    content: &Bytes,
) -> HttpResponse {
    let etag = entity_tag(content.len(), modified);

    if is_not_modified(request, &etag, modified) {
        return HttpResponse::not_modified()
            .with_header("ETag", etag)
            .with_header("Last-Modified", httpdate::fmt_http_date(modified));
    }

    let mut response = HttpResponse::ok()
        .with_header("Content-Type", content_type)
        .with_header("ETag", etag)
        .with_header("Last-Modified", httpdate::fmt_http_date(modified))
        .with_header("Accept-Ranges", "bytes");

    let mut body = content.clone();

    if let Some(range_header) = request.header("Range") {
        match parse_range(range_header, content.len()) {
            RangeOutcome::Single(range) => {
                response.status = 206;
                response.headers.insert(
                    "Content-Range".to_string(),
                    format!("bytes {}-{}/{}", range.start, range.end, content.len()),
                );
                body = content.slice(range.start..=range.end);
            }
            RangeOutcome::Unsatisfiable => {
                let mut response = HttpResponse::new(416)
                    .with_header("Content-Type", "text/plain; charset=utf-8")
                    .with_header(
                        "Content-Range",
                        format!("bytes */{}", content.len()),
                    );
                if !request.is_head() {
                    response.body = Bytes::from_static(b"requested range not satisfiable\n");
                }
                return response;
            }
            RangeOutcome::Ignored => {}
        }
    }

    response
        .headers
        .insert("Content-Length".to_string(), body.len().to_string());
    if !request.is_head() {
        response.body = body;
    }
    response
}

/// Whether the request's conditional headers allow a `304 Not Modified`.
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; both apply to
/// GET and HEAD only.
fn is_not_modified(request: &HttpRequest, etag: &str, modified: SystemTime) -> bool {
    if !request.method.eq_ignore_ascii_case("GET") && !request.is_head() {
        return false;
    }

    if let Some(if_none_match) = request.header("If-None-Match") {
        return if_none_match_matches(if_none_match, etag);
    }

    if let Some(if_modified_since) = request.header("If-Modified-Since")
        && let Ok(since) = httpdate::parse_http_date(if_modified_since)
    {
        return not_modified_since(modified, since);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Bytes {
        Bytes::from_static(b"0123456789abcdef")
    }

    fn modified() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn test_full_body_headers() {
        let request = HttpRequest::new("GET", "/f.txt");
        let response = serve_content(&request, "text/plain", modified(), &body());

        assert_eq!(response.status, 200);
        assert_eq!(response.body, &b"0123456789abcdef"[..]);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"text/plain".to_string())
        );
        assert_eq!(
            response.headers.get("Content-Length"),
            Some(&"16".to_string())
        );
        assert_eq!(
            response.headers.get("Accept-Ranges"),
            Some(&"bytes".to_string())
        );
        assert!(response.headers.contains_key("ETag"));
        assert!(response.headers.contains_key("Last-Modified"));
    }

    #[test]
    fn test_head_suppresses_body() {
        let request = HttpRequest::new("HEAD", "/f.txt");
        let response = serve_content(&request, "text/plain", modified(), &body());

        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
        assert_eq!(
            response.headers.get("Content-Length"),
            Some(&"16".to_string())
        );
    }

    #[test]
    fn test_if_none_match_yields_304() {
        let content = body();
        let etag = entity_tag(content.len(), modified());
        let request = HttpRequest::new("GET", "/f.txt").with_header("If-None-Match", etag.clone());
        let response = serve_content(&request, "text/plain", modified(), &content);

        assert_eq!(response.status, 304);
        assert!(response.body.is_empty());
        assert_eq!(response.headers.get("ETag"), Some(&etag));
        assert!(!response.headers.contains_key("Content-Type"));
        assert!(!response.headers.contains_key("Content-Length"));
    }

    #[test]
    fn test_if_none_match_weak_and_wildcard() {
        let etag = "\"10-abc\"";
        assert!(if_none_match_matches("*", etag));
        assert!(if_none_match_matches("W/\"10-abc\"", etag));
        assert!(if_none_match_matches("\"other\", \"10-abc\"", etag));
        assert!(!if_none_match_matches("\"other\"", etag));
    }

    #[test]
    fn test_if_modified_since_yields_304() {
        let since = httpdate::fmt_http_date(modified());
        let request = HttpRequest::new("GET", "/f.txt").with_header("If-Modified-Since", since);
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 304);
    }

    #[test]
    fn test_if_modified_since_stale_serves_body() {
        let since = httpdate::fmt_http_date(modified() - Duration::from_secs(60));
        let request = HttpRequest::new("GET", "/f.txt").with_header("If-Modified-Since", since);
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_single_range() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=0-3");
        let response = serve_content(&request, "text/plain", modified(), &body());

        assert_eq!(response.status, 206);
        assert_eq!(response.body, &b"0123"[..]);
        assert_eq!(
            response.headers.get("Content-Range"),
            Some(&"bytes 0-3/16".to_string())
        );
        assert_eq!(
            response.headers.get("Content-Length"),
            Some(&"4".to_string())
        );
    }

    #[test]
    fn test_open_ended_range() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=10-");
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 206);
        assert_eq!(response.body, &b"abcdef"[..]);
        assert_eq!(
            response.headers.get("Content-Range"),
            Some(&"bytes 10-15/16".to_string())
        );
    }

    #[test]
    fn test_suffix_range() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=-4");
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 206);
        assert_eq!(response.body, &b"cdef"[..]);
    }

    #[test]
    fn test_range_end_clamped_to_length() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=8-999");
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 206);
        assert_eq!(
            response.headers.get("Content-Range"),
            Some(&"bytes 8-15/16".to_string())
        );
    }

    #[test]
    fn test_unsatisfiable_range() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=99-");
        let response = serve_content(&request, "text/plain", modified(), &body());

        assert_eq!(response.status, 416);
        assert_eq!(
            response.headers.get("Content-Range"),
            Some(&"bytes */16".to_string())
        );
    }

    #[test]
    fn test_malformed_range_is_unsatisfiable() {
        for header in ["bytes=abc", "bytes=5-2", "chunks=0-1", "bytes=-0"] {
            assert_eq!(
                parse_range(header, 16),
                RangeOutcome::Unsatisfiable,
                "header {header:?}"
            );
        }
    }

    #[test]
    fn test_multiple_ranges_are_ignored() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=0-1,4-5");
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 200);
        assert_eq!(response.body, &b"0123456789abcdef"[..]);
    }

    #[test]
    fn test_suffix_longer_than_body() {
        let request = HttpRequest::new("GET", "/f.txt").with_header("Range", "bytes=-99");
        let response = serve_content(&request, "text/plain", modified(), &body());
        assert_eq!(response.status, 206);
        assert_eq!(response.body, &b"0123456789abcdef"[..]);
    }
}
