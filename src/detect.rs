// Content-type detection: extension lookup with a sniffing fallback

use std::path::Path;

/// How many leading bytes the sniffer examines.
const SNIFF_LEN: usize = 512;

/// Determine the content type for a file: by extension first, then by
/// sniffing the first [`SNIFF_LEN`] bytes of content.
pub(crate) fn content_type(path: &Path, body: &[u8]) -> String {
    match mime_guess::from_path(path).first_raw() {
        Some(mime) => mime.to_string(),
        None => sniff(&body[..body.len().min(SNIFF_LEN)]).to_string(),
    }
}

/// Minimal content sniffing over a byte prefix: markup, a handful of common
/// binary signatures, a UTF-8 text heuristic, and an octet-stream fallback.
fn sniff(data: &[u8]) -> &'static str {
    let trimmed = data.trim_ascii_start();

    for prefix in ["<!DOCTYPE HTML", "<HTML", "<HEAD", "<BODY", "<SCRIPT"] {
        if starts_with_ignore_case(trimmed, prefix.as_bytes()) {
            return "text/html; charset=utf-8";
        }
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if data.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if data.starts_with(b"\xff\xd8\xff") {
        return "image/jpeg";
    }
    if data.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }
    if data.starts_with(b"\x1f\x8b") {
        return "application/x-gzip";
    }

    if !data.contains(&0) && std::str::from_utf8(data).is_ok() {
        return "text/plain; charset=utf-8";
    }

    "application/octet-stream"
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len()
        && data
            .iter()
            .zip(prefix)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}
