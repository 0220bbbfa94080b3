//! Routing-table construction and request dispatch.
//!
//! [`FileServer::build`] walks the root directory exactly once, reads every
//! regular file into memory, precompresses the eligible ones, and seals the
//! result into an immutable routing table. [`FileServer::handle`] serves
//! requests from that table without locking; nothing mutates after build, so
//! any number of request threads may share one server.
//!
//! Files named after the configured index document produce two entries: the
//! directory path serves the content, and the literal index path replies
//! with a permanent redirect to `./` (preserving the query string). Both
//! entries reference the same resource data.

use crate::compress::CompressionAlgorithm;
use crate::config::FileServerConfig;
use crate::detect;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::StaticResource;
use bytes::Bytes;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A routing-table entry.
enum Route {
    /// Serve the resource with content negotiation.
    Content(Arc<StaticResource>),
    /// Permanent redirect from a literal index-document path to `./`.
    IndexRedirect,
}

/// Immutable file server: a routing table built once from a directory tree.
pub struct FileServer {
    routes: HashMap<String, Route>,
    config: FileServerConfig,
}

impl FileServer {
    /// Walk `root` and build the routing table.
    ///
    /// Only a root that cannot be opened (or is not a directory) fails the
    /// build. Individual entries that cannot be resolved, stat'ed or read
    /// are skipped and the walk continues.
    pub fn build(root: impl AsRef<Path>, config: FileServerConfig) -> Result<Self, Error> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|source| Error::RootDirectory {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }

        let mut routes = HashMap::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(url_path) = url_path_for(root, entry.path()) else {
                warn!(path = %entry.path().display(), "skipping file with undecodable name");
                continue;
            };
            let modified = match entry.metadata().map_err(|e| e.to_string()).and_then(|m| {
                m.modified().map_err(|e| e.to_string())
            }) {
                Ok(modified) => modified,
                Err(err) => {
                    warn!(path = %url_path, error = %err, "skipping file without metadata");
                    continue;
                }
            };
            let body = match fs::read(entry.path()) {
                Ok(body) => body,
                Err(err) => {
                    warn!(path = %url_path, error = %err, "skipping unreadable file");
                    continue;
                }
            };

            let content_type = detect::content_type(entry.path(), &body);
            let compressible = config.is_compressible(&content_type, body.len());

            let mut variants = HashMap::new();
            if compressible {
                for algorithm in CompressionAlgorithm::ALL {
                    match algorithm.compress(&body) {
                        Ok(compressed) => {
                            variants
                                .insert(algorithm.encoding_name().to_string(), Bytes::from(compressed));
                        }
                        Err(err) => {
                            warn!(path = %url_path, %algorithm, error = %err, "variant skipped");
                        }
                    }
                }
            }

            let resource = Arc::new(StaticResource {
                url_path: url_path.clone(),
                content_type,
                body: Bytes::from(body),
                modified,
                variants,
                compressible,
            });
            debug!(
                path = %resource.url_path,
                content_type = %resource.content_type,
                compressible,
                "indexed file"
            );

            if entry.file_name().to_str() == Some(config.index_file.as_str()) {
                routes.insert(directory_path(&url_path), Route::Content(resource));
                routes.insert(url_path, Route::IndexRedirect);
            } else {
                routes.insert(url_path, Route::Content(resource));
            }
        }

        info!(
            root = %root.display(),
            routes = routes.len(),
            "routing table built"
        );

        Ok(Self { routes, config })
    }

    /// Dispatch one request against the routing table.
    ///
    /// The path is cleaned first (leading slash, `.`/`..`/duplicate-slash
    /// collapse), then looked up exactly. Misses go to the configured
    /// not-found handler; every matched path gets `Vary: Accept-Encoding`
    /// appended to its response.
    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let path = clean_path(&request.path);

        let Some(route) = self.routes.get(path.as_str()) else {
            return (self.config.not_found)(request);
        };

        let mut response = match route {
            Route::Content(resource) => resource.respond(request),
            Route::IndexRedirect => index_redirect(request),
        };

        // Append, never overwrite: something upstream may already vary.
        let vary = response.headers.entry("Vary".to_string()).or_default();
        if !vary.contains("Accept-Encoding") {
            if !vary.is_empty() {
                vary.push_str(", ");
            }
            vary.push_str("Accept-Encoding");
        }

        response
    }

    /// The configuration this server was built with.
    pub fn config(&self) -> &FileServerConfig {
        &self.config
    }
}

/// 301 to `./`, carrying over the request's query string.
fn index_redirect(request: &HttpRequest) -> HttpResponse {
    let mut location = String::from("./");
    if !request.query.is_empty() {
        location.push('?');
        location.push_str(&request.query);
    }
    HttpResponse::moved_permanently(location)
}

/// Root-relative URL path for a file, slash-separated with a leading `/`.
/// `None` when the path cannot be expressed as UTF-8.
fn url_path_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut url = String::new();
    for component in relative.components() {
        url.push('/');
        url.push_str(component.as_os_str().to_str()?);
    }
    if url.is_empty() { None } else { Some(url) }
}

/// Directory key for an index document: the URL path with the file name
/// removed and no trailing slash, except for the root.
fn directory_path(url_path: &str) -> String {
    match url_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(at) => url_path[..at].to_string(),
    }
}

/// Lexically clean a request path: force a leading slash, drop `.` and empty
/// segments, resolve `..`, never leave a trailing slash except on the root.
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }
    let mut cleaned = String::with_capacity(path.len());
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}
