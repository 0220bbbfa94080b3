//! Precompressed static file serving with `Accept-Encoding` negotiation.
//!
//! This crate serves a directory tree over HTTP. At startup it walks the
//! tree once, reads every file into memory, and eagerly compresses the
//! eligible ones (gzip and deflate, maximum effort). Each request then picks
//! a representation by content negotiation: the client's weighted
//! `Accept-Encoding` preferences are matched against the precomputed
//! variants, and anything that cannot be served compressed — unsupported
//! encodings, byte-range requests, ineligible files — falls back to a
//! conditional, range-capable uncompressed path.
//!
//! # Features
//!
//! - **Precompression at startup**: no per-request compression work, ever
//! - **Weighted negotiation**: `;q=` quality values with stable ordering
//! - **Range and conditional requests**: single byte ranges, `ETag`,
//!   `If-None-Match`, `If-Modified-Since`
//! - **Index documents**: `/docs/index.html` is reachable at `/docs`, and
//!   the literal path permanently redirects to `./`
//! - **Immutable routing table**: built once, shared lock-free by any
//!   number of request threads
//!
//! # Example
//!
//! ```rust,no_run
//! use prestatic::{FileServer, FileServerConfig, HttpRequest};
//!
//! fn main() -> Result<(), prestatic::Error> {
//!     let server = FileServer::build(
//!         "./public",
//!         FileServerConfig::new().with_compressible_content_length(1024),
//!     )?;
//!
//!     // Wire `server.handle(&request)` into the transport of your choice.
//!     let request = HttpRequest::new("GET", "/index.css")
//!         .with_header("Accept-Encoding", "gzip;q=0.8, deflate");
//!     let response = server.handle(&request);
//!     assert_eq!(response.status, 200);
//!     Ok(())
//! }
//! ```
//!
//! # Serving decision
//!
//! For a matched path, the response representation is chosen as follows:
//!
//! 1. no precomputed variants → uncompressed, range-capable path
//! 2. `Range` header present → uncompressed, range-capable path (byte
//!    ranges address the original bytes, never compressed ones)
//! 3. first entry of the preference order with a matching variant →
//!    compressed body with `Content-Encoding`
//! 4. no match → uncompressed, range-capable path
//!
//! Every matched path carries `Vary: Accept-Encoding`.

mod accept;
mod compress;
mod config;
mod content;
mod detect;
mod error;
mod http;
mod resource;
mod server;

pub use accept::{AcceptEncoding, EncodingPreference};
pub use compress::CompressionAlgorithm;
pub use config::{FileServerConfig, Handler};
pub use content::serve_content;
pub use error::Error;
pub use http::{HttpRequest, HttpResponse};
pub use resource::StaticResource;
pub use server::FileServer;
