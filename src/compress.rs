//! Compression of precomputed variants.
//!
//! Variants are computed once, at index time, at maximum effort; nothing is
//! compressed on the request path. The "deflate" variant is zlib-wrapped
//! DEFLATE (RFC 1950), matching what browsers expect for
//! `Content-Encoding: deflate`.

use crate::error::Error;
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};
use std::io::Write;

/// Compression algorithms the indexer precomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    /// Gzip (RFC 1952), served as `Content-Encoding: gzip`
    Gzip,
    /// Zlib-wrapped DEFLATE (RFC 1950), served as `Content-Encoding: deflate`
    Deflate,
}

impl CompressionAlgorithm {
    /// Every algorithm a compressible resource gets a variant for.
    pub const ALL: [CompressionAlgorithm; 2] = [Self::Gzip, Self::Deflate];

    /// The `Content-Encoding` header value (and variant map key) for this
    /// algorithm.
    pub fn encoding_name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
        }
    }

    /// Compress `data` at the maximum effort level.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
                encoder
                    .write_all(data)
                    .map_err(|e| Error::Compression(e.to_string()))?;
                encoder.finish().map_err(|e| Error::Compression(e.to_string()))
            }
            Self::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
                encoder
                    .write_all(data)
                    .map_err(|e| Error::Compression(e.to_string()))?;
                encoder.finish().map_err(|e| Error::Compression(e.to_string()))
            }
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.encoding_name())
    }
}
