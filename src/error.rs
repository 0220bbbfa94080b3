//! Error types for routing-table construction

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the routing table.
///
/// Only the root directory itself can fail construction. Per-file problems
/// (unreadable entries, stat failures, undecodable names) are skipped and the
/// walk continues.
#[derive(Error, Debug)]
pub enum Error {
    /// The root directory could not be opened
    #[error("failed to open root directory {path:?}: {source}")]
    RootDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root path exists but is not a directory
    #[error("root path {0:?} is not a directory")]
    NotADirectory(PathBuf),

    /// Compressing a precomputed variant failed
    #[error("compression failed: {0}")]
    Compression(String),
}
