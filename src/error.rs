//! Error types for traceon

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for traceon operations
pub type Result<T> = std::result::Result<T, TraceonError>;

/// Error types that can occur in traceon
#[derive(Debug, Error)]
pub enum TraceonError {
    /// The input path could not be opened for reading
    #[error("Cannot open {path}: {source}")]
    OpenFailed {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The input contained no usable first line
    #[error("Input file is empty: {path}")]
    EmptyInput {
        /// Path of the empty input
        path: PathBuf,
    },

    /// The first record started with neither '>' nor '@'
    #[error("Unknown sequence format in {path}: first line starts with {leading:?}")]
    UnknownFormat {
        /// Path of the unrecognized input
        path: PathBuf,
        /// First character of the first non-empty line
        leading: char,
    },

    /// A snapshot ended early or a length prefix overran the file
    #[error("Snapshot is corrupt: {detail}")]
    SnapshotCorrupt {
        /// What was being read when the snapshot ran out
        detail: String,
    },

    /// A TRAC snapshot carried an unsupported version byte
    #[error("Unsupported TRAC snapshot version: {found}")]
    SnapshotVersion {
        /// Version byte found in the header
        found: u8,
    },

    /// The snapshot header matched no known layout
    #[error("Not a recognized snapshot: leading bytes {found:?}")]
    SnapshotMagic {
        /// First four bytes of the file
        found: [u8; 4],
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
