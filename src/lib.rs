//! TracEon: an in-memory cache for biological sequence data
//!
//! # Overview
//!
//! TracEon replaces repeated FASTA/FASTQ parsing with a single parallel
//! ingest followed by random-access lookups by sequence id, and persists the
//! in-memory state to a fast, self-describing binary snapshot.
//!
//! ## Key Features
//!
//! - **Parallel ingest**: record-aligned chunking fans parsing out across
//!   all cores; gzip input falls back to a single-threaded stream
//! - **Compact storage**: nucleotide sequences are bit-packed 4 bases per
//!   byte (with an `N`-position side table), quality strings are
//!   run-length encoded
//! - **Snapshots**: two self-describing binary layouts with automatic
//!   version detection on restore
//! - **Thread-safe lookups**: concurrent readers never block each other
//!
//! ## Quick Start
//!
//! ```no_run
//! use traceon::Cache;
//!
//! # fn main() -> traceon::Result<()> {
//! let cache = Cache::new();
//! let report = cache.load("reads.fastq")?;
//! println!("loaded {} records", report.records);
//!
//! if let Some(entry) = cache.get_fastq("read_0001") {
//!     println!("{} / {}", entry.sequence, entry.quality);
//! }
//!
//! cache.save("reads.trc")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cache`]: the keyed store and its ingest/snapshot façade
//! - [`codec`]: type-tagged nucleotide, run-length, and plain codecs
//! - [`classify`]: DNA/RNA/protein content detection
//! - [`io`]: the gzip-aware line source

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod classify;
pub mod codec;
pub mod error;
pub mod io;
pub mod types;

mod ingest;
mod snapshot;

// Re-export commonly used types
pub use cache::Cache;
pub use error::{Result, TraceonError};
pub use ingest::IngestReport;
pub use types::{FastqEntry, SequenceFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
