//! Parser orchestrator: format sniffing, mode selection, parallel fan-out
//!
//! # Architecture
//!
//! Ingest runs in one of two modes, chosen deterministically:
//!
//! - **Sequential**: the input is gzip-compressed (not seekable) or smaller
//!   than [`SEQUENTIAL_THRESHOLD`]. Lines stream through the chunk parser
//!   for the sniffed format as if the whole file were one chunk.
//! - **Parallel**: the file is memory-mapped, boundary discovery produces
//!   one record-aligned `[start, end)` span per worker, and each rayon task
//!   parses its span independently. The per-span record lists are folded
//!   into the store by the caller.
//!
//! Per-record parse failures are skipped and counted, never fatal; only
//! open/sniff failures abort the ingest.

mod boundary;
mod fasta;
mod fastq;

use std::fs;
use std::path::Path;
use std::thread;

use memmap2::Mmap;
use rayon::prelude::*;

use crate::error::{Result, TraceonError};
use crate::io::{is_gzip_path, LineReader};
use crate::types::OwnedRecord;

use fasta::FastaChunkParser;
use fastq::FastqChunkParser;

/// Uncompressed inputs below this size are parsed on the calling thread.
///
/// Boundary discovery and thread spawn overhead dominate on small files;
/// 1 MiB is the floor below which the parallel path stops paying for
/// itself.
pub(crate) const SEQUENTIAL_THRESHOLD: u64 = 1024 * 1024;

/// Summary of one ingest returned by [`crate::Cache::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Records inserted into the store
    pub records: usize,
    /// Malformed records skipped during chunk parsing
    pub skipped: usize,
    /// Worker count used (1 for the sequential path)
    pub workers: usize,
}

/// Text format selected by the first non-empty line's sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextFormat {
    Fasta,
    Fastq,
}

/// Records parsed out of one chunk, with the count of malformed skips
pub(crate) struct ChunkRecords {
    pub records: Vec<OwnedRecord>,
    pub skipped: usize,
}

/// Everything the orchestrator hands back to the cache for merging
pub(crate) struct Ingested {
    pub chunks: Vec<ChunkRecords>,
    pub workers: usize,
}

/// Parse an entire file into record chunks.
pub(crate) fn run(path: &Path) -> Result<Ingested> {
    let format = sniff(path)?;
    let compressed = is_gzip_path(path);
    let file_size = fs::metadata(path)?.len();

    if compressed || file_size < SEQUENTIAL_THRESHOLD {
        let chunk = sequential(path, format)?;
        Ok(Ingested {
            chunks: vec![chunk],
            workers: 1,
        })
    } else {
        parallel(path, format)
    }
}

/// Determine the format from the first non-empty line's sentinel.
fn sniff(path: &Path) -> Result<TextFormat> {
    let mut reader = LineReader::open(path)?;
    let mut line = Vec::new();
    loop {
        if !reader.next_line(&mut line)? {
            return Err(TraceonError::EmptyInput {
                path: path.to_path_buf(),
            });
        }
        match line.first().copied() {
            None => continue,
            Some(b'>') => return Ok(TextFormat::Fasta),
            Some(b'@') => return Ok(TextFormat::Fastq),
            Some(other) => {
                return Err(TraceonError::UnknownFormat {
                    path: path.to_path_buf(),
                    leading: other as char,
                })
            }
        }
    }
}

/// Stream the whole file through one chunk parser.
///
/// Required for gzip input, which cannot seek, and cheaper for small files.
fn sequential(path: &Path, format: TextFormat) -> Result<ChunkRecords> {
    let mut reader = LineReader::open(path)?;
    let mut line = Vec::new();
    match format {
        TextFormat::Fasta => {
            let mut parser = FastaChunkParser::new();
            while reader.next_line(&mut line)? {
                parser.push_line(&line);
            }
            Ok(parser.finish())
        }
        TextFormat::Fastq => {
            let mut parser = FastqChunkParser::new();
            while reader.next_line(&mut line)? {
                parser.push_line(&line);
            }
            Ok(parser.finish())
        }
    }
}

/// Map the file, discover record-aligned spans, and parse them in parallel.
fn parallel(path: &Path, format: TextFormat) -> Result<Ingested> {
    let file = fs::File::open(path).map_err(|source| TraceonError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let mmap = unsafe { Mmap::map(&file)? };
    let data = &mmap[..];

    let workers = thread::available_parallelism().map_or(1, |n| n.get());
    let bounds = boundary::discover(data, format, workers);

    let spans: Vec<(usize, usize)> = bounds
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|&(start, end)| start < end)
        .collect();

    let chunks: Vec<ChunkRecords> = spans
        .into_par_iter()
        .map(|(start, end)| parse_span(&data[start..end], format))
        .collect();

    Ok(Ingested { chunks, workers })
}

/// Run the chunk parser for `format` over one record-aligned slice.
fn parse_span(data: &[u8], format: TextFormat) -> ChunkRecords {
    match format {
        TextFormat::Fasta => {
            let mut parser = FastaChunkParser::new();
            for line in data.split(|&b| b == b'\n') {
                parser.push_line(line);
            }
            parser.finish()
        }
        TextFormat::Fastq => {
            let mut parser = FastqChunkParser::new();
            for line in data.split(|&b| b == b'\n') {
                parser.push_line(line);
            }
            parser.finish()
        }
    }
}

/// The id is the first whitespace-delimited token after the sentinel.
pub(crate) fn extract_id(header: &[u8]) -> String {
    let end = header
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(header.len());
    String::from_utf8_lossy(&header[..end]).into_owned()
}
