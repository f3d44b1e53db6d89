//! The keyed store and its ingest/snapshot façade
//!
//! A [`Cache`] maps sequence ids to encoded records. It is populated either
//! by [`Cache::load`] (file ingest, possibly parallel) or by [`Cache::set`]
//! (direct insertion); lookups decode on demand so the store only ever
//! holds the compact encoded form. [`Cache::save`] and [`Cache::restore`]
//! move the whole store through the binary snapshot formats.

use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::codec::{self, DataTypeHint};
use crate::error::{Result, TraceonError};
use crate::ingest::{self, IngestReport};
use crate::snapshot::{self, Restored};
use crate::types::{EncodedRecord, FastqEntry, OwnedRecord, SequenceFormat};

/// How the store was populated, steering snapshot save dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Entries came through [`Cache::set`] (or the cache is untouched):
    /// save writes the v1 store-driven layout
    StoreDriven,
    /// Entries came purely from file ingest: save writes the v2
    /// parser-driven layout
    ParserDriven,
}

struct Inner {
    records: HashMap<String, EncodedRecord>,
    format: SequenceFormat,
    origin: Origin,
}

/// An in-memory cache of biological sequence records
///
/// # Concurrency
///
/// The store sits behind a reader-writer lock: lookups take the shared
/// lock and never block each other, ingest merge and `set` take the
/// exclusive lock. A record becomes visible only as a complete encoded
/// value, so readers can never observe half of a FASTQ record. No lock is
/// held across file I/O.
///
/// # Duplicate ids
///
/// The last writer wins, silently. During parallel ingest the winning
/// chunk is whichever merges last, which is not deterministic; callers
/// must not rely on which duplicate survives.
///
/// # Example
///
/// ```
/// use traceon::Cache;
///
/// let cache = Cache::new();
/// cache.set("seq1", "GATTACA");
/// assert_eq!(cache.get("seq1").as_deref(), Some("GATTACA"));
/// assert_eq!(cache.get("missing"), None);
/// ```
pub struct Cache {
    inner: RwLock<Inner>,
}

impl Cache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                format: SequenceFormat::DnaFasta,
                origin: Origin::StoreDriven,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // --- Ingest -----------------------------------------------------------

    /// Ingest a FASTA or FASTQ file, replacing the current contents.
    ///
    /// The format is sniffed from the first non-empty line (`>` for FASTA,
    /// `@` for FASTQ). Plain files of at least 1 MiB are parsed in parallel
    /// across all cores; gzip-compressed input (`.gz` suffix) and small
    /// files are parsed on the calling thread. Malformed records are
    /// skipped and counted, never fatal.
    ///
    /// After ingest the detected format tag is derived from the first
    /// merged record (once per ingest, not per record; a file mixing
    /// content types takes its tag from that one record).
    ///
    /// # Errors
    ///
    /// [`TraceonError::OpenFailed`], [`TraceonError::EmptyInput`] or
    /// [`TraceonError::UnknownFormat`]; any failure leaves the cache empty.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<IngestReport> {
        let path = path.as_ref();
        self.clear();

        let ingested = ingest::run(path)?;

        let mut skipped = 0usize;
        let mut detected: Option<SequenceFormat> = None;
        let records = {
            let mut inner = self.write();
            for chunk in ingested.chunks {
                skipped += chunk.skipped;
                for record in chunk.records {
                    if detected.is_none() {
                        detected = Some(SequenceFormat::classify(
                            &record.sequence,
                            !record.quality.is_empty(),
                        ));
                    }
                    let encoded = encode_record(&record);
                    inner.records.insert(record.id, encoded);
                }
            }
            inner.format = detected.unwrap_or(SequenceFormat::DnaFasta);
            inner.origin = Origin::ParserDriven;
            // Duplicates overwrite, so report what the store actually holds
            inner.records.len()
        };

        if skipped > 0 {
            warn!(path = %path.display(), skipped, "skipped malformed records during ingest");
        }
        info!(
            path = %path.display(),
            records,
            workers = ingested.workers,
            "ingest complete"
        );

        Ok(IngestReport {
            records,
            skipped,
            workers: ingested.workers,
        })
    }

    // --- Lookups ----------------------------------------------------------

    /// Look up the decoded sequence for `key`.
    ///
    /// Returns the sequence for both FASTA and FASTQ records, `None` when
    /// the key is absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.read();
        inner.records.get(key).map(|record| match record {
            EncodedRecord::Fasta(data) => decode_to_string(data),
            EncodedRecord::Fastq { sequence, .. } => decode_to_string(sequence),
        })
    }

    /// Look up the decoded sequence and quality for a FASTQ record.
    ///
    /// Returns `None` for absent keys and for FASTA records.
    pub fn get_fastq(&self, key: &str) -> Option<FastqEntry> {
        let inner = self.read();
        match inner.records.get(key)? {
            EncodedRecord::Fasta(_) => None,
            EncodedRecord::Fastq { sequence, quality } => Some(FastqEntry {
                sequence: decode_to_string(sequence),
                quality: decode_to_string(quality),
            }),
        }
    }

    /// Insert a sequence under `key`, encoding it with the generic hint.
    ///
    /// Marks the cache store-driven: the next [`Cache::save`] writes the v1
    /// layout.
    pub fn set(&self, key: impl Into<String>, value: &str) {
        let record = EncodedRecord::Fasta(codec::encode(value.as_bytes(), DataTypeHint::Generic));
        let mut inner = self.write();
        inner.records.insert(key.into(), record);
        inner.origin = Origin::StoreDriven;
    }

    /// Number of records currently stored.
    ///
    /// A snapshot in time; may race with concurrent writers.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// Whether the cache holds no records
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Bytes used by the encoded payload(s) stored under `key`.
    ///
    /// Sums both halves for FASTQ records; 0 when the key is absent.
    pub fn stored_size(&self, key: &str) -> usize {
        self.read()
            .records
            .get(key)
            .map_or(0, EncodedRecord::stored_size)
    }

    /// Content classification of the cache, derived from the first record
    /// seen during the most recent ingest or restore
    pub fn detected_format(&self) -> SequenceFormat {
        self.read().format
    }

    /// Remove all records
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.records.clear();
        inner.origin = Origin::StoreDriven;
        inner.format = SequenceFormat::DnaFasta;
    }

    // --- Snapshots --------------------------------------------------------

    /// Persist the cache to a binary snapshot.
    ///
    /// Writes the v1 `TRAC` layout when the cache is store-driven (entries
    /// added via [`Cache::set`], or empty) and the v2 `SMRT` layout when it
    /// was populated purely by file ingest. Entries are copied out under
    /// the read lock and serialized lock-free.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let (origin, format, entries) = {
            let inner = self.read();
            let entries: Vec<(String, EncodedRecord)> = inner
                .records
                .iter()
                .map(|(key, record)| (key.clone(), record.clone()))
                .collect();
            (inner.origin, inner.format, entries)
        };

        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        match origin {
            Origin::StoreDriven => snapshot::v1::write(&mut writer, &entries)?,
            Origin::ParserDriven => snapshot::v2::write(&mut writer, format, &entries)?,
        }
        writer.flush()?;

        info!(path = %path.display(), records = entries.len(), "snapshot written");
        Ok(())
    }

    /// Replace the cache contents from a binary snapshot.
    ///
    /// The layout is detected from the first four bytes; both versions are
    /// always readable. Restoring a v1 snapshot puts the cache back in
    /// store-driven mode, restoring v2 puts it in ingest mode, so a
    /// save/restore cycle round-trips in both modes.
    ///
    /// # Errors
    ///
    /// [`TraceonError::SnapshotMagic`], [`TraceonError::SnapshotVersion`]
    /// or [`TraceonError::SnapshotCorrupt`]; any failure leaves the cache
    /// empty.
    pub fn restore<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TraceonError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        match snapshot::read(&bytes) {
            Ok(Restored::V1(records)) => {
                let count = records.len();
                let mut inner = self.write();
                inner.records = records;
                inner.origin = Origin::StoreDriven;
                inner.format = SequenceFormat::DnaFasta;
                drop(inner);
                info!(path = %path.display(), records = count, "restored v1 snapshot");
                Ok(())
            }
            Ok(Restored::V2 { format, records }) => {
                let count = records.len();
                let mut inner = self.write();
                inner.records = records;
                inner.origin = Origin::ParserDriven;
                inner.format = format;
                drop(inner);
                info!(path = %path.display(), records = count, "restored v2 snapshot");
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_record(record: &OwnedRecord) -> EncodedRecord {
    if record.quality.is_empty() {
        EncodedRecord::Fasta(codec::encode(&record.sequence, DataTypeHint::Generic))
    } else {
        EncodedRecord::Fastq {
            sequence: codec::encode(&record.sequence, DataTypeHint::Generic),
            quality: codec::encode(&record.quality, DataTypeHint::QualityScore),
        }
    }
}

fn decode_to_string(data: &[u8]) -> String {
    String::from_utf8_lossy(&codec::decode(data)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cache_is_empty() {
        let cache = Cache::new();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_and_get() {
        let cache = Cache::new();
        cache.set("seq1", "GATTACA");
        assert_eq!(cache.get("seq1").as_deref(), Some("GATTACA"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let cache = Cache::new();
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.get_fastq("nope"), None);
        assert_eq!(cache.stored_size("nope"), 0);
    }

    #[test]
    fn get_fastq_on_fasta_entry_is_none() {
        let cache = Cache::new();
        cache.set("seq1", "GATTACA");
        assert_eq!(cache.get_fastq("seq1"), None);
    }

    #[test]
    fn nucleotide_set_is_bit_packed() {
        let cache = Cache::new();
        cache.set("k", "GATTACA");
        // tag + two 4-byte headers + ceil(7/4) packed bytes
        assert_eq!(cache.stored_size("k"), 11);
    }

    #[test]
    fn long_nucleotide_stores_smaller_than_input() {
        let cache = Cache::new();
        let seq = "ACGT".repeat(64);
        cache.set("k", &seq);
        assert!(cache.stored_size("k") < seq.len());
    }

    #[test]
    fn set_overwrites() {
        let cache = Cache::new();
        cache.set("k", "AAAA");
        cache.set("k", "CCCC");
        assert_eq!(cache.get("k").as_deref(), Some("CCCC"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_store() {
        let cache = Cache::new();
        cache.set("k", "ACGT");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn non_nucleotide_values_roundtrip_exactly() {
        let cache = Cache::new();
        cache.set("greeting", "hello world");
        assert_eq!(cache.get("greeting").as_deref(), Some("hello world"));
    }

    #[test]
    fn concurrent_readers() {
        use std::sync::Arc;
        let cache = Arc::new(Cache::new());
        cache.set("seq1", "GATTACA");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(cache.get("seq1").as_deref(), Some("GATTACA"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
