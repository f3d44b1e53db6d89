//! FASTQ chunk parser
//!
//! Consumes lines from a byte range assumed to start at an `@` header.
//! Lines are taken in strict groups of four (header, sequence, `+`-line,
//! quality); a group is accepted when its header begins with `@` and the
//! quality length matches the sequence length. Rejected groups are counted
//! and scanning resumes with the next group, so one malformed record never
//! aborts a chunk.

use crate::types::OwnedRecord;

use super::{extract_id, ChunkRecords};

/// Line-fed FASTQ parser working in 4-line groups
pub(crate) struct FastqChunkParser {
    group: Vec<Vec<u8>>,
    records: Vec<OwnedRecord>,
    skipped: usize,
}

impl FastqChunkParser {
    pub(crate) fn new() -> Self {
        Self {
            group: Vec::with_capacity(4),
            records: Vec::new(),
            skipped: 0,
        }
    }

    /// Feed one line (without its trailing newline).
    pub(crate) fn push_line(&mut self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        self.group.push(line.to_vec());
        if self.group.len() == 4 {
            self.flush_group();
        }
    }

    /// Drop any partial trailing group and return everything parsed.
    pub(crate) fn finish(mut self) -> ChunkRecords {
        // A leftover group of fewer than four lines cannot form a record.
        // Count it as skipped unless it is only the empty line left behind
        // by a trailing newline.
        if self.group.iter().any(|line| !line.is_empty()) {
            self.skipped += 1;
        }
        ChunkRecords {
            records: self.records,
            skipped: self.skipped,
        }
    }

    fn flush_group(&mut self) {
        let mut group = std::mem::take(&mut self.group);
        let quality = group.pop().unwrap_or_default();
        let _plus = group.pop();
        let sequence = group.pop().unwrap_or_default();
        let header = group.pop().unwrap_or_default();

        if header.first() != Some(&b'@') {
            self.skipped += 1;
            return;
        }
        if sequence.len() != quality.len() {
            self.skipped += 1;
            return;
        }

        let id = extract_id(&header[1..]);
        if id.is_empty() {
            self.skipped += 1;
            return;
        }

        self.records.push(OwnedRecord {
            id,
            sequence,
            quality,
        });
    }
}
