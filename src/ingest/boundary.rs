//! Record-aligned chunk boundary discovery
//!
//! Parallel ingest needs byte offsets that are guaranteed to sit on record
//! starts, so each worker can parse its span independently. For FASTA a
//! record start is simply a `>` preceded by a newline. FASTQ is harder:
//! quality lines are free to begin with `@`, so "newline then `@`" alone
//! would misalign a worker onto the middle of a record. A candidate `@` is
//! therefore accepted only when the next three lines are consistent with a
//! 4-line record: the third line begins with `+` and the fourth line has
//! the same length as the second. A quality line that begins with `@` fails
//! that check because the line two below it is sequence data, which never
//! begins with `+`.

use memchr::{memchr, memchr_iter};

use super::TextFormat;

/// Discover `workers + 1` byte offsets covering `data` in contiguous,
/// record-aligned spans.
///
/// Offset 0 is always included (the caller guarantees the file begins with
/// a record header) and the final offset is `data.len()`. Approximate
/// positions that resolve to the same record start produce empty spans,
/// which the caller filters out.
pub(crate) fn discover(data: &[u8], format: TextFormat, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let chunk_size = data.len() / workers;

    let mut bounds = Vec::with_capacity(workers + 1);
    bounds.push(0);
    if chunk_size > 0 {
        for i in 1..workers {
            bounds.push(next_record_start(data, i * chunk_size, format));
        }
    }
    bounds.push(data.len());
    bounds
}

/// Find the first record start at or after `from`.
///
/// Returns `data.len()` when no further record start exists.
fn next_record_start(data: &[u8], from: usize, format: TextFormat) -> usize {
    if from >= data.len() {
        return data.len();
    }
    // Scan newlines from one byte back so a sentinel sitting exactly at
    // `from` is still seen with its preceding newline.
    let scan_from = from.saturating_sub(1);
    let sentinel = match format {
        TextFormat::Fasta => b'>',
        TextFormat::Fastq => b'@',
    };

    for newline in memchr_iter(b'\n', &data[scan_from..]) {
        let candidate = scan_from + newline + 1;
        if candidate >= data.len() {
            break;
        }
        if data[candidate] != sentinel {
            continue;
        }
        match format {
            TextFormat::Fasta => return candidate,
            TextFormat::Fastq => {
                if is_fastq_record_start(data, candidate) {
                    return candidate;
                }
            }
        }
    }
    data.len()
}

/// Validate that `at` (pointing at an `@`) opens a well-formed 4-line
/// FASTQ record.
fn is_fastq_record_start(data: &[u8], at: usize) -> bool {
    let Some((_header, rest)) = take_line(data, at) else {
        return false;
    };
    let Some((sequence, rest)) = take_line(data, rest) else {
        return false;
    };
    let Some((plus, rest)) = take_line(data, rest) else {
        return false;
    };
    let Some((quality, _)) = take_line(data, rest) else {
        return false;
    };
    plus.first() == Some(&b'+') && quality.len() == sequence.len()
}

/// Extract the line starting at `start`, stripping `\r`, and return it with
/// the offset just past its newline. `None` once past the end of data.
fn take_line(data: &[u8], start: usize) -> Option<(&[u8], usize)> {
    if start >= data.len() {
        return None;
    }
    let end = memchr(b'\n', &data[start..]).map_or(data.len(), |i| start + i);
    let mut line = &data[start..end];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }
    Some((line, end + 1))
}
