//! Unified line source for plain and gzip-compressed text files
//!
//! The ingest paths treat their input as an opaque stream of lines: open a
//! path, pull one line at a time, stop at end of input. A `.gz` suffix
//! requests gzip decompression; every other path is read as plain text.
//! The reader is single-use and forward-only; a gzip stream cannot seek,
//! which is also why compressed ingest stays single-threaded.

use crate::error::{Result, TraceonError};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A forward-only line reader over a plain or gzip-compressed file
///
/// # Example
///
/// ```no_run
/// use traceon::io::LineReader;
///
/// # fn main() -> traceon::Result<()> {
/// let mut reader = LineReader::open("reads.fq.gz")?;
/// let mut line = Vec::new();
/// while reader.next_line(&mut line)? {
///     // `line` holds one line with the trailing newline stripped
/// }
/// # Ok(())
/// # }
/// ```
pub struct LineReader {
    inner: Box<dyn BufRead + Send>,
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader").finish_non_exhaustive()
    }
}

impl LineReader {
    /// Open a file for line-by-line reading.
    ///
    /// Paths ending in `.gz` are decompressed on the fly.
    ///
    /// # Errors
    ///
    /// [`TraceonError::OpenFailed`] when the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TraceonError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let inner: Box<dyn BufRead + Send> = if is_gzip_path(path) {
            Box::new(BufReader::new(GzDecoder::new(BufReader::new(file))))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self { inner })
    }

    /// Create a line reader from any buffered reader.
    ///
    /// Useful for testing or reading from in-memory sources.
    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self {
            inner: Box::new(reader),
        }
    }

    /// Read the next line into `buf`, clearing it first.
    ///
    /// Trailing `\n` and `\r` are stripped. Returns `Ok(false)` at end of
    /// input.
    pub fn next_line(&mut self, buf: &mut Vec<u8>) -> io::Result<bool> {
        buf.clear();
        let n = self.inner.read_until(b'\n', buf)?;
        if n == 0 {
            return Ok(false);
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        Ok(true)
    }
}

/// Whether a path requests gzip decompression
pub(crate) fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn collect_lines(mut reader: LineReader) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        while reader.next_line(&mut buf).unwrap() {
            lines.push(buf.clone());
        }
        lines
    }

    #[test]
    fn reads_lines_and_strips_newlines() {
        let reader = LineReader::from_reader(Cursor::new(b">seq1\nGATTACA\n".to_vec()));
        assert_eq!(collect_lines(reader), vec![b">seq1".to_vec(), b"GATTACA".to_vec()]);
    }

    #[test]
    fn strips_carriage_returns() {
        let reader = LineReader::from_reader(Cursor::new(b"@r1\r\nACGT\r\n".to_vec()));
        assert_eq!(collect_lines(reader), vec![b"@r1".to_vec(), b"ACGT".to_vec()]);
    }

    #[test]
    fn final_line_without_newline() {
        let reader = LineReader::from_reader(Cursor::new(b"a\nb".to_vec()));
        assert_eq!(collect_lines(reader), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        let reader = LineReader::from_reader(Cursor::new(Vec::new()));
        assert!(collect_lines(reader).is_empty());
    }

    #[test]
    fn open_missing_file_is_open_failed() {
        let err = LineReader::open("/nonexistent/path/reads.fa").unwrap_err();
        assert!(matches!(err, TraceonError::OpenFailed { .. }));
    }

    #[test]
    fn gzip_roundtrip_through_tempfile() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reads.fa.gz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b">seq1\nGATTACA\n").unwrap();
        encoder.finish().unwrap();

        let reader = LineReader::open(&path).unwrap();
        assert_eq!(collect_lines(reader), vec![b">seq1".to_vec(), b"GATTACA".to_vec()]);
    }

    #[test]
    fn gz_extension_detection() {
        assert!(is_gzip_path(Path::new("reads.fq.gz")));
        assert!(!is_gzip_path(Path::new("reads.fq")));
        assert!(!is_gzip_path(Path::new("reads.gzip")));
    }
}
