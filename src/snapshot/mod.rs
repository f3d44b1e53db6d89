//! Binary snapshot persistence
//!
//! Two self-describing layouts coexist:
//!
//! - **v1 `TRAC`**: the store-driven layout. Records are written exactly as
//!   the store holds them: type-tagged encoded payloads under their keys.
//!   Written when the cache was populated through [`crate::Cache::set`].
//! - **v2 `SMRT`**: the parser-driven layout. Records are written as plain
//!   id/sequence/quality bytes, trading disk space for decode-free restore
//!   speed. Written when the cache was populated purely by file ingest.
//!
//! Restore reads the first four bytes and dispatches on the magic; both
//! layouts are always readable regardless of how the current cache was
//! populated. All length prefixes are little-endian on the wire, while the
//! 2-bit codec's internal headers inside v1 payloads stay big-endian; the
//! two conventions are historical and both are load-bearing for snapshot
//! compatibility.

pub(crate) mod v1;
pub(crate) mod v2;

use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, TraceonError};
use crate::types::{EncodedRecord, SequenceFormat};

/// A parsed snapshot, tagged with the layout it came from
#[derive(Debug)]
pub(crate) enum Restored {
    /// v1: store-driven entries, already encoded
    V1(HashMap<String, EncodedRecord>),
    /// v2: parser-driven entries plus the persisted format tag
    V2 {
        format: SequenceFormat,
        records: HashMap<String, EncodedRecord>,
    },
}

/// Parse a snapshot of either version, dispatching on the 4-byte magic.
pub(crate) fn read(bytes: &[u8]) -> Result<Restored> {
    if bytes.len() < 4 {
        return Err(TraceonError::SnapshotCorrupt {
            detail: format!("file is {} bytes, shorter than the magic", bytes.len()),
        });
    }
    let magic: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if &magic == v1::MAGIC {
        Ok(Restored::V1(v1::read(&bytes[4..])?))
    } else if &magic == v2::MAGIC {
        let (format, records) = v2::read(&bytes[4..])?;
        Ok(Restored::V2 { format, records })
    } else {
        Err(TraceonError::SnapshotMagic { found: magic })
    }
}

// --- Bounds-checked slice cursor -----------------------------------------
//
// Snapshot parsing consumes a fully buffered file, so every read is a slice
// advance with an explicit length check; a short read means the snapshot is
// corrupt, never a panic.

pub(crate) fn read_u8(buf: &mut &[u8], what: &str) -> Result<u8> {
    let (&byte, rest) = buf.split_first().ok_or_else(|| corrupt(what, 1, buf))?;
    *buf = rest;
    Ok(byte)
}

pub(crate) fn read_u32_le(buf: &mut &[u8], what: &str) -> Result<u32> {
    let bytes = read_bytes(buf, 4, what)?;
    Ok(LittleEndian::read_u32(bytes))
}

pub(crate) fn read_u64_le(buf: &mut &[u8], what: &str) -> Result<u64> {
    let bytes = read_bytes(buf, 8, what)?;
    Ok(LittleEndian::read_u64(bytes))
}

pub(crate) fn read_bytes<'a>(buf: &mut &'a [u8], len: usize, what: &str) -> Result<&'a [u8]> {
    if buf.len() < len {
        return Err(corrupt(what, len, buf));
    }
    let (bytes, rest) = buf.split_at(len);
    *buf = rest;
    Ok(bytes)
}

fn corrupt(what: &str, wanted: usize, buf: &[u8]) -> TraceonError {
    TraceonError::SnapshotCorrupt {
        detail: format!("{what}: needed {wanted} bytes, {} left", buf.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_and_bounds_checks() {
        let data = [1u8, 2, 0, 0, 0, 9];
        let mut buf = &data[..];
        assert_eq!(read_u8(&mut buf, "tag").unwrap(), 1);
        assert_eq!(read_u32_le(&mut buf, "len").unwrap(), 2);
        assert_eq!(read_u8(&mut buf, "tail").unwrap(), 9);
        assert!(read_u8(&mut buf, "past end").is_err());
    }

    #[test]
    fn length_prefix_past_end_is_corrupt() {
        let data = [5u8, 0, 0, 0, b'a', b'b'];
        let mut buf = &data[..];
        let len = read_u32_le(&mut buf, "len").unwrap() as usize;
        let err = read_bytes(&mut buf, len, "payload").unwrap_err();
        assert!(matches!(err, TraceonError::SnapshotCorrupt { .. }));
    }

    #[test]
    fn short_file_is_corrupt_not_magic() {
        assert!(matches!(
            read(b"TR").unwrap_err(),
            TraceonError::SnapshotCorrupt { .. }
        ));
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let err = read(b"NOPE\x00\x00\x00\x00").unwrap_err();
        assert!(matches!(
            err,
            TraceonError::SnapshotMagic { found: [b'N', b'O', b'P', b'E'] }
        ));
    }
}
