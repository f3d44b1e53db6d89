//! v2 "SMRT" snapshot: the parser-driven layout
//!
//! ```text
//! magic        : 4 bytes = "SMRT"
//! format_byte  : 1 byte (SequenceFormat, 0..=5)
//! record_count : 8 bytes, little-endian
//! records      : record_count ×
//!   id_len   : 4 bytes LE
//!   id_bytes : id_len bytes
//!   seq_len  : 4 bytes LE
//!   seq      : seq_len bytes   (plain, uncompressed)
//!   qual_len : 4 bytes LE
//!   qual     : qual_len bytes  (plain; zero for FASTA)
//! ```
//!
//! Sequences and qualities are stored as plain bytes: the layout trades
//! disk space for restore speed. Writing therefore decodes every stored
//! payload; that work fans out across rayon workers, and the serialized
//! records are written back in order.

use std::collections::HashMap;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use rayon::prelude::*;

use crate::codec::{self, DataTypeHint};
use crate::error::{Result, TraceonError};
use crate::types::{EncodedRecord, SequenceFormat};

use super::{read_bytes, read_u32_le, read_u64_le, read_u8};

/// v2 file magic
pub(crate) const MAGIC: &[u8; 4] = b"SMRT";

/// Serialize the store into a v2 snapshot.
pub(crate) fn write<W: Write>(
    writer: &mut W,
    format: SequenceFormat,
    records: &[(String, EncodedRecord)],
) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_u8(format.as_byte())?;
    writer.write_u64::<LittleEndian>(records.len() as u64)?;

    // Decoding dominates the write cost, so serialize records in parallel
    // and concatenate in order.
    let serialized: Vec<Vec<u8>> = records
        .par_iter()
        .map(|(id, record)| serialize_record(id, record))
        .collect();

    for buffer in serialized {
        writer.write_all(&buffer)?;
    }
    Ok(())
}

fn serialize_record(id: &str, record: &EncodedRecord) -> Vec<u8> {
    let (sequence, quality) = match record {
        EncodedRecord::Fasta(data) => (codec::decode(data), Vec::new()),
        EncodedRecord::Fastq { sequence, quality } => {
            (codec::decode(sequence), codec::decode(quality))
        }
    };

    let mut out = Vec::with_capacity(12 + id.len() + sequence.len() + quality.len());
    out.extend_from_slice(&(id.len() as u32).to_le_bytes());
    out.extend_from_slice(id.as_bytes());
    out.extend_from_slice(&(sequence.len() as u32).to_le_bytes());
    out.extend_from_slice(&sequence);
    out.extend_from_slice(&(quality.len() as u32).to_le_bytes());
    out.extend_from_slice(&quality);
    out
}

/// Parse a v2 snapshot body (everything after the magic).
///
/// Records are re-encoded on the way into the store, so a restored cache
/// has the same memory footprint as a freshly ingested one.
pub(crate) fn read(mut buf: &[u8]) -> Result<(SequenceFormat, HashMap<String, EncodedRecord>)> {
    let format_byte = read_u8(&mut buf, "SMRT format byte")?;
    let format = SequenceFormat::from_byte(format_byte).ok_or(TraceonError::SnapshotMagic {
        found: [MAGIC[0], MAGIC[1], MAGIC[2], MAGIC[3]],
    })?;
    let record_count = read_u64_le(&mut buf, "SMRT record count")?;

    let mut records = HashMap::with_capacity(record_count.min(1 << 20) as usize);
    for _ in 0..record_count {
        let id_len = read_u32_le(&mut buf, "record id length")? as usize;
        let id = String::from_utf8_lossy(read_bytes(&mut buf, id_len, "record id")?).into_owned();

        let seq_len = read_u32_le(&mut buf, "sequence length")? as usize;
        let sequence = read_bytes(&mut buf, seq_len, "sequence")?;
        let qual_len = read_u32_le(&mut buf, "quality length")? as usize;
        let quality = read_bytes(&mut buf, qual_len, "quality")?;

        let record = if quality.is_empty() {
            EncodedRecord::Fasta(codec::encode(sequence, DataTypeHint::Generic))
        } else {
            EncodedRecord::Fastq {
                sequence: codec::encode(sequence, DataTypeHint::Generic),
                quality: codec::encode(quality, DataTypeHint::QualityScore),
            }
        };
        records.insert(id, record);
    }
    Ok((format, records))
}
