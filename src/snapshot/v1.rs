//! v1 "TRAC" snapshot: the store-driven layout
//!
//! ```text
//! magic        : 4 bytes = "TRAC"
//! version      : 1 byte = 2
//! record_count : 8 bytes, little-endian
//! records      : record_count ×
//!   key_len   : 4 bytes LE
//!   key_bytes : key_len bytes
//!   rec_type  : 1 byte (0 = FASTA, 1 = FASTQ)
//!   FASTA: data_len (4 bytes LE) + data        (type-tagged payload)
//!   FASTQ: seq_len  (4 bytes LE) + seq
//!          qual_len (4 bytes LE) + qual        (both type-tagged)
//! ```
//!
//! Payloads go to disk exactly as the store holds them, so writing is a
//! straight walk and restoring never re-encodes.

use std::collections::HashMap;
use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Result, TraceonError};
use crate::types::EncodedRecord;

use super::{read_bytes, read_u32_le, read_u64_le, read_u8};

/// v1 file magic
pub(crate) const MAGIC: &[u8; 4] = b"TRAC";

/// The only version this reader understands
pub(crate) const VERSION: u8 = 2;

const REC_FASTA: u8 = 0;
const REC_FASTQ: u8 = 1;

/// Serialize the store into a v1 snapshot.
pub(crate) fn write<W: Write>(
    writer: &mut W,
    records: &[(String, EncodedRecord)],
) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_u8(VERSION)?;
    writer.write_u64::<LittleEndian>(records.len() as u64)?;

    for (key, record) in records {
        writer.write_u32::<LittleEndian>(key.len() as u32)?;
        writer.write_all(key.as_bytes())?;
        match record {
            EncodedRecord::Fasta(data) => {
                writer.write_u8(REC_FASTA)?;
                writer.write_u32::<LittleEndian>(data.len() as u32)?;
                writer.write_all(data)?;
            }
            EncodedRecord::Fastq { sequence, quality } => {
                writer.write_u8(REC_FASTQ)?;
                writer.write_u32::<LittleEndian>(sequence.len() as u32)?;
                writer.write_all(sequence)?;
                writer.write_u32::<LittleEndian>(quality.len() as u32)?;
                writer.write_all(quality)?;
            }
        }
    }
    Ok(())
}

/// Parse a v1 snapshot body (everything after the magic).
pub(crate) fn read(mut buf: &[u8]) -> Result<HashMap<String, EncodedRecord>> {
    let version = read_u8(&mut buf, "TRAC version byte")?;
    if version != VERSION {
        return Err(TraceonError::SnapshotVersion { found: version });
    }
    let record_count = read_u64_le(&mut buf, "TRAC record count")?;

    let mut records = HashMap::with_capacity(record_count.min(1 << 20) as usize);
    for index in 0..record_count {
        let key_len = read_u32_le(&mut buf, "record key length")? as usize;
        let key_bytes = read_bytes(&mut buf, key_len, "record key")?;
        let key = String::from_utf8_lossy(key_bytes).into_owned();

        let rec_type = read_u8(&mut buf, "record type byte")?;
        let record = match rec_type {
            REC_FASTA => {
                let data_len = read_u32_le(&mut buf, "FASTA payload length")? as usize;
                let data = read_bytes(&mut buf, data_len, "FASTA payload")?;
                EncodedRecord::Fasta(data.to_vec())
            }
            REC_FASTQ => {
                let seq_len = read_u32_le(&mut buf, "FASTQ sequence length")? as usize;
                let sequence = read_bytes(&mut buf, seq_len, "FASTQ sequence")?.to_vec();
                let qual_len = read_u32_le(&mut buf, "FASTQ quality length")? as usize;
                let quality = read_bytes(&mut buf, qual_len, "FASTQ quality")?.to_vec();
                EncodedRecord::Fastq { sequence, quality }
            }
            other => {
                return Err(TraceonError::SnapshotCorrupt {
                    detail: format!("record {index}: unknown record type {other}"),
                })
            }
        };
        records.insert(key, record);
    }
    Ok(records)
}
