//! Type-tagged codecs for stored payloads
//!
//! Every payload held by the store or embedded in a v1 snapshot starts with
//! a one-byte type tag, so decoding never depends on out-of-band state:
//!
//! | Tag | Codec | Chosen when |
//! |---|---|---|
//! | `0x01` | 2-bit nucleotide ([`nucleotide`]) | `Generic` hint and the content classifies as nucleotide |
//! | `0x12` | run-length ([`rle`]) | `QualityScore` hint |
//! | `0x21` | plain byte copy | `Generic` hint, non-nucleotide content |
//!
//! The codec set is closed; variants dispatch through a match rather than a
//! trait object.
//!
//! # Example
//!
//! ```
//! use traceon::codec::{decode, encode, DataTypeHint};
//!
//! let encoded = encode(b"GATTACA", DataTypeHint::Generic);
//! assert_eq!(encoded[0], 0x01); // nucleotide path
//! assert_eq!(decode(&encoded), b"GATTACA");
//! ```

pub mod nucleotide;
pub mod rle;

use crate::classify;

/// Payload tag selecting the 2-bit nucleotide codec
pub const TAG_NUCLEOTIDE: u8 = 0x01;
/// Payload tag selecting the run-length quality codec
pub const TAG_QUALITY_RLE: u8 = 0x12;
/// Payload tag selecting the plain byte-copy codec
pub const TAG_PLAIN: u8 = 0x21;

/// Caller-supplied hint steering codec selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeHint {
    /// Sequence or arbitrary text; content classification picks the codec
    Generic,
    /// Phred quality string; always run-length encoded
    QualityScore,
}

fn tagged(tag: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(tag);
    out.extend_from_slice(&payload);
    out
}

/// Encode a byte string into a type-tagged payload.
///
/// Empty input encodes to an empty vector (no tag), and [`decode`] maps it
/// back to empty.
pub fn encode(data: &[u8], hint: DataTypeHint) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    match hint {
        DataTypeHint::QualityScore => tagged(TAG_QUALITY_RLE, rle::encode(data)),
        DataTypeHint::Generic => {
            if classify::is_nucleotide(data) {
                tagged(TAG_NUCLEOTIDE, nucleotide::encode(data))
            } else {
                tagged(TAG_PLAIN, data.to_vec())
            }
        }
    }
}

/// Decode a type-tagged payload.
///
/// Strips the leading tag and runs the matching inverse codec. Empty input
/// and unknown tags decode to an empty vector.
pub fn decode(data: &[u8]) -> Vec<u8> {
    match data.split_first() {
        Some((&TAG_NUCLEOTIDE, payload)) => nucleotide::decode(payload),
        Some((&TAG_QUALITY_RLE, payload)) => rle::decode(payload),
        Some((&TAG_PLAIN, payload)) => payload.to_vec(),
        _ => Vec::new(),
    }
}
