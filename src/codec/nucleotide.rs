//! 2-bit nucleotide codec with an `N`-position side table
//!
//! # Layout
//!
//! The encoded payload is self-describing (the outer type tag is added by
//! the façade in [`crate::codec`]):
//!
//! | Offset | Size | Content |
//! |---|---|---|
//! | 0 | 4 | original length `L`, big-endian u32 |
//! | 4 | 4 | `N` count `k`, big-endian u32 |
//! | 8 | `⌈L/4⌉` | packed 2-bit codes, 4 bases per byte |
//! | 8 + ⌈L/4⌉ | `4k` | little-endian u32 positions of every `N`, ascending |
//!
//! Within a byte the first base occupies the most significant bit pair:
//! base `i` sits at shift `(3 - (i % 4)) * 2`. The headers are big-endian
//! while the `N` table is little-endian; both are fixed wire contracts and
//! must survive any refactor, since snapshots embed these payloads.
//!
//! # Normalization
//!
//! The mapping is `A→00, C→01, G→10, T/U→11`, case-insensitive. Everything
//! else packs as `00`. Decoding emits uppercase and rewrites the positions
//! in the `N` table back to `N`, so:
//!
//! - case is collapsed (all output is uppercase)
//! - `U` decodes as `T` (lossy for RNA)
//! - IUPAC ambiguity codes other than `N` come back as `A`
//!
//! Callers that need byte-exact storage use the plain codec instead.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Fixed header size: 4-byte length plus 4-byte `N` count
const HEADER_SIZE: usize = 8;

fn base_to_bits(base: u8) -> u8 {
    match base {
        b'A' | b'a' => 0b00,
        b'C' | b'c' => 0b01,
        b'G' | b'g' => 0b10,
        b'T' | b't' | b'U' | b'u' => 0b11,
        _ => 0b00,
    }
}

fn bits_to_base(bits: u8) -> u8 {
    match bits {
        0b00 => b'A',
        0b01 => b'C',
        0b10 => b'G',
        _ => b'T',
    }
}

/// Encode a nucleotide sequence into the packed representation.
///
/// Sequences longer than `u32::MAX` bases are not representable in the wire
/// format and are truncated to fit; in practice chromosome-scale inputs stay
/// well below that.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let original_length = data.len().min(u32::MAX as usize);
    let data = &data[..original_length];

    let n_positions: Vec<u32> = data
        .iter()
        .enumerate()
        .filter(|(_, &b)| b == b'N' || b == b'n')
        .map(|(i, _)| i as u32)
        .collect();

    let packed_size = original_length.div_ceil(4);
    let mut encoded = vec![0u8; HEADER_SIZE + packed_size + 4 * n_positions.len()];

    BigEndian::write_u32(&mut encoded[0..4], original_length as u32);
    BigEndian::write_u32(&mut encoded[4..8], n_positions.len() as u32);

    for (i, &base) in data.iter().enumerate() {
        let shift = (3 - (i % 4)) * 2;
        encoded[HEADER_SIZE + i / 4] |= base_to_bits(base) << shift;
    }

    let table_start = HEADER_SIZE + packed_size;
    for (slot, &pos) in n_positions.iter().enumerate() {
        LittleEndian::write_u32(&mut encoded[table_start + 4 * slot..][..4], pos);
    }

    encoded
}

/// Decode a packed payload back into an uppercase nucleotide sequence.
///
/// Truncated payloads (a header shorter than 8 bytes, or a packed region /
/// `N` table shorter than the headers promise) decode to an empty vector
/// rather than reading out of bounds.
pub fn decode(data: &[u8]) -> Vec<u8> {
    if data.len() < HEADER_SIZE {
        return Vec::new();
    }

    let original_length = BigEndian::read_u32(&data[0..4]) as usize;
    let n_count = BigEndian::read_u32(&data[4..8]) as usize;
    let packed_size = original_length.div_ceil(4);

    if data.len() < HEADER_SIZE + packed_size + 4 * n_count {
        return Vec::new();
    }

    let mut decoded = Vec::with_capacity(original_length);
    for i in 0..original_length {
        let shift = (3 - (i % 4)) * 2;
        let bits = (data[HEADER_SIZE + i / 4] >> shift) & 0b11;
        decoded.push(bits_to_base(bits));
    }

    let table_start = HEADER_SIZE + packed_size;
    for slot in 0..n_count {
        let pos = LittleEndian::read_u32(&data[table_start + 4 * slot..][..4]) as usize;
        if pos < decoded.len() {
            decoded[pos] = b'N';
        }
    }

    decoded
}
