//! Common types used throughout traceon

use crate::classify;

/// A decoded FASTQ lookup result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqEntry {
    /// DNA/RNA sequence
    pub sequence: String,
    /// Quality scores (Phred+33)
    pub quality: String,
}

/// Content classification of a cache, derived from its first stored record
///
/// The discriminant values are part of the v2 snapshot wire format (the
/// format byte that follows the magic), so they must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SequenceFormat {
    /// FASTA holding DNA
    DnaFasta = 0,
    /// FASTA holding RNA
    RnaFasta = 1,
    /// FASTA holding protein
    ProteinFasta = 2,
    /// FASTQ holding DNA
    DnaFastq = 3,
    /// FASTQ holding RNA
    RnaFastq = 4,
    /// FASTQ holding protein
    ProteinFastq = 5,
}

impl SequenceFormat {
    /// Parse a format byte from a v2 snapshot header
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::DnaFasta),
            1 => Some(Self::RnaFasta),
            2 => Some(Self::ProteinFasta),
            3 => Some(Self::DnaFastq),
            4 => Some(Self::RnaFastq),
            5 => Some(Self::ProteinFastq),
            _ => None,
        }
    }

    /// The wire representation of this format
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this format carries per-base quality scores
    pub fn is_fastq(self) -> bool {
        matches!(self, Self::DnaFastq | Self::RnaFastq | Self::ProteinFastq)
    }

    /// Classify a record's sequence content.
    ///
    /// The RNA check takes precedence over the nucleotide-fraction check, so
    /// any sequence containing `U`/`u` classifies as RNA.
    pub(crate) fn classify(sequence: &[u8], has_quality: bool) -> Self {
        let is_rna = classify::has_rna(sequence);
        let is_nuc = classify::is_nucleotide(sequence);
        if has_quality {
            if is_rna {
                Self::RnaFastq
            } else if is_nuc {
                Self::DnaFastq
            } else {
                Self::ProteinFastq
            }
        } else if is_rna {
            Self::RnaFasta
        } else if is_nuc {
            Self::DnaFasta
        } else {
            Self::ProteinFasta
        }
    }
}

/// One decoded record as produced by the chunk parsers.
///
/// `quality` is empty for FASTA records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OwnedRecord {
    pub id: String,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

/// An encoded record as held by the store.
///
/// Every payload starts with a codec type tag (see [`crate::codec`]), so a
/// record can be decoded without knowing how it was classified at encode
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EncodedRecord {
    /// A FASTA record: one encoded sequence payload
    Fasta(Vec<u8>),
    /// A FASTQ record: encoded sequence and encoded quality
    Fastq {
        sequence: Vec<u8>,
        quality: Vec<u8>,
    },
}

impl EncodedRecord {
    /// Bytes used by the encoded payload(s)
    pub(crate) fn stored_size(&self) -> usize {
        match self {
            Self::Fasta(data) => data.len(),
            Self::Fastq { sequence, quality } => sequence.len() + quality.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_byte_roundtrip() {
        for byte in 0..=5u8 {
            let format = SequenceFormat::from_byte(byte).unwrap();
            assert_eq!(format.as_byte(), byte);
        }
        assert_eq!(SequenceFormat::from_byte(6), None);
        assert_eq!(SequenceFormat::from_byte(0xFF), None);
    }

    #[test]
    fn classify_dna_fasta() {
        assert_eq!(
            SequenceFormat::classify(b"GATTACA", false),
            SequenceFormat::DnaFasta
        );
    }

    #[test]
    fn classify_rna_fastq() {
        assert_eq!(
            SequenceFormat::classify(b"GAUUACA", true),
            SequenceFormat::RnaFastq
        );
    }

    #[test]
    fn classify_protein() {
        assert_eq!(
            SequenceFormat::classify(b"MKWVTFISLLFLFSSAYS", false),
            SequenceFormat::ProteinFasta
        );
    }

    #[test]
    fn stored_size_sums_both_halves() {
        let rec = EncodedRecord::Fastq {
            sequence: vec![0; 7],
            quality: vec![0; 5],
        };
        assert_eq!(rec.stored_size(), 12);
    }
}
