//! Content classification for sequence data
//!
//! The cache needs to know two things about a sequence: whether it is
//! nucleotide data (so the 2-bit codec applies) and whether it contains
//! uracil (so DNA and RNA can be told apart). Both checks look at raw
//! bytes; non-alphabetic characters are ignored by the fraction test.
//!
//! Classification runs once per ingest, on the first stored record, not per
//! record. A file mixing DNA and protein records takes its format tag from
//! whichever record happens to be classified first.

/// Alphabetic-character fraction above which a sequence counts as nucleotide
const NUCLEOTIDE_THRESHOLD: f64 = 0.80;

/// Decide whether a byte string looks like nucleotide data.
///
/// Of the alphabetic characters in `data`, more than 80 % must be in
/// `{A, T, G, C, U, N}` (case-insensitive). Returns `false` when there is
/// no alphabetic character at all, so empty and purely numeric inputs fall
/// through to the plain codec.
///
/// # Examples
///
/// ```
/// use traceon::classify::is_nucleotide;
///
/// assert!(is_nucleotide(b"GATTACA"));
/// assert!(is_nucleotide(b"gattaca"));
/// assert!(!is_nucleotide(b"MKWVTFISLLFLFSSAYS"));
/// assert!(!is_nucleotide(b""));
/// ```
pub fn is_nucleotide(data: &[u8]) -> bool {
    let mut alphabetic = 0usize;
    let mut nucleotide = 0usize;
    for &b in data {
        if b.is_ascii_alphabetic() {
            alphabetic += 1;
            if matches!(
                b.to_ascii_uppercase(),
                b'A' | b'T' | b'G' | b'C' | b'U' | b'N'
            ) {
                nucleotide += 1;
            }
        }
    }
    alphabetic > 0 && (nucleotide as f64) / (alphabetic as f64) > NUCLEOTIDE_THRESHOLD
}

/// Whether a sequence contains uracil (`U`/`u`), marking it as RNA
pub fn has_rna(data: &[u8]) -> bool {
    data.iter().any(|&b| b == b'U' || b == b'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_is_nucleotide() {
        assert!(is_nucleotide(b"ACGTACGTACGT"));
        assert!(is_nucleotide(b"ACGTNNNNACGT"));
    }

    #[test]
    fn rna_is_nucleotide() {
        assert!(is_nucleotide(b"ACGUACGU"));
        assert!(has_rna(b"ACGUACGU"));
        assert!(has_rna(b"acgu"));
        assert!(!has_rna(b"ACGT"));
    }

    #[test]
    fn protein_is_not_nucleotide() {
        // Typical amino-acid alphabet fails the 80 % threshold
        assert!(!is_nucleotide(b"MKWVTFISLLFLFSSAYSRGVFRR"));
    }

    #[test]
    fn threshold_is_strict() {
        // Exactly 80 % nucleotide letters must NOT pass (the test is
        // strictly greater than)
        assert!(!is_nucleotide(b"ACGTX"));
        // 5 of 6 alphabetic = 83 % passes
        assert!(is_nucleotide(b"ACGTAX"));
    }

    #[test]
    fn requires_an_alphabetic_character() {
        assert!(!is_nucleotide(b""));
        assert!(!is_nucleotide(b"1234"));
        assert!(!is_nucleotide(b"    "));
    }

    #[test]
    fn non_alphabetic_bytes_are_ignored() {
        // Gaps and digits do not count against the fraction
        assert!(is_nucleotide(b"ACGT-ACGT-ACGT"));
    }
}
