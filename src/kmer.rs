
//! K-mer extraction from nucleotide sequences.
//!
//! Provides k-mer sets and k-mer frequency vectors with optional strand
//! canonicalization (storing the lexicographically smaller of a k-mer and
//! its reverse complement). Windows containing bases outside {A,C,G,T} are
//! skipped silently rather than raising an error, so ambiguous regions
//! simply contribute no k-mers.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{EngineError, EngineResult};

/// Return true for an unambiguous nucleotide (either case).
#[inline]
pub fn is_unambiguous_base(b: u8) -> bool {
    matches!(b, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Reverse complement of a DNA sequence, preserving case.
///
/// IUPAC ambiguity codes are complemented (R<->Y, K<->M, B<->V, D<->H,
/// S/W/N map to themselves); U is treated as T. Unknown bytes pass through.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'G' => b'C',
            b'C' => b'G',
            b'a' => b't',
            b't' => b'a',
            b'g' => b'c',
            b'c' => b'g',
            b'U' => b'A',
            b'u' => b'a',
            b'R' => b'Y',
            b'r' => b'y',
            b'Y' => b'R',
            b'y' => b'r',
            b'K' => b'M',
            b'k' => b'm',
            b'M' => b'K',
            b'm' => b'k',
            b'B' => b'V',
            b'b' => b'v',
            b'V' => b'B',
            b'v' => b'b',
            b'D' => b'H',
            b'd' => b'h',
            b'H' => b'D',
            b'h' => b'd',
            other => other,
        })
        .collect()
}

fn check_k(k: usize) -> EngineResult<()> {
    if k == 0 {
        return Err(EngineError::InvalidParameter(
            "k-mer length must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Uppercase a window into `buf`, returning false if any base is ambiguous.
#[inline]
fn upper_window(window: &[u8], buf: &mut Vec<u8>) -> bool {
    buf.clear();
    for &b in window {
        if !is_unambiguous_base(b) {
            return false;
        }
        buf.push(b.to_ascii_uppercase());
    }
    true
}

/// Set of distinct k-mers observed in a sequence.
///
/// Immutable after construction. Two sets are only comparable if they were
/// built with the same `k` and canonical setting.
#[derive(Clone, Debug)]
pub struct KmerSet {
    kmers: FxHashSet<Vec<u8>>,
    k: usize,
    canonical: bool,
}

impl KmerSet {
    /// Extract all valid k-mers of length `k` from `seq`.
    pub fn extract(seq: &[u8], k: usize) -> EngineResult<Self> {
        Self::build(seq, k, false)
    }

    /// Extract canonical k-mers: `min(kmer, reverse_complement(kmer))`.
    ///
    /// Canonical sets are strand-agnostic, which is required when comparing
    /// against reference sketches of unknown strandedness.
    pub fn extract_canonical(seq: &[u8], k: usize) -> EngineResult<Self> {
        Self::build(seq, k, true)
    }

    fn build(seq: &[u8], k: usize, canonical: bool) -> EngineResult<Self> {
        check_k(k)?;

        let mut kmers = FxHashSet::default();
        let mut buf = Vec::with_capacity(k);

        if seq.len() >= k {
            for window in seq.windows(k) {
                if !upper_window(window, &mut buf) {
                    continue;
                }

                if canonical {
                    let rc = reverse_complement(&buf);
                    if rc < buf {
                        kmers.insert(rc);
                        continue;
                    }
                }
                kmers.insert(buf.clone());
            }
        }

        Ok(KmerSet { kmers, k, canonical })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn canonical(&self) -> bool {
        self.canonical
    }

    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    pub fn contains(&self, kmer: &[u8]) -> bool {
        self.kmers.contains(kmer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.kmers.iter()
    }

    /// Number of k-mers shared with `other`.
    pub fn intersection_len(&self, other: &KmerSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|kmer| large.contains(kmer)).count()
    }
}

/// K-mer to occurrence count mapping for one sequence.
#[derive(Clone, Debug)]
pub struct KmerCounts {
    counts: FxHashMap<Vec<u8>, u32>,
    k: usize,
    canonical: bool,
}

impl KmerCounts {
    pub fn extract(seq: &[u8], k: usize) -> EngineResult<Self> {
        Self::build(seq, k, false)
    }

    pub fn extract_canonical(seq: &[u8], k: usize) -> EngineResult<Self> {
        Self::build(seq, k, true)
    }

    fn build(seq: &[u8], k: usize, canonical: bool) -> EngineResult<Self> {
        check_k(k)?;

        let mut counts = FxHashMap::default();
        let mut buf = Vec::with_capacity(k);

        if seq.len() >= k {
            for window in seq.windows(k) {
                if !upper_window(window, &mut buf) {
                    continue;
                }

                let kmer = if canonical {
                    let rc = reverse_complement(&buf);
                    if rc < buf { rc } else { buf.clone() }
                } else {
                    buf.clone()
                };

                *counts.entry(kmer).or_insert(0) += 1;
            }
        }

        Ok(KmerCounts { counts, k, canonical })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn canonical(&self) -> bool {
        self.canonical
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, kmer: &[u8]) -> u32 {
        self.counts.get(kmer).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &u32)> {
        self.counts.iter()
    }

    /// Total number of counted k-mer occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&v| v as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT");
        assert_eq!(reverse_complement(b"AAGG"), b"CCTT");
        assert_eq!(reverse_complement(b"acGT"), b"ACgt");
        assert_eq!(reverse_complement(b"ARN"), b"NYT");
    }

    #[test]
    fn test_reverse_complement_involution() {
        let seq = b"ATGGCGTANNRYACCT";
        assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
    }

    #[test]
    fn test_extract_simple() {
        let set = KmerSet::extract(b"ACGTACGT", 4).unwrap();
        // ACGT, CGTA, GTAC, TACG, ACGT -> 4 distinct
        assert_eq!(set.len(), 4);
        assert!(set.contains(b"ACGT"));
        assert!(set.contains(b"TACG"));
    }

    #[test]
    fn test_extract_uppercases() {
        let set = KmerSet::extract(b"acgtacgt", 4).unwrap();
        assert!(set.contains(b"ACGT"));
        assert!(!set.contains(b"acgt"));
    }

    #[test]
    fn test_ambiguous_windows_skipped() {
        let set = KmerSet::extract(b"ACNGT", 3).unwrap();
        assert!(set.is_empty());

        let set = KmerSet::extract(b"ACGTNACGT", 4).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(b"ACGT"));
    }

    #[test]
    fn test_sequence_shorter_than_k() {
        let set = KmerSet::extract(b"ACG", 5).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(KmerSet::extract(b"ACGT", 0).is_err());
        assert!(KmerCounts::extract(b"ACGT", 0).is_err());
    }

    #[test]
    fn test_canonical_strand_symmetry() {
        let seq = b"ATGGCGTATCAGGACCATTTGGCA";
        let fwd = KmerSet::extract_canonical(seq, 5).unwrap();
        let rev = KmerSet::extract_canonical(&reverse_complement(seq), 5).unwrap();

        assert_eq!(fwd.len(), rev.len());
        for kmer in fwd.iter() {
            assert!(rev.contains(kmer));
        }
    }

    #[test]
    fn test_canonical_picks_smaller() {
        // TTTT -> canonical AAAA
        let set = KmerSet::extract_canonical(b"TTTT", 4).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(b"AAAA"));
    }

    #[test]
    fn test_counts() {
        let counts = KmerCounts::extract(b"ACGACGACG", 3).unwrap();
        assert_eq!(counts.get(b"ACG"), 3);
        assert_eq!(counts.get(b"CGA"), 2);
        assert_eq!(counts.get(b"GAC"), 2);
        assert_eq!(counts.get(b"TTT"), 0);
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_intersection_len() {
        let a = KmerSet::extract(b"ACGTACGT", 4).unwrap();
        let b = KmerSet::extract(b"ACGTAAAA", 4).unwrap();
        // shared: ACGT, CGTA
        assert_eq!(a.intersection_len(&b), 2);
        assert_eq!(b.intersection_len(&a), 2);
    }
}
