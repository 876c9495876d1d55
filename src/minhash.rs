
//! MinHash sketching for approximate Jaccard similarity.
//!
//! A signature holds, for each of `num_hashes` independent hash functions,
//! the minimum hash value observed over all k-mers of a sequence. The
//! fraction of agreeing slots between two signatures estimates the Jaccard
//! index of the underlying k-mer sets in O(num_hashes) instead of
//! O(set size), with a relative error on the order of 1/sqrt(num_hashes).
//!
//! The hash family is a seeded FNV-1a over uppercased k-mer bytes, one seed
//! per slot. Computation goes through the `SketchBackend` trait so a faster
//! backend can replace the pure implementation, but only after passing a
//! bit-exact self-test against it (`probe_backend`).

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::kmer::{is_unambiguous_base, reverse_complement};

/// Default k-mer length for sketching.
pub const DEFAULT_SKETCH_K: usize = 16;

/// Default signature size; 128 slots keeps the Jaccard estimate within a
/// few percent of exact for phage-sized genomes.
pub const DEFAULT_NUM_HASHES: usize = 128;

/// Fixed-size MinHash signature. Immutable once computed; two signatures
/// are only comparable when they share `(k, num_hashes, canonical)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinHashSignature {
    mins: Vec<u32>,
    k: usize,
    num_hashes: usize,
    total_kmers: u64,
    canonical: bool,
}

impl MinHashSignature {
    pub fn mins(&self) -> &[u32] {
        &self.mins
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Number of valid k-mers the signature was computed from.
    pub fn total_kmers(&self) -> u64 {
        self.total_kmers
    }

    pub fn canonical(&self) -> bool {
        self.canonical
    }

    fn family(&self) -> String {
        format!(
            "(k={}, num_hashes={}, canonical={})",
            self.k, self.num_hashes, self.canonical
        )
    }

    /// Approximate heap footprint, used for cache accounting.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.mins.len() * std::mem::size_of::<u32>()
    }
}

/// Signature and estimated-Jaccard computation, swappable for an
/// accelerated implementation.
pub trait SketchBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Compute a signature, or `None` when the sequence yields no valid
    /// k-mer (shorter than k, or entirely ambiguous).
    fn signature(
        &self,
        seq: &[u8],
        k: usize,
        num_hashes: usize,
        canonical: bool,
    ) -> Option<MinHashSignature>;

    /// Estimated Jaccard index: the fraction of signature slots where the
    /// two minima agree. Signatures from different families are rejected.
    fn jaccard(&self, a: &MinHashSignature, b: &MinHashSignature) -> EngineResult<f64> {
        if a.k != b.k
            || a.num_hashes != b.num_hashes
            || a.canonical != b.canonical
            || a.mins.len() != b.mins.len()
        {
            return Err(EngineError::IncompatibleSignatures {
                left: a.family(),
                right: b.family(),
            });
        }

        let matches = a
            .mins
            .iter()
            .zip(b.mins.iter())
            .filter(|(x, y)| x == y)
            .count();
        Ok(matches as f64 / a.num_hashes as f64)
    }
}

/// Validate sketch parameters before handing them to a backend.
pub fn check_sketch_params(k: usize, num_hashes: usize) -> EngineResult<()> {
    if k == 0 {
        return Err(EngineError::InvalidParameter(
            "sketch k-mer length must be at least 1".to_string(),
        ));
    }
    if num_hashes == 0 {
        return Err(EngineError::InvalidParameter(
            "signature size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Seeded FNV-1a over an uppercased k-mer.
#[inline]
fn fnv1a_seeded(kmer: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    for &b in kmer {
        h ^= b.to_ascii_uppercase() as u32;
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}

/// Reference implementation of `SketchBackend`; always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct PureSketcher;

impl SketchBackend for PureSketcher {
    fn name(&self) -> &'static str {
        "pure"
    }

    fn signature(
        &self,
        seq: &[u8],
        k: usize,
        num_hashes: usize,
        canonical: bool,
    ) -> Option<MinHashSignature> {
        if k == 0 || num_hashes == 0 || seq.len() < k {
            return None;
        }

        let mut mins = vec![u32::MAX; num_hashes];
        let mut total_kmers = 0u64;
        let mut buf = Vec::with_capacity(k);

        for window in seq.windows(k) {
            if window.iter().any(|&b| !is_unambiguous_base(b)) {
                continue;
            }

            buf.clear();
            buf.extend(window.iter().map(|b| b.to_ascii_uppercase()));
            if canonical {
                let rc = reverse_complement(&buf);
                if rc < buf {
                    buf = rc;
                }
            }

            total_kmers += 1;
            for (slot, min) in mins.iter_mut().enumerate() {
                let seed = (slot as u32).wrapping_mul(0x9e37_79b9);
                let h = fnv1a_seeded(&buf, seed);
                if h < *min {
                    *min = h;
                }
            }
        }

        if total_kmers == 0 {
            return None;
        }

        Some(MinHashSignature {
            mins,
            k,
            num_hashes,
            total_kmers,
            canonical,
        })
    }
}

// Fixed probe inputs with a known overlap; any backend must reproduce the
// pure implementation on these bit-exactly to be accepted.
const PROBE_SEQ_A: &[u8] = b"ACGTACGGTCATTGACCAGGTTACAGCATGCA";
const PROBE_SEQ_B: &[u8] = b"ACGTACGGTCATTGACCAGGTTACAGCATGGA";
const PROBE_K: usize = 5;
const PROBE_NUM_HASHES: usize = 32;

/// Self-test a candidate backend against the pure implementation.
///
/// Computes known signatures and a known Jaccard value on fixed inputs, in
/// both strand modes, and requires exact agreement. Callers fall back to
/// `PureSketcher` when this returns false.
pub fn probe_backend(candidate: &dyn SketchBackend) -> bool {
    let reference = PureSketcher;

    for canonical in [false, true] {
        let expected_a = reference.signature(PROBE_SEQ_A, PROBE_K, PROBE_NUM_HASHES, canonical);
        let expected_b = reference.signature(PROBE_SEQ_B, PROBE_K, PROBE_NUM_HASHES, canonical);
        let got_a = candidate.signature(PROBE_SEQ_A, PROBE_K, PROBE_NUM_HASHES, canonical);
        let got_b = candidate.signature(PROBE_SEQ_B, PROBE_K, PROBE_NUM_HASHES, canonical);

        if expected_a != got_a || expected_b != got_b {
            return false;
        }

        let (Some(ea), Some(eb)) = (expected_a, expected_b) else {
            return false;
        };

        let expected_jaccard = match reference.jaccard(&ea, &eb) {
            Ok(v) => v,
            Err(_) => return false,
        };
        match candidate.jaccard(&ea, &eb) {
            Ok(v) if v == expected_jaccard => {}
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::KmerSet;
    use crate::similarity::jaccard;

    #[test]
    fn test_signature_deterministic() {
        let sketcher = PureSketcher;
        let seq = b"ACGTACGGTCATTGACCAGG";
        let a = sketcher.signature(seq, 5, 64, false).unwrap();
        let b = sketcher.signature(seq, 5, 64, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.mins().len(), 64);
        assert_eq!(a.total_kmers(), (seq.len() - 5 + 1) as u64);
    }

    #[test]
    fn test_signature_unavailable_for_short_sequence() {
        let sketcher = PureSketcher;
        assert!(sketcher.signature(b"ACG", 5, 64, false).is_none());
        assert!(sketcher.signature(b"NNNNNNNN", 5, 64, false).is_none());
    }

    #[test]
    fn test_signature_case_insensitive() {
        let sketcher = PureSketcher;
        let upper = sketcher.signature(b"ACGTACGGTCATTGACC", 5, 32, false).unwrap();
        let lower = sketcher.signature(b"acgtacggtcattgacc", 5, 32, false).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_canonical_signature_strand_symmetry() {
        let sketcher = PureSketcher;
        let seq = b"ATGGCGTATCAGGACCATTTGGCAGGTCA";
        let fwd = sketcher.signature(seq, 6, 32, true).unwrap();
        let rev = sketcher
            .signature(&reverse_complement(seq), 6, 32, true)
            .unwrap();
        assert_eq!(fwd.mins(), rev.mins());
    }

    #[test]
    fn test_jaccard_identity() {
        let sketcher = PureSketcher;
        let sig = sketcher.signature(b"ACGTACGGTCATTGACC", 5, 64, false).unwrap();
        assert_eq!(sketcher.jaccard(&sig, &sig).unwrap(), 1.0);
    }

    #[test]
    fn test_jaccard_rejects_mismatched_families() {
        let sketcher = PureSketcher;
        let seq = b"ACGTACGGTCATTGACC";
        let a = sketcher.signature(seq, 5, 64, false).unwrap();
        let b = sketcher.signature(seq, 6, 64, false).unwrap();
        let c = sketcher.signature(seq, 5, 32, false).unwrap();
        let d = sketcher.signature(seq, 5, 64, true).unwrap();

        assert!(matches!(
            sketcher.jaccard(&a, &b),
            Err(EngineError::IncompatibleSignatures { .. })
        ));
        assert!(sketcher.jaccard(&a, &c).is_err());
        assert!(sketcher.jaccard(&a, &d).is_err());
    }

    #[test]
    fn test_minhash_estimate_converges_to_exact_jaccard() {
        // deterministic pseudo-random sequence pair with partial overlap
        let mut state = 0x2545_f491u32;
        let mut next_base = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            b"ACGT"[(state % 4) as usize]
        };

        let a: Vec<u8> = (0..4000).map(|_| next_base()).collect();
        let mut b = a.clone();
        // mutate every 100th base to create a related-but-distinct genome
        for i in (0..b.len()).step_by(100) {
            b[i] = match b[i] {
                b'A' => b'C',
                b'C' => b'G',
                b'G' => b'T',
                _ => b'A',
            };
        }

        let sketcher = PureSketcher;
        let mut errors = Vec::new();
        for k in [7usize, 8, 9] {
            let exact = jaccard(
                &KmerSet::extract(&a, k).unwrap(),
                &KmerSet::extract(&b, k).unwrap(),
            )
            .unwrap();

            let sig_a = sketcher.signature(&a, k, 256, false).unwrap();
            let sig_b = sketcher.signature(&b, k, 256, false).unwrap();
            let estimate = sketcher.jaccard(&sig_a, &sig_b).unwrap();

            assert!(
                (estimate - exact).abs() <= 0.08,
                "k={}: estimate {} too far from exact {}",
                k,
                estimate,
                exact
            );
            errors.push((estimate - exact).abs());
        }

        let mean_error = errors.iter().sum::<f64>() / errors.len() as f64;
        assert!(mean_error <= 0.05, "mean estimate error was {}", mean_error);
    }

    #[test]
    fn test_probe_accepts_pure_backend() {
        assert!(probe_backend(&PureSketcher));
    }

    #[test]
    fn test_probe_rejects_broken_backend() {
        // a backend whose hash family differs must be rejected
        struct OffByOne;
        impl SketchBackend for OffByOne {
            fn name(&self) -> &'static str {
                "off-by-one"
            }

            fn signature(
                &self,
                seq: &[u8],
                k: usize,
                num_hashes: usize,
                canonical: bool,
            ) -> Option<MinHashSignature> {
                let mut sig = PureSketcher.signature(seq, k, num_hashes, canonical)?;
                sig.mins[0] = sig.mins[0].wrapping_add(1);
                Some(sig)
            }
        }

        assert!(!probe_backend(&OffByOne));
    }
}
