
//! Pairwise genome comparison report.
//!
//! Thin orchestration over the k-mer, similarity, MinHash, and entropy
//! modules: build the k-mer structures once, compute every pairwise metric,
//! and return one serializable report.

use serde::Serialize;

use crate::composition::dinucleotide_frequencies;
use crate::entropy::js_divergence_from_counts;
use crate::errors::EngineResult;
use crate::kmer::{KmerCounts, KmerSet};
use crate::minhash::{DEFAULT_NUM_HASHES, DEFAULT_SKETCH_K};
use crate::similarity::{
    AniEstimate, ani_estimate, bray_curtis, containment, cosine, hoeffdings_d, jaccard,
    spearman_rho,
};
use crate::sketch_cache::SketchEngine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompareOptions {
    pub k: usize,
    pub num_hashes: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            k: DEFAULT_SKETCH_K,
            num_hashes: DEFAULT_NUM_HASHES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub k: usize,
    pub unique_kmers_a: usize,
    pub unique_kmers_b: usize,
    pub shared_kmers: usize,
    pub jaccard: f64,
    pub containment_a_in_b: f64,
    pub containment_b_in_a: f64,
    pub cosine_similarity: f64,
    pub bray_curtis_dissimilarity: f64,
    /// MinHash estimate of the Jaccard index; absent when either sequence
    /// is too short to sketch.
    pub minhash_jaccard: Option<f64>,
    pub dinucleotide_jsd: f64,
    /// Rank correlation of the two dinucleotide profiles.
    pub dinucleotide_spearman: f64,
    /// Hoeffding's D dependence of the two dinucleotide profiles.
    pub dinucleotide_hoeffding_d: f64,
    pub ani: AniEstimate,
}

/// Compare two genomes across every pairwise metric.
pub fn compare_genomes(
    seq_a: &[u8],
    seq_b: &[u8],
    opts: &CompareOptions,
    engine: &mut SketchEngine,
) -> EngineResult<ComparisonReport> {
    let set_a = KmerSet::extract(seq_a, opts.k)?;
    let set_b = KmerSet::extract(seq_b, opts.k)?;
    let counts_a = KmerCounts::extract(seq_a, opts.k)?;
    let counts_b = KmerCounts::extract(seq_b, opts.k)?;

    let sig_a = engine.signature_for(seq_a, None, opts.k, opts.num_hashes, false)?;
    let sig_b = engine.signature_for(seq_b, None, opts.k, opts.num_hashes, false)?;
    let minhash_jaccard = match (sig_a, sig_b) {
        (Some(a), Some(b)) => Some(engine.jaccard(&a, &b)?),
        _ => None,
    };

    let di_a = dinucleotide_frequencies(seq_a);
    let di_b = dinucleotide_frequencies(seq_b);

    Ok(ComparisonReport {
        k: opts.k,
        unique_kmers_a: set_a.len(),
        unique_kmers_b: set_b.len(),
        shared_kmers: set_a.intersection_len(&set_b),
        jaccard: jaccard(&set_a, &set_b)?,
        containment_a_in_b: containment(&set_a, &set_b)?,
        containment_b_in_a: containment(&set_b, &set_a)?,
        cosine_similarity: cosine(&counts_a, &counts_b)?,
        bray_curtis_dissimilarity: bray_curtis(&counts_a, &counts_b)?,
        minhash_jaccard,
        dinucleotide_jsd: js_divergence_from_counts(&di_a, &di_b)?,
        dinucleotide_spearman: spearman_rho(&di_a, &di_b),
        dinucleotide_hoeffding_d: hoeffdings_d(&di_a, &di_b),
        ani: ani_estimate(&set_a, &set_b)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_genomes() {
        let seq = b"ACGTACGGTCATTGACCAGGTTACAGCATG".repeat(20);
        let mut engine = SketchEngine::new();
        let opts = CompareOptions { k: 8, num_hashes: 64 };

        let report = compare_genomes(&seq, &seq, &opts, &mut engine).unwrap();
        assert_relative_eq!(report.jaccard, 1.0);
        assert_relative_eq!(report.containment_a_in_b, 1.0);
        assert_relative_eq!(report.cosine_similarity, 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.bray_curtis_dissimilarity, 0.0);
        assert_relative_eq!(report.minhash_jaccard.unwrap(), 1.0);
        assert_relative_eq!(report.dinucleotide_jsd, 0.0);
        assert_relative_eq!(report.ani.ani, 1.0);
        assert_eq!(report.shared_kmers, report.unique_kmers_a);
    }

    #[test]
    fn test_disjoint_genomes() {
        let a = b"AAAAAAAAAAAAAAAAAAAA".to_vec();
        let b = b"CCCCCCCCCCCCCCCCCCCC".to_vec();
        let mut engine = SketchEngine::new();
        let opts = CompareOptions { k: 6, num_hashes: 64 };

        let report = compare_genomes(&a, &b, &opts, &mut engine).unwrap();
        assert_relative_eq!(report.jaccard, 0.0);
        assert_eq!(report.shared_kmers, 0);
        assert_relative_eq!(report.minhash_jaccard.unwrap(), 0.0);
        assert!(report.ani.low_confidence);
        assert_relative_eq!(report.ani.ani, 0.0);
    }

    #[test]
    fn test_short_sequence_drops_minhash_only() {
        let a = b"ACG".to_vec();
        let b = b"ACGTACGGTCATTGACC".to_vec();
        let mut engine = SketchEngine::new();
        let opts = CompareOptions { k: 5, num_hashes: 32 };

        let report = compare_genomes(&a, &b, &opts, &mut engine).unwrap();
        assert!(report.minhash_jaccard.is_none());
        assert_relative_eq!(report.jaccard, 0.0);
    }
}
