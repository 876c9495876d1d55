
//! Information-theoretic sequence statistics.
//!
//! Shannon entropy, KL and Jensen-Shannon divergence, cross-entropy, mutual
//! information, and a deflate-based normalized compression distance. All
//! logarithms are base 2, so entropies are in bits and the JS divergence is
//! bounded by [0, 1]. Zero-probability bins are handled with additive
//! smoothing where a log of zero would otherwise occur.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;

use crate::errors::{EngineError, EngineResult};

/// Additive smoothing applied to zero-probability bins in KL-style sums.
const SMOOTHING_EPS: f64 = 1e-10;

/// Shannon entropy of a probability distribution, in bits.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
    let mut entropy = 0.0;
    for &p in probs {
        if p > 0.0 && p <= 1.0 {
            entropy -= p * p.log2();
        }
    }

    // numerical precision can leave a tiny negative residue
    entropy.max(0.0)
}

/// Shannon entropy from raw counts; normalizes internally.
pub fn shannon_entropy_from_counts(counts: &[f64]) -> f64 {
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &c in counts {
        if c > 0.0 {
            let p = c / total;
            entropy -= p * p.log2();
        }
    }
    entropy.max(0.0)
}

fn check_same_alphabet(p: &[f64], q: &[f64]) -> EngineResult<()> {
    if p.len() != q.len() || p.is_empty() {
        return Err(EngineError::InvalidParameter(format!(
            "distributions must be non-empty and over the same alphabet (got {} and {} bins)",
            p.len(),
            q.len()
        )));
    }
    Ok(())
}

/// Smooth and renormalize a distribution so every bin is positive.
fn smoothed(dist: &[f64]) -> Vec<f64> {
    let total: f64 = dist.iter().map(|&p| p.max(0.0) + SMOOTHING_EPS).sum();
    dist.iter()
        .map(|&p| (p.max(0.0) + SMOOTHING_EPS) / total)
        .collect()
}

/// Kullback-Leibler divergence KL(P || Q), in bits.
///
/// Asymmetric: measures the cost of coding P with Q's code. Both
/// distributions are epsilon-smoothed, so zero bins in Q do not produce an
/// infinite divergence.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> EngineResult<f64> {
    check_same_alphabet(p, q)?;

    let ps = smoothed(p);
    let qs = smoothed(q);

    let mut kl = 0.0;
    for (pi, qi) in ps.iter().zip(qs.iter()) {
        kl += pi * (pi / qi).log2();
    }
    Ok(kl.max(0.0))
}

/// Jensen-Shannon divergence: symmetrized, bounded to [0, 1].
///
/// `JSD(P, Q) = 0.5 KL(P || M) + 0.5 KL(Q || M)` with `M = (P + Q) / 2`.
pub fn js_divergence(p: &[f64], q: &[f64]) -> EngineResult<f64> {
    check_same_alphabet(p, q)?;

    let mut jsd = 0.0;
    for (&pi, &qi) in p.iter().zip(q.iter()) {
        let pi = pi.max(0.0);
        let qi = qi.max(0.0);
        let mi = 0.5 * (pi + qi);

        if mi > 0.0 {
            if pi > 0.0 {
                jsd += 0.5 * pi * (pi / mi).log2();
            }
            if qi > 0.0 {
                jsd += 0.5 * qi * (qi / mi).log2();
            }
        }
    }

    Ok(jsd.clamp(0.0, 1.0))
}

/// Jensen-Shannon divergence from two count tables over the same alphabet.
pub fn js_divergence_from_counts(counts_a: &[f64], counts_b: &[f64]) -> EngineResult<f64> {
    check_same_alphabet(counts_a, counts_b)?;

    let total_a: f64 = counts_a.iter().sum();
    let total_b: f64 = counts_b.iter().sum();

    if total_a <= 0.0 || total_b <= 0.0 {
        // no observations on one side: identical-empty is 0, otherwise maximal
        return Ok(if total_a <= 0.0 && total_b <= 0.0 { 0.0 } else { 1.0 });
    }

    let p: Vec<f64> = counts_a.iter().map(|&c| c / total_a).collect();
    let q: Vec<f64> = counts_b.iter().map(|&c| c / total_b).collect();
    js_divergence(&p, &q)
}

/// Cross-entropy H(P, Q) = -sum p log2 q, with smoothing on both sides.
pub fn cross_entropy(p: &[f64], q: &[f64]) -> EngineResult<f64> {
    check_same_alphabet(p, q)?;

    let ps = smoothed(p);
    let qs = smoothed(q);

    let mut h = 0.0;
    for (pi, qi) in ps.iter().zip(qs.iter()) {
        h -= pi * qi.log2();
    }
    Ok(h.max(0.0))
}

/// Mutual information of a joint distribution given as a row-major
/// `rows x cols` table, in bits. The table is normalized internally.
pub fn mutual_information(joint: &[f64], rows: usize, cols: usize) -> EngineResult<f64> {
    if rows == 0 || cols == 0 || joint.len() != rows * cols {
        return Err(EngineError::InvalidParameter(format!(
            "joint table length {} does not match {} x {}",
            joint.len(),
            rows,
            cols
        )));
    }

    let total: f64 = joint.iter().map(|&v| v.max(0.0)).sum();
    if total <= 0.0 {
        return Ok(0.0);
    }

    let mut row_marginal = vec![0.0; rows];
    let mut col_marginal = vec![0.0; cols];
    for r in 0..rows {
        for c in 0..cols {
            let p = joint[r * cols + c].max(0.0) / total;
            row_marginal[r] += p;
            col_marginal[c] += p;
        }
    }

    let mut mi = 0.0;
    for r in 0..rows {
        for c in 0..cols {
            let p = joint[r * cols + c].max(0.0) / total;
            if p > 0.0 && row_marginal[r] > 0.0 && col_marginal[c] > 0.0 {
                mi += p * (p / (row_marginal[r] * col_marginal[c])).log2();
            }
        }
    }

    Ok(mi.max(0.0))
}

fn deflate_len(data: &[u8]) -> usize {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    // writing to a Vec cannot fail
    encoder.write_all(data).expect("deflate write failed");
    encoder.finish().expect("deflate finish failed").len()
}

/// Normalized compression distance between two byte sequences, in [0, 1].
///
/// `NCD(a, b) = (C(ab) - min(C(a), C(b))) / max(C(a), C(b))` with deflate as
/// the compressor. 0 for two empty inputs.
pub fn normalized_compression_distance(a: &[u8], b: &[u8]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let ca = deflate_len(a);
    let cb = deflate_len(b);

    let mut ab = Vec::with_capacity(a.len() + b.len());
    ab.extend_from_slice(a);
    ab.extend_from_slice(b);
    let cab = deflate_len(&ab);

    let min = ca.min(cb);
    let max = ca.max(cb);
    if max == 0 {
        return 0.0;
    }

    ((cab.saturating_sub(min)) as f64 / max as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shannon_entropy_uniform() {
        assert_relative_eq!(shannon_entropy(&[0.25; 4]), 2.0);
        assert_relative_eq!(shannon_entropy(&[1.0, 0.0]), 0.0);
        assert_relative_eq!(shannon_entropy(&[]), 0.0);
    }

    #[test]
    fn test_shannon_entropy_from_counts() {
        assert_relative_eq!(shannon_entropy_from_counts(&[5.0, 5.0]), 1.0);
        assert_relative_eq!(shannon_entropy_from_counts(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_kl_divergence() {
        let p = [0.8, 0.1, 0.1];
        let q = [0.4, 0.4, 0.2];
        let pq = kl_divergence(&p, &q).unwrap();
        let qp = kl_divergence(&q, &p).unwrap();
        assert!(pq > 0.0);
        assert!(qp > 0.0);
        assert!((pq - qp).abs() > 1e-6); // direction matters
        assert_relative_eq!(kl_divergence(&p, &p).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kl_divergence_zero_bins_finite() {
        let p = [1.0, 0.0];
        let q = [0.0, 1.0];
        let kl = kl_divergence(&p, &q).unwrap();
        assert!(kl.is_finite());
        assert!(kl > 10.0); // large but finite under smoothing
    }

    #[test]
    fn test_kl_divergence_alphabet_mismatch() {
        assert!(kl_divergence(&[0.5, 0.5], &[1.0]).is_err());
    }

    #[test]
    fn test_js_divergence_bounds() {
        let p = [1.0, 0.0];
        let q = [0.0, 1.0];
        assert_relative_eq!(js_divergence(&p, &q).unwrap(), 1.0);
        assert_relative_eq!(js_divergence(&p, &p).unwrap(), 0.0);

        // symmetric
        let a = [0.6, 0.3, 0.1];
        let b = [0.2, 0.5, 0.3];
        assert_relative_eq!(
            js_divergence(&a, &b).unwrap(),
            js_divergence(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_js_divergence_from_counts() {
        assert_relative_eq!(js_divergence_from_counts(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_relative_eq!(js_divergence_from_counts(&[5.0, 0.0], &[0.0, 0.0]).unwrap(), 1.0);
        assert_relative_eq!(js_divergence_from_counts(&[5.0, 5.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cross_entropy_lower_bound() {
        let p = [0.7, 0.3];
        let q = [0.3, 0.7];
        // H(P, Q) >= H(P), equality iff P == Q
        assert!(cross_entropy(&p, &q).unwrap() > shannon_entropy(&p));
        assert_relative_eq!(
            cross_entropy(&p, &p).unwrap(),
            shannon_entropy(&p),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_mutual_information() {
        // independent joint: MI = 0
        let independent = [0.25, 0.25, 0.25, 0.25];
        assert_relative_eq!(mutual_information(&independent, 2, 2).unwrap(), 0.0);

        // perfectly dependent: MI = 1 bit
        let dependent = [0.5, 0.0, 0.0, 0.5];
        assert_relative_eq!(mutual_information(&dependent, 2, 2).unwrap(), 1.0);

        assert!(mutual_information(&[0.5], 2, 2).is_err());
    }

    #[test]
    fn test_ncd_bounds() {
        assert_relative_eq!(normalized_compression_distance(b"", b""), 0.0);

        let a = b"ACGTACGTACGTACGTACGTACGTACGTACGT".repeat(8);
        let same = normalized_compression_distance(&a, &a);
        assert!(same < 0.35, "self NCD was {}", same);

        let b: Vec<u8> = (0..256u32).map(|i| (i % 251) as u8).collect();
        let diff = normalized_compression_distance(&a, &b);
        assert!(diff > same);
        assert!((0.0..=1.0).contains(&diff));
    }
}
