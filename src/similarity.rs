
//! Pairwise similarity and distance metrics over k-mer sets, frequency
//! vectors, and raw sequences.
//!
//! Set metrics (Jaccard, containment) and vector metrics (cosine,
//! Bray-Curtis) operate on the structures from the `kmer` module. Edit
//! distance is exact up to a length threshold and switches to a banded
//! approximation beyond it. The ANI estimate is derived from k-mer
//! containment and flagged as low confidence when too few k-mers are shared
//! for the estimate to be significant.

use serde::Serialize;

use crate::errors::{EngineError, EngineResult};
use crate::kmer::{KmerCounts, KmerSet};

/// Shared k-mer count below which an ANI estimate is marked low confidence.
pub const ANI_MIN_SHARED_KMERS: usize = 100;

/// Sequence length above which `levenshtein_auto` switches to the banded
/// approximation.
pub const EXACT_EDIT_DISTANCE_LIMIT: usize = 10_000;

fn check_set_compat(a: &KmerSet, b: &KmerSet) -> EngineResult<()> {
    if a.k() != b.k() || a.canonical() != b.canonical() {
        return Err(EngineError::InvalidParameter(format!(
            "cannot compare k-mer sets built with (k={}, canonical={}) and (k={}, canonical={})",
            a.k(),
            a.canonical(),
            b.k(),
            b.canonical()
        )));
    }
    Ok(())
}

/// Jaccard index |A n B| / |A u B|.
///
/// Defined as 0 when both sets are empty and 0 when exactly one is empty.
pub fn jaccard(a: &KmerSet, b: &KmerSet) -> EngineResult<f64> {
    check_set_compat(a, b)?;

    if a.is_empty() || b.is_empty() {
        return Ok(0.0);
    }

    let intersection = a.intersection_len(b);
    let union = a.len() + b.len() - intersection;
    Ok(intersection as f64 / union as f64)
}

/// Directional containment |A n B| / |A|; 0 when A is empty.
pub fn containment(a: &KmerSet, b: &KmerSet) -> EngineResult<f64> {
    check_set_compat(a, b)?;

    if a.is_empty() {
        return Ok(0.0);
    }

    Ok(a.intersection_len(b) as f64 / a.len() as f64)
}

fn check_counts_compat(a: &KmerCounts, b: &KmerCounts) -> EngineResult<()> {
    if a.k() != b.k() || a.canonical() != b.canonical() {
        return Err(EngineError::InvalidParameter(format!(
            "cannot compare k-mer counts built with (k={}, canonical={}) and (k={}, canonical={})",
            a.k(),
            a.canonical(),
            b.k(),
            b.canonical()
        )));
    }
    Ok(())
}

/// Cosine similarity over frequency vectors aligned on the union of
/// observed k-mers; missing k-mers contribute 0.
pub fn cosine(a: &KmerCounts, b: &KmerCounts) -> EngineResult<f64> {
    check_counts_compat(a, b)?;

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (kmer, &count_a) in a.iter() {
        let ca = count_a as f64;
        dot += ca * b.get(kmer) as f64;
        norm_a += ca * ca;
    }
    for (_, &count_b) in b.iter() {
        let cb = count_b as f64;
        norm_b += cb * cb;
    }

    if norm_a > 0.0 && norm_b > 0.0 {
        Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
    } else {
        Ok(0.0)
    }
}

/// Bray-Curtis dissimilarity over frequency vectors; 0 for identical
/// profiles, 1 for disjoint ones.
pub fn bray_curtis(a: &KmerCounts, b: &KmerCounts) -> EngineResult<f64> {
    check_counts_compat(a, b)?;

    let mut sum_diff = 0.0;
    let mut sum_total = 0.0;

    for (kmer, &count_a) in a.iter() {
        let ca = count_a as f64;
        let cb = b.get(kmer) as f64;
        sum_diff += (ca - cb).abs();
        sum_total += ca + cb;
    }
    for (kmer, &count_b) in b.iter() {
        if a.get(kmer) == 0 {
            let cb = count_b as f64;
            sum_diff += cb;
            sum_total += cb;
        }
    }

    if sum_total > 0.0 {
        Ok(sum_diff / sum_total)
    } else {
        Ok(0.0)
    }
}

/// Exact Levenshtein edit distance, two-row O(n*m) dynamic program with
/// O(min(n, m)) memory.
pub fn levenshtein(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // keep the shorter sequence in the cost row
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut costs: Vec<usize> = (0..=short.len()).collect();

    for (j, &cb) in long.iter().enumerate() {
        let mut prev_diag = costs[0];
        costs[0] = j + 1;

        for (i, &ca) in short.iter().enumerate() {
            let insertion = costs[i];
            let deletion = costs[i + 1];
            let substitution = if ca == cb { prev_diag } else { prev_diag + 1 };

            prev_diag = deletion;
            costs[i + 1] = substitution.min(insertion + 1).min(deletion + 1);
        }
    }

    costs[short.len()]
}

/// Banded Levenshtein approximation: cells farther than `band` from the
/// diagonal are treated as unreachable. Exact while the optimal path stays
/// inside the band, an overestimate otherwise.
pub fn levenshtein_banded(a: &[u8], b: &[u8], band: usize) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let n = a.len();
    let m = b.len();
    let band = band.max(n.abs_diff(m));

    const UNREACHED: usize = usize::MAX / 2;
    let mut prev = vec![UNREACHED; m + 1];
    let mut curr = vec![UNREACHED; m + 1];

    for (j, cell) in prev.iter_mut().enumerate().take(band.min(m) + 1) {
        *cell = j;
    }

    for i in 1..=n {
        curr.fill(UNREACHED);
        let lo = i.saturating_sub(band);
        let hi = (i + band).min(m);

        if lo == 0 {
            curr[0] = i;
        }

        for j in lo.max(1)..=hi {
            let sub_cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j - 1] + sub_cost)
                .min(prev[j] + 1)
                .min(curr[j - 1] + 1);
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Edit distance with an exactness marker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditDistance {
    pub distance: usize,
    /// False when the banded approximation was used; the distance is then an
    /// estimate, not the exact edit distance.
    pub exact: bool,
}

/// Exact edit distance for short sequences, banded approximation beyond
/// `EXACT_EDIT_DISTANCE_LIMIT`.
pub fn levenshtein_auto(a: &[u8], b: &[u8]) -> EditDistance {
    if a.len().max(b.len()) <= EXACT_EDIT_DISTANCE_LIMIT {
        EditDistance {
            distance: levenshtein(a, b),
            exact: true,
        }
    } else {
        EditDistance {
            distance: levenshtein_banded(a, b, 64),
            exact: false,
        }
    }
}

/// Average ranks (1-based) with ties assigned the mean of their positions.
pub fn average_rank(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }

    let mut indexed: Vec<(usize, f64)> = data.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        let mut rank_sum = 0.0;
        while j < n && indexed[j].1 == indexed[i].1 {
            rank_sum += (j + 1) as f64;
            j += 1;
        }

        let avg = rank_sum / (j - i) as f64;
        for item in &indexed[i..j] {
            ranks[item.0] = avg;
        }
        i = j;
    }

    ranks
}

/// Spearman rank correlation: Pearson correlation of tie-averaged ranks.
///
/// Returns 0 for vectors shorter than 2, mismatched lengths, or zero rank
/// variance.
pub fn spearman_rho(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n != y.len() || n < 2 {
        return 0.0;
    }

    let rx = average_rank(x);
    let ry = average_rank(y);

    let mean = (n as f64 + 1.0) / 2.0;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = rx[i] - mean;
        let dy = ry[i] - mean;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x > 0.0 && var_y > 0.0 {
        cov / (var_x.sqrt() * var_y.sqrt())
    } else {
        0.0
    }
}

/// Hoeffding's D statistic of dependence between two observation vectors.
///
/// Non-parametric; detects non-monotonic relationships that rank
/// correlation misses. Approximately in [-0.5, 1], near 0 under
/// independence. Returns 0 for fewer than 5 observations. O(n^2).
pub fn hoeffdings_d(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n != y.len() || n < 5 {
        return 0.0;
    }
    let nf = n as f64;

    let r = average_rank(x);
    let s = average_rank(y);

    // Q[i] counts points concordantly below point i, with tie corrections
    let mut q = vec![0.0; n];
    for i in 0..n {
        let mut less_both = 0.0;
        let mut equal_both = 0.0;
        let mut equal_r = 0.0;
        let mut equal_s = 0.0;

        for j in 0..n {
            if i == j {
                continue;
            }
            if r[j] < r[i] && s[j] < s[i] {
                less_both += 1.0;
            } else if r[j] == r[i] && s[j] == s[i] {
                equal_both += 1.0;
            } else if r[j] == r[i] && s[j] < s[i] {
                equal_r += 1.0;
            } else if r[j] < r[i] && s[j] == s[i] {
                equal_s += 1.0;
            }
        }

        q[i] = 1.0 + less_both + 0.25 * equal_both + 0.5 * (equal_r + equal_s);
    }

    let d1: f64 = q.iter().map(|&qi| (qi - 1.0) * (qi - 3.0)).sum();
    let d2: f64 = r
        .iter()
        .zip(s.iter())
        .map(|(&ri, &si)| (ri - 1.0) * (ri - 2.0) * (si - 1.0) * (si - 2.0))
        .sum();
    let d3: f64 = r
        .iter()
        .zip(s.iter())
        .zip(q.iter())
        .map(|((&ri, &si), &qi)| (ri - 1.0) * (si - 1.0) * (qi - 1.0))
        .sum();

    let denom = nf * (nf - 1.0) * (nf - 2.0) * (nf - 3.0) * (nf - 4.0);
    if denom.abs() < 1e-10 {
        return 0.0;
    }

    30.0 * ((nf - 2.0) * (nf - 3.0) * d1 + d2 - 2.0 * (nf - 2.0) * d3) / denom
}

/// ANI estimate derived from k-mer containment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AniEstimate {
    /// Estimated identity in [0, 1].
    pub ani: f64,
    pub shared_kmers: usize,
    /// Set when fewer than `ANI_MIN_SHARED_KMERS` k-mers are shared and the
    /// estimate should not be trusted.
    pub low_confidence: bool,
}

/// ANI from the identity-vs-containment relationship `ANI = C^(1/k)`.
pub fn ani_from_containment(containment: f64, k: usize, shared_kmers: usize) -> AniEstimate {
    let ani = if containment > 0.0 {
        containment.powf(1.0 / k as f64)
    } else {
        0.0
    };

    AniEstimate {
        ani,
        shared_kmers,
        low_confidence: shared_kmers < ANI_MIN_SHARED_KMERS,
    }
}

/// ANI estimate between two k-mer sets, using the containment of the
/// smaller set in the larger.
pub fn ani_estimate(a: &KmerSet, b: &KmerSet) -> EngineResult<AniEstimate> {
    check_set_compat(a, b)?;

    let shared = a.intersection_len(b);
    let smaller = a.len().min(b.len());
    let containment = if smaller > 0 {
        shared as f64 / smaller as f64
    } else {
        0.0
    };

    Ok(ani_from_containment(containment, a.k(), shared))
}
