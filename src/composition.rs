
//! Nucleotide composition statistics.
//!
//! GC content and GC skew, codon usage, dinucleotide frequency tables, and
//! linguistic complexity. These feed the HGT tracer (windowed GC scan), the
//! information-theoretic metrics (frequency tables), and the comparison
//! report. Ambiguous bases are excluded from numerator and denominator
//! throughout, never zero-filled.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{EngineError, EngineResult};
use crate::kmer::is_unambiguous_base;

/// GC content as a percentage over unambiguous bases only.
///
/// Returns 0.0 when the sequence contains no valid bases.
pub fn gc_content(seq: &[u8]) -> f64 {
    let mut gc = 0u64;
    let mut total = 0u64;

    for &b in seq {
        match b {
            b'G' | b'g' | b'C' | b'c' => {
                gc += 1;
                total += 1;
            }
            b'A' | b'a' | b'T' | b't' => {
                total += 1;
            }
            _ => {}
        }
    }

    if total == 0 {
        0.0
    } else {
        gc as f64 / total as f64 * 100.0
    }
}

/// Fraction of positions holding an unambiguous base.
pub fn valid_base_fraction(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }

    let valid = seq.iter().filter(|&&b| is_unambiguous_base(b)).count();
    valid as f64 / seq.len() as f64
}

fn check_window_step(window: usize, step: usize) -> EngineResult<()> {
    if window == 0 {
        return Err(EngineError::InvalidParameter(
            "window size must be at least 1".to_string(),
        ));
    }
    if step == 0 {
        return Err(EngineError::InvalidParameter(
            "step size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// GC skew (G-C)/(G+C) per sliding window.
///
/// Positive skew marks the leading replication strand. Windows without any
/// G or C report a skew of 0.
pub fn gc_skew(seq: &[u8], window: usize, step: usize) -> EngineResult<Vec<f64>> {
    check_window_step(window, step)?;

    if seq.len() < window {
        return Ok(Vec::new());
    }

    let num_windows = (seq.len() - window) / step + 1;
    let mut skews = Vec::with_capacity(num_windows);

    for i in 0..num_windows {
        let start = i * step;
        let mut g = 0u64;
        let mut c = 0u64;
        for &b in &seq[start..start + window] {
            match b {
                b'G' | b'g' => g += 1,
                b'C' | b'c' => c += 1,
                _ => {}
            }
        }

        let total = g + c;
        if total == 0 {
            skews.push(0.0);
        } else {
            skews.push((g as f64 - c as f64) / total as f64);
        }
    }

    Ok(skews)
}

/// Cumulative GC skew per position; its minimum marks the likely origin of
/// replication and its maximum the terminus.
pub fn cumulative_gc_skew(seq: &[u8]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(seq.len());
    let mut sum = 0.0;

    for &b in seq {
        match b {
            b'G' | b'g' => sum += 1.0,
            b'C' | b'c' => sum -= 1.0,
            _ => {}
        }
        cumulative.push(sum);
    }

    cumulative
}

/// Codon usage counts in the given reading frame (clamped to 0..=2).
///
/// Codons are uppercased; codons containing ambiguous bases are skipped.
pub fn codon_usage(seq: &[u8], frame: usize) -> FxHashMap<[u8; 3], u32> {
    let frame = frame.min(2);
    let mut counts = FxHashMap::default();

    let mut i = frame;
    while i + 3 <= seq.len() {
        let window = &seq[i..i + 3];
        if window.iter().all(|&b| is_unambiguous_base(b)) {
            let codon = [
                window[0].to_ascii_uppercase(),
                window[1].to_ascii_uppercase(),
                window[2].to_ascii_uppercase(),
            ];
            *counts.entry(codon).or_insert(0) += 1;
        }
        i += 3;
    }

    counts
}

#[inline]
fn base_index(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Dinucleotide probability table indexed as `first * 4 + second`
/// (A=0, C=1, G=2, T=3). Pairs containing ambiguous bases are skipped.
///
/// Returns the all-zero table when no valid pair exists.
pub fn dinucleotide_frequencies(seq: &[u8]) -> [f64; 16] {
    let mut counts = [0u64; 16];
    let mut total = 0u64;

    for pair in seq.windows(2) {
        if let (Some(i), Some(j)) = (base_index(pair[0]), base_index(pair[1])) {
            counts[i * 4 + j] += 1;
            total += 1;
        }
    }

    let mut freqs = [0.0; 16];
    if total > 0 {
        for (f, &c) in freqs.iter_mut().zip(counts.iter()) {
            *f = c as f64 / total as f64;
        }
    }
    freqs
}

/// Mononucleotide probability table over A,C,G,T.
pub fn nucleotide_frequencies(seq: &[u8]) -> [f64; 4] {
    let mut counts = [0u64; 4];
    let mut total = 0u64;

    for &b in seq {
        if let Some(i) = base_index(b) {
            counts[i] += 1;
            total += 1;
        }
    }

    let mut freqs = [0.0; 4];
    if total > 0 {
        for (f, &c) in freqs.iter_mut().zip(counts.iter()) {
            *f = c as f64 / total as f64;
        }
    }
    freqs
}

/// Linguistic complexity: observed distinct substrings of lengths 1..=max_k
/// over the maximum possible, in [0, 1]. Low values mark repetitive regions.
pub fn linguistic_complexity(seq: &[u8], max_k: usize) -> f64 {
    if seq.is_empty() || max_k == 0 {
        return 0.0;
    }

    let max_k = max_k.min(seq.len());
    let mut distinct = 0u64;
    let mut possible = 0u64;

    for k in 1..=max_k {
        let mut seen = FxHashSet::default();
        for window in seq.windows(k) {
            seen.insert(window);
        }
        distinct += seen.len() as u64;

        let max_kmers = 4u64
            .checked_pow(k as u32)
            .unwrap_or(u64::MAX)
            .min((seq.len() - k + 1) as u64);
        possible += max_kmers;
    }

    if possible == 0 {
        0.0
    } else {
        distinct as f64 / possible as f64
    }
}

/// Linguistic complexity per sliding window, with substring length `k`.
pub fn windowed_complexity(
    seq: &[u8],
    window: usize,
    step: usize,
    k: usize,
) -> EngineResult<Vec<f64>> {
    check_window_step(window, step)?;
    if k == 0 || k > window {
        return Err(EngineError::InvalidParameter(format!(
            "substring length {} must be in [1, window size {}]",
            k, window
        )));
    }

    if seq.len() < window {
        return Ok(Vec::new());
    }

    let num_windows = (seq.len() - window) / step + 1;
    let mut results = Vec::with_capacity(num_windows);

    for i in 0..num_windows {
        let start = i * step;
        let chunk = &seq[start..start + window];

        let mut seen = FxHashSet::default();
        for sub in chunk.windows(k) {
            seen.insert(sub);
        }

        let max_kmers = 4u64
            .checked_pow(k as u32)
            .unwrap_or(u64::MAX)
            .min((chunk.len() - k + 1) as u64) as f64;
        results.push(seen.len() as f64 / max_kmers);
    }

    Ok(results)
}
