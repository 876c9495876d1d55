
//! Gene-order synteny alignment via dynamic time warping.
//!
//! Two ordered gene lists are aligned with DTW rather than classic sequence
//! alignment: gene order is monotonic, but gaps carry no fixed penalty
//! structure here. Gene-to-gene distance is a coarse token overlap on
//! name/product text. Traceback extracts contiguous runs of good diagonal
//! matches as syntenic blocks; everything else registers as a breakpoint.
//!
//! Inverted (reverse-strand) blocks are not detected; every block reports
//! forward orientation. Detecting inversions would change block semantics
//! and is deliberately left out.

use itertools::Itertools;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::genes::Gene;

/// Gene distance below which a diagonal step can belong to a block.
pub const BLOCK_DISTANCE_CUTOFF: f64 = 0.8;

/// Tolerance when matching a traceback cell against its predecessors.
const TIE_EPSILON: f64 = 1e-6;

/// Lowercased annotation text and its term list, derived once per gene.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneToken {
    full: String,
    terms: Vec<String>,
}

impl GeneToken {
    /// Tokenize a gene's name (or product, when unnamed): lowercase, split
    /// on non-alphanumerics, keep terms of two or more characters.
    pub fn from_gene(gene: &Gene) -> Self {
        let full = gene
            .name
            .as_deref()
            .or(gene.product.as_deref())
            .unwrap_or("")
            .to_lowercase();

        let terms = full
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() >= 2)
            .map(|t| t.to_string())
            .collect();

        GeneToken { full, terms }
    }

    fn shares_term(&self, other: &GeneToken) -> bool {
        self.terms.iter().any(|t| other.terms.contains(t))
    }
}

/// Token-overlap distance: 0 for identical text, 0.5 for any shared term,
/// 1 otherwise. A gene without name or product is distance 1 to anything.
pub fn gene_distance(a: &GeneToken, b: &GeneToken) -> f64 {
    if a.full.is_empty() || b.full.is_empty() {
        return 1.0;
    }
    if a.full == b.full {
        return 0.0;
    }
    if a.shares_term(b) {
        return 0.5;
    }
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Forward,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Forward => write!(f, "forward"),
        }
    }
}

/// A run of consecutive diagonal matches; index ranges are inclusive and
/// strictly increasing in both genomes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyntenyBlock {
    pub start_a: usize,
    pub end_a: usize,
    pub start_b: usize,
    pub end_b: usize,
    /// Mean match quality (1 - gene distance) across the block.
    pub score: f64,
    pub orientation: Orientation,
}

impl SyntenyBlock {
    fn len_a(&self) -> usize {
        self.end_a - self.start_a + 1
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyntenyAnalysis {
    pub blocks: Vec<SyntenyBlock>,
    /// Genome-A indices where a new block begins after a break.
    pub breakpoints: Vec<usize>,
    /// Fraction of genome A covered by syntenic blocks; a coverage ratio,
    /// not a normalized alignment score.
    pub global_score: f64,
    /// Raw cumulative DTW cost; comparable only between alignments of the
    /// same two genomes.
    pub dtw_distance: f64,
    pub cancelled: bool,
}

impl SyntenyAnalysis {
    fn empty(cancelled: bool) -> Self {
        SyntenyAnalysis {
            blocks: Vec::new(),
            breakpoints: Vec::new(),
            global_score: 0.0,
            dtw_distance: f64::INFINITY,
            cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Diagonal,
    Up,
    Left,
}

/// Align two ordered gene lists.
///
/// Either list empty yields the empty analysis (infinite distance, zero
/// coverage) rather than an error. Cancellation is checked between DTW
/// rows; a cancelled alignment reports no blocks.
pub fn align(genes_a: &[Gene], genes_b: &[Gene], cancel: &CancelToken) -> SyntenyAnalysis {
    let n = genes_a.len();
    let m = genes_b.len();
    if n == 0 || m == 0 {
        return SyntenyAnalysis::empty(false);
    }

    let tokens_a: Vec<GeneToken> = genes_a.iter().map(GeneToken::from_gene).collect();
    let tokens_b: Vec<GeneToken> = genes_b.iter().map(GeneToken::from_gene).collect();
    let dist = |i: usize, j: usize| gene_distance(&tokens_a[i], &tokens_b[j]);

    // DTW matrix with an infinite boundary except the origin
    let cols = m + 1;
    let mut dtw = vec![f64::INFINITY; (n + 1) * cols];
    dtw[0] = 0.0;

    for i in 1..=n {
        if cancel.is_cancelled() {
            return SyntenyAnalysis::empty(true);
        }

        for j in 1..=m {
            let best = dtw[(i - 1) * cols + j - 1]
                .min(dtw[(i - 1) * cols + j])
                .min(dtw[i * cols + j - 1]);
            dtw[i * cols + j] = dist(i - 1, j - 1) + best;
        }
    }

    let dtw_distance = dtw[n * cols + m];

    // traceback; ties resolved diagonal > insertion > deletion
    let mut path: Vec<(usize, usize, Step)> = Vec::with_capacity(n + m);
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        let diag = dtw[(i - 1) * cols + j - 1];
        let up = dtw[(i - 1) * cols + j];
        let left = dtw[i * cols + j - 1];
        let best = diag.min(up).min(left);

        let step = if (diag - best).abs() < TIE_EPSILON {
            Step::Diagonal
        } else if (up - best).abs() < TIE_EPSILON {
            Step::Up
        } else {
            Step::Left
        };

        path.push((i - 1, j - 1, step));
        match step {
            Step::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Step::Up => i -= 1,
            Step::Left => j -= 1,
        }
    }
    path.reverse();

    // extract blocks: consecutive diagonal steps under the distance cutoff
    let mut blocks: Vec<SyntenyBlock> = Vec::new();
    let mut open: Option<(usize, usize, usize, usize, f64, usize)> = None;

    for &(ai, bi, step) in &path {
        let matched = step == Step::Diagonal && dist(ai, bi) < BLOCK_DISTANCE_CUTOFF;

        if matched {
            let contiguous = match open {
                Some((_, end_a, _, end_b, _, _)) => ai == end_a + 1 && bi == end_b + 1,
                None => false,
            };

            if contiguous {
                let entry = open.as_mut().expect("open block checked above");
                entry.1 = ai;
                entry.3 = bi;
                entry.4 += 1.0 - dist(ai, bi);
                entry.5 += 1;
            } else {
                if let Some(block) = open.take() {
                    blocks.push(close_block(block));
                }
                open = Some((ai, ai, bi, bi, 1.0 - dist(ai, bi), 1));
            }
        } else if let Some(block) = open.take() {
            blocks.push(close_block(block));
        }
    }
    if let Some(block) = open.take() {
        blocks.push(close_block(block));
    }

    let breakpoints = blocks
        .iter()
        .tuple_windows()
        .map(|(_, next)| next.start_a)
        .collect();

    let covered: usize = blocks.iter().map(|b| b.len_a()).sum();

    SyntenyAnalysis {
        blocks,
        breakpoints,
        global_score: covered as f64 / n as f64,
        dtw_distance,
        cancelled: false,
    }
}

fn close_block(
    (start_a, end_a, start_b, end_b, score_sum, steps): (usize, usize, usize, usize, f64, usize),
) -> SyntenyBlock {
    SyntenyBlock {
        start_a,
        end_a,
        start_b,
        end_b,
        score: score_sum / steps as f64,
        orientation: Orientation::Forward,
    }
}
