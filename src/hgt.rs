
//! Horizontal gene transfer tracing.
//!
//! The tracer walks a genome in three stages: a sliding-window GC z-score
//! scan, a single-pass merge of anomalous windows into genomic islands, and
//! per-island annotation plus donor inference against a panel of reference
//! sketches. Each stage is a public entry point so a host event loop can
//! interleave work between them; `trace` runs all stages back-to-back.
//!
//! Donor inference compares island subsequences against references via
//! MinHash signatures when available and falls back to exact canonical
//! k-mer Jaccard otherwise. Amelioration is a coarse heuristic age class
//! derived from how far an island's GC has relaxed toward the genome
//! baseline; it is not a dated estimate.

use log::info;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::composition::{gc_content, valid_base_fraction};
use crate::errors::{EngineError, EngineResult};
use crate::genes::Gene;
use crate::kmer::KmerSet;
use crate::minhash::{DEFAULT_NUM_HASHES, DEFAULT_SKETCH_K, MinHashSignature};
use crate::progress::progress_bar;
use crate::similarity::jaccard;
use crate::sketch_cache::SketchEngine;

/// Gene name/product substrings marking mobility- and lysogeny-associated
/// functions typically carried on transferred islands.
pub const HALLMARK_KEYWORDS: [&str; 12] = [
    "integrase",
    "transposase",
    "recombinase",
    "lysogeny",
    "tail fiber",
    "tail spike",
    "trna",
    "capsid",
    "portal",
    "terminase",
    "restriction",
    "methyltransferase",
];

/// Maximum number of donor candidates retained per island.
pub const MAX_DONOR_CANDIDATES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HgtOptions {
    /// Sliding window length in bp.
    pub window: usize,
    /// Step between window starts in bp.
    pub step: usize,
    /// |z| at which a window is considered anomalous.
    pub z_threshold: f64,
    /// Minimum fraction of unambiguous bases for a window to be scored.
    pub min_valid_ratio: f64,
    /// K-mer length for donor inference sketches.
    pub k: usize,
    /// Signature size for donor inference sketches.
    pub num_hashes: usize,
}

impl Default for HgtOptions {
    fn default() -> Self {
        HgtOptions {
            window: 2000,
            step: 1000,
            z_threshold: 2.0,
            min_valid_ratio: 0.5,
            k: DEFAULT_SKETCH_K,
            num_hashes: DEFAULT_NUM_HASHES,
        }
    }
}

impl HgtOptions {
    pub fn validate(&self) -> EngineResult<()> {
        if self.window == 0 {
            return Err(EngineError::InvalidParameter(
                "window size must be at least 1".to_string(),
            ));
        }
        if self.step == 0 {
            return Err(EngineError::InvalidParameter(
                "step size must be at least 1".to_string(),
            ));
        }
        if self.z_threshold <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "z-score threshold must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_valid_ratio) {
            return Err(EngineError::InvalidParameter(
                "minimum valid-base ratio must be in [0, 1]".to_string(),
            ));
        }
        if self.k == 0 || self.num_hashes == 0 {
            return Err(EngineError::InvalidParameter(
                "sketch parameters must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One scored sliding window; consumed immediately by island merging.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WindowStat {
    pub start: usize,
    pub end: usize,
    pub gc_percent: f64,
    pub z_score: f64,
}

/// Heuristic age class of a transfer, from GC relaxation toward the host
/// baseline. Not a dated estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Amelioration {
    Recent,
    Intermediate,
    Ancient,
    Unknown,
}

impl std::fmt::Display for Amelioration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Amelioration::Recent => "recent",
            Amelioration::Intermediate => "intermediate",
            Amelioration::Ancient => "ancient",
            Amelioration::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

impl Amelioration {
    /// Classify from the absolute GC difference between island and genome.
    pub fn classify(island_gc: f64, genome_gc: f64) -> Self {
        let delta = (island_gc - genome_gc).abs();
        if delta > 5.0 {
            Amelioration::Recent
        } else if delta > 2.0 {
            Amelioration::Intermediate
        } else if delta > 0.0 {
            Amelioration::Ancient
        } else {
            Amelioration::Unknown
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity > 0.3 {
            Confidence::High
        } else if similarity > 0.15 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DonorEvidence {
    Kmer,
    MinHash,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DonorCandidate {
    pub taxon: String,
    pub similarity: f64,
    pub confidence: Confidence,
    pub evidence: DonorEvidence,
}

/// A contiguous composition-anomaly region, finalized once emitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenomicIsland {
    pub start: usize,
    pub end: usize,
    pub gc_percent: f64,
    pub z_score: f64,
    pub genes: Vec<Gene>,
    pub hallmarks: Vec<String>,
    pub donors: Vec<DonorCandidate>,
    pub amelioration: Amelioration,
}

/// Running-average accumulator used only while merging windows.
struct IslandBuilder {
    start: usize,
    end: usize,
    gc_percent: f64,
    z_score: f64,
    windows: usize,
}

impl IslandBuilder {
    fn open(window: &WindowStat) -> Self {
        IslandBuilder {
            start: window.start,
            end: window.end,
            gc_percent: window.gc_percent,
            z_score: window.z_score,
            windows: 1,
        }
    }

    fn extend(&mut self, window: &WindowStat) {
        let n = self.windows as f64;
        self.gc_percent = (self.gc_percent * n + window.gc_percent) / (n + 1.0);
        self.z_score = (self.z_score * n + window.z_score) / (n + 1.0);
        self.end = self.end.max(window.end);
        self.windows += 1;
    }

    fn emit(self) -> GenomicIsland {
        GenomicIsland {
            start: self.start,
            end: self.end,
            gc_percent: self.gc_percent,
            z_score: self.z_score,
            genes: Vec::new(),
            hallmarks: Vec::new(),
            donors: Vec::new(),
            amelioration: Amelioration::Unknown,
        }
    }
}

/// Per-island summary row of the HGT report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PassportStamp {
    pub island_start: usize,
    pub island_end: usize,
    pub best_donor: Option<DonorCandidate>,
    pub donors: Vec<DonorCandidate>,
    pub amelioration: Amelioration,
    pub gc_delta: f64,
    pub hallmark_genes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HgtAnalysis {
    pub genome_gc: f64,
    pub islands: Vec<GenomicIsland>,
    pub stamps: Vec<PassportStamp>,
    pub cancelled: bool,
}

/// A named reference genome with its precomputed canonical sketch.
pub struct ReferenceEntry {
    label: String,
    sequence: Vec<u8>,
    signature: Option<MinHashSignature>,
}

/// Panel of candidate donor genomes used for island donor inference.
#[derive(Default)]
pub struct ReferencePanel {
    entries: Vec<ReferenceEntry>,
}

impl ReferencePanel {
    pub fn new() -> Self {
        ReferencePanel::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one reference, sketching it through the engine cache under its
    /// label so repeated analyses skip rehashing.
    pub fn add(
        &mut self,
        label: &str,
        sequence: Vec<u8>,
        engine: &mut SketchEngine,
        opts: &HgtOptions,
    ) -> EngineResult<()> {
        let signature =
            engine.signature_for(&sequence, Some(label), opts.k, opts.num_hashes, true)?;
        self.entries.push(ReferenceEntry {
            label: label.to_string(),
            sequence,
            signature,
        });
        Ok(())
    }

    /// Sketch many references in parallel, then populate the engine cache
    /// after the join (the cache sees no concurrent writers).
    pub fn build_parallel(
        references: Vec<(String, Vec<u8>)>,
        engine: &mut SketchEngine,
        opts: &HgtOptions,
    ) -> EngineResult<Self> {
        opts.validate()?;

        let progress = progress_bar(references.len() as u64);
        let backend = engine.backend();
        let entries: Vec<ReferenceEntry> = references
            .into_par_iter()
            .map(|(label, sequence)| {
                let signature = backend.signature(&sequence, opts.k, opts.num_hashes, true);
                progress.inc(1);
                ReferenceEntry {
                    label,
                    sequence,
                    signature,
                }
            })
            .collect();
        progress.finish();

        for entry in &entries {
            if let Some(sig) = &entry.signature {
                engine.cache_signature(&entry.label, sig.clone());
            }
        }

        Ok(ReferencePanel { entries })
    }
}

/// Stage 1: score sliding windows by GC z-score.
///
/// Windows with too few unambiguous bases are dropped entirely. The
/// population standard deviation is floored to 1 so near-uniform genomes do
/// not produce divide-by-zero z-scores. Returns the windows scored so far
/// when cancelled; an empty vec when no window is valid.
pub fn scan_windows(
    seq: &[u8],
    opts: &HgtOptions,
    cancel: &CancelToken,
) -> EngineResult<Vec<WindowStat>> {
    opts.validate()?;

    if seq.len() < opts.window {
        return Ok(Vec::new());
    }

    let mut raw = Vec::new();
    let mut start = 0;
    while start + opts.window <= seq.len() {
        if cancel.is_cancelled() {
            break;
        }

        let end = start + opts.window;
        let chunk = &seq[start..end];
        if valid_base_fraction(chunk) >= opts.min_valid_ratio {
            raw.push((start, end, gc_content(chunk)));
        }
        start += opts.step;
    }

    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let n = raw.len() as f64;
    let mean = raw.iter().map(|&(_, _, gc)| gc).sum::<f64>() / n;
    let variance = raw
        .iter()
        .map(|&(_, _, gc)| (gc - mean) * (gc - mean))
        .sum::<f64>()
        / n;
    let sigma = variance.sqrt().max(1.0);

    Ok(raw
        .into_iter()
        .map(|(start, end, gc)| WindowStat {
            start,
            end,
            gc_percent: gc,
            z_score: (gc - mean) / sigma,
        })
        .collect())
}

/// Stage 2: merge positionally adjacent anomalous windows into islands.
///
/// A single left-to-right pass with one open island at most: a window with
/// `|z| >= z_threshold` opens or extends the island with a count-weighted
/// running average of gc/z; any other window closes it.
pub fn merge_islands(windows: &[WindowStat], z_threshold: f64) -> Vec<GenomicIsland> {
    let mut islands = Vec::new();
    let mut open: Option<IslandBuilder> = None;

    for window in windows {
        if window.z_score.abs() >= z_threshold {
            match open.as_mut() {
                Some(island) => island.extend(window),
                None => open = Some(IslandBuilder::open(window)),
            }
        } else if let Some(island) = open.take() {
            islands.push(island.emit());
        }
    }

    if let Some(island) = open.take() {
        islands.push(island.emit());
    }

    islands
}

/// Stage 3a: attach overlapping genes and flag hallmark annotations.
pub fn annotate_islands(islands: &mut [GenomicIsland], genes: &[Gene]) {
    for island in islands.iter_mut() {
        for gene in genes {
            if !gene.overlaps(island.start, island.end) {
                continue;
            }

            let text = gene.annotation_text().to_lowercase();
            if HALLMARK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
                island.hallmarks.push(gene.label().to_string());
            }
            island.genes.push(gene.clone());
        }
    }
}

/// Stage 3b: rank donor candidates for every island.
///
/// Islands are compared against each panel entry by MinHash signature when
/// both sides have one, else by exact canonical k-mer Jaccard. With an
/// empty panel every island keeps an empty donor list. Cancellation is
/// checked between islands; remaining islands keep empty lists.
pub fn infer_donors(
    islands: &mut [GenomicIsland],
    seq: &[u8],
    panel: &ReferencePanel,
    engine: &mut SketchEngine,
    opts: &HgtOptions,
    cancel: &CancelToken,
) -> EngineResult<()> {
    if panel.is_empty() {
        return Ok(());
    }

    for island in islands.iter_mut() {
        if cancel.is_cancelled() {
            break;
        }

        let island_seq = &seq[island.start..island.end.min(seq.len())];
        let island_sig =
            engine.signature_for(island_seq, None, opts.k, opts.num_hashes, true)?;
        let mut island_kmers: Option<KmerSet> = None;

        let mut donors = Vec::with_capacity(panel.entries.len());
        for entry in &panel.entries {
            let (similarity, evidence) = match (&island_sig, &entry.signature) {
                (Some(sig), Some(ref_sig)) => {
                    (engine.jaccard(sig, ref_sig)?, DonorEvidence::MinHash)
                }
                _ => {
                    // exact fallback when either side is too short to sketch
                    if island_kmers.is_none() {
                        island_kmers = Some(KmerSet::extract_canonical(island_seq, opts.k)?);
                    }
                    let ref_kmers = KmerSet::extract_canonical(&entry.sequence, opts.k)?;
                    let island_kmers = island_kmers.as_ref().expect("island k-mers just built");
                    (jaccard(island_kmers, &ref_kmers)?, DonorEvidence::Kmer)
                }
            };

            donors.push(DonorCandidate {
                taxon: entry.label.clone(),
                similarity,
                confidence: Confidence::from_similarity(similarity),
                evidence,
            });
        }

        donors.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        donors.truncate(MAX_DONOR_CANDIDATES);
        island.donors = donors;
    }

    Ok(())
}

/// Stage 4: classify amelioration and build the per-island passport stamps.
pub fn finalize_islands(islands: &mut [GenomicIsland], genome_gc: f64) -> Vec<PassportStamp> {
    let mut stamps = Vec::with_capacity(islands.len());

    for island in islands.iter_mut() {
        island.amelioration = Amelioration::classify(island.gc_percent, genome_gc);

        stamps.push(PassportStamp {
            island_start: island.start,
            island_end: island.end,
            best_donor: island.donors.first().cloned(),
            donors: island.donors.clone(),
            amelioration: island.amelioration,
            gc_delta: island.gc_percent - genome_gc,
            hallmark_genes: island.hallmarks.clone(),
        });
    }

    stamps
}

/// Run all tracer stages back-to-back.
pub fn trace(
    seq: &[u8],
    genes: &[Gene],
    panel: &ReferencePanel,
    engine: &mut SketchEngine,
    opts: &HgtOptions,
    cancel: &CancelToken,
) -> EngineResult<HgtAnalysis> {
    opts.validate()?;

    let genome_gc = gc_content(seq);
    let windows = scan_windows(seq, opts, cancel)?;
    let mut islands = merge_islands(&windows, opts.z_threshold);
    info!(
        "GC scan: {} valid windows, {} candidate islands.",
        windows.len(),
        islands.len()
    );

    annotate_islands(&mut islands, genes);
    infer_donors(&mut islands, seq, panel, engine, opts, cancel)?;
    let stamps = finalize_islands(&mut islands, genome_gc);

    Ok(HgtAnalysis {
        genome_gc,
        islands,
        stamps,
        cancelled: cancel.is_cancelled(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genes::Strand;

    /// 50% GC background with a 90% GC insert at [8000, 11000).
    fn synthetic_genome() -> Vec<u8> {
        let mut seq = b"ATGC".repeat(2000); // 8000 bp, 50% GC
        seq.extend(b"GGGGGCCCCA".repeat(300)); // 3000 bp, 90% GC
        seq.extend(b"ATGC".repeat(2250)); // 9000 bp, 50% GC
        seq
    }

    fn gene(id: &str, product: &str, start: usize, end: usize) -> Gene {
        Gene {
            id: id.to_string(),
            name: None,
            product: Some(product.to_string()),
            locus_tag: None,
            start,
            end,
            strand: Strand::Forward,
        }
    }

    #[test]
    fn test_synthetic_island_bracketed() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let cancel = CancelToken::new();

        let windows = scan_windows(&seq, &opts, &cancel).unwrap();
        let islands = merge_islands(&windows, opts.z_threshold);

        assert_eq!(islands.len(), 1, "expected exactly one island");
        assert_eq!(islands[0].start, 8000);
        assert_eq!(islands[0].end, 11000);
        assert!(islands[0].gc_percent > 80.0);
        assert!(islands[0].z_score > 2.0);
    }

    #[test]
    fn test_tracer_idempotent() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let mut engine = SketchEngine::new();
        let panel = ReferencePanel::new();
        let cancel = CancelToken::new();

        let first = trace(&seq, &[], &panel, &mut engine, &opts, &cancel).unwrap();
        let second = trace(&seq, &[], &panel, &mut engine, &opts, &cancel).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_sequence_yields_no_islands() {
        let opts = HgtOptions::default();
        let cancel = CancelToken::new();

        let windows = scan_windows(b"ACGTACGT", &opts, &cancel).unwrap();
        assert!(windows.is_empty());
        assert!(merge_islands(&windows, opts.z_threshold).is_empty());
    }

    #[test]
    fn test_ambiguous_windows_dropped() {
        let opts = HgtOptions::default();
        let cancel = CancelToken::new();

        // entirely ambiguous: no valid window, no error
        let seq = vec![b'N'; 10_000];
        let windows = scan_windows(&seq, &opts, &cancel).unwrap();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let cancel = CancelToken::new();
        let mut opts = HgtOptions::default();
        opts.window = 0;
        assert!(scan_windows(b"ACGT", &opts, &cancel).is_err());

        let mut opts = HgtOptions::default();
        opts.step = 0;
        assert!(scan_windows(b"ACGT", &opts, &cancel).is_err());
    }

    #[test]
    fn test_merge_running_average_and_adjacency() {
        let windows = [
            WindowStat { start: 0, end: 2000, gc_percent: 70.0, z_score: 3.0 },
            WindowStat { start: 1000, end: 3000, gc_percent: 80.0, z_score: 5.0 },
            WindowStat { start: 2000, end: 4000, gc_percent: 50.0, z_score: 0.1 },
            WindowStat { start: 3000, end: 5000, gc_percent: 20.0, z_score: -4.0 },
        ];

        let islands = merge_islands(&windows, 2.0);
        assert_eq!(islands.len(), 2);

        assert_eq!(islands[0].start, 0);
        assert_eq!(islands[0].end, 3000);
        assert!((islands[0].gc_percent - 75.0).abs() < 1e-9);
        assert!((islands[0].z_score - 4.0).abs() < 1e-9);

        // a closing window separates islands even when later windows qualify
        assert_eq!(islands[1].start, 3000);
        assert_eq!(islands[1].end, 5000);
    }

    #[test]
    fn test_annotation_and_hallmarks() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let cancel = CancelToken::new();

        let genes = vec![
            gene("g1", "phage integrase", 8100, 9000),
            gene("g2", "hypothetical protein", 9200, 9800),
            gene("g3", "DNA polymerase", 2000, 3000), // outside the island
        ];

        let windows = scan_windows(&seq, &opts, &cancel).unwrap();
        let mut islands = merge_islands(&windows, opts.z_threshold);
        annotate_islands(&mut islands, &genes);

        assert_eq!(islands[0].genes.len(), 2);
        assert_eq!(islands[0].hallmarks, vec!["phage integrase".to_string()]);
    }

    #[test]
    fn test_donor_inference_ranks_references() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let mut engine = SketchEngine::new();
        let cancel = CancelToken::new();

        let mut panel = ReferencePanel::new();
        panel
            .add("donor_phage", b"GGGGGCCCCA".repeat(400), &mut engine, &opts)
            .unwrap();
        panel
            .add("unrelated_phage", b"ATATATATTA".repeat(400), &mut engine, &opts)
            .unwrap();

        let analysis = trace(&seq, &[], &panel, &mut engine, &opts, &cancel).unwrap();
        assert_eq!(analysis.islands.len(), 1);

        let donors = &analysis.islands[0].donors;
        assert_eq!(donors.len(), 2);
        assert_eq!(donors[0].taxon, "donor_phage");
        assert!(donors[0].similarity > donors[1].similarity);
        assert_eq!(donors[0].confidence, Confidence::High);
        assert_eq!(donors[0].evidence, DonorEvidence::MinHash);

        let stamp = &analysis.stamps[0];
        assert_eq!(stamp.best_donor.as_ref().unwrap().taxon, "donor_phage");
        assert!(stamp.gc_delta > 0.0);
        assert_eq!(stamp.amelioration, Amelioration::Recent);
    }

    #[test]
    fn test_donor_list_truncated_and_sorted() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let mut engine = SketchEngine::new();
        let cancel = CancelToken::new();

        let mut panel = ReferencePanel::new();
        for i in 0..8 {
            // references with varying overlap against the island pattern
            let mut refseq = b"GGGGGCCCCA".repeat(50 * (8 - i));
            refseq.extend(b"ATGC".repeat(100 * i));
            panel
                .add(&format!("ref_{}", i), refseq, &mut engine, &opts)
                .unwrap();
        }

        let analysis = trace(&seq, &[], &panel, &mut engine, &opts, &cancel).unwrap();
        let donors = &analysis.islands[0].donors;

        assert!(donors.len() <= MAX_DONOR_CANDIDATES);
        for pair in donors.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_no_references_yields_empty_donor_lists() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let mut engine = SketchEngine::new();
        let cancel = CancelToken::new();

        let analysis =
            trace(&seq, &[], &ReferencePanel::new(), &mut engine, &opts, &cancel).unwrap();
        assert_eq!(analysis.islands.len(), 1);
        assert!(analysis.islands[0].donors.is_empty());
        assert!(!analysis.cancelled);
    }

    #[test]
    fn test_cancelled_scan_returns_flagged_partial() {
        let seq = synthetic_genome();
        let opts = HgtOptions::default();
        let mut engine = SketchEngine::new();
        let cancel = CancelToken::new();
        cancel.cancel();

        let analysis =
            trace(&seq, &[], &ReferencePanel::new(), &mut engine, &opts, &cancel).unwrap();
        assert!(analysis.cancelled);
        assert!(analysis.islands.is_empty());
    }

    #[test]
    fn test_amelioration_classes() {
        assert_eq!(Amelioration::classify(60.0, 50.0), Amelioration::Recent);
        assert_eq!(Amelioration::classify(53.0, 50.0), Amelioration::Intermediate);
        assert_eq!(Amelioration::classify(51.0, 50.0), Amelioration::Ancient);
        assert_eq!(Amelioration::classify(50.0, 50.0), Amelioration::Unknown);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_similarity(0.5), Confidence::High);
        assert_eq!(Confidence::from_similarity(0.2), Confidence::Medium);
        assert_eq!(Confidence::from_similarity(0.1), Confidence::Low);
    }
}
