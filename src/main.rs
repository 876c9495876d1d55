
//! Main entry point for the phagecomp application.
//!
//! This file handles command-line parsing, logging setup, and orchestration
//! of the three analysis commands: pairwise genome comparison, horizontal
//! gene transfer tracing against a panel of reference genomes, and
//! gene-order synteny alignment. Genomes are read from FASTA files and gene
//! annotations from TSV tables; results are written to the output directory
//! as TSV and JSON.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use num_format::{Locale, ToFormattedString};

use crate::cancel::CancelToken;
use crate::cli::{Cli, Command, CompareArgs, HgtArgs, SyntenyArgs};
use crate::compare::{CompareOptions, compare_genomes};
use crate::hgt::{HgtOptions, ReferencePanel, trace};
use crate::io_utils::{fasta_files_in_dir, genome_id_from_filename, parse_gene_table, read_genome};
use crate::logging::setup_logger;
use crate::sketch_cache::SketchEngine;
use crate::synteny::align;

mod cancel;
mod cli;
pub mod compare;
pub mod composition;
pub mod entropy;
pub mod errors;
pub mod genes;
pub mod hgt;
pub mod io_utils;
pub mod kmer;
pub mod logging;
pub mod minhash;
pub mod progress;
pub mod similarity;
pub mod sketch_cache;
pub mod synteny;

/// Common initialization required by all commands.
fn init(threads: usize) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    info!("{} v{}", env!("CARGO_PKG_NAME"), VERSION);
    info!("{}", env::args().collect::<Vec<String>>().join(" "));

    info!("Using {} threads.", threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    Ok(())
}

fn run_compare(args: &CompareArgs) -> Result<()> {
    let query = read_genome(&args.query)?;
    let subject = read_genome(&args.subject)?;
    info!(
        "Query {}: {} bp; subject {}: {} bp.",
        genome_id_from_filename(&args.query),
        query.len().to_formatted_string(&Locale::en),
        genome_id_from_filename(&args.subject),
        subject.len().to_formatted_string(&Locale::en)
    );

    let opts = CompareOptions {
        k: args.kmer_length,
        num_hashes: args.num_hashes,
    };
    let mut engine = SketchEngine::new();
    let report = compare_genomes(&query, &subject, &opts, &mut engine)?;

    info!(
        "Jaccard: {:.4}; ANI: {:.2}%{}; dinucleotide JSD: {:.4}.",
        report.jaccard,
        report.ani.ani * 100.0,
        if report.ani.low_confidence {
            " (low confidence)"
        } else {
            ""
        },
        report.dinucleotide_jsd
    );

    let out_file = File::create(args.out_dir.join("comparison.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(out_file), &report)
        .context("Failed to write comparison report")?;

    Ok(())
}

fn run_hgt(args: &HgtArgs) -> Result<()> {
    let genome = read_genome(&args.query)?;
    info!(
        "Genome {}: {} bp.",
        genome_id_from_filename(&args.query),
        genome.len().to_formatted_string(&Locale::en)
    );

    let genes = match &args.genes {
        Some(gene_table) => {
            let genes = parse_gene_table(gene_table)?;
            info!("Loaded {} gene annotations.", genes.len());
            genes
        }
        None => Vec::new(),
    };

    let opts = HgtOptions {
        window: args.window,
        step: args.step,
        z_threshold: args.z_threshold,
        min_valid_ratio: args.min_valid_ratio,
        k: args.kmer_length,
        num_hashes: args.num_hashes,
    };

    let mut engine = SketchEngine::new();

    let panel = match &args.references {
        Some(ref_dir) => {
            let paths = fasta_files_in_dir(ref_dir)?;
            if paths.is_empty() {
                return Err(anyhow::anyhow!(
                    "No FASTA files found in reference directory."
                ));
            }

            info!("Sketching {} reference genomes:", paths.len());
            let references: Vec<(String, Vec<u8>)> = paths
                .iter()
                .map(|path| Ok((genome_id_from_filename(path), read_genome(path)?)))
                .collect::<Result<_>>()?;
            ReferencePanel::build_parallel(references, &mut engine, &opts)?
        }
        None => {
            info!("No reference genomes supplied; donor inference will be skipped.");
            ReferencePanel::new()
        }
    };

    let analysis = trace(&genome, &genes, &panel, &mut engine, &opts, &CancelToken::new())?;
    info!(
        "Genome GC: {:.2}%; {} islands detected.",
        analysis.genome_gc,
        analysis.islands.len()
    );

    let cache = engine.cache_stats();
    info!(
        "Signature cache: {} entries, {:.1}% hit rate, ~{} bytes.",
        cache.entries,
        cache.hit_rate * 100.0,
        cache.approx_bytes.to_formatted_string(&Locale::en)
    );

    // per-island TSV summary
    let islands_out = File::create(args.out_dir.join("hgt_islands.tsv"))?;
    let mut islands_writer = BufWriter::new(islands_out);
    writeln!(
        islands_writer,
        "start\tend\tgc_percent\tz_score\tnum_genes\thallmarks\tbest_donor\tbest_similarity\tamelioration"
    )?;
    for (island, stamp) in analysis.islands.iter().zip(&analysis.stamps) {
        let (best_donor, best_similarity) = match &stamp.best_donor {
            Some(donor) => (donor.taxon.as_str(), format!("{:.4}", donor.similarity)),
            None => ("-", "-".to_string()),
        };
        writeln!(
            islands_writer,
            "{}\t{}\t{:.2}\t{:.2}\t{}\t{}\t{}\t{}\t{}",
            island.start,
            island.end,
            island.gc_percent,
            island.z_score,
            island.genes.len(),
            island.hallmarks.join(","),
            best_donor,
            best_similarity,
            stamp.amelioration
        )?;
    }

    let report_out = File::create(args.out_dir.join("hgt_report.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(report_out), &analysis)
        .context("Failed to write HGT report")?;

    Ok(())
}

fn run_synteny(args: &SyntenyArgs) -> Result<()> {
    let genes_a = parse_gene_table(&args.genes_a)?;
    let genes_b = parse_gene_table(&args.genes_b)?;
    info!(
        "Aligning {} genes against {} genes.",
        genes_a.len(),
        genes_b.len()
    );

    let analysis = align(&genes_a, &genes_b, &CancelToken::new());
    info!(
        "{} syntenic blocks, {} breakpoints; genome A coverage: {:.1}%.",
        analysis.blocks.len(),
        analysis.breakpoints.len(),
        analysis.global_score * 100.0
    );

    let blocks_out = File::create(args.out_dir.join("synteny_blocks.tsv"))?;
    let mut blocks_writer = BufWriter::new(blocks_out);
    writeln!(
        blocks_writer,
        "start_a\tend_a\tstart_b\tend_b\tscore\torientation"
    )?;
    for block in &analysis.blocks {
        writeln!(
            blocks_writer,
            "{}\t{}\t{}\t{}\t{:.4}\t{}",
            block.start_a, block.end_a, block.start_b, block.end_b, block.score, block.orientation
        )?;
    }

    let analysis_out = File::create(args.out_dir.join("synteny.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(analysis_out), &analysis)
        .context("Failed to write synteny analysis")?;

    Ok(())
}

fn main() -> Result<()> {
    let start = Instant::now();

    let args = Cli::parse();

    let (out_dir, threads) = match &args.command {
        Command::Compare(cmd) => (cmd.out_dir.clone(), 1),
        Command::Hgt(cmd) => (cmd.out_dir.clone(), cmd.threads),
        Command::Synteny(cmd) => (cmd.out_dir.clone(), 1),
    };

    std::fs::create_dir_all(&out_dir)?;
    setup_logger(&out_dir)?;
    init(threads)?;

    match &args.command {
        Command::Compare(cmd) => run_compare(cmd)?,
        Command::Hgt(cmd) => run_hgt(cmd)?,
        Command::Synteny(cmd) => run_synteny(cmd)?,
    }

    info!("Elapsed time (sec): {:.2}", start.elapsed().as_secs_f32());
    info!("Done.");

    Ok(())
}
