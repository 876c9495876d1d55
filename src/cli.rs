
//! Command-line interface definition for the phagecomp application.
//!
//! Defines the `Cli` struct and its subcommands with the `clap` crate:
//! `compare` for pairwise genome reports, `hgt` for horizontal gene
//! transfer tracing against reference genomes, and `synteny` for gene-order
//! alignment. Custom value parsers validate k-mer length, signature size,
//! window geometry, and thread count. Help output is styled with `anstyle`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const DEFAULT_K: usize = 16;
const DEFAULT_NUM_HASHES: usize = 128;
const DEFAULT_WINDOW: usize = 2000;
const DEFAULT_STEP: usize = 1000;
const DEFAULT_Z_THRESHOLD: f64 = 2.0;
const DEFAULT_MIN_VALID_RATIO: f64 = 0.5;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(styles=get_styles())]
#[command(disable_help_subcommand = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pairwise genome comparison report
    Compare(CompareArgs),
    /// Trace horizontally transferred genomic islands
    Hgt(HgtArgs),
    /// Align gene order between two genomes
    Synteny(SyntenyArgs),
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Query genome (FASTA)
    #[arg(short = 'q', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub query: PathBuf,

    /// Subject genome (FASTA)
    #[arg(short = 's', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub subject: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: PathBuf,

    /// Length of k-mers to use
    #[arg(short, long, help_heading = "Sketching parameters", default_value_t = DEFAULT_K, value_parser = validate_kmer_length)]
    pub kmer_length: usize,

    /// Number of hash slots per MinHash signature
    #[arg(short = 'n', long, help_heading = "Sketching parameters", default_value_t = DEFAULT_NUM_HASHES, value_parser = validate_num_hashes)]
    pub num_hashes: usize,
}

#[derive(Parser)]
pub struct HgtArgs {
    /// Genome to trace (FASTA)
    #[arg(short = 'q', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub query: PathBuf,

    /// Directory of candidate donor genomes (FASTA)
    #[arg(short = 'r', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub references: Option<PathBuf>,

    /// Gene annotation table (TSV: gene_id, name, product, locus_tag, start, end, strand)
    #[arg(short = 'g', long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub genes: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: PathBuf,

    /// Sliding window length in bp
    #[arg(short = 'w', long, help_heading = "Scan parameters", default_value_t = DEFAULT_WINDOW, value_parser = validate_positive)]
    pub window: usize,

    /// Step between window starts in bp
    #[arg(long, help_heading = "Scan parameters", default_value_t = DEFAULT_STEP, value_parser = validate_positive)]
    pub step: usize,

    /// |z| at which a window is considered anomalous
    #[arg(short = 'z', long, help_heading = "Scan parameters", default_value_t = DEFAULT_Z_THRESHOLD)]
    pub z_threshold: f64,

    /// Minimum fraction of unambiguous bases for a window to be scored
    #[arg(long, help_heading = "Scan parameters", default_value_t = DEFAULT_MIN_VALID_RATIO, value_parser = validate_ratio)]
    pub min_valid_ratio: f64,

    /// Length of k-mers to use for donor inference
    #[arg(short, long, help_heading = "Sketching parameters", default_value_t = DEFAULT_K, value_parser = validate_kmer_length)]
    pub kmer_length: usize,

    /// Number of hash slots per MinHash signature
    #[arg(short = 'n', long, help_heading = "Sketching parameters", default_value_t = DEFAULT_NUM_HASHES, value_parser = validate_num_hashes)]
    pub num_hashes: usize,

    /// Number of threads to use for reference sketching
    #[arg(short, long, default_value_t = 1, value_parser = validate_threads)]
    pub threads: usize,
}

#[derive(Parser)]
pub struct SyntenyArgs {
    /// Gene annotation table for genome A (TSV)
    #[arg(long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub genes_a: PathBuf,

    /// Gene annotation table for genome B (TSV)
    #[arg(long, help_heading = "Inputs", value_parser = clap::value_parser!(PathBuf))]
    pub genes_b: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, help_heading = "Output", value_parser = clap::value_parser!(PathBuf))]
    pub out_dir: PathBuf,
}

fn validate_kmer_length(k: &str) -> Result<usize, String> {
    let k: usize = k
        .parse()
        .map_err(|_| format!("`{k}` isn't a valid k-mer length"))?;

    if !(1..=32).contains(&k) {
        return Err("k-mer length must be in the range [1, 32]".to_string());
    }

    Ok(k)
}

fn validate_num_hashes(n: &str) -> Result<usize, String> {
    let n: usize = n
        .parse()
        .map_err(|_| format!("`{n}` isn't a valid signature size"))?;

    if !(1..=4096).contains(&n) {
        return Err("signature size must be in the range [1, 4096]".to_string());
    }

    Ok(n)
}

fn validate_positive(value: &str) -> Result<usize, String> {
    let value: usize = value
        .parse()
        .map_err(|_| format!("`{value}` isn't a valid value"))?;

    if value == 0 {
        return Err("value must be at least 1".to_string());
    }

    Ok(value)
}

fn validate_ratio(value: &str) -> Result<f64, String> {
    let value: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` isn't a valid ratio"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err("ratio must be in the range [0, 1]".to_string());
    }

    Ok(value)
}

fn validate_threads(threads: &str) -> Result<usize, String> {
    let threads: usize = threads
        .parse()
        .map_err(|_| format!("`{threads}` isn't a valid value"))?;

    if !(1..=1024).contains(&threads) {
        return Err("Threads must be in the range [1, 1024]".to_string());
    }

    Ok(threads)
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}

#[test]
fn test_verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
