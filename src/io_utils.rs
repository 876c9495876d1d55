
//! File input helpers for the command-line front end: FASTA loading via
//! `needletail`, gene annotation tables, and filename-derived identifiers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use needletail::parse_fastx_reader;

use crate::genes::{Gene, Strand};

/// Extracts genome identifier from a given sequence file path by removing
/// common file extensions.
pub fn genome_id_from_filename(seq_file: &Path) -> String {
    let mut genome_id = seq_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    if genome_id.ends_with(".gz") {
        genome_id = genome_id.replace(".gz", "");
    }

    for ext in [".fna", ".fa", ".fasta"] {
        if genome_id.ends_with(ext) {
            genome_id = genome_id.replace(ext, "");
            break;
        }
    }

    genome_id
}

/// Read a genome from a FASTA file, concatenating all records into one
/// sequence.
pub fn read_genome(seq_file: &Path) -> Result<Vec<u8>> {
    let reader = File::open(seq_file)
        .context(format!("Failed to open {}", seq_file.display()))?;

    let mut sequence = Vec::new();
    let mut fastx_reader = parse_fastx_reader(reader)?;
    while let Some(rec) = fastx_reader.next() {
        let record = rec?;
        sequence.extend_from_slice(&record.seq());
    }

    Ok(sequence)
}

/// Collect FASTA files from a directory of reference genomes.
pub fn fasta_files_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .context(format!("Failed to read directory {}", dir.display()))?
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == "fa" || ext == "fasta" || ext == "fna")
        })
        .map(|entry| entry.path())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Parse a TSV gene annotation table.
///
/// Columns: gene_id, name, product, locus_tag, start, end, strand. A `.`
/// marks an absent name/product/locus_tag. Comment lines start with `#`.
/// Coordinates are half-open.
pub fn parse_gene_table(file_path: &Path) -> Result<Vec<Gene>> {
    let file = File::open(file_path)
        .context(format!("Failed to open {}", file_path.display()))?;
    let reader = BufReader::new(file);

    let mut genes = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != 7 {
            return Err(anyhow::anyhow!(
                "Invalid gene table format at line {}: expected 7 tab-separated columns, found {}",
                line_num + 1,
                fields.len()
            ));
        }

        let optional = |field: &str| {
            if field == "." || field.is_empty() {
                None
            } else {
                Some(field.to_string())
            }
        };

        let start: usize = fields[4]
            .parse()
            .context(format!("Invalid start coordinate at line {}", line_num + 1))?;
        let end: usize = fields[5]
            .parse()
            .context(format!("Invalid end coordinate at line {}", line_num + 1))?;
        if end < start {
            return Err(anyhow::anyhow!(
                "Gene at line {} has end < start ({} < {})",
                line_num + 1,
                end,
                start
            ));
        }

        let strand: Strand = fields[6]
            .parse()
            .map_err(|e| anyhow::anyhow!("Line {}: {}", line_num + 1, e))?;

        genes.push(Gene {
            id: fields[0].to_string(),
            name: optional(fields[1]),
            product: optional(fields[2]),
            locus_tag: optional(fields[3]),
            start,
            end,
            strand,
        });
    }

    Ok(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_genome_id_from_filename() {
        assert_eq!(genome_id_from_filename(Path::new("/a/lambda.fna")), "lambda");
        assert_eq!(genome_id_from_filename(Path::new("t4.fasta.gz")), "t4");
        assert_eq!(genome_id_from_filename(Path::new("plain")), "plain");
    }

    #[test]
    fn test_read_genome_concatenates_records() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, ">contig1\nACGT\n>contig2\nTTAA")?;
        file.flush()?;

        let seq = read_genome(file.path())?;
        assert_eq!(seq, b"ACGTTTAA");
        Ok(())
    }

    #[test]
    fn test_parse_gene_table() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "# gene_id\tname\tproduct\tlocus_tag\tstart\tend\tstrand\n\
             g001\tint\tintegrase\tLAMBDA_001\t100\t1300\t+\n\
             g002\t.\thypothetical protein\t.\t1400\t2000\t-"
        )?;
        file.flush()?;

        let genes = parse_gene_table(file.path())?;
        assert_eq!(genes.len(), 2);
        assert_eq!(genes[0].name.as_deref(), Some("int"));
        assert_eq!(genes[0].start, 100);
        assert_eq!(genes[1].name, None);
        assert_eq!(genes[1].strand, Strand::Reverse);
        Ok(())
    }

    #[test]
    fn test_parse_gene_table_rejects_bad_rows() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "g001\tint\tintegrase\t100\t1300\t+")?;
        file.flush()?;

        assert!(parse_gene_table(file.path()).is_err());
        Ok(())
    }
}
