
//! Gene annotation records shared by the HGT tracer and the synteny
//! aligner. Coordinates are half-open `[start, end)` on the genome.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl FromStr for Strand {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(EngineError::InvalidParameter(format!(
                "strand must be '+' or '-', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub name: Option<String>,
    pub product: Option<String>,
    pub locus_tag: Option<String>,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
}

impl Gene {
    /// True when the gene span intersects the half-open region
    /// `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }

    /// Best human-readable label: name, else product, else the id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.product.as_deref())
            .unwrap_or(&self.id)
    }

    /// Name and product concatenated for keyword matching.
    pub fn annotation_text(&self) -> String {
        let mut text = String::new();
        if let Some(name) = &self.name {
            text.push_str(name);
        }
        if let Some(product) = &self.product {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(product);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(start: usize, end: usize) -> Gene {
        Gene {
            id: "g1".to_string(),
            name: Some("int".to_string()),
            product: Some("integrase".to_string()),
            locus_tag: None,
            start,
            end,
            strand: Strand::Forward,
        }
    }

    #[test]
    fn test_overlaps_half_open() {
        let g = gene(100, 200);
        assert!(g.overlaps(150, 250));
        assert!(g.overlaps(0, 101));
        assert!(!g.overlaps(200, 300)); // end is exclusive
        assert!(!g.overlaps(0, 100));
    }

    #[test]
    fn test_label_preference() {
        let mut g = gene(0, 10);
        assert_eq!(g.label(), "int");
        g.name = None;
        assert_eq!(g.label(), "integrase");
        g.product = None;
        assert_eq!(g.label(), "g1");
    }

    #[test]
    fn test_strand_parse() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Reverse);
        assert!(".".parse::<Strand>().is_err());
    }
}
