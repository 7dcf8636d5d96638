//! # genes.rs
//!
//! Loading of the target gene list from a tab-separated file with a `gene` column.

use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::VariantError;
use crate::table::is_missing_text;

pub const GENE_COLUMN: &str = "gene";

/// Target genes in file order, with a hashed index for membership checks.
#[derive(Debug, Clone, Default)]
pub struct GeneTargetSet {
    genes: Vec<String>,
    lookup: HashSet<String>,
}

impl GeneTargetSet {
    pub fn new(genes: Vec<String>) -> Self {
        let lookup = genes.iter().cloned().collect();
        GeneTargetSet { genes, lookup }
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.lookup.contains(gene)
    }
}

/// Reads the `gene` column of a tab-separated file.
///
/// # Errors
/// Returns `VariantError::MissingColumn` if the header has no `gene` column.
pub fn load_gene_targets(gene_file: &Path) -> Result<GeneTargetSet, VariantError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(gene_file)?;

    let gene_idx = reader
        .headers()?
        .iter()
        .position(|h| h == GENE_COLUMN)
        .ok_or_else(|| VariantError::missing_column(GENE_COLUMN, gene_file))?;

    let mut genes = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(gene_idx) {
            Some(gene) if !is_missing_text(gene) => genes.push(gene.to_string()),
            _ => continue,
        }
    }

    log::debug!("Loaded {} target genes from {}", genes.len(), gene_file.display());
    Ok(GeneTargetSet::new(genes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_gene_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_gene_targets() {
        let file = write_gene_file("gene\tsource\nBRCA1\tpanel\nTP53\tpanel\nBRCA1\tlit\n\tnone\n");
        let targets = load_gene_targets(file.path()).unwrap();
        assert_eq!(targets.genes(), &["BRCA1", "TP53", "BRCA1"]);
        assert_eq!(targets.len(), 3);
        assert!(targets.contains("TP53"));
        assert!(!targets.contains("tp53"));
    }

    #[test]
    fn test_missing_gene_column() {
        let file = write_gene_file("symbol\nBRCA1\n");
        let err = load_gene_targets(file.path()).unwrap_err();
        assert!(matches!(err, VariantError::MissingColumn { ref column, .. } if column == "gene"));
    }

    #[test]
    fn test_gene_column_not_first() {
        let file = write_gene_file("id\tgene\n1\tHLA-A\n2\n3\tHLA-B\n");
        let targets = load_gene_targets(file.path()).unwrap();
        assert_eq!(targets.genes(), &["HLA-A", "HLA-B"]);
    }

    #[test]
    fn test_na_gene_entries_skipped() {
        let file = write_gene_file("gene
BRCA1
NA
#N/A
null
TP53
");
        let targets = load_gene_targets(file.path()).unwrap();
        assert_eq!(targets.genes(), &["BRCA1", "TP53"]);
    }
}
