//! # consequence.rs
//!
//! Filtering of gene-matched rows by the annotated mutation consequence.

use std::fmt::Display;
use std::path::Path;

use crate::error::VariantError;
use crate::table::AnnotationTable;

pub const MUTATION_COLUMN: &str = "Mutation(s)";

/// Consequence terms used in the `Mutation(s)` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consequence {
    Missense,
    Nonsense,
    Silent,
    Synonymous,
}

impl Consequence {
    pub fn term(&self) -> &'static str {
        match self {
            Consequence::Missense => "Missense",
            Consequence::Nonsense => "Nonsense",
            Consequence::Silent => "Silent",
            Consequence::Synonymous => "Synonymous",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsequenceMode {
    /// Missense and nonsense variants only.
    CodingImpact,
    /// Every variant with a known consequence.
    AllConsequences,
}

impl ConsequenceMode {
    pub fn from_gather_all(gather_all_snps: bool) -> Self {
        if gather_all_snps {
            ConsequenceMode::AllConsequences
        } else {
            ConsequenceMode::CodingImpact
        }
    }

    pub fn vocabulary(&self) -> &'static [Consequence] {
        match self {
            ConsequenceMode::CodingImpact => &[Consequence::Missense, Consequence::Nonsense],
            ConsequenceMode::AllConsequences => &[
                Consequence::Missense,
                Consequence::Nonsense,
                Consequence::Silent,
                Consequence::Synonymous,
            ],
        }
    }
}

impl Display for ConsequenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode_str = match self {
            ConsequenceMode::CodingImpact => "missense/nonsense only",
            ConsequenceMode::AllConsequences => "all known consequences",
        };
        write!(f, "{}", mode_str)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsequenceFilter {
    mode: ConsequenceMode,
}

impl ConsequenceFilter {
    pub fn new(mode: ConsequenceMode) -> Self {
        ConsequenceFilter { mode }
    }

    pub fn mode(&self) -> ConsequenceMode {
        self.mode
    }

    /// Substring match, so compound annotations such as `Missense,Silent` are kept when
    /// any term is in the active vocabulary.
    pub fn accepts(&self, mutation: &str) -> bool {
        self.mode
            .vocabulary()
            .iter()
            .any(|consequence| mutation.contains(consequence.term()))
    }

    /// Keeps the rows whose `Mutation(s)` value contains an accepted consequence.
    ///
    /// # Errors
    /// Returns `VariantError::MissingColumn` if the table has no `Mutation(s)` column.
    pub fn apply(
        &self,
        table: AnnotationTable,
        source: &Path,
    ) -> Result<AnnotationTable, VariantError> {
        let mutation_idx = table.require_column(MUTATION_COLUMN, source)?;
        Ok(table.retain_rows(|row| {
            let cell = &row[mutation_idx];
            !cell.is_missing() && self.accepts(&cell.to_string())
        }))
    }
}
