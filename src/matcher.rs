//! # matcher.rs
//!
//! Row-level gene matching against the comma-separated `Gene(s)` field.

use crate::genes::GeneTargetSet;
use crate::table::Cell;

/// Multi-gene field of the annotation workbooks.
pub const GENES_FIELD: &str = "Gene(s)";

#[derive(Debug, Clone, PartialEq)]
pub enum GeneMatch {
    /// At least one target gene is listed; holds the complete original field value.
    Matched(String),
    NoMatch,
}

impl GeneMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, GeneMatch::Matched(_))
    }

    /// Working column value: the matched field, or a blank cell that the completeness
    /// filter removes.
    pub fn into_cell(self) -> Cell {
        match self {
            GeneMatch::Matched(genes) => Cell::Text(genes),
            GeneMatch::NoMatch => Cell::Empty,
        }
    }
}

/// Checks whether any comma-separated token of `cell` is a target gene.
///
/// Cells the spreadsheet stored as dates never match: they are gene symbols that were
/// mangled on entry (e.g. `SEPT7` -> `2007-09-07`) and their text is meaningless.
pub fn match_genes(cell: &Cell, targets: &GeneTargetSet) -> GeneMatch {
    if cell.is_datetime() || cell.is_missing() {
        return GeneMatch::NoMatch;
    }

    let genes = cell.to_string();
    if genes.split(',').any(|gene| targets.contains(gene)) {
        GeneMatch::Matched(genes)
    } else {
        GeneMatch::NoMatch
    }
}
