//! # layout.rs
//!
//! Source layouts of the annotation workbooks and their mapping into the common report
//! schema.
//! It includes:
//! - `LayoutKind`: the known source layouts, each with its own normalization.
//! - `SheetSelector`: which sheet of a workbook holds the annotation table.
//! - `LayoutRegistry`: the rules assigning a layout to a workbook by its chromosome tag,
//!   loaded with the `config` crate from `data/layout_config.toml` or a user file.
//!
//! Every layout normalizes to the same column names and order, so the header written from
//! the first workbook of a run fits every later workbook.

use std::path::Path;

use config::Config;
use serde::Deserialize;

use crate::error::VariantError;
use crate::table::{AnnotationTable, Cell};

/// Columns of the report, in order. The standard layout carries them natively.
pub const REPORT_COLUMNS: [&str; 9] = [
    "name",
    "RsID",
    "Chr",
    "MapInfo",
    "Alleles",
    "Transcript",
    "Gene(s)",
    "In-exon",
    "Mutation(s)",
];

/// Temporary column holding the gene matcher's verdict for each row.
pub const WORKING_MATCH_COLUMN: &str = "Genes";

/// Built-in layout rules.
pub const LAYOUT_CONFIG_STR: &str = include_str!("../data/layout_config.toml");

/// Where a report column of a divergent layout takes its value from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnSource {
    Column(&'static str),
    /// the layout has no equivalent, the report cell is left blank
    Absent,
}

/// Illumina manifest columns feeding each report column, in report order.
const ILLUMINA_MANIFEST_MAPPING: [(&str, ColumnSource); 9] = [
    ("name", ColumnSource::Column("IlmnID")),
    ("RsID", ColumnSource::Column("RS Name")),
    ("Chr", ColumnSource::Column("Chr")),
    ("MapInfo", ColumnSource::Column("MapInfo")),
    ("Alleles", ColumnSource::Column("SNP")),
    ("Transcript", ColumnSource::Absent),
    ("Gene(s)", ColumnSource::Column("Gene(s)")),
    ("In-exon", ColumnSource::Column("In-exon")),
    ("Mutation(s)", ColumnSource::Column("Mutation(s)")),
];

/// MARK: LayoutKind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Already in report layout.
    Standard,
    /// Illumina manifest columns (`IlmnID`, `RS Name`, `SNP`, ...) without transcripts.
    IlluminaManifest,
}

impl LayoutKind {
    /// Reshapes a filtered table into the report layout and removes the working match
    /// column.
    ///
    /// # Errors
    /// Returns `VariantError::MissingColumn` if a source column of the layout is absent.
    pub fn normalize(
        &self,
        table: AnnotationTable,
        source: &Path,
    ) -> Result<AnnotationTable, VariantError> {
        match self {
            LayoutKind::Standard => Ok(table.drop_column(WORKING_MATCH_COLUMN)),
            LayoutKind::IlluminaManifest => {
                remap_columns(&table, &ILLUMINA_MANIFEST_MAPPING, source)
            }
        }
    }
}

fn remap_columns(
    table: &AnnotationTable,
    mapping: &[(&str, ColumnSource)],
    source: &Path,
) -> Result<AnnotationTable, VariantError> {
    let indices = mapping
        .iter()
        .map(|(_, column_source)| match column_source {
            ColumnSource::Column(name) => table.require_column(name, source).map(Some),
            ColumnSource::Absent => Ok(None),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut normalized =
        AnnotationTable::new(mapping.iter().map(|(name, _)| name.to_string()).collect());
    for row in table.rows() {
        normalized.push_row(
            indices
                .iter()
                .map(|idx| idx.map_or(Cell::Empty, |i| row[i].clone()))
                .collect(),
        );
    }
    Ok(normalized)
}

/// MARK: SheetSelector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    First,
    Named(String),
}

/// One rule of the layout configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRule {
    /// chromosome tag looked for in the file name, e.g. `Chr06`
    pub chromosome: String,
    pub layout: LayoutKind,
    #[serde(default)]
    pub sheet: Option<String>,
}

/// MARK: LayoutRegistry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRegistry {
    #[serde(default)]
    pub divergent: Vec<LayoutRule>,
}

impl LayoutRegistry {
    /// Loads the built-in rules, or the rules of `override_file` when given.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be read or deserialized.
    pub fn load(override_file: Option<&Path>) -> Result<LayoutRegistry, VariantError> {
        let builder = Config::builder();
        let builder = match override_file {
            Some(path) => {
                builder.add_source(config::File::from(path).format(config::FileFormat::Toml))
            }
            None => builder.add_source(config::File::from_str(
                LAYOUT_CONFIG_STR,
                config::FileFormat::Toml,
            )),
        };
        let registry = builder
            .build()?
            .try_deserialize::<LayoutRegistry>()?;
        log::debug!("Layout rules: {:?}", registry.divergent);
        Ok(registry)
    }

    /// Layout and sheet for a workbook, decided by the first rule whose chromosome tag
    /// appears in the file name. Unmatched workbooks use the standard layout and their
    /// first sheet.
    pub fn resolve(&self, file_name: &str) -> (LayoutKind, SheetSelector) {
        self.divergent
            .iter()
            .find(|rule| file_name.contains(&rule.chromosome))
            .map(|rule| {
                let sheet = rule
                    .sheet
                    .as_ref()
                    .map_or(SheetSelector::First, |s| SheetSelector::Named(s.clone()));
                (rule.layout, sheet)
            })
            .unwrap_or((LayoutKind::Standard, SheetSelector::First))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_table() -> AnnotationTable {
        AnnotationTable::from_text_rows(
            &[
                "IlmnID", "Name", "RS Name", "SNP", "Chr", "MapInfo", "Gene(s)", "In-exon",
                "Mutation(s)", "Genes",
            ],
            &[&[
                "1:100-0_B_R_1", "1:100", "rs123", "[A/G]", "6", "29910247", "HLA-A,HLA-B",
                "Yes", "Missense", "HLA-A,HLA-B",
            ]],
        )
    }

    #[test]
    fn test_illumina_manifest_normalization() {
        let table = LayoutKind::IlluminaManifest
            .normalize(manifest_table(), Path::new("MEGA_Chr06.xlsx"))
            .unwrap();
        assert_eq!(table.columns(), &REPORT_COLUMNS);
        assert_eq!(
            table.rows()[0]
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
            vec![
                "1:100-0_B_R_1", "rs123", "6", "29910247", "[A/G]", "", "HLA-A,HLA-B", "Yes",
                "Missense"
            ]
        );
        assert_eq!(table.rows()[0][5], Cell::Empty);
    }

    #[test]
    fn test_empty_manifest_keeps_report_header() {
        let table = manifest_table().retain_rows(|_| false);
        let table = LayoutKind::IlluminaManifest
            .normalize(table, Path::new("MEGA_Chr06.xlsx"))
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &REPORT_COLUMNS);
    }

    #[test]
    fn test_manifest_missing_source_column() {
        let table = manifest_table().drop_column("RS Name");
        let err = LayoutKind::IlluminaManifest
            .normalize(table, Path::new("MEGA_Chr06.xlsx"))
            .unwrap_err();
        assert!(matches!(err, VariantError::MissingColumn { ref column, .. } if column == "RS Name"));
    }

    #[test]
    fn test_standard_drops_working_column() {
        let mut columns: Vec<&str> = REPORT_COLUMNS.to_vec();
        columns.push(WORKING_MATCH_COLUMN);
        let table = AnnotationTable::new(columns.iter().map(|c| c.to_string()).collect());
        let table = LayoutKind::Standard
            .normalize(table, Path::new("MEGA_Chr01.xlsx"))
            .unwrap();
        assert_eq!(table.columns(), &REPORT_COLUMNS);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = LayoutRegistry::load(None).unwrap();
        assert_eq!(registry.divergent.len(), 1);
        assert_eq!(
            registry.resolve("MEGA_Consortium_Chr06_annotated.xlsx"),
            (
                LayoutKind::IlluminaManifest,
                SheetSelector::Named("cleaned".to_string())
            )
        );
        assert_eq!(
            registry.resolve("MEGA_Consortium_Chr16_annotated.xlsx"),
            (LayoutKind::Standard, SheetSelector::First)
        );
    }

    #[test]
    fn test_registry_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.toml");
        std::fs::write(
            &path,
            "[[divergent]]\nchromosome = \"Chr11\"\nlayout = \"illumina-manifest\"\n",
        )
        .unwrap();
        let registry = LayoutRegistry::load(Some(path.as_path())).unwrap();
        assert_eq!(
            registry.resolve("Chr11.xlsx"),
            (LayoutKind::IlluminaManifest, SheetSelector::First)
        );
        assert_eq!(
            registry.resolve("Chr06.xlsx"),
            (LayoutKind::Standard, SheetSelector::First)
        );
    }
}
