//! # config.rs
//!
//! Command-line configuration for the variant extraction run.
//! It includes:
//! - `InputConfig`: parses and validates the command-line arguments.
//! - `InputConfig::consequence_mode`: the consequence filter selected by `--gather-all-snps`.
//!
//! The layout rules for divergent workbooks live in `layout.rs`; this module only carries
//! the optional path of a user-supplied rule file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::consequence::ConsequenceMode;

/// Configuration parsed from CLI input arguments for the variant extraction pipeline.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "variant-snps",
    version = env!("CARGO_PKG_VERSION"),
    about = "Aggregate the MEGA array variant probes of a set of target genes from per-chromosome annotation workbooks into one tab-separated report."
)]
pub struct InputConfig {
    /// Directory that contains the annotation workbook of each chromosome (file names
    /// containing ChrXX, e.g. MEGA_Chr01.xlsx).
    pub annotation_file_dir: PathBuf,
    /// Output file, including the file name. An existing file is replaced.
    pub output_filepath: PathBuf,
    /// Tab-separated file listing the gene targets in a column named 'gene'. A file
    /// without that column stops the run with exit code 1 before any report is written.
    pub gene_target_file: PathBuf,
    /// Return every variant probe with a known consequence instead of only the
    /// missense/nonsense ones.
    #[arg(long = "gather-all-snps")]
    pub gather_all_snps: bool,
    /// TOML file replacing the built-in layout rules for divergent workbooks.
    #[arg(long = "layout-config", value_name = "FILE")]
    pub layout_config: Option<PathBuf>,
    /// Print debug-level diagnostics.
    #[arg(short, long)]
    pub verbose: bool,
}

impl InputConfig {
    pub fn new(
        annotation_file_dir: PathBuf,
        output_filepath: PathBuf,
        gene_target_file: PathBuf,
        gather_all_snps: bool,
    ) -> Self {
        InputConfig {
            annotation_file_dir,
            output_filepath,
            gene_target_file,
            gather_all_snps,
            layout_config: None,
            verbose: false,
        }
    }

    /// Parses command-line arguments into an `InputConfig` structure.
    ///
    /// # Errors
    /// Returns an error if the arguments are malformed or a path is invalid.
    pub fn build() -> Result<InputConfig> {
        let input_config = InputConfig::parse();
        input_config.validate()?;
        Ok(input_config)
    }

    /// Checks that the input paths exist and the output path can be a file.
    pub fn validate(&self) -> Result<()> {
        if !self.annotation_file_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Annotation directory '{}' does not exist or is not a directory.",
                self.annotation_file_dir.display()
            ));
        }

        if !self.gene_target_file.is_file() {
            return Err(anyhow::anyhow!(
                "Gene target file '{}' does not exist.",
                self.gene_target_file.display()
            ));
        }

        if self.output_filepath.is_dir() {
            return Err(anyhow::anyhow!(
                "Output path '{}' is a directory, please provide a file path.",
                self.output_filepath.display()
            ));
        }

        if let Some(layout_config) = &self.layout_config {
            if !layout_config.is_file() {
                return Err(anyhow::anyhow!(
                    "Layout configuration file '{}' does not exist.",
                    layout_config.display()
                ));
            }
        }

        Ok(())
    }

    pub fn consequence_mode(&self) -> ConsequenceMode {
        ConsequenceMode::from_gather_all(self.gather_all_snps)
    }

    pub fn layout_config_path(&self) -> Option<&Path> {
        self.layout_config.as_deref()
    }
}
