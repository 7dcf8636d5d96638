//! # pipeline.rs
//!
//! Per-workbook extraction and the ordered merge into one report.
//!
//! Each workbook goes through the same steps: load, completeness filter, gene matching,
//! consequence filter, layout normalization. Workbooks are filtered in parallel with
//! `rayon`; the report is appended in locator order from the calling thread, with the
//! header taken from the first workbook.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::consequence::ConsequenceFilter;
use crate::error::VariantError;
use crate::genes::GeneTargetSet;
use crate::io::{AnnotationReader, ReportWriter};
use crate::layout::WORKING_MATCH_COLUMN;
use crate::locator::AnnotationFile;
use crate::matcher::{GENES_FIELD, match_genes};
use crate::table::AnnotationTable;

/// Row counts for one workbook, from load to report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSummary {
    pub file_name: String,
    pub rows_read: usize,
    pub rows_complete: usize,
    pub rows_matched: usize,
    pub rows_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub files: Vec<FileSummary>,
}

impl PipelineSummary {
    pub fn rows_written(&self) -> usize {
        self.files.iter().map(|f| f.rows_written).sum()
    }
}

/// MARK: VariantPipeline
pub struct VariantPipeline<'a, R: AnnotationReader> {
    reader: &'a R,
    targets: &'a GeneTargetSet,
    filter: ConsequenceFilter,
}

impl<'a, R: AnnotationReader> VariantPipeline<'a, R> {
    pub fn new(reader: &'a R, targets: &'a GeneTargetSet, filter: ConsequenceFilter) -> Self {
        VariantPipeline {
            reader,
            targets,
            filter,
        }
    }

    /// Loads one workbook and reduces it to the report rows it contributes.
    ///
    /// # Errors
    /// Returns `VariantError::MissingColumn` if the sheet has no `Gene(s)` column, or
    /// lacks a column needed by the consequence filter or the layout normalization.
    pub fn filter_file(
        &self,
        file: &AnnotationFile,
    ) -> Result<(AnnotationTable, FileSummary), VariantError> {
        let path = file.path();
        let mut summary = FileSummary {
            file_name: file.file_name(),
            ..Default::default()
        };

        let table = self.reader.read_table(file)?;
        summary.rows_read = table.len();
        let gene_idx = table.require_column(GENES_FIELD, path)?;

        let table = table.drop_incomplete_rows();
        summary.rows_complete = table.len();

        let table = table
            .with_derived_column(WORKING_MATCH_COLUMN, |row| {
                match_genes(&row[gene_idx], self.targets).into_cell()
            })
            .drop_incomplete_rows();
        summary.rows_matched = table.len();

        let table = if table.is_empty() {
            table
        } else {
            self.filter.apply(table, path)?
        };

        // normalized even when empty, so a header-only block still has the report columns
        let table = file.layout().normalize(table, path)?;
        Ok((table, summary))
    }

    /// Filters every workbook and appends the results to `output_path` in the given order.
    ///
    /// The first workbook's block carries the header, also when it has no rows. On error,
    /// the blocks of the workbooks before the failing one are already on disk.
    pub fn run(
        &self,
        files: &[AnnotationFile],
        output_path: &Path,
    ) -> Result<PipelineSummary, VariantError> {
        let progress = progress_bar(files.len());
        let filtered: Vec<_> = files
            .par_iter()
            .map(|file| {
                let result = self.filter_file(file);
                progress.inc(1);
                result
            })
            .collect();
        progress.finish_and_clear();

        let mut summary = PipelineSummary::default();
        let mut report: Option<ReportWriter> = None;
        for (index, result) in filtered.into_iter().enumerate() {
            let (table, mut file_summary) = result?;
            if report.is_none() {
                report = Some(ReportWriter::append_to(output_path)?);
            }
            if let Some(writer) = report.as_mut() {
                file_summary.rows_written = writer.write_table(&table, index == 0)?;
            }
            log::info!(
                "{}: {} of {} rows written ({} complete, {} gene matches)",
                file_summary.file_name,
                file_summary.rows_written,
                file_summary.rows_read,
                file_summary.rows_complete,
                file_summary.rows_matched
            );
            summary.files.push(file_summary);
        }

        Ok(summary)
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} workbooks")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    progress
}
