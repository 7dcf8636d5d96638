pub mod config;
pub mod consequence;
pub mod error;
pub mod genes;
pub mod io;
pub mod layout;
pub mod locator;
pub mod matcher;
pub mod pipeline;
pub mod table;

use itertools::Itertools;

use crate::config::InputConfig;
use crate::consequence::ConsequenceFilter;
use crate::error::VariantError;
use crate::genes::load_gene_targets;
use crate::io::{WorkbookReader, remove_previous_output};
use crate::layout::LayoutRegistry;
use crate::locator::{AnnotationFile, locate_annotation_files};
use crate::pipeline::{PipelineSummary, VariantPipeline};

/// How a run ended when it did not fail.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    Completed(PipelineSummary),
    /// The annotation directory holds no eligible workbook; no report is written.
    NoAnnotationFiles,
}

pub fn run(config: &InputConfig) -> Result<RunOutcome, VariantError> {
    remove_previous_output(&config.output_filepath)?;

    let registry = LayoutRegistry::load(config.layout_config_path())?;
    let files = locate_annotation_files(&config.annotation_file_dir, &registry)?;
    if files.is_empty() {
        return Ok(RunOutcome::NoAnnotationFiles);
    }
    log::info!("Found {} annotation workbooks", files.len());
    log::debug!(
        "Annotation workbooks: {}",
        files.iter().map(AnnotationFile::file_name).join(", ")
    );

    let targets = load_gene_targets(&config.gene_target_file)?;
    log::info!("Loaded {} gene targets", targets.len());

    let filter = ConsequenceFilter::new(config.consequence_mode());
    log::info!("Keeping variants: {}", filter.mode());

    let reader = WorkbookReader;
    let pipeline = VariantPipeline::new(&reader, &targets, filter);
    let summary = pipeline.run(&files, &config.output_filepath)?;
    Ok(RunOutcome::Completed(summary))
}
