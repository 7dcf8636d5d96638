//! # locator.rs
//!
//! Discovery of the per-chromosome annotation workbooks in a directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use getset::Getters;
use regex::Regex;

use crate::error::VariantError;
use crate::io::{SpreadsheetFormat, determine_spreadsheet_format};
use crate::layout::{LayoutKind, LayoutRegistry, SheetSelector};

/// `Chr` followed by exactly two ASCII digits.
static CHROMOSOME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Chr([0-9]{2})(?:[^0-9]|$)").expect("chromosome pattern is a valid regex")
});

/// One chromosome's annotation workbook, with the layout it is read with.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct AnnotationFile {
    #[getset(get = "pub")]
    path: PathBuf,
    /// two-digit chromosome number taken from the file name
    #[getset(get = "pub")]
    chromosome: String,
    #[getset(get = "pub")]
    format: SpreadsheetFormat,
    #[getset(get = "pub")]
    layout: LayoutKind,
    #[getset(get = "pub")]
    sheet: SheetSelector,
}

impl AnnotationFile {
    pub fn new(
        path: PathBuf,
        chromosome: String,
        format: SpreadsheetFormat,
        layout: LayoutKind,
        sheet: SheetSelector,
    ) -> Self {
        AnnotationFile {
            path,
            chromosome,
            format,
            layout,
            sheet,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Chromosome number in a workbook file name, if the name is eligible.
pub fn chromosome_tag(file_name: &str) -> Option<String> {
    CHROMOSOME_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Lists the annotation workbooks directly under `directory`, in directory order.
///
/// A file is eligible when its name contains `Chr` and two digits and its extension is a
/// spreadsheet extension. Hidden files (names starting with `.`, such as the `._` companions
/// macOS leaves on shared drives) are skipped. An empty list is a valid result; the caller decides how to end
/// the run.
pub fn locate_annotation_files(
    directory: &Path,
    registry: &LayoutRegistry,
) -> Result<Vec<AnnotationFile>, VariantError> {
    let mut annotation_files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if file_name.starts_with('.') {
            log::debug!("Skipping hidden file {}", file_name);
            continue;
        }
        let Ok(format) = determine_spreadsheet_format(&path) else {
            continue;
        };
        let Some(chromosome) = chromosome_tag(file_name) else {
            log::debug!("Skipping {}: no chromosome tag in file name", file_name);
            continue;
        };

        let (layout, sheet) = registry.resolve(file_name);
        annotation_files.push(AnnotationFile::new(
            path,
            chromosome,
            format,
            layout,
            sheet,
        ));
    }

    Ok(annotation_files)
}
