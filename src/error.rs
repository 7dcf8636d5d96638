//! # error.rs
//!
//! The single error type shared by every stage of the variant extraction pipeline.
//! Structural problems with the inputs (a missing column, a missing sheet) are fatal for
//! the run; they are never retried.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VariantError {
    /// A column the pipeline depends on is absent from an input table.
    #[error("expected a column called {column} to be in the file {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// The requested sheet is not present in the workbook.
    #[error("sheet '{sheet}' was not found in workbook {}", .path.display())]
    MissingSheet { sheet: String, path: PathBuf },

    /// The workbook has no sheets at all.
    #[error("workbook {} does not contain any sheets", .path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error("unsupported spreadsheet format for file {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("layout configuration error: {0}")]
    LayoutConfig(#[from] config::ConfigError),
}

impl VariantError {
    pub fn missing_column(column: &str, path: impl Into<PathBuf>) -> Self {
        VariantError::MissingColumn {
            column: column.to_string(),
            path: path.into(),
        }
    }
}
