use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use csv::WriterBuilder;

use crate::error::VariantError;
use crate::layout::SheetSelector;
use crate::locator::AnnotationFile;
use crate::table::{AnnotationTable, Cell};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xlsm,
    Xls,
    Ods,
}

pub fn determine_spreadsheet_format(file_path: &Path) -> Result<SpreadsheetFormat, VariantError> {
    let extension = file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" => Ok(SpreadsheetFormat::Xlsx),
        "xlsm" => Ok(SpreadsheetFormat::Xlsm),
        "xls" => Ok(SpreadsheetFormat::Xls),
        "ods" => Ok(SpreadsheetFormat::Ods),
        _ => Err(VariantError::UnsupportedFormat(
            file_path.display().to_string(),
        )),
    }
}

/// Source of annotation tables, one per workbook.
pub trait AnnotationReader: Sync {
    fn read_table(&self, file: &AnnotationFile) -> Result<AnnotationTable, VariantError>;
}

/// Reads workbooks from disk with `calamine`. The first row of the sheet is the header.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkbookReader;

impl AnnotationReader for WorkbookReader {
    fn read_table(&self, file: &AnnotationFile) -> Result<AnnotationTable, VariantError> {
        let path = file.path();
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = match file.sheet() {
            SheetSelector::Named(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(VariantError::MissingSheet {
                        sheet: name.clone(),
                        path: path.clone(),
                    });
                }
                name.clone()
            }
            SheetSelector::First => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| VariantError::EmptyWorkbook { path: path.clone() })?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => header.iter().map(|c| cell_from_data(c).to_string()).collect(),
            None => Vec::new(),
        };

        let mut table = AnnotationTable::new(columns);
        for row in rows {
            table.push_row(row.iter().map(cell_from_data).collect());
        }
        log::debug!(
            "Read {} rows from sheet '{}' of {}",
            table.len(),
            sheet_name,
            path.display()
        );
        Ok(table)
    }
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::DateTime(render_datetime(&datetime)),
            None => Cell::DateTime(dt.as_f64().to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::DateTime(s.clone()),
    }
}

fn render_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// Deletes the report left by a previous run. A missing file is not an error.
pub fn remove_previous_output(output_path: &Path) -> Result<(), VariantError> {
    match std::fs::remove_file(output_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Tab-separated report opened in append mode.
pub struct ReportWriter {
    writer: csv::Writer<File>,
}

impl ReportWriter {
    pub fn append_to(output_path: &Path) -> Result<ReportWriter, VariantError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_path)?;
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(file);
        Ok(ReportWriter { writer })
    }

    /// Writes the table's rows, preceded by its header when `with_header` is set. The
    /// header is written even if the table has no rows.
    pub fn write_table(
        &mut self,
        table: &AnnotationTable,
        with_header: bool,
    ) -> Result<usize, VariantError> {
        if with_header {
            self.writer.write_record(table.columns())?;
        }
        for row in table.rows() {
            self.writer
                .write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        self.writer.flush()?;
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_determine_spreadsheet_format() {
        assert_eq!(
            determine_spreadsheet_format(Path::new("Chr01.xlsx")).unwrap(),
            SpreadsheetFormat::Xlsx
        );
        assert_eq!(
            determine_spreadsheet_format(Path::new("Chr01.XLSX")).unwrap(),
            SpreadsheetFormat::Xlsx
        );
        assert_eq!(
            determine_spreadsheet_format(Path::new("Chr01.xls")).unwrap(),
            SpreadsheetFormat::Xls
        );
        assert_eq!(
            determine_spreadsheet_format(Path::new("Chr01.ods")).unwrap(),
            SpreadsheetFormat::Ods
        );
        assert!(determine_spreadsheet_format(Path::new("Chr01.csv")).is_err());
        assert!(determine_spreadsheet_format(Path::new("Chr01")).is_err());
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::String("BRCA1".to_string())),
            Cell::from("BRCA1")
        );
        assert_eq!(cell_from_data(&Data::Float(12.0)), Cell::Float(12.0));
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2007-09-07T00:00:00".to_string())),
            Cell::DateTime("2007-09-07T00:00:00".to_string())
        );
    }

    #[test]
    fn test_excel_date_rendering() {
        // serial 39332 is how a spreadsheet stores SEPT7 once it has turned it into a date
        let sept7 = ExcelDateTime::new(39332.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_from_data(&Data::DateTime(sept7)),
            Cell::DateTime("2007-09-07 00:00:00".to_string())
        );
        let afternoon = ExcelDateTime::new(39332.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_from_data(&Data::DateTime(afternoon)).to_string(),
            "2007-09-07 18:00:00"
        );
    }

    #[test]
    fn test_remove_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tsv");
        remove_previous_output(&path).unwrap();
        std::fs::write(&path, "stale").unwrap();
        remove_previous_output(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_report_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tsv");
        let first = AnnotationTable::from_text_rows(&["name", "Gene(s)"], &[&["p1", "BRCA1,TP53"]]);
        let empty = AnnotationTable::new(vec!["name".to_string(), "Gene(s)".to_string()]);
        let second = AnnotationTable::from_text_rows(&["name", "Gene(s)"], &[&["p2", "TP53"]]);

        let mut writer = ReportWriter::append_to(&path).unwrap();
        assert_eq!(writer.write_table(&first, true).unwrap(), 1);
        assert_eq!(writer.write_table(&empty, false).unwrap(), 0);
        assert_eq!(writer.write_table(&second, false).unwrap(), 1);
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name\tGene(s)\np1\tBRCA1,TP53\np2\tTP53\n");
    }

    #[test]
    fn test_header_only_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tsv");
        let empty = AnnotationTable::new(vec!["name".to_string(), "Gene(s)".to_string()]);
        let mut writer = ReportWriter::append_to(&path).unwrap();
        writer.write_table(&empty, true).unwrap();
        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name\tGene(s)\n");
    }
}
