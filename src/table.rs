//! # table.rs
//!
//! In-memory representation of one annotation sheet: a header of column names and rows of
//! typed cells. Cells keep the type the spreadsheet stored them with, so that later stages
//! can tell a real gene symbol apart from one the spreadsheet turned into a date.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use crate::error::VariantError;

/// Text values a spreadsheet export uses for "no value". Compared exactly.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True for an empty string or one of the `MISSING_MARKERS`.
pub fn is_missing_text(text: &str) -> bool {
    text.is_empty() || MISSING_MARKERS.contains(&text)
}

/// MARK: Cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// date/time value, already rendered as `YYYY-MM-DD HH:MM:SS`
    DateTime(String),
}

impl Cell {
    /// Blank cells, empty strings, NA markers and spreadsheet error cells all count as
    /// missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => is_missing_text(s),
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, Cell::DateTime(_))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            // integral positions such as MapInfo are stored as floats by most spreadsheets
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::DateTime(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// MARK: AnnotationTable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl AnnotationTable {
    pub fn new(columns: Vec<String>) -> Self {
        AnnotationTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from a header and rows of text, treating `""` as a blank cell.
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = AnnotationTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(
                row.iter()
                    .map(|v| if v.is_empty() { Cell::Empty } else { Cell::from(*v) })
                    .collect(),
            );
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding short rows with blank cells and cutting long ones to the
    /// header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str, source: &Path) -> Result<usize, VariantError> {
        self.column_index(name)
            .ok_or_else(|| VariantError::missing_column(name, source))
    }

    /// Keeps only the rows in which every cell holds a value.
    pub fn drop_incomplete_rows(mut self) -> Self {
        self.rows.retain(|row| !row.iter().any(Cell::is_missing));
        self
    }

    pub fn retain_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Appends a column whose value for each row is computed from that row.
    pub fn with_derived_column<F>(mut self, name: &str, mut derive: F) -> Self
    where
        F: FnMut(&[Cell]) -> Cell,
    {
        for row in self.rows.iter_mut() {
            let value = derive(row);
            row.push(value);
        }
        self.columns.push(name.to_string());
        self
    }

    /// Removes a column if present; a table without it is returned as is.
    pub fn drop_column(mut self, name: &str) -> Self {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in self.rows.iter_mut() {
                row.remove(idx);
            }
        }
        self
    }
}
