//! In-memory grid model for one worksheet

use calamine::Data;
use serde::{Deserialize, Serialize};

/// Which kind of source file a sheet came from.
///
/// The flat conversion strategy decides list columns differently per format,
/// so every sheet remembers where it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// An XLSX worksheet; list columns are marked with a `*` header prefix
    Spreadsheet,
    /// A CSV file; list columns are detected by newlines in the data
    Csv,
}

/// One worksheet, fully loaded into memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Worksheet title (XLSX) or file stem (CSV)
    pub name: String,
    /// Where the sheet came from
    pub format: SourceFormat,
    /// Cell grid, row-major, A1 at `rows[0][0]`
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new(name: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            format,
            rows: Vec::new(),
        }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the grid; CSV rows can be ragged
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A raw scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value, kept verbatim (leading whitespace and embedded
    /// newlines are meaningful to the extraction layer)
    Text(String),
    /// Empty/absent cell
    Empty,
}

impl CellValue {
    /// Parse a raw CSV field into a CellValue, detecting the type.
    ///
    /// The string form is never trimmed: indentation encodes hierarchy in
    /// some tables and newlines separate list entries.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(i) = raw.trim().parse::<i64>() {
            return CellValue::Integer(i);
        }

        if let Ok(f) = raw.trim().parse::<f64>() {
            return CellValue::Float(f);
        }

        CellValue::Text(raw.to_string())
    }

    /// Check if the cell is blank
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The string form of the cell, as it should appear on a card.
    ///
    /// Numbers go through Display so a zero renders as "0" rather than
    /// vanishing like a falsy value would.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", fl),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Empty => write!(f, ""),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => {
                if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s.clone())
                }
            }
            Data::Int(i) => CellValue::Integer(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => CellValue::Text(naive.to_string()),
                None => CellValue::Empty,
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) => CellValue::Empty,
        }
    }
}
