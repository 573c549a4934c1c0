//! Source file reading: CSV and XLSX into in-memory sheets
//!
//! This is the only module that touches the filesystem for source data.
//! Everything downstream works on [`Sheet`] grids.

use crate::convert::ensure_extension;
use crate::error::{Error, Result};
use crate::grid::{CellValue, Sheet, SourceFormat};
use calamine::{open_workbook, Reader, Xlsx};
use std::path::Path;

/// Load every worksheet from a list of source files, in order.
///
/// Filenames without a recognized extension default to `.xlsx`. XLSX
/// worksheets whose name starts with `@` hold metadata, not cards, and are
/// skipped.
pub fn load_sources(filenames: &[String]) -> Result<Vec<Sheet>> {
    let mut sheets = Vec::new();

    for filename in filenames {
        let filename = with_default_extension(filename);
        let path = Path::new(&filename);

        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => sheets.push(read_csv_file(path)?),
            Some("xlsx") => sheets.extend(read_xlsx_file(path)?),
            _ => {
                return Err(Error::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        }
    }

    Ok(sheets)
}

/// Append `.xlsx` to a filename that has neither a `.csv` nor an `.xlsx`
/// extension already
fn with_default_extension(filename: &str) -> String {
    match Path::new(filename).extension() {
        Some(_) => filename.to_string(),
        None => ensure_extension(filename, "xlsx"),
    }
}

/// Read one CSV file as a single sheet named after the file stem
fn read_csv_file(path: &Path) -> Result<Sheet> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("csv")
        .to_string();

    read_csv_str(&content, &name).map_err(|e| match e {
        // Re-attach the real path to decode errors from the string reader.
        Error::Csv { source, .. } => Error::Csv {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse CSV content from a string (useful for testing).
///
/// The reader is headerless and flexible: the extraction layer owns header
/// interpretation, and ragged rows are tolerated there too.
pub fn read_csv_str(content: &str, name: &str) -> Result<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut sheet = Sheet::new(name, SourceFormat::Csv);

    for record in csv_reader.records() {
        let record = record.map_err(|e| Error::Csv {
            path: name.into(),
            source: e,
        })?;

        sheet
            .rows
            .push(record.iter().map(CellValue::parse).collect());
    }

    Ok(sheet)
}

/// Read every worksheet of an XLSX workbook, skipping `@`-prefixed
/// metadata sheets
fn read_xlsx_file(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| Error::Xlsx {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut sheets = Vec::new();

    for (title, range) in workbook.worksheets() {
        if title.starts_with('@') {
            continue;
        }

        let mut sheet = Sheet::new(title, SourceFormat::Spreadsheet);

        // calamine ranges start at the first used cell, not at A1; pad the
        // grid back out so region coordinates stay absolute.
        let (row_offset, column_offset) = match range.start() {
            Some((r, c)) => (r as usize, c as usize),
            None => (0, 0),
        };

        sheet.rows.resize(row_offset, Vec::new());

        for raw_row in range.rows() {
            let mut row = vec![CellValue::Empty; column_offset];
            row.extend(raw_row.iter().map(CellValue::from));
            sheet.rows.push(row);
        }

        sheets.push(sheet);
    }

    Ok(sheets)
}
