//! Table extraction: headers, data rows, and rectangular regions
//!
//! A table is one header row followed by data rows. The header names the
//! fields; each data row becomes an ordered field-to-value mapping. Callers
//! point this module at a sub-rectangle of a sheet, so a single worksheet
//! can hold several independent tables.

use crate::grid::CellValue;
use serde_json::{Map, Value};

/// One data row parsed into named fields, in header order
pub type Mapping = Map<String, Value>;

/// A parsed header field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Normalized name, usable as a template variable
    pub name: String,
    /// True if the header was marked with a leading `*`
    pub is_list: bool,
}

/// A rectangular region of a sheet.
///
/// `height` counts the header row. `None` for height or width means "to the
/// end of the available rows/columns".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub start_row: usize,
    pub start_column: usize,
    pub height: Option<usize>,
    pub width: Option<usize>,
}

impl Region {
    /// A region spanning the whole sheet
    pub fn full() -> Self {
        Self::default()
    }
}

/// Normalize header text into a name usable as a template variable:
/// lowercase, spaces become underscores, everything else non-alphanumeric
/// is stripped (underscores survive).
pub fn safe_name(raw: &str) -> String {
    raw.to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Parse one header row into fields.
///
/// Walks cells from `start_column` up to `start_column + width` (or the end
/// of the row). The first blank cell stops the walk entirely; later
/// non-blank cells are never read. A leading `*` is stripped and marks the
/// field as list-typed.
pub fn parse_header_row(
    row: &[CellValue],
    start_column: usize,
    width: Option<usize>,
) -> Vec<Field> {
    let mut fields = Vec::new();

    let end = match width {
        Some(w) => (start_column + w).min(row.len()),
        None => row.len(),
    };

    for cell in row.iter().take(end).skip(start_column) {
        let header = cell.to_text();
        if header.is_empty() {
            // A blank header ends the table, even if cells continue.
            break;
        }

        let (text, is_list) = match header.strip_prefix('*') {
            Some(rest) => (rest, true),
            None => (header.as_str(), false),
        };

        fields.push(Field {
            name: safe_name(text),
            is_list,
        });
    }

    fields
}

/// Parse one data row against a set of header fields.
///
/// Cell values convert to their string form unconditionally, so numeric
/// zeros survive. Blank cells stay null. List fields with a non-blank value
/// split on newlines; a blank cell in a list column stays null here, and
/// turning the whole column into lists is the assembler's decision.
///
/// Returns `None` when every consumed cell was blank, signalling a row the
/// caller may want to drop.
pub fn parse_data_row(
    row: &[CellValue],
    fields: &[Field],
    start_column: usize,
) -> Option<Mapping> {
    let mut mapping = Mapping::new();
    let mut all_blank = true;

    for (i, field) in fields.iter().enumerate() {
        // Short rows read as blank past their end.
        let cell = row.get(start_column + i).unwrap_or(&CellValue::Empty);

        let value = if cell.is_empty() {
            Value::Null
        } else {
            all_blank = false;
            let text = cell.to_text();
            if field.is_list && !text.is_empty() {
                Value::Array(text.split('\n').map(|s| Value::String(s.to_string())).collect())
            } else {
                Value::String(text)
            }
        };

        mapping.insert(field.name.clone(), value);
    }

    if all_blank {
        return None;
    }

    Some(mapping)
}

/// Parse a rectangular region of a sheet into row mappings.
///
/// The first row of the region is the header; the rest are data rows, with
/// fully blank rows dropped. A region starting past the end of the grid
/// yields nothing.
pub fn parse_table(rows: &[Vec<CellValue>], region: Region) -> Vec<Mapping> {
    let slice = match rows.get(region.start_row..) {
        Some(s) => s,
        None => return Vec::new(),
    };

    let slice = match region.height {
        Some(h) => &slice[..h.min(slice.len())],
        None => slice,
    };

    let Some((header_row, data_rows)) = slice.split_first() else {
        return Vec::new();
    };

    let fields = parse_header_row(header_row, region.start_column, region.width);

    data_rows
        .iter()
        .filter_map(|row| parse_data_row(row, &fields, region.start_column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::parse(c)).collect()
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("Card Rules"), "card_rules");
        assert_eq!(safe_name("Cost (MP)"), "cost_mp");
        assert_eq!(safe_name("already_safe"), "already_safe");
    }

    #[test]
    fn test_header_list_marker() {
        let fields = parse_header_row(&row(&["Name", "*Card Rules"]), 0, None);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "name");
        assert!(!fields[0].is_list);
        assert_eq!(fields[1].name, "card_rules");
        assert!(fields[1].is_list);
    }

    #[test]
    fn test_header_blank_stops_parsing() {
        // The column after the blank is never seen.
        let fields = parse_header_row(&row(&["Name", "", "Orphan"]), 0, None);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "name");
    }

    #[test]
    fn test_header_width_bound() {
        let fields = parse_header_row(&row(&["A", "B", "C", "D"]), 1, Some(2));
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_data_row_zero_survives() {
        let fields = parse_header_row(&row(&["Value"]), 0, None);
        let mapping = parse_data_row(&row(&["0"]), &fields, 0).unwrap();
        assert_eq!(mapping["value"], json!("0"));
    }

    #[test]
    fn test_data_row_list_split() {
        let fields = parse_header_row(&row(&["*Rules"]), 0, None);
        let mapping = parse_data_row(&row(&["one\ntwo"]), &fields, 0).unwrap();
        assert_eq!(mapping["rules"], json!(["one", "two"]));
    }

    #[test]
    fn test_data_row_single_line_list() {
        let fields = parse_header_row(&row(&["*Rules", "Name"]), 0, None);
        let mapping = parse_data_row(&row(&["solo", "x"]), &fields, 0).unwrap();
        assert_eq!(mapping["rules"], json!(["solo"]));
    }

    #[test]
    fn test_data_row_blank_list_cell_stays_null() {
        let fields = parse_header_row(&row(&["*Rules", "Name"]), 0, None);
        let mapping = parse_data_row(&row(&["", "x"]), &fields, 0).unwrap();
        assert_eq!(mapping["rules"], Value::Null);
    }

    #[test]
    fn test_data_row_all_blank_signal() {
        let fields = parse_header_row(&row(&["A", "B"]), 0, None);
        assert!(parse_data_row(&row(&["", ""]), &fields, 0).is_none());
    }

    #[test]
    fn test_data_row_short_row_reads_blank() {
        let fields = parse_header_row(&row(&["A", "B", "C"]), 0, None);
        let mapping = parse_data_row(&row(&["x"]), &fields, 0).unwrap();
        assert_eq!(mapping["a"], json!("x"));
        assert_eq!(mapping["b"], Value::Null);
        assert_eq!(mapping["c"], Value::Null);
    }

    #[test]
    fn test_repeated_header_overwrites() {
        let fields = parse_header_row(&row(&["Name", "Name"]), 0, None);
        let mapping = parse_data_row(&row(&["first", "second"]), &fields, 0).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["name"], json!("second"));
    }

    #[test]
    fn test_parse_table_full() {
        let rows = vec![
            row(&["Name", "Value"]),
            row(&["a", "1"]),
            row(&["", ""]),
            row(&["b", "2"]),
        ];
        let parsed = parse_table(&rows, Region::full());
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], json!("a"));
        assert_eq!(parsed[1]["name"], json!("b"));
    }

    #[test]
    fn test_parse_table_region() {
        // Two tables side by side; height includes the header row.
        let rows = vec![
            row(&["Left", "", "", "Right"]),
            row(&["l1", "", "", "r1"]),
            row(&["l2", "", "", "r2"]),
        ];
        let right = parse_table(
            &rows,
            Region {
                start_row: 0,
                start_column: 3,
                height: Some(2),
                width: Some(1),
            },
        );
        assert_eq!(right.len(), 1);
        assert_eq!(right[0]["right"], json!("r1"));
    }

    #[test]
    fn test_parse_table_past_end() {
        let rows = vec![row(&["Name"])];
        assert!(parse_table(
            &rows,
            Region {
                start_row: 10,
                ..Region::default()
            }
        )
        .is_empty());
    }

    #[test]
    fn test_parse_table_trailing_ragged_columns_ignored() {
        let rows = vec![row(&["Name", ""]), row(&["a", "stray"])];
        let parsed = parse_table(&rows, Region::full());
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].len(), 1);
    }
}
