//! Card records and the flat conversion strategy

use crate::error::{Error, Result};
use crate::extract::{parse_header_row, parse_table, Field, Mapping, Region};
use crate::grid::{Sheet, SourceFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Template files always carry this extension
pub const TEMPLATE_EXTENSION: &str = "html";

/// Directory prefix templates are served from
const TEMPLATE_PREFIX: &str = "custom/";

/// A single card entry, the final output unit of an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub template_name: String,
    pub quantity: u32,
    /// Everything from the source row that isn't name/template/quantity
    pub data: Mapping,
}

impl Card {
    /// Translate the stored template name into a path under the template
    /// directory. Idempotent: an already-suffixed, already-rooted name
    /// passes through unchanged.
    pub fn template_path(&self) -> String {
        let template = ensure_extension(&self.template_name, TEMPLATE_EXTENSION);

        if template.starts_with(TEMPLATE_PREFIX) {
            template
        } else {
            format!("{}{}", TEMPLATE_PREFIX, template)
        }
    }
}

/// Tag a name with a file extension if it doesn't have one already
pub fn ensure_extension(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// A conversion strategy: worksheet in, cards out.
///
/// `convert` parses one worksheet into logical entities; `to_cards` expands
/// one entity into zero or more cards. The two halves are split so callers
/// can inspect or count entities between the steps.
pub trait SheetConverter {
    /// Parse one worksheet into logical entities
    fn convert(&self, sheet: &Sheet) -> Result<Vec<Mapping>>;

    /// Expand one entity into zero or more cards
    fn to_cards(&self, entity: Mapping) -> Result<Vec<Card>>;
}

/// The flat strategy: the whole sheet is one table, one entity per row
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatConverter;

impl SheetConverter for FlatConverter {
    fn convert(&self, sheet: &Sheet) -> Result<Vec<Mapping>> {
        let mut rows = parse_table(&sheet.rows, Region::full());

        let fields = match sheet.rows.first() {
            Some(header) => parse_header_row(header, 0, None),
            None => Vec::new(),
        };

        let columns = list_columns(sheet.format, &fields, &rows);
        normalize_list_columns(&mut rows, &columns);

        Ok(rows)
    }

    fn to_cards(&self, mut entity: Mapping) -> Result<Vec<Card>> {
        let name = pop_string(&mut entity, "name");
        let template_string = pop_string(&mut entity, "template");
        let quantity = pop_quantity(&mut entity)?;

        // A row without both a name and a template is an annotation or
        // leftover, not a card.
        let (Some(name), Some(template_string)) = (name, template_string) else {
            return Ok(Vec::new());
        };

        // Multiple comma-separated templates mean one card per template,
        // each with its own copy of the data.
        let cards = template_string
            .split(',')
            .map(|template| Card {
                name: name.clone(),
                template_name: ensure_extension(template.trim(), TEMPLATE_EXTENSION),
                quantity,
                data: entity.clone(),
            })
            .collect();

        Ok(cards)
    }
}

/// Which fields of a sheet hold lists.
///
/// Spreadsheets declare list columns in the header with a `*` marker. CSV
/// files have no marker convention, so any column with a newline somewhere
/// in its data is treated as a list column. The two rules are deliberately
/// separate: unifying them would change the output for existing files.
fn list_columns(format: SourceFormat, fields: &[Field], rows: &[Mapping]) -> Vec<String> {
    fields
        .iter()
        .filter(|field| match format {
            SourceFormat::Spreadsheet => field.is_list,
            SourceFormat::Csv => {
                field.is_list
                    || rows.iter().any(|row| {
                        matches!(row.get(&field.name), Some(Value::String(s)) if s.contains('\n'))
                    })
            }
        })
        .map(|field| field.name.clone())
        .collect()
}

/// Force every row's value for the given columns into list form: nulls
/// become empty lists, bare strings split on newlines, lists pass through.
fn normalize_list_columns(rows: &mut [Mapping], columns: &[String]) {
    for row in rows.iter_mut() {
        for column in columns {
            if let Some(value) = row.get_mut(column) {
                let current = value.take();
                *value = match current {
                    Value::Null => Value::Array(Vec::new()),
                    Value::String(s) => Value::Array(
                        s.split('\n').map(|part| Value::String(part.to_string())).collect(),
                    ),
                    other => other,
                };
            }
        }
    }
}

/// Remove a field and return it as a non-empty string, if it was one
pub(crate) fn pop_string(entity: &mut Mapping, key: &str) -> Option<String> {
    match entity.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Remove the quantity field; missing or blank means 1
fn pop_quantity(entity: &mut Mapping) -> Result<u32> {
    match entity.remove("quantity") {
        None | Some(Value::Null) => Ok(1),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(1),
        Some(Value::String(s)) => {
            let parsed: i64 = s.trim().parse().map_err(|_| Error::NumberParse {
                field: "quantity".to_string(),
                value: s.clone(),
            })?;
            Ok(parsed.clamp(1, i64::from(u32::MAX)) as u32)
        }
        Some(other) => Err(Error::NumberParse {
            field: "quantity".to_string(),
            value: other.to_string(),
        }),
    }
}
