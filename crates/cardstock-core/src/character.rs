//! The character-sheet conversion strategy
//!
//! Interprets one worksheet as a fixed six-block layout describing a single
//! character: an identity block, a traits block, a spells table, core and
//! derived stats, and a skills table. The whole sheet collapses into one
//! entity, which expands into two or three cards.

use crate::convert::{pop_string, Card, SheetConverter};
use crate::error::{Error, Result};
use crate::extract::{parse_table, Mapping, Region};
use crate::grid::Sheet;
use serde_json::Value;

/// Where each block sits on the sheet.
///
/// These coordinates are a contract with the source sheets; change them
/// only together with the sheet template.
#[derive(Debug, Clone, Copy)]
pub struct SheetLayout {
    pub identity: Region,
    pub traits: Region,
    pub spells: Region,
    pub stats: Region,
    pub derived_stats: Region,
    pub skills: Region,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            identity: Region {
                start_row: 0,
                start_column: 0,
                height: Some(2),
                width: Some(4),
            },
            traits: Region {
                start_row: 0,
                start_column: 5,
                height: Some(2),
                width: Some(4),
            },
            spells: Region {
                start_row: 0,
                start_column: 10,
                height: Some(5),
                width: Some(5),
            },
            stats: Region {
                start_row: 3,
                start_column: 0,
                height: Some(9),
                width: Some(3),
            },
            derived_stats: Region {
                start_row: 3,
                start_column: 4,
                height: Some(8),
                width: Some(2),
            },
            skills: Region {
                start_row: 15,
                start_column: 0,
                height: None,
                width: Some(7),
            },
        }
    }
}

/// The character-sheet strategy: one sheet, one character, up to three cards
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterSheetConverter {
    pub layout: SheetLayout,
}

impl SheetConverter for CharacterSheetConverter {
    fn convert(&self, sheet: &Sheet) -> Result<Vec<Mapping>> {
        let identity_table = parse_table(&sheet.rows, self.layout.identity);
        let traits_table = parse_table(&sheet.rows, self.layout.traits);
        let spell_table = parse_table(&sheet.rows, self.layout.spells);
        let stat_table = parse_table(&sheet.rows, self.layout.stats);
        let mut derived_stat_table = parse_table(&sheet.rows, self.layout.derived_stats);
        let skill_table = parse_table(&sheet.rows, self.layout.skills);

        // Both the identity and traits blocks hold a single data row.
        let identity = single_row(identity_table, &sheet.name, "identity")?;
        let traits = single_row(traits_table, &sheet.name, "traits")?;

        rewrite_damage_bonus(&mut derived_stat_table)?;
        let skills = flatten_skills(&skill_table, &sheet.name)?;

        // Identity and trait fields live on the root of the character, with
        // traits winning any name clash.
        let mut character = identity;
        for (key, value) in traits {
            character.insert(key, value);
        }

        character.insert("stats".to_string(), table_value(stat_table));
        character.insert("derived_stats".to_string(), table_value(derived_stat_table));
        character.insert("skills".to_string(), table_value(skills));
        character.insert("spells".to_string(), table_value(spell_table));

        Ok(vec![character])
    }

    /// Each character becomes a stats card and a skills card, plus a spells
    /// card when there are any spells. Every card carries the full
    /// character data, so templates can cross-reference freely.
    fn to_cards(&self, mut entity: Mapping) -> Result<Vec<Card>> {
        let Some(name) = pop_string(&mut entity, "name") else {
            return Ok(Vec::new());
        };

        let has_spells = matches!(entity.get("spells"), Some(Value::Array(spells)) if !spells.is_empty());

        let mut templates = vec!["stats.html", "skills.html"];
        if has_spells {
            templates.push("spells.html");
        }

        let cards = templates
            .into_iter()
            .map(|template| Card {
                name: name.clone(),
                template_name: template.to_string(),
                quantity: 1,
                data: entity.clone(),
            })
            .collect();

        Ok(cards)
    }
}

/// Wrap a list of row mappings as a JSON array value
fn table_value(rows: Vec<Mapping>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}

/// Take the single data row of a block, or fail with the block's name
fn single_row(table: Vec<Mapping>, sheet: &str, block: &str) -> Result<Mapping> {
    table
        .into_iter()
        .next()
        .ok_or_else(|| Error::SheetLayout {
            sheet: sheet.to_string(),
            detail: format!("the {} block has no data row", block),
        })
}

/// Damage bonuses are stored as a number but rendered as a die modifier.
/// Rewrite the value of the `damage_bonus` row in place; a sheet without
/// one is left alone.
fn rewrite_damage_bonus(derived_stats: &mut [Mapping]) -> Result<()> {
    for row in derived_stats.iter_mut() {
        if row.get("derived_stat").and_then(Value::as_str) != Some("damage_bonus") {
            continue;
        }

        let bonus = required_number(row.get("value"), "value")?;
        row.insert(
            "value".to_string(),
            Value::String(damage_die(bonus).to_string()),
        );
        break;
    }

    Ok(())
}

/// Map a raw damage-bonus number to its die modifier
fn damage_die(bonus: i64) -> &'static str {
    if bonus <= 12 {
        "-1d6"
    } else if bonus <= 16 {
        "-1d4"
    } else if bonus <= 24 {
        "None"
    } else if bonus <= 32 {
        "+1d4"
    } else if bonus <= 40 {
        "+1d6"
    } else {
        "+2d6"
    }
}

/// Collapse the two-level skill table into a flat list of `{name, value}`
/// entries.
///
/// Indentation in the skill-name cell marks a specialization of the most
/// recent unindented skill, renamed to `parent (specialization)`. Rows
/// still carrying the sheet template's literal `Speciality N` placeholder
/// are dropped no matter what they score, as are rows whose total is blank
/// or 2 and below (visual noise on a filled-in sheet).
fn flatten_skills(skill_table: &[Mapping], sheet: &str) -> Result<Vec<Mapping>> {
    let mut skills = Vec::new();
    let mut parent_skill_name: Option<String> = None;

    for skill_row in skill_table {
        let raw_name = skill_row
            .get("skill")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::SheetLayout {
                sheet: sheet.to_string(),
                detail: "a skill row has no name".to_string(),
            })?;

        let name = if raw_name.starts_with(' ') {
            let speciality = raw_name.trim_start();

            if speciality.starts_with("Speciality") {
                continue;
            }

            // A specialization before any parent has nothing to attach to.
            let Some(parent) = parent_skill_name.as_deref() else {
                continue;
            };

            format!("{} ({})", parent, speciality)
        } else {
            parent_skill_name = Some(raw_name.to_string());
            raw_name.to_string()
        };

        // Blank totals mean the skill was never taken; low totals are noise.
        let total = match skill_row.get("total") {
            None | Some(Value::Null) => continue,
            value => required_number(value, "total")?,
        };
        if total <= 2 {
            continue;
        }

        let mut entry = Mapping::new();
        entry.insert("name".to_string(), Value::String(name));
        entry.insert("value".to_string(), Value::Number(total.into()));
        skills.push(entry);
    }

    Ok(skills)
}

/// Parse a field that must hold a number; a blank or non-numeric value is a
/// fatal parse failure for the run
fn required_number(value: Option<&Value>, field: &str) -> Result<i64> {
    let text = value.and_then(Value::as_str).unwrap_or("");
    text.trim().parse().map_err(|_| Error::NumberParse {
        field: field.to_string(),
        value: text.to_string(),
    })
}
