//! Import orchestration: sources in, stored cards out
//!
//! One import run is synchronous and whole-in-memory: every configured
//! source is loaded, converted through the selected strategy, and the
//! resulting cards replace the store's previous contents in one step.

use crate::character::CharacterSheetConverter;
use crate::convert::{Card, FlatConverter, SheetConverter};
use crate::error::Result;
use crate::manifest::SourceManifest;
use crate::reader::load_sources;
use crate::store::CardStore;
use std::path::Path;

/// Which conversion strategy an import run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One table per sheet, one entity per row
    #[default]
    Flat,
    /// Six-block character sheet, one entity per sheet
    CharacterSheet,
}

impl Strategy {
    /// Build the converter for this strategy
    pub fn converter(self) -> Box<dyn SheetConverter> {
        match self {
            Strategy::Flat => Box::new(FlatConverter),
            Strategy::CharacterSheet => Box::new(CharacterSheetConverter::default()),
        }
    }
}

/// What an import run produced
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// The source files that were read
    pub sources: Vec<String>,
    /// How many worksheets were converted
    pub sheets: usize,
    /// Names of the created cards, in store order
    pub names: Vec<String>,
}

impl ImportSummary {
    /// Get the number of cards created
    pub fn card_count(&self) -> usize {
        self.names.len()
    }
}

/// Run one import: resolve sources against the manifest, convert them with
/// the chosen strategy, and replace the store's contents.
///
/// An empty `filenames` list means "rerun the last import" and reads the
/// manifest instead; a non-empty list replaces the manifest. Either way the
/// store ends up holding exactly what this run produced, which for an empty
/// input set is nothing.
pub fn import_sources<P: AsRef<Path>>(
    filenames: &[String],
    strategy: Strategy,
    store: &CardStore,
    manifest_path: P,
) -> Result<ImportSummary> {
    let mut manifest = SourceManifest::load(&manifest_path)?;

    let sources = if filenames.is_empty() {
        manifest.sources.clone()
    } else {
        manifest.replace(filenames);
        manifest.save(&manifest_path)?;
        filenames.to_vec()
    };

    let converter = strategy.converter();
    let sheets = load_sources(&sources)?;

    let mut cards: Vec<Card> = Vec::new();
    for sheet in &sheets {
        for entity in converter.convert(sheet)? {
            cards.extend(converter.to_cards(entity)?);
        }
    }

    store.replace(&cards)?;

    Ok(ImportSummary {
        sources,
        sheets: sheets.len(),
        names: cards.into_iter().map(|c| c.name).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn paths(dir: &tempfile::TempDir) -> (CardStore, std::path::PathBuf) {
        (
            CardStore::new(dir.path().join("cards.json")),
            dir.path().join("sources.json"),
        )
    }

    #[test]
    fn test_import_flat_csv() {
        let dir = tempfile::tempdir().unwrap();
        let (store, manifest_path) = paths(&dir);

        let source = dir.path().join("deck.csv");
        fs::write(&source, "name,template,Card Rules\na_card,a_template.html,some_data\n")
            .unwrap();

        let summary = import_sources(
            &[source.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();

        assert_eq!(summary.sheets, 1);
        assert_eq!(summary.card_count(), 1);
        assert_eq!(summary.names, vec!["a_card".to_string()]);

        let stored = store.load().unwrap();
        assert_eq!(stored[0].template_name, "a_template.html");
    }

    #[test]
    fn test_import_replaces_store() {
        let dir = tempfile::tempdir().unwrap();
        let (store, manifest_path) = paths(&dir);

        let first = dir.path().join("first.csv");
        fs::write(&first, "name,template\nold_card,test\n").unwrap();
        let second = dir.path().join("second.csv");
        fs::write(&second, "name,template\nnew_card,test\n").unwrap();

        import_sources(
            &[first.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();
        import_sources(
            &[second.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();

        let stored = store.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "new_card");
    }

    #[test]
    fn test_rerun_uses_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let (store, manifest_path) = paths(&dir);

        let source = dir.path().join("deck.csv");
        fs::write(&source, "name,template\na_card,test\n").unwrap();

        import_sources(
            &[source.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();

        // No filenames: the manifest supplies the previous list.
        let summary =
            import_sources(&[], Strategy::Flat, &store, &manifest_path).unwrap();
        assert_eq!(summary.card_count(), 1);
        assert_eq!(summary.sources.len(), 1);
    }

    #[test]
    fn test_empty_input_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let (store, manifest_path) = paths(&dir);

        let source = dir.path().join("deck.csv");
        fs::write(&source, "name,template\na_card,test\n").unwrap();
        import_sources(
            &[source.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();

        // Run again with no sources at all: a no-op success that still
        // clears the previous set.
        fs::remove_file(dir.path().join("sources.json")).unwrap();
        let summary = import_sources(&[], Strategy::Flat, &store, &manifest_path).unwrap();

        assert_eq!(summary.card_count(), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_rows_without_name_create_no_cards() {
        let dir = tempfile::tempdir().unwrap();
        let (store, manifest_path) = paths(&dir);

        let source = dir.path().join("deck.csv");
        fs::write(&source, "name,template,Notes\n,test,annotation row\n").unwrap();

        let summary = import_sources(
            &[source.to_string_lossy().into_owned()],
            Strategy::Flat,
            &store,
            &manifest_path,
        )
        .unwrap();

        assert_eq!(summary.card_count(), 0);
        assert!(store.load().unwrap().is_empty());
    }
}
