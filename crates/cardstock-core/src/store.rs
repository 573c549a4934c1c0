//! JSON-file-backed card store
//!
//! Imports replace the stored set wholesale: whatever was there before an
//! import is gone after it, even when the import produced nothing. Nothing
//! guards against two simultaneous imports writing the same store file.

use crate::convert::Card;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle on a card store file
#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
}

impl CardStore {
    /// Create a handle; the file is only created on the first replace
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored cards, or an empty set if the file doesn't exist
    pub fn load(&self) -> Result<Vec<Card>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::FileRead {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Replace the entire stored set with the given cards
    pub fn replace(&self, cards: &[Card]) -> Result<()> {
        let content = serde_json::to_string_pretty(cards)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
