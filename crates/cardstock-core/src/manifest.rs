//! Persisted record of the last imported source list
//!
//! Lets `import` run again without arguments and reuse the previous
//! sources, so a reload only needs one keystroke.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The source files used by the most recent import
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceManifest {
    /// Source filenames, in import order
    pub sources: Vec<String>,
    /// When the list was last replaced
    pub updated: Option<DateTime<Utc>>,
}

impl SourceManifest {
    /// Create a new empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from a file, or create empty if not exists
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the manifest to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Replace the stored source list and stamp the change
    pub fn replace(&mut self, sources: &[String]) {
        self.sources = sources.to_vec();
        self.updated = Some(Utc::now());
    }
}
