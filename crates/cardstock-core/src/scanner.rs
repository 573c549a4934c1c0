//! Directory scanner for discovering importable source files

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the reader knows how to open
const SOURCE_EXTENSIONS: &[&str] = &["csv", "xlsx"];

/// Result of scanning directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Discovered source files, sorted by path
    pub files: Vec<PathBuf>,
}

impl ScanResult {
    /// Get the number of discovered files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Scan one or more directories for importable spreadsheet/CSV sources
pub fn scan_sources<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult> {
    let mut files = Vec::new();

    for root in roots {
        for entry in WalkDir::new(root.as_ref()).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            let importable = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));

            if importable {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();

    Ok(ScanResult {
        roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
        files,
    })
}
