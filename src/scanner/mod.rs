//! Input directory scanner.
//!
//! Lists the instrument files of the input directory. Only the top level
//! is searched and files are returned in file-system iteration order,
//! which is also the order their rows appear in the corpus.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for file scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory holding the instrument files.
    pub input_dir: PathBuf,
    /// File extension to include, without the dot (e.g. "txt").
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(crate::config::DEFAULT_INPUT_DIR),
            extension: "txt".to_string(),
        }
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            input_dir: config.dir.clone(),
            extension: config.extension.clone(),
        }
    }
}

/// Scanned file information.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name without directory, used for the `File` column.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
}

/// Scanner for instrument files.
pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Create a new file scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The directory being scanned.
    pub fn input_dir(&self) -> &Path {
        &self.config.input_dir
    }

    /// Scan for all matching files, in directory order.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            anyhow::bail!("Input directory not found: {}", dir.display());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry =
                entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !entry.file_type().is_file() || !self.matches(&name) {
                debug!("Skipping {}", name);
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(ScannedFile {
                path: entry.into_path(),
                name,
                size,
            });
        }

        Ok(files)
    }

    /// Check whether a file name carries the configured extension.
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(&format!(".{}", self.config.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(dir: &Path) -> FileScanner {
        FileScanner::new(ScanConfig {
            input_dir: dir.to_path_buf(),
            extension: "txt".to_string(),
        })
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "x").unwrap();
        fs::write(tmp.path().join("b.csv"), "x").unwrap();
        fs::write(tmp.path().join("c.TXT"), "x").unwrap();
        fs::create_dir(tmp.path().join("nested.txt")).unwrap();
        fs::write(tmp.path().join("nested.txt").join("d.txt"), "x").unwrap();

        let files = scanner_for(tmp.path()).scan().unwrap();

        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt"]);
        assert_eq!(files[0].size, 1);
    }

    #[test]
    fn test_scan_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("absent");
        assert!(scanner_for(&missing).scan().is_err());
    }

    #[test]
    fn test_matches() {
        let scanner = scanner_for(Path::new("."));
        assert!(scanner.matches("B_4_IS_1.txt"));
        assert!(!scanner.matches("B_4_IS_1.txt.bak"));
        assert!(!scanner.matches("txt"));
    }
}
