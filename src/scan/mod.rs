//! Source tree scan
//!
//! Walks a project root, reads every C source and header file, and
//! collects the distinct header names referenced by `#include`.

mod exclude;
mod include;

pub use exclude::{ExcludeError, ExcludeRules};
pub use include::{extract_includes, IncludeDirective, IncludeKind};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ScanSettings;

/// Errors for scan setup. Per-file problems are never errors.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("project root {path} is not an existing directory")]
    InvalidRoot { path: PathBuf },

    #[error("Exclude rules error: {0}")]
    Exclude(#[from] ExcludeError),
}

/// A path the scan could not read
#[derive(Debug, Clone)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the scan found
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Source and header files read, in walk order
    pub files: Vec<PathBuf>,

    /// Distinct header names across all files
    pub headers: BTreeSet<String>,

    /// Count of `<...>` directives seen, duplicates included
    pub system_includes: usize,

    /// Count of `"..."` directives seen, duplicates included
    pub local_includes: usize,

    /// Files and directories that could not be read
    pub skipped: Vec<SkippedPath>,
}

impl ScanResult {
    fn record(&mut self, directives: Vec<IncludeDirective>) {
        for directive in directives {
            match directive.kind {
                IncludeKind::System => self.system_includes += 1,
                IncludeKind::Local => self.local_includes += 1,
            }
            self.headers.insert(directive.header);
        }
    }
}

/// Recursive scanner for a single project root
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: ExcludeRules,
}

impl Scanner {
    /// Create a scanner for `root` that reads `*.c` and `*.h` files.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot { path: root });
        }
        Ok(Self {
            root,
            extensions: vec!["c".to_string(), "h".to_string()],
            exclude: ExcludeRules::default(),
        })
    }

    /// Create a scanner using configured extensions and exclude globs.
    pub fn from_settings(root: impl Into<PathBuf>, settings: &ScanSettings) -> Result<Self, ScanError> {
        let mut scanner = Self::new(root)?;
        scanner.extensions = settings
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        scanner.exclude = ExcludeRules::new(settings.exclude.as_slice())?;
        Ok(scanner)
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Find all matching files under the root, sorted by path.
    ///
    /// Unreadable directories are recorded in `skipped` and logged.
    pub fn find_source_files(&self, skipped: &mut Vec<SkippedPath>) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|entry| {
                let rel_path = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
                rel_path.as_os_str().is_empty() || !self.exclude.is_excluded(rel_path)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    warn!("Could not read {}: {}", path.display(), e);
                    skipped.push(SkippedPath {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            // Symlinks count when they point at a regular file.
            let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
            if is_file && self.is_source_file(path) {
                files.push(path.to_path_buf());
            }
        }

        files
    }

    /// Scan the tree and collect every included header name.
    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult::default();
        let files = self.find_source_files(&mut result.skipped);

        for file in &files {
            match fs::read(file) {
                Ok(bytes) => {
                    let directives = extract_includes(&String::from_utf8_lossy(&bytes));
                    debug!("{}: {} includes", file.display(), directives.len());
                    result.record(directives);
                }
                Err(e) => {
                    warn!("Could not read {}: {}", file.display(), e);
                    result.skipped.push(SkippedPath {
                        path: file.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        result.files = files;
        result
    }
}
