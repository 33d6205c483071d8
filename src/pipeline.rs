//! Generation pipeline
//!
//! Runs the three phases against one project root:
//! - Scan the tree for `#include` directives
//! - Resolve each distinct header to `-I` flags
//! - Merge with the existing `.clangd` `Remove` list and write the file

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clangd_config::{read_remove_flags, ClangdConfigError, ProjectConfig};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, GeneratorConfig};
use crate::resolve::{resolve_all, Aggregate, PackageQuery, PkgConfig, Resolver};
use crate::scan::{ScanError, ScanResult, Scanner};
use crate::summary::GenerationSummary;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot open project root {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("output error: {0}")]
    Write(#[from] ClangdConfigError),
}

/// Result type for pipeline operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Scan and resolve results, before anything is written
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scan: ScanResult,
    pub aggregate: Aggregate,
}

impl Analysis {
    /// The `Add` flags, sorted and de-duplicated.
    pub fn add_flags(&self) -> Vec<String> {
        self.aggregate.flags.iter().cloned().collect()
    }
}

/// `.clangd` generator for one project root
pub struct Generator<Q> {
    root: PathBuf,
    config: GeneratorConfig,
    query: Q,
}

impl Generator<PkgConfig> {
    /// Generator that queries the configured `pkg-config` command.
    pub fn new(root: &Path, config: GeneratorConfig) -> GenerateResult<Self> {
        let query = PkgConfig::from_settings(&config.pkg_config);
        Self::with_query(root, config, query)
    }
}

impl<Q: PackageQuery> Generator<Q> {
    /// Generator with a caller-supplied package metadata source.
    pub fn with_query(root: &Path, config: GeneratorConfig, query: Q) -> GenerateResult<Self> {
        let root = fs::canonicalize(root).map_err(|source| GenerateError::InvalidRoot {
            path: root.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot { path: root }.into());
        }

        Ok(Self {
            root,
            config,
            query,
        })
    }

    /// Where the `.clangd` file is written
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output.file_name)
    }

    /// Scan the tree and resolve every header. Writes nothing.
    pub fn analyze(&self) -> GenerateResult<Analysis> {
        info!("Analyzing project: {}", self.root.display());

        let scanner = Scanner::from_settings(&self.root, &self.config.scan)?;
        let scan = scanner.scan();

        if scan.files.is_empty() {
            warn!("No C files found");
            return Ok(Analysis {
                scan,
                aggregate: Aggregate::default(),
            });
        }

        info!("Found {} C files", scan.files.len());
        if !scan.headers.is_empty() {
            info!("Found {} unique includes", scan.headers.len());
        }

        let mut resolver = Resolver::new(&self.root, &self.query, &self.config.search);
        let aggregate = resolve_all(&mut resolver, &scan.headers);

        Ok(Analysis { scan, aggregate })
    }

    /// Full run: analyze, merge with the existing file, overwrite it.
    pub fn generate(&self) -> GenerateResult<GenerationSummary> {
        let analysis = self.analyze()?;
        let output_path = self.output_path();

        let remove_flags = if output_path.exists() {
            let flags = read_remove_flags(&output_path);
            info!(
                "Found existing {}, preserving {} Remove flags",
                self.config.output.file_name,
                flags.len()
            );
            flags
        } else {
            Vec::new()
        };

        let project_config = ProjectConfig::new(analysis.add_flags(), remove_flags);
        project_config.write_to_file(&output_path)?;

        let summary = GenerationSummary {
            output_path,
            files_scanned: analysis.scan.files.len(),
            unique_headers: analysis.scan.headers.len(),
            add_flags: project_config.add,
            remove_flags: project_config.remove,
            tiers: analysis.aggregate.tier_counts(),
            unresolved: analysis.aggregate.unresolved,
        };
        summary.log();

        Ok(summary)
    }
}
