//! Header resolution
//!
//! Maps a header name to the `-I` flags that make it findable. Tiers are
//! tried in a fixed order and the first one that yields flags wins:
//!
//! 1. Local: `<root>/<header>` is a file → its containing directory
//! 2. Package metadata: `pkg-config --cflags <lib>` for `lib/...` headers
//! 3. Known prefixes: `/opt/homebrew/opt/<lib>/include` and friends
//! 4. Standard dirs: first of `/usr/include`, ... containing the header
//!
//! Every tier emits `-I<dir>`.

mod aggregate;
mod pkg_config;

pub use aggregate::{resolve_all, Aggregate};
pub use pkg_config::{include_flags, PackageQuery, PkgConfig, QueryError};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{SearchSettings, LIB_PLACEHOLDER};

/// Which fallback produced a header's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolutionTier {
    Local,
    PackageMetadata,
    KnownPrefix,
    StandardDir,
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::PackageMetadata => write!(f, "pkg-config"),
            Self::KnownPrefix => write!(f, "known prefix"),
            Self::StandardDir => write!(f, "standard dir"),
        }
    }
}

/// Flags found for one header and the tier that found them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tier: ResolutionTier,
    pub flags: Vec<String>,
}

/// Format a directory as an include flag.
pub fn include_flag(dir: &Path) -> String {
    format!("-I{}", dir.display())
}

/// Candidate library name: the first path segment of a nested header.
///
/// `GL/gl.h` → `GL`; `stdio.h` → None.
pub fn library_name(header: &str) -> Option<&str> {
    header
        .split_once('/')
        .map(|(lib, _)| lib)
        .filter(|lib| !lib.is_empty() && *lib != "." && *lib != "..")
}

/// Ordered-fallback header resolver for one project root
pub struct Resolver<Q> {
    root: PathBuf,
    query: Q,
    known_prefixes: Vec<String>,
    standard_dirs: Vec<PathBuf>,
    /// `-I` flags per library name; one query per name per run.
    package_cache: HashMap<String, Vec<String>>,
}

impl<Q: PackageQuery> Resolver<Q> {
    pub fn new(root: impl Into<PathBuf>, query: Q, search: &SearchSettings) -> Self {
        Self {
            root: root.into(),
            query,
            known_prefixes: search.known_prefixes.clone(),
            standard_dirs: search.standard_dirs.clone(),
            package_cache: HashMap::new(),
        }
    }

    /// Resolve one header. None means every tier came up empty.
    ///
    /// Absolute header paths are never resolved: they need no `-I` flag.
    pub fn resolve(&mut self, header: &str) -> Option<Resolution> {
        if header.is_empty() || Path::new(header).is_absolute() {
            return None;
        }

        if let Some(flag) = self.resolve_local(header) {
            return Some(Resolution {
                tier: ResolutionTier::Local,
                flags: vec![flag],
            });
        }

        if let Some(lib) = library_name(header) {
            let flags = self.resolve_package(lib);
            if !flags.is_empty() {
                return Some(Resolution {
                    tier: ResolutionTier::PackageMetadata,
                    flags,
                });
            }

            let flags = self.resolve_known_prefixes(lib);
            if !flags.is_empty() {
                return Some(Resolution {
                    tier: ResolutionTier::KnownPrefix,
                    flags,
                });
            }
        }

        self.resolve_standard(header).map(|flag| Resolution {
            tier: ResolutionTier::StandardDir,
            flags: vec![flag],
        })
    }

    fn resolve_local(&self, header: &str) -> Option<String> {
        let candidate = self.root.join(header);
        if !candidate.is_file() {
            return None;
        }
        let dir = candidate.parent()?;
        let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        Some(include_flag(&dir))
    }

    fn resolve_package(&mut self, lib: &str) -> Vec<String> {
        if let Some(cached) = self.package_cache.get(lib) {
            return cached.clone();
        }

        let flags = match self.query.cflags(lib) {
            Ok(flags) => include_flags(flags),
            Err(QueryError::Command(e)) if e.is_timeout() => {
                debug!("Package query for {} abandoned: {}", lib, e);
                Vec::new()
            }
            Err(e) => {
                debug!("No package metadata for {}: {}", lib, e);
                Vec::new()
            }
        };

        self.package_cache.insert(lib.to_string(), flags.clone());
        flags
    }

    fn resolve_known_prefixes(&self, lib: &str) -> Vec<String> {
        self.known_prefixes
            .iter()
            .map(|template| PathBuf::from(template.replace(LIB_PLACEHOLDER, lib)))
            .filter(|dir| dir.is_dir())
            .map(|dir| include_flag(&dir))
            .collect()
    }

    fn resolve_standard(&self, header: &str) -> Option<String> {
        self.standard_dirs
            .iter()
            .find(|dir| dir.join(header).is_file())
            .map(|dir| include_flag(dir))
    }
}
