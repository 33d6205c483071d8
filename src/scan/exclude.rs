//! Exclusion rules for the source scan
//!
//! Patterns are globs matched against paths relative to the project root.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum ExcludeError {
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
}

/// Exclusion rules for filtering scanned paths
#[derive(Debug)]
pub struct ExcludeRules {
    glob_set: GlobSet,
}

impl Default for ExcludeRules {
    fn default() -> Self {
        Self {
            glob_set: GlobSet::empty(),
        }
    }
}

impl ExcludeRules {
    /// Build rules from glob patterns; empty patterns are ignored
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ExcludeError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if !pattern.is_empty() {
                builder.add(Glob::new(pattern)?);
            }
        }

        Ok(Self {
            glob_set: builder.build()?,
        })
    }

    /// Check if a root-relative path should be excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.glob_set.is_match(path_str.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_excluded() {
        let rules = ExcludeRules::new(&[".git", ".git/**"]).unwrap();

        assert!(rules.is_excluded(Path::new(".git")));
        assert!(rules.is_excluded(Path::new(".git/hooks/sample.h")));
        assert!(!rules.is_excluded(Path::new("src/git.c")));
    }

    #[test]
    fn test_custom_patterns() {
        let rules = ExcludeRules::new(&["build/**", "third_party/*/test/**"]).unwrap();

        assert!(rules.is_excluded(Path::new("build/gen/config.h")));
        assert!(rules.is_excluded(Path::new("third_party/zlib/test/example.c")));
        assert!(!rules.is_excluded(Path::new("third_party/zlib/zlib.h")));
        assert!(!rules.is_excluded(Path::new("src/main.c")));
    }

    #[test]
    fn test_blank_patterns_ignored() {
        let rules = ExcludeRules::new(&["", "   "]).unwrap();
        assert!(!rules.is_excluded(Path::new("")));
        assert!(!rules.is_excluded(Path::new("main.c")));
    }

    #[test]
    fn test_default_excludes_nothing() {
        let rules = ExcludeRules::default();
        assert!(!rules.is_excluded(Path::new(".git")));
        assert!(!rules.is_excluded(Path::new("build/out.c")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = ExcludeRules::new(&["src/[abc"]);
        assert!(matches!(result, Err(ExcludeError::GlobError(_))));
    }
}
