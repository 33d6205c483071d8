//! Run summary
//!
//! What a generation run produced: progress details go to the log
//! (stderr), the short human summary goes to stdout.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::resolve::ResolutionTier;

/// Outcome of one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    /// The `.clangd` file that was written
    pub output_path: PathBuf,

    /// Number of source and header files scanned
    pub files_scanned: usize,

    /// Number of distinct header names found
    pub unique_headers: usize,

    /// Include flags written under `Add`, sorted
    pub add_flags: Vec<String>,

    /// Flags carried over under `Remove`, original order
    pub remove_flags: Vec<String>,

    /// Resolved header count per tier
    pub tiers: BTreeMap<ResolutionTier, usize>,

    /// Headers nothing could place
    pub unresolved: Vec<String>,
}

impl GenerationSummary {
    /// Log the detailed outcome.
    pub fn log(&self) {
        info!("Generated: {}", self.output_path.display());

        if self.add_flags.is_empty() {
            warn!("No include paths found. Manual configuration may be needed.");
        } else {
            info!("Include paths added ({}):", self.add_flags.len());
            for (i, flag) in self.add_flags.iter().enumerate() {
                info!("  {}. {}", i + 1, flag);
            }
        }

        if !self.remove_flags.is_empty() {
            info!("Preserved Remove flags ({}):", self.remove_flags.len());
            for flag in &self.remove_flags {
                info!("  - {}", flag);
            }
        }

        for (tier, count) in &self.tiers {
            tracing::debug!("{} header(s) resolved via {}", count, tier);
        }
        if !self.unresolved.is_empty() {
            tracing::debug!("Unresolved headers: {}", self.unresolved.join(", "));
        }
    }

    /// Short summary for stdout.
    pub fn to_human(&self) -> String {
        let file_name = self
            .output_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let mut output = format!("{} generated: {}\n", file_name, self.output_path.display());

        if !self.add_flags.is_empty() {
            output.push_str("\nInclude paths added:\n");
            for flag in &self.add_flags {
                output.push_str(&format!("  • {}\n", flag));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_human_lists_flags() {
        let summary = GenerationSummary {
            output_path: PathBuf::from("/proj/.clangd"),
            add_flags: vec!["-I/proj".to_string(), "-I/usr/include".to_string()],
            ..Default::default()
        };

        assert_eq!(
            summary.to_human(),
            ".clangd generated: /proj/.clangd\n\nInclude paths added:\n  • -I/proj\n  • -I/usr/include\n"
        );
    }

    #[test]
    fn test_to_human_without_flags() {
        let summary = GenerationSummary {
            output_path: PathBuf::from("/proj/.clangd"),
            remove_flags: vec!["-Wall".to_string()],
            ..Default::default()
        };

        assert_eq!(summary.to_human(), ".clangd generated: /proj/.clangd\n");
    }

    #[test]
    fn test_to_human_uses_configured_file_name() {
        let summary = GenerationSummary {
            output_path: PathBuf::from("/proj/.clangd.local"),
            add_flags: vec!["-I/proj".to_string()],
            ..Default::default()
        };

        let text = summary.to_human();
        assert!(text.starts_with(".clangd.local generated: /proj/.clangd.local\n"));
        assert!(!text.starts_with(".clangd generated"));
    }
}
