//! `#include` directive extraction
//!
//! Line-oriented pattern match, not a preprocessor: directives inside
//! comments or disabled `#if` blocks are picked up too.

use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Delimiter style of an include directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncludeKind {
    /// `#include <name>`
    System,
    /// `#include "name"`
    Local,
}

impl fmt::Display for IncludeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// One extracted `#include` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Header name as written between the delimiters
    pub header: String,
    pub kind: IncludeKind,
}

fn include_regex() -> &'static Regex {
    static INCLUDE_RE: OnceLock<Regex> = OnceLock::new();
    INCLUDE_RE.get_or_init(|| {
        Regex::new(r#"#[ \t]*include[ \t]*(?:<([^>\n]+)>|"([^"\n]+)")"#)
            .expect("include pattern is valid")
    })
}

/// Extract every include directive from source text, in order of appearance.
pub fn extract_includes(source: &str) -> Vec<IncludeDirective> {
    include_regex()
        .captures_iter(source)
        .filter_map(|caps| {
            let (m, kind) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => (m, IncludeKind::System),
                (None, Some(m)) => (m, IncludeKind::Local),
                (None, None) => return None,
            };
            let header = m.as_str().trim();
            if header.is_empty() {
                return None;
            }
            Some(IncludeDirective {
                header: header.to_string(),
                kind,
            })
        })
        .collect()
}
