//! gen-clangd - `.clangd` generator for C projects
//!
//! Scans a C project for `#include` directives, works out which include
//! directories make those headers findable, and writes them into the
//! project's `.clangd` file while keeping any existing `Remove` flags.

pub mod config;
pub mod pipeline;
pub mod resolve;
pub mod scan;
pub mod summary;
pub mod timeout;

pub use config::{ConfigError, EffectiveConfig, GeneratorConfig};
pub use pipeline::{Analysis, GenerateError, Generator};
pub use resolve::{PackageQuery, PkgConfig, QueryError, ResolutionTier, Resolver};
pub use scan::{ScanResult, Scanner};
pub use summary::GenerationSummary;
