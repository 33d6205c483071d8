//! `.clangd` CompileFlags model.
//!
//! Reads the `Remove` list out of an existing `.clangd` file and writes a
//! fresh `CompileFlags` mapping with `Add` and `Remove` lists.

pub mod emit;
pub mod error;
pub mod model;
pub mod parse;

pub use emit::render;
pub use error::ClangdConfigError;
pub use model::ProjectConfig;
pub use parse::{extract_remove, extract_remove_textual, read_remove_flags};

/// Default file name clangd looks for at a project root.
pub const CLANGD_FILE_NAME: &str = ".clangd";

/// Root key under which the flag lists live.
pub const COMPILE_FLAGS_KEY: &str = "CompileFlags";
