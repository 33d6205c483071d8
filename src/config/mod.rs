//! Layered configuration
//!
//! Merge order (last wins):
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/gen-clangd/config.toml)
//! 3. Repo config (<root>/.gen-clangd.toml)
//! 4. Environment (PKG_CONFIG)

mod defaults;
mod effective;
mod merge;

pub use defaults::{BuiltinDefaults, LIB_PLACEHOLDER};
pub use effective::{
    default_host_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig,
    GeneratorConfig, OutputSettings, PkgConfigSettings, ScanSettings, SearchSettings,
    PKG_CONFIG_ENV, REPO_CONFIG_FILE,
};
pub use merge::{deep_merge, merge_layers};
