//! Effective configuration with provenance
//!
//! The effective config is the merged, validated configuration plus the
//! list of sources that contributed to it.

use globset::Glob;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::{BuiltinDefaults, LIB_PLACEHOLDER};
use super::merge::merge_layers;

/// Repo config file name, looked up at the project root
pub const REPO_CONFIG_FILE: &str = ".gen-clangd.toml";

/// Environment variable naming the package metadata command
pub const PKG_CONFIG_ENV: &str = "PKG_CONFIG";

/// Upper bound for the package metadata timeout
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Repo,
    Env,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/env)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Scanner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSettings {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
}

/// Package metadata query settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PkgConfigSettings {
    pub command: String,
    pub timeout_seconds: u64,
}

impl PkgConfigSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Fallback search locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    pub known_prefixes: Vec<String>,
    pub standard_dirs: Vec<PathBuf>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    pub file_name: String,
}

/// Typed view of the merged configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub scan: ScanSettings,
    pub pkg_config: PkgConfigSettings,
    pub search: SearchSettings,
    pub output: OutputSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        BuiltinDefaults::default().into()
    }
}

impl From<BuiltinDefaults> for GeneratorConfig {
    fn from(defaults: BuiltinDefaults) -> Self {
        Self {
            scan: ScanSettings {
                extensions: defaults.extensions,
                exclude: defaults.exclude,
            },
            pkg_config: PkgConfigSettings {
                command: defaults.pkg_config_command,
                timeout_seconds: defaults.pkg_config_timeout_seconds,
            },
            search: SearchSettings {
                known_prefixes: defaults.known_prefixes,
                standard_dirs: defaults.standard_dirs.into_iter().map(PathBuf::from).collect(),
            },
            output: OutputSettings {
                file_name: defaults.output_file_name,
            },
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeout = self.pkg_config.timeout_seconds;
        if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::TimeoutOutOfBounds { value: timeout });
        }

        if self.pkg_config.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        if self.scan.extensions.iter().all(|ext| ext.is_empty()) {
            return Err(ConfigError::NoExtensions);
        }

        for pattern in &self.scan.exclude {
            Glob::new(pattern).map_err(|source| ConfigError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })?;
        }

        if let Some(prefix) = self
            .search
            .known_prefixes
            .iter()
            .find(|p| !p.contains(LIB_PLACEHOLDER))
        {
            return Err(ConfigError::MissingLibPlaceholder {
                prefix: prefix.clone(),
            });
        }

        let name = &self.output.file_name;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(ConfigError::InvalidOutputName { name: name.clone() });
        }

        Ok(())
    }
}

/// Effective configuration with provenance
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// The merged, validated configuration
    pub config: GeneratorConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from layers
    pub fn build(
        host_config_path: Option<&Path>,
        repo_config_path: Option<&Path>,
        env_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
        });

        // Layer 2: Host config
        if let Some(path) = host_config_path {
            if path.exists() {
                layers.push(Self::load_toml_file(path)?);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Host,
                    path: Some(path.to_string_lossy().to_string()),
                });
            }
        }

        // Layer 3: Repo config
        if let Some(path) = repo_config_path {
            if path.exists() {
                layers.push(Self::load_toml_file(path)?);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Repo,
                    path: Some(path.to_string_lossy().to_string()),
                });
            }
        }

        // Layer 4: Environment
        if let Some(env) = env_overrides {
            layers.push(env);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Env,
                path: None,
            });
        }

        let merged = merge_layers(layers);
        let config: GeneratorConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::InvalidShape(e.to_string()))?;
        config.validate()?;

        Ok(Self { config, sources })
    }

    /// Build the config that applies to a project root: host file, the
    /// root's `.gen-clangd.toml`, then `PKG_CONFIG` from the environment.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let host = default_host_config_path();
        let repo = root.join(REPO_CONFIG_FILE);
        Self::build(host.as_deref(), Some(&repo), env_overrides())
    }

    /// Load and parse a TOML file into a JSON value
    fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let toml_value: toml::Value =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(toml_to_json(toml_value))
    }
}

/// Host config location: `$XDG_CONFIG_HOME/gen-clangd/config.toml`,
/// falling back to `~/.config/gen-clangd/config.toml`.
pub fn default_host_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("gen-clangd").join("config.toml"))
}

/// Overrides taken from the process environment.
fn env_overrides() -> Option<Value> {
    let command = std::env::var(PKG_CONFIG_ENV).ok()?;
    if command.trim().is_empty() {
        return None;
    }
    Some(serde_json::json!({ "pkg_config": { "command": command } }))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidShape(String),

    #[error("pkg_config.timeout_seconds must be in (0, 300], got {value}")]
    TimeoutOutOfBounds { value: u64 },

    #[error("pkg_config.command must not be empty")]
    EmptyCommand,

    #[error("scan.extensions must name at least one extension")]
    NoExtensions,

    #[error("invalid scan.exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("search.known_prefixes entry '{prefix}' is missing the {{lib}} placeholder")]
    MissingLibPlaceholder { prefix: String },

    #[error("output.file_name must be a plain file name, got '{name}'")]
    InvalidOutputName { name: String },
}
