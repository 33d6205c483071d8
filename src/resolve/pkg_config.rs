//! Package metadata queries
//!
//! Asks `pkg-config --cflags <name>` for the include directories of a
//! library. Any failure (missing binary, unknown package, timeout) is an
//! error here and "no flags" to the resolver.

use std::process::Command;
use std::time::Duration;
use tracing::debug;

use crate::config::PkgConfigSettings;
use crate::timeout::{run_with_timeout, TimeoutError};

/// Errors from a package metadata query
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Command(#[from] TimeoutError),

    #[error("{command} --cflags {package} exited with {code:?}")]
    Failed {
        command: String,
        package: String,
        code: Option<i32>,
    },
}

/// Source of compiler flags for a named package
pub trait PackageQuery {
    /// All compile flags reported for `package`, in tool output order.
    fn cflags(&self, package: &str) -> Result<Vec<String>, QueryError>;
}

impl<Q: PackageQuery + ?Sized> PackageQuery for &Q {
    fn cflags(&self, package: &str) -> Result<Vec<String>, QueryError> {
        (**self).cflags(package)
    }
}

/// `pkg-config` (or a compatible tool such as `pkgconf`) with a hard timeout
#[derive(Debug, Clone)]
pub struct PkgConfig {
    command: String,
    timeout: Duration,
}

impl PkgConfig {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &PkgConfigSettings) -> Self {
        Self::new(settings.command.clone(), settings.timeout())
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for PkgConfig {
    fn default() -> Self {
        Self::from_settings(&crate::config::GeneratorConfig::default().pkg_config)
    }
}

impl PackageQuery for PkgConfig {
    fn cflags(&self, package: &str) -> Result<Vec<String>, QueryError> {
        let mut command = Command::new(&self.command);
        command.arg("--cflags").arg(package);

        debug!("Running {} --cflags {}", self.command, package);
        let output = run_with_timeout(&mut command, self.timeout)?;

        if !output.success() {
            return Err(QueryError::Failed {
                command: self.command.clone(),
                package: package.to_string(),
                code: output.status.code(),
            });
        }

        Ok(output.stdout.split_whitespace().map(str::to_string).collect())
    }
}

/// Keep only `-I` tokens, preserving order.
pub fn include_flags(flags: Vec<String>) -> Vec<String> {
    flags
        .into_iter()
        .filter(|flag| flag.starts_with("-I") && flag.len() > 2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_flags_filter() {
        let flags = vec![
            "-I/usr/include/glib-2.0".to_string(),
            "-pthread".to_string(),
            "-DGLIB_STATIC".to_string(),
            "-I".to_string(),
            "-I/usr/lib/glib-2.0/include".to_string(),
            "-isystem/opt/include".to_string(),
        ];
        assert_eq!(
            include_flags(flags),
            vec!["-I/usr/include/glib-2.0", "-I/usr/lib/glib-2.0/include"]
        );
    }

    #[test]
    fn test_missing_command_is_error() {
        let query = PkgConfig::new("/nonexistent/pkg-config", Duration::from_secs(1));
        let err = query.cflags("zlib").unwrap_err();
        assert!(matches!(err, QueryError::Command(TimeoutError::Spawn { .. })));
    }

    #[test]
    fn test_default_uses_pkg_config() {
        let query = PkgConfig::default();
        assert_eq!(query.command(), "pkg-config");
        assert_eq!(query.timeout, Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_splits_tokens() {
        // `echo` stands in for a tool that prints its arguments back.
        let query = PkgConfig::new("echo", Duration::from_secs(5));
        let flags = query.cflags("sdl2").unwrap();
        assert_eq!(flags, vec!["--cflags", "sdl2"]);
        assert!(include_flags(flags).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failed() {
        let query = PkgConfig::new("false", Duration::from_secs(5));
        let err = query.cflags("nope").unwrap_err();
        assert!(matches!(err, QueryError::Failed { code: Some(1), .. }));
        assert!(err.to_string().contains("nope"));
    }
}
