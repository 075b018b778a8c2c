//! Runtime configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `ROUTESMITH_*` environment variables, then command-line flags (applied by
//! the binary).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// Environment variable overriding [`Config::base_dir`]
pub const ENV_BASE_DIR: &str = "ROUTESMITH_BASE_DIR";
/// Environment variable overriding [`Config::required_env`] (comma separated)
pub const ENV_REQUIRED_ENV: &str = "ROUTESMITH_REQUIRED_ENV";
/// Environment variable overriding [`Config::service_timeout_ms`]
pub const ENV_SERVICE_TIMEOUT_MS: &str = "ROUTESMITH_SERVICE_TIMEOUT_MS";

/// Top-level configuration for a generation session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that project folders are created in and the initial project root
    pub base_dir: PathBuf,
    /// Environment variables that must be present before generation starts
    pub required_env: Vec<String>,
    /// Abort timeout baked into generated service modules
    pub service_timeout_ms: u64,
    pub package_manager: PackageManagerConfig,
    pub formatter: FormatterConfig,
}

/// Package manager used by `install_dependencies`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    pub program: String,
    pub packages: Vec<String>,
}

/// Source formatter used by `format_files`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            required_env: Vec::new(),
            service_timeout_ms: 10_000,
            package_manager: PackageManagerConfig::default(),
            formatter: FormatterConfig::default(),
        }
    }
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            packages: ["express", "helmet", "cors", "nodemon"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: ["prettier", "--write", "./"]
                .iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Default location of the user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routesmith").join("config.toml"))
    }

    /// Load configuration from `path`, or from [`Config::default_path`] when
    /// none is given. An explicit path must exist; the default one may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::from_file(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `ROUTESMITH_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_BASE_DIR) {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(list) = lookup(ENV_REQUIRED_ENV) {
            self.required_env = list
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(timeout) = lookup(ENV_SERVICE_TIMEOUT_MS) {
            self.service_timeout_ms = timeout.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{ENV_SERVICE_TIMEOUT_MS} must be a positive integer, got '{timeout}'"
                ))
            })?;
        }
        Ok(self)
    }

    /// Fail with [`Error::MissingEnv`] for the first required variable that is absent
    pub fn check_required_env<F>(&self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for var in &self.required_env {
            if lookup(var).is_none() {
                return Err(Error::missing_env(var.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_dir, PathBuf::from("."));
        assert!(config.required_env.is_empty());
        assert_eq!(config.service_timeout_ms, 10_000);
        assert_eq!(config.package_manager.program, "npm");
        assert_eq!(
            config.package_manager.packages,
            vec!["express", "helmet", "cors", "nodemon"]
        );
        assert_eq!(config.formatter.args, vec!["prettier", "--write", "./"]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            base_dir = "/tmp/projects"
            required_env = ["GOOGLE_API_KEY"]

            [formatter]
            program = "prettier"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/tmp/projects"));
        assert_eq!(config.required_env, vec!["GOOGLE_API_KEY"]);
        assert_eq!(config.formatter.program, "prettier");
        assert_eq!(config.formatter.args, vec!["prettier", "--write", "./"]);
        assert_eq!(config.package_manager.program, "npm");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = Config::from_toml_str("service_timeout_ms = \"soon\"");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(env(&[
                (ENV_BASE_DIR, "/srv/out"),
                (ENV_REQUIRED_ENV, "GOOGLE_API_KEY, OTHER_KEY,"),
                (ENV_SERVICE_TIMEOUT_MS, "2500"),
            ]))
            .unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/srv/out"));
        assert_eq!(config.required_env, vec!["GOOGLE_API_KEY", "OTHER_KEY"]);
        assert_eq!(config.service_timeout_ms, 2500);
    }

    #[test]
    fn test_env_override_bad_timeout() {
        let result = Config::default().with_env_overrides(env(&[(ENV_SERVICE_TIMEOUT_MS, "x")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_check_required_env() {
        let config = Config {
            required_env: vec!["GOOGLE_API_KEY".to_string()],
            ..Default::default()
        };

        assert!(config.check_required_env(env(&[("GOOGLE_API_KEY", "k")])).is_ok());
        match config.check_required_env(env(&[])) {
            Err(Error::MissingEnv(var)) => assert_eq!(var, "GOOGLE_API_KEY"),
            other => panic!("Expected MissingEnv, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
