//! Startup-level error handling for Routesmith.
//!
//! This module defines the `Error` type raised while the process is being
//! configured, before any generation request runs, along with a convenient
//! `Result` alias. Request-level failures live in the generation and
//! application layers and never surface here.
//!
//! # Examples
//!
//! ```
//! use routesmith::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("base directory is not set"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for startup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for configuration and startup
#[derive(Debug, Error)]
pub enum Error {
    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment variable is not set
    #[error("Environment variable not set: {0}")]
    MissingEnv(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new missing environment variable error
    pub fn missing_env<S: Into<String>>(var: S) -> Self {
        Self::MissingEnv(var.into())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("Invalid configuration");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_error_missing_env_creation() {
        let error = Error::missing_env("GOOGLE_API_KEY");
        assert!(matches!(error, Error::MissingEnv(_)));
        assert_eq!(
            error.to_string(),
            "Environment variable not set: GOOGLE_API_KEY"
        );
    }

    #[test]
    fn test_error_from_str() {
        let error: Error = "Test error message".into();
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: Test error message");
    }

    #[test]
    fn test_error_from_toml_error() {
        let toml_result: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let error: Error = toml_result.unwrap_err().into();
        assert!(matches!(error, Error::Toml(_)));
        assert!(error.to_string().contains("TOML parsing error"));
    }
}
