//! Error types and handling infrastructure for page-turner.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. The binary wraps these in `anyhow` at its boundary.
//!
//! None of these errors are fatal to the host: the dispatcher logs them and lands
//! in a valid state so the next button press is still handled.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for page-turner operations.
#[derive(Error, Debug)]
pub enum PageTurnerError {
    /// Screen geometry could not be resolved from the provider
    #[error("Geometry unavailable: {message}")]
    Geometry { message: String },

    /// The gesture executor refused or failed to issue a gesture
    #[error("Gesture executor failed: {message}")]
    Executor { message: String },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reading the configuration file failed
    #[error("Failed to read configuration file {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::Config`]
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// The dispatcher actor has shut down and no longer accepts messages
    #[error("Gesture dispatcher is no longer running")]
    DispatcherUnavailable,

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for page-turner operations.
pub type Result<T> = std::result::Result<T, PageTurnerError>;

impl PageTurnerError {
    /// Create a Geometry error with a descriptive message
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// Create an Executor error with a descriptive message
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
        }
    }

    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a ConfigIo error for the file at `path`
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

#[cfg(feature = "config")]
impl From<toml::de::Error> for PageTurnerError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let geometry = PageTurnerError::geometry("window metrics missing");
        assert_eq!(
            geometry.to_string(),
            "Geometry unavailable: window metrics missing"
        );

        let executor = PageTurnerError::executor("service disconnected");
        assert_eq!(
            executor.to_string(),
            "Gesture executor failed: service disconnected"
        );

        assert_eq!(
            PageTurnerError::DispatcherUnavailable.to_string(),
            "Gesture dispatcher is no longer running"
        );
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            PageTurnerError::config("bad ratio"),
            PageTurnerError::Config { .. }
        ));
        assert!(matches!(
            PageTurnerError::other("unknown"),
            PageTurnerError::Other { .. }
        ));
    }

    #[test]
    fn test_config_io_keeps_path_and_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = PageTurnerError::config_io("/etc/page-turner.toml", io_err);

        match &err {
            PageTurnerError::ConfigIo { path, .. } => {
                assert_eq!(path, &PathBuf::from("/etc/page-turner.toml"));
            }
            other => panic!("Expected ConfigIo variant, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }
}
