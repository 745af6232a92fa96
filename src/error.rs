//! Startup error types
//!
//! Everything here is fatal: the process reports it and exits before serving.
//! Request-level failures are never errors, they are plain JSON responses.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("settings file not found: {0}")]
    SettingsFileNotFound(String),

    #[error("unable to read settings file {path}: {source}")]
    SettingsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in settings file: '{content}'")]
    MalformedSetting { line: usize, content: String },

    #[error("required setting {0} is missing or empty")]
    MissingSetting(&'static str),

    #[error("route {method} {path} is registered twice")]
    DuplicateRoute { method: String, path: String },

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
