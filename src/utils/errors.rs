use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kc-deploy
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("failed to write config file {}: {message}", .path.display())]
    ConfigWrite { path: PathBuf, message: String },

    #[error("Kong instance with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Kong instance '{0}' not found")]
    NotFound(String),

    #[error("unknown component: {0}")]
    UnknownComponent(String),

    #[error(transparent)]
    Validation(#[from] ValidationIssue),

    #[error("`{command}` failed: {reason}")]
    ExternalProcess { command: String, reason: String },
}

/// Field-level validation failures for project files
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("required directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid {format} in {}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("{} missing '{field}' field", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, DeployError>;
