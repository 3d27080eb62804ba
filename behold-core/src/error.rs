use std::path::PathBuf;
use thiserror::Error;

/// Problems with the config file or the run's output location
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Output path {path} is not writable: {source}")]
    OutputPath {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Problems loading the site catalog or the NSFW table
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to parse contents of {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed catalog {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}
