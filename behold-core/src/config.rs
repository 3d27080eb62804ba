// Run configuration: config file, bundled defaults and output path checks

use crate::error::ConfigError;
use behold_scanner::TextDecoder;
use behold_scanner::encoding::DEFAULT_ENCODINGS;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/behold/";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const SITES_FILE_NAME: &str = "sites.json";
pub const NSFW_FILE_NAME: &str = "sites_nsfw.json";

pub const DEFAULT_CONFIG: &str = include_str!("../assets/config.json");
pub const DEFAULT_SITES: &str = include_str!("../assets/sites.json");
pub const DEFAULT_NSFW_SITES: &str = include_str!("../assets/sites_nsfw.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeholdConfig {
    pub sites_json_filepath: PathBuf,
    pub sites_nsfw_json_filepath: PathBuf,
    #[serde(default = "default_encodings")]
    pub common_encodings: Vec<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_encodings() -> Vec<String> {
    DEFAULT_ENCODINGS.iter().map(|e| e.to_string()).collect()
}

impl BeholdConfig {
    /// Read a config file. Relative catalog paths resolve against the
    /// directory holding the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: BeholdConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        for p in [&mut self.sites_json_filepath, &mut self.sites_nsfw_json_filepath] {
            let expanded = expand_path(&p.to_string_lossy());
            *p = if expanded.is_relative() {
                base_dir.join(expanded)
            } else {
                expanded
            };
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decoder().map(|_| ())
    }

    /// Decoder built from `common_encodings`, in order.
    pub fn decoder(&self) -> Result<TextDecoder, ConfigError> {
        TextDecoder::from_labels(&self.common_encodings)
            .map_err(|e| ConfigError::Invalid(format!("common_encodings: {}", e)))
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn default_config_path() -> PathBuf {
    expand_path(DEFAULT_CONFIG_DIR).join(CONFIG_FILE_NAME)
}

/// Make sure `path` can be created and written before any probing happens.
///
/// A file created by the check is removed again; an existing file is left
/// untouched.
pub fn validate_output_path(path: &Path) -> Result<(), ConfigError> {
    let output_error = |source| ConfigError::OutputPath {
        path: path.to_path_buf(),
        source,
    };

    if path.is_dir() {
        return Err(output_error(std::io::Error::new(
            std::io::ErrorKind::IsADirectory,
            "path is a directory",
        )));
    }

    let existed = path.exists();
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(output_error)?;

    if !existed {
        fs::remove_file(path).map_err(output_error)?;
    }

    Ok(())
}

/// The files written by [`install_defaults`]
pub fn default_asset_paths(config_dir: &Path) -> [PathBuf; 3] {
    [
        config_dir.join(CONFIG_FILE_NAME),
        config_dir.join(SITES_FILE_NAME),
        config_dir.join(NSFW_FILE_NAME),
    ]
}

/// Write the bundled config, site catalog and NSFW table into `config_dir`,
/// overwriting whatever is there.
pub fn install_defaults(config_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    fs::create_dir_all(config_dir).map_err(|source| ConfigError::Io {
        path: config_dir.to_path_buf(),
        source,
    })?;

    let contents = [DEFAULT_CONFIG, DEFAULT_SITES, DEFAULT_NSFW_SITES];
    let mut written = Vec::with_capacity(contents.len());

    for (path, content) in default_asset_paths(config_dir).into_iter().zip(contents) {
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    Ok(written)
}
