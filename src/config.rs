use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrmError, PrmResult};
use crate::model::{NameOrder, ProjectionSettings};

/// Runtime settings for the `prm-contacts` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Base URL avatar files are served from.
    pub avatar_storage_url: String,
    pub name_order: NameOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".data").join("prm.db"),
            log_filter: "info".into(),
            avatar_storage_url: String::new(),
            name_order: NameOrder::default(),
        }
    }
}

impl Config {
    /// Reads a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> PrmResult<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| PrmError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> PrmResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn projection(&self) -> ProjectionSettings {
        ProjectionSettings {
            name_order: self.name_order,
            avatar_storage_url: self.avatar_storage_url.clone(),
        }
    }
}
