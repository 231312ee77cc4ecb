// src/config/options.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::{Error, Result};

/// Construction-time options for a [`Scraper`](crate::scraper::Scraper).
/// Handed to every `init` hook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Default dialect, inherited by items that do not declare their own.
    pub dialect: Option<String>,
    /// Directory holding `datatypes.csv` and the `values/` tree.
    pub catalogue_root: PathBuf,
    /// Free-form adapter arguments (base urls, credentials file paths, ...).
    pub args: BTreeMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            catalogue_root: default_catalogue_root(),
            args: BTreeMap::new(),
        }
    }
}

impl ScraperConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    pub fn with_catalogue_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.catalogue_root = root.into();
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).map(String::as_str)
    }
}

/// `$STATSCRAPER_DATATYPES` if set and non-empty, else the bundled catalogue.
pub fn default_catalogue_root() -> PathBuf {
    match std::env::var(CATALOGUE_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_CATALOGUE_DIR),
    }
}
