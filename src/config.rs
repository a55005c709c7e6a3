use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::plots::DEFAULT_BIN_COUNT;
use crate::data::preview::{DEFAULT_CELL_CHAR_LIMIT, DEFAULT_ROW_LIMIT};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "CSV_LENS_CONFIG";

/// Viewer settings.  Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Rows shown in the data table preview.
    pub row_limit: usize,
    /// Characters kept per preview cell.
    pub cell_char_limit: usize,
    pub histogram_bins: usize,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
            cell_char_limit: DEFAULT_CELL_CHAR_LIMIT,
            histogram_bins: DEFAULT_BIN_COUNT,
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `$CSV_LENS_CONFIG` if set; fall back to defaults (logging why)
    /// when the file is missing or malformed.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_json_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}
