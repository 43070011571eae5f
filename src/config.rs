use crate::error::ConfigError;
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// All simulation settings
    pub settings: SimulationSettings,
    /// Matrix loaded first at startup and on reset
    pub base_matrix: PathBuf,
    /// Matrix loaded after the base when no override is given
    pub fallback_matrix: PathBuf,
    /// Destination of the save command
    pub save_matrix: PathBuf,
    /// Start with motion trails enabled (app-level)
    pub show_trails: bool,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            settings: SimulationSettings::default(),
            base_matrix: PathBuf::from("matrices/base.csv"),
            fallback_matrix: PathBuf::from("matrices/blank.csv"),
            save_matrix: PathBuf::from("save.csv"),
            show_trails: false,
        }
    }
}
