use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::{CHANNEL_TABLE_PREFIX, CONFIG_FILE_PREFIX};
use super::error::ConfigError;

/// Structure representing the application configuration. Contains pathing and batch information
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub inventory_path: PathBuf,
    pub output_path: PathBuf,
    pub history_path: Option<PathBuf>,
    pub make_chans: bool,
    pub channel_table_path: Option<PathBuf>,
    pub n_threads: i32,
}

impl Default for Config {
    /// Generate a new Config object. All paths will be empty/invalid
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from("None"),
            output_path: PathBuf::from("None"),
            history_path: None,
            make_chans: false,
            channel_table_path: None,
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Get the path to the supplemental configuration of a unit
    pub fn get_config_file_name(&self, unit_tag: &str) -> Result<PathBuf, ConfigError> {
        if self.output_path.exists() {
            Ok(self
                .output_path
                .join(format!("{CONFIG_FILE_PREFIX}.{unit_tag}")))
        } else {
            Err(ConfigError::BadFilePath(self.output_path.clone()))
        }
    }

    /// Get the path to the channel table of a unit.
    ///
    /// Tables go next to the configurations unless a separate directory is given.
    pub fn get_channel_table_file_name(&self, unit_tag: &str) -> Result<PathBuf, ConfigError> {
        let table_dir = self
            .channel_table_path
            .as_deref()
            .unwrap_or(self.output_path.as_path());
        if table_dir.exists() {
            Ok(table_dir.join(format!("{CHANNEL_TABLE_PREFIX}.{unit_tag}.csv")))
        } else {
            Err(ConfigError::BadFilePath(table_dir.to_path_buf()))
        }
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }
}
