use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::InventoryError;
use super::profile::{ChannelProfile, StationProfile};

/// One station and the DAS Parms records of its units, in unit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station: StationProfile,
    #[serde(default)]
    pub das_parms: Vec<ChannelProfile>,
}

/// The station records exported from the equipment database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub stations: Vec<StationRecord>,
}

impl Inventory {
    /// Read an inventory from a YAML file
    pub fn read_inventory_file(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Err(InventoryError::BadFilePath(path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
