use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Station {station} has {tags} unit tags but {inet} public and {nat} NAT addresses; counts must match")]
    AddressCountMismatch {
        station: String,
        tags: usize,
        inet: usize,
        nat: usize,
    },
    #[error("Station {0} has no Q330 unit at index {1}")]
    MissingUnit(String, usize),
    #[error("Station {station} has unit tag {tag:?}, which cannot be used as a file name")]
    BadUnitTag { station: String, tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("Invalid port index {0}; a station has only a primary (0) and secondary (1) unit")]
    InvalidPortIndex(usize),
    #[error("Generator failed due to station profile error: {0}")]
    ProfileError(#[from] ProfileError),
}

#[derive(Debug, Error)]
pub enum ChannelTableError {
    #[error("ChannelTable failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("ChannelTable failed to parse a data port number: {0}")]
    ParsingError(#[from] std::num::ParseIntError),
    #[error("ChannelTable was given a malformed LCQ line: {0}")]
    BadLcqLine(String),
    #[error("ChannelTable was given a file with the incorrect format; most likely the number of columns is incorrect")]
    BadFileFormat,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Configuration history failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Configuration history failed to format a timestamp: {0}")]
    TimestampError(#[from] time::error::Format),
    #[error("Configuration history was given an unusable unit tag: {0:?}")]
    BadTag(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to load inventory as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Inventory failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Inventory failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("No DAS Parms record found for unit {0}")]
    MissingDasParms(String),
    #[error("Processor failed due to station profile error: {0}")]
    ProfileError(#[from] ProfileError),
    #[error("Processor failed due to Generator error: {0}")]
    GeneratorError(#[from] GeneratorError),
    #[error("Processor failed due to ChannelTable error: {0}")]
    ChannelTableError(#[from] ChannelTableError),
    #[error("Processor failed due to History error: {0}")]
    HistoryError(#[from] HistoryError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Inventory error: {0}")]
    InventoryError(#[from] InventoryError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
