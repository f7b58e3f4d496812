//! Error types for roomfx

use crate::regions::RegionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomFxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid material catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unsupported mesh topology: {0}")]
    UnsupportedTopology(String),

    #[error("Invalid mesh data: {0}")]
    InvalidMesh(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    #[error("Region {0} is not a reverb probe")]
    NotAReverbProbe(RegionId),

    #[error("Reverb computation error: {0}")]
    ReverbComputation(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, RoomFxError>;
