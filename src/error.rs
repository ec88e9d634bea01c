use thiserror::Error;

use crate::shared::{ItemId, MapId};

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed crop record for seed {seed_id}: {reason}")]
    MalformedCropRecord { seed_id: ItemId, reason: String },

    #[error("Asset '{name}' not found")]
    UnknownAsset { name: String },

    #[error("Asset '{name}' is not a {expected}")]
    AssetKindMismatch { name: String, expected: &'static str },

    #[error("Location {map:?} not loaded")]
    UnknownLocation { map: MapId },
}

pub type FarmResult<T> = Result<T, FarmError>;
