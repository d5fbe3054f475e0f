use thiserror::Error;
use ulid::Ulid;

use crate::hex::HexCoordinate;

/// Result alias for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid streamer configuration. This is the only hard failure in the
/// crate; everything at runtime degrades to an empty result instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("deletion radius {deletion} is smaller than generation radius {generation}")]
    DeletionInsideGeneration { generation: f64, deletion: f64 },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        expected: &'static str,
        value: impl Into<f64>,
    ) -> Self {
        ConfigError::OutOfRange {
            field,
            expected,
            value: value.into(),
        }
    }
}

/// Rejected occupancy registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("tile {0:?} is not generated")]
    NotGenerated(HexCoordinate),

    #[error("tile {coord:?} is already occupied by {occupant}")]
    Occupied { coord: HexCoordinate, occupant: Ulid },
}
