//! Hex-grid A* pathfinding and a noise-driven, chunk-streamed dungeon for
//! roguelike cores.

macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(feature = "debug_logs") {
            ::tracing::debug!($($arg)*);
        }
    };
}

pub mod config; // Centralized configuration constants
pub mod error;
pub mod hex;
pub mod logging;
pub mod pathfinding;
pub mod world_gen;

pub use config::{BlendMode, StreamMode, StreamerConfig};
pub use error::{ConfigError, ConfigResult, OccupancyError};
pub use hex::{HexCoordinate, HexDirection, HexLayout, WorldPosition};
pub use pathfinding::{find_path, HexPathfinder, TieBreak, Walkability};
pub use world_gen::{AdvanceOutcome, ChunkedWorldStreamer, OccupantId, TileOrigin, WorldTile};
