use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::hex::HexCoordinate;

/// Biome / tile variant id (0..BiomeConfig::count)
pub type BiomeId = u32;

bitflags! {
    /// Generation rules that placed a tile
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileOrigin: u8 {
        const FILL     = 0b0000_0001; // Fill noise under the density threshold
        const ROOM     = 0b0000_0010; // Inside a room radius
        const CORRIDOR = 0b0000_0100; // On a corridor between rooms
        const DEAD_END = 0b0000_1000; // Stub branching off a fill tile
    }
}

/// One generated, walkable cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTile {
    pub position: HexCoordinate,
    pub variant: BiomeId,
    pub origin: TileOrigin,
}

impl WorldTile {
    pub fn new(position: HexCoordinate, variant: BiomeId, origin: TileOrigin) -> Self {
        Self {
            position,
            variant,
            origin,
        }
    }

    /// Placed by rooms or corridors rather than the raw fill noise
    pub fn is_structure(&self) -> bool {
        self.origin.intersects(TileOrigin::ROOM | TileOrigin::CORRIDOR)
    }
}
