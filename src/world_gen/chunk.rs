use serde::{Deserialize, Serialize};

use crate::config::world as world_config;
use crate::hex::HexCoordinate;

/// Square block of `chunk_size` x `chunk_size` tiles in (x, y) tile space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a tile
    #[inline]
    pub fn from_tile(tile: HexCoordinate, chunk_size: i32) -> Self {
        let ((x, y), _) = world_config::tile_to_chunk(tile.x, tile.y, chunk_size);
        Self { x, y }
    }

    /// Chebyshev distance in chunks
    #[inline]
    pub fn distance(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Every chunk within `radius` (Chebyshev), row-major from the top-left
    pub fn neighborhood(self, radius: i32) -> Vec<ChunkCoord> {
        let radius = radius.max(0);
        let mut chunks = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                chunks.push(ChunkCoord::new(self.x + dx, self.y + dy));
            }
        }
        chunks
    }

    /// Top-left tile of this chunk
    #[inline]
    pub fn origin_tile(self, chunk_size: i32) -> HexCoordinate {
        HexCoordinate::new(self.x * chunk_size, self.y * chunk_size)
    }

    /// Every tile of this chunk in row-major order
    pub fn tiles(self, chunk_size: i32) -> impl Iterator<Item = HexCoordinate> {
        let origin = self.origin_tile(chunk_size);
        (0..chunk_size).flat_map(move |ly| {
            (0..chunk_size).map(move |lx| HexCoordinate::new(origin.x + lx, origin.y + ly))
        })
    }

    #[inline]
    pub fn contains(self, tile: HexCoordinate, chunk_size: i32) -> bool {
        ChunkCoord::from_tile(tile, chunk_size) == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tile_negative() {
        assert_eq!(ChunkCoord::from_tile(HexCoordinate::new(-1, -1), 8), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_tile(HexCoordinate::new(7, 8), 8), ChunkCoord::new(0, 1));
    }

    #[test]
    fn test_tiles_cover_chunk() {
        let chunk = ChunkCoord::new(-2, 3);
        let tiles: Vec<_> = chunk.tiles(4).collect();
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles[0], HexCoordinate::new(-8, 12));
        assert_eq!(tiles[15], HexCoordinate::new(-5, 15));
        assert!(tiles.iter().all(|t| chunk.contains(*t, 4)));
    }

    #[test]
    fn test_neighborhood() {
        let center = ChunkCoord::new(1, 1);
        let around = center.neighborhood(1);
        assert_eq!(around.len(), 9);
        assert!(around.iter().all(|c| center.distance(*c) <= 1));
        assert_eq!(center.neighborhood(0), vec![center]);
    }
}
