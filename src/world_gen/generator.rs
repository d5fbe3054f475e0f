use super::biomes::BiomeMap;
use super::noise::NoiseGenerator;
use super::rooms::RoomLayout;
use super::seeded::{self, salt};
use super::tile::{BiomeId, TileOrigin, WorldTile};
use crate::config::{DeadEndConfig, StreamerConfig};
use crate::hex::{HexCoordinate, HexDirection};

/// Pure tile rules: which cells are open and what biome they belong to.
///
/// Nothing here depends on what has been generated before; the streamer
/// decides which cells to ask about.
pub struct TerrainGenerator {
    noise: NoiseGenerator,
    biomes: BiomeMap,
    rooms: RoomLayout,
    density: f32,
    dead_ends: DeadEndConfig,
    seed: i32,
}

impl TerrainGenerator {
    pub fn new(config: &StreamerConfig) -> Self {
        Self {
            noise: NoiseGenerator::new(config),
            biomes: BiomeMap::new(config.biomes, config.chunk_size, config.seed),
            rooms: RoomLayout::new(config.rooms, config.corridors, config.seed),
            density: config.density,
            dead_ends: config.dead_ends,
            seed: config.seed,
        }
    }

    /// Rules that accept a cell; empty means wall.
    ///
    /// Pure in the coordinate: a dead-end cell is found by looking back
    /// along each direction for a fill tile whose stub reaches it, so the
    /// answer never depends on which cells were generated first.
    pub fn classify(&self, coord: HexCoordinate) -> TileOrigin {
        let mut origin = TileOrigin::empty();
        if self.is_fill(coord) {
            origin |= TileOrigin::FILL;
        }
        if self.rooms.room_at(&self.noise, coord).is_some() {
            origin |= TileOrigin::ROOM;
        }
        if self.rooms.corridor_contains(&self.noise, coord) {
            origin |= TileOrigin::CORRIDOR;
        }
        if origin.is_empty() && self.on_dead_end(coord) {
            origin |= TileOrigin::DEAD_END;
        }
        origin
    }

    #[inline]
    fn is_fill(&self, coord: HexCoordinate) -> bool {
        self.noise.get_fill(coord) < self.density
    }

    fn on_dead_end(&self, coord: HexCoordinate) -> bool {
        if self.dead_ends.probability <= 0.0 {
            return false;
        }
        for direction in HexDirection::ALL {
            let back = direction.opposite();
            let mut source = coord;
            for distance in 1..=self.dead_ends.max_length {
                source = source.neighbor(back);
                let Some((stub_direction, length)) = self.stub_roll(source) else {
                    continue;
                };
                if stub_direction == direction && length >= distance && self.is_fill(source) {
                    return true;
                }
            }
        }
        false
    }

    /// Seeded stub direction and length rooted at `coord`, if it branches
    fn stub_roll(&self, coord: HexCoordinate) -> Option<(HexDirection, i32)> {
        let roll = seeded::unit(seeded::hash_coord(self.seed, salt::DEAD_END, coord));
        if roll >= self.dead_ends.probability {
            return None;
        }

        let shape = seeded::hash_coord(self.seed, salt::DEAD_END_SHAPE, coord);
        let direction = HexDirection::from_index((shape % 6) as usize);
        let span = (self.dead_ends.max_length - self.dead_ends.min_length + 1).max(1) as u64;
        let length = self.dead_ends.min_length + ((shape >> 8) % span) as i32;
        Some((direction, length))
    }

    #[inline]
    pub fn biome_at(&self, coord: HexCoordinate) -> BiomeId {
        self.biomes.biome_at(&self.noise, coord)
    }

    /// Tile for an accepted cell, `None` for walls
    pub fn tile(&self, coord: HexCoordinate) -> Option<WorldTile> {
        let origin = self.classify(coord);
        if origin.is_empty() {
            return None;
        }
        Some(WorldTile::new(coord, self.biome_at(coord), origin))
    }

    /// Dead-end stub branching off `coord`, nearest cell first.
    ///
    /// Empty unless `coord` is a fill tile and its seeded roll succeeds.
    /// Every returned cell classifies as open.
    pub fn dead_end_stub(&self, coord: HexCoordinate) -> Vec<HexCoordinate> {
        if self.dead_ends.probability <= 0.0 || !self.is_fill(coord) {
            return Vec::new();
        }
        let Some((direction, length)) = self.stub_roll(coord) else {
            return Vec::new();
        };

        let mut stub = Vec::with_capacity(length.max(0) as usize);
        let mut current = coord;
        for _ in 0..length {
            current = current.neighbor(direction);
            stub.push(current);
        }
        stub
    }

    pub fn biomes(&self) -> &BiomeMap {
        &self.biomes
    }

    pub fn rooms(&self) -> &RoomLayout {
        &self.rooms
    }
}
