//! Streams an unbounded tile map around a moving focal point.
//!
//! Tiles are generated by `TerrainGenerator` on demand; this module only
//! decides which cells to ask about and which to forget.

use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

use super::chunk::ChunkCoord;
use super::generator::TerrainGenerator;
use super::occupancy::{OccupancyRegistry, OccupantId};
use super::tile::{BiomeId, TileOrigin, WorldTile};
use crate::config::{StreamMode, StreamerConfig};
use crate::error::{ConfigResult, OccupancyError};
use crate::hex::{HexCoordinate, WorldPosition};
use crate::pathfinding::Walkability;

/// Tiles added and removed by one `advance`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub generated: BTreeSet<HexCoordinate>,
    pub deleted: BTreeSet<HexCoordinate>,
    /// Occupants released because their tile was deleted
    pub evicted_occupants: Vec<(HexCoordinate, OccupantId)>,
    /// False when the call changed nothing
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamerStats {
    pub tiles: usize,
    pub fill_tiles: usize,
    pub room_tiles: usize,
    pub corridor_tiles: usize,
    pub dead_end_tiles: usize,
    pub loaded_chunks: usize,
    pub cached_regions: usize,
    pub occupants: usize,
}

pub struct ChunkedWorldStreamer {
    config: StreamerConfig,
    generator: TerrainGenerator,
    tiles: HashMap<HexCoordinate, WorldTile>,
    /// Chunked mode only
    loaded_chunks: HashSet<ChunkCoord>,
    focal: Option<HexCoordinate>,
    occupancy: OccupancyRegistry,
}

impl ChunkedWorldStreamer {
    pub fn new(config: StreamerConfig) -> ConfigResult<Self> {
        config.validate()?;
        info!(seed = config.seed, mode = ?config.mode, "world streamer created");

        Ok(Self {
            generator: TerrainGenerator::new(&config),
            config,
            tiles: HashMap::new(),
            loaded_chunks: HashSet::new(),
            focal: None,
            occupancy: OccupancyRegistry::new(),
        })
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Move the focal point to a world position
    pub fn advance(&mut self, position: WorldPosition) -> AdvanceOutcome {
        let focal = self.config.layout.from_world(position);
        self.advance_to(focal)
    }

    /// Move the focal point to a tile, generating and evicting around it.
    ///
    /// A focal tile outside the representable range is ignored.
    pub fn advance_to(&mut self, focal: HexCoordinate) -> AdvanceOutcome {
        if !focal.is_representable() {
            debug!(focal = ?focal, "focal tile out of range, ignored");
            return AdvanceOutcome::default();
        }
        if self.focal == Some(focal) {
            return AdvanceOutcome::default();
        }
        self.focal = Some(focal);

        let mut outcome = AdvanceOutcome::default();
        match self.config.mode {
            StreamMode::Chunked {
                chunk_radius,
                evict_chunks,
                chunk_deletion_radius,
            } => {
                let center = ChunkCoord::from_tile(focal, self.config.chunk_size);
                if evict_chunks {
                    self.unload_chunks(center, chunk_deletion_radius, &mut outcome.deleted);
                }
                self.load_chunks(center, chunk_radius, &mut outcome.generated);
            }
            StreamMode::Streaming {
                generation_radius,
                deletion_distance,
            } => {
                self.delete_beyond(focal, deletion_distance, &mut outcome.deleted);
                self.generate_disc(focal, generation_radius, &mut outcome.generated);
            }
        }

        outcome.evicted_occupants = self.occupancy.release(&outcome.deleted);
        outcome.changed = !outcome.generated.is_empty() || !outcome.deleted.is_empty();

        let spacing = self.config.rooms.spacing.max(1);
        let cell = self.generator.rooms().cell_of(focal);
        self.generator.rooms().retain_near(cell, self.window_reach() / spacing + 3);

        if outcome.changed {
            debug!(
                focal = ?focal,
                generated = outcome.generated.len(),
                deleted = outcome.deleted.len(),
                evicted = outcome.evicted_occupants.len(),
                total = self.tiles.len(),
                "world advanced"
            );
        }
        outcome
    }

    fn load_chunks(
        &mut self,
        center: ChunkCoord,
        radius: i32,
        generated: &mut BTreeSet<HexCoordinate>,
    ) {
        let chunk_size = self.config.chunk_size;
        for chunk in center.neighborhood(radius) {
            if !self.loaded_chunks.insert(chunk) {
                continue;
            }
            debug_log!("ChunkedWorldStreamer: loading chunk {:?}", chunk);
            for coord in chunk.tiles(chunk_size) {
                self.generate_tile(coord, generated);
            }
        }
    }

    fn unload_chunks(
        &mut self,
        center: ChunkCoord,
        radius: i32,
        deleted: &mut BTreeSet<HexCoordinate>,
    ) {
        let chunk_size = self.config.chunk_size;
        let mut far: Vec<ChunkCoord> = self
            .loaded_chunks
            .iter()
            .filter(|chunk| chunk.distance(center) > radius)
            .copied()
            .collect();
        far.sort();

        for chunk in far {
            self.loaded_chunks.remove(&chunk);
            debug_log!("ChunkedWorldStreamer: unloading chunk {:?}", chunk);
            for coord in chunk.tiles(chunk_size) {
                if self.tiles.remove(&coord).is_some() {
                    deleted.insert(coord);
                }
            }
        }
    }

    fn generate_disc(
        &mut self,
        focal: HexCoordinate,
        radius: f32,
        generated: &mut BTreeSet<HexCoordinate>,
    ) {
        for coord in focal.disc(radius) {
            self.generate_tile(coord, generated);
        }
    }

    fn delete_beyond(
        &mut self,
        focal: HexCoordinate,
        distance: f32,
        deleted: &mut BTreeSet<HexCoordinate>,
    ) {
        self.tiles.retain(|coord, _| {
            let keep = focal.euclidean_distance(*coord) <= distance;
            if !keep {
                deleted.insert(*coord);
            }
            keep
        });
    }

    /// Evaluate one candidate; existence is decided by the generator alone
    fn generate_tile(&mut self, coord: HexCoordinate, generated: &mut BTreeSet<HexCoordinate>) {
        if self.tiles.contains_key(&coord) {
            return;
        }
        if let Some(tile) = self.generator.tile(coord) {
            self.tiles.insert(coord, tile);
            generated.insert(coord);
        }
    }

    /// Axial half-extent of the generation window in tiles
    fn window_reach(&self) -> i32 {
        match self.config.mode {
            StreamMode::Chunked { chunk_radius, .. } => (chunk_radius + 1) * self.config.chunk_size,
            StreamMode::Streaming {
                generation_radius, ..
            } => (generation_radius / (3.0_f32.sqrt() / 2.0)).ceil() as i32,
        }
    }

    /// Inclusive tile bounds of the generation window around the focal tile
    fn window_bounds(&self, focal: HexCoordinate) -> (HexCoordinate, HexCoordinate) {
        match self.config.mode {
            StreamMode::Chunked { chunk_radius, .. } => {
                let size = self.config.chunk_size;
                let center = ChunkCoord::from_tile(focal, size);
                let min = ChunkCoord::new(center.x - chunk_radius, center.y - chunk_radius)
                    .origin_tile(size);
                let max = ChunkCoord::new(center.x + chunk_radius + 1, center.y + chunk_radius + 1)
                    .origin_tile(size);
                (min, HexCoordinate::new(max.x - 1, max.y - 1))
            }
            StreamMode::Streaming { .. } => {
                let reach = self.window_reach();
                (
                    HexCoordinate::new(focal.x - reach, focal.y - reach),
                    HexCoordinate::new(focal.x + reach, focal.y + reach),
                )
            }
        }
    }

    pub fn is_generated(&self, coord: HexCoordinate) -> bool {
        self.tiles.contains_key(&coord)
    }

    #[inline]
    pub fn is_walkable(&self, coord: HexCoordinate) -> bool {
        self.is_generated(coord)
    }

    pub fn tile(&self, coord: HexCoordinate) -> Option<&WorldTile> {
        self.tiles.get(&coord)
    }

    /// Generated tiles in arbitrary order
    pub fn tiles(&self) -> impl Iterator<Item = &WorldTile> {
        self.tiles.values()
    }

    pub fn generated_tiles(&self) -> BTreeSet<HexCoordinate> {
        self.tiles.keys().copied().collect()
    }

    pub fn focal_tile(&self) -> Option<HexCoordinate> {
        self.focal
    }

    pub fn is_chunk_loaded(&self, chunk: ChunkCoord) -> bool {
        self.loaded_chunks.contains(&chunk)
    }

    /// Biome id for any coordinate, generated or not
    pub fn biome_at(&self, coord: HexCoordinate) -> BiomeId {
        self.generator.biome_at(coord)
    }

    /// Forget every tile, chunk and occupant. Biome and room caches are
    /// pure and survive.
    pub fn clear(&mut self) {
        info!(tiles = self.tiles.len(), "world cleared");
        self.tiles.clear();
        self.loaded_chunks.clear();
        self.focal = None;
        self.occupancy.clear();
    }

    /// Sample up to `attempts` cells of the generation window; first
    /// generated, unoccupied one wins.
    pub fn random_walkable_tile<R: Rng>(
        &self,
        rng: &mut R,
        attempts: usize,
    ) -> Option<HexCoordinate> {
        let focal = self.focal?;
        let (min, max) = self.window_bounds(focal);

        for _ in 0..attempts {
            let candidate = HexCoordinate::new(
                rng.random_range(min.x..=max.x),
                rng.random_range(min.y..=max.y),
            );
            if self.is_generated(candidate) && !self.occupancy.is_occupied(candidate) {
                return Some(candidate);
            }
        }

        debug_log!("ChunkedWorldStreamer: no free tile after {} attempts", attempts);
        None
    }

    /// `random_walkable_tile` with the configured attempt budget
    pub fn spawn_tile<R: Rng>(&self, rng: &mut R) -> Option<HexCoordinate> {
        self.random_walkable_tile(rng, self.config.random_tile_attempts)
    }

    pub fn occupy(&self, coord: HexCoordinate, occupant: OccupantId) -> Result<(), OccupancyError> {
        if !self.is_generated(coord) {
            return Err(OccupancyError::NotGenerated(coord));
        }
        self.occupancy.register(coord, occupant)
    }

    pub fn vacate(&self, coord: HexCoordinate) -> Option<OccupantId> {
        self.occupancy.unregister(coord)
    }

    pub fn occupant_at(&self, coord: HexCoordinate) -> Option<OccupantId> {
        self.occupancy.occupant_at(coord)
    }

    pub fn occupancy(&self) -> &OccupancyRegistry {
        &self.occupancy
    }

    pub fn stats(&self) -> StreamerStats {
        let mut stats = StreamerStats {
            tiles: self.tiles.len(),
            loaded_chunks: self.loaded_chunks.len(),
            cached_regions: self.generator.biomes().cached_regions(),
            occupants: self.occupancy.len(),
            ..StreamerStats::default()
        };
        for tile in self.tiles.values() {
            let origin = tile.origin;
            stats.fill_tiles += usize::from(origin.contains(TileOrigin::FILL));
            stats.room_tiles += usize::from(origin.contains(TileOrigin::ROOM));
            stats.corridor_tiles += usize::from(origin.contains(TileOrigin::CORRIDOR));
            stats.dead_end_tiles += usize::from(origin.contains(TileOrigin::DEAD_END));
        }
        stats
    }
}

impl Walkability for ChunkedWorldStreamer {
    #[inline]
    fn is_walkable(&self, coord: HexCoordinate) -> bool {
        self.is_generated(coord)
    }
}
