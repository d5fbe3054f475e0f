//! Centralized configuration for the pathfinder and the world streamer.
//!
//! The `pub mod` blocks hold the default constants; the structs below are
//! what hosts actually construct (or load from JSON) and hand to
//! `ChunkedWorldStreamer::new`.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::hex::HexLayout;

/// Pathfinding configuration constants
pub mod pathfinding {
    /// Maximum number of node expansions before giving up
    pub const MAX_ITERATIONS: usize = 500;
}

/// World streaming configuration constants
pub mod world {
    /// Chunk edge length in tiles
    pub const CHUNK_SIZE: i32 = 16;

    /// Chunks loaded around the focal chunk (Chebyshev radius)
    pub const CHUNK_RADIUS: i32 = 1;

    /// Chunks farther than this from the focal chunk are unloaded
    pub const CHUNK_DELETION_RADIUS: i32 = 3;

    /// Streaming disc radius (unit hex spacing)
    pub const GENERATION_RADIUS: f32 = 12.0;

    /// Tiles farther than this from the focal tile are deleted
    pub const DELETION_DISTANCE: f32 = 18.0;

    /// Fraction of the fill-noise range that becomes floor
    pub const DENSITY: f32 = 0.45;

    /// Attempt budget for random walkable tile lookups
    pub const RANDOM_TILE_ATTEMPTS: usize = 64;

    /// Convert tile coordinates to (chunk, local) coordinates.
    /// Uses euclidean division so negative tiles land in negative chunks.
    #[inline]
    pub fn tile_to_chunk(x: i32, y: i32, chunk_size: i32) -> ((i32, i32), (i32, i32)) {
        (
            (x.div_euclid(chunk_size), y.div_euclid(chunk_size)),
            (x.rem_euclid(chunk_size), y.rem_euclid(chunk_size)),
        )
    }
}

/// Noise seed offsets; each field gets `seed + offset`
pub mod noise {
    pub const FILL_SEED_OFFSET: i32 = 0;
    pub const ROOM_SEED_OFFSET: i32 = 1;
    pub const BIOME_SEED_OFFSET: i32 = 2;
    pub const BLEND_SEED_OFFSET: i32 = 3;
}

/// Which coherent-noise algorithm backs a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// OpenSimplex2 gradient noise
    Gradient,
    /// Cellular (Voronoi) noise returning the per-cell value
    Cellular,
}

/// One noise field's shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseFieldConfig {
    pub kind: NoiseKind,
    pub frequency: f32,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for NoiseFieldConfig {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Gradient,
            frequency: 0.08,
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl NoiseFieldConfig {
    pub fn cellular(frequency: f32) -> Self {
        Self {
            kind: NoiseKind::Cellular,
            frequency,
            octaves: 1,
            ..Self::default()
        }
    }

    fn validate(&self, field: &'static str) -> ConfigResult<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ConfigError::out_of_range(field, "a positive frequency", self.frequency));
        }
        if self.octaves < 1 {
            return Err(ConfigError::out_of_range(field, "at least one octave", self.octaves));
        }
        if !self.lacunarity.is_finite() || !self.gain.is_finite() {
            return Err(ConfigError::out_of_range(field, "finite lacunarity and gain", f32::NAN));
        }
        Ok(())
    }
}

/// Circular rooms on a coarse grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub enabled: bool,
    /// Grid cell edge length in tiles; at most one room per cell
    pub spacing: i32,
    /// A cell hosts a room when its room-noise sample (0..1) is below this
    pub valley_threshold: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub noise: NoiseFieldConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spacing: 12,
            valley_threshold: 0.55,
            min_radius: 2.0,
            max_radius: 4.5,
            noise: NoiseFieldConfig::cellular(0.35),
        }
    }
}

/// Jittered corridors linking neighbouring rooms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub enabled: bool,
    /// Chance per step of a lateral sidestep
    pub jitter: f32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jitter: 0.3,
        }
    }
}

/// Short false-path stubs branching off fill tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadEndConfig {
    /// Branch probability per fill tile; 0 disables dead ends
    pub probability: f32,
    pub min_length: i32,
    pub max_length: i32,
}

impl Default for DeadEndConfig {
    fn default() -> Self {
        Self {
            probability: 0.02,
            min_length: 2,
            max_length: 5,
        }
    }
}

/// How region-edge biome substitution draws its randomness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Seeded hash of the coordinate; the same tile always blends the same way
    #[default]
    Deterministic,
    /// Thread RNG; varies between queries and runs
    Cosmetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Number of biome ids (0..count)
    pub count: u32,
    /// Region edge length in chunks
    pub size: i32,
    /// Tiles from a region edge where blending applies; 0 disables blending
    pub blend_distance: i32,
    pub blend_mode: BlendMode,
    pub noise: NoiseFieldConfig,
    pub blend_noise: NoiseFieldConfig,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            count: 4,
            size: 4,
            blend_distance: 3,
            blend_mode: BlendMode::Deterministic,
            noise: NoiseFieldConfig::cellular(0.9),
            blend_noise: NoiseFieldConfig {
                frequency: 0.3,
                octaves: 1,
                ..NoiseFieldConfig::default()
            },
        }
    }
}

/// Generation/deletion window shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StreamMode {
    /// Square chunks loaded around the focal chunk
    Chunked {
        chunk_radius: i32,
        /// Unload chunks beyond `chunk_deletion_radius`; when false chunks
        /// accumulate for the whole run
        evict_chunks: bool,
        chunk_deletion_radius: i32,
    },
    /// Circular tile disc around the focal tile
    Streaming {
        generation_radius: f32,
        deletion_distance: f32,
    },
}

impl Default for StreamMode {
    fn default() -> Self {
        StreamMode::Streaming {
            generation_radius: world::GENERATION_RADIUS,
            deletion_distance: world::DELETION_DISTANCE,
        }
    }
}

/// Everything `ChunkedWorldStreamer` needs, supplied at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    pub seed: i32,
    pub mode: StreamMode,
    pub chunk_size: i32,
    pub layout: HexLayout,
    pub density: f32,
    pub fill_noise: NoiseFieldConfig,
    pub rooms: RoomConfig,
    pub corridors: CorridorConfig,
    pub dead_ends: DeadEndConfig,
    pub biomes: BiomeConfig,
    pub random_tile_attempts: usize,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            mode: StreamMode::default(),
            chunk_size: world::CHUNK_SIZE,
            layout: HexLayout::default(),
            density: world::DENSITY,
            fill_noise: NoiseFieldConfig::default(),
            rooms: RoomConfig::default(),
            corridors: CorridorConfig::default(),
            dead_ends: DeadEndConfig::default(),
            biomes: BiomeConfig::default(),
            random_tile_attempts: world::RANDOM_TILE_ATTEMPTS,
        }
    }
}

impl StreamerConfig {
    /// Default configuration in chunked mode
    pub fn chunked() -> Self {
        Self {
            mode: StreamMode::Chunked {
                chunk_radius: world::CHUNK_RADIUS,
                evict_chunks: true,
                chunk_deletion_radius: world::CHUNK_DELETION_RADIUS,
            },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: StreamerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size < 1 {
            return Err(ConfigError::out_of_range("chunk_size", "at least 1", self.chunk_size));
        }
        if !self.layout.size.is_finite() || self.layout.size <= 0.0 {
            return Err(ConfigError::out_of_range("layout.size", "positive", self.layout.size));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::out_of_range("density", "within 0..=1", self.density));
        }

        match self.mode {
            StreamMode::Chunked {
                chunk_radius,
                evict_chunks,
                chunk_deletion_radius,
            } => {
                if chunk_radius < 0 {
                    return Err(ConfigError::out_of_range(
                        "chunk_radius",
                        "non-negative",
                        chunk_radius,
                    ));
                }
                if evict_chunks && chunk_deletion_radius < chunk_radius {
                    return Err(ConfigError::DeletionInsideGeneration {
                        generation: chunk_radius.into(),
                        deletion: chunk_deletion_radius.into(),
                    });
                }
            }
            StreamMode::Streaming {
                generation_radius,
                deletion_distance,
            } => {
                if !generation_radius.is_finite() || generation_radius < 0.0 {
                    return Err(ConfigError::out_of_range(
                        "generation_radius",
                        "finite and non-negative",
                        generation_radius,
                    ));
                }
                if !deletion_distance.is_finite() || deletion_distance < generation_radius {
                    return Err(ConfigError::DeletionInsideGeneration {
                        generation: generation_radius.into(),
                        deletion: deletion_distance.into(),
                    });
                }
            }
        }

        self.fill_noise.validate("fill_noise")?;

        let rooms = &self.rooms;
        if rooms.enabled {
            rooms.noise.validate("rooms.noise")?;
            if rooms.spacing < 1 {
                return Err(ConfigError::out_of_range("rooms.spacing", "at least 1", rooms.spacing));
            }
            if rooms.min_radius < 0.0 || rooms.min_radius > rooms.max_radius {
                return Err(ConfigError::out_of_range(
                    "rooms.min_radius",
                    "between 0 and rooms.max_radius",
                    rooms.min_radius,
                ));
            }
            // A room may not outgrow its grid cell
            if rooms.max_radius > rooms.spacing as f32 {
                return Err(ConfigError::out_of_range(
                    "rooms.max_radius",
                    "no larger than rooms.spacing",
                    rooms.max_radius,
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.corridors.jitter) {
            return Err(ConfigError::out_of_range(
                "corridors.jitter",
                "within 0..=1",
                self.corridors.jitter,
            ));
        }

        let dead_ends = &self.dead_ends;
        if !(0.0..=1.0).contains(&dead_ends.probability) {
            return Err(ConfigError::out_of_range(
                "dead_ends.probability",
                "within 0..=1",
                dead_ends.probability,
            ));
        }
        if dead_ends.min_length < 0 || dead_ends.min_length > dead_ends.max_length {
            return Err(ConfigError::out_of_range(
                "dead_ends.min_length",
                "between 0 and dead_ends.max_length",
                dead_ends.min_length,
            ));
        }

        let biomes = &self.biomes;
        if biomes.count < 1 {
            return Err(ConfigError::out_of_range("biomes.count", "at least 1", biomes.count));
        }
        if biomes.size < 1 {
            return Err(ConfigError::out_of_range("biomes.size", "at least 1", biomes.size));
        }
        if biomes.blend_distance < 0 {
            return Err(ConfigError::out_of_range(
                "biomes.blend_distance",
                "non-negative",
                biomes.blend_distance,
            ));
        }
        biomes.noise.validate("biomes.noise")?;
        biomes.blend_noise.validate("biomes.blend_noise")?;

        Ok(())
    }
}
