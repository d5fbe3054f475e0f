use fastnoise_lite::{CellularReturnType, FastNoiseLite, FractalType, NoiseType};

use crate::config::{noise as seed_offsets, NoiseFieldConfig, NoiseKind, StreamerConfig};
use crate::hex::HexCoordinate;

/// One seeded coherent-noise field
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32, config: &NoiseFieldConfig) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        match config.kind {
            NoiseKind::Gradient => noise.set_noise_type(Some(NoiseType::OpenSimplex2)),
            NoiseKind::Cellular => {
                noise.set_noise_type(Some(NoiseType::Cellular));
                noise.set_cellular_return_type(Some(CellularReturnType::CellValue));
            }
        }
        if config.octaves > 1 {
            noise.set_fractal_type(Some(FractalType::FBm));
            noise.set_fractal_octaves(Some(config.octaves));
            noise.set_fractal_lacunarity(Some(config.lacunarity));
            noise.set_fractal_gain(Some(config.gain));
        } else {
            noise.set_fractal_type(Some(FractalType::None));
        }
        noise.set_frequency(Some(config.frequency));

        Self { noise }
    }

    /// Raw sample, roughly -1.0 to 1.0
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.noise.get_noise_2d(x, y)
    }

    /// Sample remapped to 0.0..=1.0
    #[inline]
    pub fn sample_unit(&self, x: f32, y: f32) -> f32 {
        ((self.sample(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Noise generator for procedural dungeon generation
pub struct NoiseGenerator {
    fill: NoiseField,
    rooms: NoiseField,
    biomes: NoiseField,
    blend: NoiseField,
}

impl NoiseGenerator {
    /// Create the generator's fields, each seeded `seed + offset`
    pub fn new(config: &StreamerConfig) -> Self {
        let seed = config.seed;
        Self {
            fill: NoiseField::new(
                seed.wrapping_add(seed_offsets::FILL_SEED_OFFSET),
                &config.fill_noise,
            ),
            rooms: NoiseField::new(
                seed.wrapping_add(seed_offsets::ROOM_SEED_OFFSET),
                &config.rooms.noise,
            ),
            biomes: NoiseField::new(
                seed.wrapping_add(seed_offsets::BIOME_SEED_OFFSET),
                &config.biomes.noise,
            ),
            blend: NoiseField::new(
                seed.wrapping_add(seed_offsets::BLEND_SEED_OFFSET),
                &config.biomes.blend_noise,
            ),
        }
    }

    /// Floor-fill value at a tile (0.0 to 1.0), sampled at the hex centre
    pub fn get_fill(&self, coord: HexCoordinate) -> f32 {
        let (x, y) = coord.unit_center();
        self.fill.sample_unit(x, y)
    }

    /// Room-noise value at a room grid cell (0.0 to 1.0)
    pub fn get_room(&self, cell_x: i32, cell_y: i32) -> f32 {
        self.rooms.sample_unit(cell_x as f32, cell_y as f32)
    }

    /// Low-frequency cellular value at a biome region (0.0 to 1.0)
    pub fn get_biome(&self, region_x: i32, region_y: i32) -> f32 {
        self.biomes.sample_unit(region_x as f32, region_y as f32)
    }

    /// Higher-frequency edge-blend weight at a tile (0.0 to 1.0)
    pub fn get_blend(&self, coord: HexCoordinate) -> f32 {
        let (x, y) = coord.unit_center();
        self.blend.sample_unit(x, y)
    }
}
