use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;

use super::noise::NoiseGenerator;
use super::seeded::{self, salt};
use super::tile::BiomeId;
use crate::config::{BiomeConfig, BlendMode};
use crate::hex::HexCoordinate;

/// Coarse biome region coordinate
pub type RegionCoord = (i32, i32);

/// Lazily-filled region -> biome map with edge blending.
///
/// Region ids are pure functions of the seed; the cache only saves noise
/// samples and is never pruned (regions are few compared to tiles).
pub struct BiomeMap {
    config: BiomeConfig,
    seed: i32,
    /// Region edge length in tiles (biome size * chunk size)
    region_size: i32,
    regions: RwLock<HashMap<RegionCoord, BiomeId>>,
}

impl BiomeMap {
    pub fn new(config: BiomeConfig, chunk_size: i32, seed: i32) -> Self {
        Self {
            config,
            seed,
            region_size: (config.size * chunk_size).max(1),
            regions: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn region_of(&self, coord: HexCoordinate) -> RegionCoord {
        (coord.x.div_euclid(self.region_size), coord.y.div_euclid(self.region_size))
    }

    /// Map a 0..1 noise value onto `count` equal slices
    #[inline]
    fn slice(&self, value: f32) -> BiomeId {
        let count = self.config.count.max(1);
        ((value * count as f32) as BiomeId).min(count - 1)
    }

    /// Biome of a region, computed on first reference and cached
    pub fn region_biome(&self, noise: &NoiseGenerator, region: RegionCoord) -> BiomeId {
        if let Some(&biome) = self.regions.read().get(&region) {
            return biome;
        }

        let biome = self.slice(noise.get_biome(region.0, region.1));
        self.regions.write().entry(region).or_insert(biome);
        debug_log!("BiomeMap: region {:?} -> biome {}", region, biome);
        biome
    }

    /// Biome id for a tile, with probabilistic substitution near region edges
    pub fn biome_at(&self, noise: &NoiseGenerator, coord: HexCoordinate) -> BiomeId {
        let region = self.region_of(coord);
        let base = self.region_biome(noise, region);

        let blend_distance = self.config.blend_distance;
        if blend_distance == 0 || self.config.count == 1 {
            return base;
        }

        let local_x = coord.x.rem_euclid(self.region_size);
        let local_y = coord.y.rem_euclid(self.region_size);
        let last = self.region_size - 1;

        // Nearest edge; ties resolve west, east, north, south
        let edges = [
            (local_x, (-1, 0)),
            (last - local_x, (1, 0)),
            (local_y, (0, -1)),
            (last - local_y, (0, 1)),
        ];
        let nearest = edges.iter().min_by_key(|(distance, _)| *distance);
        let Some(&(edge_distance, (dx, dy))) = nearest else {
            return base;
        };
        if edge_distance >= blend_distance {
            return base;
        }

        let neighbor = self.region_biome(noise, (region.0 + dx, region.1 + dy));
        if neighbor == base {
            return base;
        }

        let falloff = 1.0 - edge_distance as f32 / blend_distance as f32;
        let weight = falloff * noise.get_blend(coord);
        let roll = match self.config.blend_mode {
            BlendMode::Deterministic => {
                seeded::unit(seeded::hash_coord(self.seed, salt::BLEND, coord))
            }
            BlendMode::Cosmetic => rand::rng().random::<f32>(),
        };

        if roll < weight {
            neighbor
        } else {
            base
        }
    }

    pub fn cached_regions(&self) -> usize {
        self.regions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamerConfig;

    fn setup(blend_distance: i32, blend_mode: BlendMode) -> (NoiseGenerator, BiomeMap) {
        let config = StreamerConfig {
            seed: 4242,
            chunk_size: 4,
            biomes: BiomeConfig {
                count: 5,
                size: 2,
                blend_distance,
                blend_mode,
                ..BiomeConfig::default()
            },
            ..StreamerConfig::default()
        };
        (
            NoiseGenerator::new(&config),
            BiomeMap::new(config.biomes, config.chunk_size, config.seed),
        )
    }

    #[test]
    fn test_region_of_floors_negative_tiles() {
        let (_, map) = setup(0, BlendMode::Deterministic);
        assert_eq!(map.region_of(HexCoordinate::new(0, 0)), (0, 0));
        assert_eq!(map.region_of(HexCoordinate::new(7, 8)), (0, 1));
        assert_eq!(map.region_of(HexCoordinate::new(-1, -9)), (-1, -2));
    }

    #[test]
    fn test_unblended_biome_is_uniform_per_region() {
        let (noise, map) = setup(0, BlendMode::Deterministic);
        let expected = map.region_biome(&noise, (1, -1));
        for x in 8..16 {
            for y in -8..0 {
                let biome = map.biome_at(&noise, HexCoordinate::new(x, y));
                assert_eq!(biome, expected);
                assert!(biome < 5);
            }
        }
        assert_eq!(map.cached_regions(), 1);
    }

    #[test]
    fn test_region_biome_is_memoised_and_stable() {
        let (noise, map) = setup(0, BlendMode::Deterministic);
        let first: Vec<_> = (-3..3).map(|r| map.region_biome(&noise, (r, r))).collect();
        let cached = map.cached_regions();
        let second: Vec<_> = (-3..3).map(|r| map.region_biome(&noise, (r, r))).collect();
        assert_eq!(first, second);
        assert_eq!(cached, 6);
        assert_eq!(map.cached_regions(), cached);
    }

    #[test]
    fn test_deterministic_blend_is_pure() {
        let (noise, map) = setup(3, BlendMode::Deterministic);
        let (other_noise, other_map) = setup(3, BlendMode::Deterministic);
        for x in -16..16 {
            for y in -16..16 {
                let coord = HexCoordinate::new(x, y);
                let biome = map.biome_at(&noise, coord);
                assert_eq!(biome, map.biome_at(&noise, coord));
                assert_eq!(biome, other_map.biome_at(&other_noise, coord));
            }
        }
    }

    #[test]
    fn test_blend_only_borrows_from_adjacent_region() {
        let (noise, map) = setup(2, BlendMode::Cosmetic);
        for x in 0..8 {
            for y in 0..8 {
                let coord = HexCoordinate::new(x, y);
                let biome = map.biome_at(&noise, coord);
                let candidates = [
                    map.region_biome(&noise, (0, 0)),
                    map.region_biome(&noise, (-1, 0)),
                    map.region_biome(&noise, (1, 0)),
                    map.region_biome(&noise, (0, -1)),
                    map.region_biome(&noise, (0, 1)),
                ];
                assert!(candidates.contains(&biome));
            }
        }
        // Interior tiles (>= 2 from every edge) never blend
        let center = map.region_biome(&noise, (0, 0));
        assert_eq!(map.biome_at(&noise, HexCoordinate::new(3, 3)), center);
        assert_eq!(map.biome_at(&noise, HexCoordinate::new(4, 5)), center);
    }
}
