//! Rooms on a coarse grid and the corridors linking them.
//!
//! Both are pure functions of (seed, config, grid cell); the maps here only
//! memoise them so repeated tile queries stay cheap.

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::noise::NoiseGenerator;
use super::seeded::{self, salt};
use crate::config::{CorridorConfig, RoomConfig};
use crate::hex::{HexCoordinate, HexDirection};

/// Room grid cell coordinate
pub type GridCell = (i32, i32);

/// Tiles on the corridor between two neighbouring cells' rooms
pub type CorridorTiles = Arc<HashSet<HexCoordinate>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub cell: GridCell,
    pub center: HexCoordinate,
    pub radius: f32,
}

impl Room {
    #[inline]
    pub fn contains(&self, coord: HexCoordinate) -> bool {
        self.center.euclidean_distance(coord) <= self.radius
    }
}

pub struct RoomLayout {
    rooms: RoomConfig,
    corridors: CorridorConfig,
    seed: i32,
    /// Axial reach of the largest room, in tiles
    reach: i32,
    room_cache: RwLock<HashMap<GridCell, Option<Room>>>,
    corridor_cache: RwLock<HashMap<(GridCell, GridCell), CorridorTiles>>,
}

impl RoomLayout {
    pub fn new(rooms: RoomConfig, corridors: CorridorConfig, seed: i32) -> Self {
        // Euclidean radius r covers at most r / (sqrt(3)/2) steps along an axis
        let reach = (rooms.max_radius / (3.0_f32.sqrt() / 2.0)).ceil() as i32;
        Self {
            rooms,
            corridors,
            seed,
            reach,
            room_cache: RwLock::new(HashMap::new()),
            corridor_cache: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn cell_of(&self, coord: HexCoordinate) -> GridCell {
        let spacing = self.rooms.spacing.max(1);
        (coord.x.div_euclid(spacing), coord.y.div_euclid(spacing))
    }

    /// The room hosted by a grid cell, if the room noise dips low enough
    pub fn room_in_cell(&self, noise: &NoiseGenerator, cell: GridCell) -> Option<Room> {
        if !self.rooms.enabled {
            return None;
        }
        if let Some(room) = self.room_cache.read().get(&cell) {
            return *room;
        }

        let room = self.build_room(noise, cell);
        self.room_cache.write().entry(cell).or_insert(room);
        room
    }

    fn build_room(&self, noise: &NoiseGenerator, (cx, cy): GridCell) -> Option<Room> {
        if noise.get_room(cx, cy) >= self.rooms.valley_threshold {
            return None;
        }

        let spacing = self.rooms.spacing.max(1);
        let jitter = |key: u64| {
            let roll = seeded::unit(seeded::hash_xy(self.seed, key, cx, cy));
            let offset = (roll * spacing as f32) as i32;
            offset.min(spacing - 1)
        };
        let center = HexCoordinate::new(
            cx * spacing + jitter(salt::ROOM_CENTER_X),
            cy * spacing + jitter(salt::ROOM_CENTER_Y),
        );

        let span = self.rooms.max_radius - self.rooms.min_radius;
        let roll = seeded::unit(seeded::hash_xy(self.seed, salt::ROOM_RADIUS, cx, cy));
        let radius = self.rooms.min_radius + roll * span;

        Some(Room {
            cell: (cx, cy),
            center,
            radius,
        })
    }

    /// Room covering a tile, searching every cell a room could reach it from
    pub fn room_at(&self, noise: &NoiseGenerator, coord: HexCoordinate) -> Option<Room> {
        if !self.rooms.enabled {
            return None;
        }
        let reach = HexCoordinate::new(self.reach, self.reach);
        let (min_x, min_y) = self.cell_of(coord - reach);
        let (max_x, max_y) = self.cell_of(coord + reach);

        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                if let Some(room) = self.room_in_cell(noise, (cx, cy)) {
                    if room.contains(coord) {
                        return Some(room);
                    }
                }
            }
        }
        None
    }

    /// Corridor from the room in `from` to the room in `to`; empty when
    /// either cell has no room.
    pub fn corridor(&self, noise: &NoiseGenerator, from: GridCell, to: GridCell) -> CorridorTiles {
        if let Some(tiles) = self.corridor_cache.read().get(&(from, to)) {
            return Arc::clone(tiles);
        }

        let tiles = match (self.room_in_cell(noise, from), self.room_in_cell(noise, to)) {
            (Some(a), Some(b)) => self.carve(a, b),
            _ => HashSet::new(),
        };
        let mut cache = self.corridor_cache.write();
        let tiles = Arc::clone(cache.entry((from, to)).or_insert(Arc::new(tiles)));
        tiles
    }

    /// Whether a tile lies on any corridor.
    ///
    /// A corridor anchored at cell `a` runs to `a + (1, 0)` or `a + (0, 1)`
    /// and never leaves the cell box around the pair grown by one cell, so
    /// only anchors in a 4x4 window around the tile's cell can reach it.
    pub fn corridor_contains(&self, noise: &NoiseGenerator, coord: HexCoordinate) -> bool {
        if !self.rooms.enabled || !self.corridors.enabled {
            return false;
        }
        let (cx, cy) = self.cell_of(coord);

        for ay in cy - 2..=cy + 1 {
            for ax in cx - 2..=cx + 1 {
                for to in [(ax + 1, ay), (ax, ay + 1)] {
                    let from = (ax, ay);
                    if !Self::in_box((cx, cy), from, to) {
                        continue;
                    }
                    if self.corridor(noise, from, to).contains(&coord) {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[inline]
    fn in_box(cell: GridCell, a: GridCell, b: GridCell) -> bool {
        let x_range = a.0.min(b.0) - 1..=a.0.max(b.0) + 1;
        let y_range = a.1.min(b.1) - 1..=a.1.max(b.1) + 1;
        x_range.contains(&cell.0) && y_range.contains(&cell.1)
    }

    /// Greedy hex walk between room centres with seeded sidesteps
    fn carve(&self, a: Room, b: Room) -> HashSet<HexCoordinate> {
        let mut rng: StdRng = seeded::rng_for(self.seed, salt::CORRIDOR, a.center, b.center);
        let jitter = f64::from(self.corridors.jitter);
        let jitter_budget = 2 * a.center.distance(b.center);

        let mut current = a.center;
        let mut tiles = HashSet::new();
        tiles.insert(current);

        let mut steps = 0;
        while current != b.center {
            let Some(best) = Self::step_toward(current, b.center) else {
                break;
            };
            let mut next = current.neighbor(best);

            if steps < jitter_budget && jitter > 0.0 && rng.random_bool(jitter) {
                let flank = best.flanks()[rng.random_range(0..2)];
                let sidestep = current.neighbor(flank);
                if Self::in_box(self.cell_of(sidestep), a.cell, b.cell) {
                    next = sidestep;
                }
            }

            current = next;
            tiles.insert(current);
            steps += 1;
        }

        debug_log!(
            "RoomLayout: corridor {:?} -> {:?}, {} tiles",
            a.cell,
            b.cell,
            tiles.len()
        );
        tiles
    }

    /// Neighbour direction closest to `target`, hex distance first then
    /// straight-line distance
    fn step_toward(from: HexCoordinate, target: HexCoordinate) -> Option<HexDirection> {
        HexDirection::ALL.into_iter().min_by(|a, b| {
            let na = from.neighbor(*a);
            let nb = from.neighbor(*b);
            na.distance(target)
                .cmp(&nb.distance(target))
                .then(na.euclidean_distance(target).total_cmp(&nb.euclidean_distance(target)))
        })
    }

    /// Drop memoised rooms and corridors more than `radius` cells from `center`
    pub fn retain_near(&self, center: GridCell, radius: i32) {
        let near =
            |cell: &GridCell| (cell.0 - center.0).abs().max((cell.1 - center.1).abs()) <= radius;
        self.room_cache.write().retain(|cell, _| near(cell));
        self.corridor_cache.write().retain(|(from, _), _| near(from));
    }

    pub fn cached_rooms(&self) -> usize {
        self.room_cache.read().len()
    }

    pub fn cached_corridors(&self) -> usize {
        self.corridor_cache.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamerConfig;

    /// Every cell hosts a room
    fn all_rooms_config() -> StreamerConfig {
        StreamerConfig {
            seed: 31,
            rooms: RoomConfig {
                spacing: 10,
                valley_threshold: 1.1,
                min_radius: 2.0,
                max_radius: 3.0,
                ..RoomConfig::default()
            },
            corridors: CorridorConfig {
                enabled: true,
                jitter: 0.4,
            },
            ..StreamerConfig::default()
        }
    }

    fn setup(config: &StreamerConfig) -> (NoiseGenerator, RoomLayout) {
        (
            NoiseGenerator::new(config),
            RoomLayout::new(config.rooms, config.corridors, config.seed),
        )
    }

    #[test]
    fn test_room_centers_stay_in_their_cell() {
        let config = all_rooms_config();
        let (noise, layout) = setup(&config);
        for cx in -3..3 {
            for cy in -3..3 {
                let Some(room) = layout.room_in_cell(&noise, (cx, cy)) else {
                    panic!("cell ({cx}, {cy}) should host a room");
                };
                assert_eq!(layout.cell_of(room.center), (cx, cy));
                assert!((2.0..=3.0).contains(&room.radius));
                assert!(room.contains(room.center));
            }
        }
    }

    #[test]
    fn test_no_rooms_above_threshold() {
        let mut config = all_rooms_config();
        config.rooms.valley_threshold = 0.0;
        let (noise, layout) = setup(&config);
        assert!(layout.room_in_cell(&noise, (0, 0)).is_none());
        assert!(layout.room_at(&noise, HexCoordinate::new(5, 5)).is_none());
        assert!(layout.corridor(&noise, (0, 0), (1, 0)).is_empty());
    }

    #[test]
    fn test_disabled_rooms_place_nothing() {
        let mut config = all_rooms_config();
        config.rooms.enabled = false;
        let (noise, layout) = setup(&config);
        assert!(layout.room_in_cell(&noise, (0, 0)).is_none());
        assert!(!layout.corridor_contains(&noise, HexCoordinate::new(3, 3)));
    }

    #[test]
    fn test_room_at_finds_center() {
        let config = all_rooms_config();
        let (noise, layout) = setup(&config);
        let Some(room) = layout.room_in_cell(&noise, (1, -1)) else {
            panic!("expected a room");
        };
        assert!(layout.room_at(&noise, room.center).is_some());
    }

    #[test]
    fn test_corridor_is_contiguous_and_joins_centers() {
        let config = all_rooms_config();
        let (noise, layout) = setup(&config);
        for to in [(1, 0), (0, 1)] {
            let corridor = layout.corridor(&noise, (0, 0), to);
            let rooms = (layout.room_in_cell(&noise, (0, 0)), layout.room_in_cell(&noise, to));
            let (Some(a), Some(b)) = rooms else {
                panic!("expected rooms");
            };
            assert!(corridor.contains(&a.center));
            assert!(corridor.contains(&b.center));

            // Connected: flood fill from one end reaches every tile
            let mut seen = HashSet::from([a.center]);
            let mut frontier = vec![a.center];
            while let Some(tile) = frontier.pop() {
                for n in tile.neighbors() {
                    if corridor.contains(&n) && seen.insert(n) {
                        frontier.push(n);
                    }
                }
            }
            assert_eq!(seen.len(), corridor.len());

            for tile in corridor.iter() {
                assert!(RoomLayout::in_box(layout.cell_of(*tile), (0, 0), to));
                assert!(layout.corridor_contains(&noise, *tile));
            }
        }
    }

    #[test]
    fn test_corridors_are_reproducible() {
        let config = all_rooms_config();
        let (noise, layout) = setup(&config);
        let (other_noise, other_layout) = setup(&config);
        let first = layout.corridor(&noise, (-2, 1), (-1, 1));
        let second = other_layout.corridor(&other_noise, (-2, 1), (-1, 1));
        assert_eq!(*first, *second);
        // Memoised
        assert!(Arc::ptr_eq(&first, &layout.corridor(&noise, (-2, 1), (-1, 1))));
    }

    #[test]
    fn test_retain_near_prunes_far_cells() {
        let config = all_rooms_config();
        let (noise, layout) = setup(&config);
        layout.corridor(&noise, (0, 0), (1, 0));
        layout.corridor(&noise, (20, 20), (21, 20));
        assert_eq!(layout.cached_corridors(), 2);

        layout.retain_near((0, 0), 2);
        assert_eq!(layout.cached_corridors(), 1);
        assert_eq!(layout.cached_rooms(), 2);
    }
}
