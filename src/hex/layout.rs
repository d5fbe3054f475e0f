use serde::{Deserialize, Serialize};

use super::coord::{CubeCoord, HexCoordinate};

/// 2D position in world units (pixels, metres, whatever the host uses)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &WorldPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pointy-top axial layout mapping hex cells to world positions.
///
/// `size` is the centre-to-corner radius of one hex in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    pub size: f32,
    pub origin: WorldPosition,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self {
            size: 1.0 / 3.0_f32.sqrt(),
            origin: WorldPosition::default(),
        }
    }
}

impl HexLayout {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            origin: WorldPosition::default(),
        }
    }

    /// Centre of a cell in world units
    pub fn to_world(&self, coord: HexCoordinate) -> WorldPosition {
        let sqrt3 = 3.0_f32.sqrt();
        let q = coord.x as f32;
        let r = coord.y as f32;
        WorldPosition {
            x: self.origin.x + self.size * (sqrt3 * q + sqrt3 / 2.0 * r),
            y: self.origin.y + self.size * (1.5 * r),
        }
    }

    /// Cell containing a world position.
    ///
    /// Positions beyond the representable grid (or non-finite ones) land on
    /// a cell just outside it, which `HexCoordinate::is_representable`
    /// rejects.
    pub fn from_world(&self, position: WorldPosition) -> HexCoordinate {
        let sqrt3 = 3.0_f32.sqrt();
        let px = (position.x - self.origin.x) / self.size;
        let py = (position.y - self.origin.y) / self.size;
        let q = Self::clamp_axis(sqrt3 / 3.0 * px - py / 3.0);
        let r = Self::clamp_axis(2.0 / 3.0 * py);
        HexCoordinate::from_cube(CubeCoord::round(q, r, -q - r))
    }

    fn clamp_axis(value: f32) -> f32 {
        let limit = (HexCoordinate::MAX_EXTENT as f32) * 2.0;
        if value.is_nan() {
            return limit;
        }
        value.clamp(-limit, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_round_trip() {
        let layout = HexLayout::new(16.0);
        for x in -6..=6 {
            for y in -6..=6 {
                let coord = HexCoordinate::new(x, y);
                assert_eq!(layout.from_world(layout.to_world(coord)), coord);
            }
        }
    }

    #[test]
    fn test_default_layout_matches_unit_centers() {
        let layout = HexLayout::default();
        let coord = HexCoordinate::new(3, -2);
        let world = layout.to_world(coord);
        let (ux, uy) = coord.unit_center();
        assert!((world.x - ux).abs() < 1e-4);
        assert!((world.y - uy).abs() < 1e-4);
    }

    #[test]
    fn test_far_positions_map_outside_the_grid() {
        let layout = HexLayout::default();
        for position in [
            WorldPosition::new(1e30, 1e30),
            WorldPosition::new(-1e30, 5.0),
            WorldPosition::new(f32::NAN, 0.0),
            WorldPosition::new(f32::INFINITY, f32::NEG_INFINITY),
        ] {
            assert!(!layout.from_world(position).is_representable(), "{position:?}");
        }
    }

    #[test]
    fn test_offset_positions_stay_in_cell() {
        let layout = HexLayout::new(10.0);
        let center = layout.to_world(HexCoordinate::new(2, 1));
        let nudged = WorldPosition::new(center.x + 3.0, center.y - 2.0);
        assert_eq!(layout.from_world(nudged), HexCoordinate::new(2, 1));
    }
}
