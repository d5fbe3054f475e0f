use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::direction::HexDirection;

/// Hex cell in axial layout: `x` runs east, `y` runs south-east.
///
/// Ordering is lexicographic (`x` then `y`) so coordinate sets can be
/// emitted in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoordinate {
    pub x: i32,
    pub y: i32,
}

/// Cube coordinate (q, r, s) where q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCoord {
    /// Round fractional cube coordinates to the nearest cell, fixing up the
    /// component with the largest rounding error so q + r + s stays 0.
    pub fn round(q: f32, r: f32, s: f32) -> Self {
        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let dq = (rq - q).abs();
        let dr = (rr - r).abs();
        let ds = (rs - s).abs();

        if dq > dr && dq > ds {
            rq = -rr - rs;
        } else if dr > ds {
            rr = -rq - rs;
        }

        let q = rq as i32;
        let r = rr as i32;
        CubeCoord {
            q,
            r,
            s: q.saturating_neg().saturating_sub(r),
        }
    }
}

impl HexCoordinate {
    pub const ORIGIN: HexCoordinate = HexCoordinate { x: 0, y: 0 };

    /// Largest |x| or |y| the grid works with. Cube and distance arithmetic
    /// on coordinates inside this bound cannot overflow.
    pub const MAX_EXTENT: i32 = 1 << 28;

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_representable(self) -> bool {
        let limit = Self::MAX_EXTENT.unsigned_abs();
        self.x.unsigned_abs() <= limit && self.y.unsigned_abs() <= limit
    }

    /// Cube form; only meaningful for representable coordinates
    pub fn to_cube(self) -> CubeCoord {
        CubeCoord {
            q: self.x,
            r: self.y,
            s: -self.x - self.y,
        }
    }

    pub fn from_cube(cube: CubeCoord) -> Self {
        Self { x: cube.q, y: cube.r }
    }

    /// Hex step distance: (|dq| + |dr| + |ds|) / 2, saturating at
    /// `i32::MAX`
    pub fn distance(self, other: HexCoordinate) -> i32 {
        let dq = i64::from(self.x) - i64::from(other.x);
        let dr = i64::from(self.y) - i64::from(other.y);
        let ds = -dq - dr;
        let steps = (dq.abs() + dr.abs() + ds.abs()) / 2;
        i32::try_from(steps).unwrap_or(i32::MAX)
    }

    pub fn neighbor(self, direction: HexDirection) -> HexCoordinate {
        self + direction.offset()
    }

    /// All 6 neighbors in `HexDirection::ALL` order
    pub fn neighbors(self) -> [HexCoordinate; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }

    /// Centre of this cell in a unit layout where neighbouring centres are
    /// exactly 1.0 apart.
    pub fn unit_center(self) -> (f32, f32) {
        let x = self.x as f32 + self.y as f32 * 0.5;
        let y = self.y as f32 * (3.0_f32.sqrt() / 2.0);
        (x, y)
    }

    /// Euclidean distance between cell centres in the unit layout
    pub fn euclidean_distance(self, other: HexCoordinate) -> f32 {
        let (ax, ay) = self.unit_center();
        let (bx, by) = other.unit_center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Ring of cells at exactly `radius` steps, starting south-west of the
    /// centre and walking the six sides. Empty when the centre or radius is
    /// outside the representable range.
    pub fn ring(self, radius: i32) -> Vec<HexCoordinate> {
        if !self.is_representable() || radius > Self::MAX_EXTENT {
            return Vec::new();
        }
        if radius <= 0 {
            return vec![self];
        }

        let mut results = Vec::with_capacity(6 * radius as usize);
        let start = HexDirection::SouthWest.offset();
        let mut current = HexCoordinate::new(self.x + start.x * radius, self.y + start.y * radius);

        for side in HexDirection::ALL {
            for _ in 0..radius {
                results.push(current);
                current = current.neighbor(side);
            }
        }

        results
    }

    /// Every cell within `radius` steps, centre first then ring by ring
    pub fn spiral(self, radius: i32) -> Vec<HexCoordinate> {
        let mut cells = vec![self];
        for layer in 1..=radius.max(0) {
            cells.extend(self.ring(layer));
        }
        cells
    }

    /// Every cell whose centre lies within `radius` (Euclidean, unit layout)
    /// of this cell's centre.
    pub fn disc(self, radius: f32) -> Vec<HexCoordinate> {
        if radius < 0.0 {
            return Vec::new();
        }
        // Euclidean distance >= hex distance * sqrt(3)/2, so this bound
        // covers every candidate.
        let hex_bound = (radius / (3.0_f32.sqrt() / 2.0)).ceil() as i32;
        self.spiral(hex_bound)
            .into_iter()
            .filter(|c| self.euclidean_distance(*c) <= radius)
            .collect()
    }

    /// Straight line of cells from `self` to `other`, both inclusive.
    /// Empty when either end is outside the representable range.
    pub fn line_to(self, other: HexCoordinate) -> Vec<HexCoordinate> {
        if !self.is_representable() || !other.is_representable() {
            return Vec::new();
        }
        let n = self.distance(other);
        if n == 0 {
            return vec![self];
        }

        let a = self.to_cube();
        let b = other.to_cube();
        // Nudge so points exactly on an edge round consistently
        let (aq, ar, as_) = (a.q as f32 + 1e-4, a.r as f32 + 2e-4, a.s as f32 - 3e-4);
        let (bq, br, bs) = (b.q as f32 + 1e-4, b.r as f32 + 2e-4, b.s as f32 - 3e-4);

        (0..=n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let cube = CubeCoord::round(
                    aq + (bq - aq) * t,
                    ar + (br - ar) * t,
                    as_ + (bs - as_) * t,
                );
                HexCoordinate::from_cube(cube)
            })
            .collect()
    }
}

impl Add for HexCoordinate {
    type Output = HexCoordinate;

    fn add(self, rhs: HexCoordinate) -> HexCoordinate {
        HexCoordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for HexCoordinate {
    type Output = HexCoordinate;

    fn sub(self, rhs: HexCoordinate) -> HexCoordinate {
        HexCoordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for HexCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
