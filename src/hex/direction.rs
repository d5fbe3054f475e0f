use serde::{Deserialize, Serialize};

use super::coord::HexCoordinate;

/// One of the six unit steps on the hex grid.
///
/// Declaration order is neighbor iteration order, which also decides which
/// of several equally short paths the pathfinder returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HexDirection {
    East = 0,      // (1, 0)
    NorthEast = 1, // (1, -1)
    North = 2,     // (0, -1)
    West = 3,      // (-1, 0)
    SouthWest = 4, // (-1, 1)
    South = 5,     // (0, 1)
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::North,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::South,
    ];

    pub const fn offset(self) -> HexCoordinate {
        match self {
            HexDirection::East => HexCoordinate::new(1, 0),
            HexDirection::NorthEast => HexCoordinate::new(1, -1),
            HexDirection::North => HexCoordinate::new(0, -1),
            HexDirection::West => HexCoordinate::new(-1, 0),
            HexDirection::SouthWest => HexCoordinate::new(-1, 1),
            HexDirection::South => HexCoordinate::new(0, 1),
        }
    }

    /// Direction matching a unit delta, `None` for anything else
    pub fn from_delta(delta: HexCoordinate) -> Option<HexDirection> {
        Self::ALL.into_iter().find(|d| d.offset() == delta)
    }

    pub fn opposite(self) -> HexDirection {
        Self::ALL[(self as usize + 3) % 6]
    }

    /// The two directions adjacent to this one (counter-clockwise, clockwise)
    pub fn flanks(self) -> [HexDirection; 2] {
        let i = self as usize;
        [Self::ALL[(i + 1) % 6], Self::ALL[(i + 5) % 6]]
    }

    pub fn from_index(index: usize) -> HexDirection {
        Self::ALL[index % 6]
    }
}
