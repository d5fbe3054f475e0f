use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::hex::HexCoordinate;

/// Walkability oracle consulted once per neighbour during a search.
///
/// Must answer consistently for the duration of a single search.
pub trait Walkability {
    fn is_walkable(&self, coord: HexCoordinate) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(HexCoordinate) -> bool,
{
    #[inline]
    fn is_walkable(&self, coord: HexCoordinate) -> bool {
        self(coord)
    }
}

/// A plain set of open tiles
impl<S: BuildHasher> Walkability for HashSet<HexCoordinate, S> {
    #[inline]
    fn is_walkable(&self, coord: HexCoordinate) -> bool {
        self.contains(&coord)
    }
}
