use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ulid::Ulid;

use crate::error::OccupancyError;
use crate::hex::HexCoordinate;

/// Identifier handed out to whatever stands on a tile (agent, pickup, ...)
pub type OccupantId = Ulid;

/// Shared tile -> occupant map.
///
/// Lives inside the streamer so a deleted tile can never keep an occupant;
/// spawners read it through `&self` from any thread.
#[derive(Debug, Default)]
pub struct OccupancyRegistry {
    occupants: DashMap<HexCoordinate, OccupantId>,
}

impl OccupancyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a tile. Generation checks are the streamer's job.
    pub(crate) fn register(
        &self,
        coord: HexCoordinate,
        occupant: OccupantId,
    ) -> Result<(), OccupancyError> {
        match self.occupants.entry(coord) {
            Entry::Occupied(existing) => Err(OccupancyError::Occupied {
                coord,
                occupant: *existing.get(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(occupant);
                Ok(())
            }
        }
    }

    pub fn unregister(&self, coord: HexCoordinate) -> Option<OccupantId> {
        self.occupants.remove(&coord).map(|(_, occupant)| occupant)
    }

    pub fn occupant_at(&self, coord: HexCoordinate) -> Option<OccupantId> {
        self.occupants.get(&coord).map(|entry| *entry.value())
    }

    pub fn is_occupied(&self, coord: HexCoordinate) -> bool {
        self.occupants.contains_key(&coord)
    }

    /// Linear scan; registries are small
    pub fn position_of(&self, occupant: OccupantId) -> Option<HexCoordinate> {
        self.occupants
            .iter()
            .find(|entry| *entry.value() == occupant)
            .map(|entry| *entry.key())
    }

    /// Remove occupants standing on any of `coords`, in iteration order
    pub(crate) fn release<'a>(
        &self,
        coords: impl IntoIterator<Item = &'a HexCoordinate>,
    ) -> Vec<(HexCoordinate, OccupantId)> {
        coords
            .into_iter()
            .filter_map(|coord| self.unregister(*coord).map(|occupant| (*coord, occupant)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn clear(&self) {
        self.occupants.clear();
    }
}
