pub mod astar;
pub mod destination;
pub mod walkable;

pub use astar::{apply_steps, directions_from_path, find_path, heuristic, HexPathfinder, TieBreak};
pub use destination::find_random_destination;
pub use walkable::Walkability;
