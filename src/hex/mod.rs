pub mod coord;
pub mod direction;
pub mod layout;

pub use coord::{CubeCoord, HexCoordinate};
pub use direction::HexDirection;
pub use layout::{HexLayout, WorldPosition};
