pub mod biomes;
pub mod chunk;
pub mod generator;
pub mod noise;
pub mod occupancy;
pub mod rooms;
pub mod seeded;
pub mod streamer;
pub mod tile;

pub use biomes::BiomeMap;
pub use chunk::ChunkCoord;
pub use generator::TerrainGenerator;
pub use noise::{NoiseField, NoiseGenerator};
pub use occupancy::{OccupancyRegistry, OccupantId};
pub use rooms::{Room, RoomLayout};
pub use streamer::{AdvanceOutcome, ChunkedWorldStreamer, StreamerStats};
pub use tile::{BiomeId, TileOrigin, WorldTile};
