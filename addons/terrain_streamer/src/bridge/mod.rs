pub mod terrain_bridge;

pub use terrain_bridge::TerrainStreamer;
