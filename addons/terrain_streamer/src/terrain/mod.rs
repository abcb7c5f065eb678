// Export all components from the terrain module
pub mod error;
pub mod noise;
pub mod generation_utils;
pub mod tile;
pub mod terrain_config;
pub mod decoration;
pub mod tile_manager;

// Re-export main types for easier access
pub use decoration::{DecorationCatalog, DecorationDescriptor, DecorationPlacement, DecorationScatterer};
pub use error::{ConfigError, ConfigResult, TerrainError, TerrainResult};
pub use generation_utils::MeshGeometry;
pub use noise::{FractalType, NoiseField, NoiseParameters};
pub use terrain_config::{RingRadius, TerrainConfig, TerrainSize, ViewDistance};
pub use tile::{Tile, TileBounds, TilePosition, TileState};
pub use tile_manager::{TerrainStats, TickReport, TileEvent, TileManager, TileWindow};
