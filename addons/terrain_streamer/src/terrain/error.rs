// src/terrain/error.rs
use thiserror::Error;

use crate::terrain::tile::TilePosition;

/// Errors raised while building or streaming tiles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("tile size {size} is invalid: must be an even number between 2 and {max}", max = crate::terrain::generation_utils::MAX_TERRAIN_SIZE)]
    InvalidTileSize { size: u32 },

    #[error("decoration catalog is empty")]
    EmptyCatalog,

    #[error("tile {position:?} has no sample points to scatter decorations on")]
    EmptySamplePoints { position: Option<TilePosition> },

    #[error("observer position ({x}, {z}) is outside the streamable coordinate range")]
    ObserverOutOfRange { x: f32, z: f32 },
}

pub type TerrainResult<T> = Result<T, TerrainError>;

/// Startup configuration errors. These are fatal: no tile is generated when
/// one of them is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("terrain_size {0} is invalid: must be an even number between 2 and {max}", max = crate::terrain::generation_utils::MAX_TERRAIN_SIZE)]
    InvalidTerrainSize(u32),

    #[error("ring_radius {0} is invalid: must be between 1 and {max}", max = crate::terrain::terrain_config::MAX_RING_RADIUS)]
    InvalidRingRadius(u32),

    #[error("noise frequency {0} is invalid: must be a positive finite number")]
    InvalidFrequency(f32),

    #[error("noise amplitude {0} is invalid: must be a non-negative finite number")]
    InvalidAmplitude(f32),

    #[error("view_distance {0} is invalid: must be a positive finite number")]
    InvalidViewDistance(f32),

    #[error("noise octaves {0} is invalid: must be between 1 and {max}", max = crate::terrain::noise::noise_parameters::MAX_OCTAVES)]
    InvalidOctaves(usize),

    #[error("terrain_color {0:?} is invalid: every channel must be between 0 and 1")]
    InvalidTerrainColor([f32; 3]),

    #[error("failed to read or write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize TOML config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to build tile worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
