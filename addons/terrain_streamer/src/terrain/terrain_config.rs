// src/terrain/terrain_config.rs
use crate::config::config_manager::TerrainConfigData;
use crate::terrain::decoration::DecorationCatalog;
use crate::terrain::error::{ConfigError, ConfigResult};
use crate::terrain::generation_utils::MAX_TERRAIN_SIZE;
use crate::terrain::noise::NoiseParameters;

/// Largest accepted ring radius. Keeps the window well inside the `i32`
/// coordinate range and the per-tick work bounded.
pub const MAX_RING_RADIUS: u32 = 1024;

/// Grass green applied to tile meshes when no material is configured.
pub const DEFAULT_TERRAIN_COLOR: [f32; 3] = [0.26, 1.0, 0.0];

/// Edge length of a tile in world units. Positive, even, at most
/// `MAX_TERRAIN_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainSize(u32);

impl TerrainSize {
    pub fn new(size: u32) -> ConfigResult<Self> {
        if size == 0 || size % 2 != 0 || size > MAX_TERRAIN_SIZE {
            return Err(ConfigError::InvalidTerrainSize(size));
        }
        Ok(TerrainSize(size))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Number of tile rings kept around the observer. The window is
/// `2 * radius - 1` tiles wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingRadius(u32);

impl RingRadius {
    pub fn new(radius: u32) -> ConfigResult<Self> {
        if !(1..=MAX_RING_RADIUS).contains(&radius) {
            return Err(ConfigError::InvalidRingRadius(radius));
        }
        Ok(RingRadius(radius))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Tiles on each side of the center tile.
    pub fn half_width(self) -> i32 {
        self.0 as i32 - 1
    }

    pub fn window_width(self) -> u32 {
        2 * self.0 - 1
    }
}

/// Maximum bounding-volume distance at which a tile is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDistance(f32);

impl ViewDistance {
    pub fn new(distance: f32) -> ConfigResult<Self> {
        if !(distance.is_finite() && distance > 0.0) {
            return Err(ConfigError::InvalidViewDistance(distance));
        }
        Ok(ViewDistance(distance))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

/// Validated runtime configuration for terrain streaming.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    pub terrain_size: TerrainSize,
    pub ring_radius: RingRadius,
    pub view_distance: ViewDistance,
    pub noise: NoiseParameters,
    /// `None` keeps every inactive tile forever.
    pub max_inactive_tiles: Option<usize>,
    pub use_parallel_processing: bool,
    /// Worker threads for parallel tile builds, 0 = one per CPU.
    pub max_threads: usize,
    /// Fixed decoration seed; `None` seeds from the thread RNG.
    pub decoration_seed: Option<u64>,
    pub decorations: DecorationCatalog,
    /// RGB albedo of the default terrain material, each channel in `[0, 1]`.
    pub terrain_color: [f32; 3],
    /// Material resource for tile meshes; overrides `terrain_color`.
    pub material_path: Option<String>,
}

impl TerrainConfig {
    pub fn new(
        terrain_size: u32,
        ring_radius: u32,
        view_distance: f32,
        noise: NoiseParameters,
    ) -> ConfigResult<Self> {
        noise.validate()?;
        Ok(TerrainConfig {
            terrain_size: TerrainSize::new(terrain_size)?,
            ring_radius: RingRadius::new(ring_radius)?,
            view_distance: ViewDistance::new(view_distance)?,
            noise,
            max_inactive_tiles: None,
            use_parallel_processing: false,
            max_threads: 0,
            decoration_seed: None,
            decorations: DecorationCatalog::default(),
            terrain_color: DEFAULT_TERRAIN_COLOR,
            material_path: None,
        })
    }

    pub fn with_terrain_color(mut self, color: [f32; 3]) -> ConfigResult<Self> {
        if !color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(ConfigError::InvalidTerrainColor(color));
        }
        self.terrain_color = color;
        Ok(self)
    }

    pub fn with_decorations(mut self, decorations: DecorationCatalog) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_decoration_seed(mut self, seed: u64) -> Self {
        self.decoration_seed = Some(seed);
        self
    }

    pub fn with_max_inactive_tiles(mut self, limit: usize) -> Self {
        self.max_inactive_tiles = Some(limit);
        self
    }

    pub fn with_parallel_processing(mut self, max_threads: usize) -> Self {
        self.use_parallel_processing = true;
        self.max_threads = max_threads;
        self
    }
}

impl TryFrom<TerrainConfigData> for TerrainConfig {
    type Error = ConfigError;

    fn try_from(data: TerrainConfigData) -> ConfigResult<Self> {
        let mut config = TerrainConfig::new(
            data.terrain_size,
            data.ring_radius,
            data.view_distance,
            data.noise,
        )?;
        config.max_inactive_tiles = data.max_inactive_tiles;
        config.use_parallel_processing = data.use_parallel_processing;
        config.max_threads = data.max_threads;
        config.decoration_seed = data.decoration_seed;
        config.decorations = DecorationCatalog::new(data.decorations);
        config.material_path = data.material_path;
        config.with_terrain_color(data.terrain_color)
    }
}
