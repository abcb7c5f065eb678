// src/config/config_manager.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::terrain::decoration::DecorationDescriptor;
use crate::terrain::error::{ConfigError, ConfigResult};
use crate::terrain::noise::NoiseParameters;
use crate::terrain::terrain_config::{TerrainConfig, DEFAULT_TERRAIN_COLOR};

// Default values
pub fn default_terrain_size() -> u32 { 100 }
pub fn default_ring_radius() -> u32 { 2 }
pub fn default_view_distance() -> f32 { 200.0 }
pub fn default_terrain_color() -> [f32; 3] { DEFAULT_TERRAIN_COLOR }

// --- Struct Definitions ---

/// Raw terrain settings as read from TOML. Nothing here is validated yet;
/// `TerrainConfig::try_from` does that.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TerrainConfigData {
    #[serde(default = "default_terrain_size")]
    pub terrain_size: u32,
    #[serde(default = "default_ring_radius")]
    pub ring_radius: u32,
    #[serde(default = "default_view_distance")]
    pub view_distance: f32,
    #[serde(default)]
    pub max_inactive_tiles: Option<usize>,
    #[serde(default)]
    pub use_parallel_processing: bool,
    #[serde(default)]
    pub max_threads: usize,
    #[serde(default)]
    pub decoration_seed: Option<u64>,
    #[serde(default = "default_terrain_color")]
    pub terrain_color: [f32; 3],
    #[serde(default)]
    pub material_path: Option<String>,
    #[serde(default)]
    pub noise: NoiseParameters,
    #[serde(default)]
    pub decorations: Vec<DecorationDescriptor>,
}

impl Default for TerrainConfigData {
    fn default() -> Self {
        TerrainConfigData {
            terrain_size: default_terrain_size(),
            ring_radius: default_ring_radius(),
            view_distance: default_view_distance(),
            max_inactive_tiles: None,
            use_parallel_processing: false,
            max_threads: 0,
            decoration_seed: None,
            terrain_color: default_terrain_color(),
            material_path: None,
            noise: NoiseParameters::default(),
            decorations: Vec::new(),
        }
    }
}

// Configuration Manager
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    current_config: TerrainConfigData,
    config_path: Option<PathBuf>, // Path used for loading/saving
}

impl ConfigurationManager {
    pub fn with_config(config: TerrainConfigData, config_path: Option<PathBuf>) -> Self {
        Self {
            current_config: config,
            config_path,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_ref = path.as_ref();
        log::info!("ConfigurationManager: loading config from {:?}", path_ref);
        let config_str = fs::read_to_string(path_ref)?;

        let mut manager = Self::from_toml_str(&config_str)?;
        manager.config_path = Some(path_ref.to_path_buf());
        Ok(manager)
    }

    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: TerrainConfigData = toml::from_str(source).map_err(|e| {
            log::error!("ConfigurationManager: failed to parse TOML config: {}", e);
            ConfigError::from(e)
        })?;
        Ok(Self::with_config(config, None))
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.current_config)?)
    }

    /// Writes the config back to the path it was loaded from. Without a
    /// path this only warns.
    pub fn save_to_file(&self) -> ConfigResult<()> {
        match &self.config_path {
            Some(path) => {
                log::info!("ConfigurationManager: saving config to {:?}", path);
                fs::write(path, self.to_toml_string()?)?;
                Ok(())
            }
            None => {
                log::warn!("ConfigurationManager: cannot save configuration, no config path set");
                Ok(())
            }
        }
    }

    pub fn set_config_path<P: AsRef<Path>>(&mut self, path: P) {
        self.config_path = Some(path.as_ref().to_path_buf());
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn update_config(&mut self, updates: TerrainConfigData) {
        self.current_config = updates;
    }

    pub fn get_config(&self) -> &TerrainConfigData {
        &self.current_config
    }

    pub fn get_config_mut(&mut self) -> &mut TerrainConfigData {
        &mut self.current_config
    }

    /// Validated runtime config built from the current data.
    pub fn terrain_config(&self) -> ConfigResult<TerrainConfig> {
        TerrainConfig::try_from(self.current_config.clone())
    }
}
