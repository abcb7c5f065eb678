// src/terrain/noise/noise_parameters.rs
use serde::{Deserialize, Serialize};

use crate::terrain::error::{ConfigError, ConfigResult};

/// Upper bound on fractal octaves, matching what noise-rs accepts.
pub const MAX_OCTAVES: usize = 32;

// --- Defaults (serde needs plain functions) ---
pub fn default_frequency() -> f32 { 8.0 }
pub fn default_amplitude() -> f32 { 10.0 }
pub fn default_octaves() -> usize { 4 }
pub fn default_lacunarity() -> f64 { 2.0 }
pub fn default_gain() -> f64 { 0.5 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalType {
    /// Single octave Perlin noise.
    #[default]
    None,
    Fbm,
    Ridged,
    Billow,
}

/// Parameters of the height field.
///
/// `frequency` divides the input coordinates, so larger values give broader,
/// smoother hills. `amplitude` scales the normalised `[0, 1]` noise value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    #[serde(default)]
    pub seed: u32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default)]
    pub fractal_type: FractalType,
    #[serde(default = "default_octaves")]
    pub fractal_octaves: usize,
    #[serde(default = "default_lacunarity")]
    pub fractal_lacunarity: f64,
    #[serde(default = "default_gain")]
    pub fractal_gain: f64,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        NoiseParameters {
            seed: 0,
            frequency: default_frequency(),
            amplitude: default_amplitude(),
            fractal_type: FractalType::None,
            fractal_octaves: default_octaves(),
            fractal_lacunarity: default_lacunarity(),
            fractal_gain: default_gain(),
        }
    }
}

impl NoiseParameters {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        NoiseParameters {
            frequency,
            amplitude,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fractal(mut self, fractal_type: FractalType, octaves: usize) -> Self {
        self.fractal_type = fractal_type;
        self.fractal_octaves = octaves;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        if !(self.amplitude.is_finite() && self.amplitude >= 0.0) {
            return Err(ConfigError::InvalidAmplitude(self.amplitude));
        }
        // Octaves only matter once a fractal is layered on top
        if self.fractal_type != FractalType::None
            && !(1..=MAX_OCTAVES).contains(&self.fractal_octaves)
        {
            return Err(ConfigError::InvalidOctaves(self.fractal_octaves));
        }
        Ok(())
    }
}
