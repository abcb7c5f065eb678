// src/terrain/noise/noise_field.rs
use std::fmt;

use crate::terrain::error::ConfigResult;
use crate::terrain::noise::noise_parameters::NoiseParameters;
use crate::terrain::noise::noise_utils::{create_noise_function_from_params, normalize_unit, BoxedNoiseFn};

/// Deterministic height field shared by every tile.
///
/// `sample(x, y) = coherent(x / frequency, y / frequency) * amplitude` with the
/// coherent noise normalised to `[0, 1]`. The generator is `Send + Sync` so
/// tiles can be built on worker threads against the same field.
pub struct NoiseField {
    params: NoiseParameters,
    noise_fn: BoxedNoiseFn,
}

impl NoiseField {
    pub fn new(params: NoiseParameters) -> ConfigResult<Self> {
        params.validate()?;
        let noise_fn = create_noise_function_from_params(&params);
        Ok(NoiseField { params, noise_fn })
    }

    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let frequency = self.params.frequency as f64;
        let value = self.noise_fn.get([x / frequency, y / frequency]);
        (normalize_unit(value) * self.params.amplitude as f64) as f32
    }

    pub fn parameters(&self) -> &NoiseParameters {
        &self.params
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField").field("params", &self.params).finish_non_exhaustive()
    }
}
