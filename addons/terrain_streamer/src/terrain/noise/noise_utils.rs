// src/terrain/noise/noise_utils.rs
use noise::{Billow, Fbm, MultiFractal, NoiseFn, Perlin, RidgedMulti};

use crate::terrain::noise::noise_parameters::{FractalType, NoiseParameters};

pub type BoxedNoiseFn = Box<dyn NoiseFn<f64, 2> + Send + Sync>;

/// Builds the raw coherent noise generator described by `params`.
///
/// The generators run at unit frequency: `NoiseField` divides input
/// coordinates by `params.frequency` itself, so scaling is not applied twice.
pub fn create_noise_function_from_params(params: &NoiseParameters) -> BoxedNoiseFn {
    match params.fractal_type {
        FractalType::None => Box::new(Perlin::new(params.seed)),
        FractalType::Fbm => Box::new(
            Fbm::<Perlin>::new(params.seed)
                .set_frequency(1.0)
                .set_octaves(params.fractal_octaves)
                .set_lacunarity(params.fractal_lacunarity)
                .set_persistence(params.fractal_gain),
        ),
        FractalType::Ridged => Box::new(
            RidgedMulti::<Perlin>::new(params.seed)
                .set_frequency(1.0)
                .set_octaves(params.fractal_octaves)
                .set_lacunarity(params.fractal_lacunarity)
                .set_persistence(params.fractal_gain),
        ),
        FractalType::Billow => Box::new(
            Billow::<Perlin>::new(params.seed)
                .set_frequency(1.0)
                .set_octaves(params.fractal_octaves)
                .set_lacunarity(params.fractal_lacunarity)
                .set_persistence(params.fractal_gain),
        ),
    }
}

/// Maps noise-rs output (roughly `[-1, 1]`) onto `[0, 1]`.
#[inline]
pub fn normalize_unit(value: f64) -> f64 {
    (value * 0.5 + 0.5).clamp(0.0, 1.0)
}
