pub mod noise_parameters;
pub mod noise_field;
pub mod noise_utils;

pub use noise_parameters::{FractalType, NoiseParameters};
pub use noise_field::NoiseField;
