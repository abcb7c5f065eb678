use godot::prelude::*;

pub mod config;
pub mod terrain;
pub mod threading;
pub mod utils;

mod bridge;

// The entry point of the extension library.
struct TerrainStreamerExtension;

#[gdextension]
unsafe impl ExtensionLibrary for TerrainStreamerExtension {}
