// src/terrain/tile.rs
use std::sync::Arc;

use crate::terrain::error::TerrainResult;
use crate::terrain::generation_utils::{generate_tile_geometry, MeshGeometry};
use crate::terrain::noise::NoiseField;
use crate::terrain::terrain_config::ViewDistance;

// Unique identifier for a tile based on its grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    pub x: i32,
    pub z: i32,
}

impl TilePosition {
    pub const fn new(x: i32, z: i32) -> Self {
        TilePosition { x, z }
    }

    /// World-space (x, z) center of the tile for a grid of cell `size`.
    pub fn world_center(&self, size: u32) -> (f64, f64) {
        (self.x as f64 * size as f64, self.z as f64 * size as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Active,
    Inactive,
}

/// Axis aligned bounding box of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

impl TileBounds {
    /// Cube of edge `size` centered at `(center_x, 0, center_z)`.
    pub fn for_tile(center_x: f32, center_z: f32, size: u32) -> Self {
        let half = size as f32 / 2.0;
        TileBounds {
            center: [center_x, 0.0, center_z],
            half_extents: [half, half, half],
        }
    }

    pub fn min(&self) -> [f32; 3] {
        [
            self.center[0] - self.half_extents[0],
            self.center[1] - self.half_extents[1],
            self.center[2] - self.half_extents[2],
        ]
    }

    pub fn max(&self) -> [f32; 3] {
        [
            self.center[0] + self.half_extents[0],
            self.center[1] + self.half_extents[1],
            self.center[2] + self.half_extents[2],
        ]
    }

    /// Squared distance from `point` to the box, zero when inside.
    pub fn sqr_distance(&self, point: [f32; 3]) -> f32 {
        let (min, max) = (self.min(), self.max());
        let mut sum = 0.0;
        for axis in 0..3 {
            let d = if point[axis] < min[axis] {
                min[axis] - point[axis]
            } else if point[axis] > max[axis] {
                point[axis] - max[axis]
            } else {
                0.0
            };
            sum += d * d;
        }
        sum
    }

    pub fn distance(&self, point: [f32; 3]) -> f32 {
        self.sqr_distance(point).sqrt()
    }

    pub fn contains(&self, point: [f32; 3]) -> bool {
        self.sqr_distance(point) == 0.0
    }
}

/// One square patch of generated terrain.
///
/// Geometry is fixed at construction. Only the activation state changes
/// afterwards, and only the `TileManager` changes it.
#[derive(Debug)]
pub struct Tile {
    position: TilePosition,
    size: u32,
    center: [f32; 2],
    geometry: Arc<MeshGeometry>,
    bounds: TileBounds,
    state: TileState,
    last_active_tick: Option<u64>,
}

impl Tile {
    /// Builds the tile at `position`. Either the whole mesh is produced or an
    /// error is returned; no partially built tile is ever observable.
    pub fn build(position: TilePosition, size: u32, noise: &NoiseField) -> TerrainResult<Tile> {
        let geometry = generate_tile_geometry(position, size, noise)?;
        let (center_x, center_z) = position.world_center(size);
        let center = [center_x as f32, center_z as f32];

        Ok(Tile {
            position,
            size,
            center,
            geometry: Arc::new(geometry),
            bounds: TileBounds::for_tile(center[0], center[1], size),
            state: TileState::Inactive,
            last_active_tick: None,
        })
    }

    pub fn position(&self) -> TilePosition {
        self.position
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// World-space (x, z) center.
    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    /// Shared handle to the immutable geometry, for renderers that keep it
    /// around after the tick.
    pub fn geometry_handle(&self) -> Arc<MeshGeometry> {
        Arc::clone(&self.geometry)
    }

    /// Tile-local vertex positions, used as decoration sample points.
    pub fn sample_points(&self) -> &[[f32; 3]] {
        &self.geometry.vertices
    }

    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TileState::Active
    }

    pub fn last_active_tick(&self) -> Option<u64> {
        self.last_active_tick
    }

    pub fn distance_to(&self, observer: [f32; 3]) -> f32 {
        self.bounds.distance(observer)
    }

    /// Inclusive: a tile exactly `view_distance` away is still in view.
    pub fn in_view(&self, observer: [f32; 3], view_distance: ViewDistance) -> bool {
        self.distance_to(observer) <= view_distance.get()
    }

    pub(crate) fn set_state(&mut self, state: TileState, tick: u64) {
        self.state = state;
        if state == TileState::Active {
            self.last_active_tick = Some(tick);
        }
    }
}
