// src/terrain/generation_utils.rs
use crate::terrain::error::{TerrainError, TerrainResult};
use crate::terrain::noise::NoiseField;
use crate::terrain::tile::TilePosition;

/// Triangle mesh of one tile, in tile-local space (origin at the tile center).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Flat triangle list, three entries per triangle.
    pub indices: Vec<i32>,
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [i32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Largest tile edge length. Keeps `(size+1)^2` vertices and every `i32`
/// index well inside range.
pub const MAX_TERRAIN_SIZE: u32 = 4096;

/// Checks the grid math can split a tile of `size` evenly around its center
/// and that the mesh fits the index format.
pub fn validate_tile_size(size: u32) -> TerrainResult<()> {
    if size == 0 || size % 2 != 0 || size > MAX_TERRAIN_SIZE {
        return Err(TerrainError::InvalidTileSize { size });
    }
    Ok(())
}

/// Builds the `(size+1)^2` vertex grid and `size*size*2` triangles of the tile
/// at `position`.
///
/// Vertices are row-major with the z offset `i` as the outer loop and the x
/// offset `j` as the inner loop, both running over `[-size/2, size/2]`. Height
/// is sampled at the vertex's world coordinate so shared edges of neighbouring
/// tiles get identical heights.
pub fn generate_tile_geometry(
    position: TilePosition,
    size: u32,
    noise: &NoiseField,
) -> TerrainResult<MeshGeometry> {
    validate_tile_size(size)?;

    let half = (size / 2) as i32;
    let stride = size as usize + 1;
    let vertex_count = stride * stride;
    let (center_x, center_z) = position.world_center(size);

    // --- Vertices / UVs ---
    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(vertex_count);
    for i in -half..=half {
        for j in -half..=half {
            let height = noise.sample(center_x + j as f64, center_z + i as f64);
            vertices.push([j as f32, height, i as f32]);
            uvs.push([
                (j + half) as f32 / size as f32,
                (i + half) as f32 / size as f32,
            ]);
        }
    }

    // --- Indices ---
    // bottom_left walks the grid cell by cell, skipping the last column of each row
    let size_i = size as i32;
    let mut indices: Vec<i32> = Vec::with_capacity(size as usize * size as usize * 6);
    let mut bottom_left = 0i32;
    for _row in 0..size {
        for _col in 0..size {
            indices.extend_from_slice(&[
                bottom_left,
                bottom_left + size_i + 1,
                bottom_left + size_i + 2,
            ]);
            indices.extend_from_slice(&[
                bottom_left,
                bottom_left + size_i + 2,
                bottom_left + 1,
            ]);
            bottom_left += 1;
        }
        bottom_left += 1;
    }

    let normals = compute_vertex_normals(&vertices, &indices);

    Ok(MeshGeometry {
        vertices,
        normals,
        uvs,
        indices,
    })
}

/// Per-vertex normals: the sum of the (area weighted) normals of every face
/// touching the vertex, normalised. Degenerate vertices fall back to +Y.
pub fn compute_vertex_normals(vertices: &[[f32; 3]], indices: &[i32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![[0.0f32; 3]; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (p0, p1, p2) = (vertices[a], vertices[b], vertices[c]);
        let e1 = sub(p1, p0);
        let e2 = sub(p2, p0);
        let face = cross(e1, e2);
        for idx in [a, b, c] {
            accumulated[idx][0] += face[0];
            accumulated[idx][1] += face[1];
            accumulated[idx][2] += face[2];
        }
    }

    accumulated
        .into_iter()
        .map(|n| {
            let mag_sq = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
            if mag_sq > 1e-12 {
                let mag = mag_sq.sqrt();
                [n[0] / mag, n[1] / mag, n[2] / mag]
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[inline]
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
