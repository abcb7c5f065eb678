// src/terrain/decoration.rs
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::terrain::error::{TerrainError, TerrainResult};

/// Decorations placed on a tile: 4 or 5.
pub const DECORATION_COUNT_RANGE: std::ops::Range<usize> = 4..6;
pub const DECORATION_SCALE: f32 = 3.0;
/// Rocks sink slightly into the ground.
pub const GROUND_FLUSH_OFFSET: f32 = -0.1;
pub const RAISED_OFFSET: f32 = 1.0;
pub const GROUND_FLUSH_TAG: &str = "rock";
/// Sample point draws per placement before accepting an overlap.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 16;

fn default_footprint() -> f32 { 1.0 }

/// One entry of the decoration catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationDescriptor {
    /// Opaque handle the renderer instantiates (a scene path for Godot).
    pub handle: String,
    #[serde(default)]
    pub tag: String,
    /// Horizontal footprint radius in world units. Placements on one tile
    /// try to keep their footprints from overlapping.
    #[serde(default = "default_footprint")]
    pub footprint: f32,
}

impl DecorationDescriptor {
    pub fn new(handle: impl Into<String>, tag: impl Into<String>) -> Self {
        DecorationDescriptor {
            handle: handle.into(),
            tag: tag.into(),
            footprint: default_footprint(),
        }
    }

    pub fn is_ground_flush(&self) -> bool {
        self.tag.eq_ignore_ascii_case(GROUND_FLUSH_TAG)
    }

    pub fn vertical_offset(&self) -> f32 {
        if self.is_ground_flush() { GROUND_FLUSH_OFFSET } else { RAISED_OFFSET }
    }
}

/// Ordered list of decorations available for scattering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationCatalog {
    entries: Vec<DecorationDescriptor>,
}

impl DecorationCatalog {
    pub fn new(entries: Vec<DecorationDescriptor>) -> Self {
        DecorationCatalog { entries }
    }

    pub fn entries(&self) -> &[DecorationDescriptor] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&DecorationDescriptor> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A decoration to instantiate under a tile, in tile-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationPlacement {
    pub catalog_index: usize,
    pub handle: String,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

/// Scatters catalog entries over tile sample points.
///
/// The random source is injected so tests (and replays) can fix the seed.
#[derive(Debug)]
pub struct DecorationScatterer<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl DecorationScatterer<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        DecorationScatterer { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        DecorationScatterer { rng: ChaCha8Rng::from_rng(&mut rand::rng()) }
    }
}

impl<R: Rng> DecorationScatterer<R> {
    pub fn with_rng(rng: R) -> Self {
        DecorationScatterer { rng }
    }

    pub fn scatter(
        &mut self,
        sample_points: &[[f32; 3]],
        catalog: &DecorationCatalog,
    ) -> TerrainResult<Vec<DecorationPlacement>> {
        if catalog.is_empty() {
            return Err(TerrainError::EmptyCatalog);
        }
        if sample_points.is_empty() {
            return Err(TerrainError::EmptySamplePoints { position: None });
        }

        let count = self.rng.random_range(DECORATION_COUNT_RANGE);
        let mut placements = Vec::with_capacity(count);
        let mut footprints: Vec<f32> = Vec::with_capacity(count);
        for _ in 0..count {
            let catalog_index = self.rng.random_range(0..catalog.len());
            let descriptor = &catalog.entries()[catalog_index];
            let point = self.pick_point(sample_points, descriptor.footprint, &placements, &footprints);

            footprints.push(descriptor.footprint);
            placements.push(DecorationPlacement {
                catalog_index,
                handle: descriptor.handle.clone(),
                position: [point[0], point[1] + descriptor.vertical_offset(), point[2]],
                scale: [DECORATION_SCALE; 3],
            });
        }
        Ok(placements)
    }

    // Draws sample points until one clears every placed footprint. The last
    // draw is used when none does, so the count never drops.
    fn pick_point(
        &mut self,
        sample_points: &[[f32; 3]],
        footprint: f32,
        placed: &[DecorationPlacement],
        placed_footprints: &[f32],
    ) -> [f32; 3] {
        let mut point = sample_points[self.rng.random_range(0..sample_points.len())];
        for _ in 1..MAX_PLACEMENT_ATTEMPTS {
            let clear = placed.iter().zip(placed_footprints).all(|(other, other_footprint)| {
                horizontal_distance(point, other.position) >= footprint + other_footprint
            });
            if clear {
                break;
            }
            point = sample_points[self.rng.random_range(0..sample_points.len())];
        }
        point
    }
}

fn horizontal_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let (dx, dz) = (a[0] - b[0], a[2] - b[2]);
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> DecorationCatalog {
        DecorationCatalog::new(vec![
            DecorationDescriptor::new("res://props/rock.tscn", "rock"),
            DecorationDescriptor::new("res://props/tree.tscn", "tree"),
            DecorationDescriptor::new("res://props/bush.tscn", ""),
        ])
    }

    fn samples() -> Vec<[f32; 3]> {
        (0..25)
            .map(|i| [(i % 5) as f32 - 2.0, i as f32 * 0.25, (i / 5) as f32 - 2.0])
            .collect()
    }

    #[test]
    fn test_scatter_places_four_or_five() {
        let mut scatterer = DecorationScatterer::seeded(1);
        let points = samples();
        for _ in 0..200 {
            let placed = scatterer.scatter(&points, &catalog()).unwrap();
            assert!((4..=5).contains(&placed.len()), "placed {}", placed.len());
        }
    }

    #[test]
    fn test_both_counts_occur() {
        let mut scatterer = DecorationScatterer::seeded(99);
        let points = samples();
        let counts: Vec<usize> = (0..200)
            .map(|_| scatterer.scatter(&points, &catalog()).unwrap().len())
            .collect();
        assert!(counts.contains(&4));
        assert!(counts.contains(&5));
    }

    #[test]
    fn test_placements_sit_on_sample_points() {
        let mut scatterer = DecorationScatterer::seeded(7);
        let points = samples();
        let catalog = catalog();
        for _ in 0..50 {
            for placement in scatterer.scatter(&points, &catalog).unwrap() {
                let descriptor = catalog.get(placement.catalog_index).unwrap();
                assert_eq!(placement.handle, descriptor.handle);
                let source = points
                    .iter()
                    .find(|p| p[0] == placement.position[0] && p[2] == placement.position[2])
                    .expect("placement off the sample grid");
                let expected_y = source[1] + descriptor.vertical_offset();
                assert!((placement.position[1] - expected_y).abs() < 1e-6);
                assert_eq!(placement.scale, [3.0, 3.0, 3.0]);
            }
        }
    }

    #[test]
    fn test_footprints_do_not_overlap() {
        let catalog = DecorationCatalog::new(vec![DecorationDescriptor {
            handle: "res://props/tree.tscn".to_string(),
            tag: "tree".to_string(),
            footprint: 1.0,
        }]);
        // 21 x 21 grid with unit spacing
        let points: Vec<[f32; 3]> = (0..441)
            .map(|i| [(i % 21) as f32 - 10.0, 0.0, (i / 21) as f32 - 10.0])
            .collect();
        let mut scatterer = DecorationScatterer::seeded(17);
        for _ in 0..50 {
            let placed = scatterer.scatter(&points, &catalog).unwrap();
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    assert!(horizontal_distance(a.position, b.position) >= 2.0);
                }
            }
        }
    }

    #[test]
    fn test_crowded_tile_still_places_four_or_five() {
        let catalog = DecorationCatalog::new(vec![DecorationDescriptor {
            handle: "res://props/boulder.tscn".to_string(),
            tag: "rock".to_string(),
            footprint: 50.0,
        }]);
        let mut scatterer = DecorationScatterer::seeded(4);
        let placed = scatterer.scatter(&samples(), &catalog).unwrap();
        assert!((4..=5).contains(&placed.len()));
    }

    #[test]
    fn test_rock_tag_is_ground_flush() {
        assert_eq!(DecorationDescriptor::new("a", "rock").vertical_offset(), -0.1);
        assert_eq!(DecorationDescriptor::new("a", "Rock").vertical_offset(), -0.1);
        assert_eq!(DecorationDescriptor::new("a", "tree").vertical_offset(), 1.0);
        assert_eq!(DecorationDescriptor::new("a", "").vertical_offset(), 1.0);
    }

    #[test]
    fn test_same_seed_same_placements() {
        let points = samples();
        let a = DecorationScatterer::seeded(42).scatter(&points, &catalog()).unwrap();
        let b = DecorationScatterer::seeded(42).scatter(&points, &catalog()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        let mut scatterer = DecorationScatterer::seeded(3);
        assert_eq!(
            scatterer.scatter(&samples(), &DecorationCatalog::default()),
            Err(TerrainError::EmptyCatalog)
        );
        assert_eq!(
            scatterer.scatter(&[], &catalog()),
            Err(TerrainError::EmptySamplePoints { position: None })
        );
    }
}
