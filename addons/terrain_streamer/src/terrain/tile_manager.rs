// src/terrain/tile_manager.rs
use std::collections::BTreeMap;

use lru::LruCache;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::terrain::decoration::{DecorationPlacement, DecorationScatterer};
use crate::terrain::error::{ConfigResult, TerrainError, TerrainResult};
use crate::terrain::noise::NoiseField;
use crate::terrain::terrain_config::{RingRadius, TerrainConfig, TerrainSize, ViewDistance};
use crate::terrain::tile::{Tile, TilePosition, TileState};
use crate::threading::TileBuildPool;

/// Square of tile coordinates required around the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    center: TilePosition,
    half_width: i32,
}

impl TileWindow {
    /// Window centered on the tile under `observer`. The center is
    /// `observer / size` rounded half-to-even on x and z.
    pub fn around(observer: [f32; 3], size: TerrainSize, ring: RingRadius) -> TerrainResult<Self> {
        let out_of_range = || TerrainError::ObserverOutOfRange { x: observer[0], z: observer[2] };
        if !observer.iter().all(|v| v.is_finite()) {
            return Err(out_of_range());
        }

        let half_width = ring.half_width();
        let size = size.get() as f64;
        let to_cell = |v: f32| -> Option<i32> {
            let cell = (v as f64 / size).round_ties_even();
            let fits = cell - half_width as f64 >= i32::MIN as f64
                && cell + half_width as f64 <= i32::MAX as f64;
            fits.then_some(cell as i32)
        };

        match (to_cell(observer[0]), to_cell(observer[2])) {
            (Some(x), Some(z)) => Ok(TileWindow { center: TilePosition::new(x, z), half_width }),
            _ => Err(out_of_range()),
        }
    }

    pub fn center(&self) -> TilePosition {
        self.center
    }

    pub fn width(&self) -> u32 {
        (2 * self.half_width + 1) as u32
    }

    /// Window coordinates, x offset outer and z offset inner.
    pub fn positions(&self) -> impl Iterator<Item = TilePosition> {
        let (center, half) = (self.center, self.half_width);
        (-half..=half)
            .flat_map(move |dx| (-half..=half).map(move |dz| TilePosition::new(center.x + dx, center.z + dz)))
    }

    pub fn contains(&self, position: TilePosition) -> bool {
        (position.x - self.center.x).abs() <= self.half_width
            && (position.z - self.center.z).abs() <= self.half_width
    }
}

/// Something that happened to a tile during one tick, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum TileEvent {
    Created { position: TilePosition, active: bool },
    Activated(TilePosition),
    Deactivated(TilePosition),
    Evicted(TilePosition),
    Decorated { position: TilePosition, placements: Vec<DecorationPlacement> },
    DecorationsSkipped { position: TilePosition, reason: TerrainError },
}

impl TileEvent {
    pub fn position(&self) -> TilePosition {
        match self {
            TileEvent::Created { position, .. }
            | TileEvent::Decorated { position, .. }
            | TileEvent::DecorationsSkipped { position, .. } => *position,
            TileEvent::Activated(position)
            | TileEvent::Deactivated(position)
            | TileEvent::Evicted(position) => *position,
        }
    }
}

/// Events of one tick, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<TileEvent>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn positions_where(&self, pred: impl Fn(&TileEvent) -> bool) -> Vec<TilePosition> {
        self.events.iter().filter(|e| pred(e)).map(TileEvent::position).collect()
    }

    pub fn created(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::Created { .. }))
    }

    pub fn activated(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::Activated(_)))
    }

    pub fn deactivated(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::Deactivated(_)))
    }

    pub fn evicted(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::Evicted(_)))
    }

    pub fn decorated(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::Decorated { .. }))
    }

    pub fn decorations_skipped(&self) -> Vec<TilePosition> {
        self.positions_where(|e| matches!(e, TileEvent::DecorationsSkipped { .. }))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainStats {
    pub tick: u64,
    pub active: usize,
    pub inactive: usize,
    pub tiles_built: u64,
    pub tiles_evicted: u64,
}

/// Keeps the tiles around a moving observer.
///
/// Every known coordinate maps to exactly one `Tile`; its state says whether
/// it is active. Tiles are only created, switched and evicted inside `tick`.
pub struct TileManager<R: Rng = ChaCha8Rng> {
    config: TerrainConfig,
    noise: NoiseField,
    tiles: BTreeMap<TilePosition, Tile>,
    // Inactive tiles, least recently deactivated last
    inactive_order: LruCache<TilePosition, ()>,
    scatterer: DecorationScatterer<R>,
    pool: Option<TileBuildPool>,
    tick: u64,
    tiles_built: u64,
    tiles_evicted: u64,
}

impl TileManager<ChaCha8Rng> {
    pub fn new(config: TerrainConfig) -> ConfigResult<Self> {
        let scatterer = match config.decoration_seed {
            Some(seed) => DecorationScatterer::seeded(seed),
            None => DecorationScatterer::from_entropy(),
        };
        Self::with_scatterer(config, scatterer)
    }
}

impl<R: Rng> TileManager<R> {
    pub fn with_rng(config: TerrainConfig, rng: R) -> ConfigResult<Self> {
        Self::with_scatterer(config, DecorationScatterer::with_rng(rng))
    }

    fn with_scatterer(config: TerrainConfig, scatterer: DecorationScatterer<R>) -> ConfigResult<Self> {
        let noise = NoiseField::new(config.noise.clone())?;
        let pool = if config.use_parallel_processing {
            Some(TileBuildPool::new(config.max_threads)?)
        } else {
            None
        };

        log::info!(
            "TileManager: size {}, ring {}, view distance {}, parallel {}",
            config.terrain_size.get(),
            config.ring_radius.get(),
            config.view_distance.get(),
            pool.is_some()
        );

        Ok(TileManager {
            config,
            noise,
            tiles: BTreeMap::new(),
            inactive_order: LruCache::unbounded(),
            scatterer,
            pool,
            tick: 0,
            tiles_built: 0,
            tiles_evicted: 0,
        })
    }

    /// Ticks with the configured ring radius and view distance.
    pub fn update(&mut self, observer: [f32; 3]) -> TerrainResult<TickReport> {
        self.tick(observer, self.config.ring_radius, self.config.view_distance)
    }

    /// Brings the tile set in line with `observer`.
    ///
    /// Existing tiles are switched by distance first, then the missing window
    /// coordinates are built. An invalid observer is rejected before anything
    /// changes.
    pub fn tick(
        &mut self,
        observer: [f32; 3],
        ring_radius: RingRadius,
        view_distance: ViewDistance,
    ) -> TerrainResult<TickReport> {
        let window = TileWindow::around(observer, self.config.terrain_size, ring_radius)?;
        let missing: Vec<TilePosition> = window
            .positions()
            .filter(|position| !self.tiles.contains_key(position))
            .collect();
        let built = self.build_tiles(&missing)?;

        self.tick += 1;
        let tick = self.tick;
        let mut events = Vec::new();

        // --- Deactivate ---
        for (position, tile) in self.tiles.iter_mut() {
            if tile.is_active() && !tile.in_view(observer, view_distance) {
                tile.set_state(TileState::Inactive, tick);
                self.inactive_order.put(*position, ());
                events.push(TileEvent::Deactivated(*position));
            }
        }

        // --- Reactivate ---
        for (position, tile) in self.tiles.iter_mut() {
            if !tile.is_active() && tile.in_view(observer, view_distance) {
                tile.set_state(TileState::Active, tick);
                self.inactive_order.pop(position);
                events.push(TileEvent::Activated(*position));
            }
        }

        // --- Create ---
        for mut tile in built {
            let position = tile.position();
            let active = tile.in_view(observer, view_distance);
            self.tiles_built += 1;
            log::debug!("TileManager: created tile {:?} (active: {})", position, active);
            events.push(TileEvent::Created { position, active });

            if active {
                tile.set_state(TileState::Active, tick);
                events.push(self.decorate(&tile));
            } else {
                self.inactive_order.put(position, ());
            }
            self.tiles.insert(position, tile);
        }

        self.evict_outside(&window, &mut events);

        let report = TickReport { tick, events };
        if !report.is_empty() {
            log::info!(
                "TileManager: tick {} created {}, activated {}, deactivated {}, evicted {} ({} tiles known)",
                tick,
                report.created().len(),
                report.activated().len(),
                report.deactivated().len(),
                report.evicted().len(),
                self.tiles.len()
            );
        }
        Ok(report)
    }

    fn build_tiles(&self, missing: &[TilePosition]) -> TerrainResult<Vec<Tile>> {
        let size = self.config.terrain_size.get();
        let noise = &self.noise;
        let results: Vec<TerrainResult<Tile>> = match &self.pool {
            Some(pool) if missing.len() > 1 => {
                pool.build_all(missing, |position| Tile::build(*position, size, noise))
            }
            _ => missing.iter().map(|position| Tile::build(*position, size, noise)).collect(),
        };
        results.into_iter().collect()
    }

    fn decorate(&mut self, tile: &Tile) -> TileEvent {
        let position = tile.position();
        match self.scatterer.scatter(tile.sample_points(), &self.config.decorations) {
            Ok(placements) => TileEvent::Decorated { position, placements },
            Err(err) => {
                let reason = match err {
                    TerrainError::EmptySamplePoints { .. } => {
                        TerrainError::EmptySamplePoints { position: Some(position) }
                    }
                    other => other,
                };
                log::warn!("TileManager: skipped decorations for tile {:?}: {}", position, reason);
                TileEvent::DecorationsSkipped { position, reason }
            }
        }
    }

    // Drops the least recently deactivated tiles outside the window until
    // the inactive count is back under the cap.
    fn evict_outside(&mut self, window: &TileWindow, events: &mut Vec<TileEvent>) {
        let Some(limit) = self.config.max_inactive_tiles else {
            return;
        };
        let excess = self.inactive_order.len().saturating_sub(limit);
        if excess == 0 {
            return;
        }

        let victims: Vec<TilePosition> = self
            .inactive_order
            .iter()
            .rev()
            .map(|(position, _)| *position)
            .filter(|position| !window.contains(*position))
            .take(excess)
            .collect();

        for position in victims {
            self.inactive_order.pop(&position);
            self.tiles.remove(&position);
            self.tiles_evicted += 1;
            log::debug!("TileManager: evicted tile {:?}", position);
            events.push(TileEvent::Evicted(position));
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn tile(&self, position: TilePosition) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn active_positions(&self) -> Vec<TilePosition> {
        self.tiles.values().filter(|t| t.is_active()).map(Tile::position).collect()
    }

    pub fn inactive_positions(&self) -> Vec<TilePosition> {
        self.tiles.values().filter(|t| !t.is_active()).map(Tile::position).collect()
    }

    pub fn tiles_built(&self) -> u64 {
        self.tiles_built
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> TerrainStats {
        let active = self.tiles.values().filter(|t| t.is_active()).count();
        TerrainStats {
            tick: self.tick,
            active,
            inactive: self.tiles.len() - active,
            tiles_built: self.tiles_built,
            tiles_evicted: self.tiles_evicted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::decoration::{DecorationCatalog, DecorationDescriptor};
    use crate::terrain::noise::NoiseParameters;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn catalog() -> DecorationCatalog {
        DecorationCatalog::new(vec![
            DecorationDescriptor::new("res://props/rock.tscn", "rock"),
            DecorationDescriptor::new("res://props/tree.tscn", "tree"),
        ])
    }

    fn config(size: u32, ring: u32, view: f32) -> TerrainConfig {
        TerrainConfig::new(size, ring, view, NoiseParameters::default())
            .unwrap()
            .with_decorations(catalog())
            .with_decoration_seed(5)
    }

    fn manager(config: TerrainConfig) -> TileManager {
        TileManager::new(config).unwrap()
    }

    fn set(positions: Vec<TilePosition>) -> BTreeSet<TilePosition> {
        positions.into_iter().collect()
    }

    fn square(cx: i32, cz: i32) -> BTreeSet<TilePosition> {
        (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dz| TilePosition::new(cx + dx, cz + dz)))
            .collect()
    }

    #[test]
    fn test_window_rounds_half_to_even() {
        let size = TerrainSize::new(100).unwrap();
        let ring = RingRadius::new(2).unwrap();
        let center = |x: f32, z: f32| TileWindow::around([x, 0.0, z], size, ring).unwrap().center();
        assert_eq!(center(0.0, 0.0), TilePosition::new(0, 0));
        assert_eq!(center(150.0, -150.0), TilePosition::new(2, -2));
        assert_eq!(center(250.0, 50.0), TilePosition::new(2, 0));
        assert_eq!(center(249.0, 51.0), TilePosition::new(2, 1));
    }

    #[test]
    fn test_window_visits_x_outer_z_inner() {
        let window = TileWindow::around(
            [0.0, 0.0, 0.0],
            TerrainSize::new(10).unwrap(),
            RingRadius::new(2).unwrap(),
        )
        .unwrap();
        let positions: Vec<TilePosition> = window.positions().collect();
        assert_eq!(window.width(), 3);
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], TilePosition::new(-1, -1));
        assert_eq!(positions[1], TilePosition::new(-1, 0));
        assert_eq!(positions[3], TilePosition::new(0, -1));
        assert!(window.contains(TilePosition::new(1, 1)));
        assert!(!window.contains(TilePosition::new(2, 0)));
    }

    #[test]
    fn test_origin_then_far_scenario() {
        let mut manager = manager(config(100, 2, 200.0));

        let first = manager.update([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(set(first.created()), square(0, 0));
        assert_eq!(set(manager.active_positions()), square(0, 0));
        assert!(manager.inactive_positions().is_empty());
        assert_eq!(first.decorated().len(), 9);

        let second = manager.update([1000.0, 0.0, 0.0]).unwrap();
        assert_eq!(set(second.deactivated()), square(0, 0));
        assert_eq!(set(second.created()), square(10, 0));
        assert_eq!(set(manager.active_positions()), square(10, 0));
        assert_eq!(set(manager.inactive_positions()), square(0, 0));
        assert_eq!(manager.tile_count(), 18);
    }

    #[test]
    fn test_deactivation_precedes_creation_in_report() {
        let mut manager = manager(config(100, 2, 200.0));
        manager.update([0.0, 0.0, 0.0]).unwrap();
        let report = manager.update([1000.0, 0.0, 0.0]).unwrap();
        let first_created = report
            .events
            .iter()
            .position(|e| matches!(e, TileEvent::Created { .. }))
            .unwrap();
        assert!(report.events[..first_created]
            .iter()
            .all(|e| matches!(e, TileEvent::Deactivated(_))));
        assert_eq!(report.created()[0], TilePosition::new(9, -1));
    }

    #[test]
    fn test_window_always_covered() {
        let mut manager = manager(config(16, 3, 40.0));
        let size = manager.config().terrain_size;
        let ring = manager.config().ring_radius;
        for step in 0..40 {
            let observer = [step as f32 * 7.5, 0.0, (step as f32 * 0.3).sin() * 60.0];
            manager.update(observer).unwrap();
            let window = TileWindow::around(observer, size, ring).unwrap();
            for position in window.positions() {
                assert!(manager.tile(position).is_some(), "{position:?} missing at step {step}");
            }
            let active = set(manager.active_positions());
            let inactive = set(manager.inactive_positions());
            assert!(active.is_disjoint(&inactive));
            assert_eq!(active.len() + inactive.len(), manager.tile_count());
        }
    }

    #[test]
    fn test_tiles_are_built_once() {
        let mut manager = manager(config(8, 2, 20.0));
        manager.update([0.0, 0.0, 0.0]).unwrap();
        let geometry = manager.tile(TilePosition::new(0, 0)).unwrap().geometry_handle();
        assert_eq!(manager.tiles_built(), 9);

        for _ in 0..5 {
            let report = manager.update([1.0, 0.0, -1.0]).unwrap();
            assert!(report.created().is_empty());
        }
        let again = manager.tile(TilePosition::new(0, 0)).unwrap().geometry_handle();
        assert!(Arc::ptr_eq(&geometry, &again));
        assert_eq!(manager.tiles_built(), 9);
    }

    #[test]
    fn test_returning_reactivates_without_rebuilding() {
        let mut manager = manager(config(100, 2, 200.0));
        manager.update([0.0, 0.0, 0.0]).unwrap();
        let geometry = manager.tile(TilePosition::new(1, 1)).unwrap().geometry_handle();
        manager.update([1000.0, 0.0, 0.0]).unwrap();

        let back = manager.update([0.0, 0.0, 0.0]).unwrap();
        assert!(back.created().is_empty());
        assert!(back.decorated().is_empty());
        assert_eq!(set(back.activated()), square(0, 0));
        assert_eq!(set(back.deactivated()), square(10, 0));
        assert_eq!(manager.tiles_built(), 18);

        let tile = manager.tile(TilePosition::new(1, 1)).unwrap();
        assert!(Arc::ptr_eq(&geometry, &tile.geometry_handle()));
        assert_eq!(tile.last_active_tick(), Some(3));
    }

    #[test]
    fn test_decorations_only_for_new_active_tiles() {
        // View distance smaller than the distance to neighbour tiles
        let mut manager = manager(config(100, 2, 10.0));
        let first = manager.update([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(first.decorated(), vec![TilePosition::new(0, 0)]);
        assert_eq!(manager.active_positions(), vec![TilePosition::new(0, 0)]);
        assert!(first
            .events
            .contains(&TileEvent::Created { position: TilePosition::new(1, 0), active: false }));

        // (1, 0) existed already, so activating it does not decorate it
        let second = manager.update([100.0, 0.0, 0.0]).unwrap();
        assert!(second.activated().contains(&TilePosition::new(1, 0)));
        assert!(!second.decorated().contains(&TilePosition::new(1, 0)));
        assert!(second.decorated().iter().all(|p| second.created().contains(p)));
    }

    #[test]
    fn test_each_tile_decorated_at_most_once() {
        let mut manager = manager(config(16, 2, 30.0));
        let mut decorated = Vec::new();
        for step in 0..30 {
            let x = (step as f32 * 0.5).sin() * 80.0;
            let report = manager.update([x, 0.0, step as f32 * 4.0]).unwrap();
            decorated.extend(report.decorated());
        }
        let unique: BTreeSet<TilePosition> = decorated.iter().copied().collect();
        assert_eq!(unique.len(), decorated.len());
    }

    #[test]
    fn test_decoration_placements_in_bounds() {
        let mut manager = manager(config(8, 2, 20.0));
        let report = manager.update([0.0, 0.0, 0.0]).unwrap();
        for event in &report.events {
            if let TileEvent::Decorated { placements, .. } = event {
                assert!((4..=5).contains(&placements.len()));
                for placement in placements {
                    assert!(placement.position[0].abs() <= 4.0);
                    assert!(placement.position[2].abs() <= 4.0);
                }
            }
        }
    }

    #[test]
    fn test_empty_catalog_skips_but_activates() {
        let config = TerrainConfig::new(8, 2, 20.0, NoiseParameters::default()).unwrap();
        let mut manager = manager(config);
        let report = manager.update([0.0, 0.0, 0.0]).unwrap();
        assert!(report.decorated().is_empty());
        assert_eq!(set(report.decorations_skipped()), square(0, 0));
        assert_eq!(manager.active_positions().len(), 9);
        assert!(report.events.iter().any(|e| matches!(
            e,
            TileEvent::DecorationsSkipped { reason: TerrainError::EmptyCatalog, .. }
        )));
    }

    #[test]
    fn test_ring_one_is_single_tile() {
        let mut manager = manager(config(100, 1, 200.0));
        let report = manager.update([40.0, 0.0, -40.0]).unwrap();
        assert_eq!(report.created(), vec![TilePosition::new(0, 0)]);
        assert_eq!(manager.tile_count(), 1);
    }

    #[test]
    fn test_tick_overrides_configured_radius() {
        let mut manager = manager(config(10, 2, 50.0));
        let report = manager
            .tick([0.0, 0.0, 0.0], RingRadius::new(3).unwrap(), ViewDistance::new(50.0).unwrap())
            .unwrap();
        assert_eq!(report.created().len(), 25);
    }

    #[test]
    fn test_invalid_observer_changes_nothing() {
        let mut manager = manager(config(8, 2, 20.0));
        for observer in [
            [f32::NAN, 0.0, 0.0],
            [0.0, f32::INFINITY, 0.0],
            [1.0e12, 0.0, 0.0],
        ] {
            assert!(matches!(
                manager.update(observer),
                Err(TerrainError::ObserverOutOfRange { .. })
            ));
        }
        assert_eq!(manager.tile_count(), 0);
        assert_eq!(manager.current_tick(), 0);
    }

    #[test]
    fn test_eviction_drops_oldest_outside_window() {
        let config = config(100, 2, 200.0).with_max_inactive_tiles(4);
        let mut manager = manager(config);
        manager.update([0.0, 0.0, 0.0]).unwrap();
        let report = manager.update([1000.0, 0.0, 0.0]).unwrap();

        // Deactivated in key order, so the lowest keys are the oldest
        assert_eq!(
            report.evicted(),
            vec![
                TilePosition::new(-1, -1),
                TilePosition::new(-1, 0),
                TilePosition::new(-1, 1),
                TilePosition::new(0, -1),
                TilePosition::new(0, 0),
            ]
        );
        assert_eq!(
            manager.inactive_positions(),
            vec![
                TilePosition::new(0, 1),
                TilePosition::new(1, -1),
                TilePosition::new(1, 0),
                TilePosition::new(1, 1),
            ]
        );
        assert_eq!(manager.stats().tiles_evicted, 5);
    }

    #[test]
    fn test_evicted_tile_is_rebuilt_and_redecorated() {
        let config = config(100, 2, 200.0).with_max_inactive_tiles(0);
        let mut manager = manager(config);
        manager.update([0.0, 0.0, 0.0]).unwrap();
        let far = manager.update([1000.0, 0.0, 0.0]).unwrap();
        assert_eq!(set(far.evicted()), square(0, 0));
        assert_eq!(manager.tile_count(), 9);

        let back = manager.update([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(set(back.created()), square(0, 0));
        assert_eq!(set(back.decorated()), square(0, 0));
        assert_eq!(set(back.evicted()), square(10, 0));
        assert_eq!(manager.tiles_built(), 27);
    }

    #[test]
    fn test_inactive_tiles_inside_window_are_kept() {
        // Tiny view distance: most window tiles are inactive but must stay
        let config = config(100, 2, 10.0).with_max_inactive_tiles(0);
        let mut manager = manager(config);
        manager.update([0.0, 0.0, 0.0]).unwrap();
        assert_eq!(manager.tile_count(), 9);
        assert_eq!(manager.inactive_positions().len(), 8);
    }

    #[test]
    fn test_stats() {
        let mut manager = manager(config(100, 2, 200.0));
        manager.update([0.0, 0.0, 0.0]).unwrap();
        manager.update([1000.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            manager.stats(),
            TerrainStats { tick: 2, active: 9, inactive: 9, tiles_built: 18, tiles_evicted: 0 }
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let trajectory = [[0.0, 0.0, 0.0], [35.0, 0.0, 10.0], [80.0, 0.0, -45.0], [0.0, 0.0, 0.0]];
        let mut sequential = manager(config(16, 3, 30.0));
        let mut parallel = manager(config(16, 3, 30.0).with_parallel_processing(3));

        for observer in trajectory {
            let a = sequential.update(observer).unwrap();
            let b = parallel.update(observer).unwrap();
            assert_eq!(a, b);
        }
        for (left, right) in sequential.tiles().zip(parallel.tiles()) {
            assert_eq!(left.position(), right.position());
            assert_eq!(left.state(), right.state());
            assert_eq!(left.geometry(), right.geometry());
        }
    }

    #[test]
    fn test_injected_rng_is_deterministic() {
        let run = || {
            let config = TerrainConfig::new(8, 2, 20.0, NoiseParameters::default())
                .unwrap()
                .with_decorations(catalog());
            let mut manager = TileManager::with_rng(config, ChaCha8Rng::seed_from_u64(77)).unwrap();
            manager.update([0.0, 0.0, 0.0]).unwrap()
        };
        assert_eq!(run(), run());
    }
}
