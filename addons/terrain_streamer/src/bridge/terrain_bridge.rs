// File: src/bridge/terrain_bridge.rs

use godot::classes::mesh::{ArrayType, PrimitiveType};
use godot::classes::node::ProcessMode;
use godot::classes::{
    ArrayMesh, INode3D, Material, Mesh, MeshInstance3D, Node3D, PackedScene, ProjectSettings, ResourceLoader,
    StandardMaterial3D, SurfaceTool,
};
use godot::prelude::*;
use log::LevelFilter;
use std::collections::HashMap;

use crate::config::ConfigurationManager;
use crate::terrain::{
    DecorationPlacement, MeshGeometry, TerrainConfig, TickReport, TileEvent, TileManager, TilePosition,
};
use crate::terrain::error::ConfigResult;
use crate::utils::error_logger::{get_error_history, GodotLogger};

const DEFAULT_CONFIG_PATH: &str = "res://addons/terrain_streamer/terrain_config.toml";

/// Streams terrain tiles around `observer` and keeps one mesh node per tile.
#[derive(GodotClass)]
#[class(base=Node3D)]
pub struct TerrainStreamer {
    base: Base<Node3D>,

    #[export]
    config_path: GString,
    #[export]
    observer: Option<Gd<Node3D>>,

    manager: Option<TileManager>,
    terrain_material: Option<Gd<Material>>,
    tile_nodes: HashMap<TilePosition, Gd<MeshInstance3D>>,
    // Failed loads are cached as None so they warn once
    scene_cache: HashMap<String, Option<Gd<PackedScene>>>,
}

#[godot_api]
impl INode3D for TerrainStreamer {
    fn init(base: Base<Node3D>) -> Self {
        Self {
            base,
            config_path: DEFAULT_CONFIG_PATH.into(),
            observer: None,
            manager: None,
            terrain_material: None,
            tile_nodes: HashMap::new(),
            scene_cache: HashMap::new(),
        }
    }

    fn ready(&mut self) {
        GodotLogger::install(LevelFilter::Info);

        match self.create_manager() {
            Ok(manager) => {
                self.manager = Some(manager);
                log::info!("TerrainStreamer: ready");
            }
            Err(e) => {
                log::error!("TerrainStreamer: invalid terrain configuration, streaming disabled: {}", e);
            }
        }

        if self.observer.is_none() {
            log::warn!("TerrainStreamer: no observer assigned");
        }
    }

    fn process(&mut self, _delta: f64) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };
        let position = observer.get_global_position();
        let Some(manager) = self.manager.as_mut() else {
            return;
        };

        match manager.update([position.x, position.y, position.z]) {
            Ok(report) => self.apply_report(report),
            Err(e) => log::warn!("TerrainStreamer: tick skipped: {}", e),
        }
    }
}

#[godot_api]
impl TerrainStreamer {
    #[func]
    pub fn is_streaming(&self) -> bool {
        self.manager.is_some()
    }

    #[func]
    pub fn get_terrain_stats(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        if let Some(manager) = &self.manager {
            let stats = manager.stats();
            dict.set("tick", stats.tick as i64);
            dict.set("active_tiles", stats.active as i64);
            dict.set("inactive_tiles", stats.inactive as i64);
            dict.set("tiles_built", stats.tiles_built as i64);
            dict.set("tiles_evicted", stats.tiles_evicted as i64);
        }
        dict.set("tile_nodes", self.tile_nodes.len() as i64);
        dict
    }

    #[func]
    pub fn get_error_history(&self) -> PackedStringArray {
        get_error_history().into_iter().map(|s| GString::from(s.as_str())).collect()
    }

    fn create_manager(&mut self) -> ConfigResult<TileManager> {
        let path = ProjectSettings::singleton().globalize_path(&self.config_path).to_string();
        let config = ConfigurationManager::load_from_file(&path)?.terrain_config()?;
        Self::log_config(&config);
        self.terrain_material = Some(create_terrain_material(&config));
        TileManager::new(config)
    }

    fn log_config(config: &TerrainConfig) {
        log::info!(
            "TerrainStreamer: {} decorations, eviction cap {:?}",
            config.decorations.len(),
            config.max_inactive_tiles
        );
    }

    fn apply_report(&mut self, report: TickReport) {
        for event in report.events {
            match event {
                TileEvent::Created { position, active } => self.spawn_tile(position, active),
                TileEvent::Activated(position) => self.set_tile_active(position, true),
                TileEvent::Deactivated(position) => self.set_tile_active(position, false),
                TileEvent::Evicted(position) => {
                    if let Some(mut node) = self.tile_nodes.remove(&position) {
                        node.queue_free();
                    }
                }
                TileEvent::Decorated { position, placements } => {
                    self.spawn_decorations(position, &placements)
                }
                // Already logged by the manager
                TileEvent::DecorationsSkipped { .. } => {}
            }
        }
    }

    fn spawn_tile(&mut self, position: TilePosition, active: bool) {
        let Some(tile) = self.manager.as_ref().and_then(|m| m.tile(position)) else {
            return;
        };
        let center = tile.center();
        let mut mesh = build_array_mesh(tile.geometry());
        if let Some(material) = &self.terrain_material {
            mesh.surface_set_material(0, material);
        }

        let mut node = MeshInstance3D::new_alloc();
        node.set_mesh(&mesh.upcast::<Mesh>());
        node.set_position(Vector3::new(center[0], 0.0, center[1]));
        let name = format!("Tile_{}_{}", position.x, position.z);
        node.set_name(&StringName::from(name.as_str()));

        self.base_mut().add_child(&node.clone().upcast::<Node>());
        node.create_trimesh_collision();

        self.tile_nodes.insert(position, node);
        self.set_tile_active(position, active);
    }

    // Hidden tiles also leave the physics world
    fn set_tile_active(&mut self, position: TilePosition, active: bool) {
        if let Some(node) = self.tile_nodes.get_mut(&position) {
            node.set_visible(active);
            node.set_process_mode(if active { ProcessMode::INHERIT } else { ProcessMode::DISABLED });
        }
    }

    fn spawn_decorations(&mut self, position: TilePosition, placements: &[DecorationPlacement]) {
        let Some(mut parent) = self.tile_nodes.get(&position).cloned() else {
            return;
        };
        for placement in placements {
            let Some(scene) = self.load_scene(&placement.handle) else {
                continue;
            };
            let Some(instance) = scene.instantiate() else {
                log::warn!("TerrainStreamer: could not instantiate {}", placement.handle);
                continue;
            };
            match instance.try_cast::<Node3D>() {
                Ok(mut decoration) => {
                    let [x, y, z] = placement.position;
                    let [sx, sy, sz] = placement.scale;
                    decoration.set_position(Vector3::new(x, y, z));
                    decoration.set_scale(Vector3::new(sx, sy, sz));
                    parent.add_child(&decoration.upcast::<Node>());
                }
                Err(mut other) => {
                    log::warn!("TerrainStreamer: {} is not a Node3D scene", placement.handle);
                    other.queue_free();
                }
            }
        }
    }

    fn load_scene(&mut self, handle: &str) -> Option<Gd<PackedScene>> {
        self.scene_cache
            .entry(handle.to_string())
            .or_insert_with(|| {
                let scene = ResourceLoader::singleton()
                    .load(handle)
                    .and_then(|resource| resource.try_cast::<PackedScene>().ok());
                if scene.is_none() {
                    log::warn!("TerrainStreamer: failed to load decoration scene {}", handle);
                }
                scene
            })
            .clone()
    }
}

/// Converts tile geometry into a single-surface `ArrayMesh`.
fn build_array_mesh(geometry: &MeshGeometry) -> Gd<ArrayMesh> {
    let vertices: Vec<Vector3> = geometry.vertices.iter().map(|v| Vector3::new(v[0], v[1], v[2])).collect();
    let normals: Vec<Vector3> = geometry.normals.iter().map(|n| Vector3::new(n[0], n[1], n[2])).collect();
    let uvs: Vec<Vector2> = geometry.uvs.iter().map(|u| Vector2::new(u[0], u[1])).collect();
    // Godot treats clockwise triangles as front faces
    let indices: Vec<i32> = geometry.triangles().flat_map(|[a, b, c]| [a, c, b]).collect();

    let mut arrays = VariantArray::new();
    arrays.resize(ArrayType::MAX.ord() as usize, &Variant::nil());
    arrays.set(ArrayType::VERTEX.ord() as usize, &PackedVector3Array::from(&vertices[..]).to_variant());
    arrays.set(ArrayType::NORMAL.ord() as usize, &PackedVector3Array::from(&normals[..]).to_variant());
    arrays.set(ArrayType::TEX_UV.ord() as usize, &PackedVector2Array::from(&uvs[..]).to_variant());
    arrays.set(ArrayType::INDEX.ord() as usize, &PackedInt32Array::from(&indices[..]).to_variant());

    let mut array_mesh = ArrayMesh::new_gd();
    array_mesh.add_surface_from_arrays(PrimitiveType::TRIANGLES, &arrays);

    // Tangents for normal-mapped materials
    let mut surface_tool = SurfaceTool::new_gd();
    surface_tool.create_from(&array_mesh, 0);
    surface_tool.generate_tangents();
    match surface_tool.commit() {
        Some(with_tangents) => with_tangents,
        None => {
            log::warn!("TerrainStreamer: tangent generation failed, using mesh without tangents");
            array_mesh
        }
    }
}

/// Material resource from `material_path`, or a plain material tinted with
/// `terrain_color`.
fn create_terrain_material(config: &TerrainConfig) -> Gd<Material> {
    if let Some(path) = &config.material_path {
        let loaded = ResourceLoader::singleton()
            .load(path.as_str())
            .and_then(|resource| resource.try_cast::<Material>().ok());
        match loaded {
            Some(material) => return material,
            None => log::warn!("TerrainStreamer: failed to load material {}, using terrain_color", path),
        }
    }

    let [r, g, b] = config.terrain_color;
    let mut material = StandardMaterial3D::new_gd();
    material.set_albedo(Color::from_rgb(r, g, b));
    material.upcast::<Material>()
}
