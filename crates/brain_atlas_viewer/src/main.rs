use std::collections::HashMap;

use bevy::prelude::*;

use brain_atlas::{builtin_catalog, Region, RegionCatalog, ScenePoint};

mod app_bootstrap;
mod camera_controls;
mod camera_focus;
mod emphasis;
mod headless;
mod info_panel;
mod picking;
mod scene;
mod tour_controls;
mod viewer_config;

use app_bootstrap::{run_headless, run_ui};
use camera_controls::{orbit_camera_controls, OrbitCamera};
use camera_focus::focus_selected_region;
use emphasis::{update_hover_emphasis, update_selection_emphasis};
use headless::{headless_report, headless_start_tour, HeadlessStatus};
use info_panel::render_info_panel;
use picking::{on_region_click, on_region_hover_end, on_region_hover_start};
use scene::{index_region_meshes, rotate_placeholder, setup_3d_scene, track_model_load_failure};
use tour_controls::{advance_tour, TourState};
use viewer_config::{headless_requested, resolve_viewer_config, ViewerConfig};

fn main() {
    let config = resolve_viewer_config();
    let catalog = resolve_catalog(&config);

    if headless_requested() {
        run_headless(config, catalog);
    } else {
        run_ui(config, catalog);
    }
}

/// The atlas backing every view: the side panel list, the pickable meshes,
/// and the tour order.
#[derive(Resource)]
struct ViewerCatalog {
    catalog: RegionCatalog,
}

#[derive(Resource, Default)]
struct HoveredRegion {
    id: Option<String>,
}

#[derive(Resource, Default)]
struct SelectedRegion {
    id: Option<String>,
}

/// Weak map from region id to whatever currently renders it. Entities are
/// looked up for world positions and emphasis only; the scene owns them.
#[derive(Resource, Default)]
struct RegionSceneHandles {
    regions: HashMap<String, RegionSceneHandle>,
    source: SceneSource,
}

struct RegionSceneHandle {
    entity: Entity,
    material: Handle<StandardMaterial>,
    resting_emissive: LinearRgba,
    highlight_emissive: LinearRgba,
    resting_alpha: f32,
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum SceneSource {
    #[default]
    Placeholder,
    Asset,
}

#[derive(Component)]
struct BrainCamera;

#[derive(Component)]
struct RegionMarker {
    id: String,
}

#[derive(Component)]
struct BrainSceneRoot;

#[derive(Component)]
struct PlaceholderRig;

#[derive(Component, Copy, Clone)]
struct BaseScale(Vec3);

fn resolve_catalog(config: &ViewerConfig) -> RegionCatalog {
    let Some(path) = config.catalog_path.as_deref() else {
        return builtin_catalog();
    };

    match RegionCatalog::load_from_file(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("catalog load failed ({err}); using built-in atlas");
            builtin_catalog()
        }
    }
}

fn vec3_to_scene_point(value: Vec3) -> ScenePoint {
    ScenePoint::new(value.x, value.y, value.z)
}

fn scene_point_to_vec3(value: ScenePoint) -> Vec3 {
    Vec3::new(value.x, value.y, value.z)
}

fn region_base_color(region: &Region) -> Color {
    region
        .color_rgb()
        .map(|[red, green, blue]| Color::srgb(red, green, blue))
        .unwrap_or(Color::srgb(0.6, 0.6, 0.6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_point_conversions_round_trip() {
        let original = Vec3::new(0.6, -0.2, 1.0);
        let converted = scene_point_to_vec3(vec3_to_scene_point(original));
        assert_eq!(converted, original);
    }

    #[test]
    fn resolve_catalog_defaults_to_builtin() {
        let config = ViewerConfig::default();
        let catalog = resolve_catalog(&config);
        assert_eq!(catalog.len(), builtin_catalog().len());
    }

    #[test]
    fn resolve_catalog_falls_back_when_file_is_missing() {
        let config = ViewerConfig {
            catalog_path: Some("/nonexistent/atlas.json".to_string()),
            ..ViewerConfig::default()
        };
        let catalog = resolve_catalog(&config);
        assert!(catalog.contains("Cerebellum"));
    }

    #[test]
    fn region_base_color_decodes_catalog_colors() {
        let catalog = builtin_catalog();
        let region = catalog.get("Brainstem").expect("brainstem");
        let Color::Srgba(srgba) = region_base_color(region) else {
            panic!("expected srgba");
        };
        assert!((srgba.red - 218.0 / 255.0).abs() < f32::EPSILON);
    }
}
