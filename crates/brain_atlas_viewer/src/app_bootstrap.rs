use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::picking::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use super::*;

const WINDOW_TITLE: &str = "Brain Explorer";
const HEADLESS_LOOP_MILLIS: u64 = 100;

pub(super) fn run_ui(config: ViewerConfig, catalog: RegionCatalog) {
    App::new()
        .insert_resource(ViewerCatalog { catalog })
        .insert_resource(config)
        .insert_resource(HoveredRegion::default())
        .insert_resource(SelectedRegion::default())
        .insert_resource(RegionSceneHandles::default())
        .insert_resource(TourState::default())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.to_string(),
                resolution: (1280, 800).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, setup_3d_scene)
        .add_systems(
            Update,
            (
                index_region_meshes,
                track_model_load_failure,
                rotate_placeholder,
                advance_tour,
                update_hover_emphasis.after(index_region_meshes),
                update_selection_emphasis.after(index_region_meshes),
                orbit_camera_controls,
                focus_selected_region
                    .after(orbit_camera_controls)
                    .after(advance_tour),
            ),
        )
        .add_systems(EguiPrimaryContextPass, render_info_panel)
        .add_observer(on_region_hover_start)
        .add_observer(on_region_hover_end)
        .add_observer(on_region_click)
        .run();
}

pub(super) fn run_headless(config: ViewerConfig, catalog: RegionCatalog) {
    App::new()
        .insert_resource(ViewerCatalog { catalog })
        .insert_resource(config)
        .insert_resource(SelectedRegion::default())
        .insert_resource(TourState::default())
        .insert_resource(HeadlessStatus::default())
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(
            HEADLESS_LOOP_MILLIS,
        ))))
        .add_systems(Startup, headless_start_tour)
        .add_systems(Update, (advance_tour, headless_report).chain())
        .run();
}
