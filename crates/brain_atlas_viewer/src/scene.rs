use std::collections::HashMap;
use std::f32::consts::TAU;

use bevy::asset::LoadState;
use bevy::prelude::*;

use brain_atlas::{Region, ScenePoint};

use super::{
    region_base_color, scene_point_to_vec3, BaseScale, BrainCamera, BrainSceneRoot, OrbitCamera,
    PlaceholderRig, RegionMarker, RegionSceneHandle, RegionSceneHandles, SceneSource,
    ViewerCatalog, ViewerConfig,
};

const CAMERA_START: Vec3 = Vec3::new(0.0, 0.8, 2.5);
const DIRECTIONAL_ILLUMINANCE_LUX: f32 = 8_000.0;
const AMBIENT_BRIGHTNESS: f32 = 500.0;

const PLACEHOLDER_SHELL_RADIUS: f32 = 0.78;
const PLACEHOLDER_MARKER_RADIUS: f32 = 0.06;
const PLACEHOLDER_SPIN_RADIANS_PER_SEC: f32 = 0.05;
const PLACEHOLDER_RING_X: f32 = 0.45;
const PLACEHOLDER_RING_Y: f32 = 0.12;
const PLACEHOLDER_RING_Z: f32 = 0.25;
const PLACEHOLDER_RING_Z_FREQUENCY: f32 = 1.3;
const PLACEHOLDER_MARKER_REST_EMISSIVE: f32 = 0.9;
const PLACEHOLDER_MARKER_HOVER_EMISSIVE: f32 = 1.6;

const REGION_REST_ALPHA: f32 = 0.6;
const REGION_HOVER_EMISSIVE: f32 = 0.6;

/// Handle of the segmented brain model, kept so a load failure can be
/// reported once. The placeholder stays up if the asset never arrives.
#[derive(Resource)]
pub(super) struct BrainModel {
    scene: Handle<Scene>,
    failure_logged: bool,
}

pub(super) fn setup_3d_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut handles: ResMut<RegionSceneHandles>,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
    catalog: Res<ViewerCatalog>,
) {
    let camera_transform = Transform::from_translation(CAMERA_START).looking_at(Vec3::ZERO, Vec3::Y);
    let orbit = OrbitCamera::from_transform(&camera_transform, Vec3::ZERO);
    commands.spawn((Camera3d::default(), camera_transform, BrainCamera, orbit));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        affects_lightmapped_meshes: true,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_ILLUMINANCE_LUX,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let scene: Handle<Scene> = asset_server.load(format!("{}#Scene0", config.model_asset));
    commands.spawn((
        SceneRoot(scene.clone()),
        Transform::default(),
        BrainSceneRoot,
        Name::new("brain-model-root"),
    ));
    commands.insert_resource(BrainModel {
        scene,
        failure_logged: false,
    });

    spawn_placeholder(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut handles,
        &catalog.catalog,
    );
}

/// Stand-in shown until (or instead of) the real model: a dark translucent
/// shell with one emissive marker per region on a fixed ring. Markers carry
/// the same `RegionMarker` contract as the model's sub-meshes, so hover,
/// click, and focus behave identically on both.
fn spawn_placeholder(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    handles: &mut RegionSceneHandles,
    catalog: &brain_atlas::RegionCatalog,
) {
    let shell_mesh = meshes.add(Sphere::new(PLACEHOLDER_SHELL_RADIUS).mesh().uv(48, 24));
    let shell_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.03, 0.06, 0.13, 0.9),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.8,
        metallic: 0.05,
        ..default()
    });
    let marker_mesh = meshes.add(Sphere::new(PLACEHOLDER_MARKER_RADIUS));

    let points = placeholder_marker_points(catalog.len());
    commands
        .spawn((
            Transform::default(),
            Visibility::default(),
            PlaceholderRig,
            Name::new("placeholder-rig"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(shell_mesh),
                MeshMaterial3d(shell_material),
                Transform::default(),
                Name::new("placeholder-shell"),
            ));

            for (region, point) in catalog.regions().iter().zip(points) {
                let material = materials.add(StandardMaterial {
                    base_color: Color::srgb(0.0, 0.07, 0.1),
                    emissive: region_emissive(region, PLACEHOLDER_MARKER_REST_EMISSIVE),
                    ..default()
                });
                let marker = parent
                    .spawn((
                        Mesh3d(marker_mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::from_translation(scene_point_to_vec3(point)),
                        RegionMarker {
                            id: region.id.clone(),
                        },
                        BaseScale(Vec3::ONE),
                        Name::new(format!("placeholder:{}", region.id)),
                    ))
                    .id();
                handles.regions.insert(
                    region.id.clone(),
                    RegionSceneHandle {
                        entity: marker,
                        material,
                        resting_emissive: region_emissive(
                            region,
                            PLACEHOLDER_MARKER_REST_EMISSIVE,
                        ),
                        highlight_emissive: region_emissive(
                            region,
                            PLACEHOLDER_MARKER_HOVER_EMISSIVE,
                        ),
                        resting_alpha: 1.0,
                    },
                );
            }
        });
    handles.source = SceneSource::Placeholder;
}

/// Fixed ring layout for the placeholder markers. Deterministic: depends
/// only on the region count.
pub(super) fn placeholder_marker_points(count: usize) -> Vec<ScenePoint> {
    (0..count)
        .map(|index| {
            let phi = (index as f32 / count as f32) * TAU;
            ScenePoint::new(
                phi.cos() * PLACEHOLDER_RING_X,
                phi.sin() * PLACEHOLDER_RING_Y,
                (phi * PLACEHOLDER_RING_Z_FREQUENCY).sin() * PLACEHOLDER_RING_Z,
            )
        })
        .collect()
}

pub(super) fn rotate_placeholder(
    time: Res<Time>,
    mut rigs: Query<&mut Transform, With<PlaceholderRig>>,
) {
    for mut transform in rigs.iter_mut() {
        transform.rotate_y(time.delta_secs() * PLACEHOLDER_SPIN_RADIANS_PER_SEC);
    }
}

/// Once the model's named nodes appear under the scene root, tag every node
/// whose name matches a catalog id, give it the region's material, record it
/// in the handle map, and retire the placeholder. Unmatched node names are
/// ignored.
pub(super) fn index_region_meshes(
    mut commands: Commands,
    catalog: Res<ViewerCatalog>,
    mut handles: ResMut<RegionSceneHandles>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<Entity, With<BrainSceneRoot>>,
    names: Query<(Entity, &Name)>,
    parents: Query<&ChildOf>,
    children: Query<&Children>,
    material_refs: Query<&MeshMaterial3d<StandardMaterial>>,
    placeholders: Query<Entity, With<PlaceholderRig>>,
) {
    if handles.source == SceneSource::Asset {
        return;
    }
    let Ok(root) = roots.single() else {
        return;
    };

    let mut matched = Vec::new();
    for (entity, name) in names.iter() {
        if !catalog.catalog.contains(name.as_str()) {
            continue;
        }
        if !is_descendant_of(entity, root, &parents) {
            continue;
        }
        matched.push((entity, name.as_str().to_string()));
    }
    if matched.is_empty() {
        return;
    }

    let mut indexed = HashMap::new();
    for (entity, id) in matched {
        let Some(region) = catalog.catalog.get(&id) else {
            continue;
        };
        let material = materials.add(StandardMaterial {
            base_color: region_base_color(region).with_alpha(REGION_REST_ALPHA),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.4,
            metallic: 0.05,
            ..default()
        });
        assign_material_recursive(entity, &material, &mut commands, &children, &material_refs);
        commands
            .entity(entity)
            .insert((RegionMarker { id: id.clone() }, BaseScale(Vec3::ONE)));
        indexed.insert(
            id,
            RegionSceneHandle {
                entity,
                material,
                resting_emissive: LinearRgba::BLACK,
                highlight_emissive: region_emissive(region, REGION_HOVER_EMISSIVE),
                resting_alpha: REGION_REST_ALPHA,
            },
        );
    }
    if indexed.is_empty() {
        return;
    }

    for placeholder in placeholders.iter() {
        commands.entity(placeholder).despawn();
    }
    info!("indexed {} regions from the brain model", indexed.len());
    handles.regions = indexed;
    handles.source = SceneSource::Asset;
}

pub(super) fn track_model_load_failure(
    asset_server: Res<AssetServer>,
    handles: Res<RegionSceneHandles>,
    mut model: ResMut<BrainModel>,
) {
    if model.failure_logged || handles.source == SceneSource::Asset {
        return;
    }
    if let LoadState::Failed(err) = asset_server.load_state(model.scene.id()) {
        warn!("brain model unavailable, keeping the placeholder: {err}");
        model.failure_logged = true;
    }
}

fn assign_material_recursive(
    root: Entity,
    material: &Handle<StandardMaterial>,
    commands: &mut Commands,
    children: &Query<&Children>,
    material_refs: &Query<&MeshMaterial3d<StandardMaterial>>,
) {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if material_refs.get(entity).is_ok() {
            commands
                .entity(entity)
                .insert(MeshMaterial3d(material.clone()));
        }
        if let Ok(direct) = children.get(entity) {
            stack.extend(direct.iter());
        }
    }
}

fn is_descendant_of(entity: Entity, root: Entity, parents: &Query<&ChildOf>) -> bool {
    let mut current = entity;
    loop {
        if current == root {
            return true;
        }
        let Ok(parent) = parents.get(current) else {
            return false;
        };
        current = parent.0;
    }
}

fn region_emissive(region: &Region, intensity: f32) -> LinearRgba {
    let [red, green, blue] = region.color_rgb().unwrap_or([0.6, 0.6, 0.6]);
    LinearRgba::rgb(red * intensity, green * intensity, blue * intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_ring_is_deterministic_and_matches_the_formula() {
        let first = placeholder_marker_points(7);
        let second = placeholder_marker_points(7);
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);

        // First marker sits at phi = 0.
        assert!((first[0].x - PLACEHOLDER_RING_X).abs() < f32::EPSILON);
        assert!(first[0].y.abs() < f32::EPSILON);
        assert!(first[0].z.abs() < f32::EPSILON);

        let phi = (2.0 / 7.0) * TAU;
        assert!((first[2].x - phi.cos() * PLACEHOLDER_RING_X).abs() < 1e-6);
        assert!((first[2].y - phi.sin() * PLACEHOLDER_RING_Y).abs() < 1e-6);
        assert!(
            (first[2].z - (phi * PLACEHOLDER_RING_Z_FREQUENCY).sin() * PLACEHOLDER_RING_Z).abs()
                < 1e-6
        );
    }

    #[test]
    fn marker_ring_is_empty_for_an_empty_catalog() {
        assert!(placeholder_marker_points(0).is_empty());
    }

    #[test]
    fn marker_positions_are_distinct() {
        let points = placeholder_marker_points(7);
        for (i, a) in points.iter().enumerate() {
            for b in points.iter().skip(i + 1) {
                assert!(brain_atlas::scene_distance(*a, *b) > 1e-3);
            }
        }
    }

    #[test]
    fn descendant_walk_finds_nested_nodes_only_under_the_root() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let child = world.spawn(ChildOf(root)).id();
        let grandchild = world.spawn(ChildOf(child)).id();
        let outsider = world.spawn_empty().id();

        let mut parents = world.query::<&ChildOf>();
        let parents = parents.query(&world);

        assert!(is_descendant_of(grandchild, root, &parents));
        assert!(is_descendant_of(child, root, &parents));
        assert!(is_descendant_of(root, root, &parents));
        assert!(!is_descendant_of(outsider, root, &parents));
    }

    #[test]
    fn region_emissive_scales_catalog_colors() {
        let catalog = brain_atlas::builtin_catalog();
        let region = catalog.get("Brainstem").expect("brainstem");
        let emissive = region_emissive(region, 0.5);
        let expected = (218.0 / 255.0) * 0.5;
        assert!((emissive.red - expected).abs() < 1e-6);
        assert!((emissive.green - expected).abs() < 1e-6);
        assert!((emissive.blue - expected).abs() < 1e-6);
    }
}
