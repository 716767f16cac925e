use bevy::prelude::*;

use brain_atlas::{approach, desired_camera_point};

use super::{
    scene_point_to_vec3, vec3_to_scene_point, BrainCamera, OrbitCamera, RegionSceneHandles,
    SelectedRegion, ViewerConfig,
};

/// Per-frame glide toward the selected region: move a fixed fraction of the
/// remaining distance toward an offset point next to the region, re-aiming at
/// the region itself every frame. Runs for as long as a selection exists; a
/// selection without a resolvable scene position skips the frame.
pub(super) fn focus_selected_region(
    config: Res<ViewerConfig>,
    selected: Res<SelectedRegion>,
    handles: Res<RegionSceneHandles>,
    targets: Query<&GlobalTransform, Without<BrainCamera>>,
    mut cameras: Query<(&mut Transform, &mut OrbitCamera), With<BrainCamera>>,
) {
    let Some(id) = selected.id.as_deref() else {
        return;
    };
    let Some(handle) = handles.regions.get(id) else {
        return;
    };
    let Ok(target) = targets.get(handle.entity) else {
        return;
    };
    let Ok((mut transform, mut orbit)) = cameras.single_mut() else {
        return;
    };

    let target = target.translation();
    let desired = desired_camera_point(vec3_to_scene_point(target), config.focus_offset);
    let next = approach(
        vec3_to_scene_point(transform.translation),
        desired,
        config.focus_fraction,
    );
    transform.translation = scene_point_to_vec3(next);
    transform.look_at(target, Vec3::Y);

    // Keep the orbit state in step so manual controls resume from here.
    *orbit = OrbitCamera::from_transform(&transform, target);
}
