use bevy::prelude::*;

use super::{BaseScale, HoveredRegion, RegionSceneHandles, SelectedRegion, ViewerConfig};

const SELECTED_EMPHASIS_SCALE: f32 = 1.18;

/// Hovered region pops: full opacity plus its catalog color as emissive.
/// The previous hover target is restored to its resting material.
pub(super) fn update_hover_emphasis(
    config: Res<ViewerConfig>,
    hovered: Res<HoveredRegion>,
    handles: Res<RegionSceneHandles>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut previous: Local<Option<String>>,
) {
    let current = if config.highlight_hovered {
        hovered.id.clone()
    } else {
        None
    };
    if *previous == current && !handles.is_changed() {
        return;
    }

    if let Some(id) = previous.as_deref() {
        if let Some(handle) = handles.regions.get(id) {
            if let Some(material) = materials.get_mut(&handle.material) {
                material.emissive = handle.resting_emissive;
                material.base_color.set_alpha(handle.resting_alpha);
            }
        }
    }

    if let Some(id) = current.as_deref() {
        if let Some(handle) = handles.regions.get(id) {
            if let Some(material) = materials.get_mut(&handle.material) {
                material.emissive = handle.highlight_emissive;
                material.base_color.set_alpha(1.0);
            }
        }
    }

    *previous = current;
}

/// Selected region is scaled up slightly; the previously selected one is
/// reset to its base scale.
pub(super) fn update_selection_emphasis(
    selected: Res<SelectedRegion>,
    handles: Res<RegionSceneHandles>,
    mut transforms: Query<(&mut Transform, Option<&BaseScale>)>,
    mut previous: Local<Option<String>>,
) {
    if !selected.is_changed() && !handles.is_changed() && *previous == selected.id {
        return;
    }

    if let Some(id) = previous.as_deref() {
        if previous.as_deref() != selected.id.as_deref() {
            if let Some(handle) = handles.regions.get(id) {
                set_entity_scale(&mut transforms, handle.entity, 1.0);
            }
        }
    }

    if let Some(id) = selected.id.as_deref() {
        if let Some(handle) = handles.regions.get(id) {
            set_entity_scale(&mut transforms, handle.entity, SELECTED_EMPHASIS_SCALE);
        }
    }

    *previous = selected.id.clone();
}

fn set_entity_scale(
    transforms: &mut Query<(&mut Transform, Option<&BaseScale>)>,
    entity: Entity,
    factor: f32,
) {
    if let Ok((mut transform, base)) = transforms.get_mut(entity) {
        let base_scale = base.map(|scale| scale.0).unwrap_or(Vec3::ONE);
        transform.scale = base_scale * factor;
    }
}
