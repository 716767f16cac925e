use bevy::picking::prelude::*;
use bevy::prelude::*;

use super::tour_controls::select_region;
use super::{HoveredRegion, RegionMarker, SelectedRegion, TourState, ViewerCatalog};

/// Picking hits land on mesh primitives nested below the region-tagged node;
/// walk up until a `RegionMarker` is found.
pub(super) fn find_region_ancestor(
    entity: Entity,
    markers: &Query<&RegionMarker>,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if markers.get(current).is_ok() {
            return Some(current);
        }
        let Ok(parent) = parents.get(current) else {
            return None;
        };
        current = parent.0;
    }
}

pub(super) fn on_region_hover_start(
    trigger: On<Pointer<Over>>,
    markers: Query<&RegionMarker>,
    parents: Query<&ChildOf>,
    mut hovered: ResMut<HoveredRegion>,
) {
    let entity = trigger.event().event_target();
    let Some(target) = find_region_ancestor(entity, &markers, &parents) else {
        return;
    };
    let Ok(marker) = markers.get(target) else {
        return;
    };

    if hovered.id.as_deref() != Some(marker.id.as_str()) {
        hovered.id = Some(marker.id.clone());
    }
}

pub(super) fn on_region_hover_end(
    trigger: On<Pointer<Out>>,
    markers: Query<&RegionMarker>,
    parents: Query<&ChildOf>,
    mut hovered: ResMut<HoveredRegion>,
) {
    let entity = trigger.event().event_target();
    let Some(target) = find_region_ancestor(entity, &markers, &parents) else {
        return;
    };
    let Ok(marker) = markers.get(target) else {
        return;
    };

    if hovered.id.as_deref() == Some(marker.id.as_str()) {
        hovered.id = None;
    }
}

pub(super) fn on_region_click(
    trigger: On<Pointer<Click>>,
    markers: Query<&RegionMarker>,
    parents: Query<&ChildOf>,
    catalog: Res<ViewerCatalog>,
    mut selected: ResMut<SelectedRegion>,
    mut tour: ResMut<TourState>,
) {
    let entity = trigger.event().event_target();
    let Some(target) = find_region_ancestor(entity, &markers, &parents) else {
        return;
    };
    let Ok(marker) = markers.get(target) else {
        return;
    };

    select_region(&marker.id, &catalog.catalog, &mut selected, &mut tour);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_ancestor_walks_up_to_the_tagged_node() {
        let mut world = World::new();
        let region = world
            .spawn(RegionMarker {
                id: "Cerebellum".to_string(),
            })
            .id();
        let child = world.spawn(ChildOf(region)).id();
        let grandchild = world.spawn(ChildOf(child)).id();
        let stray = world.spawn_empty().id();

        let mut markers = world.query::<&RegionMarker>();
        let mut parents = world.query::<&ChildOf>();
        let markers = markers.query(&world);
        let parents = parents.query(&world);

        assert_eq!(
            find_region_ancestor(grandchild, &markers, &parents),
            Some(region)
        );
        assert_eq!(
            find_region_ancestor(region, &markers, &parents),
            Some(region)
        );
        assert_eq!(find_region_ancestor(stray, &markers, &parents), None);
    }
}
