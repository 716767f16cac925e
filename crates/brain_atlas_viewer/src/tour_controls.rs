use bevy::prelude::*;

use brain_atlas::{RegionCatalog, TourSchedule};

use super::{SelectedRegion, ViewerCatalog};

/// Tour runtime: whether the auto-cycle is on, where it stands in the
/// catalog order, and the repeating timer that drives it. Dropped with the
/// app, so no tick can fire after teardown.
#[derive(Resource)]
pub(super) struct TourState {
    pub(super) active: bool,
    schedule: Option<TourSchedule>,
    timer: Timer,
}

impl Default for TourState {
    fn default() -> Self {
        Self {
            active: false,
            schedule: None,
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Activates the tour: selects the first region in catalog order and arms
/// the interval timer. Starting an already-running tour is a no-op, as is
/// starting over an empty catalog.
pub(super) fn start_tour(
    tour: &mut TourState,
    catalog: &RegionCatalog,
    selected: &mut SelectedRegion,
    interval_seconds: f32,
) {
    if tour.active {
        return;
    }
    let Some(schedule) = TourSchedule::new(catalog.len()) else {
        return;
    };

    selected.id = catalog
        .region_at(schedule.current())
        .map(|region| region.id.clone());
    tour.schedule = Some(schedule);
    tour.timer = Timer::from_seconds(interval_seconds.max(f32::EPSILON), TimerMode::Repeating);
    tour.active = true;
}

/// Deactivates the tour, leaving the current selection as-is. Stopping a
/// stopped tour is a no-op.
pub(super) fn stop_tour(tour: &mut TourState) {
    if !tour.active {
        return;
    }
    tour.active = false;
    tour.schedule = None;
    tour.timer.reset();
}

/// Shared selection path for scene clicks and panel cards. While the tour is
/// running, a manual pick re-anchors the cycle so it continues from the
/// chosen region instead of snapping back on the next tick.
pub(super) fn select_region(
    id: &str,
    catalog: &RegionCatalog,
    selected: &mut SelectedRegion,
    tour: &mut TourState,
) {
    let Some(position) = catalog.position(id) else {
        return;
    };
    selected.id = Some(id.to_string());

    if tour.active {
        if let Some(schedule) = tour.schedule.as_mut() {
            schedule.align_to(position);
            tour.timer.reset();
        }
    }
}

pub(super) fn advance_tour(
    time: Res<Time>,
    catalog: Res<ViewerCatalog>,
    mut tour: ResMut<TourState>,
    mut selected: ResMut<SelectedRegion>,
) {
    if !tour.active {
        return;
    }
    tour.timer.tick(time.delta());
    let completions = tour.timer.times_finished_this_tick();
    if completions == 0 {
        return;
    }
    let Some(schedule) = tour.schedule.as_mut() else {
        return;
    };

    for _ in 0..completions {
        schedule.advance();
    }
    selected.id = catalog
        .catalog
        .region_at(schedule.current())
        .map(|region| region.id.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_atlas::Region;
    use std::time::Duration;

    fn test_catalog(ids: &[&str]) -> RegionCatalog {
        let regions = ids
            .iter()
            .map(|id| Region {
                id: id.to_string(),
                lab: "Lab".to_string(),
                display: id.to_string(),
                fact: format!("fact about {id}"),
                color: "#A0B0C0".to_string(),
            })
            .collect();
        RegionCatalog::from_regions(regions).expect("catalog")
    }

    fn test_app(catalog: RegionCatalog) -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default());
        app.insert_resource(ViewerCatalog { catalog });
        app.insert_resource(TourState::default());
        app.insert_resource(SelectedRegion::default());
        app.add_systems(Update, advance_tour);
        app
    }

    fn start(app: &mut App, interval_seconds: f32) {
        let world = app.world_mut();
        world.resource_scope(|world, mut tour: Mut<TourState>| {
            world.resource_scope(|world, mut selected: Mut<SelectedRegion>| {
                let catalog = world.resource::<ViewerCatalog>();
                start_tour(&mut tour, &catalog.catalog, &mut selected, interval_seconds);
            });
        });
    }

    fn advance_time(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn selection(app: &mut App) -> Option<String> {
        app.world().resource::<SelectedRegion>().id.clone()
    }

    #[test]
    fn tour_visits_catalog_order_and_wraps() {
        let mut app = test_app(test_catalog(&["A", "B", "C"]));
        start(&mut app, 3.0);
        assert_eq!(selection(&mut app), Some("A".to_string()));

        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("B".to_string()));
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("C".to_string()));
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("A".to_string()));
    }

    #[test]
    fn starting_twice_is_idempotent() {
        let mut app = test_app(test_catalog(&["A", "B"]));
        start(&mut app, 3.0);
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("B".to_string()));

        start(&mut app, 3.0);
        assert_eq!(selection(&mut app), Some("B".to_string()));
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("A".to_string()));
    }

    #[test]
    fn stop_freezes_the_selection() {
        let mut app = test_app(test_catalog(&["A", "B", "C"]));
        start(&mut app, 3.0);
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("B".to_string()));

        app.world_mut()
            .resource_scope(|_, mut tour: Mut<TourState>| stop_tour(&mut tour));
        advance_time(&mut app, 3.05);
        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("B".to_string()));

        // stopping again stays a no-op
        app.world_mut()
            .resource_scope(|_, mut tour: Mut<TourState>| stop_tour(&mut tour));
        assert_eq!(selection(&mut app), Some("B".to_string()));
    }

    #[test]
    fn empty_catalog_never_schedules() {
        let mut app = test_app(test_catalog(&[]));
        start(&mut app, 3.0);
        assert_eq!(selection(&mut app), None);
        assert!(!app.world().resource::<TourState>().active);

        advance_time(&mut app, 10.0);
        assert_eq!(selection(&mut app), None);
    }

    #[test]
    fn manual_selection_re_anchors_a_running_tour() {
        let mut app = test_app(test_catalog(&["A", "B", "C"]));
        start(&mut app, 3.0);

        app.world_mut()
            .resource_scope(|world, mut tour: Mut<TourState>| {
                world.resource_scope(|world, mut selected: Mut<SelectedRegion>| {
                    let catalog = world.resource::<ViewerCatalog>();
                    select_region("C", &catalog.catalog, &mut selected, &mut tour);
                });
            });
        assert_eq!(selection(&mut app), Some("C".to_string()));

        advance_time(&mut app, 3.05);
        assert_eq!(selection(&mut app), Some("A".to_string()));
    }

    #[test]
    fn selecting_an_unknown_id_is_ignored() {
        let mut app = test_app(test_catalog(&["A"]));
        app.world_mut()
            .resource_scope(|world, mut tour: Mut<TourState>| {
                world.resource_scope(|world, mut selected: Mut<SelectedRegion>| {
                    let catalog = world.resource::<ViewerCatalog>();
                    select_region("Nope", &catalog.catalog, &mut selected, &mut tour);
                });
            });
        assert_eq!(selection(&mut app), None);
    }
}
