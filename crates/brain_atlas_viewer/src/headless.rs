use bevy::app::AppExit;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use super::tour_controls::start_tour;
use super::{SelectedRegion, TourState, ViewerCatalog, ViewerConfig};

/// Change-tracking for the windowless mode: prints selection transitions and
/// stops after one full tour cycle (or the configured tick cap).
#[derive(Resource, Default)]
pub(super) struct HeadlessStatus {
    last_selection: Option<String>,
    transitions: usize,
    ticks: usize,
}

pub(super) fn headless_start_tour(
    config: Res<ViewerConfig>,
    catalog: Res<ViewerCatalog>,
    mut tour: ResMut<TourState>,
    mut selected: ResMut<SelectedRegion>,
) {
    println!(
        "headless tour: {} regions, {:.1}s interval",
        catalog.catalog.len(),
        config.tour_seconds
    );
    start_tour(
        &mut tour,
        &catalog.catalog,
        &mut selected,
        config.tour_seconds,
    );
}

pub(super) fn headless_report(
    config: Res<ViewerConfig>,
    catalog: Res<ViewerCatalog>,
    selected: Res<SelectedRegion>,
    mut status: ResMut<HeadlessStatus>,
    mut exit: MessageWriter<AppExit>,
) {
    status.ticks += 1;

    if status.last_selection != selected.id {
        if let Some(region) = selected
            .id
            .as_deref()
            .and_then(|id| catalog.catalog.get(id))
        {
            println!("selected {} — {} ({})", region.id, region.display, region.lab);
        }
        status.last_selection = selected.id.clone();
        status.transitions += 1;
    }

    // One transition per region plus the wrap back to the first.
    let toured_full_cycle = status.transitions > catalog.catalog.len();
    if toured_full_cycle || status.ticks >= config.headless_ticks {
        exit.write(AppExit::Success);
    }
}
