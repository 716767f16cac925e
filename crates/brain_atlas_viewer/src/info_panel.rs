use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use brain_atlas::{Region, RegionCatalog};

use super::tour_controls::{select_region, start_tour, stop_tour};
use super::{HoveredRegion, SelectedRegion, TourState, ViewerCatalog, ViewerConfig};

const SWATCH_SIZE: f32 = 14.0;

pub(super) fn render_info_panel(
    mut contexts: EguiContexts,
    config: Res<ViewerConfig>,
    catalog: Res<ViewerCatalog>,
    mut hovered: ResMut<HoveredRegion>,
    mut selected: ResMut<SelectedRegion>,
    mut tour: ResMut<TourState>,
) {
    let Ok(context) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::right("brain-info-panel")
        .resizable(false)
        .exact_width(config.panel_width)
        .show(context, |ui| {
            ui.add_space(8.0);
            ui.heading("Brain Explorer");
            ui.label(
                egui::RichText::new("Hover a region for a preview, click one to focus it.").weak(),
            );
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui.button(tour_button_label(tour.active)).clicked() {
                    if tour.active {
                        stop_tour(&mut tour);
                    } else {
                        start_tour(
                            &mut tour,
                            &catalog.catalog,
                            &mut selected,
                            config.tour_seconds,
                        );
                    }
                }
                if ui.button("Reset").clicked() {
                    selected.id = None;
                    hovered.id = None;
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for region in catalog.catalog.regions() {
                    let is_selected = selected.id.as_deref() == Some(region.id.as_str());
                    let is_hovered = hovered.id.as_deref() == Some(region.id.as_str());

                    let mut clicked = false;
                    ui.horizontal(|ui| {
                        color_swatch(ui, region);
                        let title = egui::RichText::new(&region.display);
                        let title = if is_hovered { title.strong() } else { title };
                        if ui.selectable_label(is_selected, title).clicked() {
                            clicked = true;
                        }
                        if is_selected {
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.label(egui::RichText::new("Selected").weak().small());
                                },
                            );
                        }
                    });
                    ui.label(egui::RichText::new(&region.lab).weak().small());
                    ui.label(egui::RichText::new(&region.fact).small());
                    ui.add_space(6.0);

                    if clicked {
                        select_region(&region.id, &catalog.catalog, &mut selected, &mut tour);
                    }
                }

                if let Some(region) = selected_detail(&catalog.catalog, &selected) {
                    ui.separator();
                    ui.heading(&region.display);
                    ui.label(egui::RichText::new(&region.lab).weak());
                    ui.add_space(4.0);
                    ui.label(&region.fact);
                    ui.add_space(8.0);
                    if ui.button("Copy Fact").clicked() {
                        // Best effort; nothing to report if the platform has
                        // no clipboard.
                        ui.ctx().copy_text(region.fact.clone());
                    }
                }
            });
        });

    egui::Area::new(egui::Id::new("viewport-hint"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(context, |ui| {
            ui.label(
                egui::RichText::new("Click a region to focus. Drag to orbit, scroll to zoom.")
                    .weak(),
            );
        });
}

pub(super) fn tour_button_label(active: bool) -> &'static str {
    if active {
        "Stop Tour"
    } else {
        "Start Tour"
    }
}

/// The region shown in the expanded detail block, if any.
pub(super) fn selected_detail<'a>(
    catalog: &'a RegionCatalog,
    selected: &SelectedRegion,
) -> Option<&'a Region> {
    selected.id.as_deref().and_then(|id| catalog.get(id))
}

fn color_swatch(ui: &mut egui::Ui, region: &Region) {
    let [red, green, blue] = region.color_rgb().unwrap_or([0.6, 0.6, 0.6]);
    let color = egui::Color32::from_rgb(
        (red * 255.0) as u8,
        (green * 255.0) as u8,
        (blue * 255.0) as u8,
    );
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
        egui::Sense::hover(),
    );
    ui.painter().rect_filled(rect, 3.0, color);
}
