use bevy::prelude::Resource;

use brain_atlas::{FocusOffset, DEFAULT_APPROACH_FRACTION, DEFAULT_FOCUS_OFFSET};

const DEFAULT_TOUR_SECONDS: f32 = 3.0;
const DEFAULT_MODEL_ASSET: &str = "models/brain.glb";
const DEFAULT_HIGHLIGHT_HOVERED: bool = true;
const DEFAULT_PANEL_WIDTH: f32 = 380.0;
const MIN_PANEL_WIDTH: f32 = 240.0;
const DEFAULT_HEADLESS_TICKS: usize = 400;

pub(super) const HEADLESS_ENV: &str = "BRAIN_ATLAS_VIEWER_HEADLESS";

#[derive(Resource, Clone, Debug, PartialEq)]
pub(super) struct ViewerConfig {
    pub tour_seconds: f32,
    pub focus_fraction: f32,
    pub focus_offset: FocusOffset,
    pub model_asset: String,
    pub catalog_path: Option<String>,
    pub highlight_hovered: bool,
    pub panel_width: f32,
    pub headless_ticks: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tour_seconds: DEFAULT_TOUR_SECONDS,
            focus_fraction: DEFAULT_APPROACH_FRACTION,
            focus_offset: DEFAULT_FOCUS_OFFSET,
            model_asset: DEFAULT_MODEL_ASSET.to_string(),
            catalog_path: None,
            highlight_hovered: DEFAULT_HIGHLIGHT_HOVERED,
            panel_width: DEFAULT_PANEL_WIDTH,
            headless_ticks: DEFAULT_HEADLESS_TICKS,
        }
    }
}

pub(super) fn resolve_viewer_config() -> ViewerConfig {
    load_viewer_config_from(|key| std::env::var(key).ok())
}

pub(super) fn headless_requested() -> bool {
    std::env::var(HEADLESS_ENV).is_ok()
}

fn load_viewer_config_from<F>(lookup: F) -> ViewerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ViewerConfig::default();
    if let Some(value) = parse_f32(&lookup, "BRAIN_ATLAS_VIEWER_TOUR_SECONDS") {
        if value.is_finite() && value > 0.0 {
            config.tour_seconds = value;
        }
    }
    if let Some(value) = parse_f32(&lookup, "BRAIN_ATLAS_VIEWER_FOCUS_FRACTION") {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            config.focus_fraction = value;
        }
    }
    if let Some(value) = lookup("BRAIN_ATLAS_VIEWER_FOCUS_OFFSET") {
        if let Some(offset) = parse_focus_offset(&value) {
            config.focus_offset = offset;
        }
    }
    if let Some(value) = lookup("BRAIN_ATLAS_VIEWER_MODEL_ASSET") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            config.model_asset = trimmed.to_string();
        }
    }
    if let Some(value) = lookup("BRAIN_ATLAS_VIEWER_CATALOG_PATH") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            config.catalog_path = Some(trimmed.to_string());
        }
    }
    if let Some(value) = parse_bool(&lookup, "BRAIN_ATLAS_VIEWER_HIGHLIGHT_HOVERED") {
        config.highlight_hovered = value;
    }
    if let Some(value) = parse_f32(&lookup, "BRAIN_ATLAS_VIEWER_PANEL_WIDTH") {
        if value.is_finite() && value >= MIN_PANEL_WIDTH {
            config.panel_width = value;
        }
    }
    if let Some(value) = parse_usize(&lookup, "BRAIN_ATLAS_VIEWER_HEADLESS_TICKS") {
        if value > 0 {
            config.headless_ticks = value;
        }
    }

    config
}

fn parse_focus_offset(raw: &str) -> Option<FocusOffset> {
    let mut parts = raw.split(',').map(str::trim);
    let x = parts.next()?.parse::<f32>().ok()?;
    let y = parts.next()?.parse::<f32>().ok()?;
    let z = parts.next()?.parse::<f32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return None;
    }
    Some(FocusOffset { x, y, z })
}

fn parse_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

fn parse_f32<F>(lookup: &F, key: &str) -> Option<f32>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<f32>().ok())
}

fn parse_usize<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse::<usize>().ok())
}
