//! Camera-approach math: each frame the camera moves a fixed fraction of the
//! remaining distance toward a point offset from the focused region, so it
//! glides instead of snapping and never overshoots.

use serde::{Deserialize, Serialize};

use crate::geometry::ScenePoint;

pub const DEFAULT_APPROACH_FRACTION: f32 = 0.08;

pub const DEFAULT_FOCUS_OFFSET: FocusOffset = FocusOffset {
    x: 0.6,
    y: 0.2,
    z: 1.0,
};

/// Fixed offset from the focus target, in scene units. Keeps the camera near
/// the region without sitting on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusOffset {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub fn desired_camera_point(target: ScenePoint, offset: FocusOffset) -> ScenePoint {
    ScenePoint::new(target.x + offset.x, target.y + offset.y, target.z + offset.z)
}

/// One interpolation step: move `fraction` of the remaining distance from
/// `current` toward `desired`. Fractions outside 0..=1 are clamped.
pub fn approach(current: ScenePoint, desired: ScenePoint, fraction: f32) -> ScenePoint {
    let t = fraction.clamp(0.0, 1.0);
    ScenePoint::new(
        current.x + (desired.x - current.x) * t,
        current.y + (desired.y - current.y) * t,
        current.z + (desired.z - current.z) * t,
    )
}
