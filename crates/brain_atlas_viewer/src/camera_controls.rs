use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use super::BrainCamera;

const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
const ORBIT_PAN_SENSITIVITY: f32 = 0.002;
const ORBIT_ZOOM_SENSITIVITY: f32 = 0.2;
const ORBIT_MIN_RADIUS: f32 = 0.6;
const ORBIT_MAX_RADIUS: f32 = 12.0;
const ORBIT_MAX_PITCH: f32 = 1.54;

#[derive(Component)]
pub(super) struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub(super) fn from_transform(transform: &Transform, focus: Vec3) -> Self {
        let offset = transform.translation - focus;
        let radius = offset.length().max(0.1);
        let yaw = offset.x.atan2(offset.z);
        // Inverse of apply_to_transform: a positive pitch puts the camera
        // below the focus height, so the elevation angle is negated.
        let pitch = (-offset.y).atan2((offset.x * offset.x + offset.z * offset.z).sqrt());
        Self {
            focus,
            radius,
            yaw,
            pitch,
        }
    }

    pub(super) fn apply_to_transform(&self, transform: &mut Transform) {
        let rotation =
            Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        transform.translation = self.focus + offset;
        transform.look_at(self.focus, Vec3::Y);
    }
}

pub(super) fn orbit_camera_controls(
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut query: Query<(&mut OrbitCamera, &mut Transform), With<BrainCamera>>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    let mut scroll = 0.0;
    for event in mouse_wheel.read() {
        scroll += event.y;
    }

    if delta == Vec2::ZERO && scroll == 0.0 {
        return;
    }

    let Ok((mut orbit, mut transform)) = query.single_mut() else {
        return;
    };

    let mut changed = false;

    if buttons.pressed(MouseButton::Left) && delta != Vec2::ZERO {
        orbit.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        orbit.pitch = (orbit.pitch - delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(-ORBIT_MAX_PITCH, ORBIT_MAX_PITCH);
        changed = true;
    } else if buttons.pressed(MouseButton::Right) && delta != Vec2::ZERO {
        let rotation =
            Quat::from_axis_angle(Vec3::Y, orbit.yaw) * Quat::from_axis_angle(Vec3::X, orbit.pitch);
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let pan_scale = orbit.radius * ORBIT_PAN_SENSITIVITY;
        orbit.focus += (-delta.x * pan_scale) * right + (delta.y * pan_scale) * up;
        changed = true;
    }

    if scroll != 0.0 {
        orbit.radius = (orbit.radius * (1.0 - scroll * ORBIT_ZOOM_SENSITIVITY))
            .clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
        changed = true;
    }

    if changed {
        orbit.apply_to_transform(&mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_transform_recovers_radius_and_focus_direction() {
        let focus = Vec3::new(0.2, 0.1, -0.3);
        let transform = Transform::from_xyz(0.2, 0.9, 2.2).looking_at(focus, Vec3::Y);
        let orbit = OrbitCamera::from_transform(&transform, focus);

        assert!((orbit.radius - (transform.translation - focus).length()).abs() < 1e-5);
        assert_eq!(orbit.focus, focus);
    }

    #[test]
    fn apply_to_transform_round_trips_through_from_transform() {
        let orbit = OrbitCamera {
            focus: Vec3::new(0.0, 0.2, 0.0),
            radius: 2.4,
            yaw: 0.7,
            pitch: 0.3,
        };
        let mut transform = Transform::default();
        orbit.apply_to_transform(&mut transform);

        let recovered = OrbitCamera::from_transform(&transform, orbit.focus);
        assert!((recovered.radius - orbit.radius).abs() < 1e-4);
        assert!((recovered.yaw - orbit.yaw).abs() < 1e-4);
        assert!((recovered.pitch - orbit.pitch).abs() < 1e-4);
    }

    #[test]
    fn apply_to_transform_keeps_camera_at_radius_from_focus() {
        let orbit = OrbitCamera {
            focus: Vec3::new(1.0, 0.0, -1.0),
            radius: 3.0,
            yaw: -1.1,
            pitch: 0.5,
        };
        let mut transform = Transform::default();
        orbit.apply_to_transform(&mut transform);
        assert!(((transform.translation - orbit.focus).length() - 3.0).abs() < 1e-5);
    }
}
