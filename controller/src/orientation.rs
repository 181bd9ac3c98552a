//! Mouse-look and camera-relative movement.
//!
//! Axes follow Bevy: +X right, +Y up, -Z forward. Positive pitch looks up.
//! The body only ever yaws; the camera (a child of the body) only ever
//! pitches, so the camera's world rotation is `body_yaw * camera_pitch`.

use bevy::prelude::*;

/// Below this, a quaternion's `w` is treated as zero (rotation of ±180°).
const ROTATION_EPSILON: f32 = 1e-6;

/// Camera pitch and body yaw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationState {
    /// Local rotation of the camera about its X axis
    pub camera_pitch: Quat,
    /// Local rotation of the body about the world Y axis
    pub body_yaw: Quat,
}

impl Default for OrientationState {
    fn default() -> Self {
        Self {
            camera_pitch: Quat::IDENTITY,
            body_yaw: Quat::IDENTITY,
        }
    }
}

impl OrientationState {
    pub fn new(camera_pitch: Quat, body_yaw: Quat) -> Self {
        Self {
            camera_pitch,
            body_yaw,
        }
    }

    /// Apply one tick of look input.
    ///
    /// `mouse_delta.x` positive turns right, `mouse_delta.y` positive (mouse
    /// moved down the screen) looks down. Yaw accumulates freely; pitch is
    /// clamped to `[min_pitch_degrees, max_pitch_degrees]`.
    pub fn apply_look(
        &mut self,
        mouse_delta: Vec2,
        turn_speed: f32,
        min_pitch_degrees: f32,
        max_pitch_degrees: f32,
    ) {
        let yaw_step = (-mouse_delta.x * turn_speed).to_radians();
        let pitch_step = (-mouse_delta.y * turn_speed).to_radians();

        self.body_yaw = (self.body_yaw * Quat::from_rotation_y(yaw_step)).normalize();

        let pitched = self.camera_pitch * Quat::from_rotation_x(pitch_step);
        self.camera_pitch =
            clamp_rotation_around_x(pitched, min_pitch_degrees, max_pitch_degrees);
    }

    /// World-space rotation of the camera
    pub fn camera_rotation(&self) -> Quat {
        self.body_yaw * self.camera_pitch
    }

    /// Current camera pitch in degrees
    pub fn pitch_degrees(&self) -> f32 {
        pitch_degrees(self.camera_pitch)
    }

    /// Forward and right vectors movement is measured against.
    ///
    /// With `planar` set, camera pitch is ignored so looking up or down does
    /// not send the character into the air or the floor.
    pub fn movement_basis(&self, planar: bool) -> (Vec3, Vec3) {
        let rotation = if planar {
            self.body_yaw
        } else {
            self.camera_rotation()
        };
        (rotation * Vec3::NEG_Z, rotation * Vec3::X)
    }

    /// Position offset for one tick of movement input
    pub fn movement_delta(
        &self,
        forward_axis: f32,
        strafe_axis: f32,
        move_speed: f32,
        dt: f32,
        planar: bool,
    ) -> Vec3 {
        let forward_axis = forward_axis.clamp(-1.0, 1.0);
        let strafe_axis = strafe_axis.clamp(-1.0, 1.0);
        let (forward, right) = self.movement_basis(planar);
        (forward * forward_axis + right * strafe_axis) * move_speed * dt
    }
}

/// Angle of a rotation about X, in degrees, within [-180, 180].
pub fn pitch_degrees(q: Quat) -> f32 {
    // q and -q are the same rotation; keep w >= 0 so the half angle is within ±90°
    let q = if q.w < 0.0 { -q } else { q };
    if q.w > ROTATION_EPSILON {
        2.0 * (q.x / q.w).atan().to_degrees()
    } else {
        180.0_f32.copysign(q.x)
    }
}

/// Clamp a rotation about the X axis to `[min_degrees, max_degrees]`.
///
/// The rotation is reduced to a single angle through its tangent half angle
/// (`x / w`), clamped, and rebuilt. Working on the angle instead of Euler
/// components keeps the result free of gimbal flips. A `w` of ~0 (the
/// rotation sits at ±180°) takes the bound on the side of `x` rather than
/// dividing by it. Inverted limits are swapped; a NaN limit is ignored.
pub fn clamp_rotation_around_x(q: Quat, min_degrees: f32, max_degrees: f32) -> Quat {
    let (lo, hi) = if min_degrees > max_degrees {
        (max_degrees, min_degrees)
    } else {
        (min_degrees, max_degrees)
    };
    // f32::max / min return the other operand when one is NaN
    let angle = pitch_degrees(q).max(lo).min(hi);
    Quat::from_rotation_x(angle.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_is_clamped_for_huge_deltas() {
        let mut orientation = OrientationState::default();
        for delta in [10_000.0, -25_000.0, 3.0, 99_999.0, -0.5, -1e7, 1e7] {
            orientation.apply_look(Vec2::new(0.0, delta), 5.0, -90.0, 90.0);
            let pitch = orientation.pitch_degrees();
            assert!((-90.0 - 1e-3..=90.0 + 1e-3).contains(&pitch), "pitch {pitch}");
        }
    }

    #[test]
    fn test_pitch_stays_in_narrow_window() {
        let mut orientation = OrientationState::default();
        let deltas = [7.0, 7.0, 7.0, -40.0, -40.0, 13.0, 500.0, -500.0, 1.0];
        for delta in deltas {
            orientation.apply_look(Vec2::new(delta * 0.3, delta), 5.0, -30.0, 45.0);
            let pitch = orientation.pitch_degrees();
            assert!((-30.0 - 1e-3..=45.0 + 1e-3).contains(&pitch), "pitch {pitch}");
        }
    }

    #[test]
    fn test_mouse_up_looks_up() {
        let mut orientation = OrientationState::default();
        orientation.apply_look(Vec2::new(0.0, -2.0), 5.0, -90.0, 90.0);
        assert!((orientation.pitch_degrees() - 10.0).abs() < 1e-3);
        let (forward, _) = orientation.movement_basis(false);
        assert!(forward.y > 0.0);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let mut orientation = OrientationState::default();
        // 4 x 90° = a full turn, well past any pitch-style limit
        for _ in 0..4 {
            orientation.apply_look(Vec2::new(18.0, 0.0), 5.0, -10.0, 10.0);
        }
        let forward = orientation.body_yaw * Vec3::NEG_Z;
        assert!(forward.distance(Vec3::NEG_Z) < 1e-3);

        let mut orientation = OrientationState::default();
        orientation.apply_look(Vec2::new(18.0, 0.0), 5.0, -10.0, 10.0);
        // Turning right faces +X
        let forward = orientation.body_yaw * Vec3::NEG_Z;
        assert!(forward.distance(Vec3::X) < 1e-3);
    }

    #[test]
    fn test_half_turn_does_not_divide_by_zero() {
        let flipped = Quat::from_xyzw(1.0, 0.0, 0.0, 0.0);
        let clamped = clamp_rotation_around_x(flipped, -90.0, 90.0);
        assert!(clamped.is_finite());
        assert!((pitch_degrees(clamped) - 90.0).abs() < 1e-3);

        let flipped = Quat::from_xyzw(-1.0, 0.0, 0.0, 0.0);
        let clamped = clamp_rotation_around_x(flipped, -90.0, 90.0);
        assert!((pitch_degrees(clamped) + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_w_is_same_rotation() {
        let q = Quat::from_rotation_x(30.0_f32.to_radians());
        assert!((pitch_degrees(-q) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_movement_is_camera_relative() {
        let mut orientation = OrientationState::default();
        // Face +X
        orientation.apply_look(Vec2::new(18.0, 0.0), 5.0, -90.0, 90.0);
        let delta = orientation.movement_delta(1.0, 0.0, 6.0, 0.5, true);
        assert!(delta.distance(Vec3::new(3.0, 0.0, 0.0)) < 1e-3);

        // Strafe right while facing +X goes to +Z
        let delta = orientation.movement_delta(0.0, 1.0, 6.0, 0.5, true);
        assert!(delta.distance(Vec3::new(0.0, 0.0, 3.0)) < 1e-3);
    }

    #[test]
    fn test_planar_movement_ignores_pitch() {
        let mut orientation = OrientationState::default();
        orientation.apply_look(Vec2::new(0.0, -9.0), 5.0, -90.0, 90.0);
        let planar = orientation.movement_delta(1.0, 0.0, 1.0, 1.0, true);
        assert!(planar.y.abs() < 1e-5);
        let free = orientation.movement_delta(1.0, 0.0, 1.0, 1.0, false);
        assert!(free.y > 0.5);
    }

    #[test]
    fn test_bad_limits_do_not_panic() {
        let pitched = Quat::from_rotation_x(50f32.to_radians());

        // Inverted limits behave like the ordered pair
        let clamped = clamp_rotation_around_x(pitched, 30.0, -30.0);
        assert!((pitch_degrees(clamped) - 30.0).abs() < 1e-3);

        let clamped = clamp_rotation_around_x(pitched, f32::NAN, 40.0);
        assert!((pitch_degrees(clamped) - 40.0).abs() < 1e-3);

        let clamped = clamp_rotation_around_x(pitched, f32::NAN, f32::NAN);
        assert!((pitch_degrees(clamped) - 50.0).abs() < 1e-3);
    }
}
