//! Player-related constants and types

/// Axis magnitude below which the character counts as standing still
pub const MOVE_DEADZONE: f32 = 1e-4;

/// Player capsule height (total, including both hemispheres)
pub const PLAYER_HEIGHT: f32 = 2.0;

/// Player capsule radius
pub const PLAYER_RADIUS: f32 = 0.5;

/// Extra reach of the ground probe below the bottom of the capsule
pub const GROUND_PROBE_EPSILON: f32 = 0.1;

/// Mouse delta (pixels) to look-axis units, before `turn_speed` is applied
pub const MOUSE_SENSITIVITY: f32 = 0.1;

/// Spawn position for the player (capsule center)
pub const SPAWN_POSITION: [f32; 3] = [0.0, 2.0, 0.0];

/// Contact tag for ammo crates
pub const AMMO_TAG: &str = "Ammo";

/// Contact tag for health kits
pub const MEDKIT_TAG: &str = "MedKit";

/// Contact tag for damaging surfaces
pub const LAVA_TAG: &str = "Lava";

/// True when either movement axis is outside the deadzone
#[inline]
pub fn is_moving(forward_axis: f32, strafe_axis: f32) -> bool {
    forward_axis.abs() > MOVE_DEADZONE || strafe_axis.abs() > MOVE_DEADZONE
}
