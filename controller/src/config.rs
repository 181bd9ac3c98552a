//! Controller tuning, loaded from a versioned RON file.
//!
//! Every field has a default taken from the shipped character, so a config
//! file only needs the values it wants to override.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::player::{GROUND_PROBE_EPSILON, PLAYER_HEIGHT, PLAYER_RADIUS};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Allowed footstep interval (seconds)
pub const FOOTSTEP_INTERVAL_RANGE: (f32, f32) = (0.1, 2.0);

/// Allowed ammo crate size
pub const AMMO_PICKUP_RANGE: (u32, u32) = (8, 24);

/// Allowed health kit amount
pub const HEALTH_PICKUP_RANGE: (u32, u32) = (10, 100);

/// Tuning for one controlled character
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub version: u32,

    // --- Movement ---
    /// Units per second at full axis deflection
    pub move_speed: f32,
    /// Upward impulse applied on jump
    pub jump_height: f32,
    /// Degrees per look-axis unit
    pub turn_speed: f32,
    /// Lowest camera pitch (looking down), degrees
    pub min_pitch_degrees: f32,
    /// Highest camera pitch (looking up), degrees
    pub max_pitch_degrees: f32,
    /// Ignore camera pitch when moving (walk along the ground, not into the sky)
    pub planar_movement: bool,

    // --- Body ---
    pub capsule_height: f32,
    pub capsule_radius: f32,
    pub ground_probe_epsilon: f32,

    // --- Audio ---
    /// Seconds between footstep sounds while walking
    pub footstep_interval: f32,

    // --- Inventory ---
    pub ammo_pickup_size: u32,
    pub health_pickup_amount: u32,
    pub max_reserve_ammo: u32,
    pub max_clip_size: u32,
    pub starting_reserve_ammo: u32,
    pub starting_clip_ammo: u32,
    pub max_health: u32,
    pub starting_health: u32,
    /// Damage per hazard contact
    pub hazard_damage: u32,
    /// Destroy pickups touched while already at capacity (no effect either way)
    pub consume_pickups_when_full: bool,
    pub start_armed: bool,

    // --- Cursor ---
    pub lock_cursor: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            move_speed: 6.0,
            jump_height: 100.0,
            turn_speed: 5.0,
            min_pitch_degrees: -90.0,
            max_pitch_degrees: 90.0,
            planar_movement: false,
            capsule_height: PLAYER_HEIGHT,
            capsule_radius: PLAYER_RADIUS,
            ground_probe_epsilon: GROUND_PROBE_EPSILON,
            footstep_interval: 0.4,
            ammo_pickup_size: 12,
            health_pickup_amount: 30,
            max_reserve_ammo: 48,
            max_clip_size: 10,
            starting_reserve_ammo: 0,
            starting_clip_ammo: 0,
            max_health: 100,
            starting_health: 10,
            hazard_damage: 10,
            consume_pickups_when_full: false,
            start_armed: false,
            lock_cursor: true,
        }
    }
}

impl ControllerConfig {
    /// Parse a config from RON text and clamp it into range.
    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        let config: ControllerConfig =
            ron::from_str(text).map_err(|e| format!("failed to parse controller config: {e}"))?;
        if config.version != CONFIG_VERSION {
            return Err(format!(
                "Unsupported controller config version {} (expected {})",
                config.version, CONFIG_VERSION
            ));
        }
        Ok(config.validated())
    }

    /// Load a config from a RON file on disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read {path:?}: {e}"))?;
        Self::from_ron_str(&text)
    }

    /// Clamp every field into the range the controller supports.
    ///
    /// Out-of-range values are not an error: they are pulled to the nearest
    /// legal value and logged.
    pub fn validated(mut self) -> Self {
        self.replace_non_finite();

        let (lo, hi) = FOOTSTEP_INTERVAL_RANGE;
        if !(lo..=hi).contains(&self.footstep_interval) {
            warn!(
                "footstep_interval {} outside [{lo}, {hi}], clamping",
                self.footstep_interval
            );
            self.footstep_interval = self.footstep_interval.clamp(lo, hi);
        }

        let (lo, hi) = AMMO_PICKUP_RANGE;
        if !(lo..=hi).contains(&self.ammo_pickup_size) {
            warn!("ammo_pickup_size {} outside [{lo}, {hi}], clamping", self.ammo_pickup_size);
            self.ammo_pickup_size = self.ammo_pickup_size.clamp(lo, hi);
        }

        let (lo, hi) = HEALTH_PICKUP_RANGE;
        if !(lo..=hi).contains(&self.health_pickup_amount) {
            warn!(
                "health_pickup_amount {} outside [{lo}, {hi}], clamping",
                self.health_pickup_amount
            );
            self.health_pickup_amount = self.health_pickup_amount.clamp(lo, hi);
        }

        self.min_pitch_degrees = self.min_pitch_degrees.clamp(-180.0, 180.0);
        self.max_pitch_degrees = self.max_pitch_degrees.clamp(-180.0, 180.0);
        if self.min_pitch_degrees > self.max_pitch_degrees {
            warn!(
                "min_pitch_degrees {} > max_pitch_degrees {}, swapping",
                self.min_pitch_degrees, self.max_pitch_degrees
            );
            std::mem::swap(&mut self.min_pitch_degrees, &mut self.max_pitch_degrees);
        }

        self.move_speed = self.move_speed.max(0.0);
        self.jump_height = self.jump_height.max(0.0);
        self.capsule_radius = self.capsule_radius.max(0.0);
        // A capsule is at least as tall as its two hemispheres
        self.capsule_height = self.capsule_height.max(self.capsule_radius * 2.0);
        self.ground_probe_epsilon = self.ground_probe_epsilon.max(0.0);

        self.max_clip_size = self.max_clip_size.max(1);
        self.max_health = self.max_health.max(1);
        self.starting_reserve_ammo = self.starting_reserve_ammo.min(self.max_reserve_ammo);
        self.starting_clip_ammo = self.starting_clip_ammo.min(self.max_clip_size);
        self.starting_health = self.starting_health.min(self.max_health);

        self
    }

    /// NaN or infinite floats fall back to their defaults.
    fn replace_non_finite(&mut self) {
        let defaults = Self::default();
        let fields = [
            ("move_speed", &mut self.move_speed, defaults.move_speed),
            ("jump_height", &mut self.jump_height, defaults.jump_height),
            ("turn_speed", &mut self.turn_speed, defaults.turn_speed),
            ("min_pitch_degrees", &mut self.min_pitch_degrees, defaults.min_pitch_degrees),
            ("max_pitch_degrees", &mut self.max_pitch_degrees, defaults.max_pitch_degrees),
            ("capsule_height", &mut self.capsule_height, defaults.capsule_height),
            ("capsule_radius", &mut self.capsule_radius, defaults.capsule_radius),
            (
                "ground_probe_epsilon",
                &mut self.ground_probe_epsilon,
                defaults.ground_probe_epsilon,
            ),
            ("footstep_interval", &mut self.footstep_interval, defaults.footstep_interval),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() {
                warn!("{name} {} is not a finite number, using {default}", *value);
                *value = default;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ControllerConfig::from_ron_str("(version: 1, move_speed: 9.5)").unwrap();
        assert!((config.move_speed - 9.5).abs() < 1e-6);
        assert_eq!(config.max_clip_size, 10);
        assert_eq!(config.max_reserve_ammo, 48);
        assert_eq!(config.starting_health, 10);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let err = ControllerConfig::from_ron_str("(version: 7)").unwrap_err();
        assert!(err.contains("version 7"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(ControllerConfig::from_ron_str("not ron at all {").is_err());
    }

    #[test]
    fn test_ranges_clamped() {
        let config = ControllerConfig {
            footstep_interval: 5.0,
            ammo_pickup_size: 2,
            health_pickup_amount: 500,
            min_pitch_degrees: 60.0,
            max_pitch_degrees: -60.0,
            starting_health: 1000,
            starting_clip_ammo: 99,
            ..default()
        }
        .validated();

        assert!((config.footstep_interval - 2.0).abs() < 1e-6);
        assert_eq!(config.ammo_pickup_size, 8);
        assert_eq!(config.health_pickup_amount, 100);
        assert!(config.min_pitch_degrees <= config.max_pitch_degrees);
        assert_eq!(config.starting_health, config.max_health);
        assert_eq!(config.starting_clip_ammo, config.max_clip_size);
    }

    #[test]
    fn test_non_finite_values_use_defaults() {
        let text = "(version: 1, min_pitch_degrees: NaN, footstep_interval: NaN)";
        let config = ControllerConfig::from_ron_str(text).unwrap();
        assert_eq!(config.min_pitch_degrees, -90.0);
        assert!((config.footstep_interval - 0.4).abs() < 1e-6);

        let config = ControllerConfig {
            max_pitch_degrees: f32::INFINITY,
            move_speed: f32::NEG_INFINITY,
            ..default()
        }
        .validated();
        assert_eq!(config.max_pitch_degrees, 90.0);
        assert!((config.move_speed - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_movement_follows_camera() {
        assert!(!ControllerConfig::default().planar_movement);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = ControllerConfig::load_from_file("/definitely/not/here.ron").unwrap_err();
        assert!(err.contains("failed to read"));
    }
}
