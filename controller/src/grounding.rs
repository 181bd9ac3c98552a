//! Ground detection by a downward sphere cast.
//!
//! The cast itself belongs to whatever physics the host runs; the controller
//! only decides where to cast from, how far, and what a hit means.

use bevy::prelude::*;

/// Physics query used to decide whether the character stands on something.
pub trait GroundProbe {
    /// Sweep a sphere of `radius` from `origin` straight down (-Y).
    /// True when anything is hit within `max_distance`.
    fn sphere_cast_down(&self, origin: Vec3, radius: f32, max_distance: f32) -> bool;
}

impl<F> GroundProbe for F
where
    F: Fn(Vec3, f32, f32) -> bool,
{
    fn sphere_cast_down(&self, origin: Vec3, radius: f32, max_distance: f32) -> bool {
        self(origin, radius, max_distance)
    }
}

/// Sphere cast parameters for a capsule-shaped character
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeShape {
    pub origin: Vec3,
    pub radius: f32,
    pub max_distance: f32,
}

impl ProbeShape {
    /// Probe from the capsule center, reaching `epsilon` past the bottom
    /// hemisphere: `height / 2 - radius + epsilon`.
    pub fn for_capsule(center: Vec3, height: f32, radius: f32, epsilon: f32) -> Self {
        Self {
            origin: center,
            radius,
            max_distance: (height * 0.5 - radius + epsilon).max(0.0),
        }
    }

    pub fn cast(&self, probe: &impl GroundProbe) -> bool {
        probe.sphere_cast_down(self.origin, self.radius, self.max_distance)
    }
}

/// How the grounded state changed over one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundTransition {
    StayedGrounded,
    StayedAirborne,
    Landed,
    LeftGround,
}

/// Grounded state for this tick and the previous one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundContact {
    pub grounded: bool,
    pub was_grounded: bool,
}

impl Default for GroundContact {
    /// Characters spawn standing, so the first grounded tick is not a landing.
    fn default() -> Self {
        Self {
            grounded: true,
            was_grounded: true,
        }
    }
}

impl GroundContact {
    /// Record this tick's probe result.
    pub fn update(&mut self, grounded_now: bool) -> GroundTransition {
        self.was_grounded = self.grounded;
        self.grounded = grounded_now;
        match (self.was_grounded, self.grounded) {
            (true, true) => GroundTransition::StayedGrounded,
            (false, false) => GroundTransition::StayedAirborne,
            (false, true) => GroundTransition::Landed,
            (true, false) => GroundTransition::LeftGround,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_probe_distance_reaches_past_capsule_bottom() {
        let shape = ProbeShape::for_capsule(Vec3::new(0.0, 5.0, 0.0), 2.0, 0.5, 0.1);
        assert!((shape.max_distance - 0.6).abs() < 1e-6);
        assert!((shape.radius - 0.5).abs() < 1e-6);
        assert_eq!(shape.origin, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_probe_passes_shape_to_host() {
        let seen = Cell::new(None);
        let probe = |origin: Vec3, radius: f32, distance: f32| {
            seen.set(Some((origin, radius, distance)));
            true
        };
        let shape = ProbeShape::for_capsule(Vec3::Y, 1.8, 0.3, 0.1);
        assert!(shape.cast(&probe));
        let (origin, radius, distance) = seen.get().unwrap();
        assert_eq!(origin, Vec3::Y);
        assert!((radius - 0.3).abs() < 1e-6);
        assert!((distance - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_transitions() {
        let mut contact = GroundContact::default();
        assert_eq!(contact.update(true), GroundTransition::StayedGrounded);
        assert_eq!(contact.update(false), GroundTransition::LeftGround);
        assert_eq!(contact.update(false), GroundTransition::StayedAirborne);
        assert_eq!(contact.update(true), GroundTransition::Landed);
        assert_eq!(contact.update(true), GroundTransition::StayedGrounded);
    }
}
