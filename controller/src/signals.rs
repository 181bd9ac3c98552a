//! Everything the controller asks its host to do.
//!
//! The controller never touches audio, animation or the scene directly; each
//! tick returns a list of these and the host carries them out in order.

use bevy::prelude::*;

use crate::footsteps::{FootstepCue, TimerCommand};

/// Opaque id of a scene object the host reported a contact with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Sounds the character can make
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Footstep(FootstepCue),
    Jump,
    Land,
    IncomingDamage,
    Death,
    Reload,
    AmmoPickup,
    HealthPickup,
    /// Dry fire, or a reload that had nothing to do
    EmptyTrigger,
}

/// Persistent animation flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationFlag {
    Running,
    Arm,
}

/// One-shot animation triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    Fire,
    Reload,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerEvent {
    PlaySound(SoundCue),
    SetAnimationFlag { flag: AnimationFlag, value: bool },
    TriggerAnimation(AnimationTrigger),
    Footsteps(TimerCommand),
    /// Apply once to the character's rigid body
    Impulse(Vec3),
    /// Remove a consumed pickup from the scene
    Destroy(ObjectId),
    Landed,
    /// Terminal. Emitted exactly once per character.
    Died,
}
