//! The locomotion & inventory controller.
//!
//! `ControllerState` owns every piece of per-character state. The host calls:
//! - [`ControllerState::tick_variable`] once per rendered frame (edge input,
//!   weapon, footstep gait, cursor),
//! - [`ControllerState::tick_fixed`] once per physics step (look, movement,
//!   grounding, jump),
//! - [`ControllerState::on_contact`] for every contact its physics reports,
//! - [`ControllerState::on_footstep_timer`] whenever a footstep timer fires,
//!
//! and carries out the returned [`ControllerEvent`]s.

use bevy::prelude::*;
use rand::Rng;

use crate::config::ControllerConfig;
use crate::contact::{ContactEvent, ContactTag};
use crate::cursor::{CursorLock, CursorPresentation};
use crate::footsteps::{FootstepScheduler, Gait, TimerHandle};
use crate::grounding::{GroundContact, GroundProbe, GroundTransition, ProbeShape};
use crate::inventory::{AmmoInventory, DamageOutcome, FireOutcome, Health, ReloadOutcome, Weapon};
use crate::orientation::OrientationState;
use crate::player::is_moving;
use crate::signals::{AnimationFlag, AnimationTrigger, ControllerEvent, SoundCue};

/// Per-frame input. Every `*_pressed` / `*_released` field is an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VariableInput {
    pub forward_axis: f32,
    pub strafe_axis: f32,
    pub jump_pressed: bool,
    pub reload_pressed: bool,
    pub toggle_arm_pressed: bool,
    pub fire_pressed: bool,
    pub primary_released: bool,
    pub escape_released: bool,
    /// The host's fire animation is still playing
    pub fire_animation_active: bool,
}

/// Per-physics-step input
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedInput {
    /// Seconds in this step
    pub elapsed: f32,
    pub forward_axis: f32,
    pub strafe_axis: f32,
    /// Look input accumulated since the previous step (+x right, +y down)
    pub mouse_delta: Vec2,
    /// Capsule center before this step's movement
    pub capsule_center: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableTickOutput {
    pub events: Vec<ControllerEvent>,
    pub cursor: CursorPresentation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixedTickOutput {
    /// Offset to add to the character's position
    pub translation: Vec3,
    /// New local rotation of the body
    pub body_rotation: Quat,
    /// New local rotation of the camera
    pub camera_rotation: Quat,
    pub events: Vec<ControllerEvent>,
}

#[derive(Component, Clone, Debug)]
pub struct ControllerState {
    config: ControllerConfig,
    orientation: OrientationState,
    ground: GroundContact,
    weapon: Weapon,
    health: Health,
    footsteps: FootstepScheduler,
    cursor: CursorLock,
    /// Jump pressed since the last physics step
    jump_requested: bool,
}

impl ControllerState {
    /// Build a fresh character. `footstep_cue_count` is the number of
    /// footstep sounds the host can play. The config is validated first.
    pub fn new(config: ControllerConfig, footstep_cue_count: usize) -> Self {
        let config = config.validated();
        let ammo = AmmoInventory::new(
            config.max_reserve_ammo,
            config.max_clip_size,
            config.starting_reserve_ammo,
            config.starting_clip_ammo,
        );
        Self {
            orientation: OrientationState::default(),
            ground: GroundContact::default(),
            weapon: Weapon::new(config.start_armed, ammo),
            health: Health::new(config.max_health, config.starting_health),
            footsteps: FootstepScheduler::new(footstep_cue_count, config.footstep_interval),
            cursor: CursorLock::new(config.lock_cursor),
            jump_requested: false,
            config,
        }
    }

    /// Start from an existing pose (e.g. the scene's initial transforms).
    pub fn with_orientation(mut self, orientation: OrientationState) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn orientation(&self) -> &OrientationState {
        &self.orientation
    }

    pub fn ground(&self) -> &GroundContact {
        &self.ground
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn ammo(&self) -> &AmmoInventory {
        &self.weapon.ammo
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn gait(&self) -> Gait {
        self.footsteps.gait()
    }

    pub fn footsteps(&self) -> &FootstepScheduler {
        &self.footsteps
    }

    pub fn cursor(&self) -> &CursorLock {
        &self.cursor
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    // =========================================================================
    // VARIABLE TICK
    // =========================================================================

    /// Frame-rate work: footstep gait, holster, reload, fire, jump latch and
    /// the cursor lock.
    pub fn tick_variable(&mut self, input: &VariableInput) -> VariableTickOutput {
        let mut events = Vec::new();

        self.update_gait(input, &mut events);

        if input.toggle_arm_pressed {
            let armed = self.weapon.toggle_holster();
            events.push(ControllerEvent::SetAnimationFlag {
                flag: AnimationFlag::Arm,
                value: armed,
            });
        }

        if input.reload_pressed {
            self.reload(&mut events);
        }

        if input.fire_pressed {
            self.fire(input.fire_animation_active, &mut events);
        }

        // Consumed by the next physics step
        if input.jump_pressed {
            self.jump_requested = true;
        }

        let cursor = self
            .cursor
            .update(input.escape_released, input.primary_released);

        VariableTickOutput { events, cursor }
    }

    fn update_gait(&mut self, input: &VariableInput, events: &mut Vec<ControllerEvent>) {
        let moving = is_moving(input.forward_axis, input.strafe_axis);
        let mut commands = Vec::new();
        if let Some(gait) = self.footsteps.set_moving(moving, &mut commands) {
            events.push(ControllerEvent::SetAnimationFlag {
                flag: AnimationFlag::Running,
                value: gait == Gait::Walking,
            });
        }
        events.extend(commands.into_iter().map(ControllerEvent::Footsteps));
    }

    fn reload(&mut self, events: &mut Vec<ControllerEvent>) {
        match self.weapon.reload() {
            ReloadOutcome::Reloaded { transferred } => {
                events.push(ControllerEvent::TriggerAnimation(AnimationTrigger::Reload));
                events.push(ControllerEvent::PlaySound(SoundCue::Reload));
                info!(
                    "Reloaded {} rounds: {} in clip, {} left",
                    transferred,
                    self.weapon.ammo.clip(),
                    self.weapon.ammo.reserve()
                );
            }
            outcome @ (ReloadOutcome::ClipFull
            | ReloadOutcome::NoReserve
            | ReloadOutcome::Holstered) => {
                debug!("Reload ignored: {:?}", outcome);
                events.push(ControllerEvent::PlaySound(SoundCue::EmptyTrigger));
            }
        }
    }

    fn fire(&mut self, fire_animation_active: bool, events: &mut Vec<ControllerEvent>) {
        match self.weapon.fire(fire_animation_active) {
            FireOutcome::Fired { clip_remaining } => {
                events.push(ControllerEvent::TriggerAnimation(AnimationTrigger::Fire));
                debug!("Fired, {} in clip", clip_remaining);
            }
            FireOutcome::DryFire => {
                events.push(ControllerEvent::PlaySound(SoundCue::EmptyTrigger));
            }
            FireOutcome::Holstered | FireOutcome::Busy => {}
        }
    }

    // =========================================================================
    // FIXED TICK
    // =========================================================================

    /// Physics-rate work: look, move, probe the ground, jump or land.
    pub fn tick_fixed(&mut self, input: &FixedInput, probe: &impl GroundProbe) -> FixedTickOutput {
        let mut events = Vec::new();
        let config = &self.config;

        self.orientation.apply_look(
            input.mouse_delta,
            config.turn_speed,
            config.min_pitch_degrees,
            config.max_pitch_degrees,
        );

        let translation = self.orientation.movement_delta(
            input.forward_axis,
            input.strafe_axis,
            config.move_speed,
            input.elapsed,
            config.planar_movement,
        );

        let shape = ProbeShape::for_capsule(
            input.capsule_center + translation,
            config.capsule_height,
            config.capsule_radius,
            config.ground_probe_epsilon,
        );
        let transition = self.ground.update(shape.cast(probe));
        let jump = std::mem::take(&mut self.jump_requested);

        if jump && self.ground.grounded {
            events.push(ControllerEvent::Impulse(Vec3::Y * config.jump_height));
            events.push(ControllerEvent::PlaySound(SoundCue::Jump));
            let mut commands = Vec::new();
            self.footsteps.suspend(&mut commands);
            events.extend(commands.into_iter().map(ControllerEvent::Footsteps));
        } else if transition == GroundTransition::Landed {
            events.push(ControllerEvent::Landed);
            events.push(ControllerEvent::PlaySound(SoundCue::Land));
            let mut commands = Vec::new();
            self.footsteps.resume(&mut commands);
            events.extend(commands.into_iter().map(ControllerEvent::Footsteps));
        }

        FixedTickOutput {
            translation,
            body_rotation: self.orientation.body_yaw,
            camera_rotation: self.orientation.camera_pitch,
            events,
        }
    }

    // =========================================================================
    // CONTACTS
    // =========================================================================

    /// Pickups and hazards. Hazards hurt on every call, begin or persist.
    pub fn on_contact(&mut self, contact: &ContactEvent) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        match contact.tag {
            ContactTag::Ammo => {
                if self.weapon.ammo.is_reserve_full() || self.health.is_dead() {
                    self.full_pickup(contact, &mut events);
                } else {
                    let gained = self.weapon.ammo.add_reserve(self.config.ammo_pickup_size);
                    events.push(ControllerEvent::Destroy(contact.object));
                    events.push(ControllerEvent::PlaySound(SoundCue::AmmoPickup));
                    info!("Got {} ammo ({} in reserve)", gained, self.weapon.ammo.reserve());
                }
            }
            ContactTag::MedKit => {
                if self.health.is_full() || self.health.is_dead() {
                    self.full_pickup(contact, &mut events);
                } else {
                    let healed = self.health.heal(self.config.health_pickup_amount);
                    events.push(ControllerEvent::Destroy(contact.object));
                    events.push(ControllerEvent::PlaySound(SoundCue::HealthPickup));
                    info!("Healed {} ({} hp)", healed, self.health.current());
                }
            }
            ContactTag::Lava => match self.health.take_damage(self.config.hazard_damage) {
                DamageOutcome::Hurt { remaining } => {
                    events.push(ControllerEvent::PlaySound(SoundCue::IncomingDamage));
                    info!("Took {} damage ({} hp)", self.config.hazard_damage, remaining);
                }
                DamageOutcome::Died => {
                    events.push(ControllerEvent::PlaySound(SoundCue::Death));
                    events.push(ControllerEvent::Died);
                    info!("Player died");
                }
                DamageOutcome::AlreadyDead => {}
            },
            ContactTag::Other(_) => {}
        }
        events
    }

    /// A pickup touched with nothing to gain: left in the scene unless the
    /// config says to consume it anyway.
    fn full_pickup(&self, contact: &ContactEvent, events: &mut Vec<ControllerEvent>) {
        if self.config.consume_pickups_when_full {
            events.push(ControllerEvent::Destroy(contact.object));
        }
        debug!("Ignored {} pickup at capacity", contact.tag.as_str());
    }

    // =========================================================================
    // FOOTSTEPS & CURSOR
    // =========================================================================

    /// The host clock fired `handle`. Returns the sound to play, if any.
    pub fn on_footstep_timer(
        &mut self,
        handle: TimerHandle,
        rng: &mut impl Rng,
    ) -> Option<ControllerEvent> {
        self.footsteps
            .fire(handle, rng)
            .map(|cue| ControllerEvent::PlaySound(SoundCue::Footstep(cue)))
    }

    /// External pointer-lock override (e.g. a pause menu opening).
    pub fn set_cursor_lock(&mut self, value: bool) -> CursorPresentation {
        self.cursor.set_lock(value)
    }
}
