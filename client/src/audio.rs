//! Audio system for character sounds
//!
//! Plays the controller's sound cues and runs the repeating clock behind
//! footsteps. Updated for Bevy 0.17

use bevy::audio::Volume;
use bevy::prelude::*;
use controller::{
    AnimationTrigger, ControllerEvent, ControllerState, SoundCue, TimerCommand, TimerHandle,
};

use crate::player::{ControllerSignal, PlayerBody};

/// Shortest repeat the clock accepts (seconds)
const MIN_FOOTSTEP_INTERVAL: f32 = 0.05;

/// Footstep variations, indexed by `FootstepCue`
pub const FOOTSTEP_SOUNDS: [&str; 4] = [
    "audio/sfx/footstep_01.ogg",
    "audio/sfx/footstep_02.ogg",
    "audio/sfx/footstep_03.ogg",
    "audio/sfx/footstep_04.ogg",
];

/// Resource holding all loaded audio assets
#[derive(Resource)]
pub struct GameAudio {
    pub footsteps: Vec<Handle<AudioSource>>,
    pub jump: Handle<AudioSource>,
    pub land: Handle<AudioSource>,
    pub hurt: Handle<AudioSource>,
    pub death: Handle<AudioSource>,
    pub reload: Handle<AudioSource>,
    pub ammo_pickup: Handle<AudioSource>,
    pub health_pickup: Handle<AudioSource>,
    pub empty_trigger: Handle<AudioSource>,
    pub gun_shot: Handle<AudioSource>,
}

impl GameAudio {
    fn cue(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        match cue {
            SoundCue::Footstep(step) => self.footsteps.get(step.0),
            SoundCue::Jump => Some(&self.jump),
            SoundCue::Land => Some(&self.land),
            SoundCue::IncomingDamage => Some(&self.hurt),
            SoundCue::Death => Some(&self.death),
            SoundCue::Reload => Some(&self.reload),
            SoundCue::AmmoPickup => Some(&self.ammo_pickup),
            SoundCue::HealthPickup => Some(&self.health_pickup),
            SoundCue::EmptyTrigger => Some(&self.empty_trigger),
        }
    }
}

/// Load all audio assets on startup
pub fn setup_audio(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("Audio system: Loading audio assets...");

    let footsteps = FOOTSTEP_SOUNDS
        .iter()
        .map(|path| asset_server.load(*path))
        .collect();

    commands.insert_resource(GameAudio {
        footsteps,
        jump: asset_server.load("audio/sfx/jump.ogg"),
        land: asset_server.load("audio/sfx/land.ogg"),
        hurt: asset_server.load("audio/sfx/hurt.ogg"),
        death: asset_server.load("audio/sfx/death.ogg"),
        reload: asset_server.load("audio/sfx/reload.ogg"),
        ammo_pickup: asset_server.load("audio/sfx/ammo_pickup.ogg"),
        health_pickup: asset_server.load("audio/sfx/health_pickup.ogg"),
        empty_trigger: asset_server.load("audio/sfx/empty_trigger.ogg"),
        gun_shot: asset_server.load("audio/sfx/gun_shot.ogg"),
    });
}

fn play(commands: &mut Commands, handle: &Handle<AudioSource>, volume: f32) {
    commands.spawn((
        AudioPlayer::new(handle.clone()),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(volume)),
    ));
}

/// Play every sound cue the controller asked for, plus the shot itself.
pub fn play_controller_sounds(
    mut commands: Commands,
    audio: Option<Res<GameAudio>>,
    mut signals: MessageReader<ControllerSignal>,
) {
    let Some(audio) = audio else {
        signals.clear();
        return;
    };

    for ControllerSignal(event) in signals.read() {
        match *event {
            ControllerEvent::PlaySound(cue) => {
                let volume = match cue {
                    SoundCue::Footstep(_) => 0.35,
                    _ => 0.7,
                };
                match audio.cue(cue) {
                    Some(handle) => play(&mut commands, handle, volume),
                    None => warn!("No sound loaded for {:?}", cue),
                }
            }
            ControllerEvent::TriggerAnimation(AnimationTrigger::Fire) => {
                play(&mut commands, &audio.gun_shot, 0.7);
            }
            _ => {}
        }
    }
}

// =============================================================================
// FOOTSTEP CLOCK
// =============================================================================

/// One running repeating timer
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScheduledFootsteps {
    handle: TimerHandle,
    /// Seconds until the next firing
    next_in: f32,
    interval: f32,
}

/// Host-side repeating timer the controller starts and cancels by handle.
/// At most one is ever running.
#[derive(Resource, Default, Debug)]
pub struct FootstepClock {
    scheduled: Option<ScheduledFootsteps>,
}

impl FootstepClock {
    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Start {
                handle,
                first_delay,
                interval,
            } => {
                self.scheduled = Some(ScheduledFootsteps {
                    handle,
                    // f32::max also replaces NaN
                    next_in: first_delay.max(0.0),
                    interval: interval.max(MIN_FOOTSTEP_INTERVAL),
                });
            }
            TimerCommand::Cancel { handle } => {
                if self.running() == Some(handle) {
                    self.scheduled = None;
                }
            }
        }
    }

    pub fn running(&self) -> Option<TimerHandle> {
        self.scheduled.map(|s| s.handle)
    }

    /// Advance by `delta` seconds. Returns how many times the timer fired.
    pub fn advance(&mut self, delta: f32) -> u32 {
        let Some(scheduled) = self.scheduled.as_mut() else {
            return 0;
        };
        scheduled.next_in -= delta;
        let mut fired = 0;
        while scheduled.next_in <= 0.0 {
            fired += 1;
            scheduled.next_in += scheduled.interval;
        }
        fired
    }
}

/// Start and cancel footstep timers on the controller's request
pub fn apply_footstep_commands(
    mut clock: ResMut<FootstepClock>,
    mut signals: MessageReader<ControllerSignal>,
) {
    for ControllerSignal(event) in signals.read() {
        if let ControllerEvent::Footsteps(command) = event {
            clock.apply(*command);
        }
    }
}

/// Tick the footstep clock and hand each firing back to the controller
pub fn tick_footstep_clock(
    time: Res<Time>,
    mut clock: ResMut<FootstepClock>,
    mut players: Query<&mut ControllerState, With<PlayerBody>>,
    mut signals: MessageWriter<ControllerSignal>,
) {
    let fired = clock.advance(time.delta_secs());
    let Some(handle) = clock.running() else {
        return;
    };
    if fired == 0 {
        return;
    }

    let mut rng = rand::thread_rng();
    for mut state in players.iter_mut() {
        // A long frame only plays one step
        if let Some(event) = state.on_footstep_timer(handle, &mut rng) {
            signals.write(ControllerSignal(event));
        }
    }
}

/// Silence footsteps for good
pub fn stop_footstep_clock(mut clock: ResMut<FootstepClock>) {
    *clock = FootstepClock::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use controller::FootstepScheduler;

    fn start_command() -> (FootstepScheduler, TimerCommand) {
        let mut scheduler = FootstepScheduler::new(FOOTSTEP_SOUNDS.len(), 0.4);
        let mut commands = Vec::new();
        scheduler.set_moving(true, &mut commands);
        (scheduler, commands[0])
    }

    #[test]
    fn test_clock_fires_immediately_then_repeats() {
        let (_, start) = start_command();
        let mut clock = FootstepClock::default();
        clock.apply(start);

        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(0.2), 0);
        assert_eq!(clock.advance(0.2), 1);
        assert_eq!(clock.advance(0.85), 2);
    }

    #[test]
    fn test_clock_ignores_cancel_for_other_handle() {
        let (mut scheduler, start) = start_command();
        let mut clock = FootstepClock::default();
        clock.apply(start);

        let mut commands = Vec::new();
        scheduler.set_moving(false, &mut commands);
        scheduler.set_moving(true, &mut commands);
        for command in commands {
            clock.apply(command);
        }
        // Old timer cancelled, new one running
        assert_eq!(clock.running(), scheduler.active_timer());

        clock.apply(start);
        clock.apply(TimerCommand::Cancel {
            handle: scheduler.active_timer().unwrap(),
        });
        assert!(clock.running().is_some());
    }

    #[test]
    fn test_degenerate_interval_is_floored() {
        let (_, start) = start_command();
        let TimerCommand::Start { handle, .. } = start else {
            panic!("expected a start command");
        };
        let mut clock = FootstepClock::default();
        clock.apply(TimerCommand::Start {
            handle,
            first_delay: f32::NAN,
            interval: f32::NAN,
        });
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(0.99), 19);
    }

    #[test]
    fn test_idle_clock_never_fires() {
        let mut clock = FootstepClock::default();
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.running(), None);
    }
}
