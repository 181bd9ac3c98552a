//! Player body, camera and the two controller ticks
//!
//! The controller decides; this module feeds it input and physics queries
//! and applies what comes back. Everything else it asks for is forwarded as
//! a `ControllerSignal` message.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use controller::{
    ControllerConfig, ControllerEvent, ControllerState, FixedInput, SPAWN_POSITION,
};

use crate::audio::FOOTSTEP_SOUNDS;
use crate::cursor::CursorRequest;
use crate::input::InputState;
use crate::weapon_view::GunAnimation;

/// Body mass. Together with `jump_height` this sets how high a jump goes.
pub const PLAYER_MASS: f32 = 20.0;

/// Camera height above the capsule center
pub const EYE_OFFSET: f32 = 0.7;

// =============================================================================
// COMPONENTS & RESOURCES
// =============================================================================

/// The controlled character's rigid body
#[derive(Component)]
pub struct PlayerBody;

/// First-person camera, a child of the body
#[derive(Component)]
pub struct PlayerCamera;

/// Tunables the player was spawned with
#[derive(Resource, Clone, Debug, Default)]
pub struct ControllerSettings(pub ControllerConfig);

/// A controller request for some other part of the client to carry out
#[derive(Message, Clone, Copy, Debug)]
pub struct ControllerSignal(pub ControllerEvent);

// =============================================================================
// SPAWNING
// =============================================================================

/// Spawn the body with its camera
pub fn spawn_player(mut commands: Commands, settings: Res<ControllerSettings>) {
    let config = &settings.0;
    let half_segment = (config.capsule_height * 0.5 - config.capsule_radius).max(0.0);
    let state = ControllerState::new(config.clone(), FOOTSTEP_SOUNDS.len());

    info!(
        "Spawning player: {} hp, {} in clip, {} in reserve",
        state.health().current(),
        state.ammo().clip(),
        state.ammo().reserve()
    );

    commands
        .spawn((
            PlayerBody,
            state,
            Transform::from_translation(Vec3::from_array(SPAWN_POSITION)),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::capsule_y(half_segment, config.capsule_radius),
            ColliderMassProperties::Mass(PLAYER_MASS),
            LockedAxes::ROTATION_LOCKED,
            Friction::coefficient(0.0),
            ExternalImpulse::default(),
            ActiveEvents::COLLISION_EVENTS,
            Sleeping::disabled(),
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerCamera,
                Camera3d::default(),
                Projection::from(PerspectiveProjection {
                    fov: 75.0_f32.to_radians(),
                    ..default()
                }),
                Transform::from_xyz(0.0, EYE_OFFSET, 0.0),
            ));
        });
}

// =============================================================================
// TICKS
// =============================================================================

/// Frame-rate tick: gait, weapon, jump latch and pointer lock
pub fn run_variable_tick(
    input_state: Res<InputState>,
    guns: Query<&GunAnimation>,
    mut players: Query<&mut ControllerState, With<PlayerBody>>,
    mut cursor_request: ResMut<CursorRequest>,
    mut signals: MessageWriter<ControllerSignal>,
) {
    let fire_animation_active = guns.iter().any(GunAnimation::is_firing);
    let input = input_state.variable_input(fire_animation_active);

    for mut state in players.iter_mut() {
        let output = state.tick_variable(&input);
        cursor_request.set(output.cursor);
        signals.write_batch(output.events.into_iter().map(ControllerSignal));
    }
}

/// Physics-rate tick: look, move, ground probe, jump and landing
pub fn run_fixed_tick(
    time: Res<Time>,
    mut input_state: ResMut<InputState>,
    rapier_context: ReadRapierContext,
    mut players: Query<
        (Entity, &mut ControllerState, &mut Transform, &mut ExternalImpulse),
        (With<PlayerBody>, Without<PlayerCamera>),
    >,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<PlayerBody>)>,
    mut signals: MessageWriter<ControllerSignal>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };
    let look = input_state.take_look();

    for (entity, mut state, mut transform, mut impulse) in players.iter_mut() {
        // Sphere swept straight down, ignoring our own capsule
        let probe = |origin: Vec3, radius: f32, max_distance: f32| {
            context
                .cast_shape(
                    origin,
                    Quat::IDENTITY,
                    Vec3::NEG_Y,
                    &Collider::ball(radius),
                    ShapeCastOptions::with_max_time_of_impact(max_distance),
                    QueryFilter::default().exclude_rigid_body(entity),
                )
                .is_some()
        };

        let input = FixedInput {
            elapsed: time.delta_secs(),
            forward_axis: input_state.forward_axis,
            strafe_axis: input_state.strafe_axis,
            mouse_delta: look,
            capsule_center: transform.translation,
        };
        let output = state.tick_fixed(&input, &probe);

        transform.translation += output.translation;
        transform.rotation = output.body_rotation;
        for mut camera in cameras.iter_mut() {
            camera.rotation = output.camera_rotation;
        }

        for event in output.events {
            match event {
                ControllerEvent::Impulse(push) => impulse.impulse += push,
                other => {
                    signals.write(ControllerSignal(other));
                }
            }
        }
    }
}

/// Log landings at debug level
pub fn log_landings(mut signals: MessageReader<ControllerSignal>) {
    for ControllerSignal(event) in signals.read() {
        if matches!(event, ControllerEvent::Landed) {
            debug!("Player landed");
        }
    }
}
