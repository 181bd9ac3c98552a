//! First-person client - hosts the character controller in a small arena
//!
//! Updated for Bevy 0.17 / bevy_rapier3d 0.32

mod audio;
mod contacts;
mod cursor;
mod hud;
mod input;
mod player;
mod states;
mod weapon_view;
mod world;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use controller::{ControllerConfig, ControllerEvent};
use std::path::PathBuf;

use player::{ControllerSettings, ControllerSignal};
use states::GameState;

/// Overrides the config file location
const CONFIG_ENV_VAR: &str = "CONTROLLER_CONFIG";

/// Where the controller config lives
fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    // Bundled apps ship the assets next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled = exe_dir.join("assets").join("controller.ron");
            if bundled.exists() {
                return bundled;
            }
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("controller.ron")
}

/// Read the controller config, falling back to defaults
fn load_controller_config(mut commands: Commands) {
    let path = config_path();
    let config = match ControllerConfig::load_from_file(&path) {
        Ok(config) => {
            info!("Loaded controller config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{e}; using default controller config");
            ControllerConfig::default()
        }
    };
    commands.insert_resource(ControllerSettings(config));
}

/// Enter the death state on the controller's say-so
fn enter_dead_state(
    mut signals: MessageReader<ControllerSignal>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if signals
        .read()
        .any(|ControllerSignal(event)| matches!(event, ControllerEvent::Died))
    {
        info!("Player died");
        next_state.set(GameState::Dead);
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "First Person".to_string(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());

    // Game state machine
    app.init_state::<GameState>();

    app.add_message::<ControllerSignal>();
    app.init_resource::<input::InputState>();
    app.init_resource::<cursor::CursorRequest>();
    app.init_resource::<audio::FootstepClock>();
    app.init_resource::<contacts::ActiveContacts>();

    app.add_systems(
        Startup,
        (
            load_controller_config,
            audio::setup_audio,
            world::spawn_world,
            player::spawn_player,
            hud::spawn_hud,
            weapon_view::spawn_weapon_hud,
        )
            .chain(),
    );

    // Input and the frame-rate tick
    app.add_systems(
        Update,
        (
            input::handle_keyboard_input,
            input::handle_mouse_input,
            player::run_variable_tick,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );

    // Physics-rate tick, then contacts from the step that just ran
    app.add_systems(
        FixedUpdate,
        player::run_fixed_tick.run_if(in_state(GameState::Playing)),
    );
    app.add_systems(
        FixedPostUpdate,
        (
            contacts::collect_contacts,
            contacts::repeat_persisting_contacts,
            contacts::despawn_consumed,
        )
            .chain()
            .after(PhysicsSet::Writeback)
            .run_if(in_state(GameState::Playing)),
    );

    // Carry out what the controller asked for
    app.add_systems(
        Update,
        (
            audio::play_controller_sounds,
            audio::apply_footstep_commands,
            audio::tick_footstep_clock,
            weapon_view::apply_animation_signals,
            player::log_landings,
            enter_dead_state,
        )
            .chain()
            .after(player::run_variable_tick),
    );

    // Presentation
    app.add_systems(
        Update,
        (
            weapon_view::spawn_view_model,
            weapon_view::animate_weapon,
            weapon_view::update_weapon_hud,
            hud::update_health_hud,
            cursor::apply_cursor_request,
        )
            .after(enter_dead_state),
    );

    app.add_systems(
        OnEnter(GameState::Dead),
        (
            input::clear_input,
            audio::stop_footstep_clock,
            cursor::release_cursor_on_death,
            hud::spawn_death_screen,
        ),
    );

    app.run();
}
