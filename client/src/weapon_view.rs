//! First-person gun model and ammo HUD
//!
//! The gun hangs off the camera. Its pose follows the controller's `Arm` and
//! `Running` flags and plays short fire and reload motions on their triggers.
//! Updated for Bevy 0.17

use bevy::prelude::*;
use controller::{AnimationFlag, AnimationTrigger, ControllerEvent, ControllerState};

use crate::player::{ControllerSignal, PlayerBody, PlayerCamera};

/// Length of the recoil motion. Firing is blocked while it plays.
pub const FIRE_ANIMATION_SECS: f32 = 0.18;

/// Length of the reload dip
pub const RELOAD_ANIMATION_SECS: f32 = 0.9;

/// How fast the gun is raised or lowered (fraction per second)
const HOLSTER_SPEED: f32 = 5.0;

/// Camera-relative rest position
const BASE_OFFSET: Vec3 = Vec3::new(0.25, -0.2, -0.5);

/// Extra offset when fully holstered (below the screen edge)
const HOLSTER_OFFSET: Vec3 = Vec3::new(0.05, -0.45, 0.1);

/// Marker for the first-person weapon model
#[derive(Component)]
pub struct FirstPersonWeapon;

/// Animation state of the gun, driven by controller signals
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct GunAnimation {
    pub armed: bool,
    pub running: bool,
    fire_remaining: f32,
    reload_remaining: f32,
    /// 0 holstered .. 1 raised
    raised: f32,
}

impl GunAnimation {
    pub fn new(armed: bool) -> Self {
        Self {
            armed,
            raised: if armed { 1.0 } else { 0.0 },
            ..default()
        }
    }

    pub fn is_firing(&self) -> bool {
        self.fire_remaining > 0.0
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining > 0.0
    }

    pub fn apply(&mut self, event: &ControllerEvent) {
        match *event {
            ControllerEvent::SetAnimationFlag {
                flag: AnimationFlag::Arm,
                value,
            } => self.armed = value,
            ControllerEvent::SetAnimationFlag {
                flag: AnimationFlag::Running,
                value,
            } => self.running = value,
            ControllerEvent::TriggerAnimation(AnimationTrigger::Fire) => {
                self.fire_remaining = FIRE_ANIMATION_SECS;
            }
            ControllerEvent::TriggerAnimation(AnimationTrigger::Reload) => {
                self.reload_remaining = RELOAD_ANIMATION_SECS;
            }
            _ => {}
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.fire_remaining = (self.fire_remaining - delta).max(0.0);
        self.reload_remaining = (self.reload_remaining - delta).max(0.0);
        let target = if self.armed { 1.0 } else { 0.0 };
        let step = HOLSTER_SPEED * delta;
        self.raised = if self.raised < target {
            (self.raised + step).min(target)
        } else {
            (self.raised - step).max(target)
        };
    }

    /// Camera-relative pose at time `t` (seconds since startup)
    pub fn pose(&self, t: f32) -> Transform {
        let mut offset = BASE_OFFSET + HOLSTER_OFFSET * (1.0 - self.raised);
        let mut rotation = Quat::IDENTITY;

        // Idle sway
        offset.x += (t * 1.2).sin() * 0.003;
        offset.y += (t * 0.8).cos() * 0.002;

        if self.running {
            offset.y += (t * 8.0).sin().abs() * 0.008;
            offset.x += (t * 4.0).sin() * 0.004;
        }

        if self.is_firing() {
            let kick = self.fire_remaining / FIRE_ANIMATION_SECS;
            offset.z += kick * 0.06;
            rotation *= Quat::from_rotation_x(kick * 0.12);
        }

        if self.is_reloading() {
            let progress = 1.0 - self.reload_remaining / RELOAD_ANIMATION_SECS;
            let dip = (progress * std::f32::consts::PI).sin();
            offset.y -= dip * 0.12;
            rotation *= Quat::from_rotation_z(dip * 0.6);
        }

        Transform::from_translation(offset).with_rotation(rotation)
    }
}

/// Attach the gun model to the player camera once it exists
pub fn spawn_view_model(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cameras: Query<Entity, Added<PlayerCamera>>,
    players: Query<&ControllerState, With<PlayerBody>>,
) {
    let Some(camera_entity) = cameras.iter().next() else {
        return;
    };
    let armed = players.iter().next().is_some_and(|s| s.weapon().armed);

    let metal_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.18),
        metallic: 0.9,
        perceptual_roughness: 0.3,
        ..default()
    });
    let grip_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.06, 0.04),
        metallic: 0.1,
        perceptual_roughness: 0.8,
        ..default()
    });

    let animation = GunAnimation::new(armed);
    let weapon_entity = commands
        .spawn((
            FirstPersonWeapon,
            animation.pose(0.0),
            animation,
            Visibility::Inherited,
        ))
        .with_children(|parent| {
            // Body
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.03, 0.08, 0.12))),
                MeshMaterial3d(metal_material.clone()),
                Transform::IDENTITY,
            ));
            // Barrel
            parent.spawn((
                Mesh3d(meshes.add(Cylinder::new(0.012, 0.08))),
                MeshMaterial3d(metal_material.clone()),
                Transform::from_translation(Vec3::new(0.0, 0.02, -0.08))
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            ));
            // Grip
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.025, 0.07, 0.03))),
                MeshMaterial3d(grip_material.clone()),
                Transform::from_translation(Vec3::new(0.0, -0.06, 0.02))
                    .with_rotation(Quat::from_rotation_x(-0.2)),
            ));
        })
        .id();

    commands.entity(camera_entity).add_child(weapon_entity);
}

/// Feed flags and triggers to the gun
pub fn apply_animation_signals(
    mut guns: Query<&mut GunAnimation>,
    mut signals: MessageReader<ControllerSignal>,
) {
    for ControllerSignal(event) in signals.read() {
        for mut gun in guns.iter_mut() {
            gun.apply(event);
        }
    }
}

/// Advance the gun's motions and pose it
pub fn animate_weapon(
    mut weapons: Query<(&mut GunAnimation, &mut Transform), With<FirstPersonWeapon>>,
    time: Res<Time>,
) {
    let t = time.elapsed_secs();
    for (mut animation, mut transform) in weapons.iter_mut() {
        animation.advance(time.delta_secs());
        *transform = animation.pose(t);
    }
}

// =============================================================================
// AMMO HUD
// =============================================================================

/// Marker for weapon HUD root
#[derive(Component)]
pub struct WeaponHUD;

/// Marker for ammo text
#[derive(Component)]
pub struct AmmoText;

/// Spawn the weapon HUD
pub fn spawn_weapon_hud(mut commands: Commands) {
    commands
        .spawn((
            WeaponHUD,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(20.0),
                bottom: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                row_gap: Val::Px(5.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                AmmoText,
                Text::new("0 / 0"),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 0.9, 0.6, 1.0)),
            ));
            parent.spawn((
                Text::new("[F] Draw/Holster  [R] Reload  [LMB] Fire"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 0.7)),
            ));
        });
}

/// Show clip and reserve, dimmed while holstered
pub fn update_weapon_hud(
    players: Query<&ControllerState, With<PlayerBody>>,
    mut ammo_text: Query<(&mut Text, &mut TextColor), With<AmmoText>>,
) {
    let Some(state) = players.iter().next() else {
        return;
    };
    let weapon = state.weapon();

    for (mut text, mut color) in ammo_text.iter_mut() {
        **text = format!("{} / {}", weapon.ammo.clip(), weapon.ammo.reserve());
        color.0 = if weapon.armed {
            Color::srgba(1.0, 0.9, 0.6, 1.0)
        } else {
            Color::srgba(1.0, 0.9, 0.6, 0.35)
        };
    }
}
