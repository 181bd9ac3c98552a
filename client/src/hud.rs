//! Health readout, crosshair and the death screen

use bevy::prelude::*;
use controller::ControllerState;

use crate::player::PlayerBody;

/// Marker for the health bar fill
#[derive(Component)]
pub struct HealthBarFill;

/// Marker for the health number
#[derive(Component)]
pub struct HealthText;

/// Marker for the death screen overlay
#[derive(Component)]
pub struct DeathScreen;

/// Bar color from green (full) to red (empty)
fn health_color(fraction: f32) -> Color {
    let fraction = fraction.clamp(0.0, 1.0);
    Color::srgb(1.0 - fraction, fraction, 0.15)
}

/// Spawn the health bar and crosshair
pub fn spawn_hud(mut commands: Commands) {
    // Health, bottom-left
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                HealthText,
                Text::new("HP"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(200.0),
                        height: Val::Px(14.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        HealthBarFill,
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(health_color(1.0)),
                    ));
                });
        });

    // Center dot
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
                BorderRadius::all(Val::Px(2.0)),
            ));
        });
}

/// Keep the health bar in sync with the controller
pub fn update_health_hud(
    players: Query<&ControllerState, With<PlayerBody>>,
    mut fills: Query<(&mut Node, &mut BackgroundColor), With<HealthBarFill>>,
    mut texts: Query<&mut Text, With<HealthText>>,
) {
    let Some(state) = players.iter().next() else {
        return;
    };
    let health = state.health();
    let fraction = health.percentage();

    for (mut node, mut color) in fills.iter_mut() {
        node.width = Val::Percent(fraction * 100.0);
        color.0 = health_color(fraction);
    }
    for mut text in texts.iter_mut() {
        **text = format!("HP {} / {}", health.current(), health.max());
    }
}

/// Spawn the death screen when the player dies
pub fn spawn_death_screen(mut commands: Commands) {
    commands
        .spawn((
            DeathScreen,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.15, 0.0, 0.0, 0.5)),
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("YOU DIED"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.2, 0.2, 1.0)),
            ));
        });
}
