//! Player input handling
//!
//! Edges (presses and releases) are read every frame for the variable tick.
//! Mouse motion is summed until the next fixed step consumes it.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use controller::{VariableInput, MOUSE_SENSITIVITY};

/// Client-side input state
#[derive(Resource, Default)]
pub struct InputState {
    /// -1 backward .. 1 forward
    pub forward_axis: f32,
    /// -1 left .. 1 right
    pub strafe_axis: f32,
    pub jump_pressed: bool,
    pub reload_pressed: bool,
    pub toggle_arm_pressed: bool,
    pub fire_pressed: bool,
    pub primary_released: bool,
    pub escape_released: bool,
    /// Mouse motion since the last fixed step, already scaled by sensitivity.
    /// Positive y means the mouse moved down.
    pending_look: Vec2,
}

impl InputState {
    pub fn variable_input(&self, fire_animation_active: bool) -> VariableInput {
        VariableInput {
            forward_axis: self.forward_axis,
            strafe_axis: self.strafe_axis,
            jump_pressed: self.jump_pressed,
            reload_pressed: self.reload_pressed,
            toggle_arm_pressed: self.toggle_arm_pressed,
            fire_pressed: self.fire_pressed,
            primary_released: self.primary_released,
            escape_released: self.escape_released,
            fire_animation_active,
        }
    }

    /// Hand the accumulated look delta to a fixed step and start over.
    pub fn take_look(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending_look)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Handle keyboard input
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input_state: ResMut<InputState>,
) {
    input_state.forward_axis = axis(
        keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp),
        keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown),
    );
    input_state.strafe_axis = axis(
        keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight),
        keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft),
    );

    input_state.jump_pressed = keyboard.just_pressed(KeyCode::Space);
    input_state.reload_pressed = keyboard.just_pressed(KeyCode::KeyR);
    input_state.toggle_arm_pressed = keyboard.just_pressed(KeyCode::KeyF);
    input_state.escape_released = keyboard.just_released(KeyCode::Escape);
}

/// Handle mouse buttons and motion
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut input_state: ResMut<InputState>,
) {
    input_state.fire_pressed = mouse_button.just_pressed(MouseButton::Left);
    input_state.primary_released = mouse_button.just_released(MouseButton::Left);

    for motion in mouse_motion.read() {
        input_state.pending_look += motion.delta * MOUSE_SENSITIVITY;
    }
}

/// Forget held keys and unconsumed look motion
pub fn clear_input(mut input_state: ResMut<InputState>) {
    *input_state = InputState::default();
}
