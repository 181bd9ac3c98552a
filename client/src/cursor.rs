//! Pointer capture on the primary window

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use controller::{ControllerState, CursorPresentation};

use crate::player::PlayerBody;

/// Latest presentation the controller asked for
#[derive(Resource, Default, Debug)]
pub struct CursorRequest {
    wanted: Option<CursorPresentation>,
    applied: Option<CursorPresentation>,
}

impl CursorRequest {
    pub fn set(&mut self, presentation: CursorPresentation) {
        self.wanted = Some(presentation);
    }

    /// The presentation to apply, if it differs from what the window has.
    fn pending(&self) -> Option<CursorPresentation> {
        self.wanted.filter(|wanted| self.applied != Some(*wanted))
    }
}

/// Copy the requested presentation onto the window's cursor
pub fn apply_cursor_request(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
    mut request: ResMut<CursorRequest>,
) {
    let Some(presentation) = request.pending() else {
        return;
    };
    let Ok(window_entity) = windows.single() else {
        return;
    };

    if let Ok(mut cursor) = cursor_opts.get_mut(window_entity) {
        cursor.grab_mode = if presentation.confined {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
        cursor.visible = presentation.visible;
        request.applied = Some(presentation);
    }
}

/// Release the pointer for good once the player has died
pub fn release_cursor_on_death(
    mut players: Query<&mut ControllerState, With<PlayerBody>>,
    mut request: ResMut<CursorRequest>,
) {
    for mut state in players.iter_mut() {
        request.set(state.set_cursor_lock(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controller::CursorMode;

    #[test]
    fn test_request_only_pending_when_changed() {
        let mut request = CursorRequest::default();
        assert_eq!(request.pending(), None);

        let locked = CursorPresentation::from(CursorMode::Locked);
        request.set(locked);
        assert_eq!(request.pending(), Some(locked));

        request.applied = Some(locked);
        request.set(locked);
        assert_eq!(request.pending(), None);

        let free = CursorPresentation::from(CursorMode::Free);
        request.set(free);
        assert_eq!(request.pending(), Some(free));
    }
}
