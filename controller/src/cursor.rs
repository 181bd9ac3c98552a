//! Pointer lock state machine.
//!
//! Locked --escape released--> Free --primary button released--> Locked.
//! An external override can force Free and suspend the toggles.

/// Whether the pointer is captured by the game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    #[default]
    Locked,
    Free,
}

/// What the host should do with the pointer this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorPresentation {
    pub confined: bool,
    pub visible: bool,
}

impl From<CursorMode> for CursorPresentation {
    fn from(mode: CursorMode) -> Self {
        match mode {
            CursorMode::Locked => Self {
                confined: true,
                visible: false,
            },
            CursorMode::Free => Self {
                confined: false,
                visible: true,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorLock {
    mode: CursorMode,
    lock_enabled: bool,
}

impl CursorLock {
    /// Starts locked when locking is enabled, free otherwise.
    pub fn new(lock_enabled: bool) -> Self {
        Self {
            mode: if lock_enabled {
                CursorMode::Locked
            } else {
                CursorMode::Free
            },
            lock_enabled,
        }
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    pub fn lock_enabled(&self) -> bool {
        self.lock_enabled
    }

    pub fn presentation(&self) -> CursorPresentation {
        self.mode.into()
    }

    /// External override. `false` frees the pointer and suspends the toggle
    /// logic; `true` only resumes the toggles, the pointer stays free until
    /// the next primary-button release.
    pub fn set_lock(&mut self, value: bool) -> CursorPresentation {
        self.lock_enabled = value;
        if !value {
            self.mode = CursorMode::Free;
        }
        self.presentation()
    }

    /// Apply this tick's release edges. Escape wins when both happen.
    pub fn update(&mut self, escape_released: bool, primary_released: bool) -> CursorPresentation {
        if self.lock_enabled {
            if escape_released {
                self.mode = CursorMode::Free;
            } else if primary_released {
                self.mode = CursorMode::Locked;
            }
        }
        self.presentation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_frees_click_locks() {
        let mut cursor = CursorLock::new(true);
        assert_eq!(cursor.update(false, false), CursorPresentation::from(CursorMode::Locked));

        let shown = cursor.update(true, false);
        assert!(shown.visible && !shown.confined);

        // Holding nothing keeps it free
        assert_eq!(cursor.update(false, false), CursorPresentation::from(CursorMode::Free));

        let hidden = cursor.update(false, true);
        assert!(!hidden.visible && hidden.confined);
    }

    #[test]
    fn test_escape_wins_over_click() {
        let mut cursor = CursorLock::new(true);
        cursor.update(true, true);
        assert_eq!(cursor.mode(), CursorMode::Free);
    }

    #[test]
    fn test_override_is_one_directional() {
        let mut cursor = CursorLock::new(true);
        assert_eq!(cursor.set_lock(false), CursorPresentation::from(CursorMode::Free));

        // Toggles are suspended
        cursor.update(false, true);
        assert_eq!(cursor.mode(), CursorMode::Free);

        // Re-enabling does not lock by itself
        assert_eq!(cursor.set_lock(true), CursorPresentation::from(CursorMode::Free));
        assert_eq!(cursor.update(false, false), CursorPresentation::from(CursorMode::Free));
        assert_eq!(cursor.update(false, true), CursorPresentation::from(CursorMode::Locked));
    }

    #[test]
    fn test_presentation_is_consistent() {
        for mode in [CursorMode::Locked, CursorMode::Free] {
            let p = CursorPresentation::from(mode);
            assert_ne!(p.confined, p.visible);
        }
    }
}
