//! Footstep scheduling.
//!
//! One authoritative gait (`Idle` / `Walking`) plus at most one recurring
//! timer. The host owns the actual clock: it is told to start or cancel a
//! timer by handle, and calls back with that handle every time it fires.
//! Handles from cancelled timers are ignored, so cancel-then-restart within
//! a single tick is safe.

use rand::Rng;

/// Identifies one scheduled recurring footstep timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Index of a footstep sound in the host's footstep list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FootstepCue(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gait {
    #[default]
    Idle,
    Walking,
}

/// Request to the host clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerCommand {
    /// Fire `handle` after `first_delay` seconds, then every `interval` seconds
    Start {
        handle: TimerHandle,
        first_delay: f32,
        interval: f32,
    },
    Cancel { handle: TimerHandle },
}

#[derive(Clone, Debug)]
pub struct FootstepScheduler {
    gait: Gait,
    active: Option<TimerHandle>,
    next_handle: u64,
    interval: f32,
    /// Current order of the cue pool; slot 0 holds the most recent cue
    cues: Vec<FootstepCue>,
}

impl FootstepScheduler {
    pub fn new(cue_count: usize, interval: f32) -> Self {
        Self {
            gait: Gait::Idle,
            active: None,
            next_handle: 0,
            interval,
            cues: (0..cue_count).map(FootstepCue).collect(),
        }
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.active
    }

    pub fn cue_order(&self) -> &[FootstepCue] {
        &self.cues
    }

    /// Update the gait from this tick's movement.
    ///
    /// Returns the new gait when it changed.
    pub fn set_moving(&mut self, moving: bool, commands: &mut Vec<TimerCommand>) -> Option<Gait> {
        match (self.gait, moving) {
            (Gait::Idle, true) => {
                self.gait = Gait::Walking;
                self.start(commands);
                Some(Gait::Walking)
            }
            (Gait::Walking, false) => {
                self.gait = Gait::Idle;
                self.cancel(commands);
                Some(Gait::Idle)
            }
            _ => None,
        }
    }

    /// Stop stepping without leaving the walking gait (the character jumped).
    pub fn suspend(&mut self, commands: &mut Vec<TimerCommand>) {
        self.cancel(commands);
    }

    /// Pick stepping back up after a landing, if still walking.
    pub fn resume(&mut self, commands: &mut Vec<TimerCommand>) {
        if self.gait == Gait::Walking && self.active.is_none() {
            self.start(commands);
        }
    }

    /// Handle one firing of the host clock.
    ///
    /// Picks a random cue from slots `[1, N)`, moves it into slot 0 so it is
    /// unlikely to repeat next time, and returns it. Stale handles yield
    /// nothing. A single-cue pool always plays that cue.
    pub fn fire(&mut self, handle: TimerHandle, rng: &mut impl Rng) -> Option<FootstepCue> {
        if self.active != Some(handle) {
            return None;
        }
        match self.cues.len() {
            0 => None,
            1 => Some(self.cues[0]),
            len => {
                let n = rng.gen_range(1..len);
                self.cues.swap(0, n);
                Some(self.cues[0])
            }
        }
    }

    fn start(&mut self, commands: &mut Vec<TimerCommand>) {
        // Never leave two timers running
        self.cancel(commands);
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(handle);
        commands.push(TimerCommand::Start {
            handle,
            first_delay: 0.0,
            interval: self.interval,
        });
    }

    fn cancel(&mut self, commands: &mut Vec<TimerCommand>) {
        if let Some(handle) = self.active.take() {
            commands.push(TimerCommand::Cancel { handle });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(commands: &[TimerCommand]) -> Vec<TimerHandle> {
        commands
            .iter()
            .filter_map(|c| match c {
                TimerCommand::Start { handle, .. } => Some(*handle),
                TimerCommand::Cancel { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_walking_starts_one_timer_immediately() {
        let mut steps = FootstepScheduler::new(4, 0.4);
        let mut commands = Vec::new();

        assert_eq!(steps.set_moving(true, &mut commands), Some(Gait::Walking));
        assert_eq!(commands.len(), 1);
        match commands[0] {
            TimerCommand::Start { first_delay, interval, handle } => {
                assert_eq!(first_delay, 0.0);
                assert!((interval - 0.4).abs() < 1e-6);
                assert_eq!(steps.active_timer(), Some(handle));
            }
            other => panic!("unexpected {other:?}"),
        }

        // Holding the stick does not schedule again
        commands.clear();
        assert_eq!(steps.set_moving(true, &mut commands), None);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_idle_always_cancels() {
        let mut steps = FootstepScheduler::new(4, 0.4);
        let mut commands = Vec::new();
        steps.set_moving(true, &mut commands);
        let handle = steps.active_timer().unwrap();

        commands.clear();
        assert_eq!(steps.set_moving(false, &mut commands), Some(Gait::Idle));
        assert_eq!(commands, vec![TimerCommand::Cancel { handle }]);
        assert_eq!(steps.active_timer(), None);

        // A firing that was already queued by the host is ignored
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(steps.fire(handle, &mut rng), None);
    }

    #[test]
    fn test_jump_then_land_restarts_exactly_once() {
        let mut steps = FootstepScheduler::new(3, 0.4);
        let mut commands = Vec::new();
        steps.set_moving(true, &mut commands);

        steps.suspend(&mut commands);
        assert_eq!(steps.gait(), Gait::Walking);
        assert_eq!(steps.active_timer(), None);

        steps.resume(&mut commands);
        steps.resume(&mut commands);
        assert_eq!(started(&commands).len(), 2);
        assert!(steps.active_timer().is_some());

        // Landing while idle does nothing
        let mut idle = FootstepScheduler::new(3, 0.4);
        let mut commands = Vec::new();
        idle.resume(&mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_stop_and_start_same_tick_leaves_one_timer() {
        let mut steps = FootstepScheduler::new(3, 0.4);
        let mut commands = Vec::new();
        steps.set_moving(true, &mut commands);
        let first = steps.active_timer().unwrap();
        steps.set_moving(false, &mut commands);
        steps.set_moving(true, &mut commands);
        let second = steps.active_timer().unwrap();

        assert_ne!(first, second);
        let starts = started(&commands);
        let cancels: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, TimerCommand::Cancel { .. }))
            .collect();
        // Every start but the live one has been cancelled
        assert_eq!(starts.len() - cancels.len(), 1);
    }

    #[test]
    fn test_fire_avoids_immediate_repeat() {
        let mut steps = FootstepScheduler::new(4, 0.4);
        let mut commands = Vec::new();
        steps.set_moving(true, &mut commands);
        let handle = steps.active_timer().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let mut last = steps.cue_order()[0];
        for _ in 0..50 {
            let cue = steps.fire(handle, &mut rng).unwrap();
            assert_ne!(cue, last);
            assert_eq!(steps.cue_order()[0], cue);
            last = cue;
        }

        // The pool is still a permutation of the original cues
        let mut order: Vec<usize> = steps.cue_order().iter().map(|c| c.0).collect();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tiny_pools() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut commands = Vec::new();

        let mut single = FootstepScheduler::new(1, 0.4);
        single.set_moving(true, &mut commands);
        let handle = single.active_timer().unwrap();
        assert_eq!(single.fire(handle, &mut rng), Some(FootstepCue(0)));

        let mut empty = FootstepScheduler::new(0, 0.4);
        empty.set_moving(true, &mut commands);
        let handle = empty.active_timer().unwrap();
        assert_eq!(empty.fire(handle, &mut rng), None);
    }
}
