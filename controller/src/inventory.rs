//! Ammo, weapon and health bookkeeping.
//!
//! Nothing here fails loudly: an action that cannot happen reports why
//! through its outcome enum and leaves the state untouched.

// =============================================================================
// AMMO
// =============================================================================

/// Rounds in the clip and in reserve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmoInventory {
    reserve: u32,
    clip: u32,
    max_reserve: u32,
    max_clip: u32,
}

/// Result of a reload attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded { transferred: u32 },
    ClipFull,
    NoReserve,
    Holstered,
}

impl AmmoInventory {
    /// Starting counts are clamped to their maximums.
    pub fn new(max_reserve: u32, max_clip: u32, reserve: u32, clip: u32) -> Self {
        Self {
            reserve: reserve.min(max_reserve),
            clip: clip.min(max_clip),
            max_reserve,
            max_clip,
        }
    }

    pub fn reserve(&self) -> u32 {
        self.reserve
    }

    pub fn clip(&self) -> u32 {
        self.clip
    }

    pub fn max_reserve(&self) -> u32 {
        self.max_reserve
    }

    pub fn max_clip(&self) -> u32 {
        self.max_clip
    }

    pub fn is_reserve_full(&self) -> bool {
        self.reserve >= self.max_reserve
    }

    /// Move `min(max_clip - clip, reserve)` rounds from reserve into the clip.
    pub fn reload(&mut self) -> ReloadOutcome {
        let needed = self.max_clip - self.clip;
        if needed == 0 {
            return ReloadOutcome::ClipFull;
        }
        let transferred = needed.min(self.reserve);
        if transferred == 0 {
            return ReloadOutcome::NoReserve;
        }
        self.reserve -= transferred;
        self.clip += transferred;
        ReloadOutcome::Reloaded { transferred }
    }

    /// Spend one round from the clip. False when the clip is empty.
    pub fn consume_round(&mut self) -> bool {
        if self.clip == 0 {
            return false;
        }
        self.clip -= 1;
        true
    }

    /// Add rounds to the reserve, capped at the maximum. Returns rounds gained.
    pub fn add_reserve(&mut self, amount: u32) -> u32 {
        let before = self.reserve;
        self.reserve = self.reserve.saturating_add(amount).min(self.max_reserve);
        self.reserve - before
    }
}

// =============================================================================
// WEAPON
// =============================================================================

/// Result of pulling the trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    Fired { clip_remaining: u32 },
    /// Armed with an empty clip
    DryFire,
    Holstered,
    /// The previous shot's animation is still playing
    Busy,
}

/// The single carried gun
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weapon {
    pub armed: bool,
    pub ammo: AmmoInventory,
}

impl Weapon {
    pub fn new(armed: bool, ammo: AmmoInventory) -> Self {
        Self { armed, ammo }
    }

    /// Draw or holster. Returns the new armed state.
    pub fn toggle_holster(&mut self) -> bool {
        self.armed = !self.armed;
        self.armed
    }

    pub fn reload(&mut self) -> ReloadOutcome {
        if !self.armed {
            return ReloadOutcome::Holstered;
        }
        self.ammo.reload()
    }

    pub fn fire(&mut self, fire_animation_active: bool) -> FireOutcome {
        if fire_animation_active {
            return FireOutcome::Busy;
        }
        if !self.armed {
            return FireOutcome::Holstered;
        }
        if self.ammo.consume_round() {
            FireOutcome::Fired {
                clip_remaining: self.ammo.clip(),
            }
        } else {
            FireOutcome::DryFire
        }
    }
}

// =============================================================================
// HEALTH
// =============================================================================

/// Result of a damage application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Hurt { remaining: u32 },
    /// Health just reached zero. Reported once.
    Died,
    AlreadyDead,
}

/// Hit points, clamped to `[0, max]`. Zero is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
    dead: bool,
}

impl Health {
    pub fn new(max: u32, current: u32) -> Self {
        let current = current.min(max);
        Self {
            current,
            max,
            dead: current == 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn percentage(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Heal up to the maximum. Returns the amount actually restored.
    /// The dead stay dead.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.dead {
            return 0;
        }
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::AlreadyDead;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.dead = true;
            DamageOutcome::Died
        } else {
            DamageOutcome::Hurt {
                remaining: self.current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_from_empty_clip() {
        let mut ammo = AmmoInventory::new(48, 10, 20, 0);
        assert_eq!(ammo.reload(), ReloadOutcome::Reloaded { transferred: 10 });
        assert_eq!(ammo.clip(), 10);
        assert_eq!(ammo.reserve(), 10);
    }

    #[test]
    fn test_reload_conserves_rounds() {
        for (reserve, clip) in [(0, 0), (3, 2), (48, 10), (5, 9), (48, 0), (1, 0)] {
            let mut ammo = AmmoInventory::new(48, 10, reserve, clip);
            let total = ammo.reserve() + ammo.clip();
            ammo.reload();
            assert_eq!(ammo.reserve() + ammo.clip(), total);
            assert!(ammo.clip() <= ammo.max_clip());
        }
    }

    #[test]
    fn test_reload_noops() {
        let mut full = AmmoInventory::new(48, 10, 20, 10);
        assert_eq!(full.reload(), ReloadOutcome::ClipFull);
        assert_eq!((full.clip(), full.reserve()), (10, 20));

        let mut dry = AmmoInventory::new(48, 10, 0, 4);
        assert_eq!(dry.reload(), ReloadOutcome::NoReserve);
        assert_eq!((dry.clip(), dry.reserve()), (4, 0));

        let mut holstered = Weapon::new(false, AmmoInventory::new(48, 10, 20, 0));
        assert_eq!(holstered.reload(), ReloadOutcome::Holstered);
        assert_eq!(holstered.ammo.clip(), 0);
    }

    #[test]
    fn test_fire_never_goes_negative() {
        let mut weapon = Weapon::new(true, AmmoInventory::new(48, 10, 0, 2));
        assert_eq!(weapon.fire(false), FireOutcome::Fired { clip_remaining: 1 });
        assert_eq!(weapon.fire(false), FireOutcome::Fired { clip_remaining: 0 });
        assert_eq!(weapon.fire(false), FireOutcome::DryFire);
        assert_eq!(weapon.ammo.clip(), 0);
    }

    #[test]
    fn test_fire_gates() {
        let mut weapon = Weapon::new(false, AmmoInventory::new(48, 10, 0, 5));
        assert_eq!(weapon.fire(false), FireOutcome::Holstered);
        assert!(weapon.toggle_holster());
        assert_eq!(weapon.fire(true), FireOutcome::Busy);
        assert_eq!(weapon.ammo.clip(), 5);
    }

    #[test]
    fn test_add_reserve_clamps() {
        let mut ammo = AmmoInventory::new(48, 10, 40, 0);
        assert_eq!(ammo.add_reserve(12), 8);
        assert_eq!(ammo.reserve(), 48);
        assert!(ammo.is_reserve_full());
    }

    #[test]
    fn test_health_death_is_one_shot() {
        let mut health = Health::new(100, 25);
        assert_eq!(health.take_damage(10), DamageOutcome::Hurt { remaining: 15 });
        assert_eq!(health.take_damage(10), DamageOutcome::Hurt { remaining: 5 });
        assert_eq!(health.take_damage(10), DamageOutcome::Died);
        assert_eq!(health.current(), 0);
        assert_eq!(health.take_damage(10), DamageOutcome::AlreadyDead);
        assert_eq!(health.heal(30), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_heal_clamps() {
        let mut health = Health::new(100, 90);
        assert_eq!(health.heal(30), 10);
        assert!(health.is_full());
        assert!((health.percentage() - 1.0).abs() < 0.001);
    }
}
