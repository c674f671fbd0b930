//! Fixed-capacity projectile pool
//!
//! Slots are allocated once at construction and never resized. Occupancy is
//! the slot variant itself: a live slot always carries its round, and an
//! unused slot carries nothing, so there is no separate alive flag to drift
//! out of sync.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Collidable, DynamicBody, Integrate, Shape, Volume};
use super::launcher::{LaunchMode, Launcher};
use crate::consts::*;
use crate::tuning::{ShotProfile, ShotTable};

/// Shot kinds a launcher can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotKind {
    Pistol,
    Artillery,
    Fireball,
    Laser,
}

impl ShotKind {
    pub const ALL: [ShotKind; 4] = [
        ShotKind::Pistol,
        ShotKind::Artillery,
        ShotKind::Fireball,
        ShotKind::Laser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShotKind::Pistol => "Pistol",
            ShotKind::Artillery => "Artillery",
            ShotKind::Fireball => "Fireball",
            ShotKind::Laser => "Laser",
        }
    }
}

/// A live projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub kind: ShotKind,
    pub body: DynamicBody,
    pub radius: f32,
    /// Frame timestamp at spawn (ms)
    pub spawned_at: u64,
    pub lifetime_ms: u64,
}

impl Round {
    fn fire(kind: ShotKind, profile: &ShotProfile, position: Vec3, velocity: Vec3, now: u64) -> Self {
        let shape = Shape::Sphere {
            radius: profile.radius,
        };
        let mut body = DynamicBody::new(position, profile.mass);
        body.velocity = velocity;
        body.acceleration = profile.acceleration;
        body.set_damping(profile.linear_damping, profile.angular_damping);
        body.set_inertia_for(shape);
        body.calculate_derived_data();

        Self {
            kind,
            body,
            radius: profile.radius,
            spawned_at: now,
            lifetime_ms: profile.lifetime_ms,
        }
    }

    /// True once `now` has reached spawn time + lifetime
    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        self.spawned_at.saturating_add(self.lifetime_ms) <= now
    }
}

impl Integrate for Round {
    fn integrate(&mut self, dt: f32) {
        self.body.integrate(dt);
    }

    fn calculate_derived_data(&mut self) {
        self.body.calculate_derived_data();
    }
}

impl Collidable for Round {
    fn volume(&self) -> Volume {
        Volume::Sphere {
            centre: self.body.position,
            radius: self.radius,
        }
    }
}

/// One entry of the pool
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Slot {
    #[default]
    Unused,
    Live(Round),
}

impl Slot {
    pub fn kind(&self) -> Option<ShotKind> {
        match self {
            Slot::Unused => None,
            Slot::Live(round) => Some(round.kind),
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }

    pub fn round(&self) -> Option<&Round> {
        match self {
            Slot::Unused => None,
            Slot::Live(round) => Some(round),
        }
    }
}

/// Spatial limits past which a round is reclaimed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpiryBounds {
    /// Minimum height
    pub floor_y: f32,
    /// Maximum forward (+Z) distance
    pub max_range: f32,
    /// Maximum sideways (|X|) distance
    pub lateral_limit: f32,
}

impl Default for ExpiryBounds {
    fn default() -> Self {
        Self {
            floor_y: FLOOR_Y,
            max_range: MAX_RANGE_Z,
            lateral_limit: LATERAL_LIMIT,
        }
    }
}

impl ExpiryBounds {
    /// True if `position` lies outside the playable volume
    pub fn is_outside(&self, position: Vec3) -> bool {
        position.y < self.floor_y || position.z > self.max_range || position.x.abs() > self.lateral_limit
    }
}

/// Fixed-size slab of reusable projectile slots
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectilePool {
    slots: Box<[Slot]>,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Unused; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Slot::is_live)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Live rounds with their slot index, in slot order
    pub fn live(&self) -> impl Iterator<Item = (usize, &Round)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.round().map(|round| (i, round)))
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.slots.get(index).and_then(Slot::round)
    }

    pub fn body(&self, index: usize) -> Option<&DynamicBody> {
        self.round(index).map(|round| &round.body)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut DynamicBody> {
        match self.slots.get_mut(index) {
            Some(Slot::Live(round)) => Some(&mut round.body),
            _ => None,
        }
    }

    /// Fire a round from `launcher` into the first unused slot.
    ///
    /// Returns the slot index, or `None` when every slot is live. A full pool
    /// drops the request and is left untouched.
    pub fn spawn(
        &mut self,
        kind: ShotKind,
        launcher: &Launcher,
        now: u64,
        table: &ShotTable,
        mode: LaunchMode,
    ) -> Option<usize> {
        let Some(index) = self.slots.iter().position(|s| !s.is_live()) else {
            log::debug!("Pool full ({} slots), {} dropped", self.capacity(), kind.name());
            return None;
        };

        let profile = table.profile(kind);
        let velocity = launcher.launch_velocity(profile, mode);
        let round = Round::fire(kind, profile, launcher.muzzle_position(), velocity, now);
        self.slots[index] = Slot::Live(round);

        log::debug!("Fired {} into slot {} at t={}ms", kind.name(), index, now);
        Some(index)
    }

    /// Integrate every live round; no-op for `dt <= 0`
    pub fn step_all(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            if let Slot::Live(round) = slot {
                round.integrate(dt);
                round.calculate_derived_data();
            }
        }
    }

    /// Reclaim rounds that are too old or out of bounds. Returns how many.
    pub fn sweep_expired(&mut self, now: u64, bounds: &ExpiryBounds) -> usize {
        let mut reclaimed = 0;
        for slot in self.slots.iter_mut() {
            let expired = match slot {
                Slot::Live(round) => round.is_expired(now) || bounds.is_outside(round.body.position),
                Slot::Unused => false,
            };
            if expired {
                *slot = Slot::Unused;
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Vacate one slot. Returns true if it was live.
    pub fn reclaim(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_live() => {
                *slot = Slot::Unused;
                true
            }
            _ => false,
        }
    }

    /// Vacate every slot
    pub fn reset_all(&mut self) {
        self.slots.fill(Slot::Unused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> Launcher {
        Launcher::new(Vec3::new(0.0, 1.5, 0.0), 1.5, Vec3::new(0.0, 0.0, 2.5))
    }

    fn fire(pool: &mut ProjectilePool, kind: ShotKind, now: u64) -> Option<usize> {
        pool.spawn(kind, &launcher(), now, &ShotTable::default(), LaunchMode::Table)
    }

    #[test]
    fn test_spawn_uses_first_unused_slot() {
        let mut pool = ProjectilePool::new(3);
        assert_eq!(fire(&mut pool, ShotKind::Pistol, 0), Some(0));
        assert_eq!(fire(&mut pool, ShotKind::Laser, 0), Some(1));

        pool.reclaim(0);
        assert_eq!(fire(&mut pool, ShotKind::Fireball, 10), Some(0));
        assert_eq!(pool.slot(0).and_then(Slot::kind), Some(ShotKind::Fireball));
        assert_eq!(pool.slot(1).and_then(Slot::kind), Some(ShotKind::Laser));
    }

    #[test]
    fn test_spawn_initialises_from_table() {
        let mut pool = ProjectilePool::new(2);
        let index = fire(&mut pool, ShotKind::Artillery, 42).unwrap();
        let round = pool.round(index).unwrap();

        assert_eq!(round.kind, ShotKind::Artillery);
        assert_eq!(round.radius, 0.4);
        assert_eq!(round.spawned_at, 42);
        assert_eq!(round.body.velocity, Vec3::new(0.0, 30.0, 40.0));
        assert_eq!(round.body.acceleration, Vec3::new(0.0, -21.0, 0.0));
        assert!((round.body.mass() - 200.0).abs() < 1e-3);
        assert_eq!(round.body.linear_damping, 0.99);
        assert_eq!(round.body.position, Vec3::new(0.0, 1.5, 2.5));
        // Derived data is ready before the next contact pass
        assert_eq!(round.body.transform().w_axis.truncate(), round.body.position);
    }

    #[test]
    fn test_spawn_when_full_leaves_pool_unchanged() {
        let mut pool = ProjectilePool::new(2);
        fire(&mut pool, ShotKind::Pistol, 0);
        fire(&mut pool, ShotKind::Pistol, 0);
        let before = pool.clone();

        assert_eq!(fire(&mut pool, ShotKind::Laser, 5), None);
        assert_eq!(pool, before);
    }

    #[test]
    fn test_zero_capacity_pool_never_fires() {
        let mut pool = ProjectilePool::new(0);
        assert!(pool.is_full());
        assert_eq!(fire(&mut pool, ShotKind::Pistol, 0), None);
    }

    #[test]
    fn test_step_all_moves_live_rounds_only() {
        let mut pool = ProjectilePool::new(2);
        fire(&mut pool, ShotKind::Laser, 0);
        pool.step_all(0.1);

        let round = pool.round(0).unwrap();
        assert!(round.body.position.z > 2.5);
        assert_eq!(round.body.transform().w_axis.truncate(), round.body.position);
        assert!(!pool.slots()[1].is_live());
    }

    #[test]
    fn test_step_all_ignores_degenerate_dt() {
        let mut pool = ProjectilePool::new(2);
        fire(&mut pool, ShotKind::Artillery, 0);
        let before = pool.clone();
        pool.step_all(0.0);
        pool.step_all(-1.0);
        assert_eq!(pool, before);
    }

    #[test]
    fn test_sweep_by_age() {
        let mut pool = ProjectilePool::new(2);
        fire(&mut pool, ShotKind::Laser, 1000);
        let bounds = ExpiryBounds::default();

        assert_eq!(pool.sweep_expired(5999, &bounds), 0);
        assert_eq!(pool.sweep_expired(6000, &bounds), 1);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_sweep_by_bounds() {
        let mut pool = ProjectilePool::new(4);
        let bounds = ExpiryBounds::default();
        for _ in 0..4 {
            fire(&mut pool, ShotKind::Pistol, 0);
        }
        pool.body_mut(0).unwrap().position.y = -1.5;
        pool.body_mut(1).unwrap().position.z = 250.0;
        pool.body_mut(2).unwrap().position.x = -150.0;

        assert_eq!(pool.sweep_expired(10, &bounds), 3);
        assert_eq!(pool.live().map(|(i, _)| i).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_reclaim_is_idempotent() {
        let mut pool = ProjectilePool::new(1);
        fire(&mut pool, ShotKind::Pistol, 0);
        assert!(pool.reclaim(0));
        assert!(!pool.reclaim(0));
        assert!(!pool.reclaim(7));
    }

    #[test]
    fn test_reset_all() {
        let mut pool = ProjectilePool::new(3);
        fire(&mut pool, ShotKind::Pistol, 0);
        fire(&mut pool, ShotKind::Fireball, 0);
        pool.reset_all();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.capacity(), 3);
    }
}
