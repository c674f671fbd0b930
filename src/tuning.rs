//! Data-driven shot tuning
//!
//! One `ShotProfile` per shot kind. The pool consults this table every time
//! it fires a round; nothing here is algorithmic.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::SHOT_LIFETIME_MS;
use crate::sim::ShotKind;

/// Initial state of a freshly fired round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotProfile {
    /// Mass (kg), must be positive
    pub mass: f32,
    /// Muzzle velocity (m/s) in launcher space, +Z is downrange
    pub velocity: Vec3,
    /// Constant acceleration (gravity scale, buoyancy)
    pub acceleration: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Collision sphere radius
    pub radius: f32,
    /// Time before the round is reclaimed (ms)
    #[serde(default = "default_lifetime")]
    pub lifetime_ms: u64,
}

fn default_lifetime() -> u64 {
    SHOT_LIFETIME_MS
}

impl ShotProfile {
    pub const PISTOL: Self = Self {
        mass: 1.5,
        velocity: Vec3::new(0.0, 0.0, 20.0),
        acceleration: Vec3::new(0.0, -0.5, 0.0),
        linear_damping: 0.99,
        angular_damping: 0.8,
        radius: 0.2,
        lifetime_ms: SHOT_LIFETIME_MS,
    };

    pub const ARTILLERY: Self = Self {
        mass: 200.0,
        velocity: Vec3::new(0.0, 30.0, 40.0), // 50m/s
        acceleration: Vec3::new(0.0, -21.0, 0.0),
        linear_damping: 0.99,
        angular_damping: 0.8,
        radius: 0.4,
        lifetime_ms: SHOT_LIFETIME_MS,
    };

    /// Mostly blast damage; floats up
    pub const FIREBALL: Self = Self {
        mass: 4.0,
        velocity: Vec3::new(0.0, -0.5, 10.0),
        acceleration: Vec3::new(0.0, 0.3, 0.0),
        linear_damping: 0.9,
        angular_damping: 0.8,
        radius: 0.6,
        lifetime_ms: SHOT_LIFETIME_MS,
    };

    /// A film-style laser bolt, not a beam: no gravity
    pub const LASER: Self = Self {
        mass: 0.1,
        velocity: Vec3::new(0.0, 0.0, 100.0),
        acceleration: Vec3::ZERO,
        linear_damping: 0.99,
        angular_damping: 0.8,
        radius: 0.2,
        lifetime_ms: SHOT_LIFETIME_MS,
    };

    /// True when the profile can initialise a valid body
    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
            && self.mass.is_finite()
            && self.radius > 0.0
            && self.radius.is_finite()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
            && (0.0..=1.0).contains(&self.linear_damping)
            && (0.0..=1.0).contains(&self.angular_damping)
    }
}

/// Per-kind shot profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotTable {
    pub pistol: ShotProfile,
    pub artillery: ShotProfile,
    pub fireball: ShotProfile,
    pub laser: ShotProfile,
}

impl Default for ShotTable {
    fn default() -> Self {
        Self {
            pistol: ShotProfile::PISTOL,
            artillery: ShotProfile::ARTILLERY,
            fireball: ShotProfile::FIREBALL,
            laser: ShotProfile::LASER,
        }
    }
}

impl ShotTable {
    pub fn profile(&self, kind: ShotKind) -> &ShotProfile {
        match kind {
            ShotKind::Pistol => &self.pistol,
            ShotKind::Artillery => &self.artillery,
            ShotKind::Fireball => &self.fireball,
            ShotKind::Laser => &self.laser,
        }
    }

    fn profile_mut(&mut self, kind: ShotKind) -> &mut ShotProfile {
        match kind {
            ShotKind::Pistol => &mut self.pistol,
            ShotKind::Artillery => &mut self.artillery,
            ShotKind::Fireball => &mut self.fireball,
            ShotKind::Laser => &mut self.laser,
        }
    }

    /// Replace invalid profiles with the built-in defaults
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for kind in ShotKind::ALL {
            if !self.profile(kind).is_valid() {
                log::warn!("Invalid {} profile, using defaults", kind.name());
                *self.profile_mut(kind) = *defaults.profile(kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = ShotTable::default();
        for kind in ShotKind::ALL {
            assert!(table.profile(kind).is_valid(), "{:?}", kind);
        }
        assert_eq!(table.profile(ShotKind::Artillery).mass, 200.0);
        assert_eq!(table.profile(ShotKind::Laser).acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_sanitize_repairs_bad_mass() {
        let mut table = ShotTable::default();
        table.fireball.mass = 0.0;
        table.laser.radius = -1.0;
        table.sanitize();
        assert_eq!(table.fireball, ShotProfile::FIREBALL);
        assert_eq!(table.laser, ShotProfile::LASER);
    }

    #[test]
    fn test_lifetime_defaults_when_missing() {
        let json = r#"{
            "mass": 2.0,
            "velocity": [0.0, 0.0, 5.0],
            "acceleration": [0.0, 0.0, 0.0],
            "linear_damping": 0.9,
            "angular_damping": 0.9,
            "radius": 0.3
        }"#;
        let profile: ShotProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.lifetime_ms, SHOT_LIFETIME_MS);
    }
}
