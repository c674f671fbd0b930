//! Sandbox settings
//!
//! Loaded from a JSON file by the native driver; every field has a default so
//! partial files work.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::{ContactCoefficients, HalfSpace};
use crate::sim::launcher::{LaunchMode, Launcher};
use crate::sim::pool::{ExpiryBounds, ShotKind};
use crate::tuning::ShotTable;

/// One launcher in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherSettings {
    pub position: Vec3,
    pub radius: f32,
    pub muzzle_offset: Vec3,
    /// Cosmetic RGB colour (0.0 - 1.0)
    pub colour: Vec3,
    /// `None` = stationary, `Some(kg)` = falls and can be pushed around
    #[serde(default)]
    pub mass: Option<f32>,
}

impl LauncherSettings {
    pub fn build(&self) -> Launcher {
        let launcher = match self.mass {
            Some(mass) => Launcher::mobile(self.position, self.radius, self.muzzle_offset, mass),
            None => Launcher::new(self.position, self.radius, self.muzzle_offset),
        };
        launcher.with_colour(self.colour)
    }
}

/// A static box obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSettings {
    pub centre: Vec3,
    pub half_size: Vec3,
}

/// Sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Pool ===
    /// Number of projectile slots
    pub pool_capacity: usize,
    /// Shot fired before the player picks one
    pub default_shot: ShotKind,
    /// How launchers turn shot profiles into muzzle velocities
    pub launch_mode: LaunchMode,
    pub shots: ShotTable,
    pub bounds: ExpiryBounds,

    // === Contacts ===
    pub max_contacts: usize,
    pub contact: ContactCoefficients,

    // === Scene ===
    pub ground: HalfSpace,
    pub launchers: Vec<LauncherSettings>,
    pub obstacles: Vec<ObstacleSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pool_capacity: POOL_CAPACITY,
            default_shot: ShotKind::Laser,
            launch_mode: LaunchMode::Table,
            shots: ShotTable::default(),
            bounds: ExpiryBounds::default(),

            max_contacts: MAX_CONTACTS,
            contact: ContactCoefficients::default(),

            ground: HalfSpace::default(),
            // Two launchers facing each other down the range
            launchers: (0..2)
                .map(|i| LauncherSettings {
                    position: Vec3::new(0.0, 1.5, 80.0 * i as f32),
                    radius: 1.5,
                    muzzle_offset: Vec3::new(0.0, 0.0, 2.5),
                    colour: Vec3::new(0.0, 0.75 * i as f32, 0.25),
                    mass: None,
                })
                .collect(),
            obstacles: vec![ObstacleSettings {
                centre: Vec3::new(0.0, 1.0, 40.0),
                half_size: Vec3::ONE,
            }],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(err) => log::warn!("Invalid settings in {}: {}", path.display(), err),
            },
            Err(err) => log::warn!("Could not read {}: {}", path.display(), err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Repair values that would break the simulation invariants
    pub fn sanitized(mut self) -> Self {
        self.shots.sanitize();

        if self.pool_capacity > MAX_POOL_CAPACITY {
            log::warn!("Pool capacity {} too large, capping at {}", self.pool_capacity, MAX_POOL_CAPACITY);
            self.pool_capacity = MAX_POOL_CAPACITY;
        }
        if self.max_contacts > CONTACT_LIMIT {
            log::warn!("Contact limit {} too large, capping at {}", self.max_contacts, CONTACT_LIMIT);
            self.max_contacts = CONTACT_LIMIT;
        }

        let defaults = ContactCoefficients::default();
        let c = &mut self.contact;
        if !c.restitution.is_finite() {
            log::warn!("Restitution {} not finite, using {}", c.restitution, defaults.restitution);
            c.restitution = defaults.restitution;
        } else if !(0.0..=1.0).contains(&c.restitution) {
            log::warn!("Restitution {} out of range, clamping", c.restitution);
            c.restitution = c.restitution.clamp(0.0, 1.0);
        }
        if !c.friction.is_finite() || !c.tolerance.is_finite() {
            log::warn!("Friction/tolerance not finite, using defaults");
            if !c.friction.is_finite() {
                c.friction = defaults.friction;
            }
            if !c.tolerance.is_finite() {
                c.tolerance = defaults.tolerance;
            }
        }
        if c.friction < 0.0 || c.tolerance < 0.0 {
            log::warn!("Negative friction/tolerance, clamping to zero");
            c.friction = c.friction.max(0.0);
            c.tolerance = c.tolerance.max(0.0);
        }

        let b = &self.bounds;
        if !(b.lateral_limit > 0.0 && b.max_range > b.floor_y) {
            log::warn!("Inverted expiry bounds {:?}, using defaults", b);
            self.bounds = ExpiryBounds::default();
        }

        let normal = self.ground.normal.normalize_or_zero();
        if normal == Vec3::ZERO {
            log::warn!("Degenerate ground normal, using +Y");
            self.ground.normal = Vec3::Y;
        } else {
            self.ground.normal = normal;
        }

        let defaults = LauncherSettings {
            position: Vec3::ZERO,
            radius: 1.5,
            muzzle_offset: Vec3::ZERO,
            colour: Vec3::ZERO,
            mass: None,
        };
        for launcher in &mut self.launchers {
            if !(launcher.radius > 0.0 && launcher.radius.is_finite()) {
                log::warn!("Launcher radius {} invalid, using {}", launcher.radius, defaults.radius);
                launcher.radius = defaults.radius;
            }
            if launcher.mass.is_some_and(|m| !(m > 0.0 && m.is_finite())) {
                log::warn!("Launcher mass invalid, making it stationary");
                launcher.mass = defaults.mass;
            }
        }

        for obstacle in &mut self.obstacles {
            obstacle.half_size = obstacle.half_size.abs();
        }

        self
    }
}
