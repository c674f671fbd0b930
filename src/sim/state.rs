//! Sandbox state
//!
//! Everything a frame reads or writes lives here. Pause and the frame
//! timestamp are plain fields, not globals.

use glam::{Mat4, Vec3};

use super::body::{Collidable, Volume};
use super::collision::{ContactBuffer, HalfSpace};
use super::launcher::Launcher;
use super::pool::{ProjectilePool, ShotKind};
use crate::settings::Settings;

/// A static box in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub centre: Vec3,
    pub half_size: Vec3,
    transform: Mat4,
}

impl Obstacle {
    pub fn new(centre: Vec3, half_size: Vec3) -> Self {
        Self {
            centre,
            half_size,
            transform: Mat4::from_translation(centre),
        }
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

impl Collidable for Obstacle {
    fn volume(&self) -> Volume {
        Volume::Cuboid {
            transform: self.transform,
            half_size: self.half_size,
        }
    }
}

/// Complete sandbox state
#[derive(Debug, Clone, PartialEq)]
pub struct Sandbox {
    pub settings: Settings,
    pub pool: ProjectilePool,
    pub launchers: Vec<Launcher>,
    pub obstacles: Vec<Obstacle>,
    pub ground: HalfSpace,
    /// Kind fired by the next spawn request
    pub current_shot: ShotKind,
    /// Launcher the next spawn request fires from
    pub active_launcher: usize,
    pub paused: bool,
    /// Timestamp of the last simulated frame (ms)
    pub last_frame_ms: u64,
    /// Number of simulated frames
    pub frame_number: u64,
    /// Scratch buffer, refilled every frame
    pub(crate) contacts: ContactBuffer,
}

impl Sandbox {
    /// Build the scene described by `settings`
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let launchers = settings.launchers.iter().map(|l| l.build()).collect();
        let obstacles = settings
            .obstacles
            .iter()
            .map(|o| Obstacle::new(o.centre, o.half_size))
            .collect();

        Self {
            pool: ProjectilePool::new(settings.pool_capacity),
            launchers,
            obstacles,
            ground: settings.ground,
            current_shot: settings.default_shot,
            active_launcher: 0,
            paused: false,
            last_frame_ms: 0,
            frame_number: 0,
            contacts: ContactBuffer::with_capacity(settings.max_contacts),
            settings,
        }
    }

    /// Fire the current shot from the active launcher
    pub fn fire(&mut self, now: u64) -> Option<usize> {
        let launcher = self.launchers.get(self.active_launcher)?;
        self.pool.spawn(
            self.current_shot,
            launcher,
            now,
            &self.settings.shots,
            self.settings.launch_mode,
        )
    }

    pub fn active_launcher(&self) -> Option<&Launcher> {
        self.launchers.get(self.active_launcher)
    }

    pub fn active_launcher_mut(&mut self) -> Option<&mut Launcher> {
        self.launchers.get_mut(self.active_launcher)
    }

    /// Contacts generated by the last simulated frame
    pub fn contacts(&self) -> &ContactBuffer {
        &self.contacts
    }

    /// Clear every round and put launchers back where the settings say
    pub fn reset(&mut self) {
        self.pool.reset_all();
        self.launchers = self.settings.launchers.iter().map(|l| l.build()).collect();
        log::info!("Sandbox reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sandbox_from_defaults() {
        let sandbox = Sandbox::new(Settings::default());
        assert_eq!(sandbox.pool.capacity(), 16);
        assert_eq!(sandbox.launchers.len(), 2);
        assert_eq!(sandbox.current_shot, ShotKind::Laser);
        assert_eq!(sandbox.pool.live_count(), 0);
        assert!(!sandbox.paused);
    }

    #[test]
    fn test_fire_uses_active_launcher() {
        let mut sandbox = Sandbox::new(Settings::default());
        sandbox.active_launcher = 1;
        let index = sandbox.fire(100).unwrap();
        let round = sandbox.pool.round(index).unwrap();
        assert_eq!(round.body.position, sandbox.launchers[1].muzzle_position());
        assert_eq!(round.spawned_at, 100);
    }

    #[test]
    fn test_fire_without_launcher_is_dropped() {
        let mut settings = Settings::default();
        settings.launchers.clear();
        let mut sandbox = Sandbox::new(settings);
        assert_eq!(sandbox.fire(0), None);
        assert_eq!(sandbox.pool.live_count(), 0);
    }

    #[test]
    fn test_reset_restores_launchers() {
        let mut sandbox = Sandbox::new(Settings::default());
        sandbox.fire(0);
        sandbox.launchers[0].set_power(3);
        sandbox.launchers[0].body.position.y = 50.0;
        sandbox.reset();

        assert_eq!(sandbox.pool.live_count(), 0);
        assert_eq!(sandbox.launchers[0].power(), crate::consts::DEFAULT_POWER);
        assert_eq!(sandbox.launchers[0].body.position.y, 1.5);
    }

    #[test]
    fn test_obstacle_volume() {
        let obstacle = Obstacle::new(Vec3::new(0.0, 1.0, 40.0), Vec3::ONE);
        match obstacle.volume() {
            Volume::Cuboid { transform, half_size } => {
                assert_eq!(half_size, Vec3::ONE);
                assert_eq!(transform.w_axis.truncate(), Vec3::new(0.0, 1.0, 40.0));
            }
            other => panic!("unexpected volume {:?}", other),
        }
    }
}
