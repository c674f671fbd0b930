//! Per-frame contact generation
//!
//! An exhaustive pairwise scan in a fixed order, bounded by the contact
//! buffer. It is only meant for the handful of bodies a sandbox holds; there
//! is no broad phase.

use std::ops::ControlFlow;

use super::body::Collidable;
use super::collision::{
    BodyRef, ContactBuffer, ContactCoefficients, ContactPair, HalfSpace, volume_and_half_space,
    volume_and_volume,
};
use super::launcher::Launcher;
use super::pool::ProjectilePool;
use super::state::Obstacle;

/// Static and semi-static parts of the scene
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub launchers: &'a [Launcher],
    pub obstacles: &'a [Obstacle],
    pub ground: &'a HalfSpace,
}

/// What one generation pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    /// Contacts left in the buffer
    pub contacts: usize,
    /// Rounds reclaimed because they touched a launcher
    pub absorbed: usize,
    /// The buffer filled up and generation stopped
    pub saturated: bool,
}

#[inline]
fn room(data: &ContactBuffer) -> ControlFlow<()> {
    if data.has_capacity() {
        ControlFlow::Continue(())
    } else {
        ControlFlow::Break(())
    }
}

/// Rebuild `data` for this frame.
///
/// Order: launchers vs ground, launchers vs live rounds, obstacles vs
/// launchers and live rounds. Generation stops as soon as the buffer is
/// full, even if pairs remain untested. A round touching a launcher is
/// reclaimed on the spot; its contact stays in the buffer for this frame.
pub fn generate_contacts(
    scene: &Scene<'_>,
    pool: &mut ProjectilePool,
    data: &mut ContactBuffer,
    max_contacts: usize,
    coefficients: ContactCoefficients,
) -> ContactReport {
    data.reset_with(max_contacts, coefficients);

    let mut report = ContactReport::default();
    if run_pairs(scene, pool, data, &mut report).is_break() {
        log::trace!("Contact buffer full ({}), generation cut short", data.max_contacts());
        report.saturated = true;
    }
    report.contacts = data.len();
    report
}

fn run_pairs(
    scene: &Scene<'_>,
    pool: &mut ProjectilePool,
    data: &mut ContactBuffer,
    report: &mut ContactReport,
) -> ControlFlow<()> {
    room(data)?;

    for (i, launcher) in scene.launchers.iter().enumerate() {
        let pair = ContactPair::with_scenery(BodyRef::Launcher(i));
        volume_and_half_space(&launcher.volume(), scene.ground, pair, data);
        room(data)?;
    }

    for (i, launcher) in scene.launchers.iter().enumerate() {
        let launcher_volume = launcher.volume();
        for j in 0..pool.capacity() {
            let Some(round) = pool.round(j) else {
                continue;
            };
            let pair = ContactPair::new(BodyRef::Launcher(i), BodyRef::Projectile(j));
            if volume_and_volume(&launcher_volume, &round.volume(), pair, data) && pool.reclaim(j) {
                report.absorbed += 1;
            }
            room(data)?;
        }
    }

    for (k, obstacle) in scene.obstacles.iter().enumerate() {
        let obstacle_volume = obstacle.volume();
        for (i, launcher) in scene.launchers.iter().enumerate() {
            let pair = ContactPair::new(BodyRef::Obstacle(k), BodyRef::Launcher(i));
            volume_and_volume(&obstacle_volume, &launcher.volume(), pair, data);
            room(data)?;
        }
        for j in 0..pool.capacity() {
            let Some(round) = pool.round(j) else {
                continue;
            };
            let pair = ContactPair::new(BodyRef::Obstacle(k), BodyRef::Projectile(j));
            volume_and_volume(&obstacle_volume, &round.volume(), pair, data);
            room(data)?;
        }
    }

    ControlFlow::Continue(())
}
