//! Per-frame simulation step
//!
//! `apply_input` handles the discrete requests collected since the last
//! frame, `step` advances the world, and `tick` does both in that order.

use super::body::Integrate;
use super::contacts::{ContactReport, Scene, generate_contacts};
use super::pool::ShotKind;
use super::resolve::{BodySetMut, ContactResolver};
use super::state::Sandbox;

/// Input requests for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Number of spawn requests (clicks) this frame
    pub fire: u32,
    /// Switch the current shot kind
    pub select_shot: Option<ShotKind>,
    /// Switch the active launcher
    pub select_launcher: Option<usize>,
    /// Step through launchers (wraps around)
    pub cycle_launcher: i32,
    /// Power adjustment for the active launcher
    pub power_delta: i32,
    /// Angle adjustment for the active launcher (degrees)
    pub angle_delta: i32,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Clear every round and restore the scene
    pub reset: bool,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Why a frame did not advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Paused,
    /// Zero or negative frame duration
    DegenerateFrame,
}

/// Counters for one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Rounds reclaimed by age or bounds
    pub expired: usize,
    pub contacts: ContactReport,
    /// Rounds still live after the frame
    pub live: usize,
}

/// Result of `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Skipped(SkipReason),
    Advanced(StepStats),
}

/// Apply the frame's discrete requests.
///
/// While paused only the pause toggle and reset are honoured. Spawn requests
/// against a full pool are dropped.
pub fn apply_input(sandbox: &mut Sandbox, input: &FrameInput, now: u64) {
    if input.toggle_pause {
        sandbox.paused = !sandbox.paused;
        log::info!("Simulation {}", if sandbox.paused { "paused" } else { "resumed" });
    }

    if input.reset {
        sandbox.reset();
    }

    if sandbox.paused {
        return;
    }

    if let Some(index) = input.select_launcher {
        if index < sandbox.launchers.len() {
            sandbox.active_launcher = index;
        }
    }

    let count = sandbox.launchers.len() as i64;
    if input.cycle_launcher != 0 && count > 0 {
        let next = (sandbox.active_launcher as i64 + input.cycle_launcher as i64).rem_euclid(count);
        sandbox.active_launcher = next as usize;
    }

    if let Some(kind) = input.select_shot {
        sandbox.current_shot = kind;
    }

    if let Some(launcher) = sandbox.active_launcher_mut() {
        if input.power_delta != 0 {
            launcher.set_power(input.power_delta);
        }
        if input.angle_delta != 0 {
            launcher.set_angle(input.angle_delta);
        }
    }

    for _ in 0..input.fire {
        sandbox.fire(now);
    }
}

/// Advance the sandbox by one frame of `dt` seconds ending at `now` (ms)
pub fn step<R: ContactResolver + ?Sized>(
    sandbox: &mut Sandbox,
    dt: f32,
    now: u64,
    resolver: &mut R,
) -> StepOutcome {
    if sandbox.paused {
        return StepOutcome::Skipped(SkipReason::Paused);
    }
    if dt.is_nan() || dt <= 0.0 {
        return StepOutcome::Skipped(SkipReason::DegenerateFrame);
    }

    sandbox.last_frame_ms = now;
    sandbox.frame_number += 1;

    let Sandbox {
        settings,
        pool,
        launchers,
        obstacles,
        ground,
        contacts,
        ..
    } = sandbox;

    for launcher in launchers.iter_mut() {
        launcher.integrate(dt);
        launcher.calculate_derived_data();
    }

    pool.step_all(dt);
    let expired = pool.sweep_expired(now, &settings.bounds);

    let scene = Scene {
        launchers: launchers.as_slice(),
        obstacles: obstacles.as_slice(),
        ground: &*ground,
    };
    let report = generate_contacts(&scene, pool, contacts, settings.max_contacts, settings.contact);

    let mut bodies = BodySetMut {
        launchers: launchers.as_mut_slice(),
        pool: &mut *pool,
    };
    resolver.resolve(contacts.contacts(), &mut bodies, dt);

    StepOutcome::Advanced(StepStats {
        expired,
        contacts: report,
        live: pool.live_count(),
    })
}

/// Apply input, then step
pub fn tick<R: ContactResolver + ?Sized>(
    sandbox: &mut Sandbox,
    input: &FrameInput,
    dt: f32,
    now: u64,
    resolver: &mut R,
) -> StepOutcome {
    apply_input(sandbox, input, now);
    step(sandbox, dt, now, resolver)
}
