//! Ballistic Sandbox - a small rigid-body projectile sandbox
//!
//! Core modules:
//! - `sim`: Simulation (bodies, launchers, projectile pool, contacts, step)
//! - `tuning`: Data-driven per-kind shot profiles
//! - `settings`: Sandbox configuration (JSON)
//! - `renderer`: GPU-ready instance extraction
//! - `ui`: HUD text
//! - `platform`: Frame clock and input mapping

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use sim::{FrameInput, Sandbox, ShotKind, StepOutcome, step, tick};
pub use tuning::{ShotProfile, ShotTable};

use glam::{Quat, Vec3};

/// Sandbox configuration constants
pub mod consts {
    /// Default frame step used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Number of projectile slots
    pub const POOL_CAPACITY: usize = 16;
    /// Largest pool a settings file may ask for
    pub const MAX_POOL_CAPACITY: usize = 4096;
    /// Lifetime of a round before it is reclaimed (ms)
    pub const SHOT_LIFETIME_MS: u64 = 5000;

    /// Launcher power bounds
    pub const MIN_POWER: i32 = 1;
    pub const MAX_POWER: i32 = 10;
    pub const DEFAULT_POWER: i32 = 5;
    /// Launcher angle bounds (degrees above the horizon)
    pub const MIN_ANGLE: i32 = 0;
    pub const MAX_ANGLE: i32 = 90;

    /// Contact buffer size per frame
    pub const MAX_CONTACTS: usize = 256;
    /// Largest contact buffer a settings file may ask for
    pub const CONTACT_LIMIT: usize = 65_536;
    /// Shared contact coefficients
    pub const FRICTION: f32 = 0.9;
    pub const RESTITUTION: f32 = 0.1;
    pub const TOLERANCE: f32 = 0.1;

    /// Rounds below this height are reclaimed
    pub const FLOOR_Y: f32 = -1.0;
    /// Rounds beyond this forward distance are reclaimed
    pub const MAX_RANGE_Z: f32 = 200.0;
    /// Rounds beyond this sideways distance are reclaimed
    pub const LATERAL_LIMIT: f32 = 100.0;
}

/// Direction along +Z pitched up by `degrees` around the X axis
#[inline]
pub fn pitched_forward(degrees: f32) -> Vec3 {
    let radians = degrees.to_radians();
    Vec3::new(0.0, radians.sin(), radians.cos())
}

/// Add a scaled angular velocity to an orientation (first-order update)
#[inline]
pub fn add_scaled_rotation(orientation: Quat, rotation: Vec3, scale: f32) -> Quat {
    let spin = Quat::from_xyzw(rotation.x * scale, rotation.y * scale, rotation.z * scale, 0.0);
    orientation + (spin * orientation) * 0.5
}
