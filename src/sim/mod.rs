//! Simulation module
//!
//! All sandbox logic lives here. It stays free of rendering and platform code:
//! - Single-threaded, one `step` per frame
//! - Fixed slot order for every scan
//! - Timestamps are passed in, never read from a global clock

pub mod body;
pub mod collision;
pub mod contacts;
pub mod launcher;
pub mod pool;
pub mod resolve;
pub mod state;
pub mod tick;

pub use body::{Collidable, DynamicBody, Integrate, Shape, Volume};
pub use collision::{
    BodyRef, Contact, ContactBuffer, ContactCoefficients, ContactPair, HalfSpace, box_and_sphere,
    sphere_and_half_space, sphere_and_sphere,
};
pub use contacts::{ContactReport, Scene, generate_contacts};
pub use launcher::{LaunchMode, Launcher};
pub use pool::{ExpiryBounds, ProjectilePool, Round, ShotKind, Slot};
pub use resolve::{BodySetMut, ContactResolver, ImpulseResolver};
pub use state::{Obstacle, Sandbox};
pub use tick::{FrameInput, SkipReason, StepOutcome, StepStats, apply_input, step, tick};
