//! Launchers: the emitters rounds are fired from

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::{Collidable, DynamicBody, Integrate, Shape, Volume};
use crate::consts::*;
use crate::pitched_forward;
use crate::tuning::ShotProfile;

/// How a launcher turns a shot profile into a muzzle velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaunchMode {
    /// Use the profile velocity as-is
    #[default]
    Table,
    /// Keep the profile speed, scale by power and aim by angle
    Aimed,
}

/// A launcher in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Launcher {
    pub body: DynamicBody,
    /// Cosmetic RGB colour (0.0 - 1.0)
    pub colour: Vec3,
    pub radius: f32,
    /// Firing origin relative to the body, in launcher space
    pub muzzle_offset: Vec3,
    power: i32,
    angle: i32,
}

impl Launcher {
    /// A stationary launcher at `position`
    pub fn new(position: Vec3, radius: f32, muzzle_offset: Vec3) -> Self {
        let mut body = DynamicBody::immovable(position);
        body.set_inertia_for(Shape::Sphere { radius });
        Self {
            body,
            colour: Vec3::ZERO,
            radius,
            muzzle_offset,
            power: DEFAULT_POWER,
            angle: MIN_ANGLE,
        }
    }

    /// A launcher that falls and can be knocked around
    pub fn mobile(position: Vec3, radius: f32, muzzle_offset: Vec3, mass: f32) -> Self {
        let mut launcher = Self::new(position, radius, muzzle_offset);
        let body = &mut launcher.body;
        body.set_mass(mass);
        body.set_inertia_for(Shape::Sphere { radius });
        body.set_damping(0.95, 0.8);
        body.acceleration = Vec3::new(0.0, -10.0, 0.0);
        launcher
    }

    pub fn with_colour(mut self, colour: Vec3) -> Self {
        self.colour = colour;
        self
    }

    #[inline]
    pub fn power(&self) -> i32 {
        self.power
    }

    #[inline]
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Adjust power by `delta`, clamped to [MIN_POWER, MAX_POWER]
    pub fn set_power(&mut self, delta: i32) {
        self.power = self.power.saturating_add(delta).clamp(MIN_POWER, MAX_POWER);
    }

    /// Adjust angle by `delta` degrees, clamped to [MIN_ANGLE, MAX_ANGLE]
    pub fn set_angle(&mut self, delta: i32) {
        self.angle = self.angle.saturating_add(delta).clamp(MIN_ANGLE, MAX_ANGLE);
    }

    /// World-space firing origin
    pub fn muzzle_position(&self) -> Vec3 {
        self.body.position + self.body.orientation * self.muzzle_offset
    }

    /// World-space muzzle velocity for a round of `profile`
    pub fn launch_velocity(&self, profile: &ShotProfile, mode: LaunchMode) -> Vec3 {
        let local = match mode {
            LaunchMode::Table => profile.velocity,
            LaunchMode::Aimed => {
                let speed = profile.velocity.length() * self.power as f32 / DEFAULT_POWER as f32;
                pitched_forward(self.angle as f32) * speed
            }
        };
        self.body.orientation * local
    }
}

impl Integrate for Launcher {
    fn integrate(&mut self, dt: f32) {
        self.body.integrate(dt);
    }

    fn calculate_derived_data(&mut self) {
        self.body.calculate_derived_data();
    }
}

impl Collidable for Launcher {
    fn volume(&self) -> Volume {
        Volume::Sphere {
            centre: self.body.position,
            radius: self.radius,
        }
    }
}
